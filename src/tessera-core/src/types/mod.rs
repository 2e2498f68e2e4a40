//! Values exchanged with relations and the operation vocabulary.

mod operation;
mod value;

pub use operation::{OperationType, ResultArity};
pub use value::{Tuple, Value};
