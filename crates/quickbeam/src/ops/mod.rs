//! Operations wired into primitives
//!
//! Each operation is a small stateless type implementing
//! [`Operation`](crate::primitive::Operation). The numeric ones share the
//! broadcasting engine; the rest deal with lists, arguments, callables and
//! files.

mod arithmetic;
mod comparison;
mod file_read;
mod function;
mod list_ops;
mod reduce;
mod variables;

pub use arithmetic::{fold, Arithmetic, ArithmeticOp};
pub use comparison::{compare, CompareOp, Comparison};
pub use file_read::FileRead;
pub use function::{Call, Lambda};
pub use list_ops::{length, Len, MakeList};
pub use reduce::{sum, Sum};
pub use variables::{AccessArgument, Variable};
