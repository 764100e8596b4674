pub mod codegen;
pub mod evaluator;

pub use codegen::Codegen;
pub use evaluator::{Evaluator, Value};
