pub mod calculator;
pub mod error;
pub mod functions;
pub mod registry;
pub mod rpn;
pub mod tokenizer;

pub use calculator::{Calculator, CalculatorBuilder, CalculatorConfig, ConstantBody};
pub use error::{DefinitionError, EvalError, ExpressionError};
pub use functions::EntryKind;
pub use registry::FunctionRegistry;

use rpn::Evaluator;

/// Evaluates `expression` against the built-in functions and constants only.
pub fn evaluate_expression(expression: &str) -> Result<f64, ExpressionError> {
    let registry = FunctionRegistry::new();
    Evaluator::new(&registry).evaluate(expression)
}
