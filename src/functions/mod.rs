mod builtin;
mod custom;
mod operators;

pub use builtin::{BuiltinConstant, MathFunction};
pub use custom::CustomFunction;
pub use operators::BinaryOperator;

use crate::error::EvalError;
use crate::registry::FunctionRegistry;
use crate::rpn::{Evaluator, ValueStack};
use log::debug;
use std::sync::Arc;

/// Precedence of the marker pushed for an open bracket; below every callable.
pub const PRECEDENCE_TERMINAL: u8 = 0;
pub const PRECEDENCE_ADDITIVE: u8 = 1;
pub const PRECEDENCE_MULTIPLICATIVE: u8 = 2;
pub const PRECEDENCE_POWER: u8 = 3;
pub const PRECEDENCE_FUNCTION: u8 = 10;
pub const PRECEDENCE_CONSTANT: u8 = 100;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntryKind {
    Function,
    Constant,
}

/// Anything a name in an expression can resolve to.
#[derive(Debug, Clone, PartialEq)]
pub enum Function {
    Operator(BinaryOperator),
    Math(MathFunction),
    Constant(BuiltinConstant),
    /// A constant holding a plain number, e.g. `ans`.
    Number(f64),
    Custom(Arc<CustomFunction>),
}

impl Function {
    pub fn custom(function: CustomFunction) -> Self {
        Function::Custom(Arc::new(function))
    }

    pub fn arity(&self) -> usize {
        match self {
            Function::Operator(_) => 2,
            Function::Math(function) => function.arity(),
            Function::Constant(_) | Function::Number(_) => 0,
            Function::Custom(function) => function.arity(),
        }
    }

    pub fn precedence(&self) -> u8 {
        match self {
            Function::Operator(operator) => operator.precedence(),
            Function::Math(_) => PRECEDENCE_FUNCTION,
            Function::Constant(_) | Function::Number(_) => PRECEDENCE_CONSTANT,
            Function::Custom(function) => match function.kind() {
                EntryKind::Function => PRECEDENCE_FUNCTION,
                EntryKind::Constant => PRECEDENCE_CONSTANT,
            },
        }
    }

    pub fn associativity(&self) -> Associativity {
        match self {
            Function::Operator(operator) => operator.associativity(),
            _ => Associativity::Right,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Function::Operator(_) | Function::Math(_) => EntryKind::Function,
            Function::Constant(_) | Function::Number(_) => EntryKind::Constant,
            Function::Custom(function) => function.kind(),
        }
    }

    /// Pops this function's operands, computes and pushes the result.
    ///
    /// `name` is what the expression called it, used for error messages. Custom
    /// functions re-enter `evaluator` one level deeper than `depth`.
    pub fn apply(
        &self,
        name: &str,
        values: &mut ValueStack,
        evaluator: &Evaluator<'_>,
        depth: usize,
    ) -> Result<(), EvalError> {
        let result = match self {
            Function::Operator(operator) => {
                let right = values.pop(name)?;
                let left = values.pop(name)?;
                operator.apply(left, right)
            }
            Function::Math(function) => function.apply(name, values)?,
            Function::Constant(constant) => constant.value(),
            Function::Number(value) => *value,
            Function::Custom(function) => {
                let args = values.pop_args(name, self.arity())?;
                let expression = function.expand(&args);
                debug!("Expanded '{}'{:?} to '{}'", name, args, expression);
                // a body with no value behaves like an empty expression
                evaluator
                    .evaluate_nested(&expression, depth + 1)?
                    .unwrap_or(f64::NAN)
            }
        };
        values.push(result);
        Ok(())
    }
}

/// Seeds `registry` with the operators, math functions and constants.
pub fn register_builtins(registry: &mut FunctionRegistry) {
    for operator in BinaryOperator::ALL {
        registry.register_builtin(operator.symbol(), Function::Operator(operator));
    }
    for function in MathFunction::ALL {
        registry.register_builtin(function.name(), Function::Math(function));
    }
    for constant in BuiltinConstant::ALL {
        registry.register_builtin(constant.name(), Function::Constant(constant));
    }
}
