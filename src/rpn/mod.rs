mod evaluator;

pub use evaluator::{Evaluator, DEFAULT_MAX_RECURSION_DEPTH, MAX_RECURSION_DEPTH_CEILING};

use crate::error::EvalError;
use crate::functions::Function;
use crate::registry::FunctionRegistry;
use crate::tokenizer::parse_number;

/// A classified token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Function { name: String, function: Function },
    OpenBracket,
    ClosedBracket,
    Comma,
}

impl Token {
    /// Brackets and commas first, then numbers, then anything the registry knows.
    pub fn classify(raw: &str, registry: &FunctionRegistry) -> Result<Self, EvalError> {
        match raw {
            "(" => Ok(Token::OpenBracket),
            ")" => Ok(Token::ClosedBracket),
            "," => Ok(Token::Comma),
            _ => match parse_number(raw) {
                Some(value) => Ok(Token::Number(value)),
                None => Ok(Token::Function {
                    name: raw.to_string(),
                    function: registry.get(raw)?,
                }),
            },
        }
    }
}

/// Operand stack of a single evaluation.
#[derive(Debug, Clone, Default)]
pub struct ValueStack {
    values: Vec<f64>,
}

impl ValueStack {
    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    /// Pops one operand on behalf of the function called `name`.
    pub fn pop(&mut self, name: &str) -> Result<f64, EvalError> {
        self.values
            .pop()
            .ok_or_else(|| EvalError::NotEnoughParameters(name.to_string()))
    }

    /// Pops `count` operands, returned leftmost first.
    pub fn pop_args(&mut self, name: &str, count: usize) -> Result<Vec<f64>, EvalError> {
        if self.values.len() < count {
            return Err(EvalError::NotEnoughParameters(name.to_string()));
        }
        Ok(self.values.split_off(self.values.len() - count))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::{BinaryOperator, MathFunction};

    #[test]
    fn test_classify() {
        let registry = FunctionRegistry::new();
        assert_eq!(Token::classify("(", &registry), Ok(Token::OpenBracket));
        assert_eq!(Token::classify(")", &registry), Ok(Token::ClosedBracket));
        assert_eq!(Token::classify(",", &registry), Ok(Token::Comma));
        assert_eq!(Token::classify("-3.5", &registry), Ok(Token::Number(-3.5)));
        assert_eq!(
            Token::classify("*", &registry),
            Ok(Token::Function {
                name: "*".to_string(),
                function: Function::Operator(BinaryOperator::Multiply),
            })
        );
        assert_eq!(
            Token::classify("sqrt", &registry),
            Ok(Token::Function {
                name: "sqrt".to_string(),
                function: Function::Math(MathFunction::Sqrt),
            })
        );
    }

    #[test]
    fn test_classify_malformed_number_is_a_name() {
        let registry = FunctionRegistry::new();
        assert_eq!(
            Token::classify("1.2.3", &registry),
            Err(EvalError::FunctionNotDefined("1.2.3".to_string()))
        );
        assert_eq!(
            Token::classify("inf", &registry),
            Err(EvalError::FunctionNotDefined("inf".to_string()))
        );
    }

    #[test]
    fn test_pop_args_order() {
        let mut values = ValueStack::default();
        for value in [1.0, 2.0, 3.0] {
            values.push(value);
        }
        assert_eq!(values.pop_args("f", 2), Ok(vec![2.0, 3.0]));
        assert_eq!(values.as_slice(), &[1.0]);
        assert_eq!(values.pop_args("f", 0), Ok(vec![]));
    }

    #[test]
    fn test_pop_from_empty() {
        let mut values = ValueStack::default();
        assert!(values.as_slice().is_empty());
        assert_eq!(
            values.pop("neg"),
            Err(EvalError::NotEnoughParameters("neg".to_string()))
        );
        values.push(1.0);
        assert_eq!(
            values.pop_args("atan2", 2),
            Err(EvalError::NotEnoughParameters("atan2".to_string()))
        );
        assert_eq!(values.as_slice(), &[1.0]);
    }
}
