use crate::error::{DefinitionError, ExpressionError};
use crate::functions::{CustomFunction, EntryKind, Function};
use crate::registry::FunctionRegistry;
use crate::rpn::{Evaluator, DEFAULT_MAX_RECURSION_DEPTH, MAX_RECURSION_DEPTH_CEILING};
use log::debug;
use std::collections::BTreeMap;

/// Name of the constant that tracks the most recent result.
pub const ANSWER: &str = "ans";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculatorConfig {
    /// How many custom functions may be nested inside one another, at most
    /// [`MAX_RECURSION_DEPTH_CEILING`].
    pub max_recursion_depth: usize,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
        }
    }
}

pub struct CalculatorBuilder {
    config: CalculatorConfig,
}

impl CalculatorBuilder {
    // Start from the default configuration
    pub fn new() -> Self {
        CalculatorBuilder {
            config: CalculatorConfig::default(),
        }
    }

    pub fn max_recursion_depth(mut self, depth: usize) -> Self {
        self.config.max_recursion_depth = depth.min(MAX_RECURSION_DEPTH_CEILING);
        self
    }

    pub fn build(self) -> Calculator {
        Calculator::with_config(self.config)
    }
}

impl Default for CalculatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// What a user constant is defined from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantBody {
    /// Evaluated every time the constant is used.
    Expression(String),
    Value(f64),
}

impl From<&str> for ConstantBody {
    fn from(body: &str) -> Self {
        ConstantBody::Expression(body.to_string())
    }
}

impl From<String> for ConstantBody {
    fn from(body: String) -> Self {
        ConstantBody::Expression(body)
    }
}

impl From<f64> for ConstantBody {
    fn from(value: f64) -> Self {
        ConstantBody::Value(value)
    }
}

/// An evaluation session: a registry of definitions plus the last result.
#[derive(Debug, Clone)]
pub struct Calculator {
    registry: FunctionRegistry,
    config: CalculatorConfig,
    last_result: Option<f64>,
}

impl Calculator {
    pub fn new() -> Self {
        Self::with_config(CalculatorConfig::default())
    }

    pub fn with_config(config: CalculatorConfig) -> Self {
        Self {
            registry: FunctionRegistry::new(),
            config,
            last_result: None,
        }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Evaluates `expression` and stores the result as `ans`.
    ///
    /// An expression without a value gives `NaN` and leaves the last result alone.
    pub fn evaluate(&mut self, expression: &str) -> Result<f64, ExpressionError> {
        let value = Evaluator::with_max_depth(&self.registry, self.config.max_recursion_depth)
            .evaluate_value(expression)?;
        match value {
            Some(result) => {
                debug!("'{}' = {}", expression, result);
                self.remember(result);
                Ok(result)
            }
            None => {
                debug!("'{}' has no value", expression);
                Ok(f64::NAN)
            }
        }
    }

    pub fn define_function(&mut self, name: &str, body: &str) -> Result<(), DefinitionError> {
        let function = CustomFunction::compile(body)?;
        self.registry.define(name, Function::custom(function))
    }

    pub fn define_constant(
        &mut self,
        name: &str,
        body: impl Into<ConstantBody>,
    ) -> Result<(), DefinitionError> {
        let function = match body.into() {
            ConstantBody::Expression(body) => {
                Function::custom(CustomFunction::compile_constant(name, &body)?)
            }
            ConstantBody::Value(value) => Function::Number(value),
        };
        self.registry.define(name, function)
    }

    pub fn delete(&mut self, name: &str) {
        self.registry.delete(name);
    }

    pub fn clear_user_entries(&mut self) {
        self.registry.clear();
    }

    pub fn list_user_entries(&self) -> BTreeMap<String, EntryKind> {
        self.registry.list()
    }

    pub fn list_builtins(&self) -> BTreeMap<String, EntryKind> {
        self.registry.list_builtins()
    }

    pub fn last_result(&self) -> Option<f64> {
        self.last_result
    }

    /// Stores the last result under `name`.
    pub fn save(&mut self, name: &str) -> Result<(), DefinitionError> {
        let value = self.last_result.ok_or(DefinitionError::NoResult)?;
        self.define_constant(name, value)
    }

    /// Forgets the last result and resets `ans` to zero.
    pub fn clear(&mut self) {
        self.last_result = None;
        self.define_answer(0.0);
    }

    pub fn clear_all(&mut self) {
        self.clear_user_entries();
        self.clear();
    }

    fn remember(&mut self, result: f64) {
        self.last_result = Some(result);
        self.define_answer(result);
    }

    fn define_answer(&mut self, value: f64) {
        self.registry.bind(ANSWER, Function::Number(value));
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;

    #[test]
    fn test_evaluate() {
        let mut calculator = Calculator::new();
        assert_eq!(calculator.evaluate("2 + 2 * 2").unwrap(), 6.0);
        assert_eq!(calculator.evaluate("2 * ( 2 + 2 )").unwrap(), 8.0);
        assert_eq!(calculator.evaluate("1 / 0").unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_define_function() {
        let mut calculator = Calculator::new();
        calculator.define_function("f", "{0} * {0} + 1").unwrap();
        assert_eq!(calculator.evaluate("f(3)").unwrap(), 10.0);
        assert_eq!(
            calculator.list_user_entries().get("f"),
            Some(&EntryKind::Function)
        );
    }

    #[test]
    fn test_redefine_function() {
        let mut calculator = Calculator::new();
        calculator.define_function("f", "{0} + 1").unwrap();
        calculator.define_function("f", "{0} + 2").unwrap();
        assert_eq!(calculator.evaluate("f(1)").unwrap(), 3.0);
    }

    #[test]
    fn test_define_constant() {
        let mut calculator = Calculator::new();
        calculator.define_constant("two", "1 + 1").unwrap();
        calculator.define_constant("half", 0.5).unwrap();
        calculator
            .define_constant("four", String::from("two * two"))
            .unwrap();
        assert_eq!(calculator.evaluate("two * half + four").unwrap(), 5.0);
        assert_eq!(
            calculator.list_user_entries().get("half"),
            Some(&EntryKind::Constant)
        );
    }

    #[test]
    fn test_constants_follow_their_dependencies() {
        let mut calculator = Calculator::new();
        calculator.define_constant("base", 2.0).unwrap();
        calculator.define_constant("double", "base * 2").unwrap();
        assert_eq!(calculator.evaluate("double").unwrap(), 4.0);
        calculator.define_constant("base", 5.0).unwrap();
        assert_eq!(calculator.evaluate("double").unwrap(), 10.0);
    }

    #[test]
    fn test_definition_errors() {
        let mut calculator = Calculator::new();
        assert_eq!(
            calculator.define_constant("c", "{0}"),
            Err(DefinitionError::ConstantWithParameters("c".to_string()))
        );
        assert_eq!(
            calculator.define_function("1bad", "{0}"),
            Err(DefinitionError::WrongFunctionName("1bad".to_string()))
        );
        assert_eq!(
            calculator.define_function("sin", "{0}"),
            Err(DefinitionError::FunctionAlreadyExists("sin".to_string()))
        );
        assert_eq!(
            calculator.define_constant("PI", 3.0),
            Err(DefinitionError::FunctionAlreadyExists("PI".to_string()))
        );
        assert!(calculator.list_user_entries().is_empty());
    }

    #[test]
    fn test_evaluation_errors() {
        let mut calculator = Calculator::new();
        let err = calculator.evaluate("1 + ").unwrap_err();
        assert_eq!(err.source, EvalError::NotEnoughParameters("+".to_string()));
        let err = calculator.evaluate("undefinedName ( 1 )").unwrap_err();
        assert_eq!(
            err.source,
            EvalError::FunctionNotDefined("undefinedName".to_string())
        );
    }

    #[test]
    fn test_recursion_limit_from_builder() {
        let mut calculator = CalculatorBuilder::new().max_recursion_depth(8).build();
        assert_eq!(calculator.config().max_recursion_depth, 8);
        calculator.define_function("f", "f({0}) + 1").unwrap();
        assert_eq!(
            calculator.evaluate("f(1)").unwrap_err().source,
            EvalError::RecursionLimitExceeded(8)
        );
    }

    #[test]
    fn test_builder_caps_recursion_depth() {
        let mut calculator = CalculatorBuilder::new().max_recursion_depth(5000).build();
        assert_eq!(
            calculator.config().max_recursion_depth,
            MAX_RECURSION_DEPTH_CEILING
        );
        calculator.define_function("r", "r({0})").unwrap();
        assert_eq!(
            calculator.evaluate("r(1)").unwrap_err().source,
            EvalError::RecursionLimitExceeded(MAX_RECURSION_DEPTH_CEILING)
        );
    }

    #[test]
    fn test_default_config() {
        assert_eq!(
            Calculator::default().config().max_recursion_depth,
            DEFAULT_MAX_RECURSION_DEPTH
        );
    }

    #[test]
    fn test_delete_and_clear_entries() {
        let mut calculator = Calculator::new();
        calculator.define_function("f", "{0}").unwrap();
        calculator.define_constant("k", 1.0).unwrap();
        calculator.delete("f");
        assert!(calculator.evaluate("f(1)").is_err());
        assert_eq!(calculator.evaluate("k").unwrap(), 1.0);

        calculator.clear_user_entries();
        assert!(calculator.list_user_entries().is_empty());
        assert!(calculator.evaluate("k").is_err());
        assert_eq!(calculator.list_builtins().len(), 28);
    }

    #[test]
    fn test_answer_tracks_last_result() {
        let mut calculator = Calculator::new();
        assert_eq!(calculator.last_result(), None);
        assert!(calculator.evaluate("ans").is_err());

        calculator.evaluate("3 * 4").unwrap();
        assert_eq!(calculator.last_result(), Some(12.0));
        assert_eq!(calculator.evaluate("ans / 2").unwrap(), 6.0);
        assert_eq!(calculator.evaluate("ans + 1").unwrap(), 7.0);
    }

    #[test]
    fn test_empty_expression_is_not_a_result() {
        let mut calculator = Calculator::new();
        for expr in ["", "()", ","] {
            assert!(calculator.evaluate(expr).unwrap().is_nan());
        }
        assert_eq!(calculator.last_result(), None);
        assert_eq!(calculator.save("x"), Err(DefinitionError::NoResult));
        assert_eq!(
            calculator.evaluate("ans").unwrap_err().source,
            EvalError::FunctionNotDefined("ans".to_string())
        );

        calculator.evaluate("4").unwrap();
        calculator.evaluate("").unwrap();
        assert_eq!(calculator.last_result(), Some(4.0));
        assert_eq!(calculator.evaluate("ans + 1").unwrap(), 5.0);
    }

    #[test]
    fn test_failed_evaluation_keeps_last_result() {
        let mut calculator = Calculator::new();
        calculator.evaluate("5").unwrap();
        assert!(calculator.evaluate("5 +").is_err());
        assert_eq!(calculator.last_result(), Some(5.0));
        assert_eq!(calculator.evaluate("ans").unwrap(), 5.0);
    }

    #[test]
    fn test_save() {
        let mut calculator = Calculator::new();
        assert_eq!(calculator.save("x"), Err(DefinitionError::NoResult));

        calculator.evaluate("sqrt(81)").unwrap();
        calculator.save("nine").unwrap();
        calculator.evaluate("1").unwrap();
        assert_eq!(calculator.evaluate("nine + ans").unwrap(), 10.0);
        assert_eq!(
            calculator.save("E"),
            Err(DefinitionError::FunctionAlreadyExists("E".to_string()))
        );
    }

    #[test]
    fn test_clear() {
        let mut calculator = Calculator::new();
        calculator.define_constant("k", 2.0).unwrap();
        calculator.evaluate("40 + k").unwrap();
        calculator.clear();
        assert_eq!(calculator.last_result(), None);
        assert_eq!(calculator.save("x"), Err(DefinitionError::NoResult));
        assert_eq!(calculator.evaluate("ans + k").unwrap(), 2.0);
    }

    #[test]
    fn test_clear_all() {
        let mut calculator = Calculator::new();
        calculator.define_function("f", "{0}").unwrap();
        calculator.evaluate("f(7)").unwrap();
        calculator.clear_all();
        assert_eq!(calculator.last_result(), None);
        assert_eq!(
            calculator.list_user_entries().into_iter().collect::<Vec<_>>(),
            vec![(ANSWER.to_string(), EntryKind::Constant)]
        );
        assert_eq!(calculator.evaluate("ans").unwrap(), 0.0);
    }
}
