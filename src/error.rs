use thiserror::Error;

/// Reason an expression could not be evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// pest rejected the input. The grammar accepts any text, so only the parser's own
    /// resource limits lead here.
    #[error("could not tokenize expression: {0}")]
    TokenizeAmbiguous(String),

    #[error("function '{0}' is not defined")]
    FunctionNotDefined(String),

    #[error("not enough parameters for '{0}'")]
    NotEnoughParameters(String),

    #[error("expression left {0} unused operands")]
    TooManyOperands(usize),

    #[error("custom function nesting exceeded {0} levels")]
    RecursionLimitExceeded(usize),
}

/// An [`EvalError`] tagged with the expression that was being evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("failed to evaluate '{expression}': {source}")]
pub struct ExpressionError {
    pub expression: String,
    #[source]
    pub source: EvalError,
}

impl ExpressionError {
    pub fn new(expression: &str, source: EvalError) -> Self {
        Self {
            expression: expression.to_string(),
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefinitionError {
    #[error("'{0}' is not a valid function name")]
    WrongFunctionName(String),

    #[error("'{0}' is a built-in and cannot be redefined")]
    FunctionAlreadyExists(String),

    #[error("constant '{0}' cannot take parameters")]
    ConstantWithParameters(String),

    #[error("placeholder index out of range in '{0}'")]
    MalformedPlaceholder(String),

    #[error("no result to save")]
    NoResult,
}
