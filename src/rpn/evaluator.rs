use crate::error::{EvalError, ExpressionError};
use crate::functions::{Associativity, Function, PRECEDENCE_TERMINAL};
use crate::registry::FunctionRegistry;
use crate::rpn::{Token, ValueStack};
use crate::tokenizer::Tokenizer;
use log::{debug, trace};

pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 64;
/// Highest nesting depth an [`Evaluator`] accepts; larger requests are lowered to it.
pub const MAX_RECURSION_DEPTH_CEILING: usize = 128;

/// Entry on the function stack.
#[derive(Debug)]
enum Pending {
    /// Pushed for `(`; bounds what a `,` or `)` may reduce.
    Terminal,
    Call { name: String, function: Function },
}

impl Pending {
    fn precedence(&self) -> u8 {
        match self {
            Pending::Terminal => PRECEDENCE_TERMINAL,
            Pending::Call { function, .. } => function.precedence(),
        }
    }

    /// Whether this pending entry has to run before `incoming` is pushed.
    fn reduces_before(&self, incoming: &Function) -> bool {
        match self {
            Pending::Terminal => false,
            Pending::Call { function, .. } => {
                function.precedence() > incoming.precedence()
                    || (function.precedence() == incoming.precedence()
                        && function.associativity() == Associativity::Left)
            }
        }
    }
}

#[derive(Debug, Default)]
struct EvaluationState {
    values: ValueStack,
    functions: Vec<Pending>,
}

/// Operator-precedence evaluator over a [`FunctionRegistry`].
///
/// Every call to [`evaluate`](Self::evaluate) starts from empty stacks, so the only state
/// shared between calls is the registry itself.
pub struct Evaluator<'r> {
    registry: &'r FunctionRegistry,
    max_depth: usize,
}

impl<'r> Evaluator<'r> {
    pub fn new(registry: &'r FunctionRegistry) -> Self {
        Self::with_max_depth(registry, DEFAULT_MAX_RECURSION_DEPTH)
    }

    /// `max_depth` bounds how deeply custom functions may expand into one another. It is
    /// capped at [`MAX_RECURSION_DEPTH_CEILING`].
    pub fn with_max_depth(registry: &'r FunctionRegistry, max_depth: usize) -> Self {
        Self {
            registry,
            max_depth: max_depth.min(MAX_RECURSION_DEPTH_CEILING),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Evaluates `expression`, returning `NaN` when it contains nothing to evaluate.
    pub fn evaluate(&self, expression: &str) -> Result<f64, ExpressionError> {
        Ok(self.evaluate_value(expression)?.unwrap_or(f64::NAN))
    }

    /// Like [`evaluate`](Self::evaluate) but yields `None` when no value was produced.
    pub fn evaluate_value(&self, expression: &str) -> Result<Option<f64>, ExpressionError> {
        self.evaluate_nested(expression, 0)
            .map_err(|source| ExpressionError::new(expression, source))
    }

    /// Evaluates an expanded custom-function body `depth` levels below the caller.
    /// Errors are passed through without wrapping.
    pub(crate) fn evaluate_nested(
        &self,
        expression: &str,
        depth: usize,
    ) -> Result<Option<f64>, EvalError> {
        if depth > self.max_depth {
            return Err(EvalError::RecursionLimitExceeded(self.max_depth));
        }
        debug!("Evaluating '{}' at depth {}", expression, depth);

        let mut state = EvaluationState::default();
        for raw in Tokenizer::new(expression)? {
            let token = Token::classify(&raw, self.registry)?;
            self.handle_token(token, &mut state, depth)?;
        }

        while let Some(pending) = state.functions.pop() {
            self.run(pending, &mut state.values, depth)?;
        }

        match state.values.as_slice() {
            [] => Ok(None),
            [result] => Ok(Some(*result)),
            values => Err(EvalError::TooManyOperands(values.len() - 1)),
        }
    }

    fn handle_token(
        &self,
        token: Token,
        state: &mut EvaluationState,
        depth: usize,
    ) -> Result<(), EvalError> {
        match token {
            Token::Number(value) => state.values.push(value),
            Token::Function { name, function } => {
                self.reduce_while(state, depth, |top| top.reduces_before(&function))?;
                state.functions.push(Pending::Call { name, function });
            }
            Token::OpenBracket => state.functions.push(Pending::Terminal),
            Token::Comma => self.close_argument(state, depth)?,
            Token::ClosedBracket => {
                self.close_argument(state, depth)?;
                if matches!(state.functions.last(), Some(Pending::Terminal)) {
                    state.functions.pop();
                }
            }
        }
        Ok(())
    }

    /// Runs everything pushed since the innermost open bracket.
    fn close_argument(&self, state: &mut EvaluationState, depth: usize) -> Result<(), EvalError> {
        self.reduce_while(state, depth, |top| top.precedence() > PRECEDENCE_TERMINAL)
    }

    fn reduce_while<P>(
        &self,
        state: &mut EvaluationState,
        depth: usize,
        predicate: P,
    ) -> Result<(), EvalError>
    where
        P: Fn(&Pending) -> bool,
    {
        while state.functions.last().is_some_and(&predicate) {
            if let Some(pending) = state.functions.pop() {
                self.run(pending, &mut state.values, depth)?;
            }
        }
        Ok(())
    }

    fn run(&self, pending: Pending, values: &mut ValueStack, depth: usize) -> Result<(), EvalError> {
        if let Pending::Call { name, function } = pending {
            function.apply(&name, values, self, depth)?;
            trace!("Applied '{}', values: {:?}", name, values.as_slice());
        }
        Ok(())
    }
}
