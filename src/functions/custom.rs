use crate::error::DefinitionError;
use crate::functions::EntryKind;
use log::debug;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([0-9]+)\}").expect("placeholder pattern is valid"));

/// A user-defined function or constant backed by an expression template.
///
/// The template refers to its arguments as `{0}`, `{1}`, ... and is only checked for
/// syntax when it is first evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomFunction {
    body: String,
    arity: usize,
    kind: EntryKind,
}

impl CustomFunction {
    /// Compiles a function template. The arity is one more than the highest placeholder index.
    pub fn compile(body: &str) -> Result<Self, DefinitionError> {
        let arity = count_parameters(body)?;
        debug!("Compiled custom function '{}' with arity {}", body, arity);
        Ok(Self {
            body: body.to_string(),
            arity,
            kind: EntryKind::Function,
        })
    }

    pub fn compile_constant(name: &str, body: &str) -> Result<Self, DefinitionError> {
        if count_parameters(body)? > 0 {
            return Err(DefinitionError::ConstantWithParameters(name.to_string()));
        }
        Ok(Self {
            body: body.to_string(),
            arity: 0,
            kind: EntryKind::Constant,
        })
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Substitutes `args` into the template in a single pass.
    pub fn expand(&self, args: &[f64]) -> String {
        PLACEHOLDER
            .replace_all(&self.body, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| args.get(index))
                    .map(|value| format_argument(*value))
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

fn count_parameters(body: &str) -> Result<usize, DefinitionError> {
    let mut arity = 0;
    for caps in PLACEHOLDER.captures_iter(body) {
        let index: usize = caps[1]
            .parse()
            .map_err(|_| DefinitionError::MalformedPlaceholder(body.to_string()))?;
        let needed = index
            .checked_add(1)
            .ok_or_else(|| DefinitionError::MalformedPlaceholder(body.to_string()))?;
        arity = arity.max(needed);
    }
    Ok(arity)
}

/// Renders an argument so that tokenizing the text gives back the same value.
fn format_argument(value: f64) -> String {
    if value.is_nan() {
        "(0/0)".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "(1/0)".to_string()
        } else {
            "(-1/0)".to_string()
        }
    } else if value.is_sign_negative() {
        format!("({})", value)
    } else {
        format!("{}", value)
    }
}
