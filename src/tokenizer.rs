use crate::error::EvalError;
use log::debug;
use pest::Parser;
use pest_derive::Parser;
use std::borrow::Cow;

#[derive(Parser)]
#[grammar = "expression.pest"]
struct ExpressionGrammar;

/// Splits an expression into raw token strings.
///
/// Delimiters (`* + - / ^ % ( ) ,`) are kept as tokens of their own and whitespace is
/// dropped. A `+` or `-` that starts the expression or follows an operator, `(` or `,`, and
/// precedes a numeric token, is merged into that number, so `2*-3` yields `"2"`, `"*"`, `"-3"`.
pub struct Tokenizer<'a> {
    raw: Vec<&'a str>,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(expression: &'a str) -> Result<Self, EvalError> {
        let pairs = ExpressionGrammar::parse(Rule::expression, expression)
            .map_err(|e| EvalError::TokenizeAmbiguous(e.to_string()))?;

        let raw: Vec<&str> = pairs
            .flatten()
            .filter(|pair| matches!(pair.as_rule(), Rule::delimiter | Rule::word))
            .map(|pair| pair.as_str())
            .collect();
        debug!("Raw tokens for '{}': {:?}", expression, raw);

        Ok(Self { raw, pos: 0 })
    }

    fn previous(&self) -> &'a str {
        if self.pos > 0 {
            self.raw[self.pos - 1]
        } else {
            ""
        }
    }

    fn following(&self) -> &'a str {
        self.raw.get(self.pos + 1).copied().unwrap_or("")
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Cow<'a, str>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = *self.raw.get(self.pos)?;

        if (token == "-" || token == "+")
            && starts_operand(self.previous())
            && is_numeric(self.following())
        {
            let merged = format!("{}{}", token, self.following());
            self.pos += 2;
            return Some(Cow::Owned(merged));
        }

        self.pos += 1;
        Some(Cow::Borrowed(token))
    }
}

/// Whether an operand is expected after `previous`.
fn starts_operand(previous: &str) -> bool {
    matches!(previous, "" | "*" | "+" | "-" | "/" | "^" | "%" | "(" | ",")
}

/// Reads a token as a decimal literal.
///
/// Words such as `inf` or `NaN` parse as floats in Rust but are treated as names.
pub fn parse_number(token: &str) -> Option<f64> {
    let unsigned = token.strip_prefix(['+', '-']).unwrap_or(token);
    if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    token.parse().ok()
}

pub fn is_numeric(token: &str) -> bool {
    parse_number(token).is_some()
}
