use crate::error::EvalError;
use crate::rpn::ValueStack;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MathFunction {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Sinh,
    Cosh,
    Tanh,
    Abs,
    Log,
    Exp,
    Sgn,
    Sqrt,
    DegreesToRadians,
    RadiansToDegrees,
    Min,
    Max,
    Neg,
}

impl MathFunction {
    pub const ALL: [MathFunction; 20] = [
        MathFunction::Sin,
        MathFunction::Cos,
        MathFunction::Tan,
        MathFunction::Asin,
        MathFunction::Acos,
        MathFunction::Atan,
        MathFunction::Atan2,
        MathFunction::Sinh,
        MathFunction::Cosh,
        MathFunction::Tanh,
        MathFunction::Abs,
        MathFunction::Log,
        MathFunction::Exp,
        MathFunction::Sgn,
        MathFunction::Sqrt,
        MathFunction::DegreesToRadians,
        MathFunction::RadiansToDegrees,
        MathFunction::Min,
        MathFunction::Max,
        MathFunction::Neg,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MathFunction::Sin => "sin",
            MathFunction::Cos => "cos",
            MathFunction::Tan => "tan",
            MathFunction::Asin => "asin",
            MathFunction::Acos => "acos",
            MathFunction::Atan => "atan",
            MathFunction::Atan2 => "atan2",
            MathFunction::Sinh => "sinh",
            MathFunction::Cosh => "cosh",
            MathFunction::Tanh => "tanh",
            MathFunction::Abs => "abs",
            MathFunction::Log => "log",
            MathFunction::Exp => "exp",
            MathFunction::Sgn => "sgn",
            MathFunction::Sqrt => "sqrt",
            MathFunction::DegreesToRadians => "d2r",
            MathFunction::RadiansToDegrees => "r2d",
            MathFunction::Min => "min",
            MathFunction::Max => "max",
            MathFunction::Neg => "neg",
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            MathFunction::Atan2 | MathFunction::Min | MathFunction::Max => 2,
            _ => 1,
        }
    }

    /// Pops this function's arguments from `values` and computes the result.
    pub fn apply(&self, name: &str, values: &mut ValueStack) -> Result<f64, EvalError> {
        let result = match self {
            MathFunction::Atan2 => {
                let (y, x) = pop_pair(name, values)?;
                y.atan2(x)
            }
            MathFunction::Min => {
                let (a, b) = pop_pair(name, values)?;
                a.min(b)
            }
            MathFunction::Max => {
                let (a, b) = pop_pair(name, values)?;
                a.max(b)
            }
            MathFunction::Sin => values.pop(name)?.sin(),
            MathFunction::Cos => values.pop(name)?.cos(),
            MathFunction::Tan => values.pop(name)?.tan(),
            MathFunction::Asin => values.pop(name)?.asin(),
            MathFunction::Acos => values.pop(name)?.acos(),
            MathFunction::Atan => values.pop(name)?.atan(),
            MathFunction::Sinh => values.pop(name)?.sinh(),
            MathFunction::Cosh => values.pop(name)?.cosh(),
            MathFunction::Tanh => values.pop(name)?.tanh(),
            MathFunction::Abs => values.pop(name)?.abs(),
            MathFunction::Log => values.pop(name)?.ln(),
            MathFunction::Exp => values.pop(name)?.exp(),
            MathFunction::Sgn => sgn(values.pop(name)?),
            MathFunction::Sqrt => values.pop(name)?.sqrt(),
            MathFunction::DegreesToRadians => values.pop(name)?.to_radians(),
            MathFunction::RadiansToDegrees => values.pop(name)?.to_degrees(),
            MathFunction::Neg => -values.pop(name)?,
        };
        Ok(result)
    }
}

/// Pops two arguments, leftmost first.
fn pop_pair(name: &str, values: &mut ValueStack) -> Result<(f64, f64), EvalError> {
    let right = values.pop(name)?;
    let left = values.pop(name)?;
    Ok((left, right))
}

// f64::signum maps zero to one
fn sgn(x: f64) -> f64 {
    if x == 0.0 || x.is_nan() {
        x
    } else {
        x.signum()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BuiltinConstant {
    Pi,
    E,
}

impl BuiltinConstant {
    pub const ALL: [BuiltinConstant; 2] = [BuiltinConstant::Pi, BuiltinConstant::E];

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinConstant::Pi => "PI",
            BuiltinConstant::E => "E",
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            BuiltinConstant::Pi => std::f64::consts::PI,
            BuiltinConstant::E => std::f64::consts::E,
        }
    }
}
