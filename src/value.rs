use std::fmt;

use crate::error::RuntimeErrorKind;
use crate::position::Span;

/// Numeric payload. Integer arithmetic stays integral until an operand
/// or the operator (`/`) forces floating point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn to_f64(self) -> f64 {
        match self {
            Self::Int(n) => n as f64,
            Self::Float(x) => x,
        }
    }

    #[must_use]
    #[allow(clippy::float_cmp)]
    pub const fn is_zero(self) -> bool {
        match self {
            Self::Int(n) => n == 0,
            Self::Float(x) => x == 0.0,
        }
    }

    pub fn add(self, rhs: Self) -> Result<Self, RuntimeErrorKind> {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => a
                .checked_add(b)
                .map(Self::Int)
                .ok_or(RuntimeErrorKind::Overflow),
            (a, b) => finite(a.to_f64() + b.to_f64()),
        }
    }

    pub fn sub(self, rhs: Self) -> Result<Self, RuntimeErrorKind> {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => a
                .checked_sub(b)
                .map(Self::Int)
                .ok_or(RuntimeErrorKind::Overflow),
            (a, b) => finite(a.to_f64() - b.to_f64()),
        }
    }

    pub fn mul(self, rhs: Self) -> Result<Self, RuntimeErrorKind> {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => a
                .checked_mul(b)
                .map(Self::Int)
                .ok_or(RuntimeErrorKind::Overflow),
            (a, b) => finite(a.to_f64() * b.to_f64()),
        }
    }

    /// True division: the result is always a float.
    pub fn div(self, rhs: Self) -> Result<Self, RuntimeErrorKind> {
        if rhs.is_zero() {
            return Err(RuntimeErrorKind::DivisionByZero);
        }
        Ok(Self::Float(self.to_f64() / rhs.to_f64()))
    }

    pub fn pow(self, rhs: Self) -> Result<Self, RuntimeErrorKind> {
        match (self, rhs) {
            (Self::Int(base), Self::Int(exp)) if exp >= 0 => Self::int_pow(base, exp),
            (base, exp) => {
                let (b, e) = (base.to_f64(), exp.to_f64());
                if base.is_zero() && e < 0.0 {
                    return Err(RuntimeErrorKind::DivisionByZero);
                }
                let result = b.powf(e);
                if result.is_nan() && !b.is_nan() && !e.is_nan() {
                    Err(RuntimeErrorKind::NotReal)
                } else if result.is_infinite() && b.is_finite() && e.is_finite() {
                    Err(RuntimeErrorKind::Overflow)
                } else {
                    Ok(Self::Float(result))
                }
            }
        }
    }

    fn int_pow(base: i64, exp: i64) -> Result<Self, RuntimeErrorKind> {
        let Ok(small) = u32::try_from(exp) else {
            // Only these bases survive an exponent this large.
            return match base {
                0 | 1 => Ok(Self::Int(base)),
                -1 => Ok(Self::Int(if exp % 2 == 0 { 1 } else { -1 })),
                _ => Err(RuntimeErrorKind::Overflow),
            };
        };
        base.checked_pow(small)
            .map(Self::Int)
            .ok_or(RuntimeErrorKind::Overflow)
    }
}

/// Float results of `+ - *` whose finite operands overflowed `f64`.
const fn finite(x: f64) -> Result<Number, RuntimeErrorKind> {
    if x.is_infinite() {
        return Err(RuntimeErrorKind::Overflow);
    }
    Ok(Number::Float(x))
}

impl fmt::Display for Number {
    // Floats print their shortest round-trip form, which always keeps a
    // `.` or an exponent: `2.0`, `0.25`, `1e16`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x:?}"),
        }
    }
}

/// The closed set of runtime value kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    Number(Number),
}

impl ValueKind {
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "Number",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// A runtime value tagged with the source range that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub kind: ValueKind,
    /// `None` for values that did not come from source, such as
    /// predefined globals.
    pub span: Option<Span>,
}

impl Value {
    #[must_use]
    pub const fn number(n: Number) -> Self {
        Self {
            kind: ValueKind::Number(n),
            span: None,
        }
    }

    /// Copy of this value re-tagged with `span`.
    #[must_use]
    pub fn with_span(self, span: Span) -> Self {
        Self {
            kind: self.kind,
            span: Some(span),
        }
    }

    #[must_use]
    pub const fn as_number(&self) -> Option<Number> {
        match self.kind {
            ValueKind::Number(n) => Some(n),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_arithmetic_stays_int() {
        assert_eq!(Number::Int(2).add(Number::Int(3)), Ok(Number::Int(5)));
        assert_eq!(Number::Int(2).sub(Number::Int(3)), Ok(Number::Int(-1)));
        assert_eq!(Number::Int(2).mul(Number::Int(3)), Ok(Number::Int(6)));
    }

    #[test]
    fn mixed_arithmetic_promotes() {
        assert_eq!(Number::Int(2).add(Number::Float(0.5)), Ok(Number::Float(2.5)));
        assert_eq!(Number::Float(1.5).mul(Number::Int(2)), Ok(Number::Float(3.0)));
    }

    #[test]
    fn division_is_always_float() {
        assert_eq!(Number::Int(6).div(Number::Int(3)), Ok(Number::Float(2.0)));
        assert_eq!(Number::Int(7).div(Number::Int(2)), Ok(Number::Float(3.5)));
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(
            Number::Int(1).div(Number::Int(0)),
            Err(RuntimeErrorKind::DivisionByZero)
        );
        assert_eq!(
            Number::Int(1).div(Number::Float(0.0)),
            Err(RuntimeErrorKind::DivisionByZero)
        );
    }

    #[test]
    fn integer_overflow_is_reported() {
        assert_eq!(
            Number::Int(i64::MAX).add(Number::Int(1)),
            Err(RuntimeErrorKind::Overflow)
        );
        assert_eq!(
            Number::Int(i64::MIN).mul(Number::Int(-1)),
            Err(RuntimeErrorKind::Overflow)
        );
        assert_eq!(
            Number::Int(10).pow(Number::Int(40)),
            Err(RuntimeErrorKind::Overflow)
        );
    }

    #[test]
    fn pow_rules() {
        assert_eq!(Number::Int(2).pow(Number::Int(10)), Ok(Number::Int(1024)));
        assert_eq!(Number::Int(2).pow(Number::Int(-1)), Ok(Number::Float(0.5)));
        assert_eq!(Number::Int(0).pow(Number::Int(0)), Ok(Number::Int(1)));
        assert_eq!(
            Number::Int(0).pow(Number::Int(-1)),
            Err(RuntimeErrorKind::DivisionByZero)
        );
        assert_eq!(
            Number::Int(-8).pow(Number::Float(0.5)),
            Err(RuntimeErrorKind::NotReal)
        );
        assert_eq!(
            Number::Int(-1).pow(Number::Int(i64::MAX)),
            Ok(Number::Int(-1))
        );
    }

    #[test]
    fn display() {
        assert_eq!(Number::Int(6).to_string(), "6");
        assert_eq!(Number::Float(2.0).to_string(), "2.0");
        assert_eq!(Number::Float(0.25).to_string(), "0.25");
        assert_eq!(Number::Float(-4.0).to_string(), "-4.0");
    }

    #[test]
    fn large_floats_keep_float_form() {
        assert_eq!(Number::Float(1e16).to_string(), "1e16");
        assert_eq!(Number::Float(2f64.powi(60)).to_string(), "1.152921504606847e18");
        assert_eq!(Number::Float(1e-7).to_string(), "1e-7");
    }

    #[test]
    fn float_overflow_is_reported() {
        assert_eq!(
            Number::Float(f64::MAX).mul(Number::Int(10)),
            Err(RuntimeErrorKind::Overflow)
        );
        assert_eq!(
            Number::Float(f64::MAX).add(Number::Float(f64::MAX)),
            Err(RuntimeErrorKind::Overflow)
        );
        assert_eq!(
            Number::Float(-f64::MAX).sub(Number::Float(f64::MAX)),
            Err(RuntimeErrorKind::Overflow)
        );
        assert_eq!(
            Number::Float(f64::MAX).sub(Number::Float(f64::MAX)),
            Ok(Number::Float(0.0))
        );
    }
}
