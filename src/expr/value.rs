//! Runtime values of the expression language.

use std::fmt;

use super::error::ExprError;

/// Result of evaluating an expression or sub-expression.
///
/// Strings only appear as literals and function arguments; every operator
/// except `===`/`!==` coerces its operands to numbers or booleans.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Str(String),
}

impl Value {
    /// Truthiness: `0`, `false` and `""` are false, everything else is true.
    #[must_use]
    pub fn truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0,
            Value::Bool(b) => *b,
            Value::Str(s) => !s.is_empty(),
        }
    }

    /// Numeric coercion. Booleans become 1/0, strings must parse as numbers.
    pub fn to_number(&self) -> Result<f64, ExprError> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::Str(s) => s.trim().parse::<f64>().map_err(|_| ExprError::InvalidNumber {
                text: s.clone(),
            }),
        }
    }

    /// Get as number without coercion.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as bool without coercion.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Number(0.0).truthy());
        assert!(Value::Number(-2.0).truthy());
        assert!(!Value::Bool(false).truthy());
        assert!(!Value::from("").truthy());
        assert!(Value::from("0").truthy());
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(Value::Bool(true).to_number(), Ok(1.0));
        assert_eq!(Value::from(" 2.5 ").to_number(), Ok(2.5));
        assert_eq!(
            Value::from("abc").to_number(),
            Err(ExprError::InvalidNumber { text: "abc".into() })
        );
    }

    #[test]
    fn test_no_cross_variant_equality() {
        assert_ne!(Value::Number(1.0), Value::from("1"));
        assert_ne!(Value::Number(1.0), Value::Bool(true));
        assert_eq!(Value::from("a"), Value::from("a"));
    }
}
