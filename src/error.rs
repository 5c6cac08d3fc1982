//! Engine errors.

/// Errors raised by the event engine's public surface.
///
/// Expression failures never appear here: conditions swallow them
/// (fail-closed) and handlers receive them directly as [`crate::expr::ExprError`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("invalid probability {value} for {what}: must be within [0, 1]")]
    InvalidProbability { what: String, value: f64 },
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Reject NaN and values outside `[0, 1]`.
pub(crate) fn check_probability(what: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::InvalidProbability {
            what: what.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_probability() {
        assert!(check_probability("trigger 'A'", 0.0).is_ok());
        assert!(check_probability("trigger 'A'", 1.0).is_ok());
        assert!(check_probability("trigger 'A'", 1.01).is_err());
        assert!(check_probability("trigger 'A'", -0.1).is_err());
        assert!(check_probability("trigger 'A'", f64::NAN).is_err());
    }

    #[test]
    fn test_message() {
        let err = check_probability("event 'Storm'", 2.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid probability 2 for event 'Storm': must be within [0, 1]"
        );
    }
}
