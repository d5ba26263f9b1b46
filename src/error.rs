//! Error types shared by every widget in the crate.

use thiserror::Error;

/// Result type for widget operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised synchronously by widget operations.
///
/// Every operation validates its input before touching any state, so an
/// `Err` always means the widget is exactly as it was before the call.
#[derive(Debug, Error)]
pub enum Error {
    /// A value of the wrong shape was passed to a setter or progress mutator.
    #[error("invalid {what}: {reason}")]
    InvalidArgument {
        /// The argument that was rejected.
        what: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// A numeric value fell outside the range the widget accepts.
    #[error("{what} out of range: {value}")]
    OutOfRange {
        /// The quantity that was out of range.
        what: &'static str,
        /// The offending value.
        value: f64,
    },

    /// Background art could not be read from disk.
    #[error("failed to read background image {path}: {source}")]
    Image {
        /// Path that was read.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A declarative options record could not be parsed.
    #[error("invalid options: {0}")]
    Options(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(what: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            what,
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_range(what: &'static str, value: f64) -> Self {
        Error::OutOfRange { what, value }
    }
}

/// Rejects NaN and infinities, the numeric equivalent of "not a number".
pub(crate) fn ensure_number(what: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::invalid(what, format!("{value} is not a finite number")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_number_rejects_nan_and_infinity() {
        assert!(matches!(
            ensure_number("amount", f64::NAN),
            Err(Error::InvalidArgument { what: "amount", .. })
        ));
        assert!(ensure_number("amount", f64::INFINITY).is_err());
        assert_eq!(ensure_number("amount", 12.5).unwrap(), 12.5);
    }

    #[test]
    fn test_error_messages() {
        let err = Error::out_of_range("progress", 150.0);
        assert_eq!(err.to_string(), "progress out of range: 150");

        let err = Error::invalid("height", "empty string");
        assert_eq!(err.to_string(), "invalid height: empty string");
    }
}
