//! Error handling for attendance record operations.
//!
//! Row decoding surfaces exactly two data errors, [`AttendanceError::Format`]
//! and [`AttendanceError::UnknownBuffToken`]. The remaining variants belong to
//! the plumbing around the core: configuration, the row store and the
//! startup check of the buff lookup table.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AttendanceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sheet file error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    Format {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Unknown world buff token: '{token}'")]
    UnknownBuffToken { token: String },

    #[error("World buff lookup table maps '{key}' more than once")]
    DuplicateBuffMapping { key: String },

    #[error("Invalid range '{range}': {reason}")]
    InvalidRange { range: String, reason: String },

    #[error("Sheet not found: {sheet}")]
    SheetNotFound { sheet: String },

    #[error("Row store error: {message}")]
    Store { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl AttendanceError {
    /// Create a field format error
    pub fn format(field: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a row store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    pub fn invalid_range(range: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            range: range.into(),
            reason: reason.into(),
        }
    }

    /// True for the errors a malformed stored row can produce
    pub fn is_row_error(&self) -> bool {
        matches!(
            self,
            AttendanceError::Format { .. } | AttendanceError::UnknownBuffToken { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AttendanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_message() {
        let error = AttendanceError::format("raid_instance_id", "abc", "not an integer");
        assert_eq!(
            error.to_string(),
            "Invalid value for raid_instance_id: 'abc' (not an integer)"
        );
        assert!(error.is_row_error());
    }

    #[test]
    fn test_plumbing_errors_are_not_row_errors() {
        let io_error = AttendanceError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        assert!(!io_error.is_row_error());
        assert!(!AttendanceError::configuration("bad").is_row_error());
        assert!(
            AttendanceError::UnknownBuffToken {
                token: "ZZ".to_string()
            }
            .is_row_error()
        );
    }
}
