//! Error types for the moderation library.
//!
//! [`ModeratorError::ContentRejected`] and
//! [`ModeratorError::InvalidRatingValue`] are validation failures meant to be
//! shown to the end user. [`ModeratorError::InconsistentRating`] means the
//! host handed the accumulator corrupted or stale state. The remaining
//! variants belong to the host side: loading configuration and the
//! command-line front end.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for moderation operations.
pub type ModeratorResult<T> = Result<T, ModeratorError>;

/// Error type for all moderation and rating operations.
#[derive(Debug, Error)]
pub enum ModeratorError {
    /// A field contained a listed phrase while evaluated in reject mode.
    #[error("{message}")]
    ContentRejected { field: String, message: String },

    /// A rating outside the accepted 1..=5 star range.
    #[error("Invalid rating value {value}: rating must be between 1 and 5")]
    InvalidRatingValue { value: i64 },

    /// Stored rating state whose cached aggregate disagrees with its entries.
    #[error("Inconsistent rating state: {reason}")]
    InconsistentRating { reason: String },

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// Error occurred while reading or writing files
    #[error("IO error for path '{}': {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    /// A host document could not be encoded or decoded.
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

impl ModeratorError {
    /// Builds the rejection error for `field` with the standard message.
    pub fn rejected(field: impl Into<String>) -> Self {
        let field = field.into();
        let message = format!("{} chứa từ ngữ không phù hợp", field);
        Self::ContentRejected { field, message }
    }

    /// Returns true for validation failures that go straight to the end user.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::ContentRejected { .. } | Self::InvalidRatingValue { .. }
        )
    }

    /// The offending field of a rejection, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::ContentRejected { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<io::Error> for ModeratorError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<toml::de::Error> for ModeratorError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ModeratorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModeratorError::rejected("Tên hiển thị");
        assert_eq!(err.to_string(), "Tên hiển thị chứa từ ngữ không phù hợp");
        assert_eq!(err.field(), Some("Tên hiển thị"));
        assert!(err.is_user_facing());
    }

    #[test]
    fn test_config_error_is_not_user_facing() {
        let err = ModeratorError::Config {
            reason: "bad mask".to_string(),
        };
        assert!(!err.is_user_facing());
        assert_eq!(err.field(), None);
    }

    #[test]
    fn test_inconsistent_rating_is_not_user_facing() {
        let err = ModeratorError::InconsistentRating {
            reason: "rater 'u1' appears more than once".to_string(),
        };
        assert!(!err.is_user_facing());
        assert!(err.to_string().starts_with("Inconsistent rating state"));
    }
}
