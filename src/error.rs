//! Error types for the theme park library.

use crate::models::Category;

/// All errors that can occur when using the theme park library.
#[derive(Debug, thiserror::Error)]
pub enum ThemeParkError {
    /// Input was malformed or out of range.
    #[error("validation error: {0}")]
    Validation(String),

    /// A record was handed to a collection of a different category.
    #[error("validation error: expected a {expected} record, got a {found} record")]
    KindMismatch {
        /// Category of the target collection.
        expected: Category,
        /// Category of the record that was supplied.
        found: Category,
    },

    /// A referenced identifier does not resolve.
    #[error("{category} with ID {id} not found")]
    NotFound {
        /// Category that was searched.
        category: Category,
        /// The identifier that did not resolve.
        id: u64,
    },

    /// The identity generator has no counter registered under this name.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored collection could not be decoded, or holds a record that
    /// breaks its invariants, and strict loads are enabled.
    #[error("corrupt {category} collection: {source}")]
    Corrupt {
        /// Category whose file failed to load.
        category: Category,
        /// Decode or validation error.
        source: Box<ThemeParkError>,
    },

    /// Storage backend failed (I/O, locking).
    #[error("storage error: {0}")]
    Storage(Box<dyn core::error::Error + Send + Sync>),
}

/// Coarse classification of a [`ThemeParkError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller must correct the input.
    Validation,
    /// The caller referenced an identifier that does not exist.
    NotFound,
    /// Serialization, file access or locking failed.
    Persistence,
}

impl ThemeParkError {
    /// Builds a [`ThemeParkError::Validation`] from any message.
    #[inline]
    pub(crate) fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Returns the category of this error.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match *self {
            Self::Validation(_) | Self::KindMismatch { .. } | Self::UnknownCategory(_) => {
                ErrorKind::Validation
            }
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Serialization(_) | Self::Corrupt { .. } | Self::Storage(_) => {
                ErrorKind::Persistence
            }
        }
    }
}

/// Convenience alias for results in this crate.
pub type Result<T> = core::result::Result<T, ThemeParkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_from_serde_json() {
        let serde_err = serde_json::from_str::<String>("not json").unwrap_err();
        let err = ThemeParkError::from(serde_err);
        assert!(matches!(err, ThemeParkError::Serialization(_)));
        assert_eq!(err.kind(), ErrorKind::Persistence);
        assert!(err.to_string().contains("serialization error"));
    }

    #[test]
    fn error_storage_display() {
        let inner = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = ThemeParkError::Storage(Box::new(inner));
        let msg = err.to_string();
        assert!(msg.contains("storage error"));
        assert!(msg.contains("read-only"));
    }

    #[test]
    fn not_found_names_category_and_id() {
        let err = ThemeParkError::NotFound {
            category: Category::Guest,
            id: 7,
        };
        assert_eq!(err.to_string(), "guest with ID 7 not found");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn kind_mismatch_is_validation() {
        let err = ThemeParkError::KindMismatch {
            expected: Category::Guest,
            found: Category::Ticket,
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("expected a guest record"));
    }

    #[test]
    fn unknown_category_is_validation() {
        let err = ThemeParkError::UnknownCategory("ride".to_owned());
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "unknown category: ride");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ThemeParkError>();
    }
}
