//! Utility-class editing errors

use thiserror::Error;

/// Errors that can occur while editing a utility-class string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassError {
    /// Neither removals nor additions were requested
    #[error("Nothing to update: provide at least one class to remove or add")]
    InvalidArgument,

    /// A class to remove is not in the current string
    #[error("Class '{token}' to remove was not found in the current classes: '{current}'")]
    TokenNotFound { token: String, current: String },

    /// A class to add is already in the current string
    #[error("Class '{token}' to add is already in the current classes: '{current}'")]
    DuplicateToken { token: String, current: String },

    /// A class to add has no recognizable prefix
    #[error("'{0}' is not a valid utility class")]
    InvalidToken(String),
}

/// Result type alias for class editing
pub type ClassResult<T> = Result<T, ClassError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClassError::TokenNotFound {
            token: "z".to_string(),
            current: "a b c".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Class 'z' to remove was not found in the current classes: 'a b c'"
        );

        let err = ClassError::InvalidToken("42".to_string());
        assert_eq!(err.to_string(), "'42' is not a valid utility class");
    }
}
