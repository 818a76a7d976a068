//! Session error types

use thiserror::Error;

use crate::domain::Category;

/// Misuse of the selection flow
///
/// These are caller errors; the session state is unchanged when one is
/// returned. Service failures never show up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Unknown food item: '{0}'")]
    UnknownItem(String),

    #[error("Expected a {expected} item, got a {got} item")]
    WrongCategory { expected: Category, got: Category },

    #[error("The lunchbox is complete; reset to start a new one")]
    NotChoosing,

    #[error("The lunchbox is not finished yet")]
    NotFinalized,

    #[error("Message is empty")]
    EmptyMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SessionError::WrongCategory {
            expected: Category::Base,
            got: Category::Extra,
        };
        assert_eq!(err.to_string(), "Expected a Bund item, got a Ekstra item");
        assert_eq!(
            SessionError::UnknownItem("pizza".to_string()).to_string(),
            "Unknown food item: 'pizza'"
        );
    }
}
