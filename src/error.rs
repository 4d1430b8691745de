use thiserror::Error;

use crate::graph::UserId;

/// Errors surfaced by the explorer and its collaborators.
///
/// Values are cloneable so the controller can keep the last failure in its
/// observable view state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplorerError {
    /// Transport or HTTP failure talking to the graph service.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered, but not with the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Local validation failed; no request was issued.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The existence check came back negative.
    #[error("user {0} not found")]
    NotFound(UserId),

    /// The rendering engine could not be constructed or laid out.
    #[error("visualization error: {0}")]
    Visualization(String),
}

pub type Result<T, E = ExplorerError> = std::result::Result<T, E>;

impl From<reqwest::Error> for ExplorerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ExplorerError::MalformedResponse(err.to_string())
        } else {
            ExplorerError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ExplorerError {
    fn from(err: serde_json::Error) -> Self {
        ExplorerError::MalformedResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_user() {
        let err = ExplorerError::NotFound(UserId(7));
        assert_eq!(err.to_string(), "user 7 not found");
    }

    #[test]
    fn test_json_error_is_malformed() {
        let err: ExplorerError = serde_json::from_str::<serde_json::Value>("{nope")
            .unwrap_err()
            .into();
        assert!(matches!(err, ExplorerError::MalformedResponse(_)));
    }
}
