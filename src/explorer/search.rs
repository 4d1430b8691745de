use std::fmt;

use crate::api::RecommendationResult;
use crate::error::{ExplorerError, Result};
use crate::graph::UserId;

/// Where the view should be after a navigate-mode search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SearchResults(UserId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::SearchResults(id) => format!("/search/{}", id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Terminal action of a successful search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Recommendations(RecommendationResult),
    Navigate(Route),
}

/// Recommendation side panel as the view renders it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RecommendationPanel {
    #[default]
    Idle,
    Loading(UserId),
    Ready(RecommendationResult),
    Failed(ExplorerError),
}

/// Parse free-form search text into a user id. No request is made on failure.
pub fn parse_user_id(input: &str) -> Result<UserId> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ExplorerError::InvalidInput(
            "please enter a user id".to_string(),
        ));
    }
    trimmed
        .parse::<u64>()
        .map(UserId)
        .map_err(|_| ExplorerError::InvalidInput(format!("'{}' is not a valid user id", trimmed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id("7").unwrap(), UserId(7));
        assert_eq!(parse_user_id("  42 \n").unwrap(), UserId(42));
        assert_eq!(parse_user_id("0").unwrap(), UserId(0));
    }

    #[test]
    fn test_parse_user_id_rejects_garbage() {
        for input in ["", "   ", "abc", "-3", "1.5", "7x", "99999999999999999999999"] {
            let err = parse_user_id(input).unwrap_err();
            assert!(matches!(err, ExplorerError::InvalidInput(_)), "{:?}", input);
        }
    }

    #[test]
    fn test_route_path() {
        assert_eq!(Route::SearchResults(UserId(7)).path(), "/search/7");
    }
}
