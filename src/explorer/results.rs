use tracing::info;

use crate::api::{GraphService, Recommendation};
use crate::error::{ExplorerError, Result};
use crate::graph::UserId;

/// Content of the dedicated results view for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsPage {
    pub user_id: UserId,
    pub recommendations: Vec<Recommendation>,
}

impl ResultsPage {
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }
}

/// Load the results view: existence check first, then recommendations.
pub async fn load_results<S>(
    service: &S,
    user_id: UserId,
    count: Option<usize>,
) -> Result<ResultsPage>
where
    S: GraphService + ?Sized,
{
    if !service.check_exists(user_id).await? {
        return Err(ExplorerError::NotFound(user_id));
    }
    let result = service.fetch_recommendations(user_id, count).await?;
    info!(
        "Loaded {} recommendations for user {}",
        result.items.len(),
        user_id
    );
    Ok(ResultsPage {
        user_id,
        recommendations: result.items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::testing::{FakeService, recommendation};

    #[tokio::test]
    async fn test_missing_user_skips_recommendations() {
        let service = FakeService::new();
        service.set_exists(7, false);

        let err = load_results(&service, UserId(7), None).await.unwrap_err();
        assert_eq!(err, ExplorerError::NotFound(UserId(7)));
        assert_eq!(service.calls(), vec!["exists:7"]);
    }

    #[tokio::test]
    async fn test_loads_page() {
        let service = FakeService::new();
        service.set_exists(7, true);
        service.push_recommendations(Ok(recommendation(7, &[(3, &[1, 9])])));

        let page = tokio_test::assert_ok!(load_results(&service, UserId(7), Some(5)).await);
        assert_eq!(page.user_id, UserId(7));
        assert_eq!(page.recommendations.len(), 1);
        assert_eq!(service.calls(), vec!["exists:7", "recommendations:7"]);
    }
}
