//! External insight store: verified, tagged threat-awareness records

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::db::repository::InsightRepository;
use crate::db::DbError;
use crate::model::ExternalInsight;

#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error("Database error: {0}")]
    Db(#[from] DbError),
}

/// External insight collaborator.
///
/// Serves only verified records inside a recency window; relevance
/// filtering against organization tags happens at the router.
#[async_trait]
pub trait InsightStore: Send + Sync {
    /// Verified insights from the last `window_days` days, newest first
    async fn recent_verified(&self, window_days: i64) -> Result<Vec<ExternalInsight>, InsightError>;
}

/// Insight store backed by the external_insights table
pub struct DbInsightStore {
    repository: InsightRepository,
}

impl DbInsightStore {
    pub fn new(repository: InsightRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl InsightStore for DbInsightStore {
    async fn recent_verified(&self, window_days: i64) -> Result<Vec<ExternalInsight>, InsightError> {
        let since = Utc::now() - Duration::days(window_days);
        let insights = self.repository.verified_since(since).await?;

        tracing::debug!(
            window_days = window_days,
            count = insights.len(),
            "Fetched recent verified insights"
        );

        Ok(insights)
    }
}
