use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Returned by name-producing entry points when the user is unknown.
pub const USER_NOT_FOUND: &str = "USER NOT FOUND";

/// Returned by name-producing entry points when nothing qualifies.
pub const NO_RECOMMENDATION: &str = "";

/// Returned by the score entry point when no prediction can be made.
pub const INVALID_SCORE: f64 = -1.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStrategy {
    ContentBased,
    CollaborativeFiltering,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub user: String,
    pub strategy: RecommendationStrategy,
    pub limit: usize,
    /// Neighbourhood size for collaborative filtering.
    #[serde(default)]
    pub neighbors: Option<usize>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl RecommendationRequest {
    pub fn new(user: impl Into<String>, strategy: RecommendationStrategy, limit: usize) -> Self {
        Self {
            user: user.into(),
            strategy,
            limit,
            neighbors: None,
            exclude: Vec::new(),
        }
    }
}

/// A single ranked item with the score it was ranked by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub item: String,
    pub score: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub request_id: Uuid,
    pub user: String,
    pub strategy: RecommendationStrategy,
    pub items: Vec<ScoredItem>,
    pub generated_at: DateTime<Utc>,
    pub model_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_serde() {
        let json = serde_json::to_string(&RecommendationStrategy::CollaborativeFiltering).unwrap();
        assert_eq!(json, "\"collaborative_filtering\"");
        let strategy: RecommendationStrategy = serde_json::from_str("\"content_based\"").unwrap();
        assert_eq!(strategy, RecommendationStrategy::ContentBased);
    }

    #[test]
    fn test_request_defaults() {
        let req: RecommendationRequest = serde_json::from_str(
            r#"{"user":"alice","strategy":"content_based","limit":3}"#,
        )
        .unwrap();
        assert_eq!(req.user, "alice");
        assert!(req.neighbors.is_none());
        assert!(req.exclude.is_empty());
    }
}
