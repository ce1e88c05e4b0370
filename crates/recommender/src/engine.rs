//! Recommender facade — the public entry points over a loaded [`RatingStore`].
//!
//! Every operation comes in two flavours. The `try_*` methods return a
//! [`RecommendResult`] that names each failure. The plain methods are the
//! tolerant service surface: they never fail and report problems through
//! reserved values ([`USER_NOT_FOUND`], [`NO_RECOMMENDATION`],
//! [`INVALID_SCORE`]).

use crate::collaborative::CollaborativeFilteringPredictor;
use crate::content::ContentBasedRecommender;
use crate::store::RatingStore;
use chrono::Utc;
use cinematch_core::config::RecommenderConfig;
use cinematch_core::types::{
    RecommendationRequest, RecommendationResponse, RecommendationStrategy, ScoredItem,
    INVALID_SCORE, NO_RECOMMENDATION, USER_NOT_FOUND,
};
use cinematch_core::{RecommendError, RecommendResult};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Thread-safe recommender over an immutable store.
#[derive(Debug, Clone)]
pub struct Recommender {
    store: Arc<RatingStore>,
    config: RecommenderConfig,
}

impl Recommender {
    pub fn new(store: RatingStore) -> Self {
        Self::with_config(store, RecommenderConfig::default())
    }

    pub fn with_config(store: impl Into<Arc<RatingStore>>, config: RecommenderConfig) -> Self {
        Self {
            store: store.into(),
            config,
        }
    }

    pub fn store(&self) -> &RatingStore {
        &self.store
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    pub fn try_recommend_by_content(&self, user: &str) -> RecommendResult<Option<ScoredItem>> {
        ContentBasedRecommender::new(&self.store).recommend(user)
    }

    pub fn try_predict_score(&self, item: &str, user: &str, k: usize) -> RecommendResult<f64> {
        CollaborativeFilteringPredictor::new(&self.store).predict(item, user, k)
    }

    pub fn try_recommend_by_collaborative_filtering(
        &self,
        user: &str,
        k: usize,
    ) -> RecommendResult<Option<ScoredItem>> {
        CollaborativeFilteringPredictor::new(&self.store).recommend(user, k)
    }

    /// Best content-based pick for `user`.
    ///
    /// Returns [`USER_NOT_FOUND`] for an unknown user and
    /// [`NO_RECOMMENDATION`] when nothing can be recommended.
    pub fn recommend_by_content(&self, user: &str) -> String {
        match self.try_recommend_by_content(user) {
            Ok(pick) => pick.map_or_else(|| NO_RECOMMENDATION.to_string(), |p| p.item),
            Err(e) => name_sentinel(user, e),
        }
    }

    /// Predicted rating of `item` by `user`, or [`INVALID_SCORE`].
    pub fn predict_score(&self, item: &str, user: &str, k: usize) -> f64 {
        match self.try_predict_score(item, user, k) {
            Ok(score) => score,
            Err(e) => {
                debug!(item = %item, user = %user, k = k, error = %e, "No score predicted");
                INVALID_SCORE
            }
        }
    }

    /// Best collaborative-filtering pick for `user`.
    ///
    /// Returns [`USER_NOT_FOUND`] for an unknown user and
    /// [`NO_RECOMMENDATION`] when no unrated item has a positive prediction.
    pub fn recommend_by_collaborative_filtering(&self, user: &str, k: usize) -> String {
        match self.try_recommend_by_collaborative_filtering(user, k) {
            Ok(pick) => pick.map_or_else(|| NO_RECOMMENDATION.to_string(), |p| p.item),
            Err(e) => name_sentinel(user, e),
        }
    }

    /// Ranked list of recommendations for a request.
    ///
    /// Unknown users and invalid neighbourhood sizes are errors. A user with
    /// no ratings, or whose profile carries no preference, gets an empty list.
    pub fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> RecommendResult<RecommendationResponse> {
        let items = match request.strategy {
            RecommendationStrategy::ContentBased => {
                match ContentBasedRecommender::new(&self.store).rank(
                    &request.user,
                    request.limit,
                    &request.exclude,
                ) {
                    Ok(items) => items,
                    Err(RecommendError::NoRatedItems(_)) | Err(RecommendError::DegenerateVector) => {
                        Vec::new()
                    }
                    Err(e) => return Err(e),
                }
            }
            RecommendationStrategy::CollaborativeFiltering => {
                let k = request.neighbors.unwrap_or(self.config.neighbors);
                CollaborativeFilteringPredictor::new(&self.store).rank(
                    &request.user,
                    k,
                    request.limit,
                    &request.exclude,
                )?
            }
        };

        Ok(RecommendationResponse {
            request_id: Uuid::new_v4(),
            user: request.user.clone(),
            strategy: request.strategy,
            items,
            generated_at: Utc::now(),
            model_version: self.config.model_version.clone(),
        })
    }
}

// The single-pick paths look up nothing but the user.
fn name_sentinel(user: &str, err: RecommendError) -> String {
    match err {
        err if err.is_not_found() => USER_NOT_FOUND.to_string(),
        RecommendError::NoRatedItems(_) | RecommendError::DegenerateVector => {
            debug!(user = %user, error = %err, "Nothing to recommend");
            NO_RECOMMENDATION.to_string()
        }
        other => {
            warn!(user = %user, error = %other, "Recommendation failed");
            NO_RECOMMENDATION.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinematch_core::{ItemAttributes, UserRatings};

    fn sample_recommender() -> Recommender {
        let mut attributes = ItemAttributes::new();
        attributes.insert("A".to_string(), vec![1.0, 0.0]);
        attributes.insert("B".to_string(), vec![0.0, 1.0]);
        attributes.insert("C".to_string(), vec![1.0, 1.0]);
        let ratings = UserRatings::new(vec!["A".into(), "B".into(), "C".into()])
            .with_user("flat", vec![10.0, 0.0, 0.0])
            .with_user("mixed", vec![10.0, 0.0, 2.0])
            .with_user("blank", vec![0.0, 0.0, 0.0])
            .with_user("done", vec![3.0, 4.0, 5.0]);
        Recommender::new(RatingStore::from_parts(attributes, ratings).unwrap())
    }

    #[test]
    fn test_content_pick() {
        let recommender = sample_recommender();
        assert_eq!(recommender.recommend_by_content("mixed"), "B");
    }

    #[test]
    fn test_content_sentinels() {
        let recommender = sample_recommender();
        assert_eq!(recommender.recommend_by_content("ghost"), USER_NOT_FOUND);
        assert_eq!(recommender.recommend_by_content("flat"), NO_RECOMMENDATION);
        assert_eq!(recommender.recommend_by_content("blank"), NO_RECOMMENDATION);
        assert_eq!(recommender.recommend_by_content("done"), NO_RECOMMENDATION);
    }

    #[test]
    fn test_predict_score_and_sentinels() {
        let recommender = sample_recommender();
        assert!((recommender.predict_score("B", "mixed", 2) - 2.0).abs() < 1e-12);
        assert_eq!(recommender.predict_score("B", "ghost", 2), INVALID_SCORE);
        assert_eq!(recommender.predict_score("Z", "mixed", 2), INVALID_SCORE);
        assert_eq!(recommender.predict_score("B", "mixed", 0), INVALID_SCORE);
        // only orthogonal neighbour
        assert_eq!(recommender.predict_score("B", "flat", 2), INVALID_SCORE);
    }

    #[test]
    fn test_cf_pick_and_sentinels() {
        let recommender = sample_recommender();
        assert_eq!(recommender.recommend_by_collaborative_filtering("flat", 2), "C");
        assert_eq!(recommender.recommend_by_collaborative_filtering("mixed", 2), "B");
        assert_eq!(
            recommender.recommend_by_collaborative_filtering("ghost", 2),
            USER_NOT_FOUND
        );
        assert_eq!(
            recommender.recommend_by_collaborative_filtering("blank", 2),
            NO_RECOMMENDATION
        );
        assert_eq!(
            recommender.recommend_by_collaborative_filtering("mixed", 0),
            NO_RECOMMENDATION
        );
    }

    #[test]
    fn test_typed_api_distinguishes_failures() {
        let recommender = sample_recommender();
        assert!(matches!(
            recommender.try_recommend_by_content("flat").unwrap_err(),
            RecommendError::DegenerateVector
        ));
        assert!(matches!(
            recommender.try_recommend_by_content("blank").unwrap_err(),
            RecommendError::NoRatedItems(_)
        ));
        assert!(matches!(
            recommender.try_predict_score("B", "flat", 1).unwrap_err(),
            RecommendError::DegeneratePrediction { .. }
        ));
        assert!(recommender
            .try_recommend_by_content("ghost")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_recommend_request_content() {
        let recommender = sample_recommender();
        let req = RecommendationRequest::new("mixed", RecommendationStrategy::ContentBased, 5);
        let resp = recommender.recommend(&req).unwrap();
        assert_eq!(resp.user, "mixed");
        assert_eq!(resp.strategy, RecommendationStrategy::ContentBased);
        assert_eq!(resp.model_version, "v1.0");
        assert_eq!(resp.items.len(), 1);
        assert_eq!(resp.items[0].item, "B");
        assert_eq!(resp.items[0].reason, "Matches your taste profile");
    }

    #[test]
    fn test_recommend_request_degenerate_profile_is_empty() {
        let recommender = sample_recommender();
        let req = RecommendationRequest::new("flat", RecommendationStrategy::ContentBased, 5);
        assert!(recommender.recommend(&req).unwrap().items.is_empty());
        let req = RecommendationRequest::new("blank", RecommendationStrategy::ContentBased, 5);
        assert!(recommender.recommend(&req).unwrap().items.is_empty());
    }

    #[test]
    fn test_recommend_request_cf_uses_configured_neighbors() {
        let recommender = sample_recommender();
        let mut req =
            RecommendationRequest::new("flat", RecommendationStrategy::CollaborativeFiltering, 5);
        let resp = recommender.recommend(&req).unwrap();
        assert_eq!(resp.items.len(), 1);
        assert_eq!(resp.items[0].item, "C");
        assert_eq!(resp.items[0].reason, "Similar to movies you rated highly");

        req.neighbors = Some(0);
        assert!(matches!(
            recommender.recommend(&req).unwrap_err(),
            RecommendError::InvalidNeighborCount
        ));
    }

    #[test]
    fn test_recommend_request_unknown_user() {
        let recommender = sample_recommender();
        let req = RecommendationRequest::new("ghost", RecommendationStrategy::ContentBased, 5);
        assert!(matches!(
            recommender.recommend(&req).unwrap_err(),
            RecommendError::UserNotFound(_)
        ));
    }

    #[test]
    fn test_concurrent_callers() {
        let recommender = sample_recommender();
        std::thread::scope(|s| {
            for _ in 0..4 {
                let r = recommender.clone();
                s.spawn(move || {
                    assert_eq!(r.recommend_by_content("mixed"), "B");
                    assert_eq!(r.recommend_by_collaborative_filtering("flat", 3), "C");
                });
            }
        });
    }
}
