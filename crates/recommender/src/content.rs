//! Content-based filtering: rank unrated items by cosine similarity to the
//! user's preference profile.
//!
//! The profile lives in attribute space. Each rated item contributes its
//! attribute vector scaled by how far the user's rating sits above or below
//! their own mean, so items liked less than average pull the profile away
//! from their attributes.

use crate::similarity::cosine_similarity;
use crate::store::{is_rated, RatingStore};
use cinematch_core::types::ScoredItem;
use cinematch_core::{RecommendError, RecommendResult};
use ndarray::{Array1, ArrayView1};
use std::cmp::Ordering;
use tracing::debug;

const REASON: &str = "Matches your taste profile";

pub struct ContentBasedRecommender<'a> {
    store: &'a RatingStore,
}

impl<'a> ContentBasedRecommender<'a> {
    pub fn new(store: &'a RatingStore) -> Self {
        Self { store }
    }

    /// Weighted attribute-space taste vector of a user.
    pub fn preference_profile(&self, user: &str) -> RecommendResult<Array1<f64>> {
        self.profile_from(user, self.user_ratings(user)?)
    }

    fn user_ratings(&self, user: &str) -> RecommendResult<ArrayView1<'a, f64>> {
        self.store
            .ratings(user)
            .ok_or_else(|| RecommendError::UserNotFound(user.to_string()))
    }

    fn profile_from(
        &self,
        user: &str,
        ratings: ArrayView1<'_, f64>,
    ) -> RecommendResult<Array1<f64>> {
        let mean =
            mean_rating(ratings).ok_or_else(|| RecommendError::NoRatedItems(user.to_string()))?;

        let mut profile = Array1::<f64>::zeros(self.store.dimension());
        for (idx, &rating) in ratings.indexed_iter() {
            if is_rated(rating) {
                profile.scaled_add(rating - mean, &self.store.attributes_at(idx));
            }
        }
        Ok(profile)
    }

    /// Similarity of every unrated item to the user's profile, in canonical
    /// order. Items with an all-zero attribute vector are skipped.
    ///
    /// Fails with [`RecommendError::DegenerateVector`] when the profile itself
    /// is the zero vector, e.g. every rating equals the user's mean.
    pub fn candidate_scores(&self, user: &str) -> RecommendResult<Vec<(usize, f64)>> {
        let ratings = self.user_ratings(user)?;
        let profile = self.profile_from(user, ratings)?;
        if profile.iter().all(|v| *v == 0.0) {
            debug!(user = %user, "Preference profile is the zero vector");
            return Err(RecommendError::DegenerateVector);
        }

        let mut scores = Vec::new();
        for (idx, &rating) in ratings.indexed_iter() {
            if is_rated(rating) {
                continue;
            }
            match cosine_similarity(profile.view(), self.store.attributes_at(idx)) {
                Ok(similarity) => scores.push((idx, similarity)),
                Err(RecommendError::DegenerateVector) => {
                    debug!(item = %self.store.item_name(idx), "Skipping item with zero attribute norm");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(scores)
    }

    /// The unrated item most similar to the user's profile. Ties go to the
    /// item that comes first in canonical order. `None` when the user has
    /// rated everything.
    pub fn recommend(&self, user: &str) -> RecommendResult<Option<ScoredItem>> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, similarity) in self.candidate_scores(user)? {
            if best.map_or(true, |(_, top)| similarity > top) {
                best = Some((idx, similarity));
            }
        }

        debug!(user = %user, best = ?best, "Content-based pick");
        Ok(best.map(|(idx, score)| self.scored(idx, score)))
    }

    /// Unrated items ranked by profile similarity, best first.
    pub fn rank(
        &self,
        user: &str,
        limit: usize,
        exclude: &[String],
    ) -> RecommendResult<Vec<ScoredItem>> {
        let mut scores: Vec<(usize, f64)> = self
            .candidate_scores(user)?
            .into_iter()
            .filter(|(idx, _)| !exclude.iter().any(|e| e == self.store.item_name(*idx)))
            .collect();

        scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scores.truncate(limit);

        Ok(scores
            .into_iter()
            .map(|(idx, score)| self.scored(idx, score))
            .collect())
    }

    fn scored(&self, idx: usize, score: f64) -> ScoredItem {
        ScoredItem {
            item: self.store.item_name(idx).to_string(),
            score,
            reason: REASON.to_string(),
        }
    }
}

/// Mean over rated slots only; `None` when nothing is rated.
pub fn mean_rating(ratings: ArrayView1<'_, f64>) -> Option<f64> {
    let (sum, count) = ratings
        .iter()
        .filter(|v| is_rated(**v))
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
