//! Item-based collaborative filtering.
//!
//! A user's rating for an unseen item is predicted from their own ratings on
//! the `k` rated items whose attribute vectors are most similar to it,
//! weighted by that similarity.

use crate::similarity::cosine_similarity;
use crate::store::{is_rated, RatingStore};
use cinematch_core::types::ScoredItem;
use cinematch_core::{RecommendError, RecommendResult};
use ndarray::ArrayView1;
use std::cmp::Ordering;
use tracing::debug;

const REASON: &str = "Similar to movies you rated highly";

/// Weight sums at or below this magnitude are treated as zero.
const MIN_WEIGHT_SUM: f64 = f64::EPSILON;

/// A rated item selected as a neighbour of the prediction target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub item: usize,
    pub similarity: f64,
    pub rating: f64,
}

pub struct CollaborativeFilteringPredictor<'a> {
    store: &'a RatingStore,
}

impl<'a> CollaborativeFilteringPredictor<'a> {
    pub fn new(store: &'a RatingStore) -> Self {
        Self { store }
    }

    /// The `k` rated items most similar to `item`, most similar first.
    ///
    /// Unrated items are never candidates. Rated items whose similarity is
    /// undefined (zero attribute norm on either side) are left out. Equal
    /// similarities keep canonical order.
    pub fn neighbors(&self, item: &str, user: &str, k: usize) -> RecommendResult<Vec<Neighbor>> {
        let (target, ratings) = self.lookup(item, user, k)?;
        self.nearest(target, ratings, k)
    }

    /// Similarity-weighted average of the user's ratings over the `k` nearest
    /// rated neighbours of `item`.
    ///
    /// Fails with [`RecommendError::DegeneratePrediction`] when the selected
    /// similarities sum to zero (including an empty neighbourhood).
    pub fn predict(&self, item: &str, user: &str, k: usize) -> RecommendResult<f64> {
        let (target, ratings) = self.lookup(item, user, k)?;
        let neighbors = self.nearest(target, ratings, k)?;
        let score = weighted_score(&neighbors).ok_or_else(|| {
            RecommendError::DegeneratePrediction {
                item: item.to_string(),
            }
        })?;

        debug!(
            item = %item,
            user = %user,
            k = k,
            neighbors = neighbors.len(),
            score = score,
            "Predicted score"
        );
        Ok(score)
    }

    fn lookup(
        &self,
        item: &str,
        user: &str,
        k: usize,
    ) -> RecommendResult<(usize, ArrayView1<'a, f64>)> {
        if k == 0 {
            return Err(RecommendError::InvalidNeighborCount);
        }
        let ratings = self.user_ratings(user)?;
        let target = self
            .store
            .item_index(item)
            .ok_or_else(|| RecommendError::ItemNotFound(item.to_string()))?;
        Ok((target, ratings))
    }

    fn user_ratings(&self, user: &str) -> RecommendResult<ArrayView1<'a, f64>> {
        self.store
            .ratings(user)
            .ok_or_else(|| RecommendError::UserNotFound(user.to_string()))
    }

    fn nearest(
        &self,
        target: usize,
        ratings: ArrayView1<'_, f64>,
        k: usize,
    ) -> RecommendResult<Vec<Neighbor>> {
        let target_attributes = self.store.attributes_at(target);

        let mut candidates = Vec::new();
        for (idx, &rating) in ratings.indexed_iter() {
            if !is_rated(rating) {
                continue;
            }
            match cosine_similarity(target_attributes, self.store.attributes_at(idx)) {
                Ok(similarity) => candidates.push(Neighbor {
                    item: idx,
                    similarity,
                    rating,
                }),
                Err(RecommendError::DegenerateVector) => continue,
                Err(e) => return Err(e),
            }
        }

        candidates.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });
        candidates.truncate(k);
        Ok(candidates)
    }

    /// Predicted score for every unrated item, in canonical order. Items with
    /// no defined prediction are left out.
    fn predictions(&self, user: &str, k: usize) -> RecommendResult<Vec<(usize, f64)>> {
        if k == 0 {
            return Err(RecommendError::InvalidNeighborCount);
        }
        let ratings = self.user_ratings(user)?;

        let mut scores = Vec::new();
        for (idx, &rating) in ratings.indexed_iter() {
            if is_rated(rating) {
                continue;
            }
            match weighted_score(&self.nearest(idx, ratings, k)?) {
                Some(score) => scores.push((idx, score)),
                None => {
                    debug!(item = %self.store.item_name(idx), user = %user, "No defined prediction");
                }
            }
        }
        Ok(scores)
    }

    /// The unrated item with the highest predicted score.
    ///
    /// The running best starts at 0, so an item is only picked when its
    /// prediction is strictly positive. Ties go to canonical order.
    pub fn recommend(&self, user: &str, k: usize) -> RecommendResult<Option<ScoredItem>> {
        let mut best_score = 0.0;
        let mut best = None;
        for (idx, score) in self.predictions(user, k)? {
            if score > best_score {
                best_score = score;
                best = Some(idx);
            }
        }

        Ok(best.map(|idx| self.scored(idx, best_score)))
    }

    /// Unrated items with a positive prediction, best first.
    pub fn rank(
        &self,
        user: &str,
        k: usize,
        limit: usize,
        exclude: &[String],
    ) -> RecommendResult<Vec<ScoredItem>> {
        let mut scores: Vec<(usize, f64)> = self
            .predictions(user, k)?
            .into_iter()
            .filter(|(idx, score)| {
                *score > 0.0 && !exclude.iter().any(|e| e == self.store.item_name(*idx))
            })
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

/// `None` when the similarities sum to zero.
fn weighted_score(neighbors: &[Neighbor]) -> Option<f64> {
    let (weighted, weight) = neighbors
        .iter()
        .fold((0.0_f64, 0.0_f64), |(weighted, weight), n| {
            (weighted + n.similarity * n.rating, weight + n.similarity)
        });
    (weight.abs() > MIN_WEIGHT_SUM).then(|| weighted / weight)
}
