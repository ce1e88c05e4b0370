//! Immutable in-memory rating store.
//!
//! Item attributes and user ratings are held as dense matrices whose rows and
//! columns are addressed through name -> index tables built once at load
//! time. The column order of the rating matrix is the canonical item order,
//! so a rating can never drift away from the item it belongs to.

use cinematch_core::{ItemAttributes, RatingSource, RecommendError, RecommendResult, UserRatings};
use ndarray::{aview1, Array2, ArrayView1};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

/// Whether a rating slot holds an explicit rating.
#[inline]
pub fn is_rated(value: f64) -> bool {
    value != 0.0
}

#[derive(Debug, Clone)]
pub struct RatingStore {
    /// Canonical item order: index -> item name.
    items: Vec<String>,
    item_index: HashMap<String, usize>,
    /// Users sorted by name.
    users: Vec<String>,
    user_index: HashMap<String, usize>,
    /// items x D
    attributes: Array2<f64>,
    /// users x items
    ratings: Array2<f64>,
}

impl RatingStore {
    /// Load both tables from a source and build the store.
    pub fn load<S: RatingSource + ?Sized>(source: &S) -> RecommendResult<Self> {
        let attributes = source.load_item_attributes()?;
        let ratings = source.load_user_ratings()?;
        Self::from_parts(attributes, ratings)
    }

    /// Validate and index the two tables.
    pub fn from_parts(attributes: ItemAttributes, ratings: UserRatings) -> RecommendResult<Self> {
        let UserRatings {
            canonical_order,
            ratings: user_ratings,
        } = ratings;

        if canonical_order.is_empty() {
            return Err(RecommendError::InvalidData(
                "canonical item order is empty".to_string(),
            ));
        }

        let mut item_index = HashMap::with_capacity(canonical_order.len());
        for (idx, item) in canonical_order.iter().enumerate() {
            if item_index.insert(item.clone(), idx).is_some() {
                return Err(RecommendError::InvalidData(format!(
                    "item {item} appears twice in the canonical order"
                )));
            }
        }

        let dimension = attributes
            .get(&canonical_order[0])
            .map(Vec::len)
            .ok_or_else(|| missing_attributes(&canonical_order[0]))?;
        if dimension == 0 {
            return Err(RecommendError::InvalidData(
                "attribute vectors are empty".to_string(),
            ));
        }

        let mut attribute_matrix = Array2::<f64>::zeros((canonical_order.len(), dimension));
        for (idx, item) in canonical_order.iter().enumerate() {
            let values = attributes.get(item).ok_or_else(|| missing_attributes(item))?;
            if values.len() != dimension {
                return Err(RecommendError::InvalidData(format!(
                    "item {item} has {} attributes, expected {dimension}",
                    values.len()
                )));
            }
            check_finite(values, || format!("attributes of item {item}"))?;
            if values.iter().all(|v| *v == 0.0) {
                warn!(item = %item, "Item has an all-zero attribute vector and will never be scored");
            }
            attribute_matrix.row_mut(idx).assign(&aview1(values));
        }

        let known: HashSet<&String> = canonical_order.iter().collect();
        let dropped = attributes.keys().filter(|name| !known.contains(name)).count();
        if dropped > 0 {
            warn!(
                dropped = dropped,
                "Items with attributes but no rating column were dropped"
            );
        }

        let mut users: Vec<String> = user_ratings.keys().cloned().collect();
        users.sort();
        let user_index: HashMap<String, usize> = users
            .iter()
            .enumerate()
            .map(|(idx, user)| (user.clone(), idx))
            .collect();

        let mut rating_matrix = Array2::<f64>::zeros((users.len(), canonical_order.len()));
        for (idx, user) in users.iter().enumerate() {
            let values = &user_ratings[user];
            if values.len() != canonical_order.len() {
                return Err(RecommendError::InvalidData(format!(
                    "user {user} has {} ratings, expected {}",
                    values.len(),
                    canonical_order.len()
                )));
            }
            check_finite(values, || format!("ratings of user {user}"))?;
            rating_matrix.row_mut(idx).assign(&aview1(values));
        }

        info!(
            items = canonical_order.len(),
            users = users.len(),
            dimension = dimension,
            "Rating store loaded"
        );

        Ok(Self {
            items: canonical_order,
            item_index,
            users,
            user_index,
            attributes: attribute_matrix,
            ratings: rating_matrix,
        })
    }

    /// Items in canonical order.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Users sorted by name.
    pub fn users(&self) -> &[String] {
        &self.users
    }

    /// Attribute dimensionality `D`.
    pub fn dimension(&self) -> usize {
        self.attributes.ncols()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn item_index(&self, item: &str) -> Option<usize> {
        self.item_index.get(item).copied()
    }

    pub fn user_index(&self, user: &str) -> Option<usize> {
        self.user_index.get(user).copied()
    }

    /// Name of the item at a canonical index.
    ///
    /// Panics if `idx` is out of range; indices come from this store.
    pub fn item_name(&self, idx: usize) -> &str {
        &self.items[idx]
    }

    pub fn attributes(&self, item: &str) -> Option<ArrayView1<'_, f64>> {
        self.item_index(item).map(|idx| self.attributes.row(idx))
    }

    pub fn attributes_at(&self, idx: usize) -> ArrayView1<'_, f64> {
        self.attributes.row(idx)
    }

    pub fn ratings(&self, user: &str) -> Option<ArrayView1<'_, f64>> {
        self.user_index(user).map(|idx| self.ratings.row(idx))
    }

    pub fn ratings_at(&self, idx: usize) -> ArrayView1<'_, f64> {
        self.ratings.row(idx)
    }

    /// Number of items the user has rated.
    pub fn rated_count(&self, user: &str) -> Option<usize> {
        self.ratings(user)
            .map(|row| row.iter().filter(|v| is_rated(**v)).count())
    }
}

fn missing_attributes(item: &str) -> RecommendError {
    RecommendError::InvalidData(format!("item {item} has no attribute vector"))
}

fn check_finite(values: &[f64], what: impl FnOnce() -> String) -> RecommendResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(RecommendError::InvalidData(format!(
            "{} contain a non-finite value",
            what()
        )))
    }
}
