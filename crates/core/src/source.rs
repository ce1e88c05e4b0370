//! Contract between the recommender core and whatever produces its data.
//!
//! The core never touches raw file content. A [`RatingSource`] hands over the
//! item attribute table and the user rating table; the store validates and
//! indexes them once.

use crate::error::RecommendResult;
use std::collections::HashMap;

/// Item name -> attribute vector. Every vector has the same length.
pub type ItemAttributes = HashMap<String, Vec<f64>>;

/// User ratings aligned to a canonical item ordering. `0.0` means "not rated".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserRatings {
    /// Fixed index -> item name lookup shared by every rating vector.
    pub canonical_order: Vec<String>,
    pub ratings: HashMap<String, Vec<f64>>,
}

impl UserRatings {
    pub fn new(canonical_order: Vec<String>) -> Self {
        Self {
            canonical_order,
            ratings: HashMap::new(),
        }
    }

    pub fn with_user(mut self, user: impl Into<String>, ratings: Vec<f64>) -> Self {
        self.ratings.insert(user.into(), ratings);
        self
    }
}

/// Producer of the two tables the recommender is built from.
pub trait RatingSource {
    fn load_item_attributes(&self) -> RecommendResult<ItemAttributes>;

    fn load_user_ratings(&self) -> RecommendResult<UserRatings>;
}
