//! Movie recommendation engine — content-based filtering over a user
//! preference profile and item-based collaborative filtering with
//! k-nearest-neighbour weighted prediction.

pub mod collaborative;
pub mod content;
pub mod engine;
pub mod similarity;
pub mod store;

pub use collaborative::CollaborativeFilteringPredictor;
pub use content::ContentBasedRecommender;
pub use engine::Recommender;
pub use similarity::cosine_similarity;
pub use store::RatingStore;
