use thiserror::Error;

pub type RecommendResult<T> = Result<T, RecommendError>;

#[derive(Error, Debug)]
pub enum RecommendError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("User {0} has not rated any items")]
    NoRatedItems(String),

    /// One of the inputs to a cosine similarity has zero norm.
    #[error("Degenerate vector: zero norm")]
    DegenerateVector,

    #[error("Dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// The selected neighbours' similarities sum to zero.
    #[error("Degenerate prediction for item {item}: neighbour similarities sum to zero")]
    DegeneratePrediction { item: String },

    #[error("Neighbour count must be positive")]
    InvalidNeighborCount,

    #[error("Invalid rating data: {0}")]
    InvalidData(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RecommendError {
    /// Lookup failures (as opposed to arithmetic or data failures).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RecommendError::UserNotFound(_) | RecommendError::ItemNotFound(_)
        )
    }
}

impl From<config::ConfigError> for RecommendError {
    fn from(err: config::ConfigError) -> Self {
        RecommendError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found() {
        assert!(RecommendError::UserNotFound("u".into()).is_not_found());
        assert!(RecommendError::ItemNotFound("i".into()).is_not_found());
        assert!(!RecommendError::DegenerateVector.is_not_found());
        assert!(!RecommendError::NoRatedItems("u".into()).is_not_found());
    }

    #[test]
    fn test_display() {
        let err = RecommendError::DegeneratePrediction {
            item: "Heat".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Degenerate prediction for item Heat: neighbour similarities sum to zero"
        );
        let err = RecommendError::DimensionMismatch { left: 3, right: 4 };
        assert_eq!(err.to_string(), "Dimension mismatch: 3 vs 4");
    }

    #[test]
    fn test_from_config_error() {
        let err: RecommendError = config::ConfigError::NotFound("data".to_string()).into();
        assert!(matches!(err, RecommendError::Config(_)));
        assert!(err.to_string().starts_with("Configuration error:"));
    }
}
