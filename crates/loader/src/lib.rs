//! Whitespace-delimited text loader for item attributes and user ratings.
//!
//! Attributes file — one item per line:
//!
//! ```text
//! Inception 7 9 2 5
//! Amelie 2 3 9 6
//! ```
//!
//! Ratings file — a header naming the items in canonical order, then one
//! user per line. `NA` marks an unrated item:
//!
//! ```text
//! Inception Amelie
//! dana 8 NA
//! eli NA 6
//! ```

pub mod error;
pub mod parse;

pub use error::LoadError;
pub use parse::{parse_item_attributes, parse_user_ratings};

use cinematch_core::{ItemAttributes, RatingSource, RecommendResult, UserRatings};
use std::path::{Path, PathBuf};
use tracing::info;

/// [`RatingSource`] backed by the two text files.
#[derive(Debug, Clone)]
pub struct TextFileSource {
    attributes_path: PathBuf,
    ratings_path: PathBuf,
}

impl TextFileSource {
    pub fn new(attributes_path: impl Into<PathBuf>, ratings_path: impl Into<PathBuf>) -> Self {
        Self {
            attributes_path: attributes_path.into(),
            ratings_path: ratings_path.into(),
        }
    }

    pub fn attributes_path(&self) -> &Path {
        &self.attributes_path
    }

    pub fn ratings_path(&self) -> &Path {
        &self.ratings_path
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl RatingSource for TextFileSource {
    fn load_item_attributes(&self) -> RecommendResult<ItemAttributes> {
        let text = read(&self.attributes_path)?;
        let attributes = parse_item_attributes(&self.attributes_path, &text)?;
        info!(
            path = %self.attributes_path.display(),
            items = attributes.len(),
            "Item attributes loaded"
        );
        Ok(attributes)
    }

    fn load_user_ratings(&self) -> RecommendResult<UserRatings> {
        let text = read(&self.ratings_path)?;
        let ratings = parse_user_ratings(&self.ratings_path, &text)?;
        info!(
            path = %self.ratings_path.display(),
            items = ratings.canonical_order.len(),
            users = ratings.ratings.len(),
            "User ratings loaded"
        );
        Ok(ratings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinematch_core::RecommendError;

    fn write_temp(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("cinematch-{}.txt", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_text_file_source_round_trip() {
        let attrs = write_temp("Inception 7 9\nAmelie 2 3\n");
        let ranks = write_temp("Inception Amelie\ndana 8 NA\n");
        let source = TextFileSource::new(&attrs, &ranks);

        let attributes = source.load_item_attributes().unwrap();
        assert_eq!(attributes["Amelie"], vec![2.0, 3.0]);
        let ratings = source.load_user_ratings().unwrap();
        assert_eq!(ratings.canonical_order, vec!["Inception", "Amelie"]);
        assert_eq!(ratings.ratings["dana"], vec![8.0, 0.0]);

        std::fs::remove_file(attrs).unwrap();
        std::fs::remove_file(ranks).unwrap();
    }

    #[test]
    fn test_missing_file_names_path() {
        let source = TextFileSource::new("/nonexistent/attrs.txt", "/nonexistent/ranks.txt");
        let err = source.load_item_attributes().unwrap_err();
        assert!(matches!(err, RecommendError::Io(_)));
        assert!(err.to_string().contains("Unable to open file /nonexistent/attrs.txt"));
    }
}
