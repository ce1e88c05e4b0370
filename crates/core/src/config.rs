use crate::error::RecommendResult;
use serde::Deserialize;

/// Root application configuration. Loaded from an optional `cinematch.toml`
/// and environment variables with the prefix `CINEMATCH__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub recommender: RecommenderConfig,
}

/// Locations of the two input tables.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_attributes_path")]
    pub attributes_path: String,
    #[serde(default = "default_ratings_path")]
    pub ratings_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommenderConfig {
    /// Neighbourhood size `k` used when a request does not name one.
    #[serde(default = "default_neighbors")]
    pub neighbors: usize,
    /// Maximum number of items in a ranked response.
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default = "default_model_version")]
    pub model_version: String,
}

// Default functions
fn default_attributes_path() -> String {
    "data/movies_features.txt".to_string()
}
fn default_ratings_path() -> String {
    "data/ranks_matrix.txt".to_string()
}
fn default_neighbors() -> usize {
    5
}
fn default_limit() -> usize {
    10
}
fn default_model_version() -> String {
    "v1.0".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            attributes_path: default_attributes_path(),
            ratings_path: default_ratings_path(),
        }
    }
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            neighbors: default_neighbors(),
            limit: default_limit(),
            model_version: default_model_version(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            recommender: RecommenderConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the named file (extension optional, file
    /// optional) layered under environment variables.
    pub fn load_from(file: &str) -> RecommendResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix("CINEMATCH")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}
