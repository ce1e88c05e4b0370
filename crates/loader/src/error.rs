use cinematch_core::RecommendError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Unable to open file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {message}", .path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("{}: missing header line naming the items", .path.display())]
    MissingHeader { path: PathBuf },
}

impl LoadError {
    pub(crate) fn malformed(path: &std::path::Path, line: usize, message: impl Into<String>) -> Self {
        LoadError::Malformed {
            path: path.to_path_buf(),
            line,
            message: message.into(),
        }
    }
}

impl From<LoadError> for RecommendError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Io { ref source, .. } => {
                RecommendError::Io(std::io::Error::new(source.kind(), err.to_string()))
            }
            other => RecommendError::InvalidData(other.to_string()),
        }
    }
}
