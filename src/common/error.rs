use crate::infrastructure::scm::scm_interface::RepoError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KitError {
    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error("File system operation failed: {message}")]
    FileSystemError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("Serialization error: {message}")]
    SerializationError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl KitError {
    pub fn config_error(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::ConfigError {
            message: message.into(),
            path,
        }
    }

    pub fn filesystem_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    pub fn serialization_error_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::SerializationError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether the underlying failure was a precondition check on a path
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Repo(e) if e.is_precondition())
    }
}

impl From<std::io::Error> for KitError {
    fn from(error: std::io::Error) -> Self {
        Self::FileSystemError {
            message: "File system operation failed".to_string(),
            path: None,
            source: Some(error),
        }
    }
}

impl From<serde_yaml::Error> for KitError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::serialization_error_with_source("YAML serialization failed", error)
    }
}

impl From<serde_json::Error> for KitError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization_error_with_source("JSON serialization failed", error)
    }
}
