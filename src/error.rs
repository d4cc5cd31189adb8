use std::error::Error as StdError;
use std::path::{Path, PathBuf};
use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Fatal failures. Probing the project never fails, so these are the only two.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to read config file '{}'", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("failed to write workflow to '{}'", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
}

impl GenerateError {
    pub fn config_read(path: impl AsRef<Path>, source: impl Into<BoxError>) -> Self {
        Self::ConfigRead {
            path: path.as_ref().to_path_buf(),
            source: source.into(),
        }
    }

    pub fn output_write(path: impl AsRef<Path>, source: impl Into<BoxError>) -> Self {
        Self::OutputWrite {
            path: path.as_ref().to_path_buf(),
            source: source.into(),
        }
    }
}
