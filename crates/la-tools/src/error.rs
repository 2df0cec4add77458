use std::path::PathBuf;

use la_volume::VolumeError;
use thiserror::Error;

/// Fatal errors of the adjacency tool. None are retried.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("configuration error in {}: {message}", .path.display())]
    Configuration { path: PathBuf, message: String },

    #[error("cannot read label volume {}", .path.display())]
    VolumeRead {
        path: PathBuf,
        #[source]
        source: VolumeError,
    },

    #[error("cannot write adjacency file {}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ToolError {
    pub(crate) fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Configuration {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OutputWrite {
            path: path.into(),
            source,
        }
    }
}
