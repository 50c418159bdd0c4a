use std::path::PathBuf;

use thiserror::Error;

/// Failures of the collaborator layers (content store, config, service).
/// The TOC core never fails.
#[derive(Debug, Error)]
pub enum PagetocError {
    #[error("{} not found", .path.display())]
    NotFound { path: PathBuf },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: invalid front-matter: {reason}", .path.display())]
    FrontMatter { path: PathBuf, reason: String },

    #[error("{}: invalid config: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },
}

impl PagetocError {
    /// Map an I/O error on `path`, turning `NotFound` into its own variant.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            PagetocError::NotFound { path }
        } else {
            PagetocError::Io { path, source }
        }
    }
}
