use std::io;

/// Failure reported by the directory-listing collaborator.
///
/// The crawler decides whether to stay silent or log based on the variant,
/// never on message text.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryAccessError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("path not found: {0}")]
    NotFound(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Other(String),
}

impl DirectoryAccessError {
    /// Classifies an `io::Error` raised while listing `path`.
    pub fn from_io(path: &str, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_string()),
            io::ErrorKind::NotFound => Self::NotFound(path.to_string()),
            _ => Self::Io {
                path: path.to_string(),
                source: error,
            },
        }
    }

    /// Permission failures are absorbed silently during crawling; every
    /// other failure is logged and counted.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }
}
