use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScourError {
    // Validation
    #[error("please enter a search term")]
    EmptyQuery,

    #[error("location does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("max results must be greater than zero (got {0})")]
    InvalidMaxResults(usize),

    // Traversal
    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("symlink loop at {}", .0.display())]
    SymlinkLoop(PathBuf),

    #[error("IO error at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Runtime
    #[error("source error: {0}")]
    Source(String),

    #[error("search error: {0}")]
    Search(String),

    #[error("search worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("failed to spawn search worker")]
    Spawn(#[source] std::io::Error),

    // OS actions
    #[error("cannot open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: opener::OpenError,
    },

    #[error("cannot open folder for {}", path.display())]
    Reveal {
        path: PathBuf,
        #[source]
        source: opener::OpenError,
    },
}

impl ScourError {
    /// The path this error occurred at, if applicable.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::RootNotFound(p)
            | Self::PermissionDenied(p)
            | Self::NotFound(p)
            | Self::SymlinkLoop(p)
            | Self::Io { path: p, .. }
            | Self::Open { path: p, .. }
            | Self::Reveal { path: p, .. } => Some(p),
            _ => None,
        }
    }

    /// Whether the walk can continue after this error.
    ///
    /// Recoverable errors (permission denied, symlink loops, IO on a single
    /// listing) are skipped by the engine. Anything else reaching the engine
    /// ends the current search with an `Error` message.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied(_) | Self::SymlinkLoop(_) | Self::Io { .. }
        )
    }

    /// Whether this error rejected a request before any worker was spawned.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyQuery | Self::RootNotFound(_) | Self::InvalidMaxResults(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumeration_errors_are_recoverable() {
        assert!(ScourError::PermissionDenied("/x".into()).is_recoverable());
        assert!(ScourError::SymlinkLoop("/x".into()).is_recoverable());
        assert!(!ScourError::Source("boom".into()).is_recoverable());
        assert!(!ScourError::NotFound("/x".into()).is_recoverable());
    }

    #[test]
    fn validation_errors_are_classified() {
        assert!(ScourError::EmptyQuery.is_validation());
        assert!(ScourError::InvalidMaxResults(0).is_validation());
        assert!(!ScourError::WorkerPanicked("x".into()).is_validation());
    }

    #[test]
    fn messages_name_the_path() {
        let err = ScourError::RootNotFound("/nope".into());
        assert_eq!(err.to_string(), "location does not exist: /nope");
        assert_eq!(err.path(), Some(&PathBuf::from("/nope")));
    }
}
