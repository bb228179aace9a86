//! Error types.

use crate::family::FamilyFilter;
use thiserror::Error;

/// Result alias for resolver operations.
pub type Result<T> = std::result::Result<T, ResolverError>;

/// Errors that abort a run.
///
/// Failures of individual best-effort steps are not errors; they are
/// recorded in the [`RunReport`](crate::RunReport) instead.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// Filesystem I/O failed (typically `PermissionDenied` on `/etc`).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The process is not running with an effective UID of 0.
    #[error("root privileges are required")]
    NotRoot,

    /// The address-family filter removed every configured server.
    #[error("no DNS servers left after applying the {filter} filter")]
    NoServers {
        /// The filter that emptied the list.
        filter: FamilyFilter,
    },

    /// A required option was empty.
    #[error("{option} must not be empty")]
    EmptyOption {
        /// The command-line name of the option.
        option: &'static str,
    },
}

impl ResolverError {
    /// Returns `true` if the underlying I/O error is `PermissionDenied`.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn permission_denied_is_detected() {
        let err = ResolverError::from(io::Error::new(io::ErrorKind::PermissionDenied, "x"));
        assert!(err.is_permission_denied());
        let err = ResolverError::from(io::Error::new(io::ErrorKind::NotFound, "x"));
        assert!(!err.is_permission_denied());
        assert!(!ResolverError::NotRoot.is_permission_denied());
    }

    #[test]
    fn empty_option_names_the_flag() {
        let err = ResolverError::EmptyOption { option: "--domain" };
        assert_eq!(err.to_string(), "--domain must not be empty");
    }
}
