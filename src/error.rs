//! # Error Taxonomy
//!
//! Typed errors for the fetch → identify → decide → apply pipeline. Each
//! variant maps to a stable condition reason via
//! [`SyncError::condition_reason`], and terminal variants (those only a spec
//! edit can fix) are flagged by [`SyncError::is_terminal`] so the reconciler
//! does not busy-retry them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Not exactly one of git/configMapRef/secretRef was populated.
    /// Terminal: only a spec edit can fix it.
    #[error("exactly one source must be specified (git, configMapRef, or secretRef), found {found}")]
    InvalidSource { found: usize },

    /// The referenced in-cluster source object does not exist.
    #[error("{kind} {namespace}/{name} not found")]
    SourceNotFound {
        kind: &'static str,
        namespace: String,
        name: String,
    },

    /// Git clone/fetch/checkout failure, including network failures and
    /// unresolvable revisions.
    #[error("git sync failed for {url}: {reason}")]
    GitSyncFailed { url: String, reason: String },

    /// The cached working directory failed fetch, was wiped, and the clean
    /// re-sync failed again. Persistent corruption (for example a permission
    /// failure) rather than a transient fetch error.
    #[error("repository cache for {url} is corrupted and could not be rebuilt: {reason}")]
    RepositoryCacheCorrupted { url: String, reason: String },

    /// The auth secret is missing, or does not carry credentials under any
    /// of the accepted key names.
    #[error("credentials secret {namespace}/{name}: {reason}")]
    MissingCredentials {
        namespace: String,
        name: String,
        reason: String,
    },

    /// The server-side dry-run rejected a manifest document before the real
    /// apply was attempted.
    #[error("dry-run validation failed for {manifest}: {reason}")]
    ApplyValidationFailed { manifest: String, reason: String },

    /// The real apply was rejected (or a manifest could not be read/parsed).
    #[error("apply failed for {manifest}: {reason}")]
    ApplyFailed { manifest: String, reason: String },

    /// `refreshInterval` could not be parsed. Terminal: the resource stays
    /// pending until its spec is edited.
    #[error("invalid refreshInterval {value:?}: {reason}")]
    InvalidRefreshInterval { value: String, reason: String },

    /// Kubernetes API errors surfaced while reading source objects.
    #[error("kubernetes api error: {0}")]
    Api(#[from] kube::Error),

    /// Filesystem errors while materializing source content.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Stable reason code recorded on the `Degraded` condition.
    #[must_use]
    pub fn condition_reason(&self) -> &'static str {
        match self {
            SyncError::InvalidSource { .. } => "InvalidSource",
            SyncError::SourceNotFound { .. }
            | SyncError::GitSyncFailed { .. }
            | SyncError::MissingCredentials { .. }
            | SyncError::Api(_)
            | SyncError::Io(_) => "SourceFetchFailed",
            SyncError::RepositoryCacheCorrupted { .. } => "RepositoryCacheCorrupted",
            SyncError::ApplyValidationFailed { .. } => "ApplyValidationFailed",
            SyncError::ApplyFailed { .. } => "ApplyFailed",
            SyncError::InvalidRefreshInterval { .. } => "InvalidRefreshInterval",
        }
    }

    /// Terminal errors are surfaced via the condition only and must not be
    /// requeued: retrying cannot succeed until the spec is edited, which
    /// itself triggers a new reconciliation.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SyncError::InvalidSource { .. } | SyncError::InvalidRefreshInterval { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_errors() {
        assert!(SyncError::InvalidSource { found: 2 }.is_terminal());
        assert!(SyncError::InvalidRefreshInterval {
            value: "bogus".into(),
            reason: "nope".into()
        }
        .is_terminal());
        assert!(!SyncError::GitSyncFailed {
            url: "x".into(),
            reason: "y".into()
        }
        .is_terminal());
    }

    #[test]
    fn test_condition_reasons_are_stable() {
        assert_eq!(
            SyncError::InvalidSource { found: 0 }.condition_reason(),
            "InvalidSource"
        );
        assert_eq!(
            SyncError::SourceNotFound {
                kind: "ConfigMap",
                namespace: "default".into(),
                name: "missing".into()
            }
            .condition_reason(),
            "SourceFetchFailed"
        );
        assert_eq!(
            SyncError::RepositoryCacheCorrupted {
                url: "u".into(),
                reason: "r".into()
            }
            .condition_reason(),
            "RepositoryCacheCorrupted"
        );
    }
}
