//! # Source Resolution
//!
//! Classifies the source declared on a `ConfigSync` and materializes it as a
//! local directory of manifest files with a deterministic revision string.
//! Exactly one source kind may be set; anything else is rejected before any
//! network traffic happens.

pub mod configmap;
pub mod git;
pub mod secret;

use std::path::PathBuf;
use std::sync::Arc;

use kube::Client;
use tempfile::TempDir;
use tracing::debug;

use crate::crd::{GitSource, ObjectRef, SourceSpec};
use crate::error::SyncError;

pub use configmap::{config_map_revision, fetch_config_map};
pub use git::{RepositoryCache, SyncedRepository};
pub use secret::{fetch_secret, secret_revision};

/// The single source kind a spec declares.
#[derive(Debug)]
pub enum SourceKind<'a> {
    Git(&'a GitSource),
    ConfigMap(&'a ObjectRef),
    Secret(&'a ObjectRef),
}

/// A source materialized on local disk.
///
/// For ConfigMap and Secret sources the backing directory is ephemeral and is
/// deleted when this value drops. Git sources point into the persistent
/// repository cache and carry no temp dir.
#[derive(Debug)]
pub struct ResolvedSource {
    /// Deterministic content identifier: commit hash for git, content hash
    /// for ConfigMap and Secret sources.
    pub revision: String,
    /// Directory containing the manifest files to apply.
    pub path: PathBuf,
    _temp_dir: Option<TempDir>,
}

/// Determine which source kind the spec declares.
///
/// # Errors
///
/// Returns [`SyncError::InvalidSource`] unless exactly one of `git`,
/// `configMapRef`, `secretRef` is set.
pub fn classify(spec: &SourceSpec) -> Result<SourceKind<'_>, SyncError> {
    match (&spec.git, &spec.config_map_ref, &spec.secret_ref) {
        (Some(git), None, None) => Ok(SourceKind::Git(git)),
        (None, Some(cm), None) => Ok(SourceKind::ConfigMap(cm)),
        (None, None, Some(sec)) => Ok(SourceKind::Secret(sec)),
        (git, cm, sec) => {
            let found = [git.is_some(), cm.is_some(), sec.is_some()]
                .iter()
                .filter(|set| **set)
                .count();
            Err(SyncError::InvalidSource { found })
        }
    }
}

/// Resolve the declared source into a local directory plus revision.
pub async fn resolve(
    client: &Client,
    repos: &Arc<RepositoryCache>,
    namespace: &str,
    spec: &SourceSpec,
) -> Result<ResolvedSource, SyncError> {
    match classify(spec)? {
        SourceKind::Git(git) => {
            let synced = repos.sync_repository(client, git, namespace).await?;
            let path = match git.path.as_deref().filter(|p| !p.is_empty() && *p != ".") {
                Some(sub) => {
                    let candidate = synced.workdir.join(sub.trim_start_matches('/'));
                    if !candidate.is_dir() {
                        return Err(SyncError::GitSyncFailed {
                            url: git.repo_url.clone(),
                            reason: format!(
                                "path {sub:?} does not exist in revision {}",
                                synced.revision
                            ),
                        });
                    }
                    candidate
                }
                None => synced.workdir,
            };
            debug!(revision = %synced.revision, path = %path.display(), "resolved git source");
            Ok(ResolvedSource {
                revision: synced.revision,
                path,
                _temp_dir: None,
            })
        }
        SourceKind::ConfigMap(r#ref) => {
            let (revision, dir) = fetch_config_map(client, r#ref, namespace).await?;
            Ok(ResolvedSource {
                revision,
                path: dir.path().to_path_buf(),
                _temp_dir: Some(dir),
            })
        }
        SourceKind::Secret(r#ref) => {
            let (revision, dir) = fetch_secret(client, r#ref, namespace).await?;
            Ok(ResolvedSource {
                revision,
                path: dir.path().to_path_buf(),
                _temp_dir: Some(dir),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_ref(name: &str) -> ObjectRef {
        ObjectRef {
            name: name.to_string(),
            namespace: None,
        }
    }

    fn git_source() -> GitSource {
        GitSource {
            repo_url: "https://github.com/org/repo.git".to_string(),
            path: None,
            branch: None,
            revision: None,
            auth_method: crate::crd::GitAuthMethod::None,
            auth_secret_ref: None,
        }
    }

    #[test]
    fn test_classify_single_kind() {
        let spec = SourceSpec {
            git: Some(git_source()),
            config_map_ref: None,
            secret_ref: None,
        };
        assert!(matches!(classify(&spec), Ok(SourceKind::Git(_))));

        let spec = SourceSpec {
            git: None,
            config_map_ref: Some(object_ref("app-config")),
            secret_ref: None,
        };
        assert!(matches!(classify(&spec), Ok(SourceKind::ConfigMap(_))));
    }

    #[test]
    fn test_classify_rejects_empty_source() {
        let spec = SourceSpec {
            git: None,
            config_map_ref: None,
            secret_ref: None,
        };
        assert!(matches!(
            classify(&spec),
            Err(SyncError::InvalidSource { found: 0 })
        ));
    }

    #[test]
    fn test_classify_rejects_multiple_sources() {
        let spec = SourceSpec {
            git: Some(git_source()),
            config_map_ref: Some(object_ref("app-config")),
            secret_ref: None,
        };
        assert!(matches!(
            classify(&spec),
            Err(SyncError::InvalidSource { found: 2 })
        ));

        let spec = SourceSpec {
            git: Some(git_source()),
            config_map_ref: Some(object_ref("app-config")),
            secret_ref: Some(object_ref("app-secret")),
        };
        assert!(matches!(
            classify(&spec),
            Err(SyncError::InvalidSource { found: 3 })
        ));
    }
}
