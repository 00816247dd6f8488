//! # ConfigMap Source
//!
//! Materializes an in-cluster ConfigMap as a directory of files and computes
//! a deterministic content identifier for it.

use std::collections::BTreeMap;
use std::os::unix::fs::PermissionsExt;

use k8s_openapi::api::core::v1::ConfigMap;
use kube::{Api, Client};
use sha2::{Digest, Sha256};
use tempfile::TempDir;
use tracing::{debug, info};

use crate::crd::ObjectRef;
use crate::error::SyncError;

/// Deterministic content identifier for ConfigMap data.
///
/// SHA-256 over `key \n value \n` for every entry in lexicographic key order
/// (`BTreeMap` iteration order). Independent of the object's internal entry
/// order; changes iff the key set or any value changes.
#[must_use]
pub fn config_map_revision(data: &BTreeMap<String, String>) -> String {
    let mut hasher = Sha256::new();
    for (key, value) in data {
        hasher.update(key.as_bytes());
        hasher.update(b"\n");
        hasher.update(value.as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}

/// Fetch a ConfigMap, write its `data` entries into a fresh temp dir (one
/// file per key, ordinary permissions), and return the content identifier
/// plus the directory. The directory is removed when the returned `TempDir`
/// is dropped.
pub async fn fetch_config_map(
    client: &Client,
    r#ref: &ObjectRef,
    fallback_namespace: &str,
) -> Result<(String, TempDir), SyncError> {
    let namespace = r#ref.namespace.as_deref().unwrap_or(fallback_namespace);
    let api: Api<ConfigMap> = Api::namespaced(client.clone(), namespace);

    let cm = api.get(&r#ref.name).await.map_err(|e| match e {
        kube::Error::Api(ref ae) if ae.code == 404 => SyncError::SourceNotFound {
            kind: "ConfigMap",
            namespace: namespace.to_string(),
            name: r#ref.name.clone(),
        },
        other => SyncError::Api(other),
    })?;
    info!(namespace, name = %r#ref.name, "fetched ConfigMap source");

    let data = cm.data.unwrap_or_default();

    let dir = tempfile::Builder::new()
        .prefix("config-sync-configmap-")
        .tempdir()?;

    for (filename, contents) in &data {
        let file_path = dir.path().join(filename);
        tokio::fs::write(&file_path, contents.as_bytes()).await?;
        tokio::fs::set_permissions(&file_path, std::fs::Permissions::from_mode(0o644)).await?;
        debug!(path = %file_path.display(), "wrote ConfigMap entry");
    }

    Ok((config_map_revision(&data), dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_revision_matches_manual_hash() {
        // identifier = hash of "app.yaml\n" + "a: 1" + "\n"
        let mut hasher = Sha256::new();
        hasher.update(b"app.yaml\na: 1\n");
        let expected = format!("{:x}", hasher.finalize());

        assert_eq!(config_map_revision(&data(&[("app.yaml", "a: 1")])), expected);
    }

    #[test]
    fn test_revision_is_order_independent() {
        // BTreeMap sorts keys, so any insertion order hashes identically
        let forward = data(&[("a.yaml", "1"), ("b.yaml", "2"), ("c.yaml", "3")]);
        let reversed = data(&[("c.yaml", "3"), ("b.yaml", "2"), ("a.yaml", "1")]);
        assert_eq!(config_map_revision(&forward), config_map_revision(&reversed));
    }

    #[test]
    fn test_revision_changes_with_value() {
        assert_ne!(
            config_map_revision(&data(&[("app.yaml", "a: 1")])),
            config_map_revision(&data(&[("app.yaml", "a: 2")]))
        );
    }

    #[test]
    fn test_revision_distinguishes_key_value_boundary() {
        // "ab" -> "c" and "a" -> "bc"... the newline separators keep these apart
        assert_ne!(
            config_map_revision(&data(&[("ab", "c")])),
            config_map_revision(&data(&[("a", "bc")]))
        );
    }
}
