//! # Secret Source
//!
//! Materializes an in-cluster Secret as a directory of files with restricted
//! permissions and computes a deterministic content identifier. Secret values
//! never appear in logs or error messages.

use std::collections::BTreeMap;
use std::os::unix::fs::PermissionsExt;

use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::{Api, Client};
use sha2::{Digest, Sha256};
use tempfile::TempDir;
use tracing::{debug, info};

use crate::crd::ObjectRef;
use crate::error::SyncError;

/// Deterministic content identifier for Secret data.
///
/// SHA-256 over `key \n len(value) \n hex(value) \n` in lexicographic key
/// order. The length field keeps distinct byte layouts from colliding and the
/// hex encoding keeps raw secret bytes out of the hash input framing.
#[must_use]
pub fn secret_revision(data: &BTreeMap<String, ByteString>) -> String {
    let mut hasher = Sha256::new();
    for (key, value) in data {
        hasher.update(key.as_bytes());
        hasher.update(b"\n");
        hasher.update(value.0.len().to_string().as_bytes());
        hasher.update(b"\n");
        for b in &value.0 {
            hasher.update(format!("{b:02x}").as_bytes());
        }
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}

/// Fetch a Secret, write its decoded `data` entries into a fresh temp dir
/// (one file per key, owner-only permissions), and return the content
/// identifier plus the directory.
pub async fn fetch_secret(
    client: &Client,
    r#ref: &ObjectRef,
    fallback_namespace: &str,
) -> Result<(String, TempDir), SyncError> {
    let namespace = r#ref.namespace.as_deref().unwrap_or(fallback_namespace);
    let api: Api<Secret> = Api::namespaced(client.clone(), namespace);

    let secret = api.get(&r#ref.name).await.map_err(|e| match e {
        kube::Error::Api(ref ae) if ae.code == 404 => SyncError::SourceNotFound {
            kind: "Secret",
            namespace: namespace.to_string(),
            name: r#ref.name.clone(),
        },
        other => SyncError::Api(other),
    })?;
    info!(namespace, name = %r#ref.name, "fetched Secret source");

    let data = secret.data.unwrap_or_default();

    let dir = tempfile::Builder::new()
        .prefix("config-sync-secret-")
        .tempdir()?;

    for (filename, contents) in &data {
        let file_path = dir.path().join(filename);
        tokio::fs::write(&file_path, &contents.0).await?;
        tokio::fs::set_permissions(&file_path, std::fs::Permissions::from_mode(0o600)).await?;
        debug!(path = %file_path.display(), "wrote Secret entry");
    }

    Ok((secret_revision(&data), dir))
}
