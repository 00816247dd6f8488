//! # Status Persistence
//!
//! Writes the status subresource back to the cluster.

use kube::api::{Patch, PatchParams};
use kube::{Api, Client, ResourceExt};
use serde_json::json;
use tracing::{debug, warn};

use crate::constants::STATUS_FIELD_MANAGER;
use crate::crd::{ConfigSync, ConfigSyncStatus};
use crate::error::SyncError;

/// Patch the status subresource of `sync` with `status`.
pub async fn patch_status(
    client: &Client,
    sync: &ConfigSync,
    status: &ConfigSyncStatus,
) -> Result<(), SyncError> {
    let namespace = sync.namespace().unwrap_or_else(|| "default".to_string());
    let name = sync.name_any();
    let api: Api<ConfigSync> = Api::namespaced(client.clone(), &namespace);

    api.patch_status(
        &name,
        &PatchParams::apply(STATUS_FIELD_MANAGER),
        &Patch::Merge(json!({ "status": status })),
    )
    .await?;
    debug!(%namespace, %name, "status updated");
    Ok(())
}

/// Patch the status but only log on failure. Used on error paths where the
/// original error must stay the one surfaced to the runtime.
pub async fn patch_status_best_effort(client: &Client, sync: &ConfigSync, status: &ConfigSyncStatus) {
    if let Err(e) = patch_status(client, sync, status).await {
        warn!(
            namespace = %sync.namespace().unwrap_or_default(),
            name = %sync.name_any(),
            error = %e,
            "failed to persist status"
        );
    }
}
