//! # Manifest Application
//!
//! Applies a directory of YAML manifests to a target namespace with
//! server-side apply. Each manifest goes through a validate-only dry-run
//! before the persisting apply, unless dry-run validation is disabled in the
//! controller configuration.

use kube::api::{ApiResource, DynamicObject, Patch, PatchParams};
use kube::core::GroupVersionKind;
use kube::{Api, Client};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ControllerConfig;
use crate::constants::APPLY_FIELD_MANAGER;
use crate::crd::TargetRef;
use crate::error::SyncError;

/// Split a multi-document YAML file on its literal document separator.
///
/// This is a separator split, not a YAML stream parser. A `---` line inside a
/// multi-line string value splits incorrectly. Documents that trim to empty
/// are dropped.
#[must_use]
pub fn split_documents(contents: &str) -> Vec<&str> {
    contents
        .split("\n---")
        .map(str::trim)
        .filter(|doc| !doc.is_empty())
        .collect()
}

/// Strip server-populated fields so the object is acceptable to apply.
///
/// Removes the top-level `status` subtree, then walks the whole tree and
/// clears ownership and bookkeeping fields from every nested `metadata`
/// mapping. Name, namespace, labels and annotations stay untouched.
pub fn sanitize_manifest(manifest: &mut Value) {
    if let Some(root) = manifest.as_object_mut() {
        root.remove("status");
    }
    strip_server_metadata(manifest);
}

const SERVER_METADATA_FIELDS: &[&str] = &[
    "managedFields",
    "resourceVersion",
    "uid",
    "creationTimestamp",
    "generation",
    "selfLink",
];

fn strip_server_metadata(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Object(metadata)) = map.get_mut("metadata") {
                for field in SERVER_METADATA_FIELDS {
                    metadata.remove(*field);
                }
            }
            for nested in map.values_mut() {
                strip_server_metadata(nested);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                strip_server_metadata(item);
            }
        }
        _ => {}
    }
}

/// Apply every YAML manifest in `source_dir` into the target's namespace.
///
/// Files are scanned non-recursively and processed in filename order;
/// documents within a file in declaration order. The first failing document
/// aborts the rest of the target.
pub async fn apply_target(
    client: &Client,
    config: &ControllerConfig,
    source_dir: &std::path::Path,
    target: &TargetRef,
) -> Result<(), SyncError> {
    let mut manifest_files = Vec::new();
    let mut entries = tokio::fs::read_dir(source_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        if path.is_file() && is_yaml {
            manifest_files.push(path);
        }
    }
    manifest_files.sort();

    info!(
        namespace = %target.namespace,
        target = %target.name,
        files = manifest_files.len(),
        "applying manifests"
    );

    for file in &manifest_files {
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let contents = tokio::fs::read_to_string(file).await?;

        for (index, document) in split_documents(&contents).iter().enumerate() {
            let label = format!("{file_name}#{index}");
            apply_document(client, config, document, &target.namespace, &label).await?;
        }
    }
    Ok(())
}

/// Parse, sanitize and server-side apply one YAML document.
async fn apply_document(
    client: &Client,
    config: &ControllerConfig,
    document: &str,
    namespace: &str,
    label: &str,
) -> Result<(), SyncError> {
    let parsed: Value = serde_yaml::from_str(document).map_err(|e| {
        SyncError::ApplyValidationFailed {
            manifest: label.to_string(),
            reason: format!("invalid YAML: {e}"),
        }
    })?;
    if parsed.is_null() {
        return Ok(());
    }

    let mut manifest = parsed;
    sanitize_manifest(&mut manifest);

    // Targets choose where the manifest lands, whatever it declared itself.
    if let Some(metadata) = manifest
        .get_mut("metadata")
        .and_then(Value::as_object_mut)
    {
        metadata.insert("namespace".to_string(), Value::String(namespace.to_string()));
    }

    let api_version = manifest
        .get("apiVersion")
        .and_then(Value::as_str)
        .ok_or_else(|| SyncError::ApplyValidationFailed {
            manifest: label.to_string(),
            reason: "document has no apiVersion".to_string(),
        })?;
    let kind = manifest
        .get("kind")
        .and_then(Value::as_str)
        .ok_or_else(|| SyncError::ApplyValidationFailed {
            manifest: label.to_string(),
            reason: "document has no kind".to_string(),
        })?;
    let name = manifest
        .get("metadata")
        .and_then(|m| m.get("name"))
        .and_then(Value::as_str)
        .ok_or_else(|| SyncError::ApplyValidationFailed {
            manifest: label.to_string(),
            reason: "document has no metadata.name".to_string(),
        })?
        .to_string();

    let (group, version) = match api_version.split_once('/') {
        Some((group, version)) => (group.to_string(), version.to_string()),
        None => (String::new(), api_version.to_string()),
    };
    let gvk = GroupVersionKind::gvk(&group, &version, kind);
    let ar = ApiResource::from_gvk(&gvk);
    let api: Api<DynamicObject> = Api::namespaced_with(client.clone(), namespace, &ar);

    if config.validate_with_dry_run {
        let mut pp = PatchParams::apply(APPLY_FIELD_MANAGER).force();
        pp.dry_run = true;
        api.patch(&name, &pp, &Patch::Apply(&manifest))
            .await
            .map_err(|e| SyncError::ApplyValidationFailed {
                manifest: label.to_string(),
                reason: e.to_string(),
            })?;
        debug!(%label, %name, "dry-run apply accepted");
    }

    let pp = PatchParams::apply(APPLY_FIELD_MANAGER).force();
    api.patch(&name, &pp, &Patch::Apply(&manifest))
        .await
        .map_err(|e| SyncError::ApplyFailed {
            manifest: label.to_string(),
            reason: e.to_string(),
        })?;
    debug!(%label, %name, %namespace, kind, "applied manifest");
    Ok(())
}
