//! # ConfigSync Spec
//!
//! Main CRD specification type.

use serde::{Deserialize, Serialize};

/// ConfigSync Custom Resource Definition
///
/// Declares a configuration source (a Git repository, a ConfigMap, or a
/// Secret) and one or more target locations the rendered manifests are
/// applied to.
///
/// # Example
///
/// ```yaml
/// apiVersion: configs.example.io/v1alpha1
/// kind: ConfigSync
/// metadata:
///   name: app-config
///   namespace: default
/// spec:
///   source:
///     git:
///       repoURL: https://github.com/myorg/configs.git
///       branch: main
///   targets:
///     - namespace: default
///       name: app-config
///       type: ConfigMap
///   refreshInterval: 10m
/// ```
#[derive(kube::CustomResource, Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "ConfigSync",
    group = "configs.example.io",
    version = "v1alpha1",
    namespaced,
    status = "crate::crd::ConfigSyncStatus",
    shortname = "csync",
    printcolumn = r#"{"name":"Revision", "type":"string", "jsonPath":".status.sourceRevision"}"#,
    printcolumn = r#"{"name":"Degraded", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Degraded\")].status"}"#,
    printcolumn = r#"{"name":"Last Synced", "type":"date", "jsonPath":".status.lastSyncedTime"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSyncSpec {
    /// Where to fetch configuration data from.
    /// Exactly one of `git`, `configMapRef`, or `secretRef` must be set.
    #[serde(default)]
    pub source: crate::crd::SourceSpec,
    /// Target resources the rendered configuration is applied to, in declared
    /// order. Minimum one entry.
    pub targets: Vec<crate::crd::TargetRef>,
    /// How frequently to re-fetch the source and re-apply targets.
    /// Kubernetes duration string (e.g. "30s", "10m", "1h"). If omitted, a
    /// controller-wide default interval applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<String>,
}
