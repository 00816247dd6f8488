//! # Source and Target Types
//!
//! Source variants for ConfigSync resources and the target references the
//! rendered configuration is applied to.

use serde::{Deserialize, Serialize};

/// Where configuration data is fetched from.
///
/// Exactly one of the fields must be set; [`crate::source::classify`] enforces
/// the invariant at reconcile time and turns the populated field into a
/// proper sum type.
#[derive(Debug, Clone, Default, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceSpec {
    /// Git repository to clone the configuration from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<GitSource>,
    /// In-cluster ConfigMap to use as the source. Entries must be in the
    /// `data` field (key: filename, value: file contents), not `binaryData`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map_ref: Option<ObjectRef>,
    /// In-cluster Secret to use as the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<ObjectRef>,
}

/// Git repository source
#[derive(Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GitSource {
    /// HTTPS or SSH URL of the repository to clone
    /// (for example `https://github.com/myorg/configs.git`).
    pub repo_url: String,
    /// Repository-relative path to the directory containing the manifests.
    /// If unset, manifests are read from the repository root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Branch to check out. If unset, the repository's default branch is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Exact commit to check out. Takes precedence over `branch` when both
    /// are set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// How the controller authenticates to the repository.
    #[serde(default)]
    pub auth_method: GitAuthMethod,
    /// Secret holding the credentials when `authMethod` is `ssh` or `https`.
    /// For HTTPS the secret carries a username (`username` or `user`) and a
    /// password (`password`, `pass`, or `token`); for SSH it carries a
    /// private key (`sshKey`, `id_rsa`, `ssh-privatekey`, or `private_key`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_secret_ref: Option<ObjectRef>,
}

/// Git authentication method
///
/// Modeled as an enum so the schema rejects unsupported methods instead of
/// the controller discovering them at reconcile time.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum GitAuthMethod {
    /// SSH private key authentication
    Ssh,
    /// HTTPS basic authentication (username + password/token)
    Https,
    /// No credentials
    #[default]
    None,
}

/// Reference to an in-cluster object (ConfigMap or Secret)
#[derive(Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    /// Name of the referenced object.
    pub name: String,
    /// Namespace of the referenced object. Defaults to the ConfigSync
    /// resource's own namespace when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// A target location the rendered configuration is applied to
#[derive(Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TargetRef {
    /// Namespace the applied objects are written into. Overrides the
    /// namespace of every manifest document unconditionally.
    pub namespace: String,
    /// Name of the target resource.
    pub name: String,
    /// Kind of the target resource.
    pub r#type: TargetType,
}

/// Supported target resource kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub enum TargetType {
    ConfigMap,
    Secret,
}
