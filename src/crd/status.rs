//! # ConfigSync Status
//!
//! Observed-state fields and condition bookkeeping.

use serde::{Deserialize, Serialize};

/// Condition type used for all reconciliation failure reporting.
pub const CONDITION_DEGRADED: &str = "Degraded";

/// Status of the ConfigSync resource
///
/// Mutated exclusively by the reconciler's status update step.
#[derive(Debug, Clone, Deserialize, Serialize, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSyncStatus {
    /// Timestamp of the last completed sync pass (RFC3339)
    #[serde(default)]
    pub last_synced_time: Option<String>,
    /// Content identifier of the source state applied during the last sync
    /// (a Git commit hash or a content hash for in-cluster sources)
    #[serde(default)]
    pub source_revision: Option<String>,
    /// Number of targets attempted during the last apply pass
    #[serde(default)]
    pub applied_targets: Option<i32>,
    /// Observed generation
    #[serde(default)]
    pub observed_generation: Option<i64>,
    /// Conditions represent the latest available observations.
    /// Unique per type; upserted by [`ConfigSyncStatus::set_condition`].
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// Condition represents a condition of a resource
#[derive(Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition
    pub r#type: String,
    /// Status of the condition (True, False, Unknown)
    pub status: String,
    /// Last transition time
    #[serde(default)]
    pub last_transition_time: Option<String>,
    /// Reason for the condition
    #[serde(default)]
    pub reason: Option<String>,
    /// Message describing the condition
    #[serde(default)]
    pub message: Option<String>,
}

impl ConfigSyncStatus {
    /// Upsert a condition by type.
    ///
    /// `lastTransitionTime` is refreshed only when status, reason, or message
    /// actually change; an identical upsert leaves the existing condition
    /// untouched, per standard Kubernetes condition semantics.
    pub fn set_condition(&mut self, r#type: &str, status: &str, reason: &str, message: &str) {
        if let Some(existing) = self.conditions.iter_mut().find(|c| c.r#type == r#type) {
            if existing.status == status
                && existing.reason.as_deref() == Some(reason)
                && existing.message.as_deref() == Some(message)
            {
                return;
            }
            existing.status = status.to_string();
            existing.reason = Some(reason.to_string());
            existing.message = Some(message.to_string());
            existing.last_transition_time = Some(chrono::Utc::now().to_rfc3339());
            return;
        }
        self.conditions.push(Condition {
            r#type: r#type.to_string(),
            status: status.to_string(),
            last_transition_time: Some(chrono::Utc::now().to_rfc3339()),
            reason: Some(reason.to_string()),
            message: Some(message.to_string()),
        });
    }

    /// Look up a condition by type.
    #[must_use]
    pub fn condition(&self, r#type: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.r#type == r#type)
    }
}
