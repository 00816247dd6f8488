//! # Reconciliation Flow
//!
//! One pass per invocation: resolve the declared source, compare its content
//! identifier against the recorded revision, apply manifests to every target
//! when it changed, then persist status and schedule the next pass.

use std::sync::Arc;
use std::time::Duration;

use kube::ResourceExt;
use kube_runtime::controller::Action;
use tracing::{info, warn};

use crate::apply::apply_target;
use crate::controller::duration::parse_kubernetes_duration;
use crate::controller::reconciler::status::{patch_status, patch_status_best_effort};
use crate::controller::reconciler::types::{Reconciler, ReconcilerError};
use crate::crd::{ConfigSync, ConfigSyncStatus, CONDITION_DEGRADED};
use crate::error::SyncError;
use crate::source;

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// True when the resolved revision matches the one recorded on status, in
/// which case the apply is skipped entirely.
fn revision_unchanged(status: &ConfigSyncStatus, resolved: &str) -> bool {
    status.source_revision.as_deref() == Some(resolved)
}

/// Status update for a pass that skipped the apply. Only the sync timestamp
/// moves; `appliedTargets`, `sourceRevision` and the condition list stay
/// exactly as they are.
fn record_skipped_sync(status: &mut ConfigSyncStatus) {
    status.last_synced_time = Some(now());
}

/// Status update after every target applied cleanly.
fn record_completed_sync(status: &mut ConfigSyncStatus, revision: &str, target_count: usize) {
    status.set_condition(
        CONDITION_DEGRADED,
        "False",
        "ApplySucceeded",
        "all targets applied",
    );
    status.source_revision = Some(revision.to_string());
    status.applied_targets = Some(target_count as i32);
    status.last_synced_time = Some(now());
}

/// Requeue delay for the next pass. `None` means no timed requeue: the
/// resource waits for a spec edit.
fn next_requeue(
    refresh_interval: Option<&str>,
    default_requeue: Duration,
) -> Result<Duration, SyncError> {
    match refresh_interval {
        None => Ok(default_requeue),
        Some(raw) => {
            parse_kubernetes_duration(raw).map_err(|e| SyncError::InvalidRefreshInterval {
                value: raw.to_string(),
                reason: e.to_string(),
            })
        }
    }
}

/// Reconcile one `ConfigSync` resource.
///
/// Terminal spec problems (invalid source shape, unparsable refresh
/// interval) are reported on the `Degraded` condition and the resource is
/// parked until its spec changes. All other failures return an error so the
/// error policy schedules a backoff retry.
pub async fn reconcile(
    sync: Arc<ConfigSync>,
    ctx: Arc<Reconciler>,
) -> Result<Action, ReconcilerError> {
    let namespace = sync.namespace().unwrap_or_else(|| "default".to_string());
    let name = sync.name_any();
    let resource_key = format!("{namespace}/{name}");

    let mut status = sync.status.clone().unwrap_or_default();
    status.observed_generation = sync.metadata.generation;

    let resolved = match source::resolve(&ctx.client, &ctx.repos, &namespace, &sync.spec.source)
        .await
    {
        Ok(resolved) => resolved,
        Err(e) if e.is_terminal() => {
            warn!(%resource_key, error = %e, "spec is invalid, waiting for an edit");
            status.set_condition(
                CONDITION_DEGRADED,
                "True",
                e.condition_reason(),
                &e.to_string(),
            );
            patch_status_best_effort(&ctx.client, &sync, &status).await;
            return Ok(Action::await_change());
        }
        Err(e) => {
            status.set_condition(
                CONDITION_DEGRADED,
                "True",
                e.condition_reason(),
                &e.to_string(),
            );
            patch_status_best_effort(&ctx.client, &sync, &status).await;
            return Err(e.into());
        }
    };

    if revision_unchanged(&status, &resolved.revision) {
        info!(%resource_key, revision = %resolved.revision, "source unchanged, skipping apply");
        record_skipped_sync(&mut status);
        patch_status(&ctx.client, &sync, &status)
            .await
            .map_err(ReconcilerError::from)?;
    } else {
        info!(
            %resource_key,
            revision = %resolved.revision,
            previous = status.source_revision.as_deref().unwrap_or("<none>"),
            targets = sync.spec.targets.len(),
            "source changed, applying to targets"
        );
        for (index, target) in sync.spec.targets.iter().enumerate() {
            if let Err(e) = apply_target(&ctx.client, &ctx.config, &resolved.path, target).await {
                // Remaining targets are skipped; the recorded revision stays
                // at the previous value so the retry applies again.
                status.set_condition(
                    CONDITION_DEGRADED,
                    "True",
                    e.condition_reason(),
                    &e.to_string(),
                );
                status.applied_targets = Some(index as i32 + 1);
                patch_status_best_effort(&ctx.client, &sync, &status).await;
                return Err(e.into());
            }
        }

        record_completed_sync(&mut status, &resolved.revision, sync.spec.targets.len());
        patch_status(&ctx.client, &sync, &status)
            .await
            .map_err(ReconcilerError::from)?;
    }

    ctx.reset_backoff(&resource_key);

    match next_requeue(sync.spec.refresh_interval.as_deref(), ctx.config.default_requeue) {
        Ok(delay) => Ok(Action::requeue(delay)),
        Err(e) => {
            warn!(%resource_key, error = %e, "refreshInterval is unusable, waiting for an edit");
            status.set_condition(
                CONDITION_DEGRADED,
                "True",
                e.condition_reason(),
                &e.to_string(),
            );
            patch_status_best_effort(&ctx.client, &sync, &status).await;
            Ok(Action::await_change())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_requeue_default_when_unset() {
        let delay = next_requeue(None, Duration::from_secs(300)).unwrap();
        assert_eq!(delay, Duration::from_secs(300));
    }

    #[test]
    fn test_next_requeue_parses_interval() {
        let delay = next_requeue(Some("10m"), Duration::from_secs(300)).unwrap();
        assert_eq!(delay, Duration::from_secs(600));
    }

    #[test]
    fn test_next_requeue_rejects_bad_interval() {
        let err = next_requeue(Some("bogus"), Duration::from_secs(300)).unwrap_err();
        assert!(matches!(err, SyncError::InvalidRefreshInterval { .. }));
        assert!(err.is_terminal());
    }

    fn synced_status(revision: &str, targets: i32) -> ConfigSyncStatus {
        let mut status = ConfigSyncStatus {
            source_revision: Some(revision.to_string()),
            applied_targets: Some(targets),
            last_synced_time: Some("2024-01-01T00:00:00+00:00".to_string()),
            ..ConfigSyncStatus::default()
        };
        status.set_condition(CONDITION_DEGRADED, "False", "ApplySucceeded", "all targets applied");
        status
    }

    #[test]
    fn test_unchanged_revision_is_detected() {
        let status = synced_status("abc123", 2);
        assert!(revision_unchanged(&status, "abc123"));
        assert!(!revision_unchanged(&status, "def456"));
        assert!(!revision_unchanged(&ConfigSyncStatus::default(), "abc123"));
    }

    #[test]
    fn test_skipped_sync_touches_only_the_timestamp() {
        let mut status = synced_status("abc123", 2);
        let conditions_before = status.conditions.clone();

        record_skipped_sync(&mut status);

        assert_eq!(status.source_revision.as_deref(), Some("abc123"));
        assert_eq!(status.applied_targets, Some(2));
        assert_eq!(status.conditions.len(), conditions_before.len());
        let cond = status.condition(CONDITION_DEGRADED).unwrap();
        assert_eq!(cond.status, "False");
        assert_eq!(cond.reason.as_deref(), Some("ApplySucceeded"));
        assert_eq!(
            cond.last_transition_time,
            conditions_before[0].last_transition_time
        );
        assert_ne!(
            status.last_synced_time.as_deref(),
            Some("2024-01-01T00:00:00+00:00")
        );
    }

    #[test]
    fn test_repeated_skips_add_no_conditions() {
        let mut status = synced_status("abc123", 1);
        record_skipped_sync(&mut status);
        record_skipped_sync(&mut status);
        assert_eq!(status.conditions.len(), 1);
    }

    #[test]
    fn test_completed_sync_records_revision_and_clears_degraded() {
        let mut status = ConfigSyncStatus::default();
        status.set_condition(CONDITION_DEGRADED, "True", "ApplyFailed", "boom");

        record_completed_sync(&mut status, "def456", 3);

        assert_eq!(status.source_revision.as_deref(), Some("def456"));
        assert_eq!(status.applied_targets, Some(3));
        assert!(status.last_synced_time.is_some());
        assert_eq!(status.conditions.len(), 1);
        let cond = status.condition(CONDITION_DEGRADED).unwrap();
        assert_eq!(cond.status, "False");
        assert_eq!(cond.reason.as_deref(), Some("ApplySucceeded"));
    }
}
