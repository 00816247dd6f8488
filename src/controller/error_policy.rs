//! # Error Policy
//!
//! Backoff scheduling for failed reconciliations. Backoff state is tracked
//! per resource so one failing resource never slows down the others, and the
//! reconciler clears the state again after a clean pass.

use std::sync::Arc;

use kube_runtime::controller::Action;
use tracing::{error, info, warn};

use crate::controller::reconciler::{BackoffState, Reconciler, ReconcilerError};
use crate::crd::ConfigSync;

/// Decide the retry delay for a failed reconciliation.
pub fn handle_reconciliation_error(
    sync: Arc<ConfigSync>,
    err: &ReconcilerError,
    ctx: Arc<Reconciler>,
) -> Action {
    let name = sync.metadata.name.as_deref().unwrap_or("unknown");
    let namespace = sync.metadata.namespace.as_deref().unwrap_or("default");
    let resource_key = format!("{namespace}/{name}");

    error!(%resource_key, error = %err, "reconciliation failed");

    let (backoff_seconds, error_count) = match ctx.backoff_states.lock() {
        Ok(mut states) => {
            let state = states.entry(resource_key).or_insert_with(BackoffState::new);
            state.increment_error();
            (state.backoff.next_backoff_seconds(), state.error_count)
        }
        Err(e) => {
            warn!("failed to lock backoff state: {e}, using default delay");
            (60, 0)
        }
    };

    info!(
        delay_seconds = backoff_seconds,
        error_count, "scheduling retry with fibonacci backoff"
    );
    Action::requeue(std::time::Duration::from_secs(backoff_seconds))
}
