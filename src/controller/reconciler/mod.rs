//! # Reconciler
//!
//! Core reconciliation logic for `ConfigSync` resources.
//!
//! ## Reconciliation Flow
//!
//! 1. Resolve the declared source (git repository, ConfigMap, or Secret)
//!    into a local directory plus a deterministic revision
//! 2. Compare the revision against `status.sourceRevision`
//! 3. Unchanged revision: refresh `lastSyncedTime` only
//! 4. Changed revision: apply every manifest to every target, in order
//! 5. Persist status and schedule the next pass from `refreshInterval`

pub mod reconcile;
pub mod status;
pub mod types;

pub use reconcile::reconcile;
pub use status::{patch_status, patch_status_best_effort};
pub use types::{BackoffState, Reconciler, ReconcilerError};
