//! # Controller
//!
//! Core controller modules.
//!
//! - `backoff`: Fibonacci backoff for retries
//! - `duration`: refresh interval parsing
//! - `error_policy`: retry scheduling for failed reconciliations
//! - `reconciler`: core reconciliation logic

pub mod backoff;
pub mod duration;
pub mod error_policy;
pub mod reconciler;

pub use error_policy::handle_reconciliation_error;
pub use reconciler::{reconcile, Reconciler, ReconcilerError};
