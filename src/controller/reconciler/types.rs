//! # Reconciler Types
//!
//! Shared context handed to every reconciliation, plus per-resource backoff
//! bookkeeping.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use kube::Client;
use thiserror::Error;

use crate::config::ControllerConfig;
use crate::constants::{BACKOFF_MAX_MINUTES, BACKOFF_MIN_MINUTES};
use crate::controller::backoff::FibonacciBackoff;
use crate::error::SyncError;
use crate::source::RepositoryCache;

/// Error surfaced to the controller runtime. Anything inside triggers the
/// error policy's backoff requeue.
#[derive(Debug, Error)]
pub enum ReconcilerError {
    #[error("reconciliation failed: {0}")]
    SyncFailed(#[from] SyncError),
}

/// Per-resource backoff bookkeeping, keyed by `namespace/name`.
#[derive(Debug, Clone)]
pub struct BackoffState {
    pub backoff: FibonacciBackoff,
    pub error_count: u32,
}

impl BackoffState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            backoff: FibonacciBackoff::new(BACKOFF_MIN_MINUTES, BACKOFF_MAX_MINUTES),
            error_count: 0,
        }
    }

    pub fn increment_error(&mut self) {
        self.error_count += 1;
    }
}

impl Default for BackoffState {
    fn default() -> Self {
        Self::new()
    }
}

/// Context shared by all reconciliations.
#[derive(Clone)]
pub struct Reconciler {
    pub client: Client,
    pub config: ControllerConfig,
    /// Clone cache shared across every resource referencing the same URL.
    pub repos: Arc<RepositoryCache>,
    /// Backoff state per resource, consulted by the error policy and reset
    /// here on success.
    pub backoff_states: Arc<Mutex<HashMap<String, BackoffState>>>,
}

impl Reconciler {
    #[must_use]
    pub fn new(client: Client, config: ControllerConfig) -> Self {
        let repos = Arc::new(RepositoryCache::new(
            config.cache_root.clone(),
            config.git_timeout,
        ));
        Self {
            client,
            config,
            repos,
            backoff_states: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Forget accumulated backoff for a resource after a clean pass.
    pub fn reset_backoff(&self, resource_key: &str) {
        let mut states = self
            .backoff_states
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        states.remove(resource_key);
    }
}
