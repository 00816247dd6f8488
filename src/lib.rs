//! ConfigSync Controller Library
//!
//! A Kubernetes controller that keeps cluster configuration in sync with a
//! declared source. Each `ConfigSync` resource names one source (a Git
//! repository, a ConfigMap, or a Secret) and a list of target namespaces;
//! the controller fetches the source, detects content changes via a
//! deterministic revision, and server-side applies the manifests to every
//! target in order.
//!
//! Tests live alongside the modules they cover; broader pipeline tests are
//! under `tests/`.

pub mod apply;
pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod error;
pub mod source;

pub use crd::{ConfigSync, ConfigSyncSpec, ConfigSyncStatus};
pub use error::SyncError;
