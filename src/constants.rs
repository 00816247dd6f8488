//! # Constants
//!
//! Shared constants used throughout the controller.
//!
//! These values represent reasonable defaults and can be overridden via
//! configuration where applicable.

/// Field manager identity used for server-side apply of manifest documents
pub const APPLY_FIELD_MANAGER: &str = "configsync";

/// Field manager identity used for status patches on ConfigSync resources
pub const STATUS_FIELD_MANAGER: &str = "config-sync-controller";

/// Directory name under the system temp dir holding cached git working trees
pub const DEFAULT_CACHE_DIR_NAME: &str = "config-sync-cache";

/// Default requeue interval when `refreshInterval` is unset (seconds)
pub const DEFAULT_REQUEUE_SECS: u64 = 300;

/// Default timeout for a single git subprocess (seconds)
/// Network operations that hang must surface as retryable errors
pub const DEFAULT_GIT_TIMEOUT_SECS: u64 = 120;

/// Fibonacci error backoff bounds (minutes): 1m, 1m, 2m, 3m, 5m, 8m, 10m (max)
pub const BACKOFF_MIN_MINUTES: u64 = 1;
pub const BACKOFF_MAX_MINUTES: u64 = 10;
