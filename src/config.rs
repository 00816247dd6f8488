//! # Controller Configuration
//!
//! Controller-level settings, resolved once at startup and threaded
//! explicitly through the reconciler. The dry-run toggle in particular is
//! plain data on this struct so concurrent reconciliations can never observe
//! a toggle change mid-flight.

use std::path::PathBuf;
use std::time::Duration;

use crate::constants;

/// Controller-level configuration
///
/// Populated from CLI arguments / environment variables in `main`; tests
/// construct it directly.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Root directory holding cached git working trees, keyed by sanitized
    /// repository URL. Shared across all ConfigSync resources.
    pub cache_root: PathBuf,
    /// Timeout for a single git subprocess
    pub git_timeout: Duration,
    /// Requeue interval used when a resource sets no `refreshInterval`
    pub default_requeue: Duration,
    /// Whether each manifest document is validated with a server-side
    /// dry-run apply before the real apply
    pub validate_with_dry_run: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            cache_root: std::env::temp_dir().join(constants::DEFAULT_CACHE_DIR_NAME),
            git_timeout: Duration::from_secs(constants::DEFAULT_GIT_TIMEOUT_SECS),
            default_requeue: Duration::from_secs(constants::DEFAULT_REQUEUE_SECS),
            validate_with_dry_run: true,
        }
    }
}
