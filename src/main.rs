//! # ConfigSync Controller
//!
//! Watches `ConfigSync` resources across all namespaces and reconciles each
//! one by fetching its declared source, detecting content changes, and
//! applying the contained manifests to the declared targets.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use futures::StreamExt;
use kube::{Api, Client};
use kube_runtime::{watcher, Controller};
use tracing::{error, info};

use config_sync_controller::config::ControllerConfig;
use config_sync_controller::constants;
use config_sync_controller::controller::{handle_reconciliation_error, reconcile, Reconciler};
use config_sync_controller::crd::ConfigSync;

/// ConfigSync controller
#[derive(Parser, Debug)]
#[command(name = "config-sync-controller", version, about)]
struct Args {
    /// Root directory for cached git working trees
    #[arg(long, env = "CONFIG_SYNC_CACHE_ROOT")]
    cache_root: Option<PathBuf>,

    /// Timeout for a single git operation, in seconds
    #[arg(long, env = "CONFIG_SYNC_GIT_TIMEOUT_SECS", default_value_t = constants::DEFAULT_GIT_TIMEOUT_SECS)]
    git_timeout_secs: u64,

    /// Requeue interval for resources without a refreshInterval, in seconds
    #[arg(long, env = "CONFIG_SYNC_DEFAULT_REQUEUE_SECS", default_value_t = constants::DEFAULT_REQUEUE_SECS)]
    default_requeue_secs: u64,

    /// Skip the server-side dry-run validation before each apply
    #[arg(long, env = "CONFIG_SYNC_DISABLE_DRY_RUN")]
    disable_dry_run: bool,
}

impl Args {
    fn into_config(self) -> ControllerConfig {
        ControllerConfig {
            cache_root: self
                .cache_root
                .unwrap_or_else(|| std::env::temp_dir().join(constants::DEFAULT_CACHE_DIR_NAME)),
            git_timeout: Duration::from_secs(self.git_timeout_secs),
            default_requeue: Duration::from_secs(self.default_requeue_secs),
            validate_with_dry_run: !self.disable_dry_run,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "config_sync_controller=info".into()),
        )
        .init();

    let config = args.into_config();
    info!(
        cache_root = %config.cache_root.display(),
        dry_run = config.validate_with_dry_run,
        "starting ConfigSync controller"
    );

    let client = Client::try_default().await?;

    // Watch all namespaces so ConfigSync resources can live anywhere
    let syncs: Api<ConfigSync> = Api::all(client.clone());

    let reconciler = Arc::new(Reconciler::new(client, config));

    Controller::new(syncs, watcher::Config::default())
        .shutdown_on_signal()
        .run(reconcile, handle_reconciliation_error, reconciler)
        .for_each(|result| {
            if let Err(e) = result {
                error!("controller stream error: {e:?}");
            }
            std::future::ready(())
        })
        .await;

    info!("controller stopped");
    Ok(())
}
