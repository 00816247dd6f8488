//! # CRD Generator
//!
//! Prints the `ConfigSync` CustomResourceDefinition as YAML.
//!
//! ```bash
//! cargo run --bin crdgen > config/crd/configsync.yaml
//! cargo run --bin crdgen | kubectl apply -f -
//! ```

use kube::core::CustomResourceExt;

use config_sync_controller::crd::ConfigSync;

fn main() {
    let crd = ConfigSync::crd();
    match serde_yaml::to_string(&crd) {
        Ok(yaml) => print!("{yaml}"),
        Err(e) => {
            eprintln!("failed to serialize CRD to YAML: {e}");
            std::process::exit(1);
        }
    }
}
