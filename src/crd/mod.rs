//! # Custom Resource Definitions
//!
//! CRD types for the ConfigSync controller.
//!
//! ## Module Structure
//!
//! - `spec.rs` - Main CRD specification
//! - `source.rs` - Source variants (Git, ConfigMap, Secret) and target references
//! - `status.rs` - Status types and condition bookkeeping

mod source;
mod spec;
mod status;

pub use source::{GitAuthMethod, GitSource, ObjectRef, SourceSpec, TargetRef, TargetType};
pub use spec::{ConfigSync, ConfigSyncSpec};
pub use status::{Condition, ConfigSyncStatus, CONDITION_DEGRADED};
