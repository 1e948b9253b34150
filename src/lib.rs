//! Module-to-repository mapping reports
//!
//! Modules are registered in a YAML document with their canonical repository
//! URL. Rule sets and project manifests reference those modules; this crate
//! joins the references against the registry and renders one row per
//! reference.

pub mod domain;
pub use domain::{
    Manifest, ManifestEntry, ManifestSection, ModuleRecord, ModuleRegistry, ResolveError,
    ResolvedRow, RuleEntry, RuleGroup, UsageGroup, resolve,
};

/// Optional TOML configuration for the command line.
pub mod config;
pub use config::Config;

/// Loading YAML documents into domain types.
pub mod storage;
pub use storage::{LoadError, RulesDocument};

/// Rendering resolved rows as text.
pub mod render;
pub use render::{Format, RowWriter};
