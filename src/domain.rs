//! Domain models for module mapping.
//!
//! This module contains the module registry, the usage entries that reference
//! registered modules, and the join that resolves one against the other.

mod registry;
pub use registry::{ModuleRecord, ModuleRegistry};

/// Rule groups and manifest sections that reference registered modules.
pub mod usage;
pub use usage::{Manifest, ManifestEntry, ManifestSection, RuleEntry, RuleGroup};

mod resolve;
pub use resolve::{MANIFEST_MARKER, ResolveError, ResolvedRow, Usage, UsageGroup, resolve};
