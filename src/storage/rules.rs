use std::path::Path;

use serde::Deserialize;
use tracing::instrument;

use super::{LoadError, read_document};
use crate::domain::{
    ModuleRegistry, ResolveError, ResolvedRow, RuleEntry, RuleGroup, UsageGroup, resolve,
};

/// A rules document: a module registry and the rules that check modules out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesDocument {
    registry: ModuleRegistry,
    rules: Vec<RuleGroup>,
}

#[derive(Debug, Deserialize)]
struct RawRules {
    modules: Option<ModuleRegistry>,
    rules: Option<Vec<RuleGroup>>,
}

impl RulesDocument {
    /// Creates a rules document from its parts.
    #[must_use]
    pub const fn new(registry: ModuleRegistry, rules: Vec<RuleGroup>) -> Self {
        Self { registry, rules }
    }

    /// Loads a rules document from a YAML file.
    ///
    /// The document must have both a `modules` and a `rules` top-level key.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if either
    /// top-level key is missing.
    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let raw: RawRules = read_document(path)?;

        let registry = raw
            .modules
            .ok_or_else(|| LoadError::missing_section(path, "modules"))?;
        let rules = raw
            .rules
            .ok_or_else(|| LoadError::missing_section(path, "rules"))?;

        tracing::debug!(
            modules = registry.len(),
            rules = rules.len(),
            "loaded rules document"
        );

        Ok(Self { registry, rules })
    }

    /// The module registry.
    #[must_use]
    pub const fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// The rules, in document order.
    #[must_use]
    pub fn rules(&self) -> &[RuleGroup] {
        &self.rules
    }

    /// The rules as usage groups, in document order.
    pub fn groups(&self) -> impl Iterator<Item = UsageGroup<'_, RuleEntry>> {
        self.rules.iter().map(UsageGroup::from)
    }

    /// Resolves every rule entry against the document's own registry.
    pub fn resolve(&self) -> impl Iterator<Item = Result<ResolvedRow<'_>, ResolveError>> {
        resolve(&self.registry, self.groups())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn document(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_reads_registry_and_rules() {
        let file = document(
            "modules:\n  libfoo:\n    url: https://x/libfoo.git\nrules:\n  - local: vendor/foo\n    modules:\n      - name: libfoo\n        commit: abc123\n",
        );

        let rules = RulesDocument::load(file.path()).unwrap();

        assert!(rules.registry().contains("libfoo"));
        assert_eq!(rules.rules().len(), 1);
        assert_eq!(rules.rules()[0].local, "vendor/foo");
    }

    #[test]
    fn load_missing_file_returns_file_access_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("rules.yaml");

        let error = RulesDocument::load(&missing).unwrap_err();

        assert!(matches!(error, LoadError::FileAccess { .. }));
    }

    #[test]
    fn load_malformed_yaml_returns_parse_error() {
        let file = document("modules: [unterminated\n");

        let error = RulesDocument::load(file.path()).unwrap_err();

        assert!(matches!(error, LoadError::Parse { .. }));
    }

    #[test]
    fn load_without_modules_returns_missing_section() {
        let file = document("rules: []\n");

        let error = RulesDocument::load(file.path()).unwrap_err();

        assert!(matches!(
            error,
            LoadError::MissingSection {
                section: "modules",
                ..
            }
        ));
    }

    #[test]
    fn load_without_rules_returns_missing_section() {
        let file = document("modules:\n  libfoo:\n    url: https://x/libfoo.git\n");

        let error = RulesDocument::load(file.path()).unwrap_err();

        assert!(matches!(
            error,
            LoadError::MissingSection { section: "rules", .. }
        ));
        assert!(error.to_string().contains("'rules'"));
    }

    #[test]
    fn resolve_uses_document_registry() {
        let file = document(
            "modules:\n  libfoo:\n    url: https://x/libfoo.git\nrules:\n  - local: vendor/foo\n    modules:\n      - name: libfoo\n        commit: abc123\n  - local: vendor/bar\n    modules: []\n",
        );
        let rules = RulesDocument::load(file.path()).unwrap();

        let rows: Vec<_> = rules.resolve().collect::<Result<_, _>>().unwrap();

        assert_eq!(
            rows.iter().map(ResolvedRow::fields).collect::<Vec<_>>(),
            vec![["vendor/foo", "https://x/libfoo.git", "abc123", "libfoo"]]
        );
    }
}
