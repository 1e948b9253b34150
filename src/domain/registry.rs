use std::collections::BTreeMap;

use serde::Deserialize;

/// Repository metadata for a single registered module.
///
/// Registry documents may carry further keys per module; they are accepted and
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModuleRecord {
    /// The canonical repository URL.
    pub url: String,

    /// The commit used when a rule entry does not name one.
    #[serde(default, rename = "commit")]
    pub default_commit: Option<String>,
}

impl ModuleRecord {
    /// Creates a record with no default commit.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            default_commit: None,
        }
    }

    /// Sets the default commit for this record.
    #[must_use]
    pub fn with_default_commit(mut self, commit: impl Into<String>) -> Self {
        self.default_commit = Some(commit.into());
        self
    }
}

/// The mapping from module name to its repository metadata.
///
/// Loaded once per run and not modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ModuleRegistry {
    modules: BTreeMap<String, ModuleRecord>,
}

impl ModuleRegistry {
    /// Looks up a module by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ModuleRecord> {
        self.modules.get(name)
    }

    /// Returns `true` if the module is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// The number of registered modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns `true` if no modules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Iterates over the registered modules in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModuleRecord)> {
        self.modules.iter().map(|(name, record)| (name.as_str(), record))
    }
}

impl<S: Into<String>> FromIterator<(S, ModuleRecord)> for ModuleRegistry {
    fn from_iter<T: IntoIterator<Item = (S, ModuleRecord)>>(iter: T) -> Self {
        Self {
            modules: iter
                .into_iter()
                .map(|(name, record)| (name.into(), record))
                .collect(),
        }
    }
}
