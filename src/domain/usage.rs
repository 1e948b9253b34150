use std::fmt;

use serde::Deserialize;

/// A reference to a module from within a rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuleEntry {
    /// The registered module name.
    pub name: String,

    /// The commit to check out.
    ///
    /// Falls back to the registry's default commit when absent.
    #[serde(default)]
    pub commit: Option<String>,
}

impl RuleEntry {
    /// Creates an entry pinned to the given commit.
    #[must_use]
    pub fn new(name: impl Into<String>, commit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit: Some(commit.into()),
        }
    }
}

/// A collection of module references sharing a local checkout label.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuleGroup {
    /// The local label shared by every entry of the rule, typically a path.
    pub local: String,

    /// The modules referenced by this rule, in document order.
    pub modules: Vec<RuleEntry>,
}

/// A reference to a module from a project manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManifestEntry {
    /// The registered module name.
    pub module: String,

    /// Where the module is taken from, e.g. a path or a branch.
    pub from: String,
}

impl ManifestEntry {
    /// Creates a manifest entry.
    #[must_use]
    pub fn new(module: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            from: from.into(),
        }
    }
}

/// The classification of a manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ManifestSection {
    /// Modules developed alongside the project.
    Develop,
    /// Modules consumed as dependencies.
    Consume,
}

impl ManifestSection {
    /// All sections, in the order their entries are reported.
    pub const ALL: [Self; 2] = [Self::Develop, Self::Consume];

    /// The top-level document key for this section.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Develop => "develop",
            Self::Consume => "consume",
        }
    }
}

impl fmt::Display for ManifestSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A project manifest: the modules a project develops and consumes.
///
/// A section missing from the document is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    develop: Vec<ManifestEntry>,
    consume: Vec<ManifestEntry>,
}

impl Manifest {
    /// Creates a manifest from its two sections.
    #[must_use]
    pub const fn new(develop: Vec<ManifestEntry>, consume: Vec<ManifestEntry>) -> Self {
        Self { develop, consume }
    }

    /// The entries of a single section.
    #[must_use]
    pub fn entries(&self, section: ManifestSection) -> &[ManifestEntry] {
        match section {
            ManifestSection::Develop => &self.develop,
            ManifestSection::Consume => &self.consume,
        }
    }

    /// Iterates over every section with its entries, develop first.
    pub fn sections(&self) -> impl Iterator<Item = (ManifestSection, &[ManifestEntry])> {
        ManifestSection::ALL
            .into_iter()
            .map(move |section| (section, self.entries(section)))
    }

    /// The total number of entries across both sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.develop.len() + self.consume.len()
    }

    /// Returns `true` if neither section has entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
