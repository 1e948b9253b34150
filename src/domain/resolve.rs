use serde::Serialize;

use super::{Manifest, ManifestEntry, ModuleRecord, ModuleRegistry, RuleEntry, RuleGroup};

/// The context field reported for every manifest row.
pub const MANIFEST_MARKER: &str = "*";

/// A reference to a registered module that can be resolved against the
/// registry.
pub trait Usage {
    /// The referenced module name.
    fn module(&self) -> &str;

    /// The version or location reported for this reference, given the
    /// module's registry record.
    fn version<'a>(&'a self, record: &'a ModuleRecord) -> Option<&'a str>;
}

impl Usage for RuleEntry {
    fn module(&self) -> &str {
        &self.name
    }

    fn version<'a>(&'a self, record: &'a ModuleRecord) -> Option<&'a str> {
        self.commit
            .as_deref()
            .or(record.default_commit.as_deref())
    }
}

impl Usage for ManifestEntry {
    fn module(&self) -> &str {
        &self.module
    }

    fn version<'a>(&'a self, _record: &'a ModuleRecord) -> Option<&'a str> {
        Some(&self.from)
    }
}

/// An ordered group of usage entries sharing a context.
#[derive(Debug)]
pub struct UsageGroup<'a, E> {
    /// Identifies the group in error messages.
    pub label: &'a str,

    /// The context field reported for each row of the group.
    pub context: &'a str,

    /// The entries of the group, in document order.
    pub entries: &'a [E],
}

impl<E> Clone for UsageGroup<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for UsageGroup<'_, E> {}

impl<'a> From<&'a RuleGroup> for UsageGroup<'a, RuleEntry> {
    fn from(rule: &'a RuleGroup) -> Self {
        Self {
            label: &rule.local,
            context: &rule.local,
            entries: &rule.modules,
        }
    }
}

impl Manifest {
    /// The manifest's sections as usage groups, develop before consume.
    ///
    /// Every group reports [`MANIFEST_MARKER`] as its context; the section
    /// only decides ordering.
    pub fn groups(&self) -> impl Iterator<Item = UsageGroup<'_, ManifestEntry>> {
        self.sections().map(|(section, entries)| UsageGroup {
            label: section.as_str(),
            context: MANIFEST_MARKER,
            entries,
        })
    }
}

/// A usage entry joined with its registry record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedRow<'a> {
    /// The rule label, or [`MANIFEST_MARKER`] for manifest rows.
    pub context: &'a str,

    /// The module's canonical repository URL.
    pub url: &'a str,

    /// The commit or source location of this reference.
    pub version: &'a str,

    /// The module name.
    pub module: &'a str,
}

impl<'a> ResolvedRow<'a> {
    /// The row's fields in display order.
    #[must_use]
    pub const fn fields(&self) -> [&'a str; 4] {
        [self.context, self.url, self.version, self.module]
    }
}

/// Errors that can occur when resolving usage entries against the registry.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A usage entry references a module that is not registered.
    #[error("unknown module '{module}' referenced in '{group}'")]
    UnknownModule {
        /// The unregistered module name.
        module: String,
        /// The group the reference appeared in.
        group: String,
    },

    /// Neither the rule entry nor the registry names a commit.
    #[error("no commit for module '{module}' in '{group}' and no default commit is registered")]
    MissingCommit {
        /// The module lacking a commit.
        module: String,
        /// The group the reference appeared in.
        group: String,
    },
}

/// Resolves every entry of every group against the registry.
///
/// Rows are produced lazily in input order: groups in order, entries within a
/// group in order. Nothing is sorted or deduplicated. An entry that fails to
/// resolve yields an error in place of its row; rows for earlier entries have
/// already been produced by then.
pub fn resolve<'a, E, I>(
    registry: &'a ModuleRegistry,
    groups: I,
) -> impl Iterator<Item = Result<ResolvedRow<'a>, ResolveError>>
where
    E: Usage + 'a,
    I: IntoIterator<Item = UsageGroup<'a, E>>,
{
    groups.into_iter().flat_map(move |group| {
        let UsageGroup {
            label,
            context,
            entries,
        } = group;
        entries
            .iter()
            .map(move |entry| resolve_entry(registry, label, context, entry))
    })
}

fn resolve_entry<'a, E: Usage>(
    registry: &'a ModuleRegistry,
    label: &'a str,
    context: &'a str,
    entry: &'a E,
) -> Result<ResolvedRow<'a>, ResolveError> {
    let module = entry.module();
    let record = registry
        .get(module)
        .ok_or_else(|| ResolveError::UnknownModule {
            module: module.to_string(),
            group: label.to_string(),
        })?;

    let version = entry
        .version(record)
        .ok_or_else(|| ResolveError::MissingCommit {
            module: module.to_string(),
            group: label.to_string(),
        })?;

    Ok(ResolvedRow {
        context,
        url: &record.url,
        version,
        module,
    })
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::ManifestSection;

    fn registry() -> ModuleRegistry {
        [
            ("libfoo", ModuleRecord::new("https://x/libfoo.git")),
            ("libbar", ModuleRecord::new("https://x/libbar.git")),
            (
                "libqux",
                ModuleRecord::new("https://x/libqux.git").with_default_commit("v1.0"),
            ),
        ]
        .into_iter()
        .collect()
    }

    fn groups(rules: &[RuleGroup]) -> impl Iterator<Item = UsageGroup<'_, RuleEntry>> {
        rules.iter().map(UsageGroup::from)
    }

    fn rule(local: &str, entries: &[(&str, &str)]) -> RuleGroup {
        RuleGroup {
            local: local.to_string(),
            modules: entries
                .iter()
                .map(|(name, commit)| RuleEntry::new(*name, *commit))
                .collect(),
        }
    }

    #[test]
    fn rule_entry_resolves_to_label_url_commit_and_name() {
        let registry = registry();
        let rules = [rule("vendor/foo", &[("libfoo", "abc123")])];

        let rows: Vec<_> = resolve(&registry, groups(&rules))
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(
            rows,
            vec![ResolvedRow {
                context: "vendor/foo",
                url: "https://x/libfoo.git",
                version: "abc123",
                module: "libfoo",
            }]
        );
    }

    #[test]
    fn rows_follow_group_then_entry_order() {
        let registry = registry();
        let rules = [
            rule("b", &[("libbar", "2"), ("libfoo", "1")]),
            rule("a", &[("libfoo", "3")]),
        ];

        let rows: Vec<_> = resolve(&registry, groups(&rules))
            .map(Result::unwrap)
            .map(|row| (row.context, row.version, row.module))
            .collect();

        assert_eq!(
            rows,
            vec![
                ("b", "2", "libbar"),
                ("b", "1", "libfoo"),
                ("a", "3", "libfoo"),
            ]
        );
    }

    #[test]
    fn duplicate_references_are_resolved_independently() {
        let registry = registry();
        let rules = [
            rule("one", &[("libfoo", "aaa")]),
            rule("two", &[("libfoo", "bbb")]),
        ];

        let rows: Vec<_> = resolve(&registry, groups(&rules))
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].url, rows[1].url);
        assert_eq!(rows[0].module, rows[1].module);
        assert_eq!((rows[0].context, rows[0].version), ("one", "aaa"));
        assert_eq!((rows[1].context, rows[1].version), ("two", "bbb"));
    }

    #[test]
    fn unknown_module_names_module_and_group() {
        let registry = registry();
        let rules = [rule("vendor/baz", &[("libbaz", "abc")])];

        let error = resolve(&registry, groups(&rules))
            .next()
            .unwrap()
            .unwrap_err();

        assert_eq!(
            error,
            ResolveError::UnknownModule {
                module: "libbaz".to_string(),
                group: "vendor/baz".to_string(),
            }
        );
        assert!(error.to_string().contains("libbaz"));
    }

    #[test]
    fn rows_before_an_unknown_module_are_still_produced() {
        let registry = registry();
        let rules = [rule(
            "vendor",
            &[("libfoo", "1"), ("libbaz", "2"), ("libbar", "3")],
        )];

        let results: Vec<_> = resolve(&registry, groups(&rules)).collect();

        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(ResolveError::UnknownModule { ref module, .. }) if module == "libbaz"
        ));
    }

    #[test_case(Some("pinned"), "pinned" ; "entry commit wins")]
    #[test_case(None, "v1.0" ; "registry default is used")]
    fn rule_commit_falls_back_to_registry_default(commit: Option<&str>, expected: &str) {
        let registry = registry();
        let rules = [RuleGroup {
            local: "vendor/qux".to_string(),
            modules: vec![RuleEntry {
                name: "libqux".to_string(),
                commit: commit.map(ToString::to_string),
            }],
        }];

        let row = resolve(&registry, groups(&rules))
            .next()
            .unwrap()
            .unwrap();

        assert_eq!(row.version, expected);
    }

    #[test]
    fn rule_without_any_commit_fails() {
        let registry = registry();
        let rules = [RuleGroup {
            local: "vendor/foo".to_string(),
            modules: vec![RuleEntry {
                name: "libfoo".to_string(),
                commit: None,
            }],
        }];

        let error = resolve(&registry, groups(&rules))
            .next()
            .unwrap()
            .unwrap_err();

        assert!(matches!(error, ResolveError::MissingCommit { ref module, .. } if module == "libfoo"));
    }

    #[test]
    fn manifest_rows_use_marker_and_location() {
        let registry = registry();
        let manifest = Manifest::new(vec![ManifestEntry::new("libbar", "../libbar")], vec![]);

        let rows: Vec<_> = resolve(&registry, manifest.groups())
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(
            rows[0].fields(),
            ["*", "https://x/libbar.git", "../libbar", "libbar"]
        );
    }

    #[test]
    fn manifest_develop_rows_precede_consume_rows() {
        let registry = registry();
        let manifest = Manifest::new(
            vec![ManifestEntry::new("libfoo", "../libfoo")],
            vec![
                ManifestEntry::new("libbar", "main"),
                ManifestEntry::new("libqux", "release"),
            ],
        );

        let modules: Vec<_> = resolve(&registry, manifest.groups())
            .map(|row| row.unwrap().module)
            .collect();

        assert_eq!(modules, vec!["libfoo", "libbar", "libqux"]);
    }

    #[test]
    fn manifest_errors_name_the_section() {
        let registry = registry();
        let manifest = Manifest::new(vec![], vec![ManifestEntry::new("libbaz", "main")]);

        let error = resolve(&registry, manifest.groups())
            .next()
            .unwrap()
            .unwrap_err();

        assert_eq!(
            error,
            ResolveError::UnknownModule {
                module: "libbaz".to_string(),
                group: ManifestSection::Consume.to_string(),
            }
        );
    }

    #[test]
    fn empty_manifest_resolves_to_nothing() {
        let registry = registry();
        let manifest = Manifest::default();

        assert_eq!(resolve(&registry, manifest.groups()).count(), 0);
    }
}
