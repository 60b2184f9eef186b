//! The alias → canonical skill name mapping every other stage reads.
//!
//! Aliases are case-folded on the way in. One alias resolves to exactly one canonical
//! name: the first registration wins and later conflicting registrations are kept as
//! diagnostics instead of being merged.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::extraction::exclusion::{ContextPhraseRule, ExclusionRules};

/// Catalog bundled into the binary; used when `SKILL_CATALOG_PATH` is not set.
const DEFAULT_CATALOG_JSON: &str = include_str!("../../data/skills.json");

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("alias must not be empty")]
    EmptyAlias,

    #[error("alias '{alias}' has no canonical skill name")]
    EmptyCanonicalName { alias: String },

    #[error("catalog contains no skills")]
    Empty,
}

/// One record of the catalog source (the JSON the catalog is loaded from).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Context phrases that suppress this skill when present in the text.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<String>,
    /// Limits the phrase search to this many bytes either side of the match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusion_window: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub alias: String,
    pub canonical_name: String,
}

/// A registration that lost to an earlier one for the same alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasConflict {
    pub alias: String,
    pub kept: String,
    pub rejected: String,
}

/// What `Catalog::register` did with an alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Inserted,
    AlreadyRegistered,
    Conflict(AliasConflict),
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
    conflicts: Vec<AliasConflict>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `alias` for `canonical_name`. The alias is trimmed and case-folded.
    pub fn register(
        &mut self,
        alias: &str,
        canonical_name: &str,
    ) -> Result<Registration, CatalogError> {
        let alias = fold_case(alias.trim());
        if alias.is_empty() {
            return Err(CatalogError::EmptyAlias);
        }
        let canonical_name = canonical_name.trim();
        if canonical_name.is_empty() {
            return Err(CatalogError::EmptyCanonicalName { alias });
        }

        if let Some(&idx) = self.index.get(&alias) {
            let existing = &self.entries[idx];
            if existing.canonical_name == canonical_name {
                return Ok(Registration::AlreadyRegistered);
            }
            let conflict = AliasConflict {
                alias,
                kept: existing.canonical_name.clone(),
                rejected: canonical_name.to_string(),
            };
            warn!(
                alias = %conflict.alias,
                kept = %conflict.kept,
                rejected = %conflict.rejected,
                "Conflicting alias registration ignored"
            );
            self.conflicts.push(conflict.clone());
            return Ok(Registration::Conflict(conflict));
        }

        self.index.insert(alias.clone(), self.entries.len());
        self.entries.push(CatalogEntry {
            alias,
            canonical_name: canonical_name.to_string(),
        });
        Ok(Registration::Inserted)
    }

    pub fn canonical_name_for(&self, alias: &str) -> Option<&str> {
        self.index
            .get(&fold_case(alias.trim()))
            .map(|&idx| self.entries[idx].canonical_name.as_str())
    }

    /// Entries in registration order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn conflicts(&self) -> &[AliasConflict] {
        &self.conflicts
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Distinct canonical names, case-insensitive order.
    pub fn canonical_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .iter()
            .map(|e| e.canonical_name.clone())
            .collect();
        sort_case_insensitive(&mut names);
        names.dedup();
        names
    }

    /// Aliases grouped under their canonical name, canonical names in case-insensitive order.
    pub fn grouped(&self) -> Vec<(String, Vec<String>)> {
        let mut groups: HashMap<&str, Vec<String>> = HashMap::new();
        for entry in &self.entries {
            groups
                .entry(entry.canonical_name.as_str())
                .or_default()
                .push(entry.alias.clone());
        }
        self.canonical_names()
            .into_iter()
            .map(|name| {
                let aliases = groups.remove(name.as_str()).unwrap_or_default();
                (name, aliases)
            })
            .collect()
    }

    /// Builds a catalog plus its exclusion rules from source definitions.
    ///
    /// Each definition's `name` is registered as an alias of itself, followed by its
    /// `aliases`. Non-empty `exclusions` become a `ContextPhraseRule` on that skill,
    /// windowed when `exclusion_window` is set.
    pub fn from_definitions(
        definitions: &[SkillDefinition],
    ) -> Result<(Catalog, ExclusionRules), CatalogError> {
        if definitions.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut catalog = Catalog::new();
        let mut rules = ExclusionRules::new();

        for definition in definitions {
            catalog.register(&definition.name, &definition.name)?;
            for alias in &definition.aliases {
                catalog.register(alias, &definition.name)?;
            }
            if !definition.exclusions.is_empty() {
                let phrases = definition.exclusions.iter();
                let rule = match definition.exclusion_window {
                    Some(window) => ContextPhraseRule::within(phrases, window),
                    None => ContextPhraseRule::anywhere(phrases),
                };
                rules.insert(definition.name.trim(), rule);
            }
        }

        Ok((catalog, rules))
    }
}

/// Parses a JSON array of `SkillDefinition`.
pub fn parse_definitions(json: &str) -> anyhow::Result<Vec<SkillDefinition>> {
    serde_json::from_str(json).context("Skill catalog is not a valid JSON definition list")
}

/// Reads a catalog file from disk.
pub fn load_definitions(path: &Path) -> anyhow::Result<Vec<SkillDefinition>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read skill catalog at {}", path.display()))?;
    parse_definitions(&raw).with_context(|| format!("Invalid skill catalog at {}", path.display()))
}

pub fn default_definitions() -> anyhow::Result<Vec<SkillDefinition>> {
    parse_definitions(DEFAULT_CATALOG_JSON)
}

/// Per-character lowercase. Catalog aliases and scanned text must go through the same
/// folding so trie keys and text characters line up.
pub fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Case-insensitive ordering with an exact tie-break, so the order is total.
pub fn sort_case_insensitive(names: &mut [String]) {
    names.sort_by_cached_key(|name| (fold_case(name), name.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::matcher::MatchSpan;

    #[test]
    fn test_register_folds_alias_case() {
        let mut catalog = Catalog::new();
        catalog.register("React.JS", "React").unwrap();
        assert_eq!(catalog.entries()[0].alias, "react.js");
        assert_eq!(catalog.canonical_name_for("REACT.js"), Some("React"));
    }

    #[test]
    fn test_lookup_of_unknown_alias_is_none() {
        let catalog = Catalog::new();
        assert_eq!(catalog.canonical_name_for("cobol"), None);
    }

    #[test]
    fn test_empty_alias_is_rejected() {
        let mut catalog = Catalog::new();
        assert_eq!(catalog.register("   ", "Rust"), Err(CatalogError::EmptyAlias));
        assert_eq!(catalog.len(), 0);
    }

    #[test]
    fn test_missing_canonical_name_is_rejected() {
        let mut catalog = Catalog::new();
        let err = catalog.register("rust", " ").unwrap_err();
        assert_eq!(
            err,
            CatalogError::EmptyCanonicalName {
                alias: "rust".to_string()
            }
        );
    }

    #[test]
    fn test_first_registration_wins_on_conflict() {
        let mut catalog = Catalog::new();
        catalog.register("Next", "Next.js").unwrap();
        let outcome = catalog.register("next", "Next Steps").unwrap();

        assert!(matches!(outcome, Registration::Conflict(_)));
        assert_eq!(catalog.canonical_name_for("next"), Some("Next.js"));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.conflicts().len(), 1);
        assert_eq!(catalog.conflicts()[0].rejected, "Next Steps");
    }

    #[test]
    fn test_same_mapping_twice_is_not_a_conflict() {
        let mut catalog = Catalog::new();
        catalog.register("Jest", "Jest").unwrap();
        let outcome = catalog.register("JEST", "Jest").unwrap();
        assert_eq!(outcome, Registration::AlreadyRegistered);
        assert!(catalog.conflicts().is_empty());
    }

    #[test]
    fn test_from_definitions_registers_name_and_aliases() {
        let defs = vec![SkillDefinition {
            name: "Go (Golang)".to_string(),
            aliases: vec!["Golang".to_string()],
            exclusions: vec![],
            exclusion_window: None,
        }];
        let (catalog, rules) = Catalog::from_definitions(&defs).unwrap();
        assert_eq!(catalog.canonical_name_for("golang"), Some("Go (Golang)"));
        assert_eq!(catalog.canonical_name_for("go (golang)"), Some("Go (Golang)"));
        assert!(rules.is_empty());
    }

    #[test]
    fn test_from_definitions_rejects_empty_list() {
        assert!(matches!(
            Catalog::from_definitions(&[]),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn test_from_definitions_surfaces_bad_alias() {
        let defs = vec![SkillDefinition {
            name: "Rust".to_string(),
            aliases: vec!["".to_string()],
            exclusions: vec![],
            exclusion_window: None,
        }];
        assert!(matches!(
            Catalog::from_definitions(&defs),
            Err(CatalogError::EmptyAlias)
        ));
    }

    #[test]
    fn test_exclusions_become_rules() {
        let defs = vec![SkillDefinition {
            name: "Go".to_string(),
            aliases: vec![],
            exclusions: vec!["go-to-market".to_string()],
            exclusion_window: None,
        }];
        let (_, rules) = Catalog::from_definitions(&defs).unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_exclusion_window_limits_phrase_search() {
        let defs = vec![SkillDefinition {
            name: "Swift".to_string(),
            aliases: vec![],
            exclusions: vec!["Taylor Swift".to_string()],
            exclusion_window: Some(10),
        }];
        let (_, rules) = Catalog::from_definitions(&defs).unwrap();

        let near = "fan of taylor swift";
        let far = "swift and swiftui. unrelated: taylor swift";
        let at = |text: &str| MatchSpan {
            start: text.find("swift").unwrap(),
            end: text.find("swift").unwrap() + 5,
            canonical_name: "Swift".to_string(),
        };
        assert!(rules.is_excluded(near, &at(near)));
        assert!(!rules.is_excluded(far, &at(far)));
    }

    #[test]
    fn test_exclusion_window_is_read_from_json() {
        let json = r#"[
            {"name": "Swift", "exclusions": ["taylor swift"], "exclusion_window": 20},
            {"name": "Go"}
        ]"#;
        let defs = parse_definitions(json).unwrap();
        assert_eq!(defs[0].exclusion_window, Some(20));
        assert_eq!(defs[1].exclusion_window, None);
    }

    #[test]
    fn test_canonical_names_sorted_case_insensitive() {
        let mut catalog = Catalog::new();
        catalog.register("vue", "vue").unwrap();
        catalog.register("Angular", "Angular").unwrap();
        catalog.register("react.js", "React").unwrap();
        catalog.register("react", "React").unwrap();
        assert_eq!(catalog.canonical_names(), vec!["Angular", "React", "vue"]);
    }

    #[test]
    fn test_grouped_collects_aliases_per_skill() {
        let mut catalog = Catalog::new();
        catalog.register("React", "React").unwrap();
        catalog.register("React.js", "React").unwrap();
        let grouped = catalog.grouped();
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].1, vec!["react", "react.js"]);
    }

    #[test]
    fn test_default_catalog_parses_and_builds() {
        let defs = default_definitions().unwrap();
        assert!(!defs.is_empty());
        let (catalog, _) = Catalog::from_definitions(&defs).unwrap();
        assert_eq!(catalog.canonical_name_for("reactjs"), Some("React"));
        assert_eq!(catalog.canonical_name_for("golang"), Some("Go (Golang)"));
    }

    #[test]
    fn test_load_definitions_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skills.json");
        std::fs::write(&path, r#"[{"name": "Rust", "aliases": ["rustlang"]}]"#).unwrap();

        let defs = load_definitions(&path).unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].aliases, vec!["rustlang"]);
        assert!(defs[0].exclusions.is_empty());
    }

    #[test]
    fn test_load_definitions_reports_path_on_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_definitions(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
    }
}
