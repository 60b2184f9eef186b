//! Skill engine — the long-lived extraction service shared by every caller.
//!
//! Lifecycle: built once at startup (catalog → automaton), then serves extractions.
//! The compiled catalog sits behind a swappable `Arc`: a replacement is compiled off to
//! the side and swapped in, so in-flight scans keep reading the snapshot they started
//! with. Cache keys carry the catalog generation so results computed against an old
//! catalog are never served after a swap.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};

use crate::extraction::assembler::assemble;
use crate::extraction::automaton::Automaton;
use crate::extraction::cache::{fingerprint, CacheStats, ExtractionCache};
use crate::extraction::catalog::{AliasConflict, Catalog, CatalogError, SkillDefinition};
use crate::extraction::exclusion::{self, ExclusionRules};
use crate::extraction::matcher::{scan_folded, FoldedText, MatchSpan};

/// Catalog, automaton and exclusion rules compiled together. Immutable.
#[derive(Debug)]
pub struct CompiledCatalog {
    generation: u64,
    catalog: Catalog,
    automaton: Automaton,
    exclusions: ExclusionRules,
}

/// Full trace of one extraction, for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub matches: Vec<MatchSpan>,
    pub excluded: Vec<MatchSpan>,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    pub generation: u64,
    pub aliases: usize,
    pub skills: usize,
    pub exclusion_rules: usize,
    pub trie_nodes: usize,
    /// Longest alias in characters.
    pub longest_alias: usize,
    pub conflicts: Vec<AliasConflict>,
}

impl CompiledCatalog {
    pub fn new(catalog: Catalog, exclusions: ExclusionRules) -> Self {
        let automaton = Automaton::build(&catalog);
        Self {
            generation: 0,
            catalog,
            automaton,
            exclusions,
        }
    }

    pub fn from_definitions(definitions: &[SkillDefinition]) -> Result<Self, CatalogError> {
        let (catalog, exclusions) = Catalog::from_definitions(definitions)?;
        Ok(Self::new(catalog, exclusions))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Scan → exclusion filter → assemble. Pure; never touches the cache.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let folded = FoldedText::new(text);
        let matches = scan_folded(&folded, &self.automaton);
        assemble(exclusion::filter(matches, folded.as_str(), &self.exclusions))
    }

    pub fn explain(&self, text: &str) -> ScanReport {
        let folded = FoldedText::new(text);
        let matches = scan_folded(&folded, &self.automaton);
        let (kept, excluded): (Vec<MatchSpan>, Vec<MatchSpan>) = matches
            .iter()
            .cloned()
            .partition(|span| !self.exclusions.is_excluded(folded.as_str(), span));
        ScanReport {
            matches,
            excluded,
            skills: assemble(kept),
        }
    }

    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            generation: self.generation,
            aliases: self.catalog.len(),
            skills: self.catalog.canonical_names().len(),
            exclusion_rules: self.exclusions.len(),
            trie_nodes: self.automaton.node_count(),
            longest_alias: self.automaton.longest_alias(),
            conflicts: self.catalog.conflicts().to_vec(),
        }
    }
}

pub struct SkillEngine {
    compiled: RwLock<Arc<CompiledCatalog>>,
    next_generation: AtomicU64,
    cache: ExtractionCache,
}

impl SkillEngine {
    pub fn new(compiled: CompiledCatalog, cache_capacity: usize) -> Self {
        let engine = Self {
            compiled: RwLock::new(Arc::new(compiled)),
            next_generation: AtomicU64::new(1),
            cache: ExtractionCache::new(cache_capacity),
        };
        log_compiled("Skill catalog compiled", &engine.snapshot().summary());
        engine
    }

    pub fn from_definitions(
        definitions: &[SkillDefinition],
        cache_capacity: usize,
    ) -> Result<Self, CatalogError> {
        Ok(Self::new(
            CompiledCatalog::from_definitions(definitions)?,
            cache_capacity,
        ))
    }

    /// Current compiled catalog. Cheap: clones an `Arc` under a short read lock.
    pub fn snapshot(&self) -> Arc<CompiledCatalog> {
        self.compiled.read().clone()
    }

    /// Canonical skills mentioned in `description`, case-insensitive order.
    /// `None` and empty text yield an empty list.
    pub fn extract_skills(&self, description: Option<&str>) -> Vec<String> {
        let text = match description {
            Some(text) if !text.is_empty() => text,
            _ => return Vec::new(),
        };

        let compiled = self.snapshot();
        let key = format!("{}:{}", compiled.generation, fingerprint(text));
        if let Some(skills) = self.cache.get(&key) {
            debug!(preview = %preview(text), "Extraction cache hit");
            return skills;
        }

        let skills = compiled.extract(text);
        self.cache.put(key, skills.clone());
        skills
    }

    pub fn explain(&self, description: &str) -> ScanReport {
        self.snapshot().explain(description)
    }

    /// Swaps in a new catalog. Scans already running finish against the old one.
    ///
    /// The generation is assigned under the same write lock as the swap, so the
    /// installed catalog always carries the highest generation handed out so far.
    pub fn replace_catalog(&self, mut compiled: CompiledCatalog) -> CatalogSummary {
        let installed = {
            let mut current = self.compiled.write();
            compiled.generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
            let installed = Arc::new(compiled);
            *current = Arc::clone(&installed);
            self.cache.clear();
            installed
        };

        let summary = installed.summary();
        log_compiled("Skill catalog replaced", &summary);
        summary
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

fn log_compiled(message: &str, summary: &CatalogSummary) {
    info!(
        generation = summary.generation,
        aliases = summary.aliases,
        skills = summary.skills,
        exclusion_rules = summary.exclusion_rules,
        trie_nodes = summary.trie_nodes,
        longest_alias = summary.longest_alias,
        conflicts = summary.conflicts.len(),
        "{message}"
    );
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(50) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
