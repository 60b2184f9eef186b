//! Axum route handlers for the extraction and catalog API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::cache::CacheStats;
use crate::extraction::catalog::{self, AliasConflict, SkillDefinition};
use crate::extraction::engine::{CatalogSummary, CompiledCatalog, ScanReport};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchExtractRequest {
    pub descriptions: Vec<Option<String>>,
}

#[derive(Debug, Serialize)]
pub struct BatchExtractResponse {
    pub results: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct CatalogSkill {
    pub name: String,
    pub aliases: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub generation: u64,
    pub skills: Vec<CatalogSkill>,
    pub conflicts: Vec<AliasConflict>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub alias: String,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub alias: String,
    /// `null` when the alias is not in the catalog.
    pub canonical_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceCatalogRequest {
    pub skills: Vec<SkillDefinition>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/skills/extract
///
/// Canonical skills in one description. A null or empty description yields `[]`.
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Json<ExtractResponse> {
    let skills = state.engine.extract_skills(request.description.as_deref());
    Json(ExtractResponse { skills })
}

/// POST /api/v1/skills/extract/batch
///
/// One result list per description, in request order.
pub async fn handle_extract_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchExtractRequest>,
) -> Json<BatchExtractResponse> {
    let results = request
        .descriptions
        .iter()
        .map(|d| state.engine.extract_skills(d.as_deref()))
        .collect();
    Json(BatchExtractResponse { results })
}

/// POST /api/v1/skills/explain
///
/// Raw boundary-valid spans, the spans vetoed by exclusion rules, and the final list.
/// Bypasses the cache.
pub async fn handle_explain(
    State(state): State<AppState>,
    Json(request): Json<ExplainRequest>,
) -> Json<ScanReport> {
    Json(state.engine.explain(&request.description))
}

/// GET /api/v1/catalog
///
/// Canonical skills with their folded aliases, plus alias conflict diagnostics.
pub async fn handle_get_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    let compiled = state.engine.snapshot();
    let skills = compiled
        .catalog()
        .grouped()
        .into_iter()
        .map(|(name, aliases)| CatalogSkill { name, aliases })
        .collect();

    Json(CatalogResponse {
        generation: compiled.generation(),
        skills,
        conflicts: compiled.catalog().conflicts().to_vec(),
    })
}

/// GET /api/v1/catalog/resolve?alias=...
///
/// Canonical name for a single alias, case-insensitively.
pub async fn handle_resolve_alias(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Json<ResolveResponse> {
    let canonical_name = state
        .engine
        .snapshot()
        .catalog()
        .canonical_name_for(&query.alias)
        .map(str::to_string);
    Json(ResolveResponse {
        alias: query.alias,
        canonical_name,
    })
}

/// PUT /api/v1/catalog
///
/// Compiles the submitted definitions and swaps them in. The previous catalog keeps
/// serving until the new one is fully built; a bad definition leaves it in place.
pub async fn handle_replace_catalog(
    State(state): State<AppState>,
    Json(request): Json<ReplaceCatalogRequest>,
) -> Result<Json<CatalogSummary>, AppError> {
    let compiled = CompiledCatalog::from_definitions(&request.skills)?;
    Ok(Json(state.engine.replace_catalog(compiled)))
}

/// POST /api/v1/catalog/reload
///
/// Re-reads the configured catalog file (or the bundled catalog) and swaps it in.
pub async fn handle_reload_catalog(
    State(state): State<AppState>,
) -> Result<Json<CatalogSummary>, AppError> {
    let definitions = match &state.config.catalog_path {
        Some(path) => catalog::load_definitions(path)?,
        None => catalog::default_definitions()?,
    };
    let compiled = CompiledCatalog::from_definitions(&definitions)?;
    Ok(Json(state.engine.replace_catalog(compiled)))
}

/// GET /api/v1/cache/stats
pub async fn handle_cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.engine.cache_stats())
}
