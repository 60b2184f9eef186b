//! Axum route handlers for the dashboard insights API.
//!
//! Callers send the postings' descriptions (and the user's skills where relevant);
//! nothing here touches storage. Every description goes through the shared engine,
//! so repeated dashboard refreshes are served from the extraction cache.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::engine::SkillEngine;
use crate::insights::frequency::{
    missing_skill_frequencies, paginate, skill_frequencies, top_skills, FrequencyPage, TopSkills,
};
use crate::insights::matching::{match_job, SkillMatch};
use crate::insights::suggestions::suggested_skills;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: usize = 10;
const DEFAULT_TOP_LIMIT: usize = 10;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_limit() -> usize {
    DEFAULT_TOP_LIMIT
}

#[derive(Debug, Deserialize)]
pub struct FrequencyRequest {
    pub descriptions: Vec<Option<String>>,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

#[derive(Debug, Deserialize)]
pub struct TopSkillsRequest {
    pub descriptions: Vec<Option<String>>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

#[derive(Debug, Deserialize)]
pub struct MissingSkillsRequest {
    pub descriptions: Vec<Option<String>>,
    #[serde(default)]
    pub user_skills: Vec<String>,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

#[derive(Debug, Deserialize)]
pub struct SuggestedSkillsRequest {
    pub descriptions: Vec<Option<String>>,
    #[serde(default)]
    pub user_skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestedSkillsResponse {
    pub suggested_skills: Vec<String>,
}

/// A posting to score. A non-empty `skills` list is used as-is; otherwise the
/// description is extracted.
#[derive(Debug, Deserialize)]
pub struct JobInput {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub jobs: Vec<JobInput>,
    #[serde(default)]
    pub user_skills: Vec<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkillSource {
    Stored,
    Extracted,
}

#[derive(Debug, Serialize)]
pub struct JobMatch {
    pub id: String,
    pub skill_source: SkillSource,
    #[serde(flatten)]
    pub result: SkillMatch,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub jobs: Vec<JobMatch>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/insights/frequency
///
/// Paginated table of how many postings mention each skill.
pub async fn handle_frequency(
    State(state): State<AppState>,
    Json(request): Json<FrequencyRequest>,
) -> Result<Json<FrequencyPage>, AppError> {
    validate_page(request.page, request.page_size)?;
    let skill_lists = extract_all(&state.engine, &request.descriptions);
    let table = skill_frequencies(&skill_lists);
    Ok(Json(paginate(&table, request.page, request.page_size)))
}

/// POST /api/v1/insights/top
///
/// The `limit` most frequent skills (10 by default) for chart builders.
pub async fn handle_top_skills(
    State(state): State<AppState>,
    Json(request): Json<TopSkillsRequest>,
) -> Json<TopSkills> {
    let skill_lists = extract_all(&state.engine, &request.descriptions);
    let table = skill_frequencies(&skill_lists);
    Json(top_skills(&table, request.limit))
}

/// POST /api/v1/insights/missing
///
/// Paginated frequencies of posting skills absent from the user's skill list.
pub async fn handle_missing_skills(
    State(state): State<AppState>,
    Json(request): Json<MissingSkillsRequest>,
) -> Result<Json<FrequencyPage>, AppError> {
    validate_page(request.page, request.page_size)?;
    let skill_lists = extract_all(&state.engine, &request.descriptions);
    let table = missing_skill_frequencies(&skill_lists, &request.user_skills);
    Ok(Json(paginate(&table, request.page, request.page_size)))
}

/// POST /api/v1/insights/suggested
pub async fn handle_suggested_skills(
    State(state): State<AppState>,
    Json(request): Json<SuggestedSkillsRequest>,
) -> Json<SuggestedSkillsResponse> {
    let skill_lists = extract_all(&state.engine, &request.descriptions);
    Json(SuggestedSkillsResponse {
        suggested_skills: suggested_skills(&skill_lists, &request.user_skills),
    })
}

/// POST /api/v1/insights/match
///
/// Per-posting matching/missing skills and match percentage, best match first.
/// Postings with equal percentages keep request order.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Json<MatchResponse> {
    let mut jobs: Vec<JobMatch> = request
        .jobs
        .into_iter()
        .map(|job| {
            let (skills, skill_source) = if job.skills.is_empty() {
                (
                    state.engine.extract_skills(job.description.as_deref()),
                    SkillSource::Extracted,
                )
            } else {
                (job.skills, SkillSource::Stored)
            };
            JobMatch {
                id: job.id,
                skill_source,
                result: match_job(&skills, &request.user_skills),
            }
        })
        .collect();
    jobs.sort_by(|a, b| b.result.match_percentage.cmp(&a.result.match_percentage));

    Json(MatchResponse { jobs })
}

fn extract_all(engine: &SkillEngine, descriptions: &[Option<String>]) -> Vec<Vec<String>> {
    descriptions
        .iter()
        .map(|d| engine.extract_skills(d.as_deref()))
        .collect()
}

fn validate_page(page: usize, page_size: usize) -> Result<(), AppError> {
    if page == 0 {
        return Err(AppError::Validation("page must be at least 1".to_string()));
    }
    if page_size == 0 {
        return Err(AppError::Validation(
            "page_size must be at least 1".to_string(),
        ));
    }
    Ok(())
}
