//! Job ↔ candidate skill match.

use std::collections::HashSet;

use serde::Serialize;

use crate::extraction::catalog::sort_case_insensitive;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillMatch {
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    /// round(matching / total × 100); 0 when the job lists no skills.
    pub match_percentage: u32,
}

/// Splits a job's skills into ones the user has and ones they lack.
/// Duplicate job skills count once.
pub fn match_job(job_skills: &[String], user_skills: &[String]) -> SkillMatch {
    let owned: HashSet<&str> = user_skills.iter().map(String::as_str).collect();

    let mut distinct: Vec<String> = job_skills
        .iter()
        .collect::<HashSet<_>>()
        .into_iter()
        .cloned()
        .collect();
    sort_case_insensitive(&mut distinct);

    let total = distinct.len();
    let (matching_skills, missing_skills): (Vec<String>, Vec<String>) = distinct
        .into_iter()
        .partition(|skill| owned.contains(skill.as_str()));

    SkillMatch {
        match_percentage: percentage(matching_skills.len(), total),
        matching_skills,
        missing_skills,
    }
}

fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u32
}
