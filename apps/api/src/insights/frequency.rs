//! Skill frequency tables across a set of job postings.
//!
//! A skill counts once per posting no matter how often the posting mentions it.
//! Tables are ordered by descending frequency; equal counts fall back to
//! case-insensitive name order so pages are stable between calls.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::extraction::catalog::fold_case;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillFrequency {
    pub skill: String,
    pub frequency: u32,
}

/// One page of a frequency table, as parallel lists for chart builders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyPage {
    pub skills: Vec<String>,
    pub frequencies: Vec<u32>,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopSkills {
    pub skills: Vec<String>,
    pub frequencies: Vec<u32>,
}

pub fn skill_frequencies<L>(skill_lists: &[L]) -> Vec<SkillFrequency>
where
    L: AsRef<[String]>,
{
    count(skill_lists, |_| true)
}

/// Frequencies of job skills the user does not have. Comparison is exact on
/// canonical names.
pub fn missing_skill_frequencies<L>(
    skill_lists: &[L],
    user_skills: &[String],
) -> Vec<SkillFrequency>
where
    L: AsRef<[String]>,
{
    let owned: HashSet<&str> = user_skills.iter().map(String::as_str).collect();
    count(skill_lists, |skill| !owned.contains(skill))
}

fn count<L>(skill_lists: &[L], keep: impl Fn(&str) -> bool) -> Vec<SkillFrequency>
where
    L: AsRef<[String]>,
{
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for list in skill_lists {
        let distinct: HashSet<&str> = list.as_ref().iter().map(String::as_str).collect();
        for skill in distinct.into_iter().filter(|&s| keep(s)) {
            *counts.entry(skill).or_insert(0) += 1;
        }
    }

    let mut table: Vec<SkillFrequency> = counts
        .into_iter()
        .map(|(skill, frequency)| SkillFrequency {
            skill: skill.to_string(),
            frequency,
        })
        .collect();
    table.sort_by_cached_key(|f| {
        (
            std::cmp::Reverse(f.frequency),
            fold_case(&f.skill),
            f.skill.clone(),
        )
    });
    table
}

/// 1-based pagination. Pages past the end are empty; `page` and `page_size` below 1
/// are treated as 1.
pub fn paginate(table: &[SkillFrequency], page: usize, page_size: usize) -> FrequencyPage {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let start = (page - 1).saturating_mul(page_size);

    let (skills, frequencies): (Vec<String>, Vec<u32>) = table
        .iter()
        .skip(start)
        .take(page_size)
        .map(|f| (f.skill.clone(), f.frequency))
        .unzip();

    FrequencyPage {
        skills,
        frequencies,
        total_pages: table.len().div_ceil(page_size),
        current_page: page,
        page_size,
    }
}

pub fn top_skills(table: &[SkillFrequency], limit: usize) -> TopSkills {
    let (skills, frequencies): (Vec<String>, Vec<u32>) = table
        .iter()
        .take(limit)
        .map(|f| (f.skill.clone(), f.frequency))
        .unzip();
    TopSkills {
        skills,
        frequencies,
    }
}
