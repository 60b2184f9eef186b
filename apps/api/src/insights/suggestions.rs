use std::collections::HashSet;

use crate::extraction::catalog::sort_case_insensitive;

/// Every skill seen across the postings that the user does not list yet,
/// in case-insensitive order.
pub fn suggested_skills<L>(skill_lists: &[L], user_skills: &[String]) -> Vec<String>
where
    L: AsRef<[String]>,
{
    let owned: HashSet<&str> = user_skills.iter().map(String::as_str).collect();
    let mut suggestions: Vec<String> = skill_lists
        .iter()
        .flat_map(|list| list.as_ref().iter())
        .filter(|skill| !owned.contains(skill.as_str()))
        .cloned()
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    sort_case_insensitive(&mut suggestions);
    suggestions
}
