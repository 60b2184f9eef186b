use std::collections::HashSet;

use crate::extraction::catalog::sort_case_insensitive;
use crate::extraction::matcher::MatchSpan;

/// Reduces spans to distinct canonical names in case-insensitive lexicographic order.
pub fn assemble<I>(matches: I) -> Vec<String>
where
    I: IntoIterator<Item = MatchSpan>,
{
    let distinct: HashSet<String> = matches.into_iter().map(|m| m.canonical_name).collect();
    let mut skills: Vec<String> = distinct.into_iter().collect();
    sort_case_insensitive(&mut skills);
    skills
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, name: &str) -> MatchSpan {
        MatchSpan {
            start,
            end: start + name.len(),
            canonical_name: name.to_string(),
        }
    }

    #[test]
    fn test_duplicate_names_collapse() {
        let skills = assemble(vec![span(0, "Go (Golang)"), span(20, "Go (Golang)")]);
        assert_eq!(skills, vec!["Go (Golang)"]);
    }

    #[test]
    fn test_order_is_case_insensitive() {
        let skills = assemble(vec![
            span(0, "jQuery"),
            span(10, "C++"),
            span(20, "Angular"),
            span(30, "C#"),
        ]);
        assert_eq!(skills, vec!["Angular", "C#", "C++", "jQuery"]);
    }

    #[test]
    fn test_order_does_not_depend_on_span_order() {
        let forward = assemble(vec![span(0, "Rust"), span(5, "AWS"), span(9, "iOS")]);
        let reverse = assemble(vec![span(9, "iOS"), span(5, "AWS"), span(0, "Rust")]);
        assert_eq!(forward, reverse);
        assert_eq!(forward, vec!["AWS", "iOS", "Rust"]);
    }

    #[test]
    fn test_names_differing_only_in_case_keep_stable_order() {
        let skills = assemble(vec![span(0, "sql"), span(4, "SQL")]);
        assert_eq!(skills, vec!["SQL", "sql"]);
    }

    #[test]
    fn test_no_matches_is_empty() {
        assert!(assemble(Vec::new()).is_empty());
    }
}
