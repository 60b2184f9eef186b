//! Exclusion filter — per-skill predicates that veto matches the boundary check lets
//! through (an acronym that is also an English word, a product name inside a phrase).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::extraction::catalog::fold_case;
use crate::extraction::matcher::MatchSpan;

/// Returns true when `span` should be suppressed. `text` is the full folded text the
/// span indexes into, so rules can look at context outside the match.
pub trait ExclusionRule: Send + Sync {
    fn excludes(&self, text: &str, span: &MatchSpan) -> bool;
}

impl<F> ExclusionRule for F
where
    F: Fn(&str, &MatchSpan) -> bool + Send + Sync,
{
    fn excludes(&self, text: &str, span: &MatchSpan) -> bool {
        self(text, span)
    }
}

/// Suppresses a skill when one of its context phrases appears in the text.
///
/// With no window the phrase may appear anywhere in the text. With a window only the
/// `window` bytes either side of the span (plus the span itself) are searched.
#[derive(Debug, Clone)]
pub struct ContextPhraseRule {
    phrases: Vec<String>,
    window: Option<usize>,
}

impl ContextPhraseRule {
    pub fn anywhere<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            phrases: fold_phrases(phrases),
            window: None,
        }
    }

    pub fn within<I, S>(phrases: I, window: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            phrases: fold_phrases(phrases),
            window: Some(window),
        }
    }
}

impl ExclusionRule for ContextPhraseRule {
    fn excludes(&self, text: &str, span: &MatchSpan) -> bool {
        let haystack = match self.window {
            None => text,
            Some(window) => {
                let from = floor_char_boundary(text, span.start.saturating_sub(window));
                let to = ceil_char_boundary(text, span.end.saturating_add(window));
                &text[from..to]
            }
        };
        self.phrases.iter().any(|phrase| haystack.contains(phrase.as_str()))
    }
}

fn fold_phrases<I, S>(phrases: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    phrases
        .into_iter()
        .map(|p| fold_case(p.as_ref().trim()))
        .filter(|p| !p.is_empty())
        .collect()
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(text: &str, idx: usize) -> usize {
    let mut idx = idx.min(text.len());
    while !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

/// Exclusion rules keyed by canonical skill name.
#[derive(Clone, Default)]
pub struct ExclusionRules {
    rules: HashMap<String, Vec<Arc<dyn ExclusionRule>>>,
}

impl ExclusionRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, skill: &str, rule: impl ExclusionRule + 'static) {
        self.rules
            .entry(skill.to_string())
            .or_default()
            .push(Arc::new(rule));
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn is_excluded(&self, text: &str, span: &MatchSpan) -> bool {
        self.rules
            .get(&span.canonical_name)
            .is_some_and(|rules| rules.iter().any(|rule| rule.excludes(text, span)))
    }
}

impl fmt::Debug for ExclusionRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut skills: Vec<&String> = self.rules.keys().collect();
        skills.sort();
        f.debug_struct("ExclusionRules")
            .field("skills", &skills)
            .finish()
    }
}

/// Drops every span vetoed by a rule for its skill. Order is preserved.
pub fn filter(matches: Vec<MatchSpan>, text: &str, rules: &ExclusionRules) -> Vec<MatchSpan> {
    if rules.is_empty() {
        return matches;
    }
    matches
        .into_iter()
        .filter(|span| !rules.is_excluded(text, span))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize, name: &str) -> MatchSpan {
        MatchSpan {
            start,
            end,
            canonical_name: name.to_string(),
        }
    }

    #[test]
    fn test_no_rules_keeps_everything() {
        let matches = vec![span(0, 2, "Go"), span(3, 7, "Rust")];
        let kept = filter(matches.clone(), "go rust", &ExclusionRules::new());
        assert_eq!(kept, matches);
    }

    #[test]
    fn test_phrase_anywhere_suppresses_only_its_skill() {
        let text = "own the go-to-market plan. rust services.";
        let mut rules = ExclusionRules::new();
        rules.insert("Go", ContextPhraseRule::anywhere(["Go-To-Market"]));

        let kept = filter(
            vec![span(8, 10, "Go"), span(27, 31, "Rust")],
            text,
            &rules,
        );
        assert_eq!(kept, vec![span(27, 31, "Rust")]);
    }

    #[test]
    fn test_phrase_absent_keeps_match() {
        let mut rules = ExclusionRules::new();
        rules.insert("Go", ContextPhraseRule::anywhere(["go-to-market"]));
        let kept = filter(vec![span(0, 2, "Go")], "go and rust", &rules);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_windowed_phrase_only_looks_near_the_span() {
        let text = "swift developer. later on: taylor swift fan club";
        let rule = ContextPhraseRule::within(["taylor"], 8);

        assert!(!rule.excludes(text, &span(0, 5, "Swift")));
        assert!(rule.excludes(text, &span(34, 39, "Swift")));
    }

    #[test]
    fn test_window_clamps_to_char_boundaries() {
        let text = "ééé go ééé";
        let start = text.find("go").unwrap();
        let rule = ContextPhraseRule::within(["é"], 2);
        // Two bytes either side lands mid-character; the window widens to whole chars.
        assert!(rule.excludes(text, &span(start, start + 2, "Go")));
    }

    #[test]
    fn test_closure_rules_receive_full_text() {
        let mut rules = ExclusionRules::new();
        rules.insert("AI", |text: &str, span: &MatchSpan| {
            text[span.end..].starts_with(" and i")
        });

        let text = "ai and i went home";
        assert!(filter(vec![span(0, 2, "AI")], text, &rules).is_empty());
        assert_eq!(filter(vec![span(0, 2, "AI")], "ai tooling", &rules).len(), 1);
    }

    #[test]
    fn test_empty_phrases_are_dropped() {
        let rule = ContextPhraseRule::anywhere(["", "  ", "Excel Sheet"]);
        // An empty phrase would be contained in every text.
        assert!(!rule.excludes("excel is fine", &span(0, 5, "Excel")));
        assert!(rule.excludes("an excel sheet", &span(3, 8, "Excel")));
    }

    #[test]
    fn test_rule_count_spans_skills() {
        let mut rules = ExclusionRules::new();
        rules.insert("Go", ContextPhraseRule::anywhere(["go-to-market"]));
        rules.insert("Go", ContextPhraseRule::anywhere(["go live"]));
        rules.insert("R", ContextPhraseRule::anywhere(["r&d"]));
        assert_eq!(rules.len(), 3);
        assert!(rules.is_excluded("r&d team", &span(0, 1, "R")));
        assert!(!rules.is_excluded("r&d team", &span(0, 1, "Rust")));
    }
}
