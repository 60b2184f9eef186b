//! Walks the trie from every start offset and keeps only word-bounded hits.
//!
//! Boundaries are checked on the characters immediately outside a candidate span:
//! neither neighbour may be an ASCII letter or digit. Characters inside an alias
//! ("." in "node.js", "+" in "c++") are ordinary trie characters.
//!
//! Walking continues past terminal nodes, so "c" and "c++" can both fire from the same
//! offset. No longest-match preference is applied here; the assembler dedupes by name.

use serde::Serialize;

use crate::extraction::automaton::Automaton;
use crate::extraction::catalog::fold_case;

/// A candidate match. Offsets are byte offsets into the folded text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
    pub canonical_name: String,
}

/// Case-folded copy of an input text, with its char boundaries precomputed.
#[derive(Debug, Clone)]
pub struct FoldedText {
    text: String,
    chars: Vec<(usize, char)>,
}

impl FoldedText {
    pub fn new(raw: &str) -> Self {
        let text = fold_case(raw);
        let chars = text.char_indices().collect();
        Self { text, chars }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Byte offset where char `idx` starts; `idx == len` maps to the end of the text.
    fn byte_offset(&self, idx: usize) -> usize {
        self.chars
            .get(idx)
            .map(|&(offset, _)| offset)
            .unwrap_or(self.text.len())
    }

    fn is_word_char(&self, idx: usize) -> bool {
        self.chars
            .get(idx)
            .is_some_and(|&(_, c)| c.is_ascii_alphanumeric())
    }
}

pub fn scan_folded(folded: &FoldedText, automaton: &Automaton) -> Vec<MatchSpan> {
    let mut matches = Vec::new();
    let len = folded.chars.len();

    for start in 0..len {
        // A failed left boundary rejects every span starting here.
        if start > 0 && folded.is_word_char(start - 1) {
            continue;
        }

        let mut node = automaton.root();
        for idx in start..len {
            let Some(next) = node.child(folded.chars[idx].1) else {
                break;
            };
            node = next;

            if let Some(canonical_name) = node.canonical_name() {
                if !folded.is_word_char(idx + 1) {
                    matches.push(MatchSpan {
                        start: folded.byte_offset(start),
                        end: folded.byte_offset(idx + 1),
                        canonical_name: canonical_name.to_string(),
                    });
                }
            }
        }
    }

    matches
}
