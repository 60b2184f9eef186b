// Skill extraction engine.
// catalog → automaton (trie) → matcher → exclusion filter → assembler, memoized by the
// extraction cache. `SkillEngine` ties the stages together and is what callers hold.

pub mod assembler;
pub mod automaton;
pub mod cache;
pub mod catalog;
pub mod engine;
pub mod exclusion;
pub mod handlers;
pub mod matcher;
