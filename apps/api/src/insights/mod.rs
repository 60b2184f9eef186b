// Dashboard insights built on extraction output: skill frequencies, top skills,
// missing skills, suggestions and per-posting skill match.

pub mod frequency;
pub mod handlers;
pub mod matching;
pub mod suggestions;
