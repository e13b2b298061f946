// Resume ↔ job matching.
// Keyword scoring is pure; JD analysis is the only LLM call in this module.

pub mod handlers;
pub mod jd_analyzer;
pub mod keyword;
pub mod pipeline;
pub mod prompts;
pub mod scorer;
