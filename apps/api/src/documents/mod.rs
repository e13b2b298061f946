// Document uploads: type checks, Markdown conversion, and LLM resume summaries.
// Upstream pass-through endpoints live in handlers.rs but call crate::upstream.

pub mod converter;
pub mod handlers;
pub mod prompts;
pub mod summarizer;
pub mod upload;
