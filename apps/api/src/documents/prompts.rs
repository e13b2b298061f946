// LLM prompt constants for the documents module.

/// Role half of the resume summary system prompt.
pub const RESUME_SUMMARY_ROLE: &str = "You are a resume summarization expert.";

/// Resume summary prompt template. Replace `{resume_text}` before sending.
pub const RESUME_SUMMARY_PROMPT_TEMPLATE: &str = r#"Provide a concise summary (2-3 sentences) of the following resume, highlighting the key skills and most relevant experiences. Name concrete skills and tools exactly as the resume writes them.

RESUME:
{resume_text}

Return a JSON object with this EXACT schema:
{
  "summary": "string"
}"#;
