// Cross-cutting prompt fragments.
// Each module that calls the LLM keeps its own prompts.rs alongside it.

/// Appended to every system prompt that expects structured output.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Builds a system prompt from a role description plus the JSON-only rule.
pub fn json_system(role: &str) -> String {
    format!("{} {}", role.trim_end(), JSON_ONLY_INSTRUCTION)
}
