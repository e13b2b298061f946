// LLM prompt constants for the matching module.

/// Role half of the JD analysis system prompt; see `llm_client::prompts::json_system`.
pub const JD_ANALYZE_ROLE: &str = "You are an AI expert in analyzing job descriptions.";

/// JD analysis prompt template. Replace `{job_description}` before sending.
pub const JD_ANALYZE_PROMPT_TEMPLATE: &str = r#"Based on the job description provided, extract the required skills, the required experience, and provide a short summary of the analysis.

Job Description:
{job_description}

Return a JSON object with this EXACT schema (no extra fields):
{
  "required_skills": ["project management", "SQL"],
  "required_experience": "5+ years in a similar role",
  "summary": "One or two sentences describing the role."
}

Rules:
1. Each required skill is a short phrase (1-4 words), not a sentence.
2. List only skills the description asks for; do not invent any.
3. If no experience requirement is stated, set "required_experience" to "".
4. Return ONLY the JSON object."#;
