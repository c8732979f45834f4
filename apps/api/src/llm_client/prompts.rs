// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Appended to structured-output system instructions.
pub const JSON_ONLY_INSTRUCTION: &str = "Output JSON only. Be concise and fast.";

/// Keeps free-text answers short; the UI renders them in small modals.
pub const BREVITY_INSTRUCTION: &str = "Fast, punchy responses only.";

/// Joins skills for inline use in a prompt, capped at `limit` entries.
pub fn skills_phrase(skills: &[String], limit: usize) -> String {
    skills
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
