// Profile audit: deterministic scoring, AI critique, and the submit pipeline.
// All LLM calls go through llm_client.

pub mod engine;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod scoring;
