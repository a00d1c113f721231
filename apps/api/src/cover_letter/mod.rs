// Cover letter generation: deterministic composer, keyword-driven motivation
// rules, and the remote/template writer fallback.
// All generative API calls go through llm_client.

pub mod composer;
pub mod handlers;
pub mod motivation;
pub mod prompts;
pub mod writer;
