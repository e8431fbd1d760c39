// Resume tailoring: a deterministic keyword match plus LLM rewrite suggestions.

pub mod handlers;
pub mod matching;
pub mod prompts;
