// Outreach pipeline: institution summary → company research → job extraction → email.
// All model calls go through llm_client::LanguageModel; nothing here speaks HTTP to the model.

pub mod chain;
pub mod handlers;
pub mod normalizer;
pub mod prompts;
pub mod workflow;

#[cfg(test)]
pub mod testing;
