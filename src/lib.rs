//! mail-triage: lexicon-driven email triage with optional local-LLM delegation.
//!
//! Every email gets a category, an importance score, and a summary; emails
//! that warrant it also get a drafted reply and operator labels. All analysis
//! works offline from keyword lexicons; when an Ollama server is reachable it
//! is preferred, with transparent fallback to the rule-based tier.

pub mod classifier;
pub mod config;
pub mod content;
pub mod delegate;
pub mod error;
pub mod labels;
pub mod lexicon;
pub mod processor;
pub mod responder;
pub mod summary;
pub mod types;
