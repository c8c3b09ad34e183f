// Resume/job match assessment engine.
// Implements: field catalog, judgment requests, response normalization,
// score aggregation, improvement extraction, and the scan runner.
// All LLM calls go through llm_client via LlmJudgmentProvider.

pub mod aggregator;
pub mod catalog;
pub mod handlers;
pub mod improvements;
pub mod judgment;
pub mod normalizer;
pub mod prompts;
pub mod provider;
pub mod request_builder;
pub mod runner;
