//! Business logic services.

pub mod fetcher;
pub mod pipeline;
pub mod prompts;
