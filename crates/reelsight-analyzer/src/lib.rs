//! Content-analyzer client for the ReelSight backend.
//!
//! Models the external generative analyzer as an opaque capability: upload a
//! video, poll its readiness state, then request generation constrained to a
//! caller-supplied JSON schema and parse the typed result.

pub mod client;
pub mod error;

pub use client::{AnalyzerConfig, GeminiClient, RemoteFile};
pub use error::{AnalyzerError, AnalyzerResult};
