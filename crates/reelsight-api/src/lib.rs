//! Axum HTTP API server for ReelSight.
//!
//! This crate provides:
//! - Reel and YouTube analysis endpoints backed by the Gemini analyzer
//! - Direct video upload with summarization
//! - Stored video retrieval and deletion
//! - A two-tier cache over full analysis reports

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
