//! URL-keyed analysis result cache for the ReelSight backend.

pub mod error;
pub mod store;

pub use error::{CacheError, CacheResult};
pub use store::{AnalysisCache, DEFAULT_TTL};
