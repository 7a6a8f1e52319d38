//! Request handlers.

pub mod analyze;
pub mod health;
pub mod videos;

pub use analyze::*;
pub use health::*;
pub use videos::*;
