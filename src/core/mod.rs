//! Core domain models
//!
//! This module defines the outcome model, the request and context
//! values threaded through the pipeline, and the stored entities.

pub mod config;
pub mod context;
pub mod group;
pub mod outcome;
pub mod request;

pub use config::LoaderConfig;
pub use context::*;
pub use group::*;
pub use outcome::*;
pub use request::*;
