// src/utils/mod.rs
//! Common utilities
//!
//! - **config**: Interceptor configuration and loading
//! - **errors**: Crate-level error types

pub mod config;
pub mod errors;

pub use config::InterceptorConfig;
pub use errors::{Result, TapError};
