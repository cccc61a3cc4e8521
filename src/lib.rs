// src/lib.rs
//! HTTP Tap
//!
//! A transparent interception layer for outbound HTTP. Wrap any tower
//! transport in an [`Interceptor`] to get a human-readable transcript of
//! every request and response, or switch on simulate mode to answer every
//! request with a synthetic `200 OK` and never touch the network.
//!
//! # Architecture
//!
//! - **interception**: the interceptor, its transcript and body replay
//! - **observability**: tracing subscriber setup
//! - **utils**: configuration and errors
//!
//! # Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use http_body_util::{BodyExt, Full};
//! use http_tap::{Interceptor, InterceptorConfig};
//! use hyper::Request;
//! use tower::ServiceExt;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client: Interceptor<http_tap::DefaultTransport> =
//!     Interceptor::with_default_transport(InterceptorConfig::load()?);
//!
//! let request = Request::get("http://localhost:8080/health").body(Full::new(Bytes::new()))?;
//! let response = client.oneshot(request).await?;
//! let body = response.into_body().collect().await?.to_bytes();
//! # Ok(())
//! # }
//! ```

pub mod interception;
pub mod observability;
pub mod utils;

// Re-export commonly used types
pub use interception::{
    BufferSink, CorrelationCounter, CurlRenderer, DefaultTransport, InterceptError, Interceptor,
    InterceptorLayer, LogSink, ReplayBody, Severity, TracingSink, WriterSink,
};
pub use utils::config::InterceptorConfig;
pub use utils::errors::{Result, TapError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
