// src/interception/mod.rs
//! Outbound request interception
//!
//! - **HTTP Interceptor**: tower service/layer that logs every exchange and
//!   can answer requests without touching the network
//! - **Correlation**: per-call IDs tying transcript lines together
//! - **Renderer**: reproducible `curl` rendering of requests
//! - **Replay Body**: captured response bodies served back as fresh streams
//! - **Sink / Transcript**: line formatting and destinations
//! - **Transport**: default hyper client
//!
//! # Architecture
//!
//! ```text
//! Caller
//!   │ Request
//!   ▼
//! Interceptor ── id, render ──► Transcript ──► LogSink
//!   │
//!   ├─ simulate_only ─► synthetic 200 OK (no I/O)
//!   │
//!   └─ inner transport ─► Response ─► capture body ─► ReplayBody ─► Caller
//! ```

pub mod correlation;
pub mod errors;
pub mod http_interceptor;
pub mod renderer;
pub mod replay_body;
pub mod sink;
pub mod transcript;
pub mod transport;

// Re-export commonly used types
pub use correlation::CorrelationCounter;
pub use errors::{BodyReadError, BoxError, InterceptError};
pub use http_interceptor::{Interceptor, InterceptorLayer, SimulatedRequest};
pub use renderer::{CurlRenderer, RenderError, Renderer, RequestHead};
pub use replay_body::{CapturedBody, ReplayBody};
pub use sink::{BufferSink, LogSink, Severity, TracingSink, WriterSink};
pub use transcript::{Transcript, TranscriptEntry};
pub use transport::{default_transport, DefaultTransport};
