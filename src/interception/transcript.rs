// src/interception/transcript.rs
//! Transcript entries and line formatting
//!
//! Every line has the shape `component|SEVERITY||req:<id>|<message>`. The
//! interceptor decides *what* happened; this module decides how it reads.

use crate::interception::renderer::RenderError;
use crate::interception::sink::{LogSink, Severity};
use hyper::{HeaderMap, StatusCode, Uri};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// One event in the life of an intercepted call
pub enum TranscriptEntry<'a> {
    RenderFailed {
        error: &'a RenderError,
    },
    SimulatedRequest {
        rendered: &'a str,
    },
    SimulatedResponse {
        url: &'a Uri,
        status: StatusCode,
        headers: &'a HeaderMap,
    },
    RealRequest {
        rendered: &'a str,
    },
    TransportFailed {
        error: &'a dyn fmt::Display,
    },
    BodyReadFailed {
        error: &'a dyn fmt::Display,
    },
    RealResponse {
        elapsed: Duration,
        url: &'a Uri,
        status: StatusCode,
        headers: &'a HeaderMap,
        body: &'a str,
    },
}

impl TranscriptEntry<'_> {
    pub fn severity(&self) -> Severity {
        match self {
            TranscriptEntry::RenderFailed { .. }
            | TranscriptEntry::TransportFailed { .. }
            | TranscriptEntry::BodyReadFailed { .. } => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for TranscriptEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptEntry::RenderFailed { error } => {
                write!(f, "rendering request: {}", error)
            }
            TranscriptEntry::SimulatedRequest { rendered } => {
                write!(f, "Simulated HTTP Request: {}", rendered)
            }
            TranscriptEntry::SimulatedResponse {
                url,
                status,
                headers,
            } => write!(
                f,
                "Simulated HTTP Response: URL:{}, StatusCode:{}, Header:{:?}, Body:",
                url,
                status.as_u16(),
                headers
            ),
            TranscriptEntry::RealRequest { rendered } => {
                write!(f, "Real HTTP Request: {}", rendered)
            }
            TranscriptEntry::TransportFailed { error } => write!(f, "request: {}", error),
            TranscriptEntry::BodyReadFailed { error } => write!(f, "reading body: {}", error),
            TranscriptEntry::RealResponse {
                elapsed,
                url,
                status,
                headers,
                body,
            } => write!(
                f,
                "Real HTTP Response: Duration:{:?}, URL:{}, StatusCode:{}, Header:{:?}, Body:{}",
                elapsed,
                url,
                status.as_u16(),
                headers,
                body
            ),
        }
    }
}

/// Formats entries and hands them to a sink
#[derive(Clone)]
pub struct Transcript {
    component: Arc<str>,
    sink: Arc<dyn LogSink>,
}

impl Transcript {
    pub fn new(component: impl Into<Arc<str>>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            component: component.into(),
            sink,
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn emit(&self, id: u64, entry: TranscriptEntry<'_>) {
        let severity = entry.severity();
        let line = format_line(&self.component, severity, id, &entry);
        self.sink.write_line(severity, &line);
    }
}

impl fmt::Debug for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transcript")
            .field("component", &self.component)
            .finish_non_exhaustive()
    }
}

pub fn format_line(
    component: &str,
    severity: Severity,
    id: u64,
    message: &dyn fmt::Display,
) -> String {
    format!("{}|{}||req:{}|{}", component, severity, id, message)
}

/// Extract the correlation ID from a formatted line
pub fn parse_correlation_id(line: &str) -> Option<u64> {
    let rest = line.split("||req:").nth(1)?;
    let (id, _) = rest.split_once('|')?;
    id.parse().ok()
}
