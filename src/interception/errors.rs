// src/interception/errors.rs
//! Functional errors surfaced by the interceptor
//!
//! Only two things can change the outcome of an intercepted call: the inner
//! transport failing, or the response body failing to read. Rendering
//! problems are diagnostic and never reach the caller (see
//! [`RenderError`](crate::interception::renderer::RenderError)).

use hyper::Response;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Type-erased error, as used across the tower ecosystem
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Error returned by [`Interceptor`](crate::interception::Interceptor)
#[derive(Debug)]
pub enum InterceptError<E> {
    /// The inner transport failed; carried verbatim
    Transport(E),

    /// The transport answered but its body could not be read
    BodyRead(BodyReadError),
}

impl<E> InterceptError<E> {
    pub fn is_transport(&self) -> bool {
        matches!(self, InterceptError::Transport(_))
    }

    pub fn is_body_read(&self) -> bool {
        matches!(self, InterceptError::BodyRead(_))
    }

    /// The inner transport error, if that is what failed
    pub fn into_transport(self) -> Option<E> {
        match self {
            InterceptError::Transport(e) => Some(e),
            InterceptError::BodyRead(_) => None,
        }
    }

    pub fn as_body_read(&self) -> Option<&BodyReadError> {
        match self {
            InterceptError::BodyRead(e) => Some(e),
            InterceptError::Transport(_) => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for InterceptError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterceptError::Transport(e) => fmt::Display::fmt(e, f),
            InterceptError::BodyRead(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl<E> StdError for InterceptError<E>
where
    E: StdError + 'static,
{
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            InterceptError::Transport(e) => e.source(),
            InterceptError::BodyRead(e) => Some(e),
        }
    }
}

/// Reading the response body failed after the transport succeeded.
///
/// Holds the head of the original response. Its body is gone and must not
/// be trusted.
#[derive(Error, Debug)]
#[error("{source}")]
pub struct BodyReadError {
    response: Response<()>,
    source: BoxError,
}

impl BodyReadError {
    pub fn new(response: Response<()>, source: impl Into<BoxError>) -> Self {
        Self {
            response,
            source: source.into(),
        }
    }

    /// Head of the response whose body failed
    pub fn response(&self) -> &Response<()> {
        &self.response
    }

    pub fn into_response(self) -> Response<()> {
        self.response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_transport_error_is_verbatim() {
        let err: InterceptError<io::Error> = InterceptError::Transport(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));

        assert!(err.is_transport());
        assert_eq!(err.to_string(), "connection refused");
        assert_eq!(
            err.into_transport().unwrap().kind(),
            io::ErrorKind::ConnectionRefused
        );
    }

    #[test]
    fn test_body_read_error_keeps_response() {
        let response = Response::builder().status(502).body(()).unwrap();
        let err = BodyReadError::new(response, "stream reset");
        assert_eq!(err.to_string(), "stream reset");
        assert_eq!(err.response().status(), 502);
        assert!(err.source().is_some());

        let err: InterceptError<io::Error> = InterceptError::BodyRead(err);
        assert!(err.is_body_read());
        assert!(err.into_transport().is_none());
    }

    #[test]
    fn test_body_read_error_into_response() {
        let response = Response::builder()
            .status(200)
            .header("x-request-id", "r-1")
            .body(())
            .unwrap();
        let head = BodyReadError::new(response, "truncated").into_response();
        assert_eq!(head.status(), 200);
        assert_eq!(head.headers()["x-request-id"], "r-1");
    }
}
