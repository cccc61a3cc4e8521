// src/interception/renderer.rs
//! Reproducible text rendering of outbound requests
//!
//! Rendering is diagnostic only: a failure here is written to the transcript
//! and the request proceeds unchanged.

use hyper::{HeaderMap, Method, Request, Uri, Version};
use thiserror::Error;

/// Borrowed view of everything a renderer may look at
#[derive(Debug, Clone, Copy)]
pub struct RequestHead<'a> {
    pub method: &'a Method,
    pub uri: &'a Uri,
    pub version: Version,
    pub headers: &'a HeaderMap,
}

impl<'a> RequestHead<'a> {
    pub fn of<B>(request: &'a Request<B>) -> Self {
        Self {
            method: request.method(),
            uri: request.uri(),
            version: request.version(),
            headers: request.headers(),
        }
    }
}

/// Rendering failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("header {0} is not visible ASCII text")]
    HeaderNotText(String),

    #[error("{0}")]
    Other(String),
}

/// Converts a request into human-readable, reproducible text
pub trait Renderer: Send + Sync {
    fn render(&self, head: &RequestHead<'_>) -> Result<String, RenderError>;
}

impl<F> Renderer for F
where
    F: Fn(&RequestHead<'_>) -> Result<String, RenderError> + Send + Sync,
{
    fn render(&self, head: &RequestHead<'_>) -> Result<String, RenderError> {
        self(head)
    }
}

/// Renders requests as a shell-quoted `curl` command line
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlRenderer;

impl Renderer for CurlRenderer {
    fn render(&self, head: &RequestHead<'_>) -> Result<String, RenderError> {
        let mut headers = Vec::with_capacity(head.headers.len());
        for (name, value) in head.headers {
            let value = value
                .to_str()
                .map_err(|_| RenderError::HeaderNotText(name.to_string()))?;
            headers.push(format!("{}: {}", name, value));
        }
        headers.sort();

        let mut command = format!("curl -X {}", shell_quote(head.method.as_str()));
        for header in &headers {
            command.push_str(" -H ");
            command.push_str(&shell_quote(header));
        }
        command.push(' ');
        command.push_str(&shell_quote(&head.uri.to_string()));

        Ok(command)
    }
}

fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    #[test]
    fn test_curl_get() {
        let request = Request::get("http://api.example.com/v1/items?limit=2")
            .body(())
            .unwrap();

        let rendered = CurlRenderer.render(&RequestHead::of(&request)).unwrap();
        assert_eq!(
            rendered,
            "curl -X 'GET' 'http://api.example.com/v1/items?limit=2'"
        );
    }

    #[test]
    fn test_curl_headers_sorted_and_quoted() {
        let request = Request::post("http://api.example.com/notes")
            .header("x-note", "it's here")
            .header("accept", "application/json")
            .body(())
            .unwrap();

        let rendered = CurlRenderer.render(&RequestHead::of(&request)).unwrap();
        assert_eq!(
            rendered,
            "curl -X 'POST' -H 'accept: application/json' -H 'x-note: it'\\''s here' 'http://api.example.com/notes'"
        );
    }

    #[test]
    fn test_curl_rejects_binary_header() {
        let mut request = Request::get("http://api.example.com/").body(()).unwrap();
        request.headers_mut().insert(
            "x-raw",
            HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap(),
        );

        let err = CurlRenderer.render(&RequestHead::of(&request)).unwrap_err();
        assert_eq!(err, RenderError::HeaderNotText("x-raw".to_string()));
    }

    fn method_and_uri(head: &RequestHead<'_>) -> Result<String, RenderError> {
        Ok(format!("{} {}", head.method, head.uri))
    }

    #[test]
    fn test_fn_renderer() {
        let request = Request::delete("http://h/x").body(()).unwrap();
        assert_eq!(
            method_and_uri.render(&RequestHead::of(&request)).unwrap(),
            "DELETE http://h/x"
        );
    }
}
