// src/interception/replay_body.rs
//! Materialized response bodies
//!
//! A response body is a one-shot stream. Once the interceptor has read it
//! for the transcript it holds a [`CapturedBody`], from which any number of
//! fresh [`ReplayBody`] streams can be produced.

use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::body::{Body, Frame, SizeHint};
use hyper::HeaderMap;
use std::borrow::Cow;
use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Fully read body bytes plus any trailers that followed them
#[derive(Debug, Clone)]
pub struct CapturedBody {
    bytes: Bytes,
    trailers: Option<HeaderMap>,
}

impl CapturedBody {
    /// Wrap bytes that were read elsewhere
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            trailers: None,
        }
    }

    /// Read `body` to the end. The stream is consumed and dropped whether or
    /// not reading succeeds.
    pub async fn capture<B>(body: B) -> Result<Self, B::Error>
    where
        B: Body,
    {
        let collected = body.collect().await?;
        let trailers = collected.trailers().cloned();
        Ok(Self {
            bytes: collected.to_bytes(),
            trailers,
        })
    }

    /// Captured body bytes
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Trailers that followed the body, if any
    pub fn trailers(&self) -> Option<&HeaderMap> {
        self.trailers.as_ref()
    }

    /// Lossy UTF-8 text, cut at `limit` bytes when given
    pub fn text(&self, limit: Option<usize>) -> Cow<'_, str> {
        match limit {
            Some(limit) if limit < self.bytes.len() => {
                let head = String::from_utf8_lossy(&self.bytes[..limit]);
                Cow::Owned(format!("{}...({} bytes total)", head, self.bytes.len()))
            }
            _ => String::from_utf8_lossy(&self.bytes),
        }
    }

    /// A fresh, unread stream over the captured content
    pub fn replay(&self) -> ReplayBody {
        ReplayBody {
            data: non_empty(self.bytes.clone()),
            trailers: self.trailers.clone(),
            known_length: true,
        }
    }

    /// Like [`replay`](Self::replay), without cloning
    pub fn into_replay(self) -> ReplayBody {
        ReplayBody {
            data: non_empty(self.bytes),
            trailers: self.trailers,
            known_length: true,
        }
    }
}

fn non_empty(bytes: Bytes) -> Option<Bytes> {
    if bytes.is_empty() {
        None
    } else {
        Some(bytes)
    }
}

/// Body yielding captured bytes once, then trailers, then end-of-stream
#[derive(Debug, Clone)]
pub struct ReplayBody {
    data: Option<Bytes>,
    trailers: Option<HeaderMap>,
    known_length: bool,
}

impl ReplayBody {
    /// Empty body whose length is reported as unknown
    pub fn unknown_length() -> Self {
        Self {
            data: None,
            trailers: None,
            known_length: false,
        }
    }

    /// Remaining length in bytes, or `None` if unknown
    pub fn content_length(&self) -> Option<u64> {
        if self.known_length {
            Some(self.data.as_ref().map_or(0, |d| d.len() as u64))
        } else {
            None
        }
    }
}

impl Body for ReplayBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        if let Some(data) = self.data.take() {
            return Poll::Ready(Some(Ok(Frame::data(data))));
        }

        if let Some(trailers) = self.trailers.take() {
            return Poll::Ready(Some(Ok(Frame::trailers(trailers))));
        }

        Poll::Ready(None)
    }

    fn is_end_stream(&self) -> bool {
        self.data.is_none() && self.trailers.is_none()
    }

    fn size_hint(&self) -> SizeHint {
        match self.content_length() {
            Some(len) => SizeHint::with_exact(len),
            None => SizeHint::default(),
        }
    }
}
