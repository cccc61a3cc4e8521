// src/interception/http_interceptor.rs
//! Logging and dry-run interceptor for outbound HTTP transports
//!
//! [`Interceptor`] wraps any tower service that sends HTTP requests. Every
//! call gets a correlation ID and two transcript lines, one for the request
//! and one for the response or failure. In simulate mode the inner service
//! is never called and a synthetic `200 OK` is returned instead.
//!
//! In real mode the response body is read into memory for the transcript and
//! handed back to the caller as a fresh [`ReplayBody`] with identical bytes.
//! Bodies are fully materialized, so this is not suitable for large
//! streaming downloads.

use crate::interception::correlation::CorrelationCounter;
use crate::interception::errors::{BodyReadError, BoxError, InterceptError};
use crate::interception::renderer::{CurlRenderer, Renderer, RequestHead};
use crate::interception::replay_body::{CapturedBody, ReplayBody};
use crate::interception::sink::{LogSink, TracingSink};
use crate::interception::transcript::{Transcript, TranscriptEntry};
use crate::interception::transport::{default_transport, DefaultTransport};
use crate::utils::config::InterceptorConfig;
use futures::future::BoxFuture;
use hyper::body::Body;
use hyper::{HeaderMap, Method, Request, Response, Uri, Version};
use std::fmt;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};
use tracing::debug;

/// Head of the request a simulated response answered.
///
/// Stored in the extensions of every simulated response.
#[derive(Debug, Clone)]
pub struct SimulatedRequest {
    pub method: Method,
    pub uri: Uri,
    pub version: Version,
    pub headers: HeaderMap,
}

/// Settings shared by an interceptor, its clones and the layer that built it
#[derive(Clone)]
struct TapState {
    simulate_only: bool,
    max_logged_body_bytes: Option<usize>,
    renderer: Arc<dyn Renderer>,
    transcript: Transcript,
    counter: Arc<CorrelationCounter>,
}

impl TapState {
    fn from_config(config: InterceptorConfig) -> Self {
        Self {
            simulate_only: config.simulate_only,
            max_logged_body_bytes: config.max_logged_body_bytes,
            renderer: Arc::new(CurlRenderer),
            transcript: Transcript::new(config.component, Arc::new(TracingSink)),
            counter: Arc::new(CorrelationCounter::new()),
        }
    }

    fn set_sink(&mut self, sink: Arc<dyn LogSink>) {
        let component: Arc<str> = Arc::from(self.transcript.component());
        self.transcript = Transcript::new(component, sink);
    }

    /// Render for the transcript; a failure is logged and yields empty text
    fn render<B>(&self, id: u64, request: &Request<B>) -> String {
        match self.renderer.render(&RequestHead::of(request)) {
            Ok(rendered) => rendered,
            Err(error) => {
                self.transcript
                    .emit(id, TranscriptEntry::RenderFailed { error: &error });
                String::new()
            }
        }
    }

    fn simulate<B>(&self, id: u64, rendered: &str, request: Request<B>) -> Response<ReplayBody> {
        // The body is dropped unread.
        let (parts, _) = request.into_parts();

        let mut response = Response::new(ReplayBody::unknown_length());
        *response.version_mut() = Version::HTTP_10;

        self.transcript
            .emit(id, TranscriptEntry::SimulatedRequest { rendered });
        self.transcript.emit(
            id,
            TranscriptEntry::SimulatedResponse {
                url: &parts.uri,
                status: response.status(),
                headers: response.headers(),
            },
        );

        response.extensions_mut().insert(SimulatedRequest {
            method: parts.method,
            uri: parts.uri,
            version: parts.version,
            headers: parts.headers,
        });
        response
    }
}

/// Transparent logging wrapper around an HTTP transport
#[derive(Clone)]
pub struct Interceptor<S> {
    inner: S,
    state: TapState,
}

impl<S> Interceptor<S> {
    /// Wrap `inner`
    pub fn new(inner: S, config: InterceptorConfig) -> Self {
        debug!(
            "Creating interceptor (component: {}, simulate_only: {})",
            config.component, config.simulate_only
        );

        Self {
            inner,
            state: TapState::from_config(config),
        }
    }

    /// Replace the request renderer (defaults to [`CurlRenderer`])
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.state.renderer = Arc::new(renderer);
        self
    }

    /// Replace the transcript sink (defaults to [`TracingSink`])
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.state.set_sink(sink);
        self
    }

    /// Allocate correlation IDs from `counter` instead of a private one
    pub fn with_counter(mut self, counter: Arc<CorrelationCounter>) -> Self {
        self.state.counter = counter;
        self
    }

    /// Whether requests are answered without touching the network
    pub fn is_simulated(&self) -> bool {
        self.state.simulate_only
    }

    /// Correlation counter this instance allocates from
    pub fn counter(&self) -> &Arc<CorrelationCounter> {
        &self.state.counter
    }

    /// Borrow the wrapped transport
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Unwrap the transport
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<B> Interceptor<DefaultTransport<B>>
where
    B: Body + Send,
    B::Data: Send,
{
    /// Wrap the default hyper client
    pub fn with_default_transport(config: InterceptorConfig) -> Self {
        Self::new(default_transport(), config)
    }
}

impl<S> fmt::Debug for Interceptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("component", &self.state.transcript.component())
            .field("simulate_only", &self.state.simulate_only)
            .finish_non_exhaustive()
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for Interceptor<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Error: fmt::Display + Send + 'static,
    S::Future: Send + 'static,
    ResBody: Body + Send + 'static,
    ResBody::Data: Send,
    ResBody::Error: Into<BoxError>,
{
    type Response = Response<ReplayBody>;
    type Error = InterceptError<S::Error>;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        if self.state.simulate_only {
            return Poll::Ready(Ok(()));
        }
        match self.inner.poll_ready(cx) {
            Poll::Ready(Err(error)) => {
                // No request reaches the transport; the failure gets its own ID.
                let id = self.state.counter.next();
                self.state
                    .transcript
                    .emit(id, TranscriptEntry::TransportFailed { error: &error });
                Poll::Ready(Err(InterceptError::Transport(error)))
            }
            other => other.map_err(InterceptError::Transport),
        }
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let state = self.state.clone();
        let id = state.counter.next();

        debug!(
            correlation_id = id,
            simulate_only = state.simulate_only,
            "Intercepted request: {} {}",
            request.method(),
            request.uri()
        );

        let rendered = state.render(id, &request);

        if state.simulate_only {
            let response = state.simulate(id, &rendered, request);
            return Box::pin(futures::future::ready(Ok(response)));
        }

        state.transcript.emit(
            id,
            TranscriptEntry::RealRequest {
                rendered: &rendered,
            },
        );

        let url = request.uri().clone();
        let start = Instant::now();
        let response_future = self.inner.call(request);

        Box::pin(async move {
            let response = match response_future.await {
                Ok(response) => response,
                Err(error) => {
                    state
                        .transcript
                        .emit(id, TranscriptEntry::TransportFailed { error: &error });
                    return Err(InterceptError::Transport(error));
                }
            };
            let elapsed = start.elapsed();

            let (parts, body) = response.into_parts();
            let captured = match CapturedBody::capture(body).await {
                Ok(captured) => captured,
                Err(error) => {
                    let error: BoxError = error.into();
                    state
                        .transcript
                        .emit(id, TranscriptEntry::BodyReadFailed { error: &error });
                    let head = Response::from_parts(parts, ());
                    return Err(InterceptError::BodyRead(BodyReadError::new(head, error)));
                }
            };

            {
                let body = captured.text(state.max_logged_body_bytes);
                state.transcript.emit(
                    id,
                    TranscriptEntry::RealResponse {
                        elapsed,
                        url: &url,
                        status: parts.status,
                        headers: &parts.headers,
                        body: &body,
                    },
                );
            }

            Ok(Response::from_parts(parts, captured.into_replay()))
        })
    }
}

/// [`Layer`] producing [`Interceptor`]s that share one correlation counter
#[derive(Clone)]
pub struct InterceptorLayer {
    state: TapState,
}

impl InterceptorLayer {
    /// Create a layer; every service it builds shares one counter
    pub fn new(config: InterceptorConfig) -> Self {
        Self {
            state: TapState::from_config(config),
        }
    }

    /// Replace the request renderer (defaults to [`CurlRenderer`])
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.state.renderer = Arc::new(renderer);
        self
    }

    /// Replace the transcript sink (defaults to [`TracingSink`])
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.state.set_sink(sink);
        self
    }

    /// Allocate correlation IDs from `counter` instead of a private one
    pub fn with_counter(mut self, counter: Arc<CorrelationCounter>) -> Self {
        self.state.counter = counter;
        self
    }

    /// Whether requests are answered without touching the network
    pub fn is_simulated(&self) -> bool {
        self.state.simulate_only
    }

    /// Correlation counter this instance allocates from
    pub fn counter(&self) -> &Arc<CorrelationCounter> {
        &self.state.counter
    }
}

impl<S> Layer<S> for InterceptorLayer {
    type Service = Interceptor<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Interceptor {
            inner,
            state: self.state.clone(),
        }
    }
}

impl fmt::Debug for InterceptorLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorLayer")
            .field("component", &self.state.transcript.component())
            .field("simulate_only", &self.state.simulate_only)
            .finish_non_exhaustive()
    }
}
