// src/interception/transport.rs
//! Default transport used when no inner service is supplied

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Body;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

/// Plain-HTTP hyper client driven by the tokio executor
pub type DefaultTransport<B = Full<Bytes>> = Client<HttpConnector, B>;

/// Build the default transport
pub fn default_transport<B>() -> DefaultTransport<B>
where
    B: Body + Send,
    B::Data: Send,
{
    Client::builder(TokioExecutor::new()).build_http()
}
