// tests/config_test.rs
//! Environment-driven configuration. Kept in its own binary because it
//! mutates process environment variables.

use bytes::Bytes;
use http_body_util::Full;
use http_tap::{BufferSink, Interceptor, InterceptorConfig};
use hyper::{Request, Response};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

#[tokio::test]
async fn test_simulate_only_from_environment() {
    std::env::set_var("HTTP_TAP_SIMULATE_ONLY", "true");
    std::env::set_var("HTTP_TAP_COMPONENT", "dry_run");
    let config = InterceptorConfig::load();
    std::env::remove_var("HTTP_TAP_SIMULATE_ONLY");
    std::env::remove_var("HTTP_TAP_COMPONENT");

    let config = config.unwrap();
    assert!(config.simulate_only);
    assert_eq!(config.component, "dry_run");
    assert_eq!(config.max_logged_body_bytes, None);

    let calls = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&calls);
    let inner = tower::service_fn(move |_req: Request<Full<Bytes>>| {
        counted.fetch_add(1, Ordering::SeqCst);
        async { Ok::<_, io::Error>(Response::new(Full::new(Bytes::new()))) }
    });

    let sink = Arc::new(BufferSink::new());
    let interceptor = Interceptor::new(inner, config).with_sink(sink.clone());
    assert!(interceptor.is_simulated());

    let response = interceptor
        .oneshot(
            Request::delete("http://api.example.com/accounts/9")
                .body(Full::new(Bytes::new()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(sink.lines()[0].starts_with("dry_run|INFO||req:1|Simulated HTTP Request: "));
}

