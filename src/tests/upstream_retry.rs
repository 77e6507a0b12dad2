// Upstream client failure semantics:
//  - 200 -> body
//  - non-200 -> no data, exactly one attempt
//  - connection refused -> fixed backoff between attempts, then no data

use std::time::{Duration, Instant};

use httpmock::prelude::*;

use crate::cbr::client::CbrClient;
use crate::config::settings::{RetryConfig, UpstreamConfig};

fn client(attempts: u32, backoff_ms: u64) -> CbrClient {
    CbrClient::new(&UpstreamConfig {
        retry: Some(RetryConfig {
            attempts: Some(attempts),
            backoff_ms: Some(backoff_ms),
        }),
        request_timeout_secs: 5,
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn success_returns_body() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/data.xml");
            then.status(200).body("<ValCurs></ValCurs>");
        })
        .await;

    let body = client(5, 10).fetch_text(&server.url("/data.xml")).await;
    assert_eq!(body.as_deref(), Some("<ValCurs></ValCurs>"));
    mock.assert_hits_async(1).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn non_200_yields_no_data_without_retry() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/data.xml");
            then.status(500).body("boom");
        })
        .await;

    let body = client(5, 10).fetch_text(&server.url("/data.xml")).await;
    assert_eq!(body, None);
    // HTTP-level errors are "no data available", not a fault worth retrying.
    mock.assert_hits_async(1).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn connection_refused_backs_off_between_attempts_then_yields_no_data() {
    // Bind and drop a listener so the port refuses connections.
    let refused = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/data.xml", addr)
    };

    let backoff_ms = 50;
    let attempts = 3;
    let start = Instant::now();
    let body = client(attempts, backoff_ms).fetch_text(&refused).await;
    let elapsed = start.elapsed();

    assert_eq!(body, None);
    // attempts-1 sleeps between the connection failures
    assert!(
        elapsed >= Duration::from_millis(backoff_ms * (attempts as u64 - 1)),
        "expected at least {}ms of backoff, got {:?}",
        backoff_ms * (attempts as u64 - 1),
        elapsed
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn user_agent_comes_from_the_pool() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/data.xml")
                .header_matches("user-agent", "^Mozilla/5\\.0.*");
            then.status(200).body("ok");
        })
        .await;

    let body = client(1, 10).fetch_text(&server.url("/data.xml")).await;
    assert_eq!(body.as_deref(), Some("ok"));
    mock.assert_hits_async(1).await;
}
