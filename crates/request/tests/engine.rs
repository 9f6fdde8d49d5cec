// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use fhr_request::{
    AbortController, LoopStage, Method, RelayerApiError, RelayerOperation, RelayerRequest,
    RequestError, RequestOptions, RequestPhase, Termination, TransportError,
};
use fhr_test_helpers::{failed, init_tracing, queued, rate_limited, succeeded, MockTransport};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use tokio::time::Instant;
use url::Url;

fn base_url() -> Url {
    Url::parse("https://relayer.test").unwrap()
}

fn request(transport: &MockTransport, options: RequestOptions) -> RelayerRequest<Value> {
    init_tracing();
    RelayerRequest::new(
        RelayerOperation::InputProof,
        &base_url(),
        &json!({ "contractChainId": "0x1" }),
        transport.clone().into_transport(),
        options,
    )
    .unwrap()
}

async fn wait_for_calls(transport: &MockTransport, count: usize) {
    for _ in 0..1_000 {
        if transport.call_count() >= count {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("transport never reached {count} calls");
}

#[tokio::test(start_paused = true)]
async fn test_immediate_success() -> Result<()> {
    let transport = MockTransport::new().respond(200, succeeded(json!({ "accepted": true })));
    let req = request(&transport, RequestOptions::default());

    let result = req.run().await?;
    assert_eq!(result, json!({ "accepted": true }));
    assert_eq!(req.phase(), RequestPhase::Terminated(Termination::Completed));
    assert_eq!(req.retry_count(), 0);
    assert_eq!(req.job_id(), None);

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::Post);
    assert_eq!(calls[0].url.as_str(), "https://relayer.test/v2/input-proof");
    assert_eq!(calls[0].body, Some(json!({ "contractChainId": "0x1" })));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_success_without_status_field() -> Result<()> {
    let transport = MockTransport::new().respond(200, json!({ "result": 7 }));
    let req = request(&transport, RequestOptions::default());
    assert_eq!(req.run().await?, json!(7));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_queued_then_polled() -> Result<()> {
    let transport = MockTransport::new()
        .respond(202, queued("job-7", json!(2)))
        .respond(200, succeeded(json!("done")));
    let req = request(&transport, RequestOptions::default());

    let started = Instant::now();
    assert_eq!(req.run().await?, json!("done"));
    assert!(started.elapsed() >= Duration::from_secs(2));
    assert_eq!(req.job_id().as_deref(), Some("job-7"));
    assert_eq!(req.retry_count(), 1);

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].method, Method::Get);
    assert_eq!(
        calls[1].url.as_str(),
        "https://relayer.test/v2/input-proof/job-7"
    );
    assert!(calls[1].body.is_none());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_past_retry_after_respects_floor() -> Result<()> {
    let transport = MockTransport::new()
        .respond(202, queued("job-1", json!("2020-01-01T00:00:00Z")))
        .respond(200, succeeded(json!(1)));
    let options = RequestOptions {
        min_retry_delay_ms: 1_500,
        ..Default::default()
    };
    let req = request(&transport, options);

    let started = Instant::now();
    req.run().await?;
    assert!(started.elapsed() >= Duration::from_millis(1_500));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_queued_forever_hits_poll_limit() {
    let transport =
        MockTransport::new().respond(202, queued("job-1", json!("2020-01-01T00:00:00Z")));
    let options = RequestOptions {
        min_retry_delay_ms: 1_000,
        max_poll_attempts: 3,
        ..Default::default()
    };
    let req = request(&transport, options);

    let started = Instant::now();
    let err = req.run().await.unwrap_err();
    assert_eq!(
        err,
        RequestError::IterationLimit {
            stage: LoopStage::Poll,
            attempts: 3
        }
    );
    assert!(started.elapsed() >= Duration::from_secs(3));
    assert_eq!(transport.call_count(), 4);
    assert_eq!(req.phase(), RequestPhase::Terminated(Termination::Failed));
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_submit_is_repeated() -> Result<()> {
    let transport = MockTransport::new()
        .respond(429, rate_limited(json!(3)))
        .respond(200, succeeded(json!("ok")));
    let req = request(&transport, RequestOptions::default());

    let started = Instant::now();
    assert_eq!(req.run().await?, json!("ok"));
    assert!(started.elapsed() >= Duration::from_secs(3));
    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|c| c.method == Method::Post));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_poll_repeats_poll() -> Result<()> {
    let transport = MockTransport::new()
        .respond(202, queued("job-2", json!(1)))
        .respond(429, rate_limited(json!(1)))
        .respond(200, succeeded(json!("ok")));
    let req = request(&transport, RequestOptions::default());

    req.run().await?;
    let methods: Vec<_> = transport.calls().iter().map(|c| c.method).collect();
    assert_eq!(methods, vec![Method::Post, Method::Get, Method::Get]);
    assert_eq!(req.retry_count(), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_submit_hits_limit() {
    let transport = MockTransport::new().respond(429, rate_limited(json!(1)));
    let options = RequestOptions {
        max_submit_attempts: 2,
        ..Default::default()
    };
    let req = request(&transport, options);

    assert_eq!(
        req.run().await.unwrap_err(),
        RequestError::IterationLimit {
            stage: LoopStage::Submit,
            attempts: 2
        }
    );
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_malformed_body_is_fatal() {
    let transport = MockTransport::new().respond_raw(200, "<html>oops</html>");
    let req = request(&transport, RequestOptions::default());

    let err = req.run().await.unwrap_err();
    assert!(matches!(
        err,
        RequestError::MalformedResponse { status: 200, .. }
    ));
    assert_eq!(transport.call_count(), 1);
    assert_eq!(req.phase(), RequestPhase::Terminated(Termination::Failed));
}

#[tokio::test(start_paused = true)]
async fn test_queued_without_job_id_is_malformed() {
    let transport = MockTransport::new().respond(
        202,
        json!({ "status": "queued", "result": { "retryAfter": 1 } }),
    );
    let req = request(&transport, RequestOptions::default());
    assert!(matches!(
        req.run().await.unwrap_err(),
        RequestError::MalformedResponse { status: 202, .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn test_validation_failure_is_not_retried() {
    let transport = MockTransport::new().respond(
        400,
        json!({
            "status": "failed",
            "error": {
                "label": "validation_failed",
                "message": "invalid",
                "details": [{ "field": "userAddress", "issue": "bad checksum" }]
            }
        }),
    );
    let req = request(&transport, RequestOptions::default());

    let err = req.run().await.unwrap_err();
    let RequestError::Relayer { status, error } = err else {
        panic!("expected relayer error, got {err:?}");
    };
    assert_eq!(status, 400);
    let RelayerApiError::ValidationFailed { details, .. } = error else {
        panic!("expected validation failure");
    };
    assert_eq!(details[0].field, "userAddress");
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_server_error_is_fatal() {
    let transport = MockTransport::new().respond(503, failed("protocol_paused", "paused"));
    let req = request(&transport, RequestOptions::default());

    assert!(matches!(
        req.run().await.unwrap_err(),
        RequestError::Relayer {
            status: 503,
            error: RelayerApiError::ProtocolPaused { .. }
        }
    ));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_unexpected_status() {
    let transport = MockTransport::new().respond(301, json!({}));
    let req = request(&transport, RequestOptions::default());
    assert_eq!(req.run().await.unwrap_err(), RequestError::UnexpectedStatus(301));
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_is_fatal() {
    let transport = MockTransport::new().fail(TransportError::Http {
        url: "https://relayer.test/v2/input-proof".to_string(),
        reason: "connection refused".to_string(),
    });
    let req = request(&transport, RequestOptions::default());
    assert!(matches!(
        req.run().await.unwrap_err(),
        RequestError::Transport(TransportError::Http { .. })
    ));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_call_stops_all_activity() {
    let transport = MockTransport::new()
        .with_delay(Duration::from_secs(5))
        .respond(202, queued("job-1", json!(1)));
    let req = request(&transport, RequestOptions::default());
    let handle = req.handle();

    let task = tokio::spawn(async move { req.run().await });
    wait_for_calls(&transport, 1).await;
    assert_eq!(handle.phase(), RequestPhase::Running);
    assert!(handle.cancel());
    assert!(!handle.cancel());

    assert_eq!(task.await.unwrap().unwrap_err(), RequestError::Canceled);
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(transport.call_count(), 1);
    assert_eq!(
        handle.phase(),
        RequestPhase::Terminated(Termination::Canceled)
    );
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_delay() {
    let transport = MockTransport::new().respond(202, queued("job-1", json!(30)));
    let req = request(&transport, RequestOptions::default());
    let handle = req.handle();

    let task = tokio::spawn(async move { req.run().await });
    wait_for_calls(&transport, 1).await;
    tokio::task::yield_now().await;
    handle.cancel();

    assert_eq!(task.await.unwrap().unwrap_err(), RequestError::Canceled);
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_before_run() {
    let transport = MockTransport::new().respond(200, succeeded(json!(1)));
    let req = request(&transport, RequestOptions::default());

    assert!(req.cancel());
    assert_eq!(
        req.run().await.unwrap_err(),
        RequestError::AlreadyTerminated(Termination::Canceled)
    );
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_abort_signal() {
    let transport = MockTransport::new().respond(202, queued("job-1", json!(30)));
    let controller = AbortController::new();
    let req = request(&transport, RequestOptions::default()).with_abort_signal(controller.signal());
    let handle = req.handle();

    let task = tokio::spawn(async move { req.run().await });
    wait_for_calls(&transport, 1).await;
    controller.abort();

    assert_eq!(task.await.unwrap().unwrap_err(), RequestError::Aborted);
    assert_eq!(handle.phase(), RequestPhase::Terminated(Termination::Aborted));
    assert!(!handle.cancel());
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_already_aborted_signal_makes_no_calls() {
    let transport = MockTransport::new().respond(200, succeeded(json!(1)));
    let controller = AbortController::new();
    controller.abort();
    let req = request(&transport, RequestOptions::default()).with_abort_signal(controller.signal());

    assert_eq!(req.run().await.unwrap_err(), RequestError::Aborted);
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_overall_timeout() {
    let transport = MockTransport::new().respond(202, queued("job-1", json!(1)));
    let options = RequestOptions {
        timeout_ms: Some(10_000),
        max_poll_attempts: 1_000,
        ..Default::default()
    };
    let req = request(&transport, options);

    let started = Instant::now();
    assert_eq!(
        req.run().await.unwrap_err(),
        RequestError::Timeout(Duration::from_secs(10))
    );
    assert!(started.elapsed() >= Duration::from_secs(10));
    assert_eq!(req.phase(), RequestPhase::Terminated(Termination::Aborted));

    let calls = transport.call_count();
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(transport.call_count(), calls);
}

#[tokio::test(start_paused = true)]
async fn test_run_is_single_use() -> Result<()> {
    let transport = MockTransport::new()
        .with_delay(Duration::from_secs(1))
        .respond(200, succeeded(json!(1)));
    let req = Arc::new(request(&transport, RequestOptions::default()));

    let running = req.clone();
    let task = tokio::spawn(async move { running.run().await });
    wait_for_calls(&transport, 1).await;
    assert_eq!(req.run().await.unwrap_err(), RequestError::AlreadyStarted);

    assert_eq!(task.await??, json!(1));
    assert_eq!(
        req.run().await.unwrap_err(),
        RequestError::AlreadyTerminated(Termination::Completed)
    );
    assert_eq!(transport.call_count(), 1);
    Ok(())
}
