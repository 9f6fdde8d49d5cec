// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    classify_response, AbortSignal, LoopStage, RelayerOperation, RelayerTransport, RequestError,
    RequestOptions, ResponseStep, RetryAfter, TransportRequest,
};
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::{
    future::Future,
    marker::PhantomData,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc, OnceLock,
    },
};
use tokio::{sync::watch, time::Instant};
use tracing::{debug, error, info, info_span, warn, Instrument};
use url::Url;

/// Why a request stopped. Set exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Completed,
    Canceled,
    Aborted,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Idle,
    Running,
    Terminated(Termination),
}

impl RequestPhase {
    pub fn is_terminated(&self) -> bool {
        matches!(self, RequestPhase::Terminated(_))
    }
}

#[derive(Debug)]
struct Shared {
    phase: watch::Sender<RequestPhase>,
    retry_count: AtomicU32,
    job_id: OnceLock<String>,
}

impl Shared {
    fn new() -> Self {
        let (phase, _) = watch::channel(RequestPhase::Idle);
        Self {
            phase,
            retry_count: AtomicU32::new(0),
            job_id: OnceLock::new(),
        }
    }

    fn phase(&self) -> RequestPhase {
        *self.phase.borrow()
    }

    fn start(&self) -> Result<(), RequestError> {
        let mut outcome = Ok(());
        self.phase.send_if_modified(|phase| match *phase {
            RequestPhase::Idle => {
                *phase = RequestPhase::Running;
                true
            }
            RequestPhase::Running => {
                outcome = Err(RequestError::AlreadyStarted);
                false
            }
            RequestPhase::Terminated(reason) => {
                outcome = Err(RequestError::AlreadyTerminated(reason));
                false
            }
        });
        outcome
    }

    /// Returns true when this call moved the request into its terminal phase
    fn terminate(&self, reason: Termination) -> bool {
        self.phase.send_if_modified(|phase| {
            if phase.is_terminated() {
                return false;
            }
            *phase = RequestPhase::Terminated(reason);
            true
        })
    }

    /// The error a suspended step resolves with once the request was stopped from outside
    fn interruption(&self) -> RequestError {
        match self.phase() {
            RequestPhase::Terminated(Termination::Aborted) => RequestError::Aborted,
            _ => RequestError::Canceled,
        }
    }

    fn ensure_running(&self) -> Result<(), RequestError> {
        match self.phase() {
            RequestPhase::Running => Ok(()),
            _ => Err(self.interruption()),
        }
    }
}

/// Cancels a request from another task
#[derive(Debug, Clone)]
pub struct RequestHandle {
    shared: Arc<Shared>,
}

impl RequestHandle {
    /// Terminates an idle or running request. Later calls are no-ops and return false.
    pub fn cancel(&self) -> bool {
        let canceled = self.shared.terminate(Termination::Canceled);
        if canceled {
            info!("relayer request canceled");
        }
        canceled
    }

    pub fn phase(&self) -> RequestPhase {
        self.shared.phase()
    }
}

/// A single-use submit-then-poll exchange with the relayer.
///
/// `run` posts the payload, follows `queued` responses by polling the job url and honours the
/// advertised retry delay (never below the configured floor) until the relayer returns a result,
/// a fatal error, an iteration cap is reached, or the request is canceled, aborted or times out.
/// No transport call is made once the request has terminated.
pub struct RelayerRequest<T> {
    operation: RelayerOperation,
    url: Url,
    payload: Value,
    transport: Arc<dyn RelayerTransport>,
    options: RequestOptions,
    abort: Option<AbortSignal>,
    shared: Arc<Shared>,
    _result: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> RelayerRequest<T> {
    pub fn new(
        operation: RelayerOperation,
        base_url: &Url,
        payload: &impl Serialize,
        transport: Arc<dyn RelayerTransport>,
        options: RequestOptions,
    ) -> Result<Self, RequestError> {
        let url = operation.endpoint(base_url)?;
        let payload =
            serde_json::to_value(payload).map_err(|e| RequestError::Payload(e.to_string()))?;
        Ok(Self {
            operation,
            url,
            payload,
            transport,
            options,
            abort: None,
            shared: Arc::new(Shared::new()),
            _result: PhantomData,
        })
    }

    pub fn with_abort_signal(mut self, signal: AbortSignal) -> Self {
        self.abort = Some(signal);
        self
    }

    pub fn handle(&self) -> RequestHandle {
        RequestHandle {
            shared: self.shared.clone(),
        }
    }

    pub fn cancel(&self) -> bool {
        self.handle().cancel()
    }

    pub fn phase(&self) -> RequestPhase {
        self.shared.phase()
    }

    pub fn job_id(&self) -> Option<String> {
        self.shared.job_id.get().cloned()
    }

    pub fn retry_count(&self) -> u32 {
        self.shared.retry_count.load(Ordering::Relaxed)
    }

    pub fn operation(&self) -> RelayerOperation {
        self.operation
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn run(&self) -> Result<T, RequestError> {
        self.shared.start()?;
        let span = info_span!("relayer_request", operation = %self.operation, url = %self.url);
        async move {
            let started = Instant::now();
            info!("relayer request started");
            let outcome = match self.options.timeout() {
                Some(limit) => match tokio::time::timeout(limit, self.drive()).await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        self.shared.terminate(Termination::Aborted);
                        Err(RequestError::Timeout(limit))
                    }
                },
                None => self.drive().await,
            };
            self.finish(outcome, started)
        }
        .instrument(span)
        .await
    }

    fn finish(
        &self,
        outcome: Result<T, RequestError>,
        started: Instant,
    ) -> Result<T, RequestError> {
        let elapsed = started.elapsed();
        let retry_count = self.retry_count();
        match outcome {
            Ok(result) => {
                if !self.shared.terminate(Termination::Completed) {
                    return Err(self.shared.interruption());
                }
                info!(?elapsed, retry_count, "relayer request completed");
                Ok(result)
            }
            Err(err) if err.is_interrupted() => {
                info!(?elapsed, retry_count, reason = %err, "relayer request interrupted");
                Err(err)
            }
            Err(err) => {
                self.shared.terminate(Termination::Failed);
                error!(
                    operation = %self.operation,
                    url = %self.url,
                    ?elapsed,
                    retry_count,
                    job_id = ?self.job_id(),
                    "relayer request failed: {err}"
                );
                Err(err)
            }
        }
    }

    async fn drive(&self) -> Result<T, RequestError> {
        let submit = TransportRequest::post(self.url.clone(), self.payload.clone());
        let mut attempts = 0u32;
        let (job_id, mut retry_after) = loop {
            attempts += 1;
            match self.exchange(submit.clone(), LoopStage::Submit).await? {
                ResponseStep::Completed { request_id, result } => {
                    debug!(?request_id, "relayer answered synchronously");
                    return Ok(result);
                }
                ResponseStep::Queued {
                    request_id,
                    job_id,
                    retry_after,
                } => {
                    let job_id = job_id.ok_or_else(|| RequestError::MalformedResponse {
                        status: 202,
                        reason: "queued response without jobId".to_string(),
                    })?;
                    info!(job_id, ?request_id, "relayer queued the request");
                    break (job_id, retry_after);
                }
                ResponseStep::RateLimited { retry_after } => {
                    self.limit(LoopStage::Submit, attempts, self.options.max_submit_attempts)?;
                    self.pause(LoopStage::Submit, retry_after.as_ref()).await?;
                }
            }
        };

        let _ = self.shared.job_id.set(job_id.clone());
        let poll = TransportRequest::get(self.poll_url(&job_id)?);
        let mut attempts = 0u32;
        loop {
            self.limit(LoopStage::Poll, attempts, self.options.max_poll_attempts)?;
            self.pause(LoopStage::Poll, retry_after.as_ref()).await?;
            attempts += 1;
            match self.exchange(poll.clone(), LoopStage::Poll).await? {
                ResponseStep::Completed { result, .. } => {
                    debug!(job_id, attempts, "relayer job finished");
                    return Ok(result);
                }
                ResponseStep::Queued {
                    retry_after: next, ..
                } => {
                    debug!(job_id, attempts, "relayer job still queued");
                    retry_after = next;
                }
                ResponseStep::RateLimited { retry_after: next } => retry_after = next,
            }
        }
    }

    fn limit(&self, stage: LoopStage, attempts: u32, max: u32) -> Result<(), RequestError> {
        if attempts >= max {
            return Err(RequestError::IterationLimit { stage, attempts });
        }
        Ok(())
    }

    fn poll_url(&self, job_id: &str) -> Result<Url, RequestError> {
        let mut url = self.url.clone();
        url.path_segments_mut()
            .map_err(|_| RequestError::InvalidUrl(self.url.to_string()))?
            .pop_if_empty()
            .push(job_id);
        Ok(url)
    }

    async fn exchange(
        &self,
        request: TransportRequest,
        stage: LoopStage,
    ) -> Result<ResponseStep<T>, RequestError> {
        let response = self.guard(self.transport.send(request)).await??;
        let step = classify_response(response.status, &response.body)?;
        if let ResponseStep::RateLimited { retry_after } = &step {
            warn!(%stage, ?retry_after, "relayer rate limited the request");
        }
        Ok(step)
    }

    async fn pause(
        &self,
        stage: LoopStage,
        retry_after: Option<&RetryAfter>,
    ) -> Result<(), RequestError> {
        let advertised = retry_after
            .map(|at| at.remaining(Utc::now()))
            .unwrap_or_default();
        let delay = self.options.clamp_delay(advertised);
        let retries = self.shared.retry_count.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(%stage, ?delay, retries, "waiting before next relayer call");
        self.guard(tokio::time::sleep(delay)).await
    }

    /// Races `fut` against cancellation and abort, then re-checks the phase
    async fn guard<F: Future>(&self, fut: F) -> Result<F::Output, RequestError> {
        if self.abort.as_ref().is_some_and(AbortSignal::is_aborted) {
            self.shared.terminate(Termination::Aborted);
        }
        self.shared.ensure_running()?;
        tokio::select! {
            biased;
            err = self.stopped() => Err(err),
            output = fut => {
                self.shared.ensure_running()?;
                Ok(output)
            }
        }
    }

    async fn stopped(&self) -> RequestError {
        let mut phase = self.shared.phase.subscribe();
        let abort = self.abort.clone();
        let aborted = async move {
            match abort {
                Some(mut signal) => signal.aborted().await,
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            biased;
            _ = aborted => {
                self.shared.terminate(Termination::Aborted);
            }
            _ = phase.wait_for(RequestPhase::is_terminated) => {}
        }
        self.shared.interruption()
    }
}
