// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use async_trait::async_trait;
use fhr_request::{RelayerTransport, TransportError, TransportRequest, TransportResponse};
use serde_json::Value;
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};
use tracing::trace;

type Scripted = Result<TransportResponse, TransportError>;

#[derive(Debug, Default)]
struct MockState {
    script: VecDeque<Scripted>,
    last: Option<Scripted>,
    calls: Vec<TransportRequest>,
}

/// Replays scripted responses in order and records every request it receives.
///
/// When the script runs out the last response is repeated.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
    delay: Option<Duration>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps this long (on the tokio clock) before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn respond(self, status: u16, body: Value) -> Self {
        self.push(Ok(TransportResponse::json(status, &body)))
    }

    pub fn respond_raw(self, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.push(Ok(TransportResponse::new(status, body)))
    }

    pub fn fail(self, error: TransportError) -> Self {
        self.push(Err(error))
    }

    fn push(self, scripted: Scripted) -> Self {
        self.state
            .lock()
            .expect("mock transport lock poisoned")
            .script
            .push_back(scripted);
        self
    }

    pub fn calls(&self) -> Vec<TransportRequest> {
        self.state
            .lock()
            .expect("mock transport lock poisoned")
            .calls
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.state
            .lock()
            .expect("mock transport lock poisoned")
            .calls
            .len()
    }

    pub fn into_transport(self) -> Arc<dyn RelayerTransport> {
        Arc::new(self)
    }
}

#[async_trait]
impl RelayerTransport for MockTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        trace!(method = ?request.method, url = %request.url, "mock transport call");
        let url = request.url.to_string();
        self.state
            .lock()
            .expect("mock transport lock poisoned")
            .calls
            .push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().expect("mock transport lock poisoned");
        match state.script.pop_front() {
            Some(next) => {
                state.last = Some(next.clone());
                next
            }
            None => state.last.clone().unwrap_or_else(|| {
                Err(TransportError::Http {
                    url,
                    reason: "no scripted response".to_string(),
                })
            }),
        }
    }
}
