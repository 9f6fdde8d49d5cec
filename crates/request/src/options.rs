// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing and iteration limits for one relayer request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct RequestOptions {
    /// Lower bound on every wait between relayer calls, whatever the relayer advertises
    pub min_retry_delay_ms: u64,
    /// Upper bound on every wait between relayer calls
    pub max_retry_delay_ms: u64,
    /// Submissions attempted before giving up on a rate limiting relayer
    pub max_submit_attempts: u32,
    /// Polls attempted before giving up on a job that never terminates
    pub max_poll_attempts: u32,
    /// Overall budget for submit and poll together
    pub timeout_ms: Option<u64>,
    /// Budget for a single http call
    pub call_timeout_ms: Option<u64>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            min_retry_delay_ms: 1_000,
            max_retry_delay_ms: 60_000,
            max_submit_attempts: 10,
            max_poll_attempts: 120,
            timeout_ms: None,
            call_timeout_ms: None,
        }
    }
}

impl RequestOptions {
    pub fn min_retry_delay(&self) -> Duration {
        Duration::from_millis(self.min_retry_delay_ms)
    }

    pub fn max_retry_delay(&self) -> Duration {
        Duration::from_millis(self.max_retry_delay_ms.max(self.min_retry_delay_ms))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_ms.map(Duration::from_millis)
    }

    /// Clamp an advertised wait into the configured window
    pub fn clamp_delay(&self, advertised: Duration) -> Duration {
        advertised.clamp(self.min_retry_delay(), self.max_retry_delay())
    }
}
