// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{LoopStage, RelayerApiError, Termination, TransportError};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Request is already running")]
    AlreadyStarted,

    #[error("Request has already terminated ({0:?}) and cannot be run again")]
    AlreadyTerminated(Termination),

    #[error("Request was canceled")]
    Canceled,

    #[error("Request was aborted")]
    Aborted,

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Relayer rejected the request with status {status}: {error}")]
    Relayer { status: u16, error: RelayerApiError },

    #[error("Malformed relayer response (status {status}): {reason}")]
    MalformedResponse { status: u16, reason: String },

    #[error("Unexpected relayer status {0}")]
    UnexpectedStatus(u16),

    #[error("{stage} loop did not terminate after {attempts} attempts")]
    IterationLimit { stage: LoopStage, attempts: u32 },

    #[error("Invalid relayer url: {0}")]
    InvalidUrl(String),

    #[error("Could not serialize request payload: {0}")]
    Payload(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl RequestError {
    /// Cancellation, abort and timeout end a request without implying anything went wrong
    pub fn is_interrupted(&self) -> bool {
        matches!(
            self,
            RequestError::Canceled | RequestError::Aborted | RequestError::Timeout(_)
        )
    }
}
