// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Response bodies of the relayer HTTP API.
//!
//! Every body is validated once here and converted into a closed [`ResponseStep`]. Nothing past
//! this module looks at raw JSON.

use crate::RequestError;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{fmt, time::Duration};
use thiserror::Error;

/// When the relayer wants to be called again
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RetryAfter {
    Timestamp(DateTime<Utc>),
    Seconds(u64),
}

impl RetryAfter {
    /// Time left until the advertised instant, zero if it already passed
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        match self {
            RetryAfter::Timestamp(at) => (*at - now).to_std().unwrap_or(Duration::ZERO),
            RetryAfter::Seconds(secs) => Duration::from_secs(*secs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub issue: String,
}

fn format_issues(details: &[FieldIssue]) -> String {
    details
        .iter()
        .map(|d| format!("{}: {}", d.field, d.issue))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error body returned with 4xx and 5xx statuses, keyed by `label`
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "label", rename_all = "snake_case")]
pub enum RelayerApiError {
    #[error("rate limited: {message}")]
    RateLimited {
        message: String,
        #[serde(rename = "retryAfter", default)]
        retry_after: Option<RetryAfter>,
    },

    #[error("validation failed: {message} [{}]", format_issues(details))]
    ValidationFailed {
        message: String,
        #[serde(default)]
        details: Vec<FieldIssue>,
    },

    #[error("missing fields: {message} [{}]", format_issues(details))]
    MissingFields {
        message: String,
        #[serde(default)]
        details: Vec<FieldIssue>,
    },

    #[error("malformed json: {message}")]
    MalformedJson { message: String },

    #[error("bad request: {message}")]
    RequestError { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("protocol paused: {message}")]
    ProtocolPaused { message: String },

    #[error("gateway not reachable: {message}")]
    GatewayNotReachable { message: String },

    #[error("readiness check timed out: {message}")]
    ReadinessCheckTimedOut { message: String },

    #[error("response timed out: {message}")]
    ResponseTimedOut { message: String },

    #[error("insufficient balance: {message}")]
    InsufficientBalance { message: String },

    #[error("internal server error: {message}")]
    InternalServerError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SucceededTag {
    Succeeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum QueuedTag {
    Queued,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum FailedTag {
    Failed,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SucceededBody<T> {
    #[serde(default)]
    #[allow(dead_code)]
    status: Option<SucceededTag>,
    #[serde(default)]
    request_id: Option<String>,
    result: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedResult {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub retry_after: Option<RetryAfter>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueuedBody {
    #[allow(dead_code)]
    status: QueuedTag,
    #[serde(default)]
    request_id: Option<String>,
    result: QueuedResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FailedBody {
    #[serde(default)]
    #[allow(dead_code)]
    status: Option<FailedTag>,
    error: RelayerApiError,
}

/// Closed view of one relayer response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseStep<T> {
    Completed {
        request_id: Option<String>,
        result: T,
    },
    Queued {
        request_id: Option<String>,
        job_id: Option<String>,
        retry_after: Option<RetryAfter>,
    },
    RateLimited {
        retry_after: Option<RetryAfter>,
    },
}

fn parse_body<B: DeserializeOwned>(status: u16, body: &[u8]) -> Result<B, RequestError> {
    serde_json::from_slice(body).map_err(|e| RequestError::MalformedResponse {
        status,
        reason: e.to_string(),
    })
}

/// Map a status code and body onto a [`ResponseStep`], or the fatal error it represents
pub fn classify_response<T: DeserializeOwned>(
    status: u16,
    body: &[u8],
) -> Result<ResponseStep<T>, RequestError> {
    match status {
        200 => {
            let body: SucceededBody<T> = parse_body(status, body)?;
            Ok(ResponseStep::Completed {
                request_id: body.request_id,
                result: body.result,
            })
        }
        202 => {
            let body: QueuedBody = parse_body(status, body)?;
            Ok(ResponseStep::Queued {
                request_id: body.request_id,
                job_id: body.result.job_id,
                retry_after: body.result.retry_after,
            })
        }
        429 => {
            let body: FailedBody = parse_body(status, body)?;
            match body.error {
                RelayerApiError::RateLimited { retry_after, .. } => {
                    Ok(ResponseStep::RateLimited { retry_after })
                }
                error => Err(RequestError::Relayer { status, error }),
            }
        }
        400..=599 => {
            let body: FailedBody = parse_body(status, body)?;
            Err(RequestError::Relayer {
                status,
                error: body.error,
            })
        }
        other => Err(RequestError::UnexpectedStatus(other)),
    }
}

/// Submit or poll, used for logging and iteration limit reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStage {
    Submit,
    Poll,
}

impl fmt::Display for LoopStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopStage::Submit => f.write_str("submit"),
            LoopStage::Poll => f.write_str("poll"),
        }
    }
}
