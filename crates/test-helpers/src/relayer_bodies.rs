// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! JSON bodies shaped like relayer responses

use serde_json::{json, Value};

pub fn succeeded(result: Value) -> Value {
    json!({ "status": "succeeded", "requestId": "req-1", "result": result })
}

pub fn queued(job_id: &str, retry_after: Value) -> Value {
    json!({
        "status": "queued",
        "requestId": "req-1",
        "result": { "jobId": job_id, "retryAfter": retry_after }
    })
}

pub fn rate_limited(retry_after: Value) -> Value {
    json!({
        "status": "failed",
        "error": {
            "label": "rate_limited",
            "message": "too many requests",
            "retryAfter": retry_after
        }
    })
}

pub fn failed(label: &str, message: &str) -> Value {
    json!({ "status": "failed", "error": { "label": label, "message": message } })
}
