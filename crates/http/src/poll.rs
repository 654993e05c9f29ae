//! Polling of asynchronous jobs until they reach a terminal status.

use crate::{
    ServiceClient,
    client::{error_details, service_error},
    request::ServiceRequest,
};
use pdfops_types::{PdfOpsError, Result, headers::request_id_from_location};
use serde_json::Value;
use std::time::Duration;
use tokio::time::Instant;

/// Status of a job as reported by its polling URL.
#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    InProgress,
    /// Terminal success; carries the full status document.
    Done(Value),
    /// Terminal failure; carries the full status document.
    Failed(Value),
}

/// Interprets a polling response body.
///
/// Unknown or missing statuses are treated as still running so that a
/// service adding intermediate states does not break callers.
#[must_use]
pub fn parse_job_status(json: &Value) -> JobStatus {
    match json
        .get("status")
        .and_then(Value::as_str)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("done" | "succeeded" | "success") => JobStatus::Done(json.clone()),
        Some("failed" | "error") => JobStatus::Failed(json.clone()),
        _ => JobStatus::InProgress,
    }
}

fn failure_error(json: &Value, job_id: &str) -> PdfOpsError {
    let (code, message) = error_details(json);
    let status = json
        .get("error")
        .and_then(|e| e.get("status"))
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok())
        .unwrap_or(pdfops_types::error::DEFAULT_STATUS_CODE);
    service_error(
        message.unwrap_or_else(|| "operation failed".to_string()),
        job_id.to_string(),
        status,
        code,
    )
}

/// Parses `retry-after` as whole seconds.
fn retry_after(value: Option<&str>) -> Option<Duration> {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn timed_out(job_id: &str, started: Instant, polls: u32) -> PdfOpsError {
    let elapsed = started.elapsed();
    tracing::warn!(job_id = %job_id, polls, elapsed_ms = elapsed.as_millis(), "job polling timed out");
    PdfOpsError::Timeout {
        request_tracking_id: job_id.to_string(),
        elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
    }
}

impl ServiceClient {
    /// Polls `location` until the job is done, failed, or `timeout` elapses.
    ///
    /// The wait between polls starts at the configured poll interval; a
    /// `retry-after` header overrides it, capped at the maximum interval.
    /// Each poll request is bounded by what is left of `timeout`. A poll
    /// request that times out on its own counts as "still in progress".
    ///
    /// # Errors
    ///
    /// - [`PdfOpsError::Timeout`] when the deadline passes first.
    /// - [`PdfOpsError::ServiceApi`] / [`PdfOpsError::ServiceUsage`] when the
    ///   job fails or a poll request is rejected.
    pub async fn poll(&self, location: &str, timeout: Duration) -> Result<Value> {
        let job_id = request_id_from_location(Some(location));
        let started = Instant::now();
        let deadline = started + timeout;
        let base = self.config().poll_interval();
        let cap = self.config().max_poll_interval();
        let mut polls = 0u32;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let attempt =
                tokio::time::timeout(remaining, self.call(ServiceRequest::get(location))).await;
            polls += 1;
            let resp = match attempt {
                Err(_) => return Err(timed_out(&job_id, started, polls)),
                Ok(Err(PdfOpsError::Timeout { .. })) => {
                    tracing::debug!(job_id = %job_id, polls, "poll request timed out");
                    None
                }
                Ok(result) => Some(result?),
            };
            let status = resp
                .as_ref()
                .and_then(|r| r.json())
                .map_or(JobStatus::InProgress, parse_job_status);
            match status {
                JobStatus::Done(json) => {
                    tracing::debug!(job_id = %job_id, polls, "job finished");
                    return Ok(json);
                }
                JobStatus::Failed(json) => {
                    tracing::warn!(job_id = %job_id, polls, "job failed");
                    return Err(failure_error(&json, &job_id));
                }
                JobStatus::InProgress => {}
            }

            let wait = retry_after(resp.as_ref().and_then(|r| r.header("retry-after")))
                .unwrap_or(base)
                .min(cap);
            if Instant::now() + wait > deadline {
                return Err(timed_out(&job_id, started, polls));
            }
            tracing::trace!(job_id = %job_id, wait_ms = wait.as_millis(), "job still in progress");
            tokio::time::sleep(wait).await;
        }
    }
}
