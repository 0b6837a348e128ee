//! Bounded polling of a running analyze operation.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use super::response::{AnalyzeResult, OperationStatus, ReadOperation};
use crate::error::{Result, ServiceError, TransportError};
use crate::models::config::PollConfig;

/// Exponential backoff schedule with an attempt cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub backoff_factor: u32,
    pub max_delay: Duration,
}

impl PollSchedule {
    pub fn from_config(config: &PollConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            backoff_factor: config.backoff_factor.max(1),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }

    /// Wait before the given attempt (0-based), capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.backoff_factor.saturating_pow(attempt);
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Sum of every wait if all attempts are used.
    pub fn worst_case(&self) -> Duration {
        (0..self.max_attempts).map(|a| self.delay_for(a)).sum()
    }
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self::from_config(&PollConfig::default())
    }
}

/// Something that can report the current state of an operation.
pub trait OperationSource {
    fn fetch(&self) -> impl Future<Output = Result<ReadOperation>> + Send;
}

/// Poll until the operation finishes, fails, or the schedule runs out.
pub async fn poll_operation<S>(source: &S, schedule: &PollSchedule) -> Result<AnalyzeResult>
where
    S: OperationSource + Sync,
{
    for attempt in 0..schedule.max_attempts {
        tokio::time::sleep(schedule.delay_for(attempt)).await;

        let operation = source.fetch().await?;
        debug!(
            "Poll attempt {}/{}: {:?}",
            attempt + 1,
            schedule.max_attempts,
            operation.status
        );

        if !operation.status.is_terminal() {
            if operation.status == OperationStatus::Unknown {
                warn!("Unknown operation status, continuing to poll");
            }
            continue;
        }

        return if operation.status == OperationStatus::Succeeded {
            operation.analyze_result.ok_or_else(|| {
                ServiceError::MalformedResponse("succeeded without analyzeResult".to_string()).into()
            })
        } else {
            Err(ServiceError::AnalysisFailed(operation.failure_message()).into())
        };
    }

    Err(TransportError::Timeout {
        attempts: schedule.max_attempts,
    }
    .into())
}
