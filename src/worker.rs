// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Poll loop: list, fetch, identify, submit

use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::{AppConfig, FailurePolicy, PollConfig};
use crate::coordinator::{CoordinatorClient, FileDescriptor};
use crate::identify::Identifier;
use crate::Result;

/// Outcome of one pass over the coordinator's pending files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub listed: usize,
    pub submitted: usize,
}

/// Sequential identification worker
pub struct Worker {
    client: CoordinatorClient,
    identifier: Identifier,
    config: AppConfig,
}

impl Worker {
    pub fn new(client: CoordinatorClient, identifier: Identifier, config: AppConfig) -> Self {
        Self { client, identifier, config }
    }

    /// Identify everything the coordinator currently lists
    ///
    /// Stops at the first coordinator error; files already submitted stay
    /// submitted.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let files = self.client.list_unidentified().await?;
        let mut report = CycleReport { listed: files.len(), submitted: 0 };

        for file in &files {
            self.process_file(file).await?;
            report.submitted += 1;
        }

        Ok(report)
    }

    async fn process_file(&self, file: &FileDescriptor) -> Result<()> {
        info!("Processing file {} ({})", file.id, file.filename.as_deref().unwrap_or("unnamed"));

        // Removed when `local` goes out of scope, whatever happens below
        let local = self
            .client
            .fetch_to_temp(file.id, &self.config.identify.temp_dir)
            .await?;

        let result = self.identifier.identify(local.path()).await;
        self.client.submit(file.id, &result).await?;

        info!("Submitted identification for file {}: {}", file.id, result.magic.description);
        Ok(())
    }

    /// Run cycles forever, pausing the poll interval between them
    ///
    /// Only returns when a coordinator failure is not retried under the
    /// configured policy.
    pub async fn run(&self) -> Result<()> {
        let poll = &self.config.poll;
        let mut failures: u32 = 0;

        info!("Polling {} every {:?}", self.client.base_url(), poll.interval());

        loop {
            match self.run_cycle().await {
                Ok(report) => {
                    failures = 0;
                    if report.listed > 0 {
                        info!("Cycle done: {} listed, {} submitted", report.listed, report.submitted);
                    }
                    tokio::time::sleep(poll.interval()).await;
                }
                Err(e) => {
                    failures += 1;
                    match retry_delay(poll, failures) {
                        Some(delay) => {
                            warn!("Cycle failed ({}), retrying in {:?} (attempt {})", e, delay, failures + 1);
                            tokio::time::sleep(delay).await;
                        }
                        None => {
                            error!("Coordinator failure, stopping worker: {}", e);
                            return Err(e);
                        }
                    }
                }
            }
        }
    }
}

/// Delay before the next attempt after `failures` consecutive failures, or
/// `None` when the worker should give up
pub fn retry_delay(poll: &PollConfig, failures: u32) -> Option<Duration> {
    match poll.failure_policy {
        FailurePolicy::Fatal => None,
        FailurePolicy::Retry if failures > poll.max_retries => None,
        FailurePolicy::Retry => {
            let secs = 2u64.saturating_pow(failures.saturating_sub(1)).min(poll.max_backoff_secs);
            Some(Duration::from_secs(secs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retry_config() -> PollConfig {
        PollConfig {
            failure_policy: FailurePolicy::Retry,
            max_retries: 4,
            max_backoff_secs: 5,
            ..PollConfig::default()
        }
    }

    #[test]
    fn test_fatal_policy_never_retries() {
        assert_eq!(retry_delay(&PollConfig::default(), 1), None);
    }

    #[test]
    fn test_retry_backoff_doubles_and_caps() {
        let poll = retry_config();
        assert_eq!(retry_delay(&poll, 1), Some(Duration::from_secs(1)));
        assert_eq!(retry_delay(&poll, 2), Some(Duration::from_secs(2)));
        assert_eq!(retry_delay(&poll, 3), Some(Duration::from_secs(4)));
        assert_eq!(retry_delay(&poll, 4), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_retry_gives_up_after_max_retries() {
        assert_eq!(retry_delay(&retry_config(), 5), None);
    }
}
