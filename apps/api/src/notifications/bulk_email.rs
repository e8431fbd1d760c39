//! Batched bulk email.
//!
//! Recipients are split into fixed-size batches. Every send in a batch runs
//! concurrently and settles on its own; the next batch starts after a fixed
//! pause. Failures are counted and logged, never retried.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::notifications::mailer::{EmailMessage, Mailer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    pub batch_size: usize,
    pub delay: Duration,
}

impl BatchConfig {
    pub fn new(batch_size: usize, delay_ms: u64) -> Self {
        Self {
            batch_size: batch_size.max(1),
            delay: Duration::from_millis(delay_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BulkSendReport {
    pub total: usize,
    pub sent: usize,
    pub failed: usize,
}

pub async fn send_bulk(
    mailer: Arc<dyn Mailer>,
    recipients: &[String],
    subject: &str,
    html: &str,
    config: BatchConfig,
) -> BulkSendReport {
    let mut report = BulkSendReport {
        total: recipients.len(),
        ..Default::default()
    };
    let batch_count = recipients.len().div_ceil(config.batch_size);

    for (index, batch) in recipients.chunks(config.batch_size).enumerate() {
        if index > 0 {
            tokio::time::sleep(config.delay).await;
        }

        let mut set = JoinSet::new();
        for to in batch {
            let mailer = Arc::clone(&mailer);
            let message = EmailMessage {
                to: to.clone(),
                subject: subject.to_string(),
                html: html.to_string(),
            };
            set.spawn(async move {
                let result = mailer.send(&message).await;
                (message.to, result)
            });
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((_, Ok(()))) => report.sent += 1,
                Ok((to, Err(e))) => {
                    report.failed += 1;
                    warn!("Email to {to} failed: {e}");
                }
                Err(e) => {
                    report.failed += 1;
                    warn!("Email task aborted: {e}");
                }
            }
        }
        info!(
            "Email batch {}/{batch_count} done: {} sent, {} failed so far",
            index + 1,
            report.sent,
            report.failed
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::mailer::MailError;
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Records send times; fails any address containing "bad".
    struct MockMailer {
        started: Instant,
        sends: Mutex<Vec<(String, Duration)>>,
    }

    impl MockMailer {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                started: Instant::now(),
                sends: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Mailer for MockMailer {
        async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
            self.sends
                .lock()
                .unwrap()
                .push((message.to.clone(), self.started.elapsed()));
            if message.to.contains("bad") {
                Err(MailError::Rejected {
                    status: 422,
                    message: "invalid recipient".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn recipients(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("student{i}@example.edu")).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_batches_are_sized_and_spaced() {
        let mailer = MockMailer::new();
        let config = BatchConfig::new(50, 1000);

        let report = send_bulk(mailer.clone(), &recipients(120), "Hi", "<p>Hi</p>", config).await;

        assert_eq!(report, BulkSendReport { total: 120, sent: 120, failed: 0 });

        let mut per_second: BTreeMap<u64, usize> = BTreeMap::new();
        for (_, at) in mailer.sends.lock().unwrap().iter() {
            *per_second.entry(at.as_secs()).or_default() += 1;
        }
        assert_eq!(per_second.into_iter().collect::<Vec<_>>(), vec![(0, 50), (1, 50), (2, 20)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_counted_not_retried() {
        let mailer = MockMailer::new();
        let mut list = recipients(4);
        list.push("bad-1@example.edu".to_string());
        list.push("bad-2@example.edu".to_string());

        let report = send_bulk(
            mailer.clone(),
            &list,
            "Hi",
            "<p>Hi</p>",
            BatchConfig::new(4, 10),
        )
        .await;

        assert_eq!(report.total, 6);
        assert_eq!(report.sent, 4);
        assert_eq!(report.failed, 2);
        assert_eq!(report.sent + report.failed, report.total);
        assert_eq!(mailer.sends.lock().unwrap().len(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_recipients_sends_nothing() {
        let mailer = MockMailer::new();
        let report = send_bulk(
            mailer.clone(),
            &[],
            "Hi",
            "<p>Hi</p>",
            BatchConfig::new(50, 1000),
        )
        .await;
        assert_eq!(report, BulkSendReport::default());
        assert!(mailer.sends.lock().unwrap().is_empty());
    }

    #[test]
    fn test_zero_batch_size_is_clamped() {
        assert_eq!(BatchConfig::new(0, 5).batch_size, 1);
    }
}
