use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use flack_core::config::DeliveryConfig;
use flack_core::errors::DeliveryError;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::encoder::DeferredMessage;

/// One out-of-band post to a single-use response URL.
#[derive(Clone, Debug, PartialEq)]
pub struct DeferredDelivery {
    pub response_url: String,
    pub message: DeferredMessage,
    pub correlation_id: String,
}

#[async_trait]
pub trait DeliveryTransport: Send + Sync {
    /// Posts `message` as JSON and returns the HTTP status code.
    async fn post(&self, url: &str, message: &DeferredMessage) -> Result<u16, DeliveryError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| DeliveryError::Transport(error.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DeliveryTransport for HttpTransport {
    async fn post(&self, url: &str, message: &DeferredMessage) -> Result<u16, DeliveryError> {
        let response = self
            .client
            .post(url)
            .json(message)
            .send()
            .await
            .map_err(|error| DeliveryError::Transport(error.to_string()))?;
        Ok(response.status().as_u16())
    }
}

/// Response URLs are single use: once gone they stay gone.
pub fn classify_status(status: u16) -> Result<(), DeliveryError> {
    match status {
        200..=299 => Ok(()),
        404 | 410 => Err(DeliveryError::Expired { status }),
        _ => Err(DeliveryError::Failed { status }),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_millis(10_000),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(16);
        let multiplier = 1_u32 << exponent;
        self.base_delay.saturating_mul(multiplier).min(self.max_delay)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryPolicy {
    /// Wait applied before every delivery so the synchronous reply lands first.
    pub delay: Duration,
    pub retry: RetryPolicy,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self { delay: Duration::from_secs(1), retry: RetryPolicy::default() }
    }
}

impl From<&DeliveryConfig> for DeliveryPolicy {
    fn from(config: &DeliveryConfig) -> Self {
        Self {
            delay: Duration::from_millis(config.delay_ms),
            retry: RetryPolicy {
                max_retries: config.max_retries,
                base_delay: Duration::from_millis(config.retry_base_delay_ms),
                max_delay: Duration::from_millis(config.retry_max_delay_ms),
            },
        }
    }
}

/// Producer handle for the delivery worker. The worker stops once every clone
/// has been dropped and the queue is drained.
#[derive(Clone, Debug)]
pub struct DeliveryQueue {
    sender: mpsc::Sender<DeferredDelivery>,
}

impl DeliveryQueue {
    /// Enqueues without waiting. A full queue rejects the delivery so the
    /// caller's synchronous reply is never held back by the worker.
    pub fn submit(&self, delivery: DeferredDelivery) -> Result<(), DeliveryError> {
        self.sender.try_send(delivery).map_err(|error| match error {
            TrySendError::Full(_) => DeliveryError::QueueFull,
            TrySendError::Closed(_) => DeliveryError::QueueClosed,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    pub fn pending(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    pub delivered: u64,
    pub expired: u64,
    pub failed: u64,
}

pub struct DeliveryWorker {
    transport: Arc<dyn DeliveryTransport>,
    policy: DeliveryPolicy,
}

impl DeliveryWorker {
    pub fn new(transport: Arc<dyn DeliveryTransport>, policy: DeliveryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Starts the single consumer task. Deliveries run one at a time, in
    /// submission order.
    pub fn spawn(self, capacity: usize) -> (DeliveryQueue, JoinHandle<DeliveryStats>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(self.run(receiver));
        (DeliveryQueue { sender }, handle)
    }

    pub async fn run(self, mut receiver: mpsc::Receiver<DeferredDelivery>) -> DeliveryStats {
        let mut stats = DeliveryStats::default();

        while let Some(delivery) = receiver.recv().await {
            match self.deliver(&delivery).await {
                Ok(()) => stats.delivered += 1,
                Err(DeliveryError::Expired { status }) => {
                    stats.expired += 1;
                    warn!(
                        event_name = "delivery.expired",
                        correlation_id = %delivery.correlation_id,
                        status,
                        "response url has expired; dropping deferred message"
                    );
                }
                Err(error) => {
                    stats.failed += 1;
                    warn!(
                        event_name = "delivery.failed",
                        correlation_id = %delivery.correlation_id,
                        error = %error,
                        "deferred delivery failed; dropping message"
                    );
                }
            }
        }

        info!(
            event_name = "delivery.worker.stopped",
            delivered = stats.delivered,
            expired = stats.expired,
            failed = stats.failed,
            "delivery worker drained and stopped"
        );
        stats
    }

    pub async fn deliver(&self, delivery: &DeferredDelivery) -> Result<(), DeliveryError> {
        tokio::time::sleep(self.policy.delay).await;

        let mut attempt = 0;
        loop {
            debug!(
                event_name = "delivery.attempt",
                correlation_id = %delivery.correlation_id,
                attempt,
                "posting deferred message"
            );

            let outcome = self
                .transport
                .post(&delivery.response_url, &delivery.message)
                .await
                .and_then(classify_status);

            match outcome {
                Err(error) if error.is_retryable() && attempt < self.policy.retry.max_retries => {
                    let backoff = self.policy.retry.backoff(attempt);
                    warn!(
                        event_name = "delivery.retry",
                        correlation_id = %delivery.correlation_id,
                        attempt,
                        max_retries = self.policy.retry.max_retries,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %error,
                        "deferred delivery failed; retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }
}
