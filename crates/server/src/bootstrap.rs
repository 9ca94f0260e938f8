use std::sync::Arc;
use std::time::Duration;

use flack_core::config::{AppConfig, ConfigError, LoadOptions};
use flack_core::errors::{DeliveryError, RegistrationError, RouteKind};
use flack_slack::delivery::DeliveryStats;
use flack_slack::{DeliveryPolicy, DeliveryQueue, DeliveryWorker, Dispatcher, HttpTransport};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::info;

use crate::demo;

pub struct Application {
    pub config: AppConfig,
    pub dispatcher: Dispatcher,
    pub deliveries: DeliveryQueue,
    pub delivery_worker: JoinHandle<DeliveryStats>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("delivery transport setup failed: {0}")]
    Transport(#[source] DeliveryError),
    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

/// Starts the delivery worker and builds the dispatcher. Must run inside a
/// tokio runtime.
pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    let transport = HttpTransport::new(Duration::from_secs(config.delivery.timeout_secs))
        .map_err(BootstrapError::Transport)?;
    let worker = DeliveryWorker::new(Arc::new(transport), DeliveryPolicy::from(&config.delivery));
    let (deliveries, delivery_worker) = worker.spawn(config.delivery.queue_capacity);
    info!(
        event_name = "system.bootstrap.delivery_started",
        correlation_id = "bootstrap",
        queue_capacity = config.delivery.queue_capacity,
        delay_ms = config.delivery.delay_ms,
        max_retries = config.delivery.max_retries,
        "delivery worker started"
    );

    let mut dispatcher = Dispatcher::from_config(&config.flack, Some(deliveries.clone()));
    demo::register(&mut dispatcher)?;
    info!(
        event_name = "system.bootstrap.handlers_registered",
        correlation_id = "bootstrap",
        triggers = dispatcher.handler_count(RouteKind::Trigger),
        commands = dispatcher.handler_count(RouteKind::Command),
        actions = dispatcher.handler_count(RouteKind::Action),
        "handlers registered"
    );

    Ok(Application { config, dispatcher, deliveries, delivery_worker })
}
