//! Service health snapshot and its periodic poller.

use crate::contexts::llm_gateway::{LlmGateway, LlmStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub timestamp: DateTime<Utc>,
    pub backend: String,
    pub database: String,
    pub llm: LlmStatus,
    pub llm_provider: String,
}

/// Probes the provider and assembles a report. Never fails.
pub async fn check(gateway: &LlmGateway) -> HealthReport {
    let llm = gateway.probe().await;
    HealthReport {
        timestamp: Utc::now(),
        backend: "healthy".to_string(),
        database: "connected".to_string(),
        llm,
        llm_provider: gateway.provider().kind.name().to_string(),
    }
}

/// Runs a health probe on a fixed interval until cancelled or dropped.
///
/// The latest report is published on a watch channel; it holds `None` until
/// the first probe completes.
pub struct HealthPoller {
    handle: JoinHandle<()>,
    latest: watch::Receiver<Option<HealthReport>>,
}

impl HealthPoller {
    /// Spawns a poller that runs `probe` immediately and then every `interval`.
    pub fn spawn<F, Fut>(interval: Duration, probe: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = HealthReport> + Send + 'static,
    {
        let (tx, latest) = watch::channel(None);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let report = probe().await;
                tracing::debug!(llm = ?report.llm, "health probe finished");
                if tx.send(Some(report)).is_err() {
                    break;
                }
            }
        });

        Self { handle, latest }
    }

    /// Polls the gateway's provider.
    pub fn for_gateway(gateway: Arc<LlmGateway>, interval: Duration) -> Self {
        Self::spawn(interval, move || {
            let gateway = Arc::clone(&gateway);
            async move { check(&gateway).await }
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<HealthReport>> {
        self.latest.clone()
    }

    pub fn latest(&self) -> Option<HealthReport> {
        self.latest.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stops polling. Dropping the poller has the same effect.
    pub fn cancel(self) {
        self.handle.abort();
    }
}

impl Drop for HealthPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
