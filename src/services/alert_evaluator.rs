use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
    time::Duration,
};

use futures_util::{stream, StreamExt};
use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

use crate::{
    error::{FetchError, StoreError},
    models::{AlertNotification, CollectionSnapshot, PriceAlert},
};

use super::{alert_store::AlertStore, messages, notifier::Notifier, price_source::PriceSource};

pub type SnapshotResult = Result<CollectionSnapshot, FetchError>;

#[derive(Debug, Clone, Copy)]
pub struct Schedule {
    pub first_run_delay: Duration,
    pub interval: Duration,
}

/// Counts for one pass, mostly for logs and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    pub alerts_checked: usize,
    pub collections_fetched: usize,
    pub fetch_failures: usize,
    pub skipped: usize,
    pub triggered: usize,
    pub delivered: usize,
    pub delivery_failures: usize,
    pub store_failures: usize,
    pub already_inactive: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// No usable price this pass; leave the alert alone.
    Skip,
    /// Price known, condition not met.
    Hold,
    Trigger(AlertNotification),
}

/// Decides a single alert against this pass's snapshot for its collection.
pub fn evaluate(alert: &PriceAlert, snapshot: Option<&SnapshotResult>) -> Evaluation {
    let Some(Ok(snap)) = snapshot else {
        return Evaluation::Skip;
    };
    let Some(price) = snap.floor_price else {
        return Evaluation::Skip;
    };

    if !alert.direction.is_crossed(price, alert.threshold) {
        return Evaluation::Hold;
    }

    Evaluation::Trigger(AlertNotification {
        owner_id: alert.owner_id,
        collection_key: alert.collection_key.clone(),
        current_price: price,
        currency_symbol: snap.currency_symbol.clone(),
        threshold: alert.threshold,
        direction: alert.direction,
    })
}

pub struct AlertEvaluator {
    alerts: Arc<dyn AlertStore>,
    prices: Arc<dyn PriceSource>,
    notifier: Arc<dyn Notifier>,
    fetch_concurrency: usize,
}

impl AlertEvaluator {
    pub fn new(
        alerts: Arc<dyn AlertStore>,
        prices: Arc<dyn PriceSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            alerts,
            prices,
            notifier,
            fetch_concurrency: 1,
        }
    }

    pub fn with_fetch_concurrency(mut self, n: usize) -> Self {
        self.fetch_concurrency = n.max(1);
        self
    }

    /// One pass. Only failing to read the active alerts fails the pass;
    /// everything after that is isolated per alert.
    pub async fn run_pass(&self) -> Result<PassReport, StoreError> {
        let active = self.alerts.list_all_active().await?;

        let mut report = PassReport {
            alerts_checked: active.len(),
            ..PassReport::default()
        };

        if active.is_empty() {
            return Ok(report);
        }

        // One upstream call per distinct collection, however many alerts share it.
        let keys: BTreeSet<String> = active.iter().map(|a| a.collection_key.clone()).collect();
        let snapshots = self.fetch_all(keys).await;

        report.collections_fetched = snapshots.len();
        for (key, res) in &snapshots {
            match res {
                Ok(s) if s.floor_price.is_none() => {
                    tracing::warn!(collection = %key, "no floor price reported, skipping its alerts");
                }
                Ok(_) => {}
                Err(e) => {
                    report.fetch_failures += 1;
                    tracing::warn!(collection = %key, kind = e.kind(), error = %e, "floor fetch failed, skipping its alerts");
                }
            }
        }

        for alert in &active {
            let notification = match evaluate(alert, snapshots.get(&alert.collection_key)) {
                Evaluation::Skip => {
                    report.skipped += 1;
                    continue;
                }
                Evaluation::Hold => continue,
                Evaluation::Trigger(n) => n,
            };

            report.triggered += 1;
            self.deliver(&notification, &mut report).await;
        }

        Ok(report)
    }

    async fn fetch_all(&self, keys: BTreeSet<String>) -> HashMap<String, SnapshotResult> {
        let prices = &self.prices;

        stream::iter(keys)
            .map(|key| async move {
                let res = prices.fetch(&key).await;
                (key, res)
            })
            .buffer_unordered(self.fetch_concurrency)
            .collect::<HashMap<_, _>>()
            .await
    }

    /// Notify first, deactivate only after a successful send. A failed send
    /// leaves the alert active so the next pass retries it.
    async fn deliver(&self, n: &AlertNotification, report: &mut PassReport) {
        let text = messages::alert_triggered(n);

        if let Err(e) = self.notifier.send(n.owner_id, &text).await {
            report.delivery_failures += 1;
            tracing::error!(
                owner_id = n.owner_id,
                collection = %n.collection_key,
                threshold = n.threshold,
                error = %e,
                "failed to send alert, will retry next pass"
            );
            return;
        }
        report.delivered += 1;

        match self
            .alerts
            .deactivate(n.owner_id, &n.collection_key, n.threshold)
            .await
        {
            Ok(true) => {
                tracing::info!(owner_id = n.owner_id, collection = %n.collection_key, threshold = n.threshold, "alert fired");
            }
            Ok(false) => {
                report.already_inactive += 1;
                tracing::debug!(owner_id = n.owner_id, collection = %n.collection_key, threshold = n.threshold, "alert was already inactive");
            }
            Err(e) => {
                report.store_failures += 1;
                tracing::error!(owner_id = n.owner_id, collection = %n.collection_key, error = %e, "failed to deactivate alert");
            }
        }
    }
}

/// Runs passes forever on a fixed cadence. Passes never overlap: a slow
/// pass pushes the next tick back instead of stacking up.
pub fn spawn_alert_evaluator(evaluator: Arc<AlertEvaluator>, schedule: Schedule) -> JoinHandle<()> {
    tokio::spawn(async move {
        let start = time::Instant::now() + schedule.first_run_delay;
        let mut interval = time::interval_at(start, schedule.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            match evaluator.run_pass().await {
                Ok(report) => tracing::info!(
                    alerts = report.alerts_checked,
                    collections = report.collections_fetched,
                    fetch_failures = report.fetch_failures,
                    triggered = report.triggered,
                    delivered = report.delivered,
                    delivery_failures = report.delivery_failures,
                    "[alert-evaluator] pass complete"
                ),
                Err(e) => tracing::error!(error = %e, "[alert-evaluator] pass aborted"),
            }
        }
    })
}
