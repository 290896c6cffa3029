//! Order status tracking.
//!
//! [`OrderTracker::start`] fetches the order once and then polls it on a
//! fixed interval in a background task. Every successful poll is published
//! on a `watch` channel. The task is tied to the [`TrackingHandle`]: stopping
//! or dropping the handle aborts it, and it ends on its own once the order
//! reaches a terminal status.

use std::{sync::Arc, time::Duration};

use canteen::orders::{Order, OrderId};
use thiserror::Error;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::api::{ApiError, CanteenApi};

/// Errors raised while tracking an order.
#[derive(Debug, Error)]
pub enum TrackingError {
    /// The initial fetch failed.
    #[error("failed to load order: {0}")]
    Api(#[from] ApiError),

    /// Polling has ended; no further updates will arrive.
    #[error("order tracking has stopped")]
    Stopped,
}

/// Starts tracking sessions against the backend.
#[derive(Clone)]
pub struct OrderTracker {
    api: Arc<dyn CanteenApi>,
    interval: Duration,
}

impl OrderTracker {
    #[must_use]
    pub fn new(api: Arc<dyn CanteenApi>, interval: Duration) -> Self {
        Self { api, interval }
    }

    /// Poll interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Fetch `order_id` and start polling it.
    ///
    /// No task is spawned when the order is already terminal.
    ///
    /// # Errors
    ///
    /// Returns an error when the initial fetch fails.
    pub async fn start(&self, order_id: OrderId) -> Result<TrackingHandle, TrackingError> {
        let order = self.api.track_order(order_id.clone()).await?;
        let terminal = order.status.is_terminal();
        let (sender, receiver) = watch::channel(order);

        let task = if terminal {
            debug!(%order_id, "order already finished, not polling");
            None
        } else {
            debug!(%order_id, interval = ?self.interval, "polling order");
            Some(tokio::spawn(poll(
                Arc::clone(&self.api),
                order_id,
                self.interval,
                sender,
            )))
        };

        Ok(TrackingHandle { receiver, task })
    }
}

async fn poll(
    api: Arc<dyn CanteenApi>,
    order_id: OrderId,
    period: Duration,
    sender: watch::Sender<Order>,
) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match api.track_order(order_id.clone()).await {
            Ok(order) => {
                let status = order.status;
                sender.send_replace(order);

                if status.is_terminal() {
                    info!(%order_id, %status, "order finished, polling stopped");
                    break;
                }
            }
            Err(error) => {
                warn!(%order_id, %error, "order poll failed, retrying next tick");
            }
        }
    }
}

/// A live tracking session; polling stops when this is stopped or dropped.
#[derive(Debug)]
pub struct TrackingHandle {
    receiver: watch::Receiver<Order>,
    task: Option<JoinHandle<()>>,
}

impl TrackingHandle {
    /// Latest known state of the order.
    #[must_use]
    pub fn current(&self) -> Order {
        self.receiver.borrow().clone()
    }

    /// Another receiver for the same updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Order> {
        self.receiver.clone()
    }

    /// Wait for the next poll result.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Stopped`] once polling has ended.
    pub async fn changed(&mut self) -> Result<Order, TrackingError> {
        if self.task.is_none() {
            return Err(TrackingError::Stopped);
        }

        self.receiver
            .changed()
            .await
            .map_err(|_| TrackingError::Stopped)?;

        Ok(self.receiver.borrow_and_update().clone())
    }

    /// Check whether the poll task is still running.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop polling. Further calls are no-ops.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("order polling cancelled");
        }
    }
}

impl Drop for TrackingHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
