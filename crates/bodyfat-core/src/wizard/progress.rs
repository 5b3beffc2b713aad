//! Cosmetic progress animation for remote calls.
//!
//! The ticker climbs by a random amount every interval, stops at the cap
//! and only reaches 100% when [`ProgressTicker::finish`] is called. It never
//! reflects real progress. The background task is aborted when the ticker is
//! dropped, so every exit path (success, failure, navigation) releases it.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Animation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressConfig {
    /// Time between increments
    pub interval: Duration,
    /// Highest value reached before the call completes
    pub cap: f64,
    /// Largest single increment
    pub max_step: f64,
    /// How long 100% stays visible before the result is shown
    pub finish_hold: Duration,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(200),
            cap: 90.0,
            max_step: 15.0,
            finish_hold: Duration::from_millis(300),
        }
    }
}

/// One animation step, never exceeding `cap`
pub fn advance(current: f64, increment: f64, cap: f64) -> f64 {
    (current + increment.max(0.0)).min(cap).max(current.min(cap))
}

/// Running progress animation
pub struct ProgressTicker {
    tx: Arc<watch::Sender<f64>>,
    rx: watch::Receiver<f64>,
    task: JoinHandle<()>,
    config: ProgressConfig,
}

impl ProgressTicker {
    /// Start at 0% and spawn the ticking task
    pub fn start(config: ProgressConfig) -> Self {
        let (tx, rx) = watch::channel(0.0);
        let tx = Arc::new(tx);

        let task = tokio::spawn({
            let tx = Arc::clone(&tx);
            async move {
                let mut rng = StdRng::from_entropy();
                let mut interval = tokio::time::interval(config.interval);
                // first tick completes immediately
                interval.tick().await;
                loop {
                    interval.tick().await;
                    let increment = if config.max_step > 0.0 {
                        rng.gen_range(0.0..config.max_step)
                    } else {
                        0.0
                    };
                    tx.send_modify(|p| *p = advance(*p, increment, config.cap));
                }
            }
        });

        Self {
            tx,
            rx,
            task,
            config,
        }
    }

    /// Current percentage
    pub fn value(&self) -> f64 {
        *self.rx.borrow()
    }

    /// Receiver for redrawing a progress line
    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.tx.subscribe()
    }

    /// Stop ticking, show 100% and hold it briefly
    pub async fn finish(self) {
        self.task.abort();
        self.tx.send_replace(100.0);
        tokio::time::sleep(self.config.finish_hold).await;
    }

    /// Stop ticking and reset to 0%
    pub fn cancel(self) {
        self.task.abort();
        self.tx.send_replace(0.0);
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
