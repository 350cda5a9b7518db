use crate::config::InsightsConfig;
use crate::error::{InsightsError, Result};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub type ScheduledTask = Arc<dyn Fn() + Send + Sync>;

/// Recurring report work on the host's executor.
///
/// The executor is borrowed: shutting the scheduler down cancels and aborts
/// the tasks it spawned but never touches the runtime itself.
pub struct InsightsScheduler {
    executor: Handle,
    connect_period: Duration,
    update_period: Duration,
    cancel_token: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    shut_down: AtomicBool,
}

impl InsightsScheduler {
    pub fn new(executor: Handle, connect_period: Duration, update_period: Duration) -> Self {
        Self {
            executor,
            connect_period,
            update_period,
            cancel_token: CancellationToken::new(),
            tasks: Mutex::new(Vec::new()),
            shut_down: AtomicBool::new(false),
        }
    }

    pub fn from_config(executor: Handle, config: &InsightsConfig) -> Self {
        Self::new(executor, config.connect_period, config.update_period)
    }

    /// Token cancelled on shutdown; long-running tasks select on it.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.child_token()
    }

    pub fn is_shutdown(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    /// Full report regeneration; the first run is one period from now
    /// because the initial report is produced synchronously at startup.
    pub fn schedule_connect(&self, task: ScheduledTask) -> Result<()> {
        self.schedule_at_fixed_rate("connect", self.connect_period, self.connect_period, task)
    }

    pub fn schedule_update(&self, task: ScheduledTask) -> Result<()> {
        self.schedule_at_fixed_rate("update", self.update_period, self.update_period, task)
    }

    pub fn schedule_at_fixed_rate(
        &self,
        name: &'static str,
        initial_delay: Duration,
        period: Duration,
        task: ScheduledTask,
    ) -> Result<()> {
        let cancel_token = self.cancellation_token();
        let period = period.max(Duration::from_millis(1));

        self.spawn(async move {
            let start = tokio::time::Instant::now() + initial_delay;
            let mut ticker = tokio::time::interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => break,
                    _ = ticker.tick() => {
                        let task = Arc::clone(&task);
                        // Report assembly walks the topology and reads archives
                        if let Err(e) = tokio::task::spawn_blocking(move || task()).await {
                            warn!("Scheduled task {} failed: {}", name, e);
                        }
                    }
                }
            }
            debug!("Scheduled task {} stopped", name);
        })
    }

    /// Spawn a tracked task on the borrowed executor.
    pub fn spawn<F>(&self, future: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        if self.is_shutdown() {
            return Err(InsightsError::Delivery("scheduler is shut down".to_string()));
        }
        tasks.push(self.executor.spawn(future));
        Ok(())
    }

    pub fn task_count(&self) -> usize {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Cancel every task. Idempotent and non-blocking.
    pub fn shutdown(&self) {
        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        self.cancel_token.cancel();
        for task in tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for InsightsScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_fixed_rate_runs_until_shutdown() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let scheduler = InsightsScheduler::new(
            runtime.handle().clone(),
            Duration::from_secs(3600),
            Duration::from_secs(3600),
        );
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);

        scheduler
            .schedule_at_fixed_rate(
                "tick",
                Duration::ZERO,
                Duration::from_millis(10),
                Arc::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();

        std::thread::sleep(Duration::from_millis(200));
        scheduler.shutdown();
        let after_shutdown = runs.load(Ordering::SeqCst);
        assert!(after_shutdown >= 2, "expected repeated runs, got {after_shutdown}");

        std::thread::sleep(Duration::from_millis(100));
        assert!(runs.load(Ordering::SeqCst) <= after_shutdown + 1);
        assert_eq!(scheduler.task_count(), 0);
    }

    #[test]
    fn test_schedule_after_shutdown_is_rejected() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let scheduler = InsightsScheduler::new(
            runtime.handle().clone(),
            Duration::from_secs(1),
            Duration::from_secs(1),
        );
        scheduler.shutdown();
        scheduler.shutdown();

        assert!(scheduler.is_shutdown());
        assert!(scheduler.schedule_connect(Arc::new(|| {})).is_err());
    }

    #[test]
    fn test_shutdown_leaves_executor_usable() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let scheduler = InsightsScheduler::new(
            runtime.handle().clone(),
            Duration::from_secs(1),
            Duration::from_secs(1),
        );
        scheduler.schedule_update(Arc::new(|| {})).unwrap();
        scheduler.shutdown();

        let value = runtime.block_on(async { tokio::spawn(async { 7 }).await.unwrap() });
        assert_eq!(value, 7);
    }
}
