use super::client::ClientFactory;
use super::queue::WorkQueue;
use super::scheduler::InsightsScheduler;
use crate::config::InsightsConfig;
use crate::error::{InsightsError, Result};
use crate::report::{ClasspathJarsSubreport, ReportAssembler};
use insights_api::{DeliveryClient, Payload, PayloadKind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Schedules, serializes and hands off reports for delivery.
pub trait DeliveryController: Send + Sync {
    /// Run one generation cycle and start recurring delivery.
    fn generate(&self) -> Result<()>;

    /// Stop scheduled work and the delivery queue. Idempotent, never fails.
    fn shutdown(&self);
}

/// Everything a controller is built from.
pub struct ControllerParts {
    pub config: Arc<InsightsConfig>,
    pub assembler: Arc<ReportAssembler>,
    /// Source of archives discovered after startup, for update reports.
    pub jars: Option<Arc<ClasspathJarsSubreport>>,
    pub client_factory: ClientFactory,
    pub scheduler: Arc<InsightsScheduler>,
    pub queue: Arc<WorkQueue>,
}

pub trait ControllerFactory: Send + Sync {
    fn create(&self, parts: ControllerParts) -> Result<Arc<dyn DeliveryController>>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ReportControllerFactory;

impl ControllerFactory for ReportControllerFactory {
    fn create(&self, parts: ControllerParts) -> Result<Arc<dyn DeliveryController>> {
        Ok(Arc::new(ReportController::new(parts)))
    }
}

pub struct ReportController {
    config: Arc<InsightsConfig>,
    assembler: Arc<ReportAssembler>,
    jars: Option<Arc<ClasspathJarsSubreport>>,
    client_factory: ClientFactory,
    scheduler: Arc<InsightsScheduler>,
    queue: Arc<WorkQueue>,
    started: AtomicBool,
    shut_down: AtomicBool,
}

impl ReportController {
    pub fn new(parts: ControllerParts) -> Self {
        Self {
            config: parts.config,
            assembler: parts.assembler,
            jars: parts.jars,
            client_factory: parts.client_factory,
            scheduler: parts.scheduler,
            queue: parts.queue,
            started: AtomicBool::new(false),
            shut_down: AtomicBool::new(false),
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    fn submit_connect(assembler: &ReportAssembler, queue: &WorkQueue) -> Result<()> {
        let body = assembler.serialize()?;
        queue.submit(Payload {
            kind: PayloadKind::Connect,
            id_hash: assembler.id_hash().to_string(),
            body,
        })
    }

    fn submit_update(
        assembler: &ReportAssembler,
        jars: &ClasspathJarsSubreport,
        queue: &WorkQueue,
    ) -> Result<()> {
        let fresh = jars.take_new_archives();
        if fresh.is_empty() {
            return Ok(());
        }
        debug!("Reporting {} newly discovered archives", fresh.len());
        queue.submit(Payload {
            kind: PayloadKind::Update,
            id_hash: assembler.id_hash().to_string(),
            body: assembler.serialize_update(&fresh)?,
        })
    }

    fn schedule_recurring(&self) -> Result<()> {
        let assembler = Arc::clone(&self.assembler);
        let queue = Arc::clone(&self.queue);
        self.scheduler.schedule_connect(Arc::new(move || {
            if let Err(e) = Self::submit_connect(&assembler, &queue) {
                warn!("Failed to generate connect report: {}", e);
            }
        }))?;

        if let Some(jars) = &self.jars {
            let assembler = Arc::clone(&self.assembler);
            let queue = Arc::clone(&self.queue);
            let jars = Arc::clone(jars);
            self.scheduler.schedule_update(Arc::new(move || {
                if let Err(e) = Self::submit_update(&assembler, &jars, &queue) {
                    warn!("Failed to generate update report: {}", e);
                }
            }))?;
        }
        Ok(())
    }
}

impl DeliveryController for ReportController {
    fn generate(&self) -> Result<()> {
        if self.config.opt_out {
            return Err(InsightsError::OptedOut);
        }
        if self.is_shutdown() {
            return Err(InsightsError::Delivery("controller is shut down".to_string()));
        }
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(InsightsError::InvalidTransition(
                "report generation already started".to_string(),
            ));
        }

        let client = (self.client_factory)()?;
        client.is_ready_to_send()?;
        let receiver = self
            .queue
            .take_receiver()
            .ok_or_else(|| InsightsError::Internal("work queue already consumed".to_string()))?;

        // First report is produced on the caller's thread
        Self::submit_connect(&self.assembler, &self.queue)?;

        self.scheduler
            .spawn(consume(receiver, client, self.scheduler.cancellation_token()))?;
        self.schedule_recurring()?;

        info!(
            "Insights reporting started (connect every {:?}, update every {:?})",
            self.config.connect_period, self.config.update_period
        );
        Ok(())
    }

    fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        self.scheduler.shutdown();
        info!("Insights reporting stopped");
    }
}

async fn consume(
    mut receiver: mpsc::Receiver<Payload>,
    client: Box<dyn DeliveryClient>,
    cancel_token: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => break,
            payload = receiver.recv() => {
                let Some(payload) = payload else { break };
                if let Err(e) = client.send(&payload).await {
                    warn!("Dropping {} report after delivery failure: {}", payload.kind, e);
                }
            }
        }
    }
    debug!("Delivery queue consumer stopped");
}
