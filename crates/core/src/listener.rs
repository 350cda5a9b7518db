//! Lifecycle listener driving report collection from host server events.
//!
//! State machine:
//! - `Unstarted` → `Running` on after-start: builds the report pipeline and
//!   produces the first report synchronously
//! - `Running` → `Stopped` on stop: shuts the delivery controller down
//! - periodic events are ignored in every state; scheduling belongs to the
//!   controller
//!
//! `Stopped` is terminal.

use crate::archive::JarInspector;
use crate::config::InsightsConfig;
use crate::delivery::{
    ClientFactory, ControllerFactory, ControllerParts, DeliveryController, FileWritingClient,
    InsightsScheduler, MultiClient, ReportControllerFactory, TransportFactory, WorkQueue,
};
use crate::error::{InsightsError, Result};
use crate::report::{
    ClasspathJarsSubreport, ContainerStatusSubreport, ReportAssembler, SubreportRegistry,
};
use crate::tls::PemSupport;
use crate::topology::{TopologySubreport, TopologyWalker};
use insights_api::{
    ArchiveInspector, DeliveryClient, LifecycleEvent, LifecycleEventKind, ServerView,
    TlsContextFactory,
};
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Unstarted,
    Running,
    Stopped,
}

enum ListenerState {
    Unstarted,
    /// `controller` is `None` when reporting is opted out or startup failed
    /// before a controller existed.
    Running {
        controller: Option<Arc<dyn DeliveryController>>,
    },
    Stopped,
}

pub struct InsightsLifecycleListener {
    config: Arc<InsightsConfig>,
    inspector: Arc<dyn ArchiveInspector>,
    controller_factory: Arc<dyn ControllerFactory>,
    transport: Option<Arc<dyn TransportFactory>>,
    state: Mutex<ListenerState>,
}

impl InsightsLifecycleListener {
    pub fn new(config: InsightsConfig) -> Self {
        Self {
            config: Arc::new(config),
            inspector: Arc::new(JarInspector::new()),
            controller_factory: Arc::new(ReportControllerFactory),
            transport: None,
            state: Mutex::new(ListenerState::Unstarted),
        }
    }

    /// Inspector used for context search paths.
    pub fn with_inspector(mut self, inspector: Arc<dyn ArchiveInspector>) -> Self {
        self.inspector = inspector;
        self
    }

    pub fn with_controller_factory(mut self, factory: Arc<dyn ControllerFactory>) -> Self {
        self.controller_factory = factory;
        self
    }

    /// Network transport tried before the local file fallback.
    pub fn with_transport(mut self, transport: Arc<dyn TransportFactory>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn state(&self) -> LifecycleState {
        match &*self.lock_state() {
            ListenerState::Unstarted => LifecycleState::Unstarted,
            ListenerState::Running { .. } => LifecycleState::Running,
            ListenerState::Stopped => LifecycleState::Stopped,
        }
    }

    pub fn has_controller(&self) -> bool {
        matches!(
            &*self.lock_state(),
            ListenerState::Running {
                controller: Some(_)
            }
        )
    }

    /// Entry point called by the host on its lifecycle thread.
    pub fn lifecycle_event(&self, event: &LifecycleEvent) -> Result<()> {
        match event.kind {
            LifecycleEventKind::AfterStart => self.on_after_start(event),
            LifecycleEventKind::Stop => {
                self.on_stop();
                Ok(())
            }
            LifecycleEventKind::Periodic => Ok(()),
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ListenerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn on_after_start(&self, event: &LifecycleEvent) -> Result<()> {
        let server = event.server().cloned().ok_or(InsightsError::NotAServer)?;

        let mut state = self.lock_state();
        match &*state {
            ListenerState::Unstarted => {}
            ListenerState::Running { .. } => {
                return Err(InsightsError::InvalidTransition(
                    "after-start received while already running".to_string(),
                ));
            }
            ListenerState::Stopped => {
                return Err(InsightsError::InvalidTransition(
                    "after-start received after stop".to_string(),
                ));
            }
        }

        if self.config.opt_out {
            info!("Insights reporting is opted out; not starting");
            *state = ListenerState::Running { controller: None };
            return Ok(());
        }

        let mut controller = None;
        let result = self.start(server, &mut controller);
        *state = ListenerState::Running { controller };
        result.map_err(InsightsError::init)
    }

    fn start(
        &self,
        server: Arc<dyn ServerView>,
        controller_slot: &mut Option<Arc<dyn DeliveryController>>,
    ) -> Result<()> {
        let tls = PemSupport::new(&self.config).into_factory();

        let jars = Arc::new(ClasspathJarsSubreport::new(
            self.config.classpath.clone(),
            JarInspector::new(),
        ));
        let topology = Arc::new(TopologySubreport::new(
            Arc::clone(&server),
            TopologyWalker::new(Arc::clone(&self.inspector)),
        ));
        let status = Arc::new(ContainerStatusSubreport::new(server.status_endpoint()));
        let registry = SubreportRegistry::standard(jars.clone(), topology, status);
        let assembler = Arc::new(ReportAssembler::new(registry, &self.config));

        let scheduler = Arc::new(InsightsScheduler::from_config(
            server.utility_executor(),
            &self.config,
        ));
        let queue = Arc::new(WorkQueue::new(self.config.queue_capacity));

        let controller = self.controller_factory.create(ControllerParts {
            config: Arc::clone(&self.config),
            assembler,
            jars: Some(jars),
            client_factory: self.client_factory(tls),
            scheduler,
            queue,
        })?;
        *controller_slot = Some(Arc::clone(&controller));

        controller.generate()?;
        info!("Insights listener started for {}", self.config.identification_name);
        Ok(())
    }

    fn client_factory(&self, tls: TlsContextFactory) -> ClientFactory {
        let config = Arc::clone(&self.config);
        let transport = self.transport.clone();
        Arc::new(move || {
            let mut clients: Vec<Box<dyn DeliveryClient>> = Vec::with_capacity(2);
            if let Some(transport) = &transport {
                clients.push(transport.create(&config, Arc::clone(&tls))?);
            }
            clients.push(Box::new(FileWritingClient::from_config(&config)));
            Ok(Box::new(MultiClient::new(clients)) as Box<dyn DeliveryClient>)
        })
    }

    fn on_stop(&self) {
        let previous = std::mem::replace(&mut *self.lock_state(), ListenerState::Stopped);
        match previous {
            ListenerState::Running {
                controller: Some(controller),
            } => {
                // Shutdown faults stay inside the listener
                let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| controller.shutdown()));
                if outcome.is_err() {
                    warn!("Insights controller panicked during shutdown");
                }
            }
            _ => debug!("Stop received with no running controller"),
        }
    }
}
