mod common;

use common::{FakeHost, FakeServer, FakeService, write_jar};
use insights_api::{ApiError, ApiResult, DeliveryClient, Payload, PayloadKind};
use insights_core::archive::JarInspector;
use insights_core::delivery::{
    ClientFactory, ControllerParts, DeliveryController, InsightsScheduler, ReportController,
    WorkQueue,
};
use insights_core::report::{
    ClasspathJarsSubreport, ContainerStatusSubreport, ReportAssembler, SubreportRegistry,
};
use insights_core::topology::{TopologySubreport, TopologyWalker};
use insights_core::{InsightsConfig, InsightsError};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

struct ChannelClient {
    ready: bool,
    sender: mpsc::Sender<Payload>,
}

#[async_trait::async_trait]
impl DeliveryClient for ChannelClient {
    fn name(&self) -> &str {
        "channel"
    }

    fn is_ready_to_send(&self) -> ApiResult<()> {
        if self.ready {
            Ok(())
        } else {
            Err(ApiError::Unavailable("no upload credentials".to_string()))
        }
    }

    async fn send(&self, payload: &Payload) -> ApiResult<()> {
        self.sender
            .send(payload.clone())
            .map_err(|e| ApiError::Internal(e.to_string()))
    }
}

struct Harness {
    controller: ReportController,
    payloads: mpsc::Receiver<Payload>,
    _runtime: tokio::runtime::Runtime,
}

fn harness(config: InsightsConfig, classpath_dir: &Path, ready: bool) -> Harness {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = Arc::new(
        FakeServer::new(vec![
            FakeService::new("Catalina")
                .connector(Some("http-nio-8080"))
                .host(FakeHost::new("localhost")),
        ])
        .with_executor(runtime.handle().clone()),
    );

    let jars = Arc::new(ClasspathJarsSubreport::new(
        vec![classpath_dir.to_path_buf()],
        JarInspector::new(),
    ));
    let registry = SubreportRegistry::standard(
        jars.clone(),
        Arc::new(TopologySubreport::new(
            server,
            TopologyWalker::new(Arc::new(JarInspector::new())),
        )),
        Arc::new(ContainerStatusSubreport::new(None)),
    );
    let (sender, payloads) = mpsc::channel();
    let client_factory: ClientFactory = Arc::new(move || {
        Ok(Box::new(ChannelClient {
            ready,
            sender: sender.clone(),
        }) as Box<dyn DeliveryClient>)
    });

    let config = Arc::new(config);
    let controller = ReportController::new(ControllerParts {
        assembler: Arc::new(ReportAssembler::new(registry, &config)),
        jars: Some(jars),
        client_factory,
        scheduler: Arc::new(InsightsScheduler::from_config(
            runtime.handle().clone(),
            &config,
        )),
        queue: Arc::new(WorkQueue::new(config.queue_capacity)),
        config,
    });

    Harness {
        controller,
        payloads,
        _runtime: runtime,
    }
}

#[test]
fn test_generate_delivers_connect_report() {
    let dir = tempfile::tempdir().unwrap();
    write_jar(dir.path(), "first.jar", "1.0");
    let h = harness(InsightsConfig::default(), dir.path(), true);

    h.controller.generate().unwrap();

    let payload = h.payloads.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(payload.kind, PayloadKind::Connect);
    assert_eq!(payload.id_hash.len(), 16);
    let body: Value = serde_json::from_slice(&payload.body).unwrap();
    assert_eq!(body["jars"]["jars"][0]["name"], "first.jar");
    assert_eq!(body["topology"]["connectors"][0]["name"], "http-nio-8080");

    h.controller.shutdown();
}

#[test]
fn test_second_generate_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(InsightsConfig::default(), dir.path(), true);

    h.controller.generate().unwrap();
    let err = h.controller.generate().unwrap_err();

    assert!(matches!(err, InsightsError::InvalidTransition(_)));
    h.controller.shutdown();
}

#[test]
fn test_opted_out_controller_refuses_to_generate() {
    let dir = tempfile::tempdir().unwrap();
    let config = InsightsConfig {
        opt_out: true,
        ..InsightsConfig::default()
    };
    let h = harness(config, dir.path(), true);

    let err = h.controller.generate().unwrap_err();

    assert!(matches!(err, InsightsError::OptedOut));
    assert!(h.payloads.try_recv().is_err());
}

#[test]
fn test_unready_client_fails_generation() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(InsightsConfig::default(), dir.path(), false);

    let err = h.controller.generate().unwrap_err();

    assert!(matches!(err, InsightsError::Api(ApiError::Unavailable(_))));
    assert!(
        h.payloads
            .recv_timeout(Duration::from_millis(100))
            .is_err()
    );
}

#[test]
fn test_shutdown_is_idempotent_and_final() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(InsightsConfig::default(), dir.path(), true);

    h.controller.shutdown();
    h.controller.shutdown();

    assert!(h.controller.is_shutdown());
    assert!(matches!(
        h.controller.generate(),
        Err(InsightsError::Delivery(_))
    ));
}

#[test]
fn test_new_archives_are_sent_as_update() {
    let dir = tempfile::tempdir().unwrap();
    write_jar(dir.path(), "base.jar", "1.0");
    let config = InsightsConfig {
        update_period: Duration::from_millis(50),
        ..InsightsConfig::default()
    };
    let h = harness(config, dir.path(), true);

    h.controller.generate().unwrap();
    let connect = h.payloads.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(connect.kind, PayloadKind::Connect);

    write_jar(dir.path(), "plugin.jar", "2.0");
    let update = h.payloads.recv_timeout(Duration::from_secs(5)).unwrap();
    h.controller.shutdown();

    assert_eq!(update.kind, PayloadKind::Update);
    let body: Value = serde_json::from_slice(&update.body).unwrap();
    let names: Vec<_> = body["jars"]["jars"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["plugin.jar"]);
}
