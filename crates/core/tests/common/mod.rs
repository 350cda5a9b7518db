//! In-memory server topology for exercising the walker and the listener.

use insights_api::{
    ConnectorView, ContextView, HostView, ServerView, ServiceView, StatusEndpoint,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Handle;
use zip::write::SimpleFileOptions;

pub struct FakeServer {
    pub services: Vec<Arc<FakeService>>,
    pub executor: Option<Handle>,
    pub status: Option<Arc<dyn StatusEndpoint>>,
}

#[allow(dead_code)]
impl FakeServer {
    pub fn new(services: Vec<FakeService>) -> Self {
        Self {
            services: services.into_iter().map(Arc::new).collect(),
            executor: None,
            status: None,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_executor(mut self, executor: Handle) -> Self {
        self.executor = Some(executor);
        self
    }
}

impl ServerView for FakeServer {
    fn services(&self) -> Vec<Arc<dyn ServiceView>> {
        self.services
            .iter()
            .map(|s| Arc::clone(s) as Arc<dyn ServiceView>)
            .collect()
    }

    fn utility_executor(&self) -> Handle {
        self.executor
            .clone()
            .expect("test server was built without an executor")
    }

    fn status_endpoint(&self) -> Option<Arc<dyn StatusEndpoint>> {
        self.status.clone()
    }
}

pub struct FakeService {
    pub name: String,
    pub connectors: Vec<Arc<FakeConnector>>,
    pub hosts: Vec<Arc<FakeHost>>,
}

#[allow(dead_code)]
impl FakeService {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            connectors: Vec::new(),
            hosts: Vec::new(),
        }
    }

    pub fn connector(mut self, name: Option<&str>) -> Self {
        self.connectors
            .push(Arc::new(FakeConnector(name.map(str::to_string))));
        self
    }

    pub fn host(mut self, host: FakeHost) -> Self {
        self.hosts.push(Arc::new(host));
        self
    }
}

impl ServiceView for FakeService {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn connectors(&self) -> Vec<Arc<dyn ConnectorView>> {
        self.connectors
            .iter()
            .map(|c| Arc::clone(c) as Arc<dyn ConnectorView>)
            .collect()
    }

    fn hosts(&self) -> Vec<Arc<dyn HostView>> {
        self.hosts
            .iter()
            .map(|h| Arc::clone(h) as Arc<dyn HostView>)
            .collect()
    }
}

pub struct FakeConnector(pub Option<String>);

impl ConnectorView for FakeConnector {
    fn display_name(&self) -> Option<String> {
        self.0.clone()
    }
}

pub struct FakeHost {
    pub name: String,
    pub contexts: Vec<Arc<FakeContext>>,
}

#[allow(dead_code)]
impl FakeHost {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            contexts: Vec::new(),
        }
    }

    pub fn context(mut self, name: &str, search_path: Vec<String>) -> Self {
        self.contexts.push(Arc::new(FakeContext {
            name: name.to_string(),
            search_path,
        }));
        self
    }
}

impl HostView for FakeHost {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn contexts(&self) -> Vec<Arc<dyn ContextView>> {
        self.contexts
            .iter()
            .map(|c| Arc::clone(c) as Arc<dyn ContextView>)
            .collect()
    }
}

pub struct FakeContext {
    pub name: String,
    pub search_path: Vec<String>,
}

impl ContextView for FakeContext {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn search_path(&self) -> Vec<String> {
        self.search_path.clone()
    }
}

/// Writes a jar with a manifest carrying `Implementation-Version`.
#[allow(dead_code)]
pub fn write_jar(dir: &Path, name: &str, version: &str) -> PathBuf {
    let path = dir.join(name);
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    writer.start_file("META-INF/MANIFEST.MF", options).unwrap();
    writeln!(writer, "Manifest-Version: 1.0").unwrap();
    writeln!(writer, "Implementation-Title: {name}").unwrap();
    writeln!(writer, "Implementation-Version: {version}").unwrap();
    writer.start_file("org/demo/Demo.class", options).unwrap();
    writer.write_all(&[0xCA, 0xFE, 0xBA, 0xBE]).unwrap();
    writer.finish().unwrap();
    path
}

#[allow(dead_code)]
pub fn file_url(path: &Path) -> String {
    url::Url::from_file_path(path).unwrap().to_string()
}
