//! Report assembly: section registry, built-in sections and the assembler.

pub mod assembler;
pub mod basic;
pub mod jars;
pub mod registry;
pub mod status;

pub use assembler::{InsightsReport, REPORT_VERSION, ReportAssembler};
pub use basic::EnvironmentBlock;
pub use jars::ClasspathJarsSubreport;
pub use registry::{CONTAINER_SECTION, JARS_SECTION, SubreportRegistry, TOPOLOGY_SECTION};
pub use status::ContainerStatusSubreport;
