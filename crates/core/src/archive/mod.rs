//! Dependency archive identification.
//!
//! `JarInspector` is the default `ArchiveInspector`: it resolves `file:`
//! locations, reads the archive's manifest for name/version metadata and
//! fingerprints its bytes.

pub mod inspector;
pub mod manifest;

pub use inspector::JarInspector;
