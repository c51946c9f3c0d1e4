//! Spec-file rendering for binrpm.
//!
//! [`render`] turns a normalized [`PackageDescriptor`] into the exact text
//! rpmbuild consumes. It is pure and deterministic: no I/O, and identical
//! input yields byte-identical output. Section order follows the fixed
//! grammar rpmbuild expects; optional sections are omitted entirely rather
//! than emitted empty.
//!
//! [`PackageDescriptor`]: binrpm_schema::PackageDescriptor

pub mod render;

pub use render::{render, RenderError};
