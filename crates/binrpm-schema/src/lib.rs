//! Package descriptor schema for binrpm.
//!
//! This crate defines the typed representation of the declarative package
//! descriptor (`rpm.json`), loads it from disk, and normalizes it: defaults
//! are filled in, caller-supplied architecture/version overrides are applied,
//! and the invariants required by the spec renderer and build pipeline are
//! validated.

pub mod descriptor;
pub mod normalize;
pub mod types;

pub use descriptor::{
    parse_descriptor_str, ChangelogEntry, DescriptorError, FileMapping, PackageDescriptor,
    ScriptSet,
};
pub use types::{FileKind, Hook};
