//! Build-area orchestration for binrpm.
//!
//! This crate owns everything between a normalized descriptor and a delivered
//! artifact: the rpmbuild `_topdir` skeleton ([`BuildLayout`]), staging of
//! descriptor file mappings into the payload tree, the pluggable [`Builder`]
//! trait with the real `rpmbuild` backend and a mock for tests, prerequisite
//! checking, and the fail-fast [`Pipeline`] state machine that sequences one
//! build invocation.

pub mod builder;
pub mod layout;
pub mod mock;
pub mod pipeline;
pub mod prereq;
pub mod rpmbuild;
pub mod stage;

pub use builder::{select_builder, Builder};
pub use layout::BuildLayout;
pub use mock::MockBuilder;
pub use pipeline::{validate_transition, BuildState, Pipeline};
pub use prereq::{check_build_prereqs, format_missing, MissingPrereq};
pub use rpmbuild::RpmbuildBuilder;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("descriptor error: {0}")]
    Descriptor(#[from] binrpm_schema::DescriptorError),
    #[error("spec render error: {0}")]
    Render(#[from] binrpm_spec::RenderError),
    #[error("build area I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("build area path exists and is not a directory: {0}")]
    PathCollision(PathBuf),
    #[error("staging source missing or not a regular file: {0}")]
    StageSourceMissing(PathBuf),
    #[error("invalid file mode '{mode}' for '{dest}', expected octal digits")]
    InvalidMode { mode: String, dest: String },
    #[error("unknown builder '{0}'")]
    UnknownBuilder(String),
    #[error("external build failed ({status}), output tail:\n{tail}")]
    BuildFailed { status: String, tail: String },
    #[error("expected artifact not found after build: {0}")]
    ArtifactMissing(PathBuf),
    #[error("invalid build state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}
