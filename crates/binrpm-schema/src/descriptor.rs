use crate::types::{FileKind, Hook};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("descriptor file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read descriptor file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse descriptor: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("package name must not be empty")]
    MissingName,
    #[error("at least one file mapping is required")]
    NoFiles,
    #[error("destination must be an absolute path: '{0}'")]
    RelativeDestination(String),
    #[error("file mapping for '{dest}' has an empty source path")]
    EmptySource { dest: String },
}

/// The declarative package manifest, one per build.
///
/// Parsed from the descriptor file verbatim; all defaulting and validation
/// happens in [`normalize`](PackageDescriptor::normalize), so a descriptor
/// straight from [`load`](PackageDescriptor::load) may still be incomplete.
/// After normalization it is treated as immutable by the renderer and the
/// build pipeline.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PackageDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default = "default_release")]
    pub release: String,
    #[serde(default)]
    pub arch: String,

    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub url: Option<String>,

    // Dependency lists keep descriptor order and duplicates; emitted order is
    // a visible contract of the rendered spec.
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(default, rename = "buildRequires")]
    pub build_requires: Vec<String>,
    #[serde(default)]
    pub provides: Vec<String>,
    #[serde(default)]
    pub conflicts: Vec<String>,
    #[serde(default)]
    pub obsoletes: Vec<String>,

    #[serde(default)]
    pub files: Vec<FileMapping>,
    #[serde(default)]
    pub scripts: ScriptSet,
    #[serde(default)]
    pub changelog: Vec<ChangelogEntry>,
}

/// One installed path: a source on the build host and an absolute
/// install-time destination.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileMapping {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub dest: String,
    #[serde(default, rename = "type")]
    pub kind: FileKind,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
}

/// Lifecycle script bodies. Hooks left unset produce no scriptlet section in
/// the rendered spec; an empty section means something different to rpm
/// than a missing one.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ScriptSet {
    #[serde(default, rename = "pre-install")]
    pub pre_install: Option<String>,
    #[serde(default, rename = "post-install")]
    pub post_install: Option<String>,
    #[serde(default, rename = "pre-uninstall")]
    pub pre_uninstall: Option<String>,
    #[serde(default, rename = "post-uninstall")]
    pub post_uninstall: Option<String>,
}

impl ScriptSet {
    pub fn get(&self, hook: Hook) -> Option<&str> {
        let body = match hook {
            Hook::PreInstall => &self.pre_install,
            Hook::PostInstall => &self.post_install,
            Hook::PreUninstall => &self.pre_uninstall,
            Hook::PostUninstall => &self.post_uninstall,
        };
        body.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        Hook::ALL.iter().all(|h| self.get(*h).is_none())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ChangelogEntry {
    pub date: String,
    pub author: String,
    pub version: String,
    #[serde(default)]
    pub notes: Vec<String>,
}

fn default_release() -> String {
    "1".to_owned()
}

pub fn parse_descriptor_str(input: &str) -> Result<PackageDescriptor, DescriptorError> {
    Ok(serde_json::from_str(input)?)
}

impl PackageDescriptor {
    /// Load a descriptor from a JSON file.
    ///
    /// Returns [`DescriptorError::NotFound`] when the path does not exist and
    /// [`DescriptorError::Malformed`] when the content does not parse into
    /// the descriptor shape. Never returns a partially-populated descriptor.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DescriptorError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DescriptorError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        parse_descriptor_str(&content)
    }
}
