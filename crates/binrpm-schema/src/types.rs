//! Shared enums used across the descriptor, renderer, and build pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a file mapping, controlling the `%files` annotation and how the
/// entry is staged into the build area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// A regular file copied from the build host.
    #[default]
    File,
    /// A declared-empty directory created at install time.
    Dir,
    /// A configuration file preserved across upgrades.
    Config,
    /// A documentation file.
    Doc,
}

impl FileKind {
    /// The `%files` list marker for this kind, or `None` for a plain file.
    pub fn marker(self) -> Option<&'static str> {
        match self {
            Self::File => None,
            Self::Dir => Some("%dir"),
            Self::Config => Some("%config(noreplace)"),
            Self::Doc => Some("%doc"),
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::File => "file",
            Self::Dir => "dir",
            Self::Config => "config",
            Self::Doc => "doc",
        };
        f.write_str(s)
    }
}

/// Lifecycle hook slots understood by the package manager.
///
/// The order of [`Hook::ALL`] is the order the corresponding scriptlet
/// sections appear in the rendered spec file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Hook {
    PreInstall,
    PostInstall,
    PreUninstall,
    PostUninstall,
}

impl Hook {
    pub const ALL: [Hook; 4] = [
        Hook::PreInstall,
        Hook::PostInstall,
        Hook::PreUninstall,
        Hook::PostUninstall,
    ];

    /// The spec-file section name, without the leading `%`.
    pub fn section(self) -> &'static str {
        match self {
            Self::PreInstall => "pre",
            Self::PostInstall => "post",
            Self::PreUninstall => "preun",
            Self::PostUninstall => "postun",
        }
    }

    /// The descriptor key for this hook.
    pub fn key(self) -> &'static str {
        match self {
            Self::PreInstall => "pre-install",
            Self::PostInstall => "post-install",
            Self::PreUninstall => "pre-uninstall",
            Self::PostUninstall => "post-uninstall",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
