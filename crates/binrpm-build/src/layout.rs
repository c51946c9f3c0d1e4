use crate::BuildError;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory layout of the rpmbuild `_topdir` skeleton.
///
/// Path accessors are pure; [`initialize`](Self::initialize) creates the
/// skeleton on disk. The build area is caller-owned: nothing here deletes or
/// rolls back, so a failed build can be inspected in place.
#[derive(Debug, Clone)]
pub struct BuildLayout {
    root: PathBuf,
}

impl BuildLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Staged payload tree; `%install` runs with this as its working
    /// directory.
    #[inline]
    pub fn build_dir(&self) -> PathBuf {
        self.root.join("BUILD")
    }

    /// Install root rpmbuild populates during `%install`.
    #[inline]
    pub fn buildroot_dir(&self) -> PathBuf {
        self.root.join("BUILDROOT")
    }

    /// Output artifacts, architecture-qualified below this.
    #[inline]
    pub fn rpms_dir(&self) -> PathBuf {
        self.root.join("RPMS")
    }

    #[inline]
    pub fn arch_rpms_dir(&self, arch: &str) -> PathBuf {
        self.rpms_dir().join(arch)
    }

    #[inline]
    pub fn sources_dir(&self) -> PathBuf {
        self.root.join("SOURCES")
    }

    #[inline]
    pub fn specs_dir(&self) -> PathBuf {
        self.root.join("SPECS")
    }

    #[inline]
    pub fn spec_path(&self, name: &str) -> PathBuf {
        self.specs_dir().join(format!("{name}.spec"))
    }

    /// Where a destination path is staged inside the payload tree.
    pub fn staging_path(&self, dest: &str) -> PathBuf {
        self.build_dir().join(dest.trim_start_matches('/'))
    }

    /// Create the skeleton. Idempotent: pre-existing directories are fine,
    /// but a regular file squatting on a skeleton path is an error.
    pub fn initialize(&self) -> Result<(), BuildError> {
        for dir in [
            self.build_dir(),
            self.buildroot_dir(),
            self.rpms_dir(),
            self.sources_dir(),
            self.specs_dir(),
        ] {
            if dir.exists() && !dir.is_dir() {
                return Err(BuildError::PathCollision(dir));
            }
            fs::create_dir_all(&dir)?;
        }
        Ok(())
    }
}
