use crate::BuildError;
use std::path::{Path, PathBuf};

/// External packaging capability.
///
/// The build pipeline is correct only relative to the installed behavior of
/// an external tool, so that tool sits behind this trait: `rpmbuild` is the
/// real implementation, and tests inject [`MockBuilder`](crate::MockBuilder)
/// to exercise the pipeline without it.
pub trait Builder: Send + Sync {
    fn name(&self) -> &str;

    fn available(&self) -> bool;

    /// Run the packaging step against an initialized, staged build area and
    /// return the path of the produced artifact inside it.
    fn build(&self, spec_path: &Path, build_root: &Path, arch: &str)
        -> Result<PathBuf, BuildError>;
}

pub fn select_builder(name: &str) -> Result<Box<dyn Builder>, BuildError> {
    match name {
        "rpmbuild" => Ok(Box::new(crate::rpmbuild::RpmbuildBuilder::new())),
        "mock" => Ok(Box::new(crate::mock::MockBuilder::new())),
        other => Err(BuildError::UnknownBuilder(other.to_owned())),
    }
}
