use crate::descriptor::{DescriptorError, PackageDescriptor};
use crate::types::FileKind;
use std::path::Path;

/// Version used when neither the descriptor nor the caller supplies one.
pub const DEFAULT_VERSION: &str = "0.0.0";

/// Release used when the descriptor leaves the field blank.
pub const DEFAULT_RELEASE: &str = "1";

impl PackageDescriptor {
    /// Fill defaults, apply caller overrides, and validate the descriptor.
    ///
    /// Mutates the descriptor in place; this is the single mutation in its
    /// lifecycle. A non-empty override always wins over the file value
    /// (caller intent beats file content); an empty file value falls back to
    /// the invoking environment's native architecture, or to
    /// [`DEFAULT_VERSION`] for the version.
    ///
    /// Validation is purely local: source paths are checked for shape only,
    /// their existence is verified later at staging time.
    pub fn normalize(
        &mut self,
        arch_override: Option<&str>,
        version_override: Option<&str>,
    ) -> Result<(), DescriptorError> {
        if let Some(arch) = non_empty(arch_override) {
            self.arch = arch.to_owned();
        }
        if self.arch.trim().is_empty() {
            self.arch = std::env::consts::ARCH.to_owned();
        }

        if let Some(version) = non_empty(version_override) {
            self.version = version.to_owned();
        }
        if self.version.trim().is_empty() {
            self.version = DEFAULT_VERSION.to_owned();
        }

        if self.release.trim().is_empty() {
            self.release = DEFAULT_RELEASE.to_owned();
        }

        self.validate()
    }

    fn validate(&self) -> Result<(), DescriptorError> {
        if self.name.trim().is_empty() {
            return Err(DescriptorError::MissingName);
        }
        if self.files.is_empty() {
            return Err(DescriptorError::NoFiles);
        }
        for mapping in &self.files {
            if !Path::new(&mapping.dest).is_absolute() {
                return Err(DescriptorError::RelativeDestination(mapping.dest.clone()));
            }
            if mapping.kind != FileKind::Dir && mapping.source.trim().is_empty() {
                return Err(DescriptorError::EmptySource {
                    dest: mapping.dest.clone(),
                });
            }
        }
        Ok(())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
