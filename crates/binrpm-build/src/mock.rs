use crate::builder::Builder;
use crate::BuildError;
use std::fs;
use std::path::{Path, PathBuf};

/// Test double for the external packaging tool.
///
/// Reads the identity tags back out of the spec file it is handed and writes
/// a dummy artifact at the architecture-qualified path a real build would
/// produce, so the pipeline's delivery step is exercised end to end.
#[derive(Debug, Default)]
pub struct MockBuilder;

impl MockBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl Builder for MockBuilder {
    fn name(&self) -> &str {
        "mock"
    }

    fn available(&self) -> bool {
        true
    }

    fn build(
        &self,
        spec_path: &Path,
        build_root: &Path,
        arch: &str,
    ) -> Result<PathBuf, BuildError> {
        let spec = fs::read_to_string(spec_path)?;
        let name = tag_value(&spec, "Name").ok_or_else(|| missing_tag("Name"))?;
        let version = tag_value(&spec, "Version").ok_or_else(|| missing_tag("Version"))?;
        let release = tag_value(&spec, "Release").ok_or_else(|| missing_tag("Release"))?;

        let arch_dir = build_root.join("RPMS").join(arch);
        fs::create_dir_all(&arch_dir)?;
        let artifact = arch_dir.join(format!("{name}-{version}-{release}.{arch}.rpm"));
        fs::write(&artifact, b"binrpm mock artifact\n")?;
        Ok(artifact)
    }
}

fn tag_value<'s>(spec: &'s str, tag: &str) -> Option<&'s str> {
    let prefix = format!("{tag}: ");
    spec.lines().find_map(|line| line.strip_prefix(prefix.as_str()))
}

fn missing_tag(tag: &str) -> BuildError {
    BuildError::BuildFailed {
        status: "mock".to_owned(),
        tail: format!("spec file has no {tag} tag"),
    }
}
