use crate::builder::Builder;
use crate::layout::BuildLayout;
use crate::BuildError;
use binrpm_schema::PackageDescriptor;
use std::fmt;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// Phases of one build invocation.
///
/// The pipeline is strictly sequential; any step's failure moves to the
/// terminal `Failed` state and the build area is left on disk as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Loaded,
    Normalized,
    SpecWritten,
    Staged,
    Built,
    Delivered,
    Failed,
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Loaded => "loaded",
            Self::Normalized => "normalized",
            Self::SpecWritten => "spec-written",
            Self::Staged => "staged",
            Self::Built => "built",
            Self::Delivered => "delivered",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

pub fn validate_transition(from: BuildState, to: BuildState) -> Result<(), BuildError> {
    let valid = matches!(
        (from, to),
        (BuildState::Loaded, BuildState::Normalized)
            | (BuildState::Normalized, BuildState::SpecWritten)
            | (BuildState::SpecWritten, BuildState::Staged)
            | (BuildState::Staged, BuildState::Built)
            | (BuildState::Built, BuildState::Delivered)
    ) || (from != BuildState::Failed && to == BuildState::Failed);

    if valid {
        Ok(())
    } else {
        Err(BuildError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

/// Orchestrates one build: skeleton, spec file, staging, external build,
/// delivery. Owns a normalized descriptor for the duration and never
/// mutates it.
pub struct Pipeline<'a> {
    descriptor: &'a PackageDescriptor,
    layout: BuildLayout,
    builder: Box<dyn Builder>,
    state: BuildState,
}

impl<'a> Pipeline<'a> {
    /// The descriptor must already be normalized; the pipeline starts in
    /// `Normalized` and only moves forward.
    pub fn new(
        descriptor: &'a PackageDescriptor,
        build_area: impl Into<PathBuf>,
        builder: Box<dyn Builder>,
    ) -> Self {
        Self {
            descriptor,
            layout: BuildLayout::new(build_area),
            builder,
            state: BuildState::Normalized,
        }
    }

    #[inline]
    pub fn state(&self) -> BuildState {
        self.state
    }

    #[inline]
    pub fn layout(&self) -> &BuildLayout {
        &self.layout
    }

    /// Run all remaining steps and return the delivered artifact path.
    pub fn run(&mut self, output_dir: &Path) -> Result<PathBuf, BuildError> {
        self.initialize_build_area()?;
        self.write_spec_file()?;
        self.stage_files()?;
        self.run_build(output_dir)
    }

    /// Create the build-area skeleton. Does not advance the state machine:
    /// the skeleton is a precondition of `SpecWritten`, not a phase.
    pub fn initialize_build_area(&mut self) -> Result<(), BuildError> {
        match self.layout.initialize() {
            Ok(()) => Ok(()),
            Err(e) => self.fail(e),
        }
    }

    /// Render the spec and write it atomically into `SPECS/<name>.spec`.
    pub fn write_spec_file(&mut self) -> Result<PathBuf, BuildError> {
        validate_transition(self.state, BuildState::SpecWritten)?;
        match self.try_write_spec() {
            Ok(path) => {
                self.state = BuildState::SpecWritten;
                Ok(path)
            }
            Err(e) => self.fail(e),
        }
    }

    /// Copy the descriptor's file mappings into the payload tree.
    pub fn stage_files(&mut self) -> Result<(), BuildError> {
        validate_transition(self.state, BuildState::Staged)?;
        match crate::stage::stage_files(&self.layout, self.descriptor) {
            Ok(()) => {
                self.state = BuildState::Staged;
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    /// Invoke the builder, then relocate the artifact into `output_dir`,
    /// creating it if absent.
    pub fn run_build(&mut self, output_dir: &Path) -> Result<PathBuf, BuildError> {
        validate_transition(self.state, BuildState::Built)?;
        let spec_path = self.layout.spec_path(&self.descriptor.name);
        info!(
            "building {} {} with {}",
            self.descriptor.name,
            self.descriptor.version,
            self.builder.name()
        );
        let artifact =
            match self
                .builder
                .build(&spec_path, self.layout.root(), &self.descriptor.arch)
            {
                Ok(artifact) => {
                    self.state = BuildState::Built;
                    artifact
                }
                Err(e) => return self.fail(e),
            };

        validate_transition(self.state, BuildState::Delivered)?;
        match deliver(&artifact, output_dir) {
            Ok(delivered) => {
                self.state = BuildState::Delivered;
                Ok(delivered)
            }
            Err(e) => self.fail(e),
        }
    }

    fn try_write_spec(&self) -> Result<PathBuf, BuildError> {
        let text = binrpm_spec::render(self.descriptor)?;
        let path = self.layout.spec_path(&self.descriptor.name);
        let mut tmp = NamedTempFile::new_in(self.layout.specs_dir())?;
        tmp.write_all(text.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| BuildError::Io(e.error))?;
        info!("wrote spec file {}", path.display());
        Ok(path)
    }

    fn fail<T>(&mut self, error: BuildError) -> Result<T, BuildError> {
        self.state = BuildState::Failed;
        Err(error)
    }
}

fn deliver(artifact: &Path, output_dir: &Path) -> Result<PathBuf, BuildError> {
    fs::create_dir_all(output_dir)?;
    let file_name = artifact
        .file_name()
        .ok_or_else(|| BuildError::ArtifactMissing(artifact.to_path_buf()))?;
    let target = output_dir.join(file_name);
    if fs::rename(artifact, &target).is_err() {
        // Output may be on another filesystem; fall back to copy + remove.
        fs::copy(artifact, &target)?;
        fs::remove_file(artifact)?;
    }
    info!("delivered {}", target.display());
    Ok(target)
}
