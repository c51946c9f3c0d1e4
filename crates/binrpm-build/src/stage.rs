use crate::layout::BuildLayout;
use crate::BuildError;
use binrpm_schema::{FileKind, PackageDescriptor};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Copy every file mapping into the payload tree under `BUILD/`.
///
/// Source existence is checked here, not during normalization. Staging is
/// not transactional: on failure, files already copied stay in the build
/// area for postmortem inspection.
pub fn stage_files(layout: &BuildLayout, desc: &PackageDescriptor) -> Result<(), BuildError> {
    for mapping in &desc.files {
        let staged = layout.staging_path(&mapping.dest);
        if mapping.kind == FileKind::Dir {
            fs::create_dir_all(&staged)?;
            debug!("staged directory {}", staged.display());
            continue;
        }

        let source = Path::new(&mapping.source);
        if !source.is_file() {
            return Err(BuildError::StageSourceMissing(source.to_path_buf()));
        }
        if let Some(parent) = staged.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, &staged)?;
        if let Some(mode) = mapping.mode.as_deref() {
            apply_mode(&staged, mode, &mapping.dest)?;
        }
        debug!("staged {} -> {}", mapping.source, staged.display());
    }
    Ok(())
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: &str, dest: &str) -> Result<(), BuildError> {
    use std::os::unix::fs::PermissionsExt;

    let bits = u32::from_str_radix(mode, 8).map_err(|_| BuildError::InvalidMode {
        mode: mode.to_owned(),
        dest: dest.to_owned(),
    })?;
    fs::set_permissions(path, fs::Permissions::from_mode(bits))?;
    Ok(())
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: &str, _dest: &str) -> Result<(), BuildError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use binrpm_schema::parse_descriptor_str;

    fn staged_descriptor(source: &Path) -> PackageDescriptor {
        let mut desc = parse_descriptor_str(&format!(
            r#"{{
  "name": "demo",
  "files": [
    {{"source": "{}", "dest": "/usr/bin/demo", "mode": "0755"}},
    {{"source": "", "dest": "/var/lib/demo", "type": "dir"}}
  ]
}}"#,
            source.display()
        ))
        .unwrap();
        desc.normalize(Some("x86_64"), Some("1.0")).unwrap();
        desc
    }

    #[test]
    fn stages_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("demo-bin");
        fs::write(&source, b"#!/bin/sh\nexit 0\n").unwrap();

        let layout = BuildLayout::new(dir.path().join("area"));
        layout.initialize().unwrap();
        let desc = staged_descriptor(&source);

        stage_files(&layout, &desc).unwrap();

        let staged = layout.staging_path("/usr/bin/demo");
        assert!(staged.is_file());
        assert!(layout.staging_path("/var/lib/demo").is_dir());
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&staged).unwrap().permissions().mode();
            assert_eq!(mode & 0o7777, 0o755);
        }
    }

    #[test]
    fn missing_source_fails_staging() {
        let dir = tempfile::tempdir().unwrap();
        let layout = BuildLayout::new(dir.path().join("area"));
        layout.initialize().unwrap();
        let desc = staged_descriptor(&dir.path().join("nope"));

        let err = stage_files(&layout, &desc).unwrap_err();
        assert!(matches!(err, BuildError::StageSourceMissing(_)));
    }

    #[test]
    fn bad_mode_string_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("demo-bin");
        fs::write(&source, b"x").unwrap();

        let layout = BuildLayout::new(dir.path().join("area"));
        layout.initialize().unwrap();
        let mut desc = staged_descriptor(&source);
        desc.files[0].mode = Some("rwxr-xr-x".to_owned());

        let err = stage_files(&layout, &desc).unwrap_err();
        assert!(matches!(err, BuildError::InvalidMode { .. }));
    }

    #[test]
    fn partial_staging_state_is_left_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good");
        fs::write(&good, b"x").unwrap();

        let mut desc = parse_descriptor_str(&format!(
            r#"{{
  "name": "demo",
  "files": [
    {{"source": "{}", "dest": "/usr/bin/good"}},
    {{"source": "{}", "dest": "/usr/bin/bad"}}
  ]
}}"#,
            good.display(),
            dir.path().join("missing").display()
        ))
        .unwrap();
        desc.normalize(Some("x86_64"), Some("1.0")).unwrap();

        let layout = BuildLayout::new(dir.path().join("area"));
        layout.initialize().unwrap();

        assert!(stage_files(&layout, &desc).is_err());
        assert!(layout.staging_path("/usr/bin/good").is_file());
    }
}
