use crate::builder::Builder;
use crate::BuildError;
use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::SystemTime;
use tracing::{debug, info};

/// Lines of subprocess output retained per stream for error reporting.
const TAIL_LINES: usize = 100;

/// The real packaging backend: drives `rpmbuild -bb` as a subprocess.
pub struct RpmbuildBuilder {
    program: String,
}

impl Default for RpmbuildBuilder {
    fn default() -> Self {
        Self {
            program: "rpmbuild".to_owned(),
        }
    }
}

impl RpmbuildBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Builder for RpmbuildBuilder {
    fn name(&self) -> &str {
        "rpmbuild"
    }

    fn available(&self) -> bool {
        crate::prereq::command_exists(&self.program)
    }

    fn build(
        &self,
        spec_path: &Path,
        build_root: &Path,
        arch: &str,
    ) -> Result<PathBuf, BuildError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-bb")
            .arg("--define")
            .arg(format!("_topdir {}", build_root.display()))
            // The payload is prebuilt; debuginfo extraction and the install
            // post-processing would fail on binaries we did not compile here.
            .arg("--define")
            .arg("debug_package %{nil}")
            .arg("--define")
            .arg("__os_install_post %{nil}")
            .arg("--target")
            .arg(arch)
            .arg(spec_path);

        info!("running {cmd:?}");
        let streamed = run_streaming(cmd)?;
        if !streamed.status.success() {
            return Err(BuildError::BuildFailed {
                status: streamed.status.to_string(),
                tail: streamed.tail.join("\n"),
            });
        }

        newest_rpm(&build_root.join("RPMS").join(arch))
    }
}

/// Pick the most recently modified `.rpm` under the architecture-qualified
/// output directory. rpmbuild names the artifact itself, so the orchestrator
/// discovers it rather than predicting it.
fn newest_rpm(arch_dir: &Path) -> Result<PathBuf, BuildError> {
    let entries = match std::fs::read_dir(arch_dir) {
        Ok(entries) => entries,
        Err(_) => return Err(BuildError::ArtifactMissing(arch_dir.to_path_buf())),
    };
    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().is_some_and(|e| e == "rpm") {
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            if newest.as_ref().is_none_or(|(t, _)| modified >= *t) {
                newest = Some((modified, path));
            }
        }
    }
    match newest {
        Some((_, path)) => {
            debug!("found artifact {}", path.display());
            Ok(path)
        }
        None => Err(BuildError::ArtifactMissing(arch_dir.to_path_buf())),
    }
}

pub(crate) struct Streamed {
    pub status: std::process::ExitStatus,
    pub tail: Vec<String>,
}

/// Run a command, mirroring its stdout and stderr to the console as they
/// arrive and keeping a bounded tail of each stream.
///
/// The two streams are drained by independent threads: a sequential read
/// would let a full pipe buffer on one stream stall the subprocess while we
/// block on the other. Both readers are joined before the exit status is
/// declared so trailing diagnostics are never lost.
pub(crate) fn run_streaming(mut cmd: Command) -> io::Result<Streamed> {
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    let mut child = cmd.spawn()?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("subprocess stdout was not captured"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("subprocess stderr was not captured"))?;

    let out_reader = thread::spawn(move || drain_lines(stdout, false));
    let err_reader = thread::spawn(move || drain_lines(stderr, true));

    let mut tail = out_reader
        .join()
        .map_err(|_| io::Error::other("stdout reader panicked"))?;
    tail.extend(
        err_reader
            .join()
            .map_err(|_| io::Error::other("stderr reader panicked"))?,
    );
    let status = child.wait()?;

    Ok(Streamed { status, tail })
}

fn drain_lines(stream: impl Read, to_stderr: bool) -> Vec<String> {
    let reader = BufReader::new(stream);
    let mut tail = VecDeque::with_capacity(TAIL_LINES);
    for line in reader.lines().map_while(Result::ok) {
        if to_stderr {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
        if tail.len() == TAIL_LINES {
            tail.pop_front();
        }
        tail.push_back(line);
    }
    tail.into()
}
