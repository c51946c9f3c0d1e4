use std::fmt;
use std::process::Command;

/// A missing prerequisite with actionable install instructions.
#[derive(Debug)]
pub struct MissingPrereq {
    pub name: &'static str,
    pub purpose: &'static str,
    pub install_hint: &'static str,
}

impl fmt::Display for MissingPrereq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "  - {}: {} (install: {})",
            self.name, self.purpose, self.install_hint
        )
    }
}

pub(crate) fn command_exists(name: &str) -> bool {
    Command::new("which")
        .arg(name)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Check the tools a real (non-mock) build needs.
/// Returns a list of missing items. Empty list means all prerequisites are met.
pub fn check_build_prereqs() -> Vec<MissingPrereq> {
    let mut missing = Vec::new();

    if !command_exists("rpmbuild") {
        missing.push(MissingPrereq {
            name: "rpmbuild",
            purpose: "assembling the binary package archive",
            install_hint:
                "dnf install rpm-build | zypper install rpm-build | apt install rpm | pacman -S rpm-tools",
        });
    }

    missing
}

/// Format a list of missing prerequisites into a user-friendly error message.
pub fn format_missing(missing: &[MissingPrereq]) -> String {
    use std::fmt::Write as _;
    let mut msg = String::from("missing prerequisites:\n");
    for m in missing {
        let _ = writeln!(msg, "{m}");
    }
    msg.push_str("\nbinrpm requires these tools to build packages.");
    msg
}
