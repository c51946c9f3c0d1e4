use binrpm_schema::{ChangelogEntry, FileKind, Hook, PackageDescriptor};
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to format spec text: {0}")]
    Fmt(#[from] std::fmt::Error),
    #[error("invalid changelog date '{0}', expected YYYY-MM-DD")]
    ChangelogDate(String),
}

/// Render the descriptor into rpmbuild spec-file text.
///
/// The descriptor must already be normalized; the renderer assumes `name`,
/// `version`, `release`, and `arch` are concrete and every destination is
/// absolute.
pub fn render(desc: &PackageDescriptor) -> Result<String, RenderError> {
    let mut out = String::new();

    header(&mut out, desc)?;
    description(&mut out, desc)?;

    // Prebuilt payload: nothing to unpack, nothing to compile.
    section(&mut out, "prep")?;
    section(&mut out, "build")?;

    install(&mut out, desc)?;
    scriptlets(&mut out, desc)?;
    files(&mut out, desc)?;
    changelog(&mut out, &desc.changelog)?;

    Ok(out)
}

fn header(out: &mut String, desc: &PackageDescriptor) -> Result<(), RenderError> {
    writeln!(out, "Name: {}", desc.name)?;
    writeln!(out, "Version: {}", desc.version)?;
    writeln!(out, "Release: {}", desc.release)?;
    opt_tag(out, "Summary", desc.summary.as_deref())?;
    opt_tag(out, "License", desc.license.as_deref())?;
    opt_tag(out, "Group", desc.group.as_deref())?;
    opt_tag(out, "Vendor", desc.vendor.as_deref())?;
    opt_tag(out, "URL", desc.url.as_deref())?;
    writeln!(out, "BuildArch: {}", desc.arch)?;
    dep_tags(out, "Requires", &desc.requires)?;
    dep_tags(out, "BuildRequires", &desc.build_requires)?;
    dep_tags(out, "Provides", &desc.provides)?;
    dep_tags(out, "Conflicts", &desc.conflicts)?;
    dep_tags(out, "Obsoletes", &desc.obsoletes)?;
    Ok(())
}

fn opt_tag(out: &mut String, tag: &str, value: Option<&str>) -> Result<(), RenderError> {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        writeln!(out, "{tag}: {value}")?;
    }
    Ok(())
}

/// One tag line per value, in descriptor order. A kind with zero values
/// produces no tag at all.
fn dep_tags(out: &mut String, tag: &str, values: &[String]) -> Result<(), RenderError> {
    for value in values {
        writeln!(out, "{tag}: {value}")?;
    }
    Ok(())
}

fn section(out: &mut String, name: &str) -> Result<(), RenderError> {
    writeln!(out)?;
    writeln!(out, "%{name}")?;
    Ok(())
}

fn description(out: &mut String, desc: &PackageDescriptor) -> Result<(), RenderError> {
    section(out, "description")?;
    if let Some(body) = desc.description.as_deref().filter(|d| !d.trim().is_empty()) {
        writeln!(out, "{}", body.trim_end())?;
    }
    Ok(())
}

/// The `%install` scriptlet runs with the staged payload tree as its working
/// directory, so sources are referenced by the destination path relative to
/// the staging root.
fn install(out: &mut String, desc: &PackageDescriptor) -> Result<(), RenderError> {
    section(out, "install")?;
    for mapping in &desc.files {
        if mapping.kind == FileKind::Dir {
            writeln!(out, "install -d %{{buildroot}}{}", mapping.dest)?;
            continue;
        }
        if let Some(parent) = Path::new(&mapping.dest)
            .parent()
            .filter(|p| *p != Path::new("/"))
        {
            writeln!(out, "install -d %{{buildroot}}{}", parent.display())?;
        }
        let staged = mapping.dest.trim_start_matches('/');
        writeln!(out, "cp -a {staged} %{{buildroot}}{}", mapping.dest)?;
    }
    Ok(())
}

fn scriptlets(out: &mut String, desc: &PackageDescriptor) -> Result<(), RenderError> {
    for hook in Hook::ALL {
        if let Some(body) = desc.scripts.get(hook) {
            section(out, hook.section())?;
            writeln!(out, "{}", body.trim_end())?;
        }
    }
    Ok(())
}

fn files(out: &mut String, desc: &PackageDescriptor) -> Result<(), RenderError> {
    section(out, "files")?;
    for mapping in &desc.files {
        let mut line = String::new();
        if mapping.mode.is_some() || mapping.owner.is_some() || mapping.group.is_some() {
            write!(
                line,
                "%attr({}, {}, {}) ",
                mapping.mode.as_deref().unwrap_or("-"),
                mapping.owner.as_deref().unwrap_or("-"),
                mapping.group.as_deref().unwrap_or("-"),
            )?;
        }
        if let Some(marker) = mapping.kind.marker() {
            line.push_str(marker);
            line.push(' ');
        }
        line.push_str(&mapping.dest);
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn changelog(out: &mut String, entries: &[ChangelogEntry]) -> Result<(), RenderError> {
    if entries.is_empty() {
        return Ok(());
    }
    let mut dated = Vec::with_capacity(entries.len());
    for entry in entries {
        let date = NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d")
            .map_err(|_| RenderError::ChangelogDate(entry.date.clone()))?;
        dated.push((date, entry));
    }
    // Newest first; the sort is stable so equal dates keep descriptor order.
    dated.sort_by(|a, b| b.0.cmp(&a.0));

    section(out, "changelog")?;
    for (date, entry) in dated {
        writeln!(
            out,
            "* {} {} - {}",
            date.format("%a %b %d %Y"),
            entry.author,
            entry.version
        )?;
        for note in &entry.notes {
            writeln!(out, "- {note}")?;
        }
    }
    Ok(())
}
