use super::EXIT_SUCCESS;
use binrpm_build::{check_build_prereqs, format_missing, select_builder, Pipeline};
use binrpm_schema::PackageDescriptor;
use console::style;
use std::path::Path;

pub fn run(
    file: &Path,
    arch: Option<&str>,
    version: Option<&str>,
    build_area: &Path,
    output: Option<&Path>,
    builder_name: &str,
) -> Result<u8, String> {
    let Some(output) = output else {
        return Err("--output,-o argument is required".to_owned());
    };

    // Validation happens before the build area is touched, so a bad
    // descriptor never leaves directories behind.
    let mut descriptor = PackageDescriptor::load(file).map_err(|e| e.to_string())?;
    descriptor
        .normalize(arch, version)
        .map_err(|e| e.to_string())?;

    let builder = select_builder(builder_name).map_err(|e| e.to_string())?;
    if std::env::var("BINRPM_SKIP_PREREQS").as_deref() != Ok("1") && !builder.available() {
        let missing = check_build_prereqs();
        if missing.is_empty() {
            return Err(format!(
                "builder '{}' is not available on this system",
                builder.name()
            ));
        }
        return Err(format_missing(&missing));
    }

    let build_area = std::path::absolute(build_area).map_err(|e| e.to_string())?;
    let mut pipeline = Pipeline::new(&descriptor, build_area, builder);
    let delivered = pipeline.run(output).map_err(|e| e.to_string())?;

    println!();
    println!("{} delivered {}", style("✓").green(), delivered.display());
    println!("All done!");
    Ok(EXIT_SUCCESS)
}
