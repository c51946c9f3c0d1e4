use super::EXIT_SUCCESS;
use binrpm_schema::PackageDescriptor;
use std::path::Path;

pub fn run(file: &Path, arch: Option<&str>, version: Option<&str>) -> Result<u8, String> {
    let mut descriptor = PackageDescriptor::load(file).map_err(|e| e.to_string())?;
    descriptor
        .normalize(arch, version)
        .map_err(|e| e.to_string())?;
    let spec = binrpm_spec::render(&descriptor).map_err(|e| e.to_string())?;
    print!("{spec}");
    Ok(EXIT_SUCCESS)
}
