use serde::Serialize;
use std::path::{ Path, PathBuf };

/// The parts of a `cargo metadata` package entry the summary needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    pub name: String,
    pub manifest_path: PathBuf,
    pub authors: Vec<String>,
    pub repository: Option<String>,
    pub license: Option<String>, // SPDX expression as declared in Cargo.toml
    pub license_file: Option<PathBuf>, // Relative to the manifest directory
    pub source: Option<String>, // None for path dependencies and workspace members
}

impl From<&cargo_metadata::Package> for PackageRecord {
    fn from(package: &cargo_metadata::Package) -> Self {
        PackageRecord {
            name: package.name.to_string(),
            manifest_path: package.manifest_path.as_std_path().to_path_buf(),
            authors: package.authors.clone(),
            repository: package.repository.clone(),
            license: package.license.clone(),
            license_file: package.license_file
                .as_ref()
                .map(|file| file.as_std_path().to_path_buf()),
            source: package.source.as_ref().map(|source| source.repr.clone()),
        }
    }
}

impl PackageRecord {
    /// Directory holding the package's Cargo.toml
    pub fn package_root(&self) -> &Path {
        self.manifest_path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// License details for one external dependency, as printed in the report.
///
/// Field order here is the key order of the JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LicenseInfo {
    pub name: String,
    pub authors: Vec<String>,
    pub repository: Option<String>,
    pub license: Option<String>,
    pub license_text: String,
}

impl LicenseInfo {
    pub fn new(package: &PackageRecord, license_text: String) -> Self {
        LicenseInfo {
            name: package.name.clone(),
            authors: package.authors.clone(),
            repository: package.repository.clone(),
            license: package.license.clone(),
            license_text,
        }
    }
}
