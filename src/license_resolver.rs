use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::{ debug, info, warn };

use crate::error::{ Result, SummaryError };
use crate::github_raw::{ github_org_and_name, FetchConfig, FetchOutcome, LicenseFetcher };
use crate::metadata::WorkspaceMetadata;
use crate::package::{ LicenseInfo, PackageRecord };

// "COPYING", "LICENSE", "LICENSE.md", "license-mit", ... in any case
static CONVENTIONAL_LICENSE_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^(copying|license|license[.\-].*)$").unwrap()
});

/// Tried on GitHub after the declared license file, in this order
pub const REMOTE_CANDIDATES: [&str; 7] = [
    "LICENSE-APACHE",
    "LICENSE-MIT",
    "LICENSE",
    "LICENCE-APACHE",
    "LICENCE-MIT",
    "LICENCE",
    "COPYING",
];

/// Ways of locating license text, tried in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    DeclaredFile,
    ConventionalFile,
    GithubRaw,
}

impl Strategy {
    pub const ORDER: [Strategy; 3] = [
        Strategy::DeclaredFile,
        Strategy::ConventionalFile,
        Strategy::GithubRaw,
    ];

    fn try_resolve(
        self,
        package: &PackageRecord,
        config: &FetchConfig,
        fetcher: &dyn LicenseFetcher
    ) -> Result<Option<String>> {
        match self {
            Strategy::DeclaredFile => declared_file(package),
            Strategy::ConventionalFile => conventional_file(package),
            Strategy::GithubRaw => Ok(github_raw(package, config, fetcher)),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Strategy::DeclaredFile => "declared license file",
            Strategy::ConventionalFile => "local license file",
            Strategy::GithubRaw => "GitHub",
        };
        f.write_str(name)
    }
}

pub struct LicenseResolver<'a> {
    config: FetchConfig,
    fetcher: &'a dyn LicenseFetcher,
}

impl<'a> LicenseResolver<'a> {
    pub fn new(config: FetchConfig, fetcher: &'a dyn LicenseFetcher) -> Self {
        LicenseResolver { config, fetcher }
    }

    /// License details for an external dependency, failing if no text can be found
    pub fn resolve(&self, metadata: &WorkspaceMetadata, name: &str) -> Result<LicenseInfo> {
        let package = metadata.package(name)?;

        for strategy in Strategy::ORDER {
            if let Some(text) = strategy.try_resolve(package, &self.config, self.fetcher)? {
                info!("Found license text for {} via {}", name, strategy);
                return Ok(LicenseInfo::new(package, text));
            }
        }

        Err(SummaryError::LicenseNotFound(name.to_string()))
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| SummaryError::io(path, e))
}

fn declared_file(package: &PackageRecord) -> Result<Option<String>> {
    let root = package.package_root();
    let license_file = match &package.license_file {
        Some(file) if root.is_dir() => file,
        _ => {
            return Ok(None);
        }
    };

    let path = root.join(license_file);
    if !path.is_file() {
        debug!("Declared license file {} is missing", path.display());
        return Ok(None);
    }
    read_text(&path).map(Some)
}

fn conventional_file(package: &PackageRecord) -> Result<Option<String>> {
    let root = package.package_root();
    if !root.is_dir() {
        return Ok(None);
    }

    let entries = fs::read_dir(root).map_err(|e| SummaryError::io(root, e))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SummaryError::io(root, e))?;
        names.push(entry.file_name());
    }
    names.sort();

    for name in names {
        let matches = name
            .to_str()
            .map_or(false, |n| CONVENTIONAL_LICENSE_FILE.is_match(n));
        let path = root.join(&name);
        if matches && path.is_file() {
            return read_text(&path).map(Some);
        }
    }
    Ok(None)
}

fn github_raw(
    package: &PackageRecord,
    config: &FetchConfig,
    fetcher: &dyn LicenseFetcher
) -> Option<String> {
    let org_and_name = github_org_and_name(package.repository.as_deref()?)?;

    let declared = package.license_file
        .as_ref()
        .map(|file| file.to_string_lossy().replace('\\', "/"));
    let candidates = declared.iter().map(|s| s.as_str()).chain(REMOTE_CANDIDATES);

    for file in candidates {
        let url = config.raw_url(org_and_name, file);
        match fetcher.fetch(&url) {
            FetchOutcome::Found(text) => {
                return Some(text);
            }
            FetchOutcome::Missing(status) => {
                debug!("{} returned status {}", url, status);
            }
            FetchOutcome::Failed(reason) => {
                // Treated like a missing file; keep going with the next candidate
                warn!("Fetching {} for {} failed: {}", url, package.name, reason);
            }
        }
    }
    None
}
