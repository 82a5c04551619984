use cargo_metadata::MetadataCommand;
use std::collections::HashMap;
use std::path::{ Path, PathBuf };
use tracing::debug;

use crate::error::{ Result, SummaryError };
use crate::package::PackageRecord;

const METADATA_COMMAND: &str = "cargo metadata --frozen --format-version 1";

/// Every package cargo knows about in the current workspace, keyed by name.
#[derive(Debug, Clone)]
pub struct WorkspaceMetadata {
    workspace_root: PathBuf,
    packages: HashMap<String, PackageRecord>,
}

impl WorkspaceMetadata {
    /// Run `cargo metadata` from the current directory and index the result.
    ///
    /// This unions the features required by every package in the workspace,
    /// so it can't tell us the real dependency tree of a single package; see
    /// `tree::resolve_dependencies` for that.
    pub fn load() -> Result<Self> {
        Self::load_manifest(None)
    }

    /// Like `load`, for the workspace owning `manifest` when one is given
    pub fn load_manifest(manifest: Option<&Path>) -> Result<Self> {
        let mut command = MetadataCommand::new();
        command.other_options(vec!["--frozen".to_string()]);
        if let Some(manifest) = manifest {
            command.manifest_path(manifest);
        }
        debug!("Running {}", METADATA_COMMAND);

        let metadata = command.exec().map_err(metadata_error)?;
        let records = metadata.packages.iter().map(PackageRecord::from).collect();
        Self::new(metadata.workspace_root.into_std_path_buf(), records)
    }

    /// Index packages by name. Two packages with the same name is an error.
    pub fn new(workspace_root: PathBuf, records: Vec<PackageRecord>) -> Result<Self> {
        let mut packages = HashMap::with_capacity(records.len());
        for record in records {
            if packages.contains_key(&record.name) {
                return Err(SummaryError::DuplicatePackage(record.name));
            }
            packages.insert(record.name.clone(), record);
        }
        debug!(
            "Loaded {} packages from workspace at {}",
            packages.len(),
            workspace_root.display()
        );
        Ok(WorkspaceMetadata { workspace_root, packages })
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn package(&self, name: &str) -> Result<&PackageRecord> {
        self.packages.get(name).ok_or_else(|| SummaryError::UnknownPackage(name.to_string()))
    }

    /// Whether `name` is a member of this workspace rather than an external dependency.
    ///
    /// Registry packages always carry a source, but a path dependency pointing
    /// outside the workspace has none either, so the manifest location decides.
    pub fn is_local(&self, name: &str) -> Result<bool> {
        let package = self.package(name)?;
        if package.source.is_some() {
            return Ok(false);
        }
        Ok(package.package_root().starts_with(self.workspace_root()))
    }
}

fn metadata_error(err: cargo_metadata::Error) -> SummaryError {
    let command = METADATA_COMMAND.to_string();
    match err {
        cargo_metadata::Error::CargoMetadata { stderr } => SummaryError::CommandFailed {
            command,
            stderr: stderr.trim().to_string(),
        },
        cargo_metadata::Error::Io(source) => SummaryError::CommandSpawn { command, source },
        cargo_metadata::Error::Json(source) => SummaryError::Parse {
            what: "cargo metadata output",
            source,
        },
        _ => SummaryError::CommandOutput { command },
    }
}
