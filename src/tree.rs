use std::collections::BTreeSet;
use std::ffi::OsStr;
use tracing::debug;

use crate::error::Result;
use crate::metadata::WorkspaceMetadata;
use crate::utils::run_cargo;

/// Names of every non-dev dependency reachable from `package`, itself included.
pub fn resolve_dependencies(metadata: &WorkspaceMetadata, package: &str) -> Result<BTreeSet<String>> {
    let manifest = metadata.package(package)?.manifest_path.as_os_str();

    // We may be in a virtual workspace, so pass the package's manifest explicitly
    let stdout = run_cargo(
        &[
            OsStr::new("tree"),
            OsStr::new("--manifest-path"),
            manifest,
            OsStr::new("--frozen"),
            OsStr::new("--edges"),
            OsStr::new("no-dev"),
            OsStr::new("--prefix"),
            OsStr::new("none"),
            OsStr::new("--format"),
            OsStr::new("{p}"),
        ]
    )?;

    let deps = parse_tree_output(&stdout);
    debug!("{} has {} packages in its dependency tree", package, deps.len());
    Ok(deps)
}

/// Collapse `cargo tree --prefix none --format {p}` lines to bare package names.
///
/// Each line looks like `serde v1.0.195` optionally followed by a path or a
/// `(*)` marker; only the first token matters.
pub fn parse_tree_output(output: &str) -> BTreeSet<String> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(|name| name.to_string())
        .collect()
}
