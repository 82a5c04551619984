use std::collections::{ BTreeMap, BTreeSet };
use tracing::{ debug, info };

use crate::error::Result;
use crate::license_resolver::LicenseResolver;
use crate::metadata::WorkspaceMetadata;
use crate::package::LicenseInfo;

/// Resolve license info for every external package in `deps`.
///
/// Workspace members are skipped. The first failure aborts the whole
/// collection so a partial report is never produced.
pub fn collect_licenses(
    metadata: &WorkspaceMetadata,
    deps: &BTreeSet<String>,
    resolver: &LicenseResolver
) -> Result<BTreeMap<String, LicenseInfo>> {
    let mut licenses = BTreeMap::new();

    for name in deps {
        if metadata.is_local(name)? {
            debug!("Skipping workspace member {}", name);
            continue;
        }
        let license_info = resolver.resolve(metadata, name)?;
        licenses.insert(name.clone(), license_info);
    }

    info!("Resolved licenses for {} of {} packages", licenses.len(), deps.len());
    Ok(licenses)
}
