// ABOUTME: Module discovery for the full-build flow.
// ABOUTME: Lists module directories in sorted order.

use nonempty::NonEmpty;
use std::path::Path;

use super::error::RunError;
use crate::types::ModuleId;

/// Every `module_*` directory under `modules_dir`, sorted, `module_base`
/// included. Fails with `NoModules` when nothing deployable is present.
pub fn discover_modules(modules_dir: &Path) -> Result<NonEmpty<ModuleId>, RunError> {
    let listing_error = |source| RunError::ModuleListing {
        dir: modules_dir.to_path_buf(),
        source,
    };

    let mut modules = Vec::new();
    for entry in std::fs::read_dir(modules_dir).map_err(listing_error)? {
        let entry = entry.map_err(listing_error)?;
        if !entry.file_type().map_err(listing_error)?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        match ModuleId::parse(&name.to_string_lossy()) {
            Ok(module) => modules.push(module),
            Err(e) => tracing::debug!(error = %e, "skipping directory"),
        }
    }
    modules.sort();

    if modules.iter().all(ModuleId::is_base) {
        return Err(RunError::NoModules {
            dir: modules_dir.to_path_buf(),
        });
    }

    NonEmpty::from_vec(modules).ok_or_else(|| RunError::NoModules {
        dir: modules_dir.to_path_buf(),
    })
}
