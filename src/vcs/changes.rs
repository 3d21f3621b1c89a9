// ABOUTME: Change detection over `git status --porcelain` output.
// ABOUTME: Maps changed paths to the set of module identifiers they belong to.

use std::collections::BTreeSet;
use std::path::{Component, Path};

use crate::types::ModuleId;

/// Extract paths from porcelain v1 output.
///
/// Each line is `XY <path>`; renames are `XY <old> -> <new>` and contribute
/// the new path. Quoted paths keep their content without the quotes.
pub fn parse_porcelain_paths(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| line.len() > 3)
        .map(|line| {
            let path = &line[3..];
            let path = path.rsplit_once(" -> ").map_or(path, |(_, new)| new);
            path.trim().trim_matches('"').to_string()
        })
        .filter(|path| !path.is_empty())
        .collect()
}

/// Re-root repository-relative `paths` at the project directory.
///
/// `prefix` is the project's location inside the repository as printed by
/// `git rev-parse --show-prefix` (e.g. `app/`, or empty at the top level).
/// Paths outside the project are dropped.
pub fn relative_to_project(paths: Vec<String>, prefix: &str) -> Vec<String> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return paths;
    }

    paths
        .into_iter()
        .filter_map(|path| {
            Path::new(&path)
                .strip_prefix(prefix)
                .ok()
                .map(|rest| rest.to_string_lossy().into_owned())
        })
        .filter(|path| !path.is_empty())
        .collect()
}

/// Modules touched by `paths`, sorted and de-duplicated.
///
/// A path belongs to a module when its first component below `modules_dir`
/// parses as a [`ModuleId`]. `module_base` is included; callers decide what
/// to do with it.
pub fn changed_modules(paths: &[String], modules_dir: &Path) -> Vec<ModuleId> {
    let modules: BTreeSet<ModuleId> = paths
        .iter()
        .filter_map(|path| {
            let relative = Path::new(path).strip_prefix(modules_dir).ok()?;
            match relative.components().next()? {
                Component::Normal(name) => ModuleId::parse(name.to_str()?).ok(),
                _ => None,
            }
        })
        .collect();

    modules.into_iter().collect()
}
