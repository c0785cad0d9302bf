use std::path::{Path, PathBuf};

use crate::error::Result;

/// A document file found under the collection root.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Path relative to the collection root directory.
    pub relative_path: PathBuf,
    /// Fully resolved absolute path.
    pub absolute_path: PathBuf,
}

/// File extensions eligible for indexing.
const SUPPORTED_EXTENSIONS: &[&str] = &["md", "txt"];

/// Recursively walk a directory and collect eligible document files.
///
/// Skips hidden files and directories (names starting with `.`), never
/// follows symlinked directories, and only returns files with supported
/// extensions (.md, .txt). Results come back sorted by relative path so
/// builds are deterministic.
pub fn discover_files(root: &Path) -> Result<Vec<DiscoveredFile>> {
    let canonical_root = root.canonicalize()?;
    let mut results = Vec::new();
    walk_dir(&canonical_root, &canonical_root, &mut results)?;
    results.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(results)
}

fn walk_dir(
    root: &Path,
    current: &Path,
    results: &mut Vec<DiscoveredFile>,
) -> Result<()> {
    for entry in std::fs::read_dir(current)? {
        let entry = entry?;
        let name = entry.file_name();

        // Skip hidden files and directories.
        if name.to_string_lossy().starts_with('.') {
            continue;
        }

        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            walk_dir(root, &entry.path(), results)?;
            continue;
        }

        let path = entry.path();
        if !is_supported(&path) {
            continue;
        }

        // Resolving drops broken symlinks here; symlinked directories
        // are never followed.
        let Ok(absolute_path) = path.canonicalize() else {
            continue;
        };
        if !absolute_path.is_file() {
            continue;
        }

        let relative_path =
            path.strip_prefix(root).unwrap_or(&path).to_path_buf();
        results.push(DiscoveredFile {
            relative_path,
            absolute_path,
        });
    }

    Ok(())
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}
