use std::{collections::BTreeMap, path::Path};

use tracing::debug;

use crate::{
    bundle::{DocumentRecord, IndexBundle},
    error::Result,
    term_index::IndexBuilder,
    walker,
};

/// Extract a document title from its content.
///
/// Uses the first markdown H1 heading (`# Title`) if present, otherwise
/// falls back to the filename without extension.
fn extract_title(content: &str, file_path: &Path) -> String {
    for line in content.lines() {
        let trimmed = line.trim();
        if let Some(heading) = trimmed.strip_prefix("# ") {
            let title = heading.trim();
            if !title.is_empty() {
                return title.to_string();
            }
        }
    }

    // Fallback: filename without extension
    file_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled")
        .to_string()
}

/// Build a complete index bundle from every document under `root`.
///
/// Document ids are root-relative paths with forward slashes, and each
/// record carries the same path as its location so links resolve
/// without extra configuration.
pub fn build_bundle(root: &Path) -> Result<IndexBundle> {
    let files = walker::discover_files(root)?;
    debug!(count = files.len(), "discovered document files");

    let mut builder = IndexBuilder::new();
    let mut docs = BTreeMap::new();

    for file in files {
        let content = std::fs::read_to_string(&file.absolute_path)?;
        let id = file.relative_path.to_string_lossy().replace('\\', "/");
        let title = extract_title(&content, &file.relative_path);
        let parent = file
            .relative_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_string_lossy().replace('\\', "/"));

        builder.add_document(&id, &title, &content);
        docs.insert(
            id.clone(),
            DocumentRecord {
                title,
                body: content,
                parent,
                loc: Some(id),
            },
        );
    }

    Ok(IndexBundle {
        index: builder.build(),
        docs,
    })
}
