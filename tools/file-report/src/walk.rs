//! Directory walking.

use std::path::Path;

use anyhow::{Context, Result};
use base_app::File;
use walkdir::{DirEntry, WalkDir};

/// Collect every regular file under `root`, as paths relative to `root`.
///
/// Entries are visited in sorted order so runs are deterministic. Hidden
/// entries (names starting with `.`) are skipped unless `include_hidden`.
/// Symlinks are not followed, so a link back to an ancestor cannot loop.
pub fn collect_files(root: &Path, include_hidden: bool) -> Result<Vec<File>> {
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| include_hidden || e.depth() == 0 || !is_hidden(e));

    let mut files = Vec::new();
    for entry in walker {
        let entry =
            entry.with_context(|| format!("failed to walk directory: {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        files.push(File::new(relative));
    }

    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}
