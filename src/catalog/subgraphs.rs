//! Discovery of saved subgraph files.

use std::fs;
use std::path::Path;

use log::{debug, warn};

/// Lists the subgraph files in `dir` with the given extension, sorted by name.
///
/// The extension is matched case-insensitively and may be given with or
/// without its leading dot. A missing or unreadable directory yields an empty
/// list so the catalog stays renderable. File contents are never read.
pub fn scan_subgraphs(dir: &Path, extension: &str) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("Cannot list subgraph folder {}: {}", dir.display(), err);
            return Vec::new();
        }
    };

    let wanted = extension.trim_start_matches('.');
    let mut files: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| has_extension(name, wanted))
        .collect();
    files.sort();

    debug!("Found {} subgraph file(s) in {}", files.len(), dir.display());
    files
}

fn has_extension(file_name: &str, wanted: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}
