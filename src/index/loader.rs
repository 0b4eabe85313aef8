//! Snapshot discovery and file loading.

use super::snapshot::{LoadError, Snapshot, SnapshotVersion};
use crate::error::{IndexError, IndexResult};
use crate::parsing::RubyStubParser;
use crate::types::FileId;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A version directory found under the stubs root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotDir {
    pub tag: String,
    pub version: Option<SnapshotVersion>,
    pub path: PathBuf,
}

/// Parse the version out of a directory name.
///
/// `rubystubs22` → 2.2, `rubystubs310` → 3.10. Separated forms such as
/// `rubystubs3.3` or `rubystubs3_3` are accepted too.
pub fn parse_version(tag: &str, prefix: &str) -> Option<SnapshotVersion> {
    let rest = tag.strip_prefix(prefix)?;
    if rest.is_empty() {
        return None;
    }

    if let Some((major, minor)) = rest.split_once(['.', '_', '-']) {
        return Some(SnapshotVersion {
            major: major.parse().ok()?,
            minor: minor.parse().ok()?,
        });
    }

    if !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (major, minor) = rest.split_at(1);
    Some(SnapshotVersion {
        major: major.parse().ok()?,
        minor: if minor.is_empty() { 0 } else { minor.parse().ok()? },
    })
}

/// Find snapshot directories directly below `root`, oldest first.
///
/// A `root` that holds `.rb` files itself is a single snapshot; its
/// sub-directories are then part of that snapshot.
pub fn discover_snapshots(root: &Path, prefix: &str) -> IndexResult<Vec<SnapshotDir>> {
    if !root.is_dir() {
        return Err(IndexError::RootNotFound {
            path: root.to_path_buf(),
        });
    }

    if has_direct_stubs(root) {
        let tag = root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());
        return Ok(vec![SnapshotDir {
            version: parse_version(&tag, prefix),
            tag,
            path: root.to_path_buf(),
        }]);
    }

    let mut dirs = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_dir() || !contains_stubs(entry.path()) {
            continue;
        }
        let tag = entry.file_name().to_string_lossy().into_owned();
        dirs.push(SnapshotDir {
            version: parse_version(&tag, prefix),
            tag,
            path: entry.into_path(),
        });
    }

    if dirs.is_empty() {
        return Err(IndexError::NoSnapshots {
            root: root.to_path_buf(),
        });
    }

    // Unversioned first, then ascending versions: the last one is the newest.
    dirs.sort_by(|a, b| {
        (a.version.is_some(), a.version, &a.tag).cmp(&(b.version.is_some(), b.version, &b.tag))
    });
    Ok(dirs)
}

fn is_stub_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "rb")
}

fn contains_stubs(dir: &Path) -> bool {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .any(|entry| entry.file_type().is_file() && is_stub_file(entry.path()))
}

fn has_direct_stubs(dir: &Path) -> bool {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .any(|entry| entry.file_type().is_file() && is_stub_file(entry.path()))
}

/// Parse every `.rb` file of one snapshot directory.
///
/// Unreadable files are recorded in `load_errors` and skipped.
pub fn load_snapshot(dir: &SnapshotDir, parser: &mut RubyStubParser) -> Snapshot {
    let mut files = Vec::new();
    let mut load_errors = Vec::new();
    let mut next_id = 1u32;

    for entry in WalkDir::new(&dir.path).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.path.clone());
                tracing::warn!(target: "index", "Skipping {}: {e}", path.display());
                load_errors.push(LoadError {
                    path,
                    message: e.to_string(),
                });
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_stub_file(entry.path()) {
            continue;
        }

        let path = entry.path();
        let code = match std::fs::read_to_string(path) {
            Ok(code) => code,
            Err(source) => {
                let error = IndexError::FileRead {
                    path: path.to_path_buf(),
                    source,
                };
                tracing::warn!(target: "index", "{error}");
                load_errors.push(LoadError {
                    path: path.to_path_buf(),
                    message: error.to_string(),
                });
                continue;
            }
        };

        let Some(file_id) = FileId::new(next_id) else {
            continue;
        };
        next_id += 1;

        let file = parser.parse_file(path, &code, file_id);
        tracing::debug!(
            target: "index",
            "Parsed {} ({} namespaces, {} diagnostics)",
            path.display(),
            file.namespaces.len(),
            file.diagnostics.len()
        );
        files.push(file);
    }

    let snapshot = Snapshot::build(
        dir.tag.clone(),
        dir.version,
        dir.path.clone(),
        files,
        load_errors,
    );
    tracing::info!(
        target: "index",
        "Loaded snapshot {} ({} files, {} namespaces, {} errors)",
        snapshot.tag,
        snapshot.files.len(),
        snapshot.namespace_count(),
        snapshot.load_errors.len()
    );
    snapshot
}
