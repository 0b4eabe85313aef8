//! Stub corpus loading and the per-version symbol tables.
//!
//! A corpus root holds one directory per Ruby version (`rubystubs33`); each
//! becomes an independent [`Snapshot`].

mod export;
pub mod loader;
mod lookup;
mod snapshot;

pub use export::SnapshotExport;
pub use loader::{SnapshotDir, discover_snapshots, parse_version};
pub use lookup::{Completion, HoverInfo, MethodMatch, SymbolKind, SymbolQuery};
pub use snapshot::{DeclarationSite, LoadError, NamespaceEntry, Snapshot, SnapshotVersion};

use crate::config::Settings;
use crate::error::{IndexError, IndexResult};
use crate::parsing::RubyStubParser;
use std::path::{Path, PathBuf};

/// Every snapshot found under a stubs root, oldest first.
#[derive(Debug)]
pub struct StubCorpus {
    root: PathBuf,
    snapshots: Vec<Snapshot>,
    default_version: Option<String>,
}

impl StubCorpus {
    /// Load the corpus at `settings.stubs_root`.
    pub fn load(settings: &Settings) -> IndexResult<Self> {
        Self::load_from(settings, &settings.stubs_root)
    }

    pub fn load_from(settings: &Settings, root: &Path) -> IndexResult<Self> {
        let dirs = discover_snapshots(root, &settings.snapshot_prefix)?;
        let mut parser = RubyStubParser::new().map_err(IndexError::ParserInit)?;

        let snapshots = dirs
            .iter()
            .map(|dir| loader::load_snapshot(dir, &mut parser))
            .collect();

        Ok(Self {
            root: root.to_path_buf(),
            snapshots,
            default_version: settings.default_version.clone(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Select by tag (`rubystubs33`) or version (`3.3`); `None` picks the
    /// configured default or else the newest snapshot.
    pub fn snapshot(&self, selector: Option<&str>) -> IndexResult<&Snapshot> {
        match selector.or(self.default_version.as_deref()) {
            Some(selector) => self
                .snapshots
                .iter()
                .find(|s| s.tag == selector || s.version.is_some_and(|v| v.to_string() == selector))
                .ok_or_else(|| IndexError::UnknownSnapshot {
                    tag: selector.to_string(),
                    available: self.available_tags(),
                }),
            None => self.snapshots.last().ok_or_else(|| IndexError::NoSnapshots {
                root: self.root.clone(),
            }),
        }
    }

    fn available_tags(&self) -> String {
        let tags: Vec<&str> = self.snapshots.iter().map(|s| s.tag.as_str()).collect();
        tags.join(", ")
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{Snapshot, SnapshotVersion};
    use crate::parsing::RubyStubParser;
    use crate::types::FileId;
    use std::path::Path;

    /// Parse in-memory sources as the `rubystubs33` snapshot.
    pub(crate) fn snapshot_from(sources: &[(&str, &str)]) -> Snapshot {
        let mut parser = RubyStubParser::new().unwrap();
        let root = Path::new("/stubs/rubystubs33");
        let files = sources
            .iter()
            .enumerate()
            .map(|(i, (path, code))| {
                let id = FileId::new(i as u32 + 1).unwrap();
                parser.parse_file(&root.join(path), code, id)
            })
            .collect();
        Snapshot::build(
            "rubystubs33",
            Some(SnapshotVersion { major: 3, minor: 3 }),
            root,
            files,
            Vec::new(),
        )
    }
}
