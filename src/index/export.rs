//! JSON export of a snapshot's merged symbol table.

use super::snapshot::Snapshot;
use crate::error::{IndexError, IndexResult};
use crate::io::format::format_utc_timestamp;
use crate::symbol::StubNamespace;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct SnapshotExport<'a> {
    pub tag: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub generated_at: String,
    pub namespaces: Vec<&'a StubNamespace>,
}

impl<'a> SnapshotExport<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self {
            tag: &snapshot.tag,
            version: snapshot.version.map(|v| v.to_string()),
            generated_at: format_utc_timestamp(),
            namespaces: snapshot.entries().map(|entry| &entry.namespace).collect(),
        }
    }

    pub fn to_json(&self) -> IndexResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to(&self, path: &Path) -> IndexResult<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| IndexError::FileWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Snapshot {
    pub fn export(&self) -> SnapshotExport<'_> {
        SnapshotExport::new(self)
    }
}
