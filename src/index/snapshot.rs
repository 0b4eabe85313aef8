//! Per-version symbol table.
//!
//! A snapshot owns every parsed file of one version directory and merges all
//! declarations of a qualified name into a single entry, since Ruby classes
//! and modules can be reopened across files.

use crate::parsing::{AncestorResolver, ParentKind};
use crate::symbol::{MixinKind, NamespaceKind, StubFile, StubNamespace};
use crate::types::{FileId, Range};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Version parsed from a snapshot directory name (`rubystubs33` → 3.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SnapshotVersion {
    pub major: u32,
    pub minor: u32,
}

impl fmt::Display for SnapshotVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A file that could not be read or walked while loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadError {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeclarationSite {
    pub file_id: FileId,
    pub range: Range,
}

/// All declarations of one qualified name, merged.
#[derive(Debug, Clone, Serialize)]
pub struct NamespaceEntry {
    /// Merged view: first superclass, doc and member declaration wins.
    pub namespace: StubNamespace,
    pub declarations: Vec<DeclarationSite>,
}

impl NamespaceEntry {
    fn new(first: &StubNamespace, file_id: FileId) -> Self {
        let short_name = first
            .qualified_name
            .rsplit("::")
            .next()
            .unwrap_or(&first.qualified_name)
            .to_string();
        let mut namespace = StubNamespace::new(
            short_name,
            first.qualified_name.clone(),
            first.kind,
            first.range,
        );
        namespace.implicit = first.implicit;
        let mut entry = Self {
            namespace,
            declarations: Vec::new(),
        };
        entry.merge(first, file_id);
        entry
    }

    fn merge(&mut self, declaration: &StubNamespace, file_id: FileId) {
        let merged = &mut self.namespace;
        merged.implicit &= declaration.implicit;
        if merged.doc.is_none() {
            merged.doc = declaration.doc.clone();
        }
        if merged.superclass.is_none() {
            merged.superclass = declaration.superclass.clone();
        }
        for mixin in &declaration.mixins {
            if !merged
                .mixins
                .iter()
                .any(|m| m.kind == mixin.kind && m.name == mixin.name)
            {
                merged.mixins.push(mixin.clone());
            }
        }
        for constant in &declaration.constants {
            if merged.constant(&constant.name).is_none() {
                merged.constants.push(constant.clone());
            }
        }
        for method in &declaration.methods {
            let exists = merged
                .methods
                .iter()
                .any(|m| m.receiver == method.receiver && m.name == method.name);
            if !exists {
                merged.methods.push(method.clone());
            }
        }
        merged.aliases.extend(declaration.aliases.iter().cloned());
        self.declarations.push(DeclarationSite {
            file_id,
            range: declaration.range,
        });
    }

    pub fn qualified_name(&self) -> &str {
        &self.namespace.qualified_name
    }

    pub fn kind(&self) -> NamespaceKind {
        self.namespace.kind
    }

    pub fn is_implicit(&self) -> bool {
        self.namespace.implicit
    }
}

/// Symbol table for one stub version directory.
#[derive(Debug)]
pub struct Snapshot {
    pub tag: String,
    pub version: Option<SnapshotVersion>,
    pub root: PathBuf,
    pub files: Vec<StubFile>,
    pub load_errors: Vec<LoadError>,
    entries: BTreeMap<String, NamespaceEntry>,
    resolver: AncestorResolver,
}

impl Snapshot {
    pub fn build(
        tag: impl Into<String>,
        version: Option<SnapshotVersion>,
        root: impl Into<PathBuf>,
        files: Vec<StubFile>,
        load_errors: Vec<LoadError>,
    ) -> Self {
        let mut entries: BTreeMap<String, NamespaceEntry> = BTreeMap::new();
        for file in &files {
            for namespace in &file.namespaces {
                match entries.get_mut(&namespace.qualified_name) {
                    Some(entry) => entry.merge(namespace, file.file_id),
                    None => {
                        entries.insert(
                            namespace.qualified_name.clone(),
                            NamespaceEntry::new(namespace, file.file_id),
                        );
                    }
                }
            }
        }

        let mut snapshot = Self {
            tag: tag.into(),
            version,
            root: root.into(),
            files,
            load_errors,
            entries,
            resolver: AncestorResolver::new(),
        };
        snapshot.resolver = snapshot.build_resolver();
        snapshot
    }

    fn build_resolver(&self) -> AncestorResolver {
        let mut resolver = AncestorResolver::new();
        let has_object = self.entries.contains_key("Object");

        for (name, entry) in &self.entries {
            let namespace = &entry.namespace;

            match &namespace.superclass {
                Some(superclass) => {
                    // Evaluated in the enclosing scope, not inside the class
                    let parent = self.resolve_or_literal(namespace.parent_path(), superclass);
                    resolver.add_parent(name.clone(), parent, ParentKind::Superclass);
                }
                None if namespace.kind == NamespaceKind::Class
                    && has_object
                    && name != "Object"
                    && name != "BasicObject" =>
                {
                    resolver.add_parent(name.clone(), "Object".to_string(), ParentKind::Superclass);
                }
                None => {}
            }

            for mixin in &namespace.mixins {
                let kind = match mixin.kind {
                    MixinKind::Include => ParentKind::Include,
                    MixinKind::Prepend => ParentKind::Prepend,
                    MixinKind::Extend => ParentKind::Extend,
                };
                let parent = self.resolve_or_literal(name, &mixin.name);
                resolver.add_parent(name.clone(), parent, kind);
            }
        }

        resolver
    }

    fn resolve_or_literal(&self, scope: &str, name: &str) -> String {
        self.resolve_constant(scope, name)
            .unwrap_or_else(|| name.trim_start_matches("::").to_string())
    }

    /// Resolve a constant reference written inside `scope` to a known
    /// namespace, trying `scope::name`, then each enclosing scope, then the
    /// top level. A leading `::` forces top level.
    pub fn resolve_constant(&self, scope: &str, name: &str) -> Option<String> {
        if let Some(absolute) = name.strip_prefix("::") {
            return self
                .entries
                .contains_key(absolute)
                .then(|| absolute.to_string());
        }

        let mut current = scope;
        loop {
            let candidate = if current.is_empty() {
                name.to_string()
            } else {
                format!("{current}::{name}")
            };
            if self.entries.contains_key(&candidate) {
                return Some(candidate);
            }
            if current.is_empty() {
                return None;
            }
            current = current.rsplit_once("::").map(|(outer, _)| outer).unwrap_or("");
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &NamespaceEntry> {
        self.entries.values()
    }

    pub fn namespace_count(&self) -> usize {
        self.entries.values().filter(|e| !e.is_implicit()).count()
    }

    pub fn method_count(&self) -> usize {
        self.entries.values().map(|e| e.namespace.methods.len()).sum()
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.entries.contains_key(qualified_name.trim_start_matches("::"))
    }

    pub(crate) fn entry(&self, qualified_name: &str) -> Option<&NamespaceEntry> {
        self.entries.get(qualified_name.trim_start_matches("::"))
    }

    pub(crate) fn resolver(&self) -> &AncestorResolver {
        &self.resolver
    }

    pub fn file(&self, file_id: FileId) -> Option<&StubFile> {
        self.files.iter().find(|f| f.file_id == file_id)
    }

    /// Path of a file relative to the snapshot root.
    pub fn relative_path<'p>(&self, path: &'p Path) -> &'p Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }

    pub fn display_version(&self) -> String {
        self.version
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::test_support::snapshot_from;
    use crate::symbol::MethodReceiver;

    #[test]
    fn reopened_namespaces_are_merged() {
        let snapshot = snapshot_from(&[
            (
                "string.rb",
                "# Docs\nclass String < Object\n  def size\n  end\nend\n",
            ),
            (
                "string_ext.rb",
                "class String\n  include Comparable\n  def size(x)\n  end\n  def bytes\n  end\nend\n",
            ),
        ]);

        let entry = snapshot.entry("String").unwrap();
        assert_eq!(entry.declarations.len(), 2);
        assert_eq!(entry.namespace.superclass.as_deref(), Some("Object"));
        assert_eq!(entry.namespace.doc.as_deref(), Some("Docs"));
        assert_eq!(entry.namespace.mixins.len(), 1);
        let size = entry
            .namespace
            .method("size", MethodReceiver::Instance)
            .unwrap();
        assert!(size.params.is_empty(), "first declaration wins");
        assert!(entry.namespace.method("bytes", MethodReceiver::Instance).is_some());
    }

    #[test]
    fn constants_resolve_through_lexical_scopes() {
        let snapshot = snapshot_from(&[(
            "json.rb",
            "module JSON\n  class ParserError < StandardError\n  end\n  class Nested\n  end\nend\nclass StandardError\nend\n",
        )]);

        assert_eq!(
            snapshot.resolve_constant("JSON::ParserError", "Nested"),
            Some("JSON::Nested".to_string())
        );
        assert_eq!(
            snapshot.resolve_constant("JSON", "StandardError"),
            Some("StandardError".to_string())
        );
        assert_eq!(snapshot.resolve_constant("JSON", "::Nested"), None);
        assert_eq!(snapshot.resolve_constant("JSON", "Missing"), None);
    }

    #[test]
    fn classes_default_to_object_superclass() {
        let snapshot = snapshot_from(&[
            ("object.rb", "class Object < BasicObject\nend\n"),
            ("basic_object.rb", "class BasicObject\nend\n"),
            ("dir.rb", "class Dir\nend\n"),
            ("math.rb", "module Math\nend\n"),
        ]);

        let resolver = snapshot.resolver();
        assert_eq!(resolver.superclass("Dir"), Some("Object"));
        assert_eq!(resolver.superclass("Math"), None);
        assert_eq!(resolver.superclass("BasicObject"), None);
        assert_eq!(resolver.superclass("Object"), Some("BasicObject"));
    }

    #[test]
    fn counts_skip_implicit_namespaces() {
        let snapshot = snapshot_from(&[("kernel.rb", "ARGV = _\nmodule Kernel\n  def puts\n  end\nend\n")]);
        assert_eq!(snapshot.namespace_count(), 1);
        assert_eq!(snapshot.method_count(), 1);
        assert!(snapshot.contains("::Kernel"));
    }
}
