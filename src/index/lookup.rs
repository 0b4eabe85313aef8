//! Query API over a loaded snapshot: namespaces, ancestors, method
//! resolution, hover and completion.

use super::snapshot::{NamespaceEntry, Snapshot};
use crate::symbol::{MethodReceiver, NamespaceKind, StubConstant, StubMethod};
use serde::Serialize;
use std::collections::HashSet;

/// A parsed lookup string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolQuery {
    /// `String`, `Process::Status` or `File::SEPARATOR`.
    Path(String),
    /// `String#center` or `File.exist?`.
    Method {
        owner: String,
        name: String,
        receiver: MethodReceiver,
    },
}

impl SymbolQuery {
    pub fn parse(query: &str) -> Option<Self> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        if let Some((owner, name)) = query.split_once('#') {
            return Self::method(owner, name, MethodReceiver::Instance);
        }
        // `.` never appears in constant paths, but `::` does.
        if let Some((owner, name)) = query.rsplit_once('.') {
            return Self::method(owner, name, MethodReceiver::Singleton);
        }
        Some(Self::Path(query.trim_start_matches("::").to_string()))
    }

    fn method(owner: &str, name: &str, receiver: MethodReceiver) -> Option<Self> {
        let owner = owner.trim().trim_start_matches("::");
        let name = name.trim();
        if owner.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::Method {
            owner: owner.to_string(),
            name: name.to_string(),
            receiver,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Class,
    Module,
    Method,
    Constant,
}

impl From<NamespaceKind> for SymbolKind {
    fn from(kind: NamespaceKind) -> Self {
        match kind {
            NamespaceKind::Class => Self::Class,
            NamespaceKind::Module => Self::Module,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverInfo {
    pub kind: SymbolKind,
    /// Fully qualified: `String`, `String#center`, `File::SEPARATOR`.
    pub name: String,
    pub signature: String,
    /// Namespace the member was found in, after ancestor lookup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// Lookup order of a class or module, excluding itself.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ancestors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub label: String,
    pub kind: SymbolKind,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

/// A method together with the namespace that declares it.
#[derive(Debug, Clone, Copy)]
pub struct MethodMatch<'a> {
    pub owner: &'a str,
    pub method: &'a StubMethod,
}

impl Snapshot {
    pub fn namespace(&self, name: &str) -> Option<&NamespaceEntry> {
        self.entry(name)
    }

    /// Ruby's method lookup order for `name`, itself included.
    pub fn ancestors(&self, name: &str) -> Vec<String> {
        self.resolver().ancestors(name.trim_start_matches("::"))
    }

    /// `name <= ancestor` in Ruby terms.
    pub fn is_ancestor(&self, name: &str, ancestor: &str) -> bool {
        self.resolver().is_ancestor(
            name.trim_start_matches("::"),
            ancestor.trim_start_matches("::"),
        )
    }

    /// Find the method `owner` responds to as `name`, following ancestors.
    pub fn resolve_method(
        &self,
        owner: &str,
        name: &str,
        receiver: MethodReceiver,
    ) -> Option<MethodMatch<'_>> {
        self.visible_methods(owner, receiver)
            .into_iter()
            .find(|candidate| candidate.method.answers_to(name))
    }

    /// Every method visible on `owner` for `receiver`, nearest declaration
    /// first.
    fn visible_methods(&self, owner: &str, receiver: MethodReceiver) -> Vec<MethodMatch<'_>> {
        let owner = owner.trim_start_matches("::");
        let mut found = Vec::new();

        match receiver {
            MethodReceiver::Instance => {
                self.collect_instance_methods(owner, &mut found);
            }
            MethodReceiver::Singleton => {
                let Some(owner_entry) = self.entry(owner) else {
                    return found;
                };
                let resolver = self.resolver();
                for class in resolver.superclass_chain(owner) {
                    if let Some(entry) = self.entry(&class) {
                        found.extend(Self::own_methods(entry, MethodReceiver::Singleton));
                    }
                    for module in resolver.extended(&class) {
                        self.collect_instance_methods(module, &mut found);
                    }
                }
                let base = match owner_entry.kind() {
                    NamespaceKind::Module => "Module",
                    NamespaceKind::Class => "Class",
                };
                self.collect_instance_methods(base, &mut found);
            }
        }

        let mut seen = HashSet::new();
        found.retain(|m| seen.insert(m.method.name.as_str()));
        found
    }

    fn collect_instance_methods<'a>(&'a self, owner: &str, found: &mut Vec<MethodMatch<'a>>) {
        for ancestor in self.ancestors(owner) {
            if let Some(entry) = self.entry(&ancestor) {
                found.extend(Self::own_methods(entry, MethodReceiver::Instance));
            }
        }
    }

    fn own_methods(
        entry: &NamespaceEntry,
        receiver: MethodReceiver,
    ) -> impl Iterator<Item = MethodMatch<'_>> {
        entry
            .namespace
            .methods
            .iter()
            .filter(move |m| m.receiver == receiver)
            .map(|method| MethodMatch {
                owner: entry.qualified_name(),
                method,
            })
    }

    /// Constants are inherited, so `owner`'s ancestors are searched too.
    pub fn resolve_constant_member(
        &self,
        owner: &str,
        name: &str,
    ) -> Option<(&str, &StubConstant)> {
        self.ancestors(owner).iter().find_map(|ancestor| {
            let entry = self.entry(ancestor)?;
            entry
                .namespace
                .constant(name)
                .map(|constant| (entry.qualified_name(), constant))
        })
    }

    pub fn hover(&self, query: &str) -> Option<HoverInfo> {
        match SymbolQuery::parse(query)? {
            SymbolQuery::Method {
                owner,
                name,
                receiver,
            } => {
                let found = self.resolve_method(&owner, &name, receiver)?;
                Some(HoverInfo {
                    kind: SymbolKind::Method,
                    name: found.method.qualified_name(found.owner),
                    signature: found.method.signature(),
                    owner: Some(found.owner.to_string()),
                    doc: found.method.doc.clone(),
                    ancestors: Vec::new(),
                })
            }
            SymbolQuery::Path(path) => {
                if let Some(entry) = self.entry(&path).filter(|e| !e.is_implicit()) {
                    return Some(HoverInfo {
                        kind: entry.kind().into(),
                        name: entry.qualified_name().to_string(),
                        signature: entry.namespace.signature(),
                        owner: None,
                        doc: entry.namespace.doc.clone(),
                        ancestors: self
                            .ancestors(entry.qualified_name())
                            .into_iter()
                            .skip(1)
                            .collect(),
                    });
                }

                let (owner, name) = path.rsplit_once("::").unwrap_or(("Object", path.as_str()));
                let (found_in, constant) = self.resolve_constant_member(owner, name)?;
                Some(HoverInfo {
                    kind: SymbolKind::Constant,
                    name: format!("{found_in}::{}", constant.name),
                    signature: format!("{} = {}", constant.name, constant.value),
                    owner: Some(found_in.to_string()),
                    doc: constant.doc.clone(),
                    ancestors: Vec::new(),
                })
            }
        }
    }

    /// Completion candidates for `prefix`, sorted by label and capped at
    /// `limit`.
    pub fn complete(&self, prefix: &str, limit: usize) -> Vec<Completion> {
        let prefix = prefix.trim();
        let mut items = if let Some((owner, partial)) = prefix.split_once('#') {
            self.complete_methods(owner, partial, MethodReceiver::Instance)
        } else if let Some((owner, partial)) = prefix.rsplit_once('.') {
            self.complete_methods(owner, partial, MethodReceiver::Singleton)
        } else {
            self.complete_paths(prefix.trim_start_matches("::"))
        };

        items.sort_by(|a, b| a.label.cmp(&b.label));
        items.dedup_by(|a, b| a.label == b.label);
        items.truncate(limit);
        items
    }

    fn complete_methods(
        &self,
        owner: &str,
        partial: &str,
        receiver: MethodReceiver,
    ) -> Vec<Completion> {
        let mut items = Vec::new();
        for found in self.visible_methods(owner, receiver) {
            let names = std::iter::once(&found.method.name).chain(found.method.aliases.iter());
            for name in names.filter(|n| n.starts_with(partial)) {
                items.push(Completion {
                    label: name.clone(),
                    kind: SymbolKind::Method,
                    detail: found.method.signature(),
                    owner: Some(found.owner.to_string()),
                });
            }
        }
        items
    }

    fn complete_paths(&self, prefix: &str) -> Vec<Completion> {
        let mut items: Vec<Completion> = self
            .entries()
            .filter(|entry| !entry.is_implicit())
            .filter(|entry| {
                let qualified = entry.qualified_name();
                qualified.starts_with(prefix)
                    || (!prefix.contains("::") && entry.namespace.name.starts_with(prefix))
            })
            .map(|entry| Completion {
                label: entry.qualified_name().to_string(),
                kind: entry.kind().into(),
                detail: entry.namespace.signature(),
                owner: None,
            })
            .collect();

        let scoped = prefix
            .rsplit_once("::")
            .and_then(|(owner, partial)| Some((self.entry(owner)?, partial)));
        if let Some((entry, partial)) = scoped {
            items.extend(
                entry
                    .namespace
                    .constants
                    .iter()
                    .filter(|c| c.name.starts_with(partial))
                    .map(|c| Completion {
                        label: format!("{}::{}", entry.qualified_name(), c.name),
                        kind: SymbolKind::Constant,
                        detail: format!("{} = {}", c.name, c.value),
                        owner: Some(entry.qualified_name().to_string()),
                    }),
            );
        }
        items
    }
}
