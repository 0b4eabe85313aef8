//! Ancestor resolution for stub namespaces
//!
//! Superclass and mixin declarations are inert metadata in stubs; they are
//! only linearized here so lookups can walk methods the way Ruby would.

use std::collections::{HashMap, HashSet};

/// Guard against pathological superclass/mixin chains.
const MAX_CHAIN_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentKind {
    Superclass,
    Include,
    Prepend,
    Extend,
}

/// Records parent edges between qualified names and linearizes them.
#[derive(Debug, Default)]
pub struct AncestorResolver {
    parents: HashMap<String, Vec<(String, ParentKind)>>,
}

impl AncestorResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_parent(&mut self, child: String, parent: String, kind: ParentKind) {
        let edges = self.parents.entry(child).or_default();
        if kind == ParentKind::Superclass && edges.iter().any(|(_, k)| *k == kind) {
            // A class has at most one superclass; the first declaration wins.
            return;
        }
        if !edges.iter().any(|(p, k)| *p == parent && *k == kind) {
            edges.push((parent, kind));
        }
    }

    pub fn superclass(&self, type_name: &str) -> Option<&str> {
        self.edges(type_name)
            .find(|(_, kind)| *kind == ParentKind::Superclass)
            .map(|(parent, _)| parent.as_str())
    }

    /// Modules added with `extend`, most recent first.
    pub fn extended(&self, type_name: &str) -> Vec<&str> {
        let mut modules: Vec<&str> = self
            .edges(type_name)
            .filter(|(_, kind)| *kind == ParentKind::Extend)
            .map(|(parent, _)| parent.as_str())
            .collect();
        modules.reverse();
        modules
    }

    fn edges<'s>(&'s self, type_name: &str) -> impl Iterator<Item = &'s (String, ParentKind)> {
        self.parents.get(type_name).into_iter().flatten()
    }

    /// Method lookup order: prepends, the type, includes, then the superclass.
    pub fn ancestors(&self, type_name: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        self.linearize(type_name, &mut chain, &mut visited, 0);
        chain
    }

    fn linearize(
        &self,
        type_name: &str,
        chain: &mut Vec<String>,
        visited: &mut HashSet<String>,
        depth: usize,
    ) {
        if depth > MAX_CHAIN_DEPTH || !visited.insert(type_name.to_string()) {
            return;
        }

        let of_kind = |kind: ParentKind| {
            let mut parents: Vec<&str> = self
                .edges(type_name)
                .filter(|(_, k)| *k == kind)
                .map(|(p, _)| p.as_str())
                .collect();
            // Most recently mixed-in module comes first
            parents.reverse();
            parents
        };

        for module in of_kind(ParentKind::Prepend) {
            self.linearize(module, chain, visited, depth + 1);
        }
        chain.push(type_name.to_string());
        for module in of_kind(ParentKind::Include) {
            self.linearize(module, chain, visited, depth + 1);
        }
        if let Some(superclass) = self.superclass(type_name) {
            self.linearize(superclass, chain, visited, depth + 1);
        }
    }

    /// The superclass chain alone, starting with `type_name`.
    pub fn superclass_chain(&self, type_name: &str) -> Vec<String> {
        let mut chain = vec![type_name.to_string()];
        let mut current = type_name;
        while let Some(parent) = self.superclass(current) {
            if chain.iter().any(|c| c == parent) || chain.len() > MAX_CHAIN_DEPTH {
                break;
            }
            chain.push(parent.to_string());
            current = parent;
        }
        chain
    }

    pub fn is_ancestor(&self, type_name: &str, ancestor: &str) -> bool {
        type_name == ancestor || self.ancestors(type_name).iter().any(|a| a == ancestor)
    }
}
