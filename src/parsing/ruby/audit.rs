//! Parser coverage audit.
//!
//! Counts the syntax node kinds in one stub file and compares them with the
//! kinds the stub parser registered while extracting declarations.

use super::RubyStubParser;
use crate::io::format::format_utc_timestamp;
use crate::parsing::NodeTracker;
use crate::symbol::StubFile;
use crate::types::FileId;
use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;
use std::path::Path;
use thiserror::Error;
use tree_sitter::{Node, Parser};

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Cannot read stub file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Ruby grammar rejected: {0}")]
    Grammar(String),

    #[error("tree-sitter produced no tree")]
    NoTree,
}

/// Node kinds that carry stub declarations.
const DECLARATION_KINDS: &[&str] = &[
    "class",
    "module",
    "singleton_class",
    "method",
    "singleton_method",
    "method_parameters",
    "optional_parameter",
    "keyword_parameter",
    "splat_parameter",
    "hash_splat_parameter",
    "block_parameter",
    "assignment",
    "alias",
    "call",
    "comment",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindStats {
    pub kind_id: u16,
    pub occurrences: usize,
}

pub struct RubyStubAudit {
    /// Every node kind in the file, with its grammar id and count.
    pub kinds: BTreeMap<String, KindStats>,
    pub handled: HashSet<String>,
    pub file: StubFile,
}

impl RubyStubAudit {
    pub fn audit_file(path: &Path) -> Result<Self, AuditError> {
        let code = std::fs::read_to_string(path)?;
        Self::audit_code(&code)
    }

    pub fn audit_code(code: &str) -> Result<Self, AuditError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_ruby::LANGUAGE.into())
            .map_err(|e| AuditError::Grammar(e.to_string()))?;
        let tree = parser.parse(code, None).ok_or(AuditError::NoTree)?;
        let kinds = count_kinds(tree.root_node());

        let mut stub_parser = RubyStubParser::new().map_err(AuditError::Grammar)?;
        let file = stub_parser.parse_code(code, FileId(1));
        let handled = stub_parser
            .get_handled_nodes()
            .iter()
            .map(|node| node.name.clone())
            .collect();

        Ok(Self {
            kinds,
            handled,
            file,
        })
    }

    /// Declaration kinds present in the file that the parser never visited.
    pub fn gaps(&self) -> Vec<&'static str> {
        DECLARATION_KINDS
            .iter()
            .copied()
            .filter(|kind| self.kinds.contains_key(*kind) && !self.handled.contains(*kind))
            .collect()
    }

    pub fn namespace_count(&self) -> usize {
        self.file.namespaces.iter().filter(|ns| !ns.implicit).count()
    }

    pub fn method_count(&self) -> usize {
        self.file.namespaces.iter().map(|ns| ns.methods.len()).sum()
    }

    pub fn constant_count(&self) -> usize {
        self.file.namespaces.iter().map(|ns| ns.constants.len()).sum()
    }

    pub fn generate_report(&self) -> String {
        let mut out = String::new();
        let present: Vec<&str> = DECLARATION_KINDS
            .iter()
            .copied()
            .filter(|kind| self.kinds.contains_key(*kind))
            .collect();
        let gaps = self.gaps();

        let _ = writeln!(out, "# Stub Parser Audit\n");
        let _ = writeln!(out, "Generated {}\n", format_utc_timestamp());
        let _ = writeln!(
            out,
            "Declarations: {} namespace(s), {} method(s), {} constant(s)",
            self.namespace_count(),
            self.method_count(),
            self.constant_count()
        );
        let _ = writeln!(
            out,
            "Declaration kinds handled: {}/{}",
            present.len() - gaps.len(),
            present.len()
        );
        if !self.file.diagnostics.is_empty() {
            let _ = writeln!(out, "Syntax errors: {}", self.file.diagnostics.len());
        }

        let _ = writeln!(out, "\n| Kind | Grammar ID | Count | Handled |");
        let _ = writeln!(out, "|------|------------|-------|---------|");
        for kind in &present {
            let stats = self.kinds.get(*kind).copied().unwrap_or_default();
            let handled = if self.handled.contains(*kind) { "yes" } else { "NO" };
            let _ = writeln!(
                out,
                "| {kind} | {} | {} | {handled} |",
                stats.kind_id, stats.occurrences
            );
        }

        if !gaps.is_empty() {
            let _ = writeln!(out, "\nUnhandled: {}", gaps.join(", "));
        }
        out
    }
}

fn count_kinds(root: Node) -> BTreeMap<String, KindStats> {
    let mut kinds: BTreeMap<String, KindStats> = BTreeMap::new();
    let mut cursor = root.walk();

    // Pre-order walk with the cursor; no recursion on deep trees.
    loop {
        let node = cursor.node();
        let stats = kinds.entry(node.kind().to_string()).or_default();
        stats.kind_id = node.kind_id();
        stats.occurrences += 1;

        if cursor.goto_first_child() || cursor.goto_next_sibling() {
            continue;
        }
        loop {
            if !cursor.goto_parent() {
                return kinds;
            }
            if cursor.goto_next_sibling() {
                break;
            }
        }
    }
}
