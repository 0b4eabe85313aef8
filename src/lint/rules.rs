//! Individual corpus consistency rules.

use super::{Diagnostic, Rule};
use crate::config::LintConfig;
use crate::index::Snapshot;
use crate::parsing::ruby::naming::{constant_to_relative_path, file_name_matches};
use crate::symbol::{MethodReceiver, StubFile, StubMethod};
use crate::types::Range;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Shared state for one pass over a snapshot.
pub(super) struct RuleContext<'a> {
    pub snapshot: &'a Snapshot,
    pub config: &'a LintConfig,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> RuleContext<'a> {
    pub fn new(snapshot: &'a Snapshot, config: &'a LintConfig) -> Self {
        Self {
            snapshot,
            config,
            diagnostics: Vec::new(),
        }
    }

    fn report(&mut self, rule: Rule, file: &StubFile, range: Range, message: String) {
        if !self.config.is_rule_enabled(rule.code()) {
            return;
        }
        let path = self.snapshot.relative_path(&file.path).to_path_buf();
        self.diagnostics
            .push(Diagnostic::new(rule, path, range.display_line(), message));
    }

    fn is_builtin_root(&self, name: &str) -> bool {
        let name = name.trim_start_matches("::");
        self.config.builtin_roots.iter().any(|root| root == name)
    }
}

pub(super) fn parse_errors(ctx: &mut RuleContext<'_>, file: &StubFile) {
    for diagnostic in &file.diagnostics {
        ctx.report(
            Rule::ParseError,
            file,
            diagnostic.range,
            diagnostic.message.clone(),
        );
    }
}

/// `@param name` and `@param [Type] name` are both accepted.
pub fn documented_param_names(doc: &str) -> Vec<String> {
    let mut names = Vec::new();
    for line in doc.lines() {
        let Some(rest) = line.trim_start().strip_prefix("@param") else {
            continue;
        };
        let mut words = rest.split_whitespace().peekable();
        if words.peek().is_some_and(|w| w.starts_with('[')) {
            // Skip a leading type list, which may contain spaces.
            for word in words.by_ref() {
                if word.ends_with(']') {
                    break;
                }
            }
        }
        if let Some(word) = words.next() {
            let name = word.trim_start_matches(['*', '&']).trim_end_matches([':', ',']);
            if !name.is_empty() && !name.starts_with('[') {
                names.push(name.to_string());
            }
        }
    }
    names
}

pub(super) fn documented_params(ctx: &mut RuleContext<'_>, file: &StubFile) {
    for namespace in &file.namespaces {
        for method in &namespace.methods {
            if let Some(message) = param_doc_mismatch(&namespace.qualified_name, method) {
                ctx.report(Rule::DocumentedParams, file, method.range, message);
            }
        }
    }
}

fn param_doc_mismatch(owner: &str, method: &StubMethod) -> Option<String> {
    let documented: BTreeSet<String> = documented_param_names(method.doc.as_deref()?)
        .into_iter()
        .collect();
    if documented.is_empty() {
        return None;
    }
    let declared: BTreeSet<String> = method.param_names().map(str::to_string).collect();

    let unknown: Vec<&str> = documented.difference(&declared).map(String::as_str).collect();
    let missing: Vec<&str> = declared.difference(&documented).map(String::as_str).collect();
    if unknown.is_empty() && missing.is_empty() {
        return None;
    }

    let mut problems = Vec::new();
    if !unknown.is_empty() {
        problems.push(format!("documents unknown parameter(s) {}", unknown.join(", ")));
    }
    if !missing.is_empty() {
        problems.push(format!("does not document {}", missing.join(", ")));
    }
    Some(format!(
        "{} {}",
        method.qualified_name(owner),
        problems.join(" and ")
    ))
}

pub(super) fn dangling_aliases(ctx: &mut RuleContext<'_>, file: &StubFile) {
    let snapshot = ctx.snapshot;
    for namespace in &file.namespaces {
        let merged = snapshot
            .namespace(&namespace.qualified_name)
            .map(|entry| &entry.namespace);
        for alias in &namespace.aliases {
            let defined = merged.is_some_and(|ns| ns.method(&alias.original, alias.receiver).is_some());
            if !defined {
                let target = match alias.receiver {
                    MethodReceiver::Instance => format!("{}#{}", namespace.qualified_name, alias.original),
                    MethodReceiver::Singleton => format!("{}.{}", namespace.qualified_name, alias.original),
                };
                ctx.report(
                    Rule::DanglingAlias,
                    file,
                    alias.range,
                    format!("alias {} refers to undefined method {target}", alias.new_name),
                );
            }
        }
    }
}

pub(super) fn unknown_parents(ctx: &mut RuleContext<'_>, file: &StubFile) {
    for namespace in &file.namespaces {
        if let Some(superclass) = &namespace.superclass {
            if !is_known(ctx, namespace.parent_path(), superclass) {
                ctx.report(
                    Rule::UnknownSuperclass,
                    file,
                    namespace.range,
                    format!(
                        "superclass {superclass} of {} is not declared in {}",
                        namespace.qualified_name, ctx.snapshot.tag
                    ),
                );
            }
        }
        for mixin in &namespace.mixins {
            if !is_known(ctx, &namespace.qualified_name, &mixin.name) {
                ctx.report(
                    Rule::UnknownMixin,
                    file,
                    mixin.range,
                    format!(
                        "{} {} in {} is not declared in {}",
                        mixin.kind.keyword(),
                        mixin.name,
                        namespace.qualified_name,
                        ctx.snapshot.tag
                    ),
                );
            }
        }
    }
}

fn is_known(ctx: &RuleContext<'_>, scope: &str, name: &str) -> bool {
    ctx.is_builtin_root(name) || ctx.snapshot.resolve_constant(scope, name).is_some()
}

pub(super) fn file_naming(ctx: &mut RuleContext<'_>, file: &StubFile) {
    let Some(primary) = file.primary_namespace() else {
        return;
    };
    let relative: &Path = ctx.snapshot.relative_path(&file.path);
    if !file_name_matches(relative, &primary.qualified_name) {
        let expected = constant_to_relative_path(&primary.qualified_name);
        ctx.report(
            Rule::FileNaming,
            file,
            primary.range,
            format!(
                "file declares {} but is named {} (expected {expected})",
                primary.qualified_name,
                relative.display()
            ),
        );
    }
}

/// Flags every file whose primary namespace was already the primary of an
/// earlier file.
pub(super) fn duplicate_declarations(ctx: &mut RuleContext<'_>, files: &[StubFile]) {
    let mut first_seen: HashMap<&str, &Path> = HashMap::new();
    for file in files {
        let Some(primary) = file.primary_namespace() else {
            continue;
        };
        match first_seen.get(primary.qualified_name.as_str()) {
            Some(first) => {
                let message = format!(
                    "{} is already declared as the primary namespace of {}",
                    primary.qualified_name,
                    ctx.snapshot.relative_path(first).display()
                );
                ctx.report(Rule::DuplicateDeclaration, file, primary.range, message);
            }
            None => {
                first_seen.insert(&primary.qualified_name, &file.path);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum MemberKey {
    Method(MethodReceiver, String),
    Constant(String),
}

/// Methods are keyed by `(receiver, name)`, constants by name, across every
/// declaration of a namespace in the snapshot.
pub(super) fn duplicate_members(ctx: &mut RuleContext<'_>, files: &[StubFile]) {
    let mut seen: HashMap<(&str, MemberKey), &Path> = HashMap::new();
    for file in files {
        for namespace in &file.namespaces {
            let owner = namespace.qualified_name.as_str();

            for method in &namespace.methods {
                let key = MemberKey::Method(method.receiver, method.name.clone());
                if let Some(first) = seen.get(&(owner, key.clone())) {
                    let message = format!(
                        "{} is declared more than once (first in {})",
                        method.qualified_name(owner),
                        ctx.snapshot.relative_path(first).display()
                    );
                    ctx.report(Rule::DuplicateMember, file, method.range, message);
                } else {
                    seen.insert((owner, key), &file.path);
                }
            }

            for constant in &namespace.constants {
                let key = MemberKey::Constant(constant.name.clone());
                if let Some(first) = seen.get(&(owner, key.clone())) {
                    let message = format!(
                        "{owner}::{} is declared more than once (first in {})",
                        constant.name,
                        ctx.snapshot.relative_path(first).display()
                    );
                    ctx.report(Rule::DuplicateMember, file, constant.range, message);
                } else {
                    seen.insert((owner, key), &file.path);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_param_names() {
        let doc = "Centers the string.\n\n@param width [Integer] total width\n@param [String] padstr the padding\n@param *rest more\n@return [String]";
        assert_eq!(
            documented_param_names(doc),
            vec!["width", "padstr", "rest"]
        );
        assert!(documented_param_names("No tags here").is_empty());
        assert_eq!(
            documented_param_names("@param [Array<String, Symbol>] names list"),
            vec!["names"]
        );
    }
}
