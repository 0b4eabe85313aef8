//! Corpus consistency checker.
//!
//! Runs every enabled rule over one snapshot and reports diagnostics sorted
//! by path, line and rule.

mod rules;

pub use rules::documented_param_names;

use crate::config::LintConfig;
use crate::index::Snapshot;
use rules::RuleContext;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    ParseError,
    DocumentedParams,
    DanglingAlias,
    UnknownSuperclass,
    UnknownMixin,
    FileNaming,
    DuplicateDeclaration,
    DuplicateMember,
}

impl Rule {
    pub const ALL: [Rule; 8] = [
        Rule::ParseError,
        Rule::DocumentedParams,
        Rule::DanglingAlias,
        Rule::UnknownSuperclass,
        Rule::UnknownMixin,
        Rule::FileNaming,
        Rule::DuplicateDeclaration,
        Rule::DuplicateMember,
    ];

    /// Code used in output and in `lint.disabled_rules`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ParseError => "parse-error",
            Self::DocumentedParams => "documented-params",
            Self::DanglingAlias => "dangling-alias",
            Self::UnknownSuperclass => "unknown-superclass",
            Self::UnknownMixin => "unknown-mixin",
            Self::FileNaming => "file-naming",
            Self::DuplicateDeclaration => "duplicate-declaration",
            Self::DuplicateMember => "duplicate-member",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::DocumentedParams | Self::UnknownMixin | Self::FileNaming => Severity::Warning,
            Self::ParseError
            | Self::DanglingAlias
            | Self::UnknownSuperclass
            | Self::DuplicateDeclaration
            | Self::DuplicateMember => Severity::Error,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rule| rule.code() == code)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub rule: Rule,
    pub severity: Severity,
    /// Relative to the snapshot root.
    pub path: PathBuf,
    /// One-based.
    pub line: u32,
    pub message: String,
}

impl Diagnostic {
    pub fn new(rule: Rule, path: PathBuf, line: u32, message: String) -> Self {
        Self {
            rule,
            severity: rule.severity(),
            path,
            line,
            message,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}] {}",
            self.path.display(),
            self.line,
            self.severity,
            self.rule,
            self.message
        )
    }
}

pub struct Linter {
    config: LintConfig,
}

impl Linter {
    pub fn new(config: &LintConfig) -> Self {
        for code in &config.disabled_rules {
            if Rule::from_code(code).is_none() {
                tracing::warn!(target: "lint", "Unknown rule '{code}' in lint.disabled_rules");
            }
        }
        Self {
            config: config.clone(),
        }
    }

    pub fn check_snapshot(&self, snapshot: &Snapshot) -> Vec<Diagnostic> {
        let mut ctx = RuleContext::new(snapshot, &self.config);

        for file in &snapshot.files {
            rules::parse_errors(&mut ctx, file);
            rules::documented_params(&mut ctx, file);
            rules::dangling_aliases(&mut ctx, file);
            rules::unknown_parents(&mut ctx, file);
            rules::file_naming(&mut ctx, file);
        }
        rules::duplicate_declarations(&mut ctx, &snapshot.files);
        rules::duplicate_members(&mut ctx, &snapshot.files);

        let mut diagnostics = ctx.diagnostics;
        diagnostics.sort_by(|a, b| (&a.path, a.line, a.rule).cmp(&(&b.path, b.line, b.rule)));
        tracing::info!(
            target: "lint",
            "{}: {} diagnostic(s) in {} file(s)",
            snapshot.tag,
            diagnostics.len(),
            snapshot.files.len()
        );
        diagnostics
    }
}

pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.severity == Severity::Error)
}
