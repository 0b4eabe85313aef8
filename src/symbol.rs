//! Stub declarations extracted from a single file.
//!
//! Everything here is built once by the parser and never mutated afterwards.

use crate::types::{FileId, Range, Visibility};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NamespaceKind {
    Class,
    Module,
}

impl NamespaceKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Module => "module",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodReceiver {
    Instance,
    Singleton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MixinKind {
    Include,
    Extend,
    Prepend,
}

impl MixinKind {
    pub fn from_method(name: &str) -> Option<Self> {
        match name {
            "include" => Some(Self::Include),
            "extend" => Some(Self::Extend),
            "prepend" => Some(Self::Prepend),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Include => "include",
            Self::Extend => "extend",
            Self::Prepend => "prepend",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mixin {
    pub kind: MixinKind,
    pub name: String,
    pub range: Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Required,
    Optional,
    Rest,
    KeywordRequired,
    KeywordOptional,
    KeywordRest,
    /// `**nil`: the method accepts no keywords.
    NoKeywords,
    Block,
    Forward,
    Destructured,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StubParam {
    /// Empty for anonymous splats (`*`, `**`, `&`) and for `...`.
    pub name: String,
    pub kind: ParamKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl StubParam {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

impl fmt::Display for StubParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = &self.name;
        match self.kind {
            ParamKind::Required | ParamKind::Destructured => write!(f, "{name}"),
            ParamKind::Optional => match &self.default {
                Some(default) => write!(f, "{name} = {default}"),
                None => write!(f, "{name} = nil"),
            },
            ParamKind::Rest => write!(f, "*{name}"),
            ParamKind::KeywordRequired => write!(f, "{name}:"),
            ParamKind::KeywordOptional => match &self.default {
                Some(default) => write!(f, "{name}: {default}"),
                None => write!(f, "{name}:"),
            },
            ParamKind::KeywordRest => write!(f, "**{name}"),
            ParamKind::NoKeywords => write!(f, "**nil"),
            ParamKind::Block => write!(f, "&{name}"),
            ParamKind::Forward => write!(f, "..."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StubMethod {
    pub name: String,
    pub receiver: MethodReceiver,
    pub visibility: Visibility,
    pub params: Vec<StubParam>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    pub range: Range,
}

impl StubMethod {
    pub fn new(name: impl Into<String>, receiver: MethodReceiver, range: Range) -> Self {
        Self {
            name: name.into(),
            receiver,
            visibility: Visibility::Public,
            params: Vec::new(),
            doc: None,
            aliases: Vec::new(),
            range,
        }
    }

    /// `def name(a, b = 1)` or `def self.name(...)`.
    pub fn signature(&self) -> String {
        let prefix = match self.receiver {
            MethodReceiver::Instance => "def ",
            MethodReceiver::Singleton => "def self.",
        };
        if self.params.is_empty() {
            format!("{prefix}{}", self.name)
        } else {
            let params: Vec<String> = self.params.iter().map(ToString::to_string).collect();
            format!("{prefix}{}({})", self.name, params.join(", "))
        }
    }

    /// `String#center` or `File.exist?`.
    pub fn qualified_name(&self, owner: &str) -> String {
        match self.receiver {
            MethodReceiver::Instance => format!("{owner}#{}", self.name),
            MethodReceiver::Singleton => format!("{owner}.{}", self.name),
        }
    }

    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|alias| alias == name)
    }

    /// Names usable as parameter references in documentation.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params
            .iter()
            .filter(|p| {
                !p.name.is_empty()
                    && !matches!(p.kind, ParamKind::Destructured | ParamKind::NoKeywords)
            })
            .map(|p| p.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StubConstant {
    pub name: String,
    /// Placeholder expression, usually `_`.
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    pub range: Range,
}

/// A raw `alias new old` or `alias_method :new, :old` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StubAlias {
    pub new_name: String,
    pub original: String,
    pub receiver: MethodReceiver,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StubNamespace {
    /// The name as written after `class`/`module`, possibly scoped.
    pub name: String,
    pub qualified_name: String,
    pub kind: NamespaceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superclass: Option<String>,
    pub mixins: Vec<Mixin>,
    pub constants: Vec<StubConstant>,
    pub methods: Vec<StubMethod>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<StubAlias>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    pub range: Range,
    /// Set on the synthetic `Object` that collects top-level definitions.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub implicit: bool,
}

impl StubNamespace {
    pub fn new(
        name: impl Into<String>,
        qualified_name: impl Into<String>,
        kind: NamespaceKind,
        range: Range,
    ) -> Self {
        Self {
            name: name.into(),
            qualified_name: qualified_name.into(),
            kind,
            superclass: None,
            mixins: Vec::new(),
            constants: Vec::new(),
            methods: Vec::new(),
            aliases: Vec::new(),
            doc: None,
            range,
            implicit: false,
        }
    }

    /// `class Foo < Bar` or `module Foo`.
    pub fn signature(&self) -> String {
        match (&self.kind, &self.superclass) {
            (NamespaceKind::Class, Some(superclass)) => {
                format!("class {} < {superclass}", self.qualified_name)
            }
            (kind, _) => format!("{} {}", kind.keyword(), self.qualified_name),
        }
    }

    /// True when the declaration carries content of its own rather than only
    /// wrapping nested namespaces.
    pub fn has_own_content(&self) -> bool {
        !self.methods.is_empty()
            || !self.constants.is_empty()
            || !self.mixins.is_empty()
            || self.superclass.is_some()
            || self.doc.is_some()
    }

    pub fn method(&self, name: &str, receiver: MethodReceiver) -> Option<&StubMethod> {
        self.methods
            .iter()
            .find(|m| m.receiver == receiver && m.answers_to(name))
    }

    pub fn constant(&self, name: &str) -> Option<&StubConstant> {
        self.constants.iter().find(|c| c.name == name)
    }

    /// The enclosing namespace path, empty at top level.
    pub fn parent_path(&self) -> &str {
        self.qualified_name
            .rsplit_once("::")
            .map(|(parent, _)| parent)
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostic {
    pub range: Range,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StubFile {
    pub path: PathBuf,
    pub file_id: FileId,
    /// Flattened in source order, outer namespaces before inner ones.
    pub namespaces: Vec<StubNamespace>,
    pub primary: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl StubFile {
    pub fn primary_namespace(&self) -> Option<&StubNamespace> {
        self.primary.and_then(|index| self.namespaces.get(index))
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Choose the namespace a file is "about".
pub fn select_primary(namespaces: &[StubNamespace]) -> Option<usize> {
    let explicit = || {
        namespaces
            .iter()
            .enumerate()
            .filter(|(_, ns)| !ns.implicit)
    };
    explicit()
        .find(|(_, ns)| ns.has_own_content())
        .or_else(|| explicit().next())
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method_with(params: Vec<StubParam>) -> StubMethod {
        let mut method = StubMethod::new("center", MethodReceiver::Instance, Range::default());
        method.params = params;
        method
    }

    #[test]
    fn signature_renders_every_param_kind() {
        let method = method_with(vec![
            StubParam::new("a", ParamKind::Required),
            StubParam::new("b", ParamKind::Optional).with_default("' '"),
            StubParam::new("rest", ParamKind::Rest),
            StubParam::new("k", ParamKind::KeywordRequired),
            StubParam::new("o", ParamKind::KeywordOptional).with_default("2"),
            StubParam::new("opts", ParamKind::KeywordRest),
            StubParam::new("blk", ParamKind::Block),
        ]);
        assert_eq!(
            method.signature(),
            "def center(a, b = ' ', *rest, k:, o: 2, **opts, &blk)"
        );
    }

    #[test]
    fn no_keywords_renders_but_is_not_a_param_name() {
        let method = method_with(vec![
            StubParam::new("a", ParamKind::Required),
            StubParam::new("", ParamKind::NoKeywords),
        ]);
        assert_eq!(method.signature(), "def center(a, **nil)");
        assert_eq!(method.param_names().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn singleton_signature_without_params() {
        let method = StubMethod::new("pwd", MethodReceiver::Singleton, Range::default());
        assert_eq!(method.signature(), "def self.pwd");
        assert_eq!(method.qualified_name("Dir"), "Dir.pwd");
    }

    #[test]
    fn aliases_answer_lookups() {
        let mut method = method_with(Vec::new());
        method.name = "to_s".to_string();
        method.aliases.push("inspect".to_string());
        assert!(method.answers_to("inspect"));
        assert!(!method.answers_to("to_str"));
    }

    #[test]
    fn primary_skips_wrapper_namespaces() {
        let wrapper = StubNamespace::new("Process", "Process", NamespaceKind::Module, Range::default());
        let mut status = StubNamespace::new(
            "Status",
            "Process::Status",
            NamespaceKind::Class,
            Range::default(),
        );
        status.superclass = Some("Object".to_string());

        assert_eq!(select_primary(&[wrapper.clone(), status]), Some(1));
        assert_eq!(select_primary(&[wrapper]), Some(0));
        assert_eq!(select_primary(&[]), None);
    }

    #[test]
    fn parent_path_of_nested_namespace() {
        let ns = StubNamespace::new("Stat", "File::Stat", NamespaceKind::Class, Range::default());
        assert_eq!(ns.parent_path(), "File");
        let top = StubNamespace::new("File", "File", NamespaceKind::Class, Range::default());
        assert_eq!(top.parent_path(), "");
    }
}
