//! Ruby stub parser
//!
//! Uses tree-sitter-ruby to turn a stub file into [`StubNamespace`] records:
//! classes and modules with their superclass, mixins, constants, methods,
//! aliases and doc comments. Visibility modifiers, `class << self` and
//! `module_function` are tracked per namespace frame.

use super::doc::CommentIndex;
use crate::parsing::parser::{
    HandledNode, NodeTracker, NodeTrackingState, check_recursion_depth, truncate_for_display,
};
use crate::symbol::{
    Mixin, MixinKind, MethodReceiver, NamespaceKind, ParamKind, ParseDiagnostic, StubAlias,
    StubConstant, StubFile, StubMethod, StubNamespace, StubParam, select_primary,
};
use crate::types::{FileId, Range, Visibility};
use std::collections::HashSet;
use std::path::Path;
use tree_sitter::{Node, Parser};

/// Name of the namespace that receives top-level definitions.
const TOP_LEVEL_NAMESPACE: &str = "Object";

/// Positions past `u32::MAX` saturate.
fn range_from_node(node: &Node) -> Range {
    let clamp = |value: usize| u32::try_from(value).unwrap_or(u32::MAX);
    let start = node.start_position();
    let end = node.end_position();
    Range::new(
        clamp(start.row),
        clamp(start.column),
        clamp(end.row),
        clamp(end.column),
    )
}

fn node_text<'a>(node: Node, code: &'a str) -> &'a str {
    &code[node.byte_range()]
}

/// Strip symbol and string quoting from a method name reference.
fn method_name_from(node: Node, code: &str) -> Option<String> {
    let text = node_text(node, code);
    let name = match node.kind() {
        "simple_symbol" | "hash_key_symbol" => text.trim_start_matches(':'),
        "delimited_symbol" => text
            .trim_start_matches(':')
            .trim_matches(|c| c == '"' || c == '\''),
        "string" | "bare_string" => text.trim_matches(|c| c == '"' || c == '\''),
        "identifier" | "constant" | "operator" | "setter" => text,
        _ => return None,
    };
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Lexical scope while walking a namespace body.
#[derive(Debug, Clone, Copy)]
struct Frame {
    namespace: usize,
    visibility: Visibility,
    /// Inside `class << self`.
    singleton: bool,
    /// After a bare `module_function`.
    module_function: bool,
}

impl Frame {
    fn new(namespace: usize) -> Self {
        Self {
            namespace,
            visibility: Visibility::Public,
            singleton: false,
            module_function: false,
        }
    }

    fn receiver(&self) -> MethodReceiver {
        if self.singleton || self.module_function {
            MethodReceiver::Singleton
        } else {
            MethodReceiver::Instance
        }
    }
}

/// Mutable state for one parse.
struct ParseState<'a> {
    code: &'a str,
    comments: CommentIndex<'a>,
    namespaces: Vec<StubNamespace>,
    frames: Vec<Frame>,
    top_level: Option<usize>,
}

impl<'a> ParseState<'a> {
    fn current_path(&self) -> &str {
        self.frames
            .last()
            .map(|frame| self.namespaces[frame.namespace].qualified_name.as_str())
            .unwrap_or("")
    }

    /// The innermost frame, or the private top-level frame.
    fn current_frame(&mut self) -> Frame {
        match self.frames.last() {
            Some(frame) => *frame,
            None => {
                let namespace = self.top_level_namespace();
                Frame {
                    visibility: Visibility::Private,
                    ..Frame::new(namespace)
                }
            }
        }
    }

    fn top_level_namespace(&mut self) -> usize {
        if let Some(index) = self.top_level {
            return index;
        }
        let mut object = StubNamespace::new(
            TOP_LEVEL_NAMESPACE,
            TOP_LEVEL_NAMESPACE,
            NamespaceKind::Class,
            Range::default(),
        );
        object.implicit = true;
        self.namespaces.push(object);
        let index = self.namespaces.len() - 1;
        self.top_level = Some(index);
        index
    }

    fn set_visibility(&mut self, visibility: Visibility) {
        if let Some(frame) = self.frames.last_mut() {
            frame.visibility = visibility;
            frame.module_function = false;
        }
    }

    fn enable_module_function(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.module_function = true;
        }
    }
}

/// Parser for Ruby standard-library stub files.
pub struct RubyStubParser {
    parser: Parser,
    node_tracker: NodeTrackingState,
}

impl RubyStubParser {
    pub fn new() -> Result<Self, String> {
        let mut parser = Parser::new();
        let lang = tree_sitter_ruby::LANGUAGE;
        parser
            .set_language(&lang.into())
            .map_err(|e| format!("Failed to set Ruby language: {e}"))?;

        Ok(Self {
            parser,
            node_tracker: NodeTrackingState::new(),
        })
    }

    /// Parse a stub file read from `path`.
    pub fn parse_file(&mut self, path: &Path, code: &str, file_id: FileId) -> StubFile {
        let mut file = self.parse_code(code, file_id);
        file.path = path.to_path_buf();
        file
    }

    /// Parse stub source that has no backing file.
    ///
    /// Handled node kinds are reset, so they describe this parse only.
    pub fn parse_code(&mut self, code: &str, file_id: FileId) -> StubFile {
        self.node_tracker.clear();
        let mut file = StubFile {
            path: Default::default(),
            file_id,
            namespaces: Vec::new(),
            primary: None,
            diagnostics: Vec::new(),
        };

        let Some(tree) = self.parser.parse(code, None) else {
            file.diagnostics.push(ParseDiagnostic {
                range: Range::default(),
                message: "parser produced no syntax tree".to_string(),
            });
            return file;
        };

        let root = tree.root_node();
        let mut state = ParseState {
            code,
            comments: CommentIndex::build(root, code),
            namespaces: Vec::new(),
            frames: Vec::new(),
            top_level: None,
        };

        self.visit(&mut state, root, 0);

        let mut namespaces = state.namespaces;
        for namespace in &mut namespaces {
            attach_aliases(namespace);
        }

        file.primary = select_primary(&namespaces);
        file.namespaces = namespaces;
        file.diagnostics = collect_syntax_errors(root, code);

        tracing::debug!(
            target: "parser",
            "parsed {} namespace(s), {} diagnostic(s)",
            file.namespaces.len(),
            file.diagnostics.len()
        );
        file
    }

    fn visit(&mut self, state: &mut ParseState, node: Node, depth: usize) {
        if !check_recursion_depth(depth, node) {
            return;
        }

        match node.kind() {
            "class" | "module" => {
                self.register_handled_node(node.kind(), node.kind_id());
                self.process_namespace(state, node, depth);
            }
            "singleton_class" => {
                self.register_handled_node("singleton_class", node.kind_id());
                self.process_singleton_class(state, node, depth);
            }
            "method" => {
                self.register_handled_node("method", node.kind_id());
                let frame = state.current_frame();
                self.process_method(state, node, frame.receiver(), frame);
            }
            "singleton_method" => {
                self.register_handled_node("singleton_method", node.kind_id());
                let frame = state.current_frame();
                self.process_method(state, node, MethodReceiver::Singleton, frame);
            }
            "assignment" => {
                self.register_handled_node("assignment", node.kind_id());
                self.process_assignment(state, node);
            }
            "alias" => {
                self.register_handled_node("alias", node.kind_id());
                self.process_alias(state, node);
            }
            "call" => {
                self.register_handled_node("call", node.kind_id());
                self.process_call(state, node, depth);
            }
            "comment" => {
                self.register_handled_node("comment", node.kind_id());
            }
            "body_statement" | "program" => {
                self.register_handled_node(node.kind(), node.kind_id());
                for child in node.children(&mut node.walk()) {
                    // Bare modifiers appear as plain identifier nodes
                    if child.kind() == "identifier"
                        && self.process_bare_modifier(state, node_text(child, state.code))
                    {
                        self.register_handled_node("identifier", child.kind_id());
                        continue;
                    }
                    self.visit(state, child, depth + 1);
                }
            }
            _ => {
                for child in node.children(&mut node.walk()) {
                    self.visit(state, child, depth + 1);
                }
            }
        }
    }

    fn process_namespace(&mut self, state: &mut ParseState, node: Node, depth: usize) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = node_text(name_node, state.code).to_string();
        let qualified_name = if let Some(absolute) = name.strip_prefix("::") {
            absolute.to_string()
        } else if state.current_path().is_empty() {
            name.clone()
        } else {
            format!("{}::{name}", state.current_path())
        };

        let kind = if node.kind() == "class" {
            NamespaceKind::Class
        } else {
            NamespaceKind::Module
        };

        let mut namespace =
            StubNamespace::new(name, qualified_name, kind, range_from_node(&node));
        namespace.doc = state.comments.doc_for(node.start_position().row);
        if kind == NamespaceKind::Class {
            namespace.superclass = self.extract_superclass(node, state.code);
        }

        state.namespaces.push(namespace);
        let index = state.namespaces.len() - 1;
        state.frames.push(Frame::new(index));

        if let Some(body) = node.child_by_field_name("body") {
            self.visit(state, body, depth + 1);
        }

        state.frames.pop();
    }

    fn process_singleton_class(&mut self, state: &mut ParseState, node: Node, depth: usize) {
        let target = node
            .child_by_field_name("value")
            .map(|value| node_text(value, state.code))
            .unwrap_or("");
        if target != "self" {
            tracing::debug!(
                target: "parser",
                "skipping `class << {target}` at line {}",
                node.start_position().row + 1
            );
            return;
        }

        let outer = state.current_frame();
        state.frames.push(Frame {
            singleton: true,
            ..Frame::new(outer.namespace)
        });
        if let Some(body) = node.child_by_field_name("body") {
            self.visit(state, body, depth + 1);
        }
        state.frames.pop();
    }

    fn process_method(
        &mut self,
        state: &mut ParseState,
        node: Node,
        receiver: MethodReceiver,
        frame: Frame,
    ) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = node_text(name_node, state.code).to_string();

        let mut method = StubMethod::new(name, receiver, range_from_node(&node));
        method.visibility = if frame.module_function {
            Visibility::Public
        } else {
            frame.visibility
        };
        method.params = self.extract_params(node, state.code);
        method.doc = state.comments.doc_for(node.start_position().row);

        state.namespaces[frame.namespace].methods.push(method);
    }

    fn process_assignment(&mut self, state: &mut ParseState, node: Node) {
        let Some(left) = node.child_by_field_name("left") else {
            return;
        };
        let name = match left.kind() {
            "constant" => node_text(left, state.code),
            "scope_resolution" => left
                .child_by_field_name("name")
                .map(|n| node_text(n, state.code))
                .unwrap_or_else(|| node_text(left, state.code)),
            _ => return,
        };
        let value = node
            .child_by_field_name("right")
            .map(|right| node_text(right, state.code).trim().to_string())
            .unwrap_or_default();

        let constant = StubConstant {
            name: name.to_string(),
            value,
            doc: state.comments.doc_for(node.start_position().row),
            range: range_from_node(&node),
        };
        let frame = state.current_frame();
        state.namespaces[frame.namespace].constants.push(constant);
    }

    fn process_alias(&mut self, state: &mut ParseState, node: Node) {
        let mut cursor = node.walk();
        let names: Vec<Node> = node.named_children(&mut cursor).collect();
        // `alias $new $old` aliases globals, not methods
        if names.iter().any(|n| n.kind() == "global_variable") {
            return;
        }
        let (Some(new_name), Some(original)) = (
            names.first().and_then(|n| method_name_from(*n, state.code)),
            names.get(1).and_then(|n| method_name_from(*n, state.code)),
        ) else {
            return;
        };
        self.push_alias(state, new_name, original, range_from_node(&node));
    }

    fn push_alias(
        &mut self,
        state: &mut ParseState,
        new_name: String,
        original: String,
        range: Range,
    ) {
        let frame = state.current_frame();
        let receiver = if frame.singleton {
            MethodReceiver::Singleton
        } else {
            MethodReceiver::Instance
        };
        state.namespaces[frame.namespace].aliases.push(StubAlias {
            new_name,
            original,
            receiver,
            range,
        });
    }

    fn process_call(&mut self, state: &mut ParseState, node: Node, depth: usize) {
        // Declarations are receiver-less calls such as `include Comparable`
        if node.child_by_field_name("receiver").is_some() {
            return;
        }
        let Some(method_node) = node.child_by_field_name("method") else {
            return;
        };
        let method_name = node_text(method_node, state.code).to_string();
        let arguments = self.call_arguments(node);

        match method_name.as_str() {
            "include" | "extend" | "prepend" => {
                if let Some(kind) = MixinKind::from_method(&method_name) {
                    self.process_mixin(state, node, &arguments, kind);
                }
            }
            "attr_accessor" | "attr_reader" | "attr_writer" => {
                self.process_attr_metaprogramming(state, &arguments, &method_name);
            }
            "private" | "protected" | "public" => {
                let visibility = match method_name.as_str() {
                    "private" => Visibility::Private,
                    "protected" => Visibility::Protected,
                    _ => Visibility::Public,
                };
                if arguments.is_empty() {
                    state.set_visibility(visibility);
                } else {
                    self.apply_visibility_to(state, &arguments, visibility, depth);
                }
            }
            "module_function" => {
                if arguments.is_empty() {
                    state.enable_module_function();
                } else {
                    self.move_to_singleton(state, &arguments);
                }
            }
            "alias_method" => {
                let names: Vec<String> = arguments
                    .iter()
                    .filter_map(|arg| method_name_from(*arg, state.code))
                    .collect();
                if let [new_name, original] = names.as_slice() {
                    self.push_alias(
                        state,
                        new_name.clone(),
                        original.clone(),
                        range_from_node(&node),
                    );
                }
            }
            _ => {
                for arg in arguments {
                    self.visit(state, arg, depth + 1);
                }
            }
        }
    }

    fn call_arguments<'t>(&self, node: Node<'t>) -> Vec<Node<'t>> {
        match node.child_by_field_name("arguments") {
            Some(args) => {
                let mut cursor = args.walk();
                args.named_children(&mut cursor)
                    .filter(|n| n.kind() != "comment")
                    .collect()
            }
            None => Vec::new(),
        }
    }

    fn process_mixin(
        &mut self,
        state: &mut ParseState,
        node: Node,
        arguments: &[Node],
        kind: MixinKind,
    ) {
        let frame = state.current_frame();
        for arg in arguments {
            if matches!(arg.kind(), "constant" | "scope_resolution") {
                let mixin = Mixin {
                    kind,
                    name: node_text(*arg, state.code).to_string(),
                    range: range_from_node(&node),
                };
                state.namespaces[frame.namespace].mixins.push(mixin);
            }
        }
    }

    fn process_attr_metaprogramming(
        &mut self,
        state: &mut ParseState,
        arguments: &[Node],
        attr_type: &str,
    ) {
        let frame = state.current_frame();
        let receiver = frame.receiver();

        for arg in arguments {
            let Some(attr_name) = method_name_from(*arg, state.code) else {
                continue;
            };
            let range = range_from_node(arg);

            if attr_type == "attr_accessor" || attr_type == "attr_reader" {
                let mut reader = StubMethod::new(attr_name.clone(), receiver, range);
                reader.visibility = frame.visibility;
                state.namespaces[frame.namespace].methods.push(reader);
            }

            if attr_type == "attr_accessor" || attr_type == "attr_writer" {
                let mut writer = StubMethod::new(format!("{attr_name}="), receiver, range);
                writer.visibility = frame.visibility;
                writer.params = vec![StubParam::new("value", ParamKind::Required)];
                state.namespaces[frame.namespace].methods.push(writer);
            }
        }
    }

    /// `private :foo, :bar` or `private def foo; end`.
    fn apply_visibility_to(
        &mut self,
        state: &mut ParseState,
        arguments: &[Node],
        visibility: Visibility,
        depth: usize,
    ) {
        let frame = state.current_frame();
        for arg in arguments {
            let target = if matches!(arg.kind(), "method" | "singleton_method") {
                let before = state.namespaces[frame.namespace].methods.len();
                self.visit(state, *arg, depth + 1);
                let methods = &state.namespaces[frame.namespace].methods;
                if methods.len() > before {
                    methods.last().map(|m| m.name.clone())
                } else {
                    None
                }
            } else {
                method_name_from(*arg, state.code)
            };

            let Some(target) = target else {
                continue;
            };
            let receiver = frame.receiver();
            if let Some(method) = state.namespaces[frame.namespace]
                .methods
                .iter_mut()
                .rev()
                .find(|m| m.name == target && m.receiver == receiver)
            {
                method.visibility = visibility;
            }
        }
    }

    /// `module_function :foo` turns existing instance methods into public
    /// singletons, the same as a bare `module_function` above their `def`.
    fn move_to_singleton(&mut self, state: &mut ParseState, arguments: &[Node]) {
        let frame = state.current_frame();
        for arg in arguments {
            let Some(target) = method_name_from(*arg, state.code) else {
                continue;
            };
            if let Some(method) = state.namespaces[frame.namespace]
                .methods
                .iter_mut()
                .find(|m| m.name == target && m.receiver == MethodReceiver::Instance)
            {
                method.receiver = MethodReceiver::Singleton;
                method.visibility = Visibility::Public;
            }
        }
    }

    /// Returns true when `text` was a bare modifier and has been applied.
    fn process_bare_modifier(&mut self, state: &mut ParseState, text: &str) -> bool {
        match text {
            "private" => state.set_visibility(Visibility::Private),
            "protected" => state.set_visibility(Visibility::Protected),
            "public" => state.set_visibility(Visibility::Public),
            "module_function" => state.enable_module_function(),
            _ => return false,
        }
        true
    }

    fn extract_superclass(&self, node: Node, code: &str) -> Option<String> {
        let superclass_node = node.child_by_field_name("superclass")?;
        // The superclass field wraps "< ClassName"
        for child in superclass_node.children(&mut superclass_node.walk()) {
            if matches!(child.kind(), "constant" | "scope_resolution") {
                return Some(node_text(child, code).to_string());
            }
        }
        let text = node_text(superclass_node, code).trim();
        let text = text.strip_prefix('<').unwrap_or(text).trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }

    fn extract_params(&mut self, node: Node, code: &str) -> Vec<StubParam> {
        let Some(params_node) = node.child_by_field_name("parameters") else {
            return Vec::new();
        };
        self.register_handled_node(params_node.kind(), params_node.kind_id());

        let mut params = Vec::new();
        let mut cursor = params_node.walk();
        for child in params_node.named_children(&mut cursor) {
            if let Some(param) = param_from_node(child, code) {
                self.register_handled_node(child.kind(), child.kind_id());
                params.push(param);
            } else if child.kind() != "comment" {
                tracing::debug!(
                    target: "parser",
                    "unhandled parameter node '{}' at line {}",
                    child.kind(),
                    child.start_position().row + 1
                );
            }
        }
        params
    }
}

fn param_from_node(node: Node, code: &str) -> Option<StubParam> {
    let field = |name: &str| {
        node.child_by_field_name(name)
            .map(|n| node_text(n, code).to_string())
    };
    let name = field("name").unwrap_or_default();

    let param = match node.kind() {
        "identifier" => StubParam::new(node_text(node, code), ParamKind::Required),
        "optional_parameter" => {
            let param = StubParam::new(name, ParamKind::Optional);
            match field("value") {
                Some(value) => param.with_default(value),
                None => param,
            }
        }
        "keyword_parameter" => match field("value") {
            Some(value) => StubParam::new(name, ParamKind::KeywordOptional).with_default(value),
            None => StubParam::new(name, ParamKind::KeywordRequired),
        },
        "splat_parameter" => StubParam::new(name, ParamKind::Rest),
        "hash_splat_parameter" => StubParam::new(name, ParamKind::KeywordRest),
        "hash_splat_nil" => StubParam::new("", ParamKind::NoKeywords),
        "block_parameter" => StubParam::new(name, ParamKind::Block),
        "forward_parameter" => StubParam::new("", ParamKind::Forward),
        "destructured_parameter" => StubParam::new(node_text(node, code), ParamKind::Destructured),
        _ => return None,
    };
    Some(param)
}

/// Resolve raw alias declarations onto the methods they name.
fn attach_aliases(namespace: &mut StubNamespace) {
    for alias in &namespace.aliases {
        if let Some(method) = namespace
            .methods
            .iter_mut()
            .find(|m| m.receiver == alias.receiver && m.name == alias.original)
        {
            if !method.aliases.contains(&alias.new_name) {
                method.aliases.push(alias.new_name.clone());
            }
        }
    }
}

fn collect_syntax_errors(root: Node, code: &str) -> Vec<ParseDiagnostic> {
    let mut diagnostics = Vec::new();
    if !root.has_error() {
        return diagnostics;
    }

    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() {
            diagnostics.push(ParseDiagnostic {
                range: range_from_node(&node),
                message: format!(
                    "syntax error near `{}`",
                    truncate_for_display(node_text(node, code).trim(), 40)
                ),
            });
            continue;
        }
        if node.is_missing() {
            diagnostics.push(ParseDiagnostic {
                range: range_from_node(&node),
                message: format!("missing `{}`", node.kind()),
            });
            continue;
        }
        if node.has_error() {
            for child in node.children(&mut node.walk()) {
                stack.push(child);
            }
        }
    }

    diagnostics.sort_by_key(|d| (d.range.start_line, d.range.start_column));
    diagnostics
}

impl NodeTracker for RubyStubParser {
    fn get_handled_nodes(&self) -> &HashSet<HandledNode> {
        self.node_tracker.get_handled_nodes()
    }

    fn register_handled_node(&mut self, node_kind: &str, node_id: u16) {
        self.node_tracker.register_handled_node(node_kind, node_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(code: &str) -> StubFile {
        let mut parser = RubyStubParser::new().unwrap();
        parser.parse_code(code, FileId::new(1).unwrap())
    }

    fn namespace<'f>(file: &'f StubFile, name: &str) -> &'f StubNamespace {
        file.namespaces
            .iter()
            .find(|ns| ns.qualified_name == name)
            .unwrap_or_else(|| panic!("namespace {name} not found"))
    }

    #[test]
    fn test_parse_class_with_superclass_and_mixins() {
        let file = parse(
            r#"
# A String object holds and manipulates an arbitrary sequence of bytes.
class String < Object
  include Comparable

  def center(width, padstr = ' ')
  end
end
"#,
        );

        let string = namespace(&file, "String");
        assert_eq!(string.kind, NamespaceKind::Class);
        assert_eq!(string.superclass.as_deref(), Some("Object"));
        assert_eq!(string.mixins.len(), 1);
        assert_eq!(string.mixins[0].kind, MixinKind::Include);
        assert_eq!(string.mixins[0].name, "Comparable");
        assert!(string.doc.as_deref().unwrap().contains("sequence of bytes"));

        let center = string
            .method("center", MethodReceiver::Instance)
            .unwrap();
        assert_eq!(center.signature(), "def center(width, padstr = ' ')");
        assert_eq!(file.primary, Some(0));
    }

    #[test]
    fn test_parse_singleton_methods() {
        let file = parse(
            r#"
class File
  def self.exist?(file_name)
  end

  class << self
    def basename(file_name, suffix = nil)
    end
  end

  def path
  end
end
"#,
        );

        let file_ns = namespace(&file, "File");
        assert!(file_ns.method("exist?", MethodReceiver::Singleton).is_some());
        assert!(file_ns.method("basename", MethodReceiver::Singleton).is_some());
        assert!(file_ns.method("path", MethodReceiver::Instance).is_some());
        assert!(file_ns.method("path", MethodReceiver::Singleton).is_none());
    }

    #[test]
    fn test_parse_param_kinds() {
        let file = parse(
            r#"
module Kernel
  def sample(a, b = 1, *rest, key:, opt: 2, **opts, &blk)
  end

  def forward(...)
  end
end
"#,
        );

        let kernel = namespace(&file, "Kernel");
        let sample = kernel.method("sample", MethodReceiver::Instance).unwrap();
        let kinds: Vec<ParamKind> = sample.params.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ParamKind::Required,
                ParamKind::Optional,
                ParamKind::Rest,
                ParamKind::KeywordRequired,
                ParamKind::KeywordOptional,
                ParamKind::KeywordRest,
                ParamKind::Block,
            ]
        );
        assert_eq!(sample.params[1].default.as_deref(), Some("1"));
        assert_eq!(sample.params[4].default.as_deref(), Some("2"));

        let forward = kernel.method("forward", MethodReceiver::Instance).unwrap();
        assert_eq!(forward.params[0].kind, ParamKind::Forward);
    }

    #[test]
    fn test_columns_beyond_u16() {
        let code = format!("{}class Foo\nend\n", " ".repeat(70_000));
        let file = parse(&code);
        assert_eq!(namespace(&file, "Foo").range.start_column, 70_000);
    }

    #[test]
    fn test_no_keywords_parameter() {
        let file = parse("class BasicObject\n  def foo(a, **nil)\n  end\nend\n");
        let foo = namespace(&file, "BasicObject")
            .method("foo", MethodReceiver::Instance)
            .unwrap();
        assert_eq!(foo.params[1].kind, ParamKind::NoKeywords);
        assert_eq!(foo.signature(), "def foo(a, **nil)");
    }

    #[test]
    fn test_alias_attaches_to_original() {
        let file = parse(
            r#"
class Array
  def to_s
  end
  alias inspect to_s
  alias_method :to_str, :to_s
  alias missing nothing_here
end
"#,
        );

        let array = namespace(&file, "Array");
        let to_s = array.method("to_s", MethodReceiver::Instance).unwrap();
        assert_eq!(to_s.aliases, vec!["inspect".to_string(), "to_str".to_string()]);
        assert!(array.method("inspect", MethodReceiver::Instance).is_some());
        assert_eq!(array.aliases.len(), 3);
        assert_eq!(array.aliases[2].original, "nothing_here");
    }

    #[test]
    fn test_constants_keep_placeholder_and_docs() {
        let file = parse(
            r#"
class File
  # platform specific alternative separator
  ALT_SEPARATOR = _
  SEPARATOR = _
end
"#,
        );

        let file_ns = namespace(&file, "File");
        let alt = file_ns.constant("ALT_SEPARATOR").unwrap();
        assert_eq!(alt.value, "_");
        assert_eq!(
            alt.doc.as_deref(),
            Some("platform specific alternative separator")
        );
        assert!(file_ns.constant("SEPARATOR").unwrap().doc.is_none());
    }

    #[test]
    fn test_nested_namespaces_are_qualified() {
        let file = parse(
            r#"
module Process
  # Process::Status encapsulates the information on the status of a process.
  class Status
    def exitstatus
    end
  end
end

class File::Stat
end
"#,
        );

        assert!(file.namespaces.iter().any(|ns| ns.qualified_name == "Process"));
        let status = namespace(&file, "Process::Status");
        assert_eq!(status.name, "Status");
        assert_eq!(status.parent_path(), "Process");
        assert_eq!(
            file.primary_namespace().map(|ns| ns.qualified_name.as_str()),
            Some("Process::Status")
        );

        let stat = namespace(&file, "File::Stat");
        assert_eq!(stat.name, "File::Stat");
    }

    #[test]
    fn test_visibility_tracking() {
        let file = parse(
            r#"
class Service
  def visible
  end

  private

  def hidden
  end

  protected

  def guarded
  end

  public

  def shown
  end

  def later
  end
  private :later
end
"#,
        );

        let service = namespace(&file, "Service");
        let vis = |name: &str| {
            service
                .method(name, MethodReceiver::Instance)
                .unwrap()
                .visibility
        };
        assert_eq!(vis("visible"), Visibility::Public);
        assert_eq!(vis("hidden"), Visibility::Private);
        assert_eq!(vis("guarded"), Visibility::Protected);
        assert_eq!(vis("shown"), Visibility::Public);
        assert_eq!(vis("later"), Visibility::Private);
    }

    #[test]
    fn test_module_function() {
        let file = parse(
            r#"
module Math
  module_function

  def sqrt(x)
  end
end

module Helpers
  def util
  end
  module_function :util
end
"#,
        );

        let math = namespace(&file, "Math");
        assert!(math.method("sqrt", MethodReceiver::Singleton).is_some());

        assert!(math.method("sqrt", MethodReceiver::Instance).is_none());

        let helpers = namespace(&file, "Helpers");
        assert!(helpers.method("util", MethodReceiver::Instance).is_none());
        let util = helpers.method("util", MethodReceiver::Singleton).unwrap();
        assert_eq!(util.visibility, Visibility::Public);
    }

    #[test]
    fn test_attr_accessor_generates_methods() {
        let file = parse(
            r#"
class Person
  attr_accessor :name
  attr_reader :id
end
"#,
        );

        let person = namespace(&file, "Person");
        assert!(person.method("name", MethodReceiver::Instance).is_some());
        let writer = person.method("name=", MethodReceiver::Instance).unwrap();
        assert_eq!(writer.params.len(), 1);
        assert!(person.method("id", MethodReceiver::Instance).is_some());
        assert!(person.method("id=", MethodReceiver::Instance).is_none());
    }

    #[test]
    fn test_top_level_definitions_go_to_object() {
        let file = parse(
            r#"
ARGV = _

def puts(*args)
end
"#,
        );

        let object = namespace(&file, "Object");
        assert!(object.implicit);
        assert!(object.constant("ARGV").is_some());
        let puts = object.method("puts", MethodReceiver::Instance).unwrap();
        assert_eq!(puts.visibility, Visibility::Private);
        assert_eq!(file.primary, None);
    }

    #[test]
    fn test_method_doc_comment() {
        let file = parse(
            r#"
class Integer
  # Returns the absolute value of +int+.
  #
  #    -12345.abs   #=> 12345
  def abs
  end
end
"#,
        );

        let integer = namespace(&file, "Integer");
        let abs = integer.method("abs", MethodReceiver::Instance).unwrap();
        assert_eq!(
            abs.doc.as_deref(),
            Some("Returns the absolute value of +int+.\n\n   -12345.abs   #=> 12345")
        );
    }

    #[test]
    fn test_syntax_errors_are_reported() {
        let file = parse(
            r#"
class Broken
  def ok
  end
end
end
"#,
        );

        assert!(file.has_errors());
        assert!(!file.diagnostics[0].message.is_empty());
        assert!(file.namespaces.iter().any(|ns| ns.qualified_name == "Broken"));
    }

    #[test]
    fn test_operator_methods() {
        let file = parse(
            r#"
class Integer
  def +(other)
  end

  def [](index)
  end

  def <=>(other)
  end
end
"#,
        );

        let integer = namespace(&file, "Integer");
        for op in ["+", "[]", "<=>"] {
            assert!(
                integer.method(op, MethodReceiver::Instance).is_some(),
                "missing operator {op}"
            );
        }
    }
}
