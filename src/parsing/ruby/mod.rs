//! Ruby stub parsing
//!
//! Turns standard-library stub files into declaration records for the
//! symbol table.
//!
//! ## Recognized declarations
//! - **Namespaces**: `class Name < Superclass`, `module Name`, scoped names
//! - **Mixins**: `include`, `extend`, `prepend`
//! - **Methods**: `def name(params)`, `def self.name`, `class << self`,
//!   `module_function`, `attr_*`
//! - **Aliases**: `alias new old`, `alias_method :new, :old`
//! - **Constants**: `CONST = _`
//! - **Docs**: whole-line comments directly above a declaration

pub mod audit;
pub mod doc;
pub mod naming;
pub mod parser;
pub mod resolution;

pub use audit::{AuditError, RubyStubAudit};
pub use parser::RubyStubParser;
pub use resolution::{AncestorResolver, ParentKind};
