//! Index and lint the Ruby standard-library stub corpus.
//!
//! Stub files under `vsix/stubs/<snapshot>/` are parsed with tree-sitter into
//! a per-version symbol table that answers hover, completion and ancestor
//! queries, and that the linter checks for consistency.

pub mod cli;
pub mod config;
pub mod error;
pub mod index;
pub mod io;
pub mod lint;
pub mod logging;
pub mod parsing;
pub mod symbol;
pub mod types;

pub use config::Settings;
pub use error::{IndexError, IndexResult};
pub use index::{Snapshot, StubCorpus};
pub use symbol::{
    MethodReceiver, Mixin, MixinKind, NamespaceKind, ParamKind, StubAlias, StubConstant, StubFile,
    StubMethod, StubNamespace, StubParam,
};
pub use types::{FileId, Range, Visibility};
