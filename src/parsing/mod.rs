pub mod parser;
pub mod ruby;

pub use parser::{
    HandledNode, NodeTracker, NodeTrackingState, check_recursion_depth, safe_truncate_str,
    truncate_for_display,
};
pub use ruby::{AncestorResolver, ParentKind, RubyStubParser};
