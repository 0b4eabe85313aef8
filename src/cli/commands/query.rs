//! `lookup` and `complete` commands.

use super::report_error;
use crate::index::{HoverInfo, Snapshot};
use crate::io::ExitCode;
use crate::io::format::indent_block;
use crate::{IndexError, IndexResult};

pub fn run_lookup(snapshot: &Snapshot, query: &str, json: bool) -> ExitCode {
    match lookup(snapshot, query, json) {
        Ok(()) => ExitCode::Success,
        Err(e) => report_error(&e),
    }
}

fn lookup(snapshot: &Snapshot, query: &str, json: bool) -> IndexResult<()> {
    let info = snapshot.hover(query).ok_or_else(|| IndexError::NotFound {
        query: query.to_string(),
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        print_hover(&info);
    }
    Ok(())
}

fn print_hover(info: &HoverInfo) {
    println!("{}", info.signature);
    if let Some(owner) = &info.owner {
        println!("  defined in {owner}");
    }
    if !info.ancestors.is_empty() {
        println!("  ancestors: {}", info.ancestors.join(" < "));
    }
    if let Some(doc) = &info.doc {
        println!();
        println!("{}", indent_block(doc, "  "));
    }
}

pub fn run_complete(snapshot: &Snapshot, prefix: &str, limit: usize, json: bool) -> ExitCode {
    let items = snapshot.complete(prefix, limit);
    if json {
        return match serde_json::to_string_pretty(&items) {
            Ok(text) => {
                println!("{text}");
                ExitCode::Success
            }
            Err(e) => report_error(&IndexError::from(e)),
        };
    }

    if items.is_empty() {
        eprintln!("No completions for '{prefix}'");
        return ExitCode::NotFound;
    }
    let width = items.iter().map(|c| c.label.len()).max().unwrap_or(0);
    for item in &items {
        println!("{:<width$}  {}", item.label, item.detail);
    }
    ExitCode::Success
}
