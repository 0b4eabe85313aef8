//! `versions` and `index` commands.

use crate::index::{Snapshot, StubCorpus};
use crate::io::ExitCode;

pub fn run_versions(corpus: &StubCorpus, selected: Option<&Snapshot>) -> ExitCode {
    println!("Stubs root: {}", corpus.root().display());
    println!();
    println!(
        "  {:<20} {:>8} {:>7} {:>11} {:>8}",
        "SNAPSHOT", "VERSION", "FILES", "NAMESPACES", "METHODS"
    );
    for snapshot in corpus.snapshots() {
        let marker = if selected.is_some_and(|s| std::ptr::eq(s, snapshot)) {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {:<20} {:>8} {:>7} {:>11} {:>8}",
            snapshot.tag,
            snapshot.display_version(),
            snapshot.files.len(),
            snapshot.namespace_count(),
            snapshot.method_count()
        );
    }
    ExitCode::Success
}

pub fn run_index(corpus: &StubCorpus) -> ExitCode {
    let mut files = 0;
    let mut load_errors = 0;
    let mut parse_errors = 0;

    for snapshot in corpus.snapshots() {
        let with_errors = snapshot.files.iter().filter(|f| f.has_errors()).count();
        println!(
            "{} ({}): {} files, {} namespaces, {} methods",
            snapshot.tag,
            snapshot.display_version(),
            snapshot.files.len(),
            snapshot.namespace_count(),
            snapshot.method_count()
        );
        if with_errors > 0 {
            println!("  {with_errors} file(s) with syntax errors (run 'rubystubs lint')");
        }
        for error in &snapshot.load_errors {
            println!("  ✗ {}: {}", error.path.display(), error.message);
        }

        files += snapshot.files.len();
        load_errors += snapshot.load_errors.len();
        parse_errors += with_errors;
    }

    println!();
    println!(
        "Indexed {files} file(s) in {} snapshot(s); {load_errors} unreadable, {parse_errors} with syntax errors",
        corpus.snapshots().len()
    );
    ExitCode::Success
}
