//! Command-line interface definitions.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rubystubs")]
#[command(version, about = "Index, query and lint Ruby standard-library stubs")]
pub struct Cli {
    /// Settings file to use instead of .rubystubs/settings.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Snapshot to query, by tag (rubystubs33) or version (3.3)
    #[arg(short, long, global = true)]
    pub snapshot: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create .rubystubs/settings.toml with default settings
    Init {
        /// Overwrite an existing settings file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective settings
    Config,

    /// List the snapshots found under the stubs root
    Versions,

    /// Load every snapshot and report what was indexed
    Index,

    /// Show the signature and documentation of a symbol
    #[command(
        after_help = "Examples:\n  rubystubs lookup String\n  rubystubs lookup 'String#center'\n  rubystubs lookup File.exist?\n  rubystubs lookup File::SEPARATOR"
    )]
    Lookup {
        /// `Name`, `Name#method`, `Name.method` or `Name::CONSTANT`
        query: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Complete a namespace, constant or method prefix
    Complete {
        /// `Str`, `File::SE`, `String#ce` or `File.ex`
        prefix: String,

        /// Maximum number of results (defaults to completion.max_results)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check the snapshot for corpus consistency problems
    Lint {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the merged symbol table as JSON
    Dump {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report which syntax nodes of a stub file the parser handles
    Audit {
        /// Stub file to audit
        file: PathBuf,
    },
}
