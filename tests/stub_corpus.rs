//! End-to-end: load a two-version corpus from disk, query it and lint it.

use rubystubs::config::Settings;
use rubystubs::index::{StubCorpus, SymbolKind};
use rubystubs::lint::{Linter, Rule, has_errors};
use rubystubs::{IndexError, MethodReceiver, Visibility};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn build_corpus() -> TempDir {
    let temp = TempDir::new().unwrap();
    let stubs = temp.path().join("vsix/stubs");

    write(
        &stubs,
        "rubystubs27/string.rb",
        "# frozen_string_literal: true\n\n# A String object holds bytes.\nclass String\n  def center(width)\n  end\nend\n",
    );

    write(
        &stubs,
        "rubystubs33/basic_object.rb",
        "class BasicObject\n  def __send__(name, *args)\n  end\nend\n",
    );
    write(
        &stubs,
        "rubystubs33/object.rb",
        "class Object < BasicObject\n  include Kernel\nend\n",
    );
    write(
        &stubs,
        "rubystubs33/kernel.rb",
        concat!(
            "module Kernel\n",
            "  module_function\n",
            "\n",
            "  # Prints to stdout.\n",
            "  #\n",
            "  # @param args [Array] objects to print\n",
            "  def puts(*args)\n",
            "  end\n",
            "end\n",
        ),
    );
    write(
        &stubs,
        "rubystubs33/string.rb",
        concat!(
            "# A String object holds and manipulates bytes.\n",
            "#\n",
            "#   s = String.new('x')\n",
            "class String\n",
            "  include Comparable\n",
            "\n",
            "  # Centers +self+ in a string of +width+ characters.\n",
            "  #\n",
            "  # @param width [Integer]\n",
            "  # @param padstr [String]\n",
            "  def center(width, padstr = ' ')\n",
            "  end\n",
            "\n",
            "  def length\n",
            "  end\n",
            "  alias size length\n",
            "\n",
            "  def self.try_convert(object)\n",
            "  end\n",
            "\n",
            "  private\n",
            "\n",
            "  def initialize_copy(other)\n",
            "  end\n",
            "end\n",
        ),
    );
    write(
        &stubs,
        "rubystubs33/process/status.rb",
        concat!(
            "module Process\n",
            "  class Status\n",
            "    # Exit status of the process.\n",
            "    def exitstatus\n",
            "    end\n",
            "  end\n",
            "end\n",
        ),
    );
    write(
        &stubs,
        "rubystubs33/file.rb",
        concat!(
            "class File < IO\n",
            "  # Separates path components.\n",
            "  SEPARATOR = _\n",
            "\n",
            "  class << self\n",
            "    def exist?(file_name)\n",
            "    end\n",
            "  end\n",
            "end\n",
        ),
    );
    write(
        &stubs,
        "rubystubs33/io.rb",
        "class IO\n  include Enumerable\n  def self.read(name, length = nil, offset = nil, **opt)\n  end\nend\n",
    );

    temp
}

fn settings_for(temp: &TempDir) -> Settings {
    Settings {
        stubs_root: temp.path().join("vsix/stubs"),
        ..Settings::default()
    }
}

#[test]
fn loads_every_snapshot_and_defaults_to_newest() {
    let temp = build_corpus();
    let corpus = StubCorpus::load(&settings_for(&temp)).unwrap();

    let tags: Vec<&str> = corpus.snapshots().iter().map(|s| s.tag.as_str()).collect();
    assert_eq!(tags, vec!["rubystubs27", "rubystubs33"]);

    let newest = corpus.snapshot(None).unwrap();
    assert_eq!(newest.tag, "rubystubs33");
    assert_eq!(newest.files.len(), 7);
    assert!(newest.load_errors.is_empty());

    let old = corpus.snapshot(Some("2.7")).unwrap();
    let center = old
        .resolve_method("String", "center", MethodReceiver::Instance)
        .unwrap();
    assert_eq!(center.method.signature(), "def center(width)");
    assert_eq!(
        old.hover("String").unwrap().doc.as_deref(),
        Some("A String object holds bytes.")
    );
}

#[test]
fn hover_renders_signatures_and_docs() {
    let temp = build_corpus();
    let corpus = StubCorpus::load(&settings_for(&temp)).unwrap();
    let snapshot = corpus.snapshot(None).unwrap();

    let string = snapshot.hover("String").unwrap();
    assert_eq!(string.kind, SymbolKind::Class);
    assert_eq!(
        string.doc.as_deref(),
        Some("A String object holds and manipulates bytes.\n\n  s = String.new('x')")
    );

    let center = snapshot.hover("String#center").unwrap();
    assert_eq!(center.signature, "def center(width, padstr = ' ')");

    let size = snapshot.hover("String#size").unwrap();
    assert_eq!(size.name, "String#length");

    let read = snapshot.hover("File.read").unwrap();
    assert_eq!(read.owner.as_deref(), Some("IO"));
    assert_eq!(
        read.signature,
        "def self.read(name, length = nil, offset = nil, **opt)"
    );

    let exist = snapshot.hover("File.exist?").unwrap();
    assert_eq!(exist.signature, "def self.exist?(file_name)");

    let puts = snapshot.hover("Kernel.puts").unwrap();
    assert_eq!(puts.signature, "def self.puts(*args)");
    assert!(puts.doc.unwrap().starts_with("Prints to stdout."));

    let status = snapshot.hover("Process::Status#exitstatus").unwrap();
    assert_eq!(status.doc.as_deref(), Some("Exit status of the process."));

    let separator = snapshot.hover("File::SEPARATOR").unwrap();
    assert_eq!(separator.kind, SymbolKind::Constant);
}

#[test]
fn ancestors_and_visibility() {
    let temp = build_corpus();
    let corpus = StubCorpus::load(&settings_for(&temp)).unwrap();
    let snapshot = corpus.snapshot(Some("rubystubs33")).unwrap();

    assert_eq!(
        snapshot.ancestors("File"),
        vec!["File", "IO", "Enumerable", "Object", "Kernel", "BasicObject"]
    );

    let private = snapshot
        .resolve_method("String", "initialize_copy", MethodReceiver::Instance)
        .unwrap();
    assert_eq!(private.method.visibility, Visibility::Private);

    let inherited = snapshot
        .resolve_method("String", "__send__", MethodReceiver::Instance)
        .unwrap();
    assert_eq!(inherited.owner, "BasicObject");
}

#[test]
fn completion_is_sorted_and_limited() {
    let temp = build_corpus();
    let corpus = StubCorpus::load(&settings_for(&temp)).unwrap();
    let snapshot = corpus.snapshot(None).unwrap();

    let labels: Vec<String> = snapshot
        .complete("St", 10)
        .into_iter()
        .map(|c| c.label)
        .collect();
    assert_eq!(labels, vec!["Process::Status", "String"]);

    let methods = snapshot.complete("String#", 3);
    assert_eq!(methods.len(), 3);
    assert!(methods.windows(2).all(|w| w[0].label <= w[1].label));
}

#[test]
fn lint_reports_only_real_problems() {
    let temp = build_corpus();
    let corpus = StubCorpus::load(&settings_for(&temp)).unwrap();
    let snapshot = corpus.snapshot(None).unwrap();

    let diagnostics = Linter::new(&settings_for(&temp).lint).check_snapshot(snapshot);
    assert!(diagnostics.is_empty(), "{diagnostics:#?}");

    write(
        &temp.path().join("vsix/stubs"),
        "rubystubs33/set.rb",
        "class Set < Collection\n  alias member? missing\nend\n",
    );
    let corpus = StubCorpus::load(&settings_for(&temp)).unwrap();
    let diagnostics = Linter::new(&settings_for(&temp).lint).check_snapshot(corpus.snapshot(None).unwrap());
    let rules: Vec<Rule> = diagnostics.iter().map(|d| d.rule).collect();
    assert_eq!(rules, vec![Rule::UnknownSuperclass, Rule::DanglingAlias]);
    assert!(has_errors(&diagnostics));
}

#[test]
fn export_and_missing_root() {
    let temp = build_corpus();
    let corpus = StubCorpus::load(&settings_for(&temp)).unwrap();
    let snapshot = corpus.snapshot(None).unwrap();

    let out = temp.path().join("symbols.json");
    snapshot.export().write_to(&out).unwrap();
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["version"], "3.3");
    assert!(
        value["namespaces"]
            .as_array()
            .unwrap()
            .iter()
            .any(|ns| ns["qualified_name"] == "Process::Status")
    );

    let missing = Settings {
        stubs_root: temp.path().join("nowhere"),
        ..Settings::default()
    };
    assert!(matches!(
        StubCorpus::load(&missing),
        Err(IndexError::RootNotFound { .. })
    ));
}
