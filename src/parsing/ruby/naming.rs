//! Constant name to stub file name inflection
//!
//! Stub files are named after their primary namespace in snake_case. Nested
//! namespaces may be flattened (`process_status.rb`), nested as directories
//! (`process/status.rb`) or use only the last segment (`status.rb`).

use std::path::Path;

/// Nested directory form of a constant: `Process::Status` → `process/status.rb`.
pub fn constant_to_relative_path(constant: &str) -> String {
    let mut path = constant
        .trim_start_matches("::")
        .split("::")
        .map(to_snake_case)
        .collect::<Vec<_>>()
        .join("/");
    path.push_str(".rb");
    path
}

/// File stems (relative path without `.rb`, `/`-separated) accepted for a
/// file whose primary namespace is `qualified`.
pub fn expected_file_stems(qualified: &str) -> Vec<String> {
    let segments: Vec<String> = qualified
        .trim_start_matches("::")
        .split("::")
        .filter(|s| !s.is_empty())
        .map(to_snake_case)
        .collect();

    let mut stems = Vec::new();
    if let Some(last) = segments.last() {
        stems.push(last.clone());
    }
    if segments.len() > 1 {
        stems.push(segments.join("_"));
        stems.push(segments.join("/"));
    }
    stems
}

/// Whether `relative_path` (relative to its snapshot root) fits `qualified`.
///
/// A file in a sub-directory also matches by its file name alone.
pub fn file_name_matches(relative_path: &Path, qualified: &str) -> bool {
    let Some(stem) = relative_stem(relative_path) else {
        return false;
    };
    let file_stem = stem.rsplit('/').next().unwrap_or(&stem);
    expected_file_stems(qualified)
        .iter()
        .any(|expected| *expected == stem || *expected == file_stem)
}

fn relative_stem(relative_path: &Path) -> Option<String> {
    let text = relative_path.to_str()?.replace('\\', "/");
    text.strip_suffix(".rb").map(str::to_string)
}

/// `StringIO` → `string_io`, `HTMLParser` → `html_parser`,
/// `Float32Array` → `float32_array`.
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut chars = name.chars().peekable();
    let mut prev: Option<char> = None;

    while let Some(c) = chars.next() {
        if c.is_uppercase() {
            // Word boundary after a lowercase letter or digit, or at the last
            // capital of an acronym that starts a new word.
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => chars.peek().is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if boundary {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("String"), "string");
        assert_eq!(to_snake_case("StringIO"), "string_io");
        assert_eq!(to_snake_case("HTMLParser"), "html_parser");
        assert_eq!(to_snake_case("NilClass"), "nil_class");
        assert_eq!(to_snake_case("ARGF"), "argf");
        assert_eq!(to_snake_case("Float32Array"), "float32_array");
    }

    #[test]
    fn test_constant_to_relative_path() {
        assert_eq!(constant_to_relative_path("String"), "string.rb");
        assert_eq!(
            constant_to_relative_path("Process::Status"),
            "process/status.rb"
        );
    }

    #[test]
    fn test_expected_file_stems() {
        assert_eq!(expected_file_stems("String"), vec!["string"]);
        assert_eq!(
            expected_file_stems("Process::Status"),
            vec!["status", "process_status", "process/status"]
        );
    }

    #[test]
    fn test_file_name_matches() {
        assert!(file_name_matches(Path::new("string.rb"), "String"));
        assert!(file_name_matches(Path::new("nil_class.rb"), "NilClass"));
        assert!(file_name_matches(
            Path::new("process_status.rb"),
            "Process::Status"
        ));
        assert!(file_name_matches(
            Path::new("process/status.rb"),
            "Process::Status"
        ));
        assert!(!file_name_matches(Path::new("strings.rb"), "String"));
        assert!(!file_name_matches(Path::new("string.txt"), "String"));
    }
}
