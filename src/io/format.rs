//! Formatting helpers for reports and exports.

use chrono::{SecondsFormat, Utc};

/// Current time as an RFC 3339 UTC timestamp, second precision.
pub fn format_utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Render a doc comment for terminal output, indenting every line.
pub fn indent_block(text: &str, indent: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_is_utc() {
        assert!(format_utc_timestamp().ends_with('Z'));
    }

    #[test]
    fn indent_block_skips_blank_lines() {
        assert_eq!(indent_block("a\n\nb", "  "), "  a\n\n  b");
    }
}
