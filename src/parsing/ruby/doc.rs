//! Doc comment extraction.
//!
//! A declaration's documentation is the run of whole-line comments that ends
//! on the line directly above it. Trailing comments after code never count.

use std::collections::HashMap;
use tree_sitter::Node;

#[derive(Debug, Clone, Copy)]
struct CommentLine<'a> {
    start_row: usize,
    text: &'a str,
}

/// Whole-line comments of one file, keyed by the row they end on.
#[derive(Debug, Default)]
pub struct CommentIndex<'a> {
    by_end_row: HashMap<usize, CommentLine<'a>>,
    /// First row after the comment block that opens the file. Magic comments
    /// are only recognized above it.
    header_end: usize,
}

impl<'a> CommentIndex<'a> {
    pub fn build(root: Node, code: &'a str) -> Self {
        let lines: Vec<&str> = code.lines().collect();
        let mut by_end_row = HashMap::new();
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            if node.kind() == "comment" {
                let start = node.start_position();
                let standalone = lines
                    .get(start.row)
                    .and_then(|line| line.get(..start.column))
                    .is_some_and(|prefix| prefix.trim().is_empty());
                if standalone {
                    let end = node.end_position();
                    // Block comments may swallow the trailing newline.
                    let end_row = if end.column == 0 && end.row > start.row {
                        end.row - 1
                    } else {
                        end.row
                    };
                    by_end_row.insert(
                        end_row,
                        CommentLine {
                            start_row: start.row,
                            text: &code[node.byte_range()],
                        },
                    );
                }
                continue;
            }
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                stack.push(child);
            }
        }

        let mut header_end = 0;
        while by_end_row
            .get(&header_end)
            .is_some_and(|c| c.start_row == header_end)
        {
            header_end += 1;
        }

        Self {
            by_end_row,
            header_end,
        }
    }

    /// Documentation for a declaration starting on `start_row`.
    pub fn doc_for(&self, start_row: usize) -> Option<String> {
        let mut block = Vec::new();
        let mut row = start_row;
        while row > 0 {
            match self.by_end_row.get(&(row - 1)) {
                Some(comment) => {
                    block.push(*comment);
                    row = comment.start_row;
                }
                None => break,
            }
        }
        if block.is_empty() {
            return None;
        }
        block.reverse();

        let mut doc_lines: Vec<&str> = Vec::new();
        for comment in block {
            if comment.start_row < self.header_end && is_magic_comment(comment) {
                continue;
            }
            append_comment_lines(comment.text, &mut doc_lines);
        }
        normalize(doc_lines)
    }
}

fn append_comment_lines<'a>(text: &'a str, out: &mut Vec<&'a str>) {
    if text.starts_with("=begin") {
        let mut lines: Vec<&str> = text.lines().skip(1).collect();
        if lines.last().is_some_and(|l| l.trim_start().starts_with("=end")) {
            lines.pop();
        }
        out.extend(lines);
        return;
    }

    let Some(content) = text.strip_prefix('#') else {
        return;
    };
    out.push(content.strip_prefix(' ').unwrap_or(content));
}

fn is_magic_comment(comment: CommentLine<'_>) -> bool {
    let Some(content) = comment.text.strip_prefix('#') else {
        return false;
    };
    if comment.start_row == 0 && content.starts_with('!') {
        return true;
    }
    let trimmed = content.trim().to_ascii_lowercase();
    trimmed.starts_with("-*-")
        || ["frozen_string_literal:", "encoding:", "coding:", "warn_indent:"]
            .iter()
            .any(|prefix| trimmed.starts_with(prefix))
}

fn normalize(lines: Vec<&str>) -> Option<String> {
    let lines: Vec<&str> = lines.into_iter().map(str::trim_end).collect();
    let first = lines.iter().position(|l| !l.is_empty())?;
    let last = lines.iter().rposition(|l| !l.is_empty())?;
    Some(lines[first..=last].join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn doc_at(code: &str, row: usize) -> Option<String> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_ruby::LANGUAGE.into())
            .unwrap();
        let tree = parser.parse(code, None).unwrap();
        let index = CommentIndex::build(tree.root_node(), code);
        index.doc_for(row)
    }

    #[test]
    fn keeps_inner_blank_lines_and_indentation() {
        let code = "# Summary line.\n#\n#    example(1)\nclass Foo\nend\n";
        assert_eq!(
            doc_at(code, 3).as_deref(),
            Some("Summary line.\n\n   example(1)")
        );
    }

    #[test]
    fn blank_line_breaks_the_block() {
        let code = "# Detached\n\nclass Foo\nend\n";
        assert_eq!(doc_at(code, 2), None);
    }

    #[test]
    fn trailing_comments_are_ignored() {
        let code = "x = 1 # not docs\nclass Foo\nend\n";
        assert_eq!(doc_at(code, 1), None);
    }

    #[test]
    fn magic_comments_are_dropped() {
        let code = "# frozen_string_literal: true\n# Real docs\nclass Foo\nend\n";
        assert_eq!(doc_at(code, 2).as_deref(), Some("Real docs"));
    }

    #[test]
    fn shebang_only_counts_on_the_first_line() {
        let code = "#!/usr/bin/env ruby\n# Docs\nclass Foo\nend\n";
        assert_eq!(doc_at(code, 2).as_deref(), Some("Docs"));
    }

    #[test]
    fn call_seq_lines_inside_a_body_are_kept() {
        let code = concat!(
            "class BasicObject\n",
            "  # Boolean negate.\n",
            "  #\n",
            "  #   !obj -> true or false\n",
            "  #   encoding: Encoding::UTF_8\n",
            "  def !\n",
            "  end\n",
            "end\n",
        );
        assert_eq!(
            doc_at(code, 5).as_deref(),
            Some("Boolean negate.\n\n  !obj -> true or false\n  encoding: Encoding::UTF_8")
        );
    }

    #[test]
    fn block_comments_are_supported() {
        let code = "=begin\nBlock docs\n=end\nclass Foo\nend\n";
        assert_eq!(doc_at(code, 3).as_deref(), Some("Block docs"));
    }
}
