//! Line-oriented codec between a page body and its [Block] tree.
//!
//! The body grammar is a strict bullet outline:
//!
//! ```text
//! * top level bullet
//!   continuation of the same bullet
//!     * nested bullet
//! ```
//!
//! A line matching `^( *)\* (.*)$` opens a bullet whose nesting is decided by its raw count of
//! leading spaces; every other line continues the most recently opened bullet. The serializer
//! always emits four spaces per level, so hand-written indentation widths are normalized.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{error::NotazaError, properties::Block};

static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^( *)\* (.*)$").expect("static regex"));

/// Spaces added per nesting level by [serialize].
pub const INDENT_WIDTH: usize = 4;

/// If `line` opens a bullet, its indentation and first content line.
fn bullet(line: &str) -> Option<(usize, &str)> {
    let caps = BULLET.captures(line)?;
    let indent = caps.get(1).map(|m| m.as_str().len()).unwrap_or(0);
    let content = caps.get(2).map(|m| m.as_str()).unwrap_or("");
    Some((indent, content))
}

/// Strip at most `width` leading spaces, so that under-indented continuation lines never lose
/// content.
fn strip_indent(line: &str, width: usize) -> &str {
    let spaces = line.bytes().take(width).take_while(|b| *b == b' ').count();
    &line[spaces..]
}

/// The lines of `body` without leading/trailing blank lines, with the 0-based index of the first
/// kept line.
fn trim_blank_lines(body: &str) -> (usize, Vec<&str>) {
    let lines: Vec<&str> = body.lines().collect();
    let start = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map(|idx| idx + 1)
        .unwrap_or(start);
    (start, lines[start..end].to_vec())
}

/// Pop the top of the stack and attach it to the new top.
fn close_top(stack: &mut Vec<(isize, Block)>, line: usize) -> Result<(), NotazaError> {
    let (_, finished) = stack
        .pop()
        .ok_or_else(|| NotazaError::malformed(line, "outline stack exhausted"))?;
    let (_, parent) = stack
        .last_mut()
        .ok_or_else(|| NotazaError::malformed(line, "no parent left to attach a bullet to"))?;
    parent.children.push(finished);
    Ok(())
}

/// Parse a page body into its root [Block].
///
/// Blank input yields a root without children. A continuation line before the first bullet
/// fails with [NotazaError::MalformedOutline]; callers working at page level recover from it
/// (see [crate::codec::page::Page::parse]).
pub fn parse(body: &str) -> Result<Block, NotazaError> {
    // Open blocks with their indentation. The root sits at -1 so that every real bullet nests
    // below it.
    let mut stack: Vec<(isize, Block)> = vec![(-1, Block::root())];

    let (skipped, lines) = trim_blank_lines(body);
    for (offset, line) in lines.into_iter().enumerate() {
        let line_no = skipped + offset + 1;
        match bullet(line) {
            Some((indent, content)) => {
                let indent = indent as isize;
                while stack.last().map(|(i, _)| *i >= indent).unwrap_or(false) {
                    close_top(&mut stack, line_no)?;
                }
                if stack.is_empty() {
                    return Err(NotazaError::malformed(line_no, "outline stack exhausted"));
                }
                stack.push((indent, Block::new(content)));
            }
            None => {
                let (indent, open) = stack
                    .last_mut()
                    .ok_or_else(|| NotazaError::malformed(line_no, "outline stack exhausted"))?;
                if *indent < 0 {
                    return Err(NotazaError::malformed(
                        line_no,
                        format!("text outside of any bullet: {line:?}"),
                    ));
                }
                open.content.push('\n');
                open.content
                    .push_str(strip_indent(line, *indent as usize + 2));
            }
        }
    }

    let last_line = body.lines().count();
    while stack.len() > 1 {
        close_top(&mut stack, last_line)?;
    }
    stack
        .pop()
        .map(|(_, root)| root)
        .ok_or_else(|| NotazaError::malformed(last_line, "outline stack exhausted"))
}

fn emit(block: &Block, depth: usize, lines: &mut Vec<String>) {
    let indent = " ".repeat(depth * INDENT_WIDTH);
    let mut content_lines = block.content.split('\n');
    let first = content_lines.next().unwrap_or("");
    lines.push(format!("{indent}* {first}"));
    for line in content_lines {
        if line.is_empty() {
            lines.push(String::new());
        } else {
            lines.push(format!("{indent}  {line}"));
        }
    }
    for child in block.children.iter() {
        emit(child, depth + 1, lines);
    }
}

/// Render a root [Block] back into body markdown. The root itself is never emitted.
pub fn serialize(root: &Block) -> String {
    let mut lines = Vec::new();
    for child in root.children.iter() {
        emit(child, 0, &mut lines);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn contents(root: &Block) -> Vec<(String, usize)> {
        root.descendants()
            .map(|(b, depth)| (b.content.clone(), depth))
            .collect()
    }

    #[test]
    fn parses_nested_bullets() {
        let root = parse("* a\n    * a1\n    * a2\n        * a2x\n* b").unwrap();
        assert_eq!(root.content, "");
        assert_eq!(
            contents(&root),
            vec![
                ("a".to_string(), 1),
                ("a1".to_string(), 2),
                ("a2".to_string(), 2),
                ("a2x".to_string(), 3),
                ("b".to_string(), 1),
            ]
        );
    }

    #[test]
    fn continuation_lines_join_the_open_bullet() {
        let root = parse("* first\n  second\n    * child\n      wrapped").unwrap();
        assert_eq!(root.children[0].content, "first\nsecond");
        assert_eq!(root.children[0].children[0].content, "child\nwrapped");
    }

    #[test]
    fn tolerates_irregular_indentation() {
        let root = parse("* a\n  * a1\n   * a1x\n * a2\n* b").unwrap();
        let a = &root.children[0];
        assert_eq!(a.children.len(), 2);
        assert_eq!(a.children[0].children[0].content, "a1x");
        assert_eq!(a.children[1].content, "a2");
        assert_eq!(root.children[1].content, "b");
    }

    #[test]
    fn dedent_pops_to_the_matching_level() {
        let root = parse("* a\n    * b\n        * c\n    * d").unwrap();
        let a = &root.children[0];
        assert_eq!(a.children.len(), 2);
        assert_eq!(a.children[1].content, "d");
        assert!(a.children[1].is_leaf());
    }

    #[test]
    fn blank_input_is_an_empty_page() {
        assert!(parse("").unwrap().is_leaf());
        assert!(parse("\n\n   \n").unwrap().is_leaf());
    }

    #[test]
    fn surrounding_blank_lines_are_trimmed() {
        let root = parse("\n\n* a\n\n").unwrap();
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].content, "a");
    }

    #[test]
    fn text_before_first_bullet_is_malformed() {
        let err = parse("just a paragraph\n* a").unwrap_err();
        assert!(matches!(err, NotazaError::MalformedOutline { line: 1, .. }));
    }

    #[test]
    fn under_indented_continuation_keeps_its_text() {
        let root = parse("    * deep\nflush").unwrap();
        assert_eq!(root.children[0].content, "deep\nflush");
    }

    #[test]
    fn serializes_with_four_space_indent() {
        let root = Block::with_children(
            "",
            vec![
                Block::with_children("a\nmore", vec![Block::new("a1")]),
                Block::new("b"),
            ],
        );
        assert_eq!(serialize(&root), "* a\n  more\n    * a1\n* b");
    }

    #[test]
    fn empty_content_keeps_its_marker() {
        let root = Block::with_children("", vec![Block::new(""), Block::new("x")]);
        let text = serialize(&root);
        assert_eq!(text, "* \n* x");
        assert!(parse(&text).unwrap().same_shape(&root));
    }

    #[test]
    fn round_trip_preserves_structure() {
        let input = "* one\n  wrapped\n\n  after blank\n  * nested\n    * two\n        * three\n    * two b\n* four";
        let first = parse(input).unwrap();
        let second = parse(&serialize(&first)).unwrap();
        assert!(first.same_shape(&second));
        assert_eq!(serialize(&first), serialize(&second));
    }

    #[test]
    fn irregular_indentation_normalizes_to_four() {
        let root = parse("* a\n  * b\n      * c").unwrap();
        assert_eq!(serialize(&root), "* a\n    * b\n        * c");
    }
}
