//! Serializer for the brace format.
//!
//! Rendering produces a list of lines that are joined with `\n` without a
//! final newline. Comment stripping is a filter over the document followed by
//! the same renderer, so both modes share one traversal.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

use super::document::{Document, Entry};
use super::grammar::{
    assigned_key_problem, comment_problem, fits_inline, item_problem, key_problem, text_problem,
    ASSIGN, INLINE_ITEM_SEPARATOR, LIST_ITEM_PREFIX,
};

const INDENT: &str = "  ";

/// Whether comments and blank lines survive a write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommentMode {
    #[default]
    #[serde(alias = "preserve")]
    WithComments,
    #[serde(alias = "skip")]
    WithoutComments,
}

/// Serialize a document.
pub fn write(document: &Document, mode: CommentMode) -> String {
    match mode {
        CommentMode::WithComments => render_lines(document, 0).join("\n"),
        CommentMode::WithoutComments => {
            // Top-level entries are separated by one empty line.
            document
                .without_decorations()
                .entries()
                .iter()
                .map(|entry| {
                    let mut lines = Vec::new();
                    render_entry(entry, 0, &mut lines);
                    lines.join("\n")
                })
                .collect::<Vec<_>>()
                .join("\n\n")
        }
    }
}

fn render_lines(document: &Document, depth: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for entry in document.entries() {
        render_entry(entry, depth, &mut lines);
    }
    lines
}

fn render_entry(entry: &Entry, depth: usize, out: &mut Vec<String>) {
    let indent = INDENT.repeat(depth);
    match entry {
        Entry::Scalar { key, value } => {
            let line = format!("{indent}{key}{ASSIGN}{value}");
            out.push(line.trim_end().to_string());
        }
        // A multi-line item ending in `]` would close the list.
        Entry::List { key, items } if needs_inline(items) => {
            let items = items.join(INLINE_ITEM_SEPARATOR);
            out.push(format!("{indent}{key}{ASSIGN}[{items}]"));
        }
        Entry::List { key, items } => {
            out.push(format!("{indent}{key}{ASSIGN}["));
            for item in items {
                let line = format!("{indent}{INDENT}{LIST_ITEM_PREFIX}{item}");
                out.push(line.trim_end().to_string());
            }
            out.push(format!("{indent}]"));
        }
        Entry::Block { key, body } => {
            out.push(format!("{indent}{key} {{"));
            out.extend(render_lines(body, depth + 1));
            out.push(format!("{indent}}}"));
        }
        Entry::Comment { text, .. } => out.push(format!("{indent}{text}")),
        Entry::Blank { .. } => out.push(String::new()),
    }
}

fn needs_inline(items: &[String]) -> bool {
    items.iter().any(|item| item.ends_with(']'))
}

/// Verify that `document` reads back unchanged once written in `mode`.
///
/// Fails with [`StoreError::Unwritable`] naming the dotted key of the first
/// entry that would be lost or misread.
pub fn check(document: &Document, mode: CommentMode) -> Result<()> {
    check_level(document, mode, "")
}

fn check_level(document: &Document, mode: CommentMode, prefix: &str) -> Result<()> {
    for entry in document.entries() {
        let path = match entry.key() {
            Some(key) if prefix.is_empty() => key.to_string(),
            Some(key) => format!("{prefix}.{key}"),
            None => prefix.to_string(),
        };
        let problem = match entry {
            Entry::Scalar { key, value } => {
                assigned_key_problem(key).or_else(|| text_problem(value))
            }
            Entry::List { key, items } => assigned_key_problem(key)
                .or_else(|| items.iter().find_map(|item| item_problem(item)))
                .or_else(|| {
                    (needs_inline(items) && !fits_inline(items.as_slice()))
                        .then_some("list items ending in `]` must not contain `, ` or `}`")
                }),
            Entry::Block { key, body } => {
                if let Some(problem) = key_problem(key) {
                    Some(problem)
                } else {
                    check_level(body, mode, &path)?;
                    None
                }
            }
            Entry::Comment { text, .. } if mode == CommentMode::WithComments => {
                comment_problem(text)
            }
            Entry::Comment { .. } | Entry::Blank { .. } => None,
        };
        if let Some(reason) = problem {
            return Err(StoreError::Unwritable { key: path, reason });
        }
    }
    Ok(())
}
