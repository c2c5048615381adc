//! Recursive-descent parser for the brace format.
//!
//! The parser walks a slice of lines with a [`Cursor`] that is passed into
//! each level by value and handed back with the parsed sub-document, so a
//! nested block resumes its caller exactly where it stopped.

use tracing::trace;

use crate::error::{Result, StoreError};

use super::document::{Document, Entry};
use super::grammar::{classify, classify_list_line, opens_block, LineKind, ListLine, RawValue};

/// Position in the input plus the next free comment/blank ordinals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cursor {
    pos: usize,
    comments: u64,
    blanks: u64,
}

impl Cursor {
    /// 1-based line number of the line at `pos`.
    fn line(&self) -> usize {
        self.pos + 1
    }
}

/// Split file text into lines the way the parser expects them.
///
/// Empty text has no lines. Otherwise every `\n` separates two lines, so a
/// trailing newline produces a final empty line that the writer reproduces.
pub fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Parse file text into a document.
pub fn parse_str(text: &str) -> Result<Document> {
    parse(&split_lines(text))
}

/// Parse a sequence of raw lines into a document.
///
/// Fails on the first structural error; no partial document is returned.
pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Document> {
    let lines: Vec<&str> = lines.iter().map(|l| l.as_ref().trim()).collect();
    let (document, cursor) = parse_level(&lines, Cursor::default(), None)?;
    trace!(
        lines = lines.len(),
        entries = document.len(),
        comments = cursor.comments,
        blanks = cursor.blanks,
        "parsed document"
    );
    Ok(document)
}

/// Parse entries until the end of input (top level) or the matching `}`.
///
/// `opened_at` is the 1-based line of the enclosing `{`, or `None` at top level.
fn parse_level(
    lines: &[&str],
    mut cursor: Cursor,
    opened_at: Option<usize>,
) -> Result<(Document, Cursor)> {
    let nested = opened_at.is_some();
    let mut document = Document::new();
    let mut pending_key: Option<&str> = None;

    while let Some(&line) = lines.get(cursor.pos) {
        let line_no = cursor.line();
        cursor.pos += 1;

        match classify(line, nested) {
            LineKind::StrayClose => {
                return Err(StoreError::UnopenedBlockClose { line: line_no });
            }
            LineKind::Close => return Ok((document, cursor)),
            LineKind::Blank => {
                document.push(Entry::Blank {
                    ordinal: cursor.blanks,
                });
                cursor.blanks += 1;
            }
            LineKind::Comment(text) => {
                document.push(Entry::Comment {
                    text: text.to_string(),
                    ordinal: cursor.comments,
                });
                cursor.comments += 1;
            }
            LineKind::Open(key) => {
                let key = key
                    .or(pending_key.take())
                    .ok_or(StoreError::MissingBlockKey { line: line_no })?;
                trace!(key, line = line_no, "entering block");
                let (body, next) = parse_level(lines, cursor, Some(line_no))?;
                cursor = next;
                document.push(Entry::block(key, body));
            }
            LineKind::Assignment { key, value } => {
                let entry = match value {
                    RawValue::Text(text) => Entry::scalar(key, text),
                    RawValue::InlineList(items) => Entry::list(key, items),
                    RawValue::ListStart => {
                        let (items, next) = parse_list(lines, cursor, line_no)?;
                        cursor = next;
                        Entry::list(key, items)
                    }
                    RawValue::UnclosedList => {
                        return Err(StoreError::UnterminatedList { line: line_no });
                    }
                };
                document.push(entry);
            }
            LineKind::BareKey(key) => match lines.get(cursor.pos) {
                Some(next) if opens_block(next) => pending_key = Some(key),
                _ => {
                    return Err(StoreError::ExpectedValueOrBlock {
                        line: line_no,
                        content: key.to_string(),
                    })
                }
            },
        }
    }

    match opened_at {
        Some(line) => Err(StoreError::UnterminatedBlock { line }),
        None => Ok((document, cursor)),
    }
}

/// Consume the body of a multi-line list opened on line `opened_at`.
fn parse_list(
    lines: &[&str],
    mut cursor: Cursor,
    opened_at: usize,
) -> Result<(Vec<String>, Cursor)> {
    let mut items = Vec::new();

    while let Some(&line) = lines.get(cursor.pos) {
        cursor.pos += 1;
        match classify_list_line(line) {
            ListLine::Item(item) => items.push(item.to_string()),
            ListLine::End(last) => {
                items.extend(last.map(str::to_string));
                return Ok((items, cursor));
            }
            ListLine::Invalid => break,
        }
    }

    Err(StoreError::UnterminatedList { line: opened_at })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(text: &str, ordinal: u64) -> Entry {
        Entry::Comment {
            text: text.to_string(),
            ordinal,
        }
    }

    #[test]
    fn test_parse_scalar_and_block() {
        let doc = parse_str("a = 1\nb {\nc = 2\n}").unwrap();

        assert_eq!(
            doc.entries(),
            &[
                Entry::scalar("a", "1"),
                Entry::block("b", Document::from_entries(vec![Entry::scalar("c", "2")])),
            ]
        );
    }

    #[test]
    fn test_parse_multiline_list() {
        let doc = parse_str("items = [\n- x\n- y\n]").unwrap();
        assert_eq!(doc.entries(), &[Entry::list("items", ["x", "y"])]);
    }

    #[test]
    fn test_parse_inline_list() {
        let doc = parse_str("hosts = [alpha, beta, gamma]\nnone = []").unwrap();
        assert_eq!(
            doc.entries(),
            &[
                Entry::list("hosts", ["alpha", "beta", "gamma"]),
                Entry::List {
                    key: "none".to_string(),
                    items: vec![],
                },
            ]
        );
    }

    #[test]
    fn test_parse_list_item_on_closing_line() {
        let doc = parse_str("x = [\n- 1\n- 2]").unwrap();
        assert_eq!(doc.entries(), &[Entry::list("x", ["1", "2"])]);
    }

    #[test]
    fn test_parse_header_comment_and_blank() {
        let doc = parse_str("# header\n\na = 1").unwrap();
        assert_eq!(
            doc.entries(),
            &[
                comment("# header", 0),
                Entry::Blank { ordinal: 0 },
                Entry::scalar("a", "1"),
            ]
        );
    }

    #[test]
    fn test_comment_ordinals_unique_across_nesting() {
        let doc = parse_str("# a\nb {\n# c\n# d\n\n}\n# e\n").unwrap();
        let entries = doc.entries();

        assert_eq!(entries[0], comment("# a", 0));
        let Entry::Block { body, .. } = &entries[1] else {
            panic!("expected block, got {:?}", entries[1]);
        };
        assert_eq!(
            body.entries(),
            &[comment("# c", 1), comment("# d", 2), Entry::Blank { ordinal: 0 }]
        );
        assert_eq!(entries[2], comment("# e", 3));
        assert_eq!(entries[3], Entry::Blank { ordinal: 1 });
    }

    #[test]
    fn test_parse_key_on_previous_line() {
        let doc = parse_str("server\n{\nport = 80\n}").unwrap();
        assert_eq!(
            doc.entries(),
            &[Entry::block(
                "server",
                Document::from_entries(vec![Entry::scalar("port", "80")])
            )]
        );
    }

    #[test]
    fn test_parse_deep_nesting_resumes_caller() {
        let doc = parse_str("a {\n  b {\n    c {\n      d = 1\n    }\n  }\n  e = 2\n}\nf = 3").unwrap();
        let Entry::Block { body: a, .. } = &doc.entries()[0] else {
            panic!("expected block");
        };
        assert_eq!(a.len(), 2);
        assert_eq!(a.entries()[1], Entry::scalar("e", "2"));
        assert_eq!(doc.entries()[1], Entry::scalar("f", "3"));
    }

    #[test]
    fn test_values_are_verbatim_text() {
        let doc = parse_str("  ratio =   0.50  \nflag = true").unwrap();
        assert_eq!(
            doc.entries(),
            &[Entry::scalar("ratio", "0.50"), Entry::scalar("flag", "true")]
        );
    }

    #[test]
    fn test_crlf_lines() {
        let doc = parse_str("a = 1\r\nb = 2").unwrap();
        assert_eq!(doc.entries(), &[Entry::scalar("a", "1"), Entry::scalar("b", "2")]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_str("").unwrap().is_empty());
    }

    #[test]
    fn test_error_unopened_close() {
        let err = parse_str("}").unwrap_err();
        assert!(matches!(err, StoreError::UnopenedBlockClose { line: 1 }));

        let err = parse_str("a {\n}\n}").unwrap_err();
        assert!(matches!(err, StoreError::UnopenedBlockClose { line: 3 }));
    }

    #[test]
    fn test_error_unterminated_block() {
        let err = parse_str("a {\nb = 1").unwrap_err();
        assert!(matches!(err, StoreError::UnterminatedBlock { line: 1 }));
    }

    #[test]
    fn test_error_unterminated_list() {
        let err = parse_str("x = [\n- 1\n- 2").unwrap_err();
        assert!(matches!(err, StoreError::UnterminatedList { line: 1 }));

        let err = parse_str("x = [\n- 1\noops\n]").unwrap_err();
        assert!(matches!(err, StoreError::UnterminatedList { line: 1 }));
    }

    #[test]
    fn test_error_expected_value_or_block() {
        let err = parse_str("lonely\nb = 2").unwrap_err();
        match err {
            StoreError::ExpectedValueOrBlock { line, content } => {
                assert_eq!(line, 1);
                assert_eq!(content, "lonely");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(matches!(
            parse_str("trailing").unwrap_err(),
            StoreError::ExpectedValueOrBlock { line: 1, .. }
        ));
    }

    #[test]
    fn test_bare_key_needs_lone_brace_next() {
        let err = parse_str("lost\nb {\nc = 1\n}").unwrap_err();
        assert!(matches!(
            err,
            StoreError::ExpectedValueOrBlock { line: 1, ref content } if content == "lost"
        ));

        let err = parse_str("lost\nx = {y").unwrap_err();
        assert!(matches!(err, StoreError::ExpectedValueOrBlock { line: 1, .. }));
    }

    #[test]
    fn test_text_after_list_bracket_is_an_error() {
        let err = parse_str("a = 1\nx = [first\n- second\n]").unwrap_err();
        assert!(matches!(err, StoreError::UnterminatedList { line: 2 }));
    }

    #[test]
    fn test_parse_empty_items_and_values() {
        let doc = parse_str("a =\nb = [\n- x\n-\n]").unwrap();
        assert_eq!(
            doc.entries(),
            &[Entry::scalar("a", ""), Entry::list("b", ["x", ""])]
        );
    }

    #[test]
    fn test_error_missing_block_key() {
        let err = parse_str("{\na = 1\n}").unwrap_err();
        assert!(matches!(err, StoreError::MissingBlockKey { line: 1 }));
    }

    #[test]
    fn test_split_lines_keeps_trailing_blank() {
        assert_eq!(split_lines("a\nb\n"), vec!["a", "b", ""]);
        assert!(split_lines("").is_empty());
    }
}
