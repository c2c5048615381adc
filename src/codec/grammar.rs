//! Line classification for the brace format.
//!
//! Every rule works on a single trimmed line. Rules that need context (the
//! nesting depth, the following line) take it as an argument so the parser
//! stays the only place that walks the input.

/// Separator between a key and its value.
pub const ASSIGN: &str = " = ";
/// Separator between items of an inline list.
pub const INLINE_ITEM_SEPARATOR: &str = ", ";
/// Prefix of each item line in a multi-line list.
pub const LIST_ITEM_PREFIX: &str = "- ";

/// What a single (trimmed) line means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// A `}` that does not close anything at this depth.
    StrayClose,
    Blank,
    Comment(&'a str),
    /// `key {`, or a lone `{` when the key was on the previous line.
    Open(Option<&'a str>),
    Close,
    Assignment { key: &'a str, value: RawValue<'a> },
    /// A line that is neither of the above; only valid when a block opens next.
    BareKey(&'a str),
}

/// Right-hand side of an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue<'a> {
    Text(&'a str),
    InlineList(Vec<&'a str>),
    /// A lone `[`; items follow on their own lines.
    ListStart,
    /// `[` followed by text but no closing bracket.
    UnclosedList,
}

/// One line inside a multi-line list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListLine<'a> {
    Item(&'a str),
    /// The closing line, optionally carrying a final `- item]`.
    End(Option<&'a str>),
    Invalid,
}

/// Classify a trimmed line. `nested` is true inside a block.
pub fn classify(line: &str, nested: bool) -> LineKind<'_> {
    if line.contains('}') && !(nested && line == "}") {
        return LineKind::StrayClose;
    }
    if line.is_empty() {
        return LineKind::Blank;
    }
    if line.starts_with('#') {
        return LineKind::Comment(line);
    }
    if let Some(head) = line.strip_suffix('{') {
        let key = head.trim();
        return LineKind::Open(if key.is_empty() { None } else { Some(key) });
    }
    if line == "}" {
        return LineKind::Close;
    }
    if let Some((key, value)) = line.split_once(ASSIGN) {
        return LineKind::Assignment {
            key: key.trim(),
            value: classify_value(value.trim()),
        };
    }
    // `key = ` loses its trailing space when the line is trimmed.
    if let Some(key) = line.strip_suffix(ASSIGN.trim_end()) {
        return LineKind::Assignment {
            key: key.trim(),
            value: RawValue::Text(""),
        };
    }
    LineKind::BareKey(line)
}

/// Classify the trimmed right-hand side of an assignment.
pub fn classify_value(value: &str) -> RawValue<'_> {
    if !value.starts_with('[') {
        return RawValue::Text(value);
    }
    match value[1..].strip_suffix(']') {
        Some(inner) if inner.trim().is_empty() => RawValue::InlineList(Vec::new()),
        Some(inner) => RawValue::InlineList(
            inner
                .split(INLINE_ITEM_SEPARATOR)
                .map(str::trim)
                .collect(),
        ),
        None if value == "[" => RawValue::ListStart,
        None => RawValue::UnclosedList,
    }
}

/// Classify a trimmed line inside a multi-line list.
pub fn classify_list_line(line: &str) -> ListLine<'_> {
    if let Some(head) = line.strip_suffix(']') {
        let head = head.trim_end();
        if head.is_empty() {
            return ListLine::End(None);
        }
        return match list_item(head) {
            Some(last) => ListLine::End(Some(last)),
            None => ListLine::Invalid,
        };
    }
    match list_item(line) {
        Some(item) => ListLine::Item(item),
        None => ListLine::Invalid,
    }
}

/// Item text of a `- item` line. A bare `-` is an empty item.
fn list_item(line: &str) -> Option<&str> {
    if line == LIST_ITEM_PREFIX.trim_end() {
        return Some("");
    }
    line.strip_prefix(LIST_ITEM_PREFIX).map(str::trim)
}

/// Whether a bare key line may be followed by `next` (the block opener).
pub fn opens_block(next: &str) -> bool {
    next == "{"
}

/// Why `key` cannot be written as the key of a block, if it cannot.
pub fn key_problem(key: &str) -> Option<&'static str> {
    if key.is_empty() {
        return Some("key is empty");
    }
    if key.starts_with('#') {
        return Some("key starts with `#`");
    }
    line_problem(key)
}

/// Why `key` cannot be written on the left of ` = `, if it cannot.
pub fn assigned_key_problem(key: &str) -> Option<&'static str> {
    if key.contains(ASSIGN) || key.ends_with(ASSIGN.trim_end()) {
        return Some("key contains ` = `");
    }
    key_problem(key)
}

/// Why `value` cannot be written as scalar text, if it cannot.
pub fn text_problem(value: &str) -> Option<&'static str> {
    if value.starts_with('[') {
        return Some("value starts with `[`");
    }
    if value.ends_with('{') {
        return Some("value ends with `{`");
    }
    line_problem(value)
}

/// Why `item` cannot be written as a list item, if it cannot.
///
/// Items may contain `}` since list lines are never read as structure,
/// except in the inline form (see [`fits_inline`]).
pub fn item_problem(item: &str) -> Option<&'static str> {
    if item.contains(['\n', '\r']) {
        return Some("list item contains a line break");
    }
    if item != item.trim() {
        return Some("list item has surrounding whitespace");
    }
    None
}

/// Why a comment line cannot be written, if it cannot.
pub fn comment_problem(text: &str) -> Option<&'static str> {
    if !text.starts_with('#') {
        return Some("comment does not start with `#`");
    }
    line_problem(text)
}

/// Whether `items` read back unchanged when written as `[a, b]`.
pub fn fits_inline<S: AsRef<str>>(items: &[S]) -> bool {
    let single_empty = matches!(items, [only] if only.as_ref().is_empty());
    !single_empty
        && items.iter().all(|item| {
            let item = item.as_ref();
            !item.contains(INLINE_ITEM_SEPARATOR) && !item.contains('}')
        })
}

/// Text that must stay on one line and survive trimming.
fn line_problem(text: &str) -> Option<&'static str> {
    if text.contains(['\n', '\r']) {
        Some("text contains a line break")
    } else if text.contains('}') {
        Some("text contains `}`")
    } else if text != text.trim() {
        Some("text has surrounding whitespace")
    } else {
        None
    }
}
