//! File headers: the comment block at the very top of a document.

use crate::codec::{Document, Entry};

/// Width of the text area inside a framed header.
const FRAME_WIDTH: usize = 50;

impl Document {
    /// Text of the leading comment lines.
    pub fn header(&self) -> Vec<String> {
        self.entries()
            .iter()
            .map_while(|entry| match entry {
                Entry::Comment { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Replace the leading comments and blank lines with `lines`.
    ///
    /// Lines not starting with `#` are turned into comments. A blank line
    /// separates the header from the rest of the document.
    pub fn set_header<S: AsRef<str>>(&mut self, lines: &[S]) {
        let skip = self
            .entries()
            .iter()
            .take_while(|e| e.is_decoration())
            .count();
        let rest: Vec<Entry> = self.entries_mut().drain(skip..).collect();
        self.entries_mut().clear();

        let (mut comment, blank) = next_ordinals(&rest);
        for line in lines {
            let line = line.as_ref().trim();
            let text = if line.starts_with('#') {
                line.to_string()
            } else {
                format!("# {line}")
            };
            self.push(Entry::Comment {
                text,
                ordinal: comment,
            });
            comment += 1;
        }
        if !lines.is_empty() && !rest.is_empty() {
            self.push(Entry::Blank { ordinal: blank });
        }
        self.entries_mut().extend(rest);
    }

    /// Append `lines` to the current header.
    pub fn add_header<S: AsRef<str>>(&mut self, lines: &[S]) {
        let mut header = self.header();
        header.extend(lines.iter().map(|l| l.as_ref().to_string()));
        self.set_header(&header);
    }

    /// Replace the header with `lines` centred in a box.
    pub fn framed_header<S: AsRef<str>>(&mut self, lines: &[S]) {
        self.set_header(&frame(lines));
    }
}

/// Build the lines of a framed header. Lines wider than the frame are dropped.
pub fn frame<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let border = format!("# +{}+ #", "-".repeat(FRAME_WIDTH + 2));
    let mut framed = vec![border.clone()];

    for line in lines {
        let line = line.as_ref();
        let len = line.chars().count();
        if len > FRAME_WIDTH {
            continue;
        }
        let pad = (FRAME_WIDTH - len) / 2;
        let extra = if len % 2 != 0 { " " } else { "" };
        framed.push(format!(
            "# < {}{line}{}{extra} > #",
            " ".repeat(pad),
            " ".repeat(pad)
        ));
    }

    framed.push(border);
    framed
}

/// Next free comment and blank ordinals after every marker in `entries`.
fn next_ordinals(entries: &[Entry]) -> (u64, u64) {
    let mut comment = 0;
    let mut blank = 0;
    for entry in entries {
        match entry {
            Entry::Comment { ordinal, .. } => comment = comment.max(ordinal + 1),
            Entry::Blank { ordinal } => blank = blank.max(ordinal + 1),
            Entry::Block { body, .. } => {
                let (c, b) = next_ordinals(body.entries());
                comment = comment.max(c);
                blank = blank.max(b);
            }
            _ => {}
        }
    }
    (comment, blank)
}
