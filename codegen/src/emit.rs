//! Line-oriented source buffer shared by every target formatter.

use std::fmt::Write as FmtWrite;

/// A generated source file under construction.
///
/// The header is a block of line comments in the target's comment syntax.
/// Callers append lines directly (or through `writeln!` on [`buf`](Self::buf))
/// and call [`finish`](Self::finish) to obtain the text.
pub struct SourceFile {
    /// Accumulated source text.
    pub buf: String,
}

impl SourceFile {
    /// Starts a file with a comment header. Each line of `header` becomes one
    /// comment line prefixed by `comment`.
    pub fn new(comment: &str, header: &str) -> Self {
        let mut buf = String::with_capacity(4096);
        for line in header.lines() {
            if line.is_empty() {
                let _ = writeln!(buf, "{comment}");
            } else {
                let _ = writeln!(buf, "{comment} {line}");
            }
        }
        Self { buf }
    }

    /// Starts a file with no header.
    pub fn bare() -> Self {
        Self {
            buf: String::with_capacity(4096),
        }
    }

    /// Appends one line.
    pub fn line(&mut self, line: &str) {
        self.buf.push_str(line);
        self.buf.push('\n');
    }

    /// Appends an empty line, collapsing runs of blank lines.
    pub fn blank(&mut self) {
        if !self.buf.is_empty() && !self.buf.ends_with("\n\n") {
            self.buf.push('\n');
        }
    }

    /// Returns the text, ending in exactly one newline.
    #[must_use]
    pub fn finish(self) -> String {
        let mut out = self.buf;
        let trimmed = out.trim_end().len();
        out.truncate(trimmed);
        out.push('\n');
        out
    }
}

/// Collapses internal whitespace so a description fits on one comment line.
#[must_use]
pub fn normalize_comment(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Quotes a string as a double-quoted literal valid in Python, Java and C++.
#[must_use]
pub fn quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}
