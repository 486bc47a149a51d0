use std::fmt;
use std::ops::Range;

/// A line/column coordinate in a [`Document`].
///
/// `ch` counts characters, not bytes. Coordinates past the end of a line
/// clamp to the line end; lines past the last line clamp to the end of the
/// document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub ch: usize,
}

impl Position {
    pub fn new(line: usize, ch: usize) -> Self {
        Position { line, ch }
    }

    /// Start of `line`.
    pub fn line_start(line: usize) -> Self {
        Position { line, ch: 0 }
    }

    /// End of `line`, whatever its length turns out to be.
    pub fn line_end(line: usize) -> Self {
        Position {
            line,
            ch: usize::MAX,
        }
    }
}

/// A line-addressable, mutable text buffer.
///
/// The locator only ever borrows a document for the duration of a call;
/// ownership stays with whoever loaded it (an editor buffer, a file on disk).
pub trait Document {
    /// Number of lines. Always at least 1: empty text is one empty line.
    fn line_count(&self) -> usize;

    /// Text of line `index` without its line terminator.
    fn line(&self, index: usize) -> Option<&str>;

    /// Replace the text between `from` and `to` with `text`.
    fn replace_range(&mut self, from: Position, to: Position, text: &str);
}

/// In-memory [`Document`] over a markdown source string.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDocument {
    lines: Vec<String>,
    crlf: bool,
}

impl TextDocument {
    pub fn new(text: &str) -> Self {
        let crlf = text.contains("\r\n");
        TextDocument {
            lines: split_lines(text),
            crlf,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn line_ending(&self) -> &'static str {
        if self.crlf { "\r\n" } else { "\n" }
    }

    /// Byte range of line `index` in the serialized text, excluding the
    /// terminator. Out-of-range indices map to an empty span at the end.
    pub fn line_span(&self, index: usize) -> Range<usize> {
        let eol = self.line_ending().len();
        let mut offset = 0;
        for (i, line) in self.lines.iter().enumerate() {
            if i == index {
                return offset..offset + line.len();
            }
            offset += line.len() + eol;
        }
        let end = offset.saturating_sub(eol);
        end..end
    }

    /// Byte range covering lines `start..=end`.
    pub fn lines_span(&self, start: usize, end: usize) -> Range<usize> {
        self.line_span(start).start..self.line_span(end).end
    }

    fn clamp(&self, pos: Position) -> (usize, usize) {
        let last = self.lines.len() - 1;
        if pos.line > last {
            return (last, self.lines[last].len());
        }
        let line = &self.lines[pos.line];
        let byte = line
            .char_indices()
            .nth(pos.ch)
            .map(|(i, _)| i)
            .unwrap_or(line.len());
        (pos.line, byte)
    }
}

impl Document for TextDocument {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    fn replace_range(&mut self, from: Position, to: Position, text: &str) {
        let (from, to) = if to < from { (to, from) } else { (from, to) };
        let (start_line, start_byte) = self.clamp(from);
        let (end_line, end_byte) = self.clamp(to);

        let mut joined = String::with_capacity(text.len() + 64);
        joined.push_str(&self.lines[start_line][..start_byte]);
        joined.push_str(text);
        joined.push_str(&self.lines[end_line][end_byte..]);

        self.lines.splice(start_line..=end_line, split_lines(&joined));
    }
}

impl fmt::Display for TextDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let eol = self.line_ending();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str(eol)?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}
