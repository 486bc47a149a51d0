use crate::document::Document;

/// A fenced code block located in a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Line of the opening fence.
    pub start_line: usize,
    /// Line of the closing fence.
    pub end_line: usize,
    /// Lowercased language tag from the opening fence; empty when absent.
    pub language: String,
}

impl CodeBlock {
    /// The lines strictly between the fences, joined with `\n`.
    pub fn body<D: Document + ?Sized>(&self, doc: &D) -> String {
        join_lines(doc, self.start_line + 1, self.end_line)
    }

    pub fn is_output(&self) -> bool {
        self.language == "output"
    }
}

/// An `output` fenced block sitting directly below a [`CodeBlock`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputBlock {
    /// Line of the ```` ```output ```` fence.
    pub start_line: usize,
    /// One past the closing fence, or the line count when unclosed.
    pub end_line: usize,
    /// Whether a closing fence was found before the end of the document.
    pub closed: bool,
}

impl OutputBlock {
    pub fn body<D: Document + ?Sized>(&self, doc: &D) -> String {
        let body_end = if self.closed {
            self.end_line - 1
        } else {
            self.end_line
        };
        join_lines(doc, self.start_line + 1, body_end)
    }

    pub fn line_len(&self) -> usize {
        self.end_line - self.start_line
    }
}

fn join_lines<D: Document + ?Sized>(doc: &D, start: usize, end: usize) -> String {
    (start..end)
        .filter_map(|i| doc.line(i))
        .collect::<Vec<_>>()
        .join("\n")
}
