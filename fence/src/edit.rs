use crate::block::OutputBlock;
use crate::document::{Document, Position};
use crate::parser::{FENCE, OUTPUT_FENCE};

/// Body written when a run produced no text at all.
pub const NO_OUTPUT: &str = "<no output>";

/// A single replace-range edit, applied atomically to a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub from: Position,
    pub to: Position,
    pub text: String,
}

impl Edit {
    pub fn apply<D: Document + ?Sized>(&self, doc: &mut D) {
        doc.replace_range(self.from, self.to, &self.text);
    }

    pub fn is_insertion(&self) -> bool {
        self.from == self.to
    }
}

/// Render the four-line output block: opening fence, body, closing fence,
/// trailing blank line.
///
/// Trailing line breaks of `output` are dropped so `"2\n"` renders as `2`.
pub fn render_output_block(output: &str) -> String {
    let body = output.trim_end_matches(['\n', '\r']);
    let body = if body.is_empty() { NO_OUTPUT } else { body };
    format!("{OUTPUT_FENCE}\n{body}\n{FENCE}\n")
}

/// Compute the edit that writes `output` below the code block closing on
/// `code_block_end_line`.
///
/// With an existing output block the edit replaces exactly its lines.
/// Otherwise the block is inserted at the end of the closing fence line,
/// behind a line break, so it lands on the very next line.
pub fn compute_replacement(
    code_block_end_line: usize,
    existing: Option<&OutputBlock>,
    output: &str,
) -> Edit {
    let block = render_output_block(output);
    match existing {
        Some(out) => Edit {
            from: Position::line_start(out.start_line),
            to: Position::line_start(out.end_line),
            text: block,
        },
        None => {
            let at = Position::line_end(code_block_end_line);
            Edit {
                from: at,
                to: at,
                text: format!("\n{block}"),
            }
        }
    }
}
