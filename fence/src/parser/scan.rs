use log::debug;

use crate::block::{CodeBlock, OutputBlock};
use crate::document::Document;
use crate::parser::error::LocateError;
use crate::parser::{is_fence, is_output_fence, parse_fence};

// ---------------------------------------------------------------------------
// Fence stream
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceRole {
    Open,
    Close,
}

/// A fence line classified by its position in the open/close sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fence {
    pub line: usize,
    pub language: String,
    pub role: FenceRole,
}

/// Iterate the fence lines of `doc` from the top, alternating open/close.
///
/// Any fence line closes the currently open block, tag or not; there is no
/// nesting.
pub fn fences<D: Document + ?Sized>(doc: &D) -> Fences<'_, D> {
    Fences {
        doc,
        next_line: 0,
        inside: false,
    }
}

pub struct Fences<'a, D: ?Sized> {
    doc: &'a D,
    next_line: usize,
    inside: bool,
}

impl<D: Document + ?Sized> Iterator for Fences<'_, D> {
    type Item = Fence;

    fn next(&mut self) -> Option<Fence> {
        while self.next_line < self.doc.line_count() {
            let line = self.next_line;
            self.next_line += 1;

            let Some(marker) = self.doc.line(line).and_then(parse_fence) else {
                continue;
            };
            let role = if self.inside {
                FenceRole::Close
            } else {
                FenceRole::Open
            };
            self.inside = !self.inside;
            return Some(Fence {
                line,
                language: marker.language,
                role,
            });
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Every closed fenced block in `doc`, in document order.
///
/// A trailing unclosed block is not reported.
pub fn scan_blocks<D: Document + ?Sized>(doc: &D) -> Vec<CodeBlock> {
    let mut blocks = Vec::new();
    let mut open: Option<Fence> = None;

    for fence in fences(doc) {
        match fence.role {
            FenceRole::Open => open = Some(fence),
            FenceRole::Close => {
                if let Some(opening) = open.take() {
                    blocks.push(CodeBlock {
                        start_line: opening.line,
                        end_line: fence.line,
                        language: opening.language,
                    });
                }
            }
        }
    }

    debug!("scanned {} fenced block(s)", blocks.len());
    blocks
}

/// Find the fenced block whose fences enclose `anchor` (fence lines count as
/// inside).
pub fn locate_enclosing_block<D: Document + ?Sized>(
    doc: &D,
    anchor: usize,
) -> Result<CodeBlock, LocateError> {
    if anchor >= doc.line_count() {
        return Err(LocateError::NoBlockFound { anchor });
    }

    let mut open: Option<Fence> = None;
    for fence in fences(doc) {
        match fence.role {
            FenceRole::Open => {
                if fence.line > anchor {
                    break;
                }
                open = Some(fence);
            }
            FenceRole::Close => {
                let Some(opening) = open.take() else {
                    continue;
                };
                if fence.line >= anchor {
                    debug!(
                        "line {} is inside block {}..={} ({:?})",
                        anchor, opening.line, fence.line, opening.language
                    );
                    return Ok(CodeBlock {
                        start_line: opening.line,
                        end_line: fence.line,
                        language: opening.language,
                    });
                }
            }
        }
    }

    match open {
        Some(opening) => Err(LocateError::UnclosedBlock {
            start_line: opening.line,
        }),
        None => Err(LocateError::NoBlockFound { anchor }),
    }
}

/// Find an `output` block starting on the line right after
/// `code_block_end_line`.
///
/// An output block with no closing fence runs to the end of the document.
pub fn locate_adjacent_output_block<D: Document + ?Sized>(
    doc: &D,
    code_block_end_line: usize,
) -> Option<OutputBlock> {
    let start_line = code_block_end_line + 1;
    if !is_output_fence(doc.line(start_line)?) {
        return None;
    }

    let line_count = doc.line_count();
    let closing = (start_line + 1..line_count).find(|&i| doc.line(i).is_some_and(is_fence));

    Some(match closing {
        Some(line) => OutputBlock {
            start_line,
            end_line: line + 1,
            closed: true,
        },
        None => OutputBlock {
            start_line,
            end_line: line_count,
            closed: false,
        },
    })
}
