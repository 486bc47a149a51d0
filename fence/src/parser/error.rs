use codespan_reporting::diagnostic::{Diagnostic, Label};

use crate::document::{Document, TextDocument};

/// Why no code block could be resolved for a cursor line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocateError {
    #[error("no fenced code block encloses line {}", .anchor + 1)]
    NoBlockFound { anchor: usize },

    #[error("code block opened on line {} is never closed", .start_line + 1)]
    UnclosedBlock { start_line: usize },
}

impl LocateError {
    /// The zero-based line the error points at.
    pub fn line(&self) -> usize {
        match self {
            LocateError::NoBlockFound { anchor } => *anchor,
            LocateError::UnclosedBlock { start_line } => *start_line,
        }
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self, file_id: usize, doc: &TextDocument) -> Diagnostic<usize> {
        let hint = match self {
            LocateError::NoBlockFound { .. } => "place the cursor on or between a pair of ``` fences",
            LocateError::UnclosedBlock { .. } => "add a closing ``` line after the block body",
        };
        let mut notes = Vec::new();
        let label = match self {
            LocateError::NoBlockFound { anchor } if *anchor >= doc.line_count() => {
                notes.push(format!(
                    "line {} is past the end of the file, which has {} lines",
                    anchor + 1,
                    doc.line_count()
                ));
                "end of file"
            }
            LocateError::NoBlockFound { .. } => "cursor is here",
            LocateError::UnclosedBlock { .. } => "opening fence",
        };
        notes.push(hint.to_string());
        Diagnostic::error()
            .with_message(self.to_string())
            .with_labels(vec![
                Label::primary(file_id, doc.line_span(self.line())).with_message(label),
            ])
            .with_notes(notes)
    }
}
