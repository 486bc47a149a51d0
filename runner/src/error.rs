use fence::{CodeBlock, LocateError};

use crate::dispatch::RouteError;

/// A run rejected before any request was sent or the document touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Locate(#[from] LocateError),

    #[error("{source}")]
    Route {
        /// The block whose language was rejected.
        block: CodeBlock,
        #[source]
        source: RouteError,
    },
}

impl RunError {
    /// Zero-based line the error points at.
    pub fn line(&self) -> usize {
        match self {
            RunError::Locate(error) => error.line(),
            RunError::Route { block, .. } => block.start_line,
        }
    }
}
