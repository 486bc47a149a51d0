pub mod block;
pub mod document;
pub mod edit;
pub mod parser;

pub use block::{CodeBlock, OutputBlock};
pub use document::{Document, Position, TextDocument};
pub use edit::{Edit, compute_replacement};
pub use parser::{
    LocateError, locate_adjacent_output_block, locate_enclosing_block, scan_blocks,
};
