pub mod error;
mod scan;

pub use error::LocateError;
pub use scan::{
    Fence, FenceRole, fences, locate_adjacent_output_block, locate_enclosing_block, scan_blocks,
};

/// The three-backtick fence marker.
pub const FENCE: &str = "```";

/// Opening fence of an output block.
pub const OUTPUT_FENCE: &str = "```output";

/// A fence line, as seen in isolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceMarker {
    /// Lowercased word-character run following the backticks; may be empty.
    pub language: String,
}

/// Parse `line` as a fence marker. Leading and trailing whitespace is ignored.
pub fn parse_fence(line: &str) -> Option<FenceMarker> {
    let rest = line.trim().strip_prefix(FENCE)?;
    let tag_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    Some(FenceMarker {
        language: rest[..tag_len].to_ascii_lowercase(),
    })
}

pub fn is_fence(line: &str) -> bool {
    line.trim().starts_with(FENCE)
}

pub fn is_output_fence(line: &str) -> bool {
    line.trim().starts_with(OUTPUT_FENCE)
}
