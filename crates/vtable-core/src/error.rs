//! Error handling (§7). Every failure mode the core recognizes is
//! recoverable state, not a propagated `Result` — `update` never fails.
//! Controllers record the latest error on `last_error` for the view layer
//! to surface as a banner if it chooses to.

use std::fmt;

/// A recorded, non-fatal controller error (§7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// A `DataChunkError` response (§4.5, §7 "Chunk load failure").
    ChunkLoad { chunk_start: usize, message: String },
    /// A failed `SelectionResponse` (§7 "Selection failure").
    Selection { message: String },
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::ChunkLoad { chunk_start, message } => {
                write!(f, "failed to load chunk at {chunk_start}: {message}")
            }
            ControllerError::Selection { message } => write!(f, "selection failed: {message}"),
        }
    }
}
