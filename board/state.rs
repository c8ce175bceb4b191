use std::sync::Arc;

use ferrite_live::{Pipeline, ViewerConfig};

/// Process-wide dashboard context, built once in `main`.
///
/// Immutable: each handler and SSE stream runs its own ticks against the
/// shared pipeline, so no lock is needed.
pub struct BoardState {
    pub pipeline: Pipeline,
}

impl BoardState {
    pub fn new(config: ViewerConfig) -> ferrite_live::Result<Self> {
        Ok(BoardState { pipeline: Pipeline::new(config)? })
    }
}

/// Shared state type: an `Arc<BoardState>` passed to every handler.
pub type SharedState = Arc<BoardState>;
