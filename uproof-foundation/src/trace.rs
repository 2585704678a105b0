//! Tracing support for harness exploration
//!
//! Span constructors for the explorer, in the shape the rest of the
//! workspace logs with. Only compiled with the `tracing` feature.

#![cfg(feature = "tracing")]

pub use tracing::{debug, info, trace, warn, Span};
use tracing::{debug_span, info_span, trace_span};

/// Trace spans for exploration
#[derive(Debug, Clone)]
pub struct ExplorationTrace;

impl ExplorationTrace {
    /// Span covering the exploration of one harness
    #[inline]
    pub fn harness(name: &str, target: &str) -> Span {
        info_span!("explore_harness", harness = %name, target = %target)
    }

    /// Span covering one path of the choice tree
    #[inline]
    pub fn path(index: usize) -> Span {
        debug_span!("explore_path", path = %index)
    }

    /// Span covering the replay of a concrete scenario
    #[inline]
    pub fn replay(name: &str) -> Span {
        trace_span!("replay", harness = %name)
    }
}
