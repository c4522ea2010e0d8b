use crate::router::InputLine;
use crate::InterruptSource;

/// Reasons the edge interrupt configuration could not be applied.
///
/// These are fatal to the caller; the router never retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError<E> {
    /// the HAL refused to select any-edge triggering for a line
    EdgeSelect { line: InputLine, error: E },
    /// the HAL refused to attach a line to its interrupt source
    LineEnable { line: InputLine, error: E },
    /// stale pending flags could not be cleared
    PendingClear { source: InterruptSource, error: E },
    /// the interrupt source could not be unmasked
    SourceEnable { source: InterruptSource, error: E },
}
