//! Rendering errors.

/// Failure while formatting a document.
///
/// Formatting is all-or-nothing: when this is returned no output is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// An extended block was opened but never closed.
    #[error("Unclosed <{tag}> block opened on line {line}")]
    UnclosedBlock {
        /// Block tag name (e.g. `notextile`).
        tag: &'static str,
        /// 1-based line of the opening tag.
        line: usize,
    },
}
