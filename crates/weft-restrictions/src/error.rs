//! Restriction errors.

/// A directive named an option that has no setter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown restriction: {name}")]
pub struct UnknownRestrictionError {
    /// The option name as supplied by the caller.
    pub name: String,
}

impl UnknownRestrictionError {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
