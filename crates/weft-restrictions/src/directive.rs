//! Caller-supplied restriction directives.

use std::collections::BTreeMap;

use crate::restriction::{Restriction, RestrictionValue};

/// An instruction that configures a [`RestrictionSet`](crate::RestrictionSet).
///
/// With the `serde` feature, a directive deserializes from either a string
/// (flag) or a map (keyed), so `["filter_html", {"disable_inline": "image"}]`
/// is a valid directive list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Directive {
    /// Bare option name; sets the option to `true`.
    Flag(String),
    /// Option-name to value assignments.
    Keyed(BTreeMap<String, RestrictionValue>),
}

impl Directive {
    /// Create a flag directive.
    #[must_use]
    pub fn flag(name: impl Into<String>) -> Self {
        Self::Flag(name.into())
    }

    /// Create a keyed directive from option-value pairs.
    #[must_use]
    pub fn keyed<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, RestrictionValue)>,
    {
        Self::Keyed(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<&str> for Directive {
    fn from(name: &str) -> Self {
        Self::flag(name)
    }
}

impl From<String> for Directive {
    fn from(name: String) -> Self {
        Self::Flag(name)
    }
}

impl From<Restriction> for Directive {
    fn from(restriction: Restriction) -> Self {
        Self::flag(restriction.as_str())
    }
}

impl From<(Restriction, RestrictionValue)> for Directive {
    fn from((restriction, value): (Restriction, RestrictionValue)) -> Self {
        Self::keyed([(restriction.as_str(), value)])
    }
}
