//! Restriction names and the values directives carry.

use std::fmt;
use std::str::FromStr;

use crate::error::UnknownRestrictionError;

/// Every option a directive may name.
///
/// Directive names are matched against this list only; there is no other way
/// to reach a [`RestrictionSet`](crate::RestrictionSet) setter by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Restriction {
    /// Escape unauthorized raw HTML.
    FilterHtml,
    /// Pass raw HTML through the allow-list sanitizer.
    SanitizeHtml,
    /// Drop inline `{style}` attributes.
    FilterStyles,
    /// Drop `(class)` attributes.
    FilterClasses,
    /// Drop `(#id)` attributes.
    FilterIds,
    /// Treat single newlines as line breaks. Deprecated.
    HardBreaks,
    /// Disable block-level rules.
    LiteMode,
    /// Do not wrap runs of capitals in caps spans.
    NoSpanCaps,
    /// Named inline constructs to disable.
    DisableInline,
}

impl Restriction {
    /// All restrictions in declaration order.
    pub const ALL: [Self; 9] = [
        Self::FilterHtml,
        Self::SanitizeHtml,
        Self::FilterStyles,
        Self::FilterClasses,
        Self::FilterIds,
        Self::HardBreaks,
        Self::LiteMode,
        Self::NoSpanCaps,
        Self::DisableInline,
    ];

    /// Option name as used in directives and configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FilterHtml => "filter_html",
            Self::SanitizeHtml => "sanitize_html",
            Self::FilterStyles => "filter_styles",
            Self::FilterClasses => "filter_classes",
            Self::FilterIds => "filter_ids",
            Self::HardBreaks => "hard_breaks",
            Self::LiteMode => "lite_mode",
            Self::NoSpanCaps => "no_span_caps",
            Self::DisableInline => "disable_inline",
        }
    }
}

impl FromStr for Restriction {
    type Err = UnknownRestrictionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRestrictionError::new(s))
    }
}

impl fmt::Display for Restriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value supplied for an option in a keyed directive.
///
/// Boolean options take the truthiness of the value: `Bool(b)` is `b`, any
/// text or list counts as `true`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum RestrictionValue {
    Bool(bool),
    Text(String),
    List(Vec<String>),
}

impl RestrictionValue {
    /// Truthiness used when the value is assigned to a boolean option.
    #[must_use]
    pub const fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(_) | Self::List(_) => true,
        }
    }
}

impl From<bool> for RestrictionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for RestrictionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for RestrictionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for RestrictionValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for RestrictionValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(str::to_owned).collect())
    }
}

/// Argument of [`RestrictionSet::set_disable_inline`](crate::RestrictionSet::set_disable_inline).
///
/// A single name is wrapped into a one-element list on assignment; a list is
/// stored as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagNames {
    Single(String),
    List(Vec<String>),
}

impl TagNames {
    /// Normalize into the stored list form.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::Single(name) => vec![name],
            Self::List(names) => names,
        }
    }
}

impl From<&str> for TagNames {
    fn from(value: &str) -> Self {
        Self::Single(value.to_owned())
    }
}

impl From<String> for TagNames {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for TagNames {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for TagNames {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(str::to_owned).collect())
    }
}

impl From<&[&str]> for TagNames {
    fn from(value: &[&str]) -> Self {
        Self::List(value.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl From<&[String]> for TagNames {
    fn from(value: &[String]) -> Self {
        Self::List(value.to_vec())
    }
}

impl From<RestrictionValue> for TagNames {
    fn from(value: RestrictionValue) -> Self {
        match value {
            RestrictionValue::Bool(b) => Self::Single(b.to_string()),
            RestrictionValue::Text(name) => Self::Single(name),
            RestrictionValue::List(names) => Self::List(names),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restriction_names_round_trip() {
        for restriction in Restriction::ALL {
            assert_eq!(restriction.as_str().parse::<Restriction>(), Ok(restriction));
        }
    }

    #[test]
    fn test_unknown_restriction_name() {
        let err = "not_a_real_flag".parse::<Restriction>().unwrap_err();
        assert_eq!(err.name, "not_a_real_flag");
        assert_eq!(err.to_string(), "Unknown restriction: not_a_real_flag");
    }

    #[test]
    fn test_restriction_names_are_case_sensitive() {
        assert!("Filter_HTML".parse::<Restriction>().is_err());
    }

    #[test]
    fn test_display_uses_option_name() {
        assert_eq!(Restriction::NoSpanCaps.to_string(), "no_span_caps");
    }

    #[test]
    fn test_truthiness() {
        assert!(RestrictionValue::Bool(true).is_truthy());
        assert!(!RestrictionValue::Bool(false).is_truthy());
        assert!(RestrictionValue::from("no").is_truthy());
        assert!(RestrictionValue::List(Vec::new()).is_truthy());
    }

    #[test]
    fn test_tag_names_scalar_is_wrapped() {
        assert_eq!(TagNames::from("image").into_vec(), vec!["image"]);
        assert_eq!(
            TagNames::from(RestrictionValue::Bool(true)).into_vec(),
            vec!["true"]
        );
    }

    #[test]
    fn test_tag_names_list_is_kept() {
        let names = TagNames::from(vec!["image", "strong"]).into_vec();
        assert_eq!(names, vec!["image", "strong"]);
        assert!(TagNames::from(Vec::<String>::new()).into_vec().is_empty());
    }
}
