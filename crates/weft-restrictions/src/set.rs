//! The restriction set attached to a document.

use crate::directive::Directive;
use crate::error::UnknownRestrictionError;
use crate::restriction::{Restriction, RestrictionValue, TagNames};

/// Safety and behavior switches consulted by formatters.
///
/// All flags default to `false` and `disable_inline` to an empty list.
/// Fields are private so that `disable_inline` can only be assigned through
/// [`set_disable_inline`](Self::set_disable_inline), which always stores a list.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RestrictionSet {
    filter_html: bool,
    sanitize_html: bool,
    filter_styles: bool,
    filter_classes: bool,
    filter_ids: bool,
    hard_breaks: bool,
    lite_mode: bool,
    no_span_caps: bool,
    disable_inline: Vec<String>,
}

impl RestrictionSet {
    /// Create a set with every restriction at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set by applying directives in order to a fresh default set.
    ///
    /// Later directives overwrite options set by earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRestrictionError`] for the first option name that is
    /// not a [`Restriction`]. Nothing of the partially built set escapes.
    pub fn from_directives<I>(directives: I) -> Result<Self, UnknownRestrictionError>
    where
        I: IntoIterator,
        I::Item: Into<Directive>,
    {
        let mut set = Self::new();
        for directive in directives {
            set.apply(&directive.into())?;
        }
        Ok(set)
    }

    /// Apply a single directive.
    ///
    /// A flag sets its option to `true`; a keyed directive assigns each entry.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRestrictionError`] naming the unrecognized option.
    /// Keyed entries are resolved before any is assigned, so a failing
    /// directive leaves the set unchanged.
    pub fn apply(&mut self, directive: &Directive) -> Result<(), UnknownRestrictionError> {
        match directive {
            Directive::Flag(name) => {
                let restriction: Restriction = name.parse()?;
                self.set(restriction, RestrictionValue::Bool(true));
            }
            Directive::Keyed(entries) => {
                let resolved = entries
                    .iter()
                    .map(|(name, value)| name.parse::<Restriction>().map(|r| (r, value)))
                    .collect::<Result<Vec<_>, UnknownRestrictionError>>()?;
                for (restriction, value) in resolved {
                    self.set(restriction, value.clone());
                }
            }
        }
        Ok(())
    }

    /// Assign a value to the option named by `restriction`.
    ///
    /// Boolean options take the value's truthiness; `disable_inline` is
    /// normalized to a list.
    pub fn set(&mut self, restriction: Restriction, value: RestrictionValue) {
        match restriction {
            Restriction::FilterHtml => self.set_filter_html(value.is_truthy()),
            Restriction::SanitizeHtml => self.set_sanitize_html(value.is_truthy()),
            Restriction::FilterStyles => self.set_filter_styles(value.is_truthy()),
            Restriction::FilterClasses => self.set_filter_classes(value.is_truthy()),
            Restriction::FilterIds => self.set_filter_ids(value.is_truthy()),
            Restriction::HardBreaks => self.set_hard_breaks(value.is_truthy()),
            Restriction::LiteMode => self.set_lite_mode(value.is_truthy()),
            Restriction::NoSpanCaps => self.set_no_span_caps(value.is_truthy()),
            Restriction::DisableInline => self.set_disable_inline(value),
        }
    }

    pub fn filter_html(&self) -> bool {
        self.filter_html
    }

    pub fn set_filter_html(&mut self, value: bool) {
        self.filter_html = value;
    }

    pub fn sanitize_html(&self) -> bool {
        self.sanitize_html
    }

    pub fn set_sanitize_html(&mut self, value: bool) {
        self.sanitize_html = value;
    }

    pub fn filter_styles(&self) -> bool {
        self.filter_styles
    }

    pub fn set_filter_styles(&mut self, value: bool) {
        self.filter_styles = value;
    }

    pub fn filter_classes(&self) -> bool {
        self.filter_classes
    }

    pub fn set_filter_classes(&mut self, value: bool) {
        self.filter_classes = value;
    }

    pub fn filter_ids(&self) -> bool {
        self.filter_ids
    }

    pub fn set_filter_ids(&mut self, value: bool) {
        self.filter_ids = value;
    }

    /// Whether single newlines become line breaks.
    ///
    /// Deprecated in Textile usage but still honored as an ordinary flag.
    pub fn hard_breaks(&self) -> bool {
        self.hard_breaks
    }

    pub fn set_hard_breaks(&mut self, value: bool) {
        self.hard_breaks = value;
    }

    pub fn lite_mode(&self) -> bool {
        self.lite_mode
    }

    pub fn set_lite_mode(&mut self, value: bool) {
        self.lite_mode = value;
    }

    pub fn no_span_caps(&self) -> bool {
        self.no_span_caps
    }

    pub fn set_no_span_caps(&mut self, value: bool) {
        self.no_span_caps = value;
    }

    /// Names of disabled inline constructs (e.g. `"image"`, `"strong"`).
    pub fn disable_inline(&self) -> &[String] {
        &self.disable_inline
    }

    /// Replace the disabled inline constructs.
    ///
    /// A single name is stored as a one-element list. The previous list is
    /// replaced, never merged.
    pub fn set_disable_inline(&mut self, value: impl Into<TagNames>) {
        self.disable_inline = value.into().into_vec();
    }

    /// Whether the inline construct `name` is disabled.
    pub fn is_inline_disabled(&self, name: &str) -> bool {
        self.disable_inline.iter().any(|n| n == name)
    }
}
