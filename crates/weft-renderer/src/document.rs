//! The document value: raw markup, its restrictions, and the rules it knows.

use std::fmt;
use std::sync::Arc;

use weft_restrictions::{Directive, RestrictionSet, UnknownRestrictionError};

use crate::error::FormatError;
use crate::formatter::Formatter;
use crate::rules::RuleSet;

/// Raw Textile markup with the restrictions that govern its rendering.
///
/// Cloning is cheap apart from the text: the rule registry is shared.
#[derive(Clone)]
pub struct MarkupDocument {
    text: String,
    restrictions: RestrictionSet,
    rules: Arc<RuleSet>,
}

impl fmt::Debug for MarkupDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkupDocument")
            .field("text", &self.text)
            .field("restrictions", &self.restrictions)
            .field("rules", &self.rules.names())
            .finish()
    }
}

impl MarkupDocument {
    /// Create a document, applying directives in order to a fresh
    /// [`RestrictionSet`]. The built-in [`RuleSet`] is attached.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRestrictionError`] if any directive names an option
    /// that does not exist. No document is created in that case.
    pub fn new<I>(text: impl Into<String>, directives: I) -> Result<Self, UnknownRestrictionError>
    where
        I: IntoIterator,
        I::Item: Into<Directive>,
    {
        let restrictions = RestrictionSet::from_directives(directives)?;
        Ok(Self {
            text: text.into(),
            restrictions,
            rules: Arc::new(RuleSet::builtin()),
        })
    }

    /// Replace the rule registry.
    #[must_use]
    pub fn with_rules(mut self, rules: impl Into<Arc<RuleSet>>) -> Self {
        self.rules = rules.into();
        self
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Mutable access to the text, for rule handlers.
    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }

    #[must_use]
    pub fn restrictions(&self) -> &RestrictionSet {
        &self.restrictions
    }

    pub fn restrictions_mut(&mut self) -> &mut RestrictionSet {
        &mut self.restrictions
    }

    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Run the named rules in order. Names with no registered handler are
    /// skipped.
    pub fn apply_rules<S: AsRef<str>>(&mut self, rule_names: &[S]) {
        let rules = Arc::clone(&self.rules);
        for name in rule_names {
            let name = name.as_ref();
            if let Some(handler) = rules.get(name) {
                tracing::debug!(rule = name, "Applying rule");
                handler(self);
            } else {
                tracing::debug!(rule = name, "Skipping unknown rule");
            }
        }
    }

    /// Apply the named rules, then format with `formatter`.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] if the formatter rejects the markup. Rules
    /// already applied stay applied.
    pub fn render<S: AsRef<str>>(
        &mut self,
        formatter: Formatter,
        rule_names: &[S],
    ) -> Result<String, FormatError> {
        self.apply_rules(rule_names);
        formatter.format(self)
    }

    /// Apply the named rules and render HTML.
    ///
    /// # Errors
    ///
    /// See [`render`](Self::render).
    pub fn render_html<S: AsRef<str>>(&mut self, rule_names: &[S]) -> Result<String, FormatError> {
        self.render(Formatter::Html, rule_names)
    }

    /// Apply the named rules and render LaTeX.
    ///
    /// # Errors
    ///
    /// See [`render`](Self::render).
    pub fn render_latex<S: AsRef<str>>(&mut self, rule_names: &[S]) -> Result<String, FormatError> {
        self.render(Formatter::Latex, rule_names)
    }
}
