//! Named pre-processing rules applied to a document before formatting.
//!
//! Rule lookup is lenient: a name with no registered handler is skipped by
//! [`MarkupDocument::apply_rules`](crate::MarkupDocument::apply_rules).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::document::MarkupDocument;

/// Handler invoked with exclusive access to the document.
pub type RuleFn = dyn Fn(&mut MarkupDocument) + Send + Sync;

/// Registry mapping rule names to handlers.
///
/// # Example
///
/// ```
/// use weft_renderer::{Directive, MarkupDocument, RuleSet};
///
/// let rules = RuleSet::builtin().with_rule("shout", |doc: &mut MarkupDocument| {
///     let upper = doc.text().to_uppercase();
///     *doc.text_mut() = upper;
/// });
///
/// let mut doc = MarkupDocument::new("hi", Vec::<Directive>::new())
///     .unwrap()
///     .with_rules(rules);
/// doc.apply_rules(&["shout", "whisper"]);
/// assert_eq!(doc.text(), "HI");
/// ```
#[derive(Clone)]
pub struct RuleSet {
    handlers: HashMap<String, Arc<RuleFn>>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("rules", &self.names())
            .finish()
    }
}

impl RuleSet {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Create a registry with the built-in rules.
    ///
    /// | rule | effect |
    /// |---|---|
    /// | `normalize_newlines` | `\r\n` and `\r` become `\n` |
    /// | `strip_trailing_whitespace` | trailing spaces and tabs removed from each line |
    /// | `hard_breaks` | enables `hard_breaks` |
    /// | `lite_mode` | enables `lite_mode` |
    /// | `filter_html` | enables `filter_html` |
    /// | `no_span_caps` | enables `no_span_caps` |
    #[must_use]
    pub fn builtin() -> Self {
        Self::new()
            .with_rule("normalize_newlines", normalize_newlines)
            .with_rule("strip_trailing_whitespace", strip_trailing_whitespace)
            .with_rule("hard_breaks", |doc: &mut MarkupDocument| {
                doc.restrictions_mut().set_hard_breaks(true);
            })
            .with_rule("lite_mode", |doc: &mut MarkupDocument| {
                doc.restrictions_mut().set_lite_mode(true);
            })
            .with_rule("filter_html", |doc: &mut MarkupDocument| {
                doc.restrictions_mut().set_filter_html(true);
            })
            .with_rule("no_span_caps", |doc: &mut MarkupDocument| {
                doc.restrictions_mut().set_no_span_caps(true);
            })
    }

    /// Register a rule, replacing any rule already registered under `name`.
    #[must_use]
    pub fn with_rule<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut MarkupDocument) + Send + Sync + 'static,
    {
        self.insert(name, handler);
        self
    }

    /// Register a rule in place, replacing any rule already registered under `name`.
    pub fn insert<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&mut MarkupDocument) + Send + Sync + 'static,
    {
        self.handlers.insert(name.into(), Arc::new(handler));
    }

    /// Look up the handler registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<RuleFn>> {
        self.handlers.get(name)
    }

    /// Registered rule names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn normalize_newlines(doc: &mut MarkupDocument) {
    if doc.text().contains('\r') {
        let normalized = doc.text().replace("\r\n", "\n").replace('\r', "\n");
        *doc.text_mut() = normalized;
    }
}

fn strip_trailing_whitespace(doc: &mut MarkupDocument) {
    let text = doc.text();
    let mut stripped = String::with_capacity(text.len());
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            stripped.push('\n');
        }
        stripped.push_str(line.trim_end_matches([' ', '\t']));
    }
    *doc.text_mut() = stripped;
}
