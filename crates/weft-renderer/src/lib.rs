//! Textile documents with rule dispatch and pluggable output backends.
//!
//! A [`MarkupDocument`] owns raw Textile text and the [`RestrictionSet`] that
//! governs how it may be rendered. Rendering is a two-stage pipeline:
//!
//! 1. **Rule application**: named rules from the document's [`RuleSet`] run in
//!    order and may rewrite the text or toggle restrictions. Names with no
//!    registered rule are skipped.
//! 2. **Formatting**: the document is handed to a [`Formatter`], which drives
//!    the generic [`TextileRenderer`] over an [`HtmlBackend`] or
//!    [`LatexBackend`].
//!
//! # Example
//!
//! ```
//! use weft_renderer::{Directive, MarkupDocument};
//!
//! let mut doc = MarkupDocument::new("And then? She *fell*!", Vec::<Directive>::new()).unwrap();
//! let html = doc.render_html(&[] as &[&str]).unwrap();
//! assert_eq!(html, "<p>And then? She <strong>fell</strong>!</p>");
//!
//! let latex = doc.render_latex(&["normalize_newlines"]).unwrap();
//! assert_eq!(latex, r"And then? She \textbf{fell}!");
//! ```

mod attributes;
mod backend;
mod document;
mod error;
mod formatter;
mod html;
mod latex;
mod rules;
mod textile;

pub use attributes::Attributes;
pub use backend::{Phrase, RenderBackend};
pub use document::MarkupDocument;
pub use error::FormatError;
pub use formatter::{Formatter, UnknownFormatterError};
pub use html::{HtmlBackend, escape_html};
pub use latex::{LatexBackend, escape_latex};
pub use rules::{RuleFn, RuleSet};
pub use textile::TextileRenderer;
pub use weft_restrictions::{
    Directive, Restriction, RestrictionSet, RestrictionValue, TagNames, UnknownRestrictionError,
};
