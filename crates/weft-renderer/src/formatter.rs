//! Output format selection.

use std::fmt;
use std::str::FromStr;

use crate::document::MarkupDocument;
use crate::error::FormatError;
use crate::html::HtmlBackend;
use crate::latex::LatexBackend;
use crate::textile::TextileRenderer;

/// Output formats a document can be rendered to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Formatter {
    #[default]
    Html,
    Latex,
}

/// Error returned when parsing an unknown formatter name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown formatter: {name}")]
pub struct UnknownFormatterError {
    pub name: String,
}

impl Formatter {
    /// Render the document's current text under its current restrictions.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] if the markup cannot be rendered.
    pub fn format(self, document: &MarkupDocument) -> Result<String, FormatError> {
        tracing::debug!(formatter = %self, len = document.text().len(), "Formatting document");
        let restrictions = document.restrictions();
        match self {
            Self::Html => TextileRenderer::<HtmlBackend>::new(restrictions).render(document.text()),
            Self::Latex => {
                TextileRenderer::<LatexBackend>::new(restrictions).render(document.text())
            }
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Latex => "latex",
        }
    }
}

impl fmt::Display for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Formatter {
    type Err = UnknownFormatterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("html") {
            Ok(Self::Html)
        } else if s.eq_ignore_ascii_case("latex") {
            Ok(Self::Latex)
        } else {
            Err(UnknownFormatterError { name: s.to_owned() })
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use weft_restrictions::Directive;

    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("html".parse::<Formatter>().unwrap(), Formatter::Html);
        assert_eq!("LaTeX".parse::<Formatter>().unwrap(), Formatter::Latex);
        assert_eq!(
            "pdf".parse::<Formatter>().unwrap_err(),
            UnknownFormatterError {
                name: "pdf".to_owned()
            }
        );
    }

    #[test]
    fn test_display_round_trips() {
        for formatter in [Formatter::Html, Formatter::Latex] {
            assert_eq!(formatter.to_string().parse::<Formatter>().unwrap(), formatter);
        }
    }

    #[test]
    fn test_default_is_html() {
        assert_eq!(Formatter::default(), Formatter::Html);
    }

    #[test]
    fn test_format_does_not_mutate() {
        let doc = MarkupDocument::new("a & b", Vec::<Directive>::new()).unwrap();
        assert_eq!(Formatter::Html.format(&doc).unwrap(), "<p>a &amp; b</p>");
        assert_eq!(Formatter::Latex.format(&doc).unwrap(), r"a \& b");
        assert_eq!(doc.text(), "a & b");
    }

    #[test]
    fn test_error_message() {
        let err = "rtf".parse::<Formatter>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown formatter: rtf");
    }
}
