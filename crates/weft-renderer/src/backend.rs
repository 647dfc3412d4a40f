//! Render backend trait for format-specific output.
//!
//! The generic [`TextileRenderer`](crate::TextileRenderer) decides *what* a
//! block or phrase is; a backend decides how it is written. Backends are
//! stateless and write into a caller-provided buffer.

use weft_restrictions::RestrictionSet;

use crate::attributes::Attributes;

/// Phrase modifiers with their Textile delimiters.
///
/// [`name`](Self::name) is the symbolic tag name matched against
/// `disable_inline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phrase {
    Strong,
    Emphasis,
    Bold,
    Italic,
    Deleted,
    Inserted,
    Superscript,
    Subscript,
    Citation,
    Span,
}

impl Phrase {
    /// Delimiter pairs in match order; doubled delimiters come first.
    pub(crate) const BY_DELIMITER: [(&'static str, Self); 10] = [
        ("**", Self::Bold),
        ("__", Self::Italic),
        ("??", Self::Citation),
        ("*", Self::Strong),
        ("_", Self::Emphasis),
        ("-", Self::Deleted),
        ("+", Self::Inserted),
        ("^", Self::Superscript),
        ("~", Self::Subscript),
        ("%", Self::Span),
    ];

    /// Symbolic name, as used in `disable_inline`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Emphasis => "em",
            Self::Bold => "b",
            Self::Italic => "i",
            Self::Deleted => "del",
            Self::Inserted => "ins",
            Self::Superscript => "sup",
            Self::Subscript => "sub",
            Self::Citation => "cite",
            Self::Span => "span",
        }
    }
}

/// Backend trait for format-specific rendering operations.
///
/// Block methods are called once per block; `text` receives every run of
/// plain text and must escape it for the target format.
pub trait RenderBackend {
    /// Separator written between rendered blocks.
    const BLOCK_SEPARATOR: &'static str;

    /// Write escaped plain text.
    fn text(text: &str, out: &mut String);

    /// Render a forced line break (`hard_breaks`, lite mode).
    fn line_break(out: &mut String);

    fn paragraph_start(attrs: &Attributes, out: &mut String);

    fn paragraph_end(out: &mut String);

    /// Render heading start. `level` is 1-6.
    fn heading_start(level: u8, attrs: &Attributes, out: &mut String);

    fn heading_end(level: u8, out: &mut String);

    fn blockquote_start(attrs: &Attributes, out: &mut String);

    fn blockquote_end(out: &mut String);

    /// Render a `bc.` block; `content` is unescaped source.
    fn code_block(content: &str, attrs: &Attributes, out: &mut String);

    /// Render `notextile` content, honoring the raw HTML restrictions.
    fn notextile(content: &str, restrictions: &RestrictionSet, out: &mut String);

    /// Open a list at nesting `depth` (1 for top level).
    fn list_start(ordered: bool, depth: usize, attrs: &Attributes, out: &mut String);

    fn list_end(ordered: bool, depth: usize, out: &mut String);

    fn item_start(depth: usize, out: &mut String);

    fn item_end(out: &mut String);

    fn phrase_start(phrase: Phrase, attrs: &Attributes, out: &mut String);

    fn phrase_end(phrase: Phrase, out: &mut String);

    /// Render `@code@`; `content` is unescaped.
    fn code_span(content: &str, attrs: &Attributes, out: &mut String);

    fn link_start(href: &str, attrs: &Attributes, out: &mut String);

    fn link_end(out: &mut String);

    fn image(src: &str, alt: Option<&str>, attrs: &Attributes, out: &mut String);

    /// Render a run of capitals. Default writes it as plain text.
    fn caps(word: &str, out: &mut String) {
        Self::text(word, out);
    }

    /// Render a raw HTML tag found in the markup.
    fn raw_html(tag: &str, restrictions: &RestrictionSet, out: &mut String);
}
