//! Generic Textile renderer with pluggable backend.
//!
//! Handles the block structure (signatures, lists, `<notextile>` sections)
//! and delegates inline markup to the `inline` scanner. All format-specific
//! output goes through the [`RenderBackend`].

mod inline;

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use weft_restrictions::RestrictionSet;

use crate::attributes::Attributes;
use crate::backend::RenderBackend;
use crate::error::FormatError;

use inline::InlineRenderer;

/// Block signature (`h1.`, `p(class).`, `bq.`, ...) at the start of a block.
static SIGNATURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\A(h[1-6]|p|bq|bc|notextile)((?:\([^()\n]*\)|\{[^{}\n]*\}|\[[^\[\]\n]*\])*)\.(?:[ \t]+|\n|\z)",
    )
    .unwrap()
});

static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([*#]+)[ \t]+(.*)$").unwrap());

/// A run of lines between blank lines, or an extended `<notextile>` section.
#[derive(Debug, PartialEq, Eq)]
enum Chunk {
    Text(String),
    NoTextile(String),
}

/// Textile renderer generic over the output backend.
///
/// Reads the restriction set it was created with; never mutates it.
///
/// # Example
///
/// ```
/// use weft_renderer::{HtmlBackend, RestrictionSet, TextileRenderer};
///
/// let restrictions = RestrictionSet::new();
/// let html = TextileRenderer::<HtmlBackend>::new(&restrictions)
///     .render("h1. Title\n\nSome *bold* text.")
///     .unwrap();
/// assert_eq!(html, "<h1>Title</h1>\n<p>Some <strong>bold</strong> text.</p>");
/// ```
pub struct TextileRenderer<'r, B: RenderBackend> {
    restrictions: &'r RestrictionSet,
    inline: InlineRenderer<'r, B>,
}

impl<'r, B: RenderBackend> TextileRenderer<'r, B> {
    #[must_use]
    pub fn new(restrictions: &'r RestrictionSet) -> Self {
        Self {
            restrictions,
            inline: InlineRenderer::new(restrictions),
        }
    }

    /// Render Textile markup.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::UnclosedBlock`] if a `<notextile>` section is
    /// never closed.
    pub fn render(&self, text: &str) -> Result<String, FormatError> {
        let text = normalize_newlines(text);

        if self.restrictions.lite_mode() {
            let mut out = String::with_capacity(text.len());
            self.render_lines(text.trim_matches('\n'), true, &mut out);
            return Ok(out);
        }

        let blocks: Vec<String> = split_chunks(&text)?
            .into_iter()
            .map(|chunk| {
                let mut out = String::new();
                match chunk {
                    Chunk::Text(content) => self.render_block(&content, &mut out),
                    Chunk::NoTextile(content) => {
                        B::notextile(&content, self.restrictions, &mut out);
                    }
                }
                out
            })
            .collect();

        Ok(blocks.join(B::BLOCK_SEPARATOR))
    }

    fn render_block(&self, content: &str, out: &mut String) {
        let Some(signature) = SIGNATURE_RE.captures(content) else {
            if is_list(content) {
                self.render_list(content, out);
            } else {
                self.render_paragraph(content, &Attributes::default(), out);
            }
            return;
        };

        let tag = signature.get(1).map_or("p", |m| m.as_str());
        let attrs_src = signature.get(2).map_or("", |m| m.as_str());
        let body = &content[signature.get(0).map_or(0, |m| m.end())..];
        let attrs = Attributes::parse_prefix(attrs_src).0.filtered(self.restrictions);

        match tag {
            "p" => self.render_paragraph(body, &attrs, out),
            "bq" => {
                B::blockquote_start(&attrs, out);
                self.render_lines(body, self.restrictions.hard_breaks(), out);
                B::blockquote_end(out);
            }
            "bc" => B::code_block(body, &attrs, out),
            "notextile" => B::notextile(body, self.restrictions, out),
            heading => {
                let level = heading[1..].parse().unwrap_or(1);
                B::heading_start(level, &attrs, out);
                self.render_lines(body, false, out);
                B::heading_end(level, out);
            }
        }
    }

    fn render_paragraph(&self, body: &str, attrs: &Attributes, out: &mut String) {
        B::paragraph_start(attrs, out);
        self.render_lines(body, self.restrictions.hard_breaks(), out);
        B::paragraph_end(out);
    }

    /// Render lines of inline markup, joined by newlines and, when `breaks`
    /// is set, by backend line breaks.
    fn render_lines(&self, text: &str, breaks: bool, out: &mut String) {
        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                if breaks {
                    B::line_break(out);
                }
                out.push('\n');
            }
            self.inline.render(line, out);
        }
    }

    fn render_list(&self, content: &str, out: &mut String) {
        // One entry per open list level: whether it is ordered.
        let mut stack: Vec<bool> = Vec::new();

        for captures in content.lines().filter_map(|line| LIST_ITEM_RE.captures(line)) {
            let markers = captures.get(1).map_or("*", |m| m.as_str());
            let body = captures.get(2).map_or("", |m| m.as_str());
            let depth = markers.len();

            if depth > stack.len() {
                // The current item of the innermost open list is still open.
                let mut item_open = !stack.is_empty();
                while stack.len() < depth {
                    // Skipped levels get an implicit item to hold the nested list.
                    if !item_open && !stack.is_empty() {
                        B::item_start(stack.len(), out);
                    }
                    let ordered = markers.as_bytes().get(stack.len()) == Some(&b'#');
                    stack.push(ordered);
                    B::list_start(ordered, stack.len(), &Attributes::default(), out);
                    item_open = false;
                }
            } else {
                B::item_end(out);
                while stack.len() > depth {
                    if let Some(closed) = stack.pop() {
                        B::list_end(closed, stack.len() + 1, out);
                        B::item_end(out);
                    }
                }
            }

            B::item_start(depth, out);
            self.inline.render(body, out);
        }

        if !stack.is_empty() {
            B::item_end(out);
        }
        while let Some(closed) = stack.pop() {
            B::list_end(closed, stack.len() + 1, out);
            if !stack.is_empty() {
                B::item_end(out);
            }
        }
    }
}

fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

fn is_list(content: &str) -> bool {
    content.lines().all(|line| LIST_ITEM_RE.is_match(line))
}

/// Split text into blank-line separated chunks and `<notextile>` sections.
fn split_chunks(text: &str) -> Result<Vec<Chunk>, FormatError> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut lines = text.lines().enumerate();

    let flush = |current: &mut Vec<&str>, chunks: &mut Vec<Chunk>| {
        if !current.is_empty() {
            chunks.push(Chunk::Text(current.join("\n")));
            current.clear();
        }
    };

    while let Some((index, line)) = lines.next() {
        let trimmed = line.trim();
        if trimmed == "<notextile>" {
            flush(&mut current, &mut chunks);
            let mut raw = Vec::new();
            loop {
                match lines.next() {
                    Some((_, l)) if l.trim() == "</notextile>" => break,
                    Some((_, l)) => raw.push(l),
                    None => {
                        return Err(FormatError::UnclosedBlock {
                            tag: "notextile",
                            line: index + 1,
                        });
                    }
                }
            }
            chunks.push(Chunk::NoTextile(raw.join("\n")));
        } else if trimmed.is_empty() {
            flush(&mut current, &mut chunks);
        } else {
            current.push(line);
        }
    }
    flush(&mut current, &mut chunks);

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::html::HtmlBackend;
    use crate::latex::LatexBackend;

    fn html(text: &str) -> String {
        html_with(text, &RestrictionSet::new())
    }

    fn html_with(text: &str, restrictions: &RestrictionSet) -> String {
        TextileRenderer::<HtmlBackend>::new(restrictions)
            .render(text)
            .unwrap()
    }

    fn latex(text: &str) -> String {
        TextileRenderer::<LatexBackend>::new(&RestrictionSet::new())
            .render(text)
            .unwrap()
    }

    #[test]
    fn test_paragraphs() {
        assert_eq!(html("one\n\ntwo"), "<p>one</p>\n<p>two</p>");
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(html(""), "");
        assert_eq!(html("\n\n\n"), "");
    }

    #[test]
    fn test_crlf_is_normalized() {
        assert_eq!(html("one\r\n\r\ntwo"), "<p>one</p>\n<p>two</p>");
    }

    #[test]
    fn test_soft_newlines_kept() {
        assert_eq!(html("line one\nline two"), "<p>line one\nline two</p>");
    }

    #[test]
    fn test_hard_breaks() {
        let mut restrictions = RestrictionSet::new();
        restrictions.set_hard_breaks(true);
        assert_eq!(
            html_with("line one\nline two", &restrictions),
            "<p>line one<br />\nline two</p>"
        );
    }

    #[test]
    fn test_headings() {
        assert_eq!(
            html("h1. Top\n\nh3(sub#s1). Lower"),
            r#"<h1>Top</h1>
<h3 class="sub" id="s1">Lower</h3>"#
        );
    }

    #[test]
    fn test_filtered_block_attributes() {
        let mut restrictions = RestrictionSet::new();
        restrictions.set_filter_classes(true);
        restrictions.set_filter_ids(true);
        assert_eq!(html_with("p(a#b). x", &restrictions), "<p>x</p>");
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(
            html("bq. Quoted *text*"),
            "<blockquote>\n\t<p>Quoted <strong>text</strong></p>\n</blockquote>"
        );
    }

    #[test]
    fn test_block_code_is_literal() {
        assert_eq!(
            html("bc. let x = *y* < 2;"),
            "<pre><code>let x = *y* &lt; 2;</code></pre>"
        );
    }

    #[test]
    fn test_signature_needs_space() {
        assert_eq!(html("p.s. later"), "<p>p.s. later</p>");
    }

    #[test]
    fn test_nested_list() {
        assert_eq!(
            html("* one\n** nested\n* two"),
            "<ul>\n\t<li>one\n\t<ul>\n\t\t<li>nested</li>\n\t</ul></li>\n\t<li>two</li>\n</ul>"
        );
    }

    #[test]
    fn test_list_starting_below_top_level() {
        assert_eq!(
            html("** a\n* b"),
            "<ul>\n\t<li>\n\t<ul>\n\t\t<li>a</li>\n\t</ul></li>\n\t<li>b</li>\n</ul>"
        );
    }

    #[test]
    fn test_skipped_level_inside_list() {
        assert_eq!(
            html("# one\n#*# deep"),
            "<ol>\n\t<li>one\n\t<ul>\n\t\t<li>\n\t\t<ol>\n\t\t\t<li>deep</li>\n\t\t</ol></li>\n\t</ul></li>\n</ol>"
        );
    }

    #[test]
    fn test_ordered_list() {
        assert_eq!(
            html("# first\n# second"),
            "<ol>\n\t<li>first</li>\n\t<li>second</li>\n</ol>"
        );
    }

    #[test]
    fn test_bold_paragraph_is_not_a_list() {
        assert_eq!(html("*bold* start"), "<p><strong>bold</strong> start</p>");
    }

    #[test]
    fn test_mixed_lines_are_a_paragraph() {
        assert_eq!(html("* item\nplain"), "<p>* item\nplain</p>");
    }

    #[test]
    fn test_notextile_section() {
        assert_eq!(
            html("before\n\n<notextile>\n*raw* <div>\n</notextile>\n\nafter"),
            "<p>before</p>\n*raw* <div>\n<p>after</p>"
        );
    }

    #[test]
    fn test_unclosed_notextile() {
        let err = TextileRenderer::<HtmlBackend>::new(&RestrictionSet::new())
            .render("intro\n\n<notextile>\nnever closed")
            .unwrap_err();
        assert_eq!(
            err,
            FormatError::UnclosedBlock {
                tag: "notextile",
                line: 3
            }
        );
    }

    #[test]
    fn test_lite_mode_skips_blocks() {
        let mut restrictions = RestrictionSet::new();
        restrictions.set_lite_mode(true);
        assert_eq!(
            html_with("h1. Not a heading\n* not a list\n\n*bold*", &restrictions),
            "h1. Not a heading<br />\n* not a list<br />\n<br />\n<strong>bold</strong>"
        );
    }

    #[test]
    fn test_latex_blocks() {
        assert_eq!(
            latex("h2. Intro\n\nSome _text_ & more.\n\n# a\n# b"),
            "\\subsection*{Intro}\n\nSome \\emph{text} \\& more.\n\n\\begin{enumerate}\n\\item a\n\\item b\n\\end{enumerate}"
        );
    }

    #[test]
    fn test_latex_nested_list() {
        assert_eq!(
            latex("* one\n** nested\n* two"),
            "\\begin{itemize}\n\\item one\n\\begin{itemize}\n\\item nested\n\\end{itemize}\n\\item two\n\\end{itemize}"
        );
    }

    #[test]
    fn test_latex_blockquote() {
        assert_eq!(
            latex("bq. Wise words"),
            "\\begin{quotation}\nWise words\n\\end{quotation}"
        );
    }

    #[test]
    fn test_split_chunks() {
        assert_eq!(
            split_chunks("a\nb\n\n\nc").unwrap(),
            vec![Chunk::Text("a\nb".to_owned()), Chunk::Text("c".to_owned())]
        );
    }
}
