//! LaTeX backend for Textile rendering.
//!
//! Produces body-level LaTeX (no preamble). Phrases map to text commands;
//! deletions use `\sout` from the `ulem` package and links use `\href` from
//! `hyperref`. Raw HTML has no LaTeX counterpart and is dropped unless
//! `filter_html` asks for it to be shown as text.

use std::fmt::Write;

use weft_restrictions::RestrictionSet;

use crate::attributes::Attributes;
use crate::backend::{Phrase, RenderBackend};

/// LaTeX render backend.
pub struct LatexBackend;

impl RenderBackend for LatexBackend {
    const BLOCK_SEPARATOR: &'static str = "\n\n";

    fn text(text: &str, out: &mut String) {
        out.push_str(&escape_latex(text));
    }

    fn line_break(out: &mut String) {
        out.push_str(r"\\");
    }

    fn paragraph_start(_attrs: &Attributes, _out: &mut String) {}

    fn paragraph_end(_out: &mut String) {}

    fn heading_start(level: u8, _attrs: &Attributes, out: &mut String) {
        let command = match level {
            1 => "section",
            2 => "subsection",
            3 => "subsubsection",
            4 => "paragraph",
            _ => "subparagraph",
        };
        write!(out, r"\{command}*{{").unwrap();
    }

    fn heading_end(_level: u8, out: &mut String) {
        out.push('}');
    }

    fn blockquote_start(_attrs: &Attributes, out: &mut String) {
        out.push_str("\\begin{quotation}\n");
    }

    fn blockquote_end(out: &mut String) {
        out.push_str("\n\\end{quotation}");
    }

    fn code_block(content: &str, _attrs: &Attributes, out: &mut String) {
        // `verbatim` ends at the first `\end{verbatim}` in its body.
        if content.contains(r"\end") {
            out.push_str(r"\texttt{");
            for (index, line) in content.lines().enumerate() {
                if index > 0 {
                    out.push_str("\\\\\n");
                }
                out.push_str(&escape_latex(line));
            }
            out.push('}');
            return;
        }
        write!(out, "\\begin{{verbatim}}\n{content}\n\\end{{verbatim}}").unwrap();
    }

    fn notextile(content: &str, _restrictions: &RestrictionSet, out: &mut String) {
        out.push_str(&escape_latex(content));
    }

    fn list_start(ordered: bool, depth: usize, _attrs: &Attributes, out: &mut String) {
        if depth > 1 {
            out.push('\n');
        }
        writeln!(out, "\\begin{{{}}}", list_env(ordered)).unwrap();
    }

    fn list_end(ordered: bool, _depth: usize, out: &mut String) {
        write!(out, "\\end{{{}}}", list_env(ordered)).unwrap();
    }

    fn item_start(_depth: usize, out: &mut String) {
        out.push_str(r"\item ");
    }

    fn item_end(out: &mut String) {
        out.push('\n');
    }

    fn phrase_start(phrase: Phrase, _attrs: &Attributes, out: &mut String) {
        let command = match phrase {
            Phrase::Strong | Phrase::Bold => r"\textbf{",
            Phrase::Emphasis | Phrase::Citation => r"\emph{",
            Phrase::Italic => r"\textit{",
            Phrase::Deleted => r"\sout{",
            Phrase::Inserted => r"\underline{",
            Phrase::Superscript => r"\textsuperscript{",
            Phrase::Subscript => r"\textsubscript{",
            Phrase::Span => "{",
        };
        out.push_str(command);
    }

    fn phrase_end(_phrase: Phrase, out: &mut String) {
        out.push('}');
    }

    fn code_span(content: &str, _attrs: &Attributes, out: &mut String) {
        write!(out, r"\texttt{{{}}}", escape_latex(content)).unwrap();
    }

    fn link_start(href: &str, _attrs: &Attributes, out: &mut String) {
        write!(out, r"\href{{{}}}{{", escape_url(href)).unwrap();
    }

    fn link_end(out: &mut String) {
        out.push('}');
    }

    fn image(src: &str, _alt: Option<&str>, _attrs: &Attributes, out: &mut String) {
        write!(out, r"\includegraphics{{{}}}", escape_url(src)).unwrap();
    }

    fn raw_html(tag: &str, restrictions: &RestrictionSet, out: &mut String) {
        if restrictions.filter_html() {
            out.push_str(&escape_latex(tag));
        }
    }
}

fn list_env(ordered: bool) -> &'static str {
    if ordered { "enumerate" } else { "itemize" }
}

/// Escape characters with special meaning in LaTeX text.
///
/// # Example
///
/// ```
/// use weft_renderer::escape_latex;
///
/// assert_eq!(escape_latex("50% & $5"), r"50\% \& \$5");
/// ```
pub fn escape_latex(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str(r"\textbackslash{}"),
            '{' | '}' | '$' | '&' | '%' | '#' | '_' => {
                result.push('\\');
                result.push(c);
            }
            '~' => result.push_str(r"\textasciitilde{}"),
            '^' => result.push_str(r"\textasciicircum{}"),
            '<' => result.push_str(r"\textless{}"),
            '>' => result.push_str(r"\textgreater{}"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape a URL for `\href` and `\includegraphics` arguments.
fn escape_url(url: &str) -> String {
    let mut result = String::with_capacity(url.len());
    for c in url.chars() {
        if matches!(c, '%' | '#' | '{' | '}' | '\\') {
            result.push('\\');
        }
        result.push(c);
    }
    result
}
