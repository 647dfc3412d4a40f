//! HTML backend for Textile rendering.
//!
//! Produces XHTML-style markup (`<br />`, `<img ... />`) and owns the raw HTML
//! policy: escaping for `filter_html`, allow-listing for `sanitize_html`.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use weft_restrictions::RestrictionSet;

use crate::attributes::Attributes;
use crate::backend::{Phrase, RenderBackend};

/// A single HTML tag at the start of the input.
static TAG_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^</?[A-Za-z][A-Za-z0-9]*(?:\s[^<>]*)?/?>").unwrap());

/// HTML tags anywhere in the input.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][A-Za-z0-9]*(?:\s[^<>]*)?/?>").unwrap());

/// Tag split into closing slash, name, attribute text and self-closing slash.
static TAG_PARTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<(/?)([A-Za-z][A-Za-z0-9]*)((?:\s[^<>]*?)?)\s*(/?)>$").unwrap()
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .unwrap()
});

/// Tags kept by the sanitizer, with the attributes each may carry.
const ALLOWED_TAGS: &[(&str, &[&str])] = &[
    ("a", &["href", "title"]),
    ("abbr", &["title"]),
    ("b", &[]),
    ("blockquote", &["cite"]),
    ("br", &[]),
    ("cite", &[]),
    ("code", &[]),
    ("del", &[]),
    ("em", &[]),
    ("i", &[]),
    ("ins", &[]),
    ("li", &[]),
    ("ol", &[]),
    ("p", &[]),
    ("pre", &[]),
    ("span", &["title"]),
    ("strong", &[]),
    ("sub", &[]),
    ("sup", &[]),
    ("u", &[]),
    ("ul", &[]),
];

const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto", "ftp"];

/// Named references decoded before URL checks.
const NAMED_REFS: &[(&str, char)] = &[
    ("amp", '&'),
    ("apos", '\''),
    ("colon", ':'),
    ("gt", '>'),
    ("lpar", '('),
    ("lt", '<'),
    ("newline", '\n'),
    ("num", '#'),
    ("period", '.'),
    ("quest", '?'),
    ("quot", '"'),
    ("rpar", ')'),
    ("sol", '/'),
    ("tab", '\t'),
];

/// HTML render backend.
pub struct HtmlBackend;

impl RenderBackend for HtmlBackend {
    const BLOCK_SEPARATOR: &'static str = "\n";

    fn text(text: &str, out: &mut String) {
        out.push_str(&escape_html(text));
    }

    fn line_break(out: &mut String) {
        out.push_str("<br />");
    }

    fn paragraph_start(attrs: &Attributes, out: &mut String) {
        out.push_str("<p");
        write_attrs(attrs, out);
        out.push('>');
    }

    fn paragraph_end(out: &mut String) {
        out.push_str("</p>");
    }

    fn heading_start(level: u8, attrs: &Attributes, out: &mut String) {
        write!(out, "<h{level}").unwrap();
        write_attrs(attrs, out);
        out.push('>');
    }

    fn heading_end(level: u8, out: &mut String) {
        write!(out, "</h{level}>").unwrap();
    }

    fn blockquote_start(attrs: &Attributes, out: &mut String) {
        out.push_str("<blockquote");
        write_attrs(attrs, out);
        out.push_str(">\n\t<p>");
    }

    fn blockquote_end(out: &mut String) {
        out.push_str("</p>\n</blockquote>");
    }

    fn code_block(content: &str, attrs: &Attributes, out: &mut String) {
        out.push_str("<pre");
        write_attrs(attrs, out);
        write!(out, "><code>{}</code></pre>", escape_html(content)).unwrap();
    }

    fn notextile(content: &str, restrictions: &RestrictionSet, out: &mut String) {
        if restrictions.filter_html() {
            out.push_str(&escape_html(content));
        } else if restrictions.sanitize_html() {
            out.push_str(&sanitize_fragment(content));
        } else {
            out.push_str(content);
        }
    }

    fn list_start(ordered: bool, depth: usize, attrs: &Attributes, out: &mut String) {
        if depth > 1 {
            out.push('\n');
            indent(depth - 1, out);
        }
        out.push_str(if ordered { "<ol" } else { "<ul" });
        write_attrs(attrs, out);
        out.push_str(">\n");
    }

    fn list_end(ordered: bool, depth: usize, out: &mut String) {
        indent(depth - 1, out);
        out.push_str(if ordered { "</ol>" } else { "</ul>" });
    }

    fn item_start(depth: usize, out: &mut String) {
        indent(depth, out);
        out.push_str("<li>");
    }

    fn item_end(out: &mut String) {
        out.push_str("</li>\n");
    }

    fn phrase_start(phrase: Phrase, attrs: &Attributes, out: &mut String) {
        write!(out, "<{}", phrase_tag(phrase)).unwrap();
        write_attrs(attrs, out);
        out.push('>');
    }

    fn phrase_end(phrase: Phrase, out: &mut String) {
        write!(out, "</{}>", phrase_tag(phrase)).unwrap();
    }

    fn code_span(content: &str, attrs: &Attributes, out: &mut String) {
        out.push_str("<code");
        write_attrs(attrs, out);
        write!(out, ">{}</code>", escape_html(content)).unwrap();
    }

    fn link_start(href: &str, attrs: &Attributes, out: &mut String) {
        write!(out, r#"<a href="{}""#, escape_html(href)).unwrap();
        write_attrs(attrs, out);
        out.push('>');
    }

    fn link_end(out: &mut String) {
        out.push_str("</a>");
    }

    fn image(src: &str, alt: Option<&str>, attrs: &Attributes, out: &mut String) {
        write!(out, r#"<img src="{}""#, escape_html(src)).unwrap();
        write_attrs(attrs, out);
        match alt {
            Some(alt) => {
                let alt = escape_html(alt);
                write!(out, r#" title="{alt}" alt="{alt}" />"#).unwrap();
            }
            None => out.push_str(r#" alt="" />"#),
        }
    }

    fn caps(word: &str, out: &mut String) {
        write!(out, r#"<span class="caps">{}</span>"#, escape_html(word)).unwrap();
    }

    fn raw_html(tag: &str, restrictions: &RestrictionSet, out: &mut String) {
        if restrictions.filter_html() {
            out.push_str(&escape_html(tag));
        } else if restrictions.sanitize_html() {
            match sanitize_tag(tag) {
                Some(clean) => out.push_str(&clean),
                None => tracing::warn!(tag, "Dropped disallowed HTML tag"),
            }
        } else {
            out.push_str(tag);
        }
    }
}

fn phrase_tag(phrase: Phrase) -> &'static str {
    match phrase {
        Phrase::Strong => "strong",
        Phrase::Emphasis => "em",
        Phrase::Bold => "b",
        Phrase::Italic => "i",
        Phrase::Deleted => "del",
        Phrase::Inserted => "ins",
        Phrase::Superscript => "sup",
        Phrase::Subscript => "sub",
        Phrase::Citation => "cite",
        Phrase::Span => "span",
    }
}

fn write_attrs(attrs: &Attributes, out: &mut String) {
    let pairs = [
        ("class", &attrs.class),
        ("id", &attrs.id),
        ("style", &attrs.style),
        ("lang", &attrs.lang),
    ];
    for (name, value) in pairs {
        if let Some(value) = value {
            write!(out, r#" {name}="{}""#, escape_html(value)).unwrap();
        }
    }
}

fn indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push('\t');
    }
}

/// Escape HTML special characters.
///
/// # Example
///
/// ```
/// use weft_renderer::escape_html;
///
/// assert_eq!(escape_html("<b>&</b>"), "&lt;b&gt;&amp;&lt;/b&gt;");
/// ```
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Length in bytes of the HTML tag at the start of `s`, if any.
pub(crate) fn tag_prefix_len(s: &str) -> Option<usize> {
    TAG_PREFIX_RE.find(s).map(|m| m.end())
}

/// Rebuild an allow-listed tag, or `None` if the tag must be dropped.
fn sanitize_tag(tag: &str) -> Option<String> {
    let parts = TAG_PARTS_RE.captures(tag)?;
    let name = parts[2].to_ascii_lowercase();
    let (_, allowed_attrs) = ALLOWED_TAGS.iter().find(|(allowed, _)| *allowed == name)?;

    if !parts[1].is_empty() {
        return Some(format!("</{name}>"));
    }

    let mut clean = format!("<{name}");
    for attr in ATTR_RE.captures_iter(&parts[3]) {
        let key = attr[1].to_ascii_lowercase();
        if !allowed_attrs.contains(&key.as_str()) {
            continue;
        }
        let value = attr
            .get(2)
            .or_else(|| attr.get(3))
            .or_else(|| attr.get(4))
            .map_or("", |m| m.as_str());
        if matches!(key.as_str(), "href" | "cite") && !is_safe_url(value) {
            continue;
        }
        write!(clean, r#" {key}="{}""#, escape_html(&decode_char_refs(value))).unwrap();
    }

    if name == "br" || !parts[4].is_empty() {
        clean.push_str(" />");
    } else {
        clean.push('>');
    }
    Some(clean)
}

/// Sanitize every tag in a fragment, leaving text untouched.
fn sanitize_fragment(content: &str) -> String {
    TAG_RE
        .replace_all(content, |caps: &Captures<'_>| {
            sanitize_tag(&caps[0]).unwrap_or_else(|| {
                tracing::warn!(tag = &caps[0], "Dropped disallowed HTML tag");
                String::new()
            })
        })
        .into_owned()
}

/// Relative URLs and allow-listed schemes are safe.
///
/// Character references are decoded first, so `&#106;avascript:` is seen as
/// `javascript:`.
pub(crate) fn is_safe_url(url: &str) -> bool {
    let compact: String = decode_char_refs(url)
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    match compact.find(':') {
        Some(colon) if !compact[..colon].contains(['/', '?', '#']) => {
            SAFE_SCHEMES.contains(&&compact[..colon])
        }
        _ => true,
    }
}

/// Decode numeric and named character references in an attribute value.
///
/// The semicolon is optional, as browsers accept it missing. Unknown
/// references are kept as written.
fn decode_char_refs(value: &str) -> String {
    let mut decoded = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        rest = &rest[amp..];
        if let Some((c, len)) = decode_char_ref(rest) {
            decoded.push(c);
            rest = &rest[len..];
        } else {
            decoded.push('&');
            rest = &rest[1..];
        }
    }
    decoded.push_str(rest);
    decoded
}

/// Decode the reference at the start of `s`, returning the character and the
/// number of bytes it spans.
fn decode_char_ref(s: &str) -> Option<(char, usize)> {
    let body = s.strip_prefix('&')?;

    if let Some(number) = body.strip_prefix('#') {
        let (digits, radix, prefix_len) = match number.strip_prefix(['x', 'X']) {
            Some(hex) => (hex, 16, 3),
            None => (number, 10, 2),
        };
        let len = digits
            .find(|c: char| !c.is_digit(radix))
            .unwrap_or(digits.len());
        if len == 0 {
            return None;
        }
        let c = u32::from_str_radix(&digits[..len], radix)
            .ok()
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        let semicolon = usize::from(digits[len..].starts_with(';'));
        return Some((c, prefix_len + len + semicolon));
    }

    let len = body
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(body.len());
    let name = body[..len].to_ascii_lowercase();
    let (_, c) = NAMED_REFS.iter().find(|(n, _)| *n == name)?;
    let semicolon = usize::from(body[len..].starts_with(';'));
    Some((*c, 1 + len + semicolon))
}
