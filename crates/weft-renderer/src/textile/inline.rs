//! Inline Textile: phrase modifiers, code, links, images, caps and raw HTML.
//!
//! The scanner walks the text once. At each position it tries to recognize a
//! construct; plain text between constructs is flushed through
//! [`RenderBackend::text`]. Constructs named in `disable_inline` are never
//! recognized, so their markup comes out as literal text.

use std::marker::PhantomData;

use weft_restrictions::RestrictionSet;

use crate::attributes::Attributes;
use crate::backend::{Phrase, RenderBackend};
use crate::html::{is_safe_url, tag_prefix_len};

/// Characters stripped from the end of a bare URL. A closing parenthesis is
/// stripped only when it has no opening partner inside the URL.
const URL_TRAILING_PUNCTUATION: [char; 8] = ['.', ',', ';', ':', '!', '?', '\'', '"'];

/// A recognized inline construct, borrowing from the source text.
#[derive(Debug, PartialEq, Eq)]
enum Inline<'t> {
    Phrase {
        phrase: Phrase,
        attrs: Attributes,
        body: &'t str,
    },
    Code(&'t str),
    Link {
        attrs: Attributes,
        label: &'t str,
        href: &'t str,
    },
    Image {
        attrs: Attributes,
        src: &'t str,
        alt: Option<&'t str>,
        href: Option<&'t str>,
    },
    Caps(&'t str),
    Html(&'t str),
}

/// Inline renderer bound to a restriction set.
pub(crate) struct InlineRenderer<'r, B: RenderBackend> {
    restrictions: &'r RestrictionSet,
    _backend: PhantomData<B>,
}

impl<'r, B: RenderBackend> InlineRenderer<'r, B> {
    pub(crate) fn new(restrictions: &'r RestrictionSet) -> Self {
        Self {
            restrictions,
            _backend: PhantomData,
        }
    }

    /// Render one line of inline markup.
    pub(crate) fn render(&self, text: &str, out: &mut String) {
        let mut plain_start = 0;
        let mut pos = 0;

        while let Some(c) = text[pos..].chars().next() {
            if let Some((inline, end)) = self.scan(text, pos, c) {
                B::text(&text[plain_start..pos], out);
                self.emit(inline, out);
                pos = end;
                plain_start = end;
            } else {
                pos += c.len_utf8();
            }
        }

        B::text(&text[plain_start..], out);
    }

    fn enabled(&self, name: &str) -> bool {
        !self.restrictions.is_inline_disabled(name)
    }

    fn emit(&self, inline: Inline<'_>, out: &mut String) {
        match inline {
            Inline::Phrase {
                phrase,
                attrs,
                body,
            } => {
                B::phrase_start(phrase, &attrs.filtered(self.restrictions), out);
                self.render(body, out);
                B::phrase_end(phrase, out);
            }
            Inline::Code(body) => B::code_span(body, &Attributes::default(), out),
            Inline::Link { attrs, label, href } => {
                if self.url_allowed(href) {
                    B::link_start(href, &attrs.filtered(self.restrictions), out);
                    self.render(label, out);
                    B::link_end(out);
                } else {
                    tracing::warn!(href, "Dropped unsafe link target");
                    self.render(label, out);
                }
            }
            Inline::Image {
                attrs,
                src,
                alt,
                href,
            } => {
                if !self.url_allowed(src) {
                    tracing::warn!(src, "Dropped image with unsafe source");
                    if let Some(alt) = alt {
                        B::text(alt, out);
                    }
                    return;
                }
                let attrs = attrs.filtered(self.restrictions);
                match href.filter(|href| self.url_allowed(href)) {
                    Some(href) => {
                        B::link_start(href, &Attributes::default(), out);
                        B::image(src, alt, &attrs, out);
                        B::link_end(out);
                    }
                    None => {
                        if let Some(href) = href {
                            tracing::warn!(href, "Dropped unsafe image link target");
                        }
                        B::image(src, alt, &attrs, out);
                    }
                }
            }
            Inline::Caps(word) => B::caps(word, out),
            Inline::Html(tag) => B::raw_html(tag, self.restrictions, out),
        }
    }

    /// URLs are only checked when raw HTML is filtered or sanitized.
    fn url_allowed(&self, url: &str) -> bool {
        !(self.restrictions.sanitize_html() || self.restrictions.filter_html()) || is_safe_url(url)
    }

    fn scan<'t>(&self, text: &'t str, pos: usize, c: char) -> Option<(Inline<'t>, usize)> {
        let at_boundary = text[..pos]
            .chars()
            .next_back()
            .is_none_or(|prev| !prev.is_alphanumeric());

        match c {
            '<' => tag_prefix_len(&text[pos..])
                .map(|len| (Inline::Html(&text[pos..pos + len]), pos + len)),
            '"' if self.enabled("link") => scan_link(text, pos),
            '!' if at_boundary && self.enabled("image") => self.scan_image(text, pos),
            '@' if at_boundary && self.enabled("code") => find_close(text, pos + 1, "@")
                .map(|(body_end, end)| (Inline::Code(&text[pos + 1..body_end]), end)),
            '*' | '_' | '?' | '-' | '+' | '^' | '~' | '%' if at_boundary => {
                self.scan_phrase(text, pos)
            }
            c if c.is_ascii_uppercase() && at_boundary && !self.restrictions.no_span_caps() => {
                scan_caps(text, pos)
            }
            _ => None,
        }
    }

    fn scan_phrase<'t>(&self, text: &'t str, pos: usize) -> Option<(Inline<'t>, usize)> {
        let rest = &text[pos..];
        Phrase::BY_DELIMITER
            .iter()
            .filter(|(delim, _)| rest.starts_with(delim))
            .find_map(|&(delim, phrase)| {
                if !self.enabled(phrase.name()) {
                    return None;
                }
                let open_end = pos + delim.len();
                if delim.len() == 1
                    && (text[open_end..].starts_with(delim) || text[..pos].ends_with(delim))
                {
                    return None;
                }

                let (attrs, consumed) = Attributes::parse_prefix(&text[open_end..]);
                let body_start = open_end + consumed;
                if let Some((body_end, end)) = find_close(text, body_start, delim) {
                    let body = &text[body_start..body_end];
                    return Some((Inline::Phrase { phrase, attrs, body }, end));
                }
                // "_(aside)_": the group was the body, not attributes
                if consumed > 0 {
                    return find_close(text, open_end, delim).map(|(body_end, end)| {
                        let body = &text[open_end..body_end];
                        let attrs = Attributes::default();
                        (Inline::Phrase { phrase, attrs, body }, end)
                    });
                }
                None
            })
    }

    fn scan_image<'t>(&self, text: &'t str, pos: usize) -> Option<(Inline<'t>, usize)> {
        let start = pos + 1;
        let (attrs, consumed) = Attributes::parse_prefix(&text[start..]);
        let src_start = start + consumed;
        let close = text[src_start..].find('!')?;
        let inner = &text[src_start..src_start + close];

        let (src, alt) = match inner.strip_suffix(')').and_then(|s| s.split_once('(')) {
            Some((src, alt)) => (src, Some(alt).filter(|a| !a.is_empty())),
            None => (inner, None),
        };
        if src.is_empty() || src.contains(char::is_whitespace) {
            return None;
        }

        let mut end = src_start + close + 1;
        let href = if text[end..].starts_with(':') && self.enabled("link") {
            scan_url(text, end + 1)
        } else {
            None
        };
        if let Some(href) = href {
            end += 1 + href.len();
        }

        Some((
            Inline::Image {
                attrs,
                src,
                alt,
                href,
            },
            end,
        ))
    }
}

/// Find the closing delimiter of a construct whose body starts at `body_start`.
///
/// The body must be non-empty, may not start or end with whitespace, and the
/// closing delimiter may not be followed by an alphanumeric character (or, for
/// single delimiters, by another copy of itself). Returns the body end and the
/// position after the closing delimiter.
fn find_close(text: &str, body_start: usize, delim: &str) -> Option<(usize, usize)> {
    let first = text[body_start..].chars().next()?;
    if first.is_whitespace() {
        return None;
    }

    let mut search = body_start + first.len_utf8();
    while let Some(offset) = text[search..].find(delim) {
        let close = search + offset;
        let end = close + delim.len();
        let before_ws = text[..close].chars().next_back().is_some_and(char::is_whitespace);
        let after_ok = text[end..]
            .chars()
            .next()
            .is_none_or(|a| !a.is_alphanumeric() && (delim.len() > 1 || !delim.starts_with(a)));
        if !before_ws && after_ok {
            return Some((close, end));
        }
        search = close + 1;
    }
    None
}

/// `"label":url`
fn scan_link(text: &str, pos: usize) -> Option<(Inline<'_>, usize)> {
    let label_start = pos + 1;
    let label_end = label_start + text[label_start..].find("\":")?;
    let label = &text[label_start..label_end];
    if label.is_empty() || label.contains('"') {
        return None;
    }

    let url_start = label_end + 2;
    let href = scan_url(text, url_start)?;

    let (attrs, consumed) = Attributes::parse_prefix(label);
    let label = if consumed < label.len() {
        &label[consumed..]
    } else {
        label
    };
    Some((Inline::Link { attrs, label, href }, url_start + href.len()))
}

/// URL running from `start` to the next whitespace, minus trailing punctuation.
fn scan_url(text: &str, start: usize) -> Option<&str> {
    let rest = &text[start..];
    let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let mut url = &rest[..len];
    while let Some(last) = url.chars().next_back() {
        let strip = match last {
            ')' => url.matches('(').count() < url.matches(')').count(),
            c => URL_TRAILING_PUNCTUATION.contains(&c),
        };
        if !strip {
            break;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
    (!url.is_empty()).then_some(url)
}

/// Three or more capitals or digits, starting with a capital.
fn scan_caps(text: &str, pos: usize) -> Option<(Inline<'_>, usize)> {
    let rest = &text[pos..];
    let len = rest
        .find(|c: char| !(c.is_ascii_uppercase() || c.is_ascii_digit()))
        .unwrap_or(rest.len());
    if len < 3 || rest[len..].chars().next().is_some_and(char::is_alphanumeric) {
        return None;
    }
    Some((Inline::Caps(&rest[..len]), pos + len))
}
