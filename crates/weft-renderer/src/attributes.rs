//! Textile attribute parsing.
//!
//! Parses the `(class#id){style}[lang]` prefix accepted by block signatures
//! and phrase modifiers.

use weft_restrictions::RestrictionSet;

/// Attributes attached to a block or phrase.
///
/// # Example
///
/// ```
/// use weft_renderer::Attributes;
///
/// let (attrs, consumed) = Attributes::parse_prefix("(note#intro){color:red}[en]Hello");
/// assert_eq!(attrs.class.as_deref(), Some("note"));
/// assert_eq!(attrs.id.as_deref(), Some("intro"));
/// assert_eq!(attrs.style.as_deref(), Some("color:red"));
/// assert_eq!(attrs.lang.as_deref(), Some("en"));
/// assert_eq!(&"(note#intro){color:red}[en]Hello"[consumed..], "Hello");
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Attributes {
    /// Class from `(class)`.
    pub class: Option<String>,
    /// ID from `(#id)` or `(class#id)`.
    pub id: Option<String>,
    /// Inline style from `{style}`.
    pub style: Option<String>,
    /// Language from `[lang]`.
    pub lang: Option<String>,
}

impl Attributes {
    /// Parse an attribute prefix, returning the attributes and the number of
    /// bytes consumed.
    ///
    /// Parsing stops at the first character that does not open a group, or at
    /// a group with no closing delimiter. Empty groups are not consumed.
    #[must_use]
    pub fn parse_prefix(s: &str) -> (Self, usize) {
        let mut attrs = Self::default();
        let mut consumed = 0;

        loop {
            let remaining = &s[consumed..];
            let (open, close) = match remaining.chars().next() {
                Some('(') => ('(', ')'),
                Some('{') => ('{', '}'),
                Some('[') => ('[', ']'),
                _ => break,
            };
            let Some(end) = remaining[1..].find(close).map(|i| i + 1) else {
                break;
            };
            let inner = remaining[1..end].trim();
            if inner.is_empty() || (open != '{' && inner.contains(char::is_whitespace)) {
                break;
            }
            match open {
                '(' => attrs.set_class_and_id(inner),
                '{' => attrs.style = Some(inner.trim_end_matches(';').to_owned()),
                _ => attrs.lang = Some(inner.to_owned()),
            }
            consumed += end + 1;
        }

        (attrs, consumed)
    }

    fn set_class_and_id(&mut self, inner: &str) {
        let (class, id) = match inner.split_once('#') {
            Some((class, id)) => (class, Some(id)),
            None => (inner, None),
        };
        if !class.is_empty() {
            self.class = Some(class.to_owned());
        }
        if let Some(id) = id.filter(|id| !id.is_empty()) {
            self.id = Some(id.to_owned());
        }
    }

    /// Drop attributes disallowed by `filter_classes`, `filter_ids` and
    /// `filter_styles`.
    #[must_use]
    pub fn filtered(mut self, restrictions: &RestrictionSet) -> Self {
        if restrictions.filter_classes() {
            self.class = None;
        }
        if restrictions.filter_ids() {
            self.id = None;
        }
        if restrictions.filter_styles() {
            self.style = None;
        }
        self
    }

    /// Whether no attribute is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.class.is_none() && self.id.is_none() && self.style.is_none() && self.lang.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_prefix() {
        let (attrs, consumed) = Attributes::parse_prefix("Hello");
        assert!(attrs.is_empty());
        assert_eq!(consumed, 0);
    }

    #[test]
    fn test_class_only() {
        let (attrs, consumed) = Attributes::parse_prefix("(big)text");
        assert_eq!(attrs.class.as_deref(), Some("big"));
        assert_eq!(attrs.id, None);
        assert_eq!(consumed, 5);
    }

    #[test]
    fn test_id_only() {
        let (attrs, _) = Attributes::parse_prefix("(#top)text");
        assert_eq!(attrs.class, None);
        assert_eq!(attrs.id.as_deref(), Some("top"));
    }

    #[test]
    fn test_groups_in_any_order() {
        let (attrs, consumed) = Attributes::parse_prefix("[fr]{color:blue;}(a#b)");
        assert_eq!(attrs.lang.as_deref(), Some("fr"));
        assert_eq!(attrs.style.as_deref(), Some("color:blue"));
        assert_eq!(attrs.class.as_deref(), Some("a"));
        assert_eq!(attrs.id.as_deref(), Some("b"));
        assert_eq!(consumed, 22);
    }

    #[test]
    fn test_style_may_contain_spaces() {
        let (attrs, _) = Attributes::parse_prefix("{color: red; font-weight: bold}x");
        assert_eq!(attrs.style.as_deref(), Some("color: red; font-weight: bold"));
    }

    #[test]
    fn test_parenthetical_prose_is_not_a_class() {
        let (attrs, consumed) = Attributes::parse_prefix("(as noted) text");
        assert!(attrs.is_empty());
        assert_eq!(consumed, 0);
    }

    #[test]
    fn test_unclosed_group_stops_parsing() {
        let (attrs, consumed) = Attributes::parse_prefix("(big)(oops");
        assert_eq!(attrs.class.as_deref(), Some("big"));
        assert_eq!(consumed, 5);
    }

    #[test]
    fn test_filtered_drops_disallowed() {
        let (attrs, _) = Attributes::parse_prefix("(c#i){s:1}[en]");
        let mut restrictions = RestrictionSet::new();
        restrictions.set_filter_classes(true);
        restrictions.set_filter_styles(true);

        let filtered = attrs.filtered(&restrictions);
        assert_eq!(filtered.class, None);
        assert_eq!(filtered.style, None);
        assert_eq!(filtered.id.as_deref(), Some("i"));
        assert_eq!(filtered.lang.as_deref(), Some("en"));
    }
}
