//! End-to-end construction and render dispatch through the public API.

use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use weft_renderer::{
    Directive, FormatError, Formatter, MarkupDocument, Restriction, RestrictionSet,
    RestrictionValue, RuleSet,
};

const NO_RULES: &[&str] = &[];

fn recording_rules(log: &Arc<Mutex<Vec<String>>>, names: &[&str]) -> RuleSet {
    let mut rules = RuleSet::new();
    for name in names {
        let log = Arc::clone(log);
        let owned = (*name).to_owned();
        rules.insert(*name, move |_: &mut MarkupDocument| {
            log.lock().unwrap().push(owned.clone());
        });
    }
    rules
}

#[test]
fn test_default_document_renders_html() {
    let mut doc = MarkupDocument::new("And then? She *fell*!", Vec::<Directive>::new()).unwrap();
    assert_eq!(doc.restrictions(), &RestrictionSet::new());
    assert_eq!(
        doc.render_html(NO_RULES).unwrap(),
        "<p>And then? She <strong>fell</strong>!</p>"
    );
}

#[test]
fn test_disable_inline_image_is_normalized() {
    let mut doc = MarkupDocument::new(
        "A !cat.png(cat)! picture",
        [Directive::keyed([("disable_inline", "image".into())])],
    )
    .unwrap();
    assert_eq!(doc.restrictions().disable_inline(), ["image"]);
    assert!(doc.restrictions().is_inline_disabled("image"));

    let html = doc.render_html(NO_RULES).unwrap();
    assert!(!html.contains("<img"), "image should stay literal: {html}");
    assert_eq!(doc.restrictions().disable_inline(), ["image"]);
}

#[test]
fn test_unknown_directive_fails_construction() {
    let err = MarkupDocument::new("x", ["not_a_real_flag"]).unwrap_err();
    assert_eq!(err.name, "not_a_real_flag");
    assert_eq!(err.to_string(), "Unknown restriction: not_a_real_flag");
}

#[test]
fn test_unknown_directive_after_known_ones() {
    let directives = vec![
        Directive::flag("filter_html"),
        Directive::keyed([
            ("lite_mode", RestrictionValue::Bool(true)),
            ("bogus", RestrictionValue::Bool(true)),
        ]),
    ];
    assert!(MarkupDocument::new("x", directives).is_err());
}

#[test]
fn test_last_write_wins() {
    let doc = MarkupDocument::new(
        "x",
        [
            Directive::keyed([("disable_inline", vec!["strong", "em"].into())]),
            Directive::from(Restriction::FilterStyles),
            Directive::keyed([
                ("disable_inline", "link".into()),
                ("filter_styles", RestrictionValue::Bool(false)),
            ]),
        ],
    )
    .unwrap();
    assert_eq!(doc.restrictions().disable_inline(), ["link"]);
    assert!(!doc.restrictions().filter_styles());
}

#[test]
fn test_empty_rule_list_routes_to_each_formatter() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let rules = recording_rules(&log, &["a", "b"]);
    let mut doc = MarkupDocument::new("50% _off_", Vec::<Directive>::new())
        .unwrap()
        .with_rules(rules);

    assert_eq!(doc.render_html(NO_RULES).unwrap(), "<p>50% <em>off</em></p>");
    assert_eq!(doc.render_latex(NO_RULES).unwrap(), r"50\% \emph{off}");
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_unknown_rules_are_skipped_in_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let rules = recording_rules(&log, &["first", "second", "third"]);
    let mut doc = MarkupDocument::new("x", Vec::<Directive>::new())
        .unwrap()
        .with_rules(rules);

    doc.render(
        Formatter::Html,
        &["third", "missing", "first", "also_missing", "second"],
    )
    .unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["third", "first", "second"]);
}

#[test]
fn test_builtin_rules_before_formatting() {
    let mut doc = MarkupDocument::new("NASA  \r\nlaunch", Vec::<Directive>::new()).unwrap();
    let html = doc
        .render_html(&[
            "normalize_newlines",
            "strip_trailing_whitespace",
            "no_span_caps",
            "hard_breaks",
        ])
        .unwrap();
    assert_eq!(html, "<p>NASA<br />\nlaunch</p>");
    assert_eq!(doc.text(), "NASA\nlaunch");
}

#[test]
fn test_restrictions_mutated_after_construction() {
    let mut doc = MarkupDocument::new("<b>hi</b>", Vec::<Directive>::new()).unwrap();
    assert_eq!(doc.render_html(NO_RULES).unwrap(), "<p><b>hi</b></p>");

    doc.restrictions_mut().set_filter_html(true);
    assert_eq!(
        doc.render_html(NO_RULES).unwrap(),
        "<p>&lt;b&gt;hi&lt;/b&gt;</p>"
    );
}

#[test]
fn test_format_error_has_no_output() {
    let mut doc = MarkupDocument::new("ok\n\n<notextile>\nraw", Vec::<Directive>::new()).unwrap();
    assert_eq!(
        doc.render_html(NO_RULES),
        Err(FormatError::UnclosedBlock {
            tag: "notextile",
            line: 3
        })
    );
}

#[test]
fn test_documents_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MarkupDocument>();
    assert_send_sync::<RuleSet>();
}

#[test]
fn test_sanitize_html_rejects_encoded_script_urls() {
    let mut doc = MarkupDocument::new(
        r#"<a href="&#106;avascript:alert(1)">x</a> and "y":javascript:alert(2)"#,
        ["sanitize_html"],
    )
    .unwrap();
    let html = doc.render_html(NO_RULES).unwrap();
    assert_eq!(html, "<p><a>x</a> and y</p>");
}
