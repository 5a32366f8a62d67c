use actguard_dom::{HtmlDocument, InlineStylesheets};
use actguard_domain::{ConfigureOptions, Engine, PageBundle};
use actguard_types::{Outcome, Report, ids};
use futures::executor::block_on;

fn run(engine: &Engine, html: &str) -> Report {
    let doc = HtmlDocument::parse(html);
    block_on(engine.run(&PageBundle::source(&doc))).expect("run")
}

fn only(rule: &str) -> Engine {
    Engine::with_options(&ConfigureOptions {
        rules: vec![rule.to_string()],
        ..ConfigureOptions::default()
    })
    .expect("engine")
}

#[test]
fn matching_lang_and_xml_lang_pass() {
    let report = run(
        &only(ids::RULE_LANG_XML_LANG_MATCH),
        r#"<html lang="en" xml:lang="en"><head><title>t</title></head><body></body></html>"#,
    );
    let result = &report.rules[ids::RULE_LANG_XML_LANG_MATCH];
    assert_eq!(result.outcome(), Outcome::Passed);
    assert_eq!(result.results.len(), 1);
    assert_eq!(result.results[0].result_code, "RC1");
    assert_eq!(result.results[0].pointer.as_deref(), Some("html"));
}

#[test]
fn mismatched_lang_and_xml_lang_fail() {
    let report = run(
        &only(ids::RULE_LANG_XML_LANG_MATCH),
        r#"<html lang="en" xml:lang="fr"><body></body></html>"#,
    );
    let result = &report.rules[ids::RULE_LANG_XML_LANG_MATCH];
    assert_eq!(result.outcome(), Outcome::Failed);
    assert_eq!(result.results[0].result_code, "RC2");
}

#[test]
fn duplicate_ids_fail_for_every_holder() {
    let report = run(
        &only(ids::RULE_ID_UNIQUE),
        r#"<html><body><p id="dup">a</p><p id="dup">b</p><p id="solo">c</p></body></html>"#,
    );
    let result = &report.rules[ids::RULE_ID_UNIQUE];
    assert_eq!(result.outcome(), Outcome::Failed);
    assert_eq!(result.metadata.counts.failed, 2);
    assert_eq!(result.metadata.counts.passed, 1);

    let pointers: Vec<&str> = result
        .results
        .iter()
        .filter_map(|v| v.pointer.as_deref())
        .collect();
    assert_eq!(
        pointers,
        vec![
            "html > body:nth-child(2) > p:nth-child(1)",
            "html > body:nth-child(2) > p:nth-child(2)",
            "html > body:nth-child(2) > p:nth-child(3)",
        ]
    );
    assert!(
        result.results[0]
            .html_code
            .as_deref()
            .is_some_and(|html| html.contains("id=\"dup\""))
    );
}

#[test]
fn page_without_ids_is_inapplicable() {
    let report = run(&only(ids::RULE_ID_UNIQUE), "<html><body><p>x</p></body></html>");
    let result = &report.rules[ids::RULE_ID_UNIQUE];
    assert_eq!(result.outcome(), Outcome::Inapplicable);
    assert_eq!(result.results.len(), 1);
    assert_eq!(result.results[0].result_code, ids::GATE_ELEMENT_EXISTS);
}

#[test]
fn full_run_reports_every_rule() {
    let engine = Engine::new();
    let report = run(
        &engine,
        r#"<html lang="en"><head><title>Home</title></head><body><p id="a">hi</p></body></html>"#,
    );

    assert_eq!(report.rules.len(), engine.catalog().len());
    assert_eq!(report.rules[ids::RULE_HTML_HAS_TITLE].outcome(), Outcome::Passed);
    assert_eq!(report.rules[ids::RULE_HTML_HAS_LANG].outcome(), Outcome::Passed);
    assert_eq!(report.rules[ids::RULE_HTML_LANG_VALID].outcome(), Outcome::Passed);
    assert_eq!(report.rules[ids::RULE_ID_UNIQUE].outcome(), Outcome::Passed);
    assert_eq!(
        report.rules[ids::RULE_ORIENTATION_NOT_RESTRICTED].outcome(),
        Outcome::Inapplicable
    );

    let total: u32 = [
        report.metadata.passed,
        report.metadata.warning,
        report.metadata.failed,
        report.metadata.inapplicable,
    ]
    .iter()
    .sum();
    assert_eq!(total as usize, report.rules.len());
}

#[test]
fn missing_title_fails_the_page() {
    let report = run(
        &only(ids::RULE_HTML_HAS_TITLE),
        r#"<html lang="en"><body></body></html>"#,
    );
    assert_eq!(report.outcome(), Outcome::Failed);
    assert_eq!(
        report.rules[ids::RULE_HTML_HAS_TITLE].results[0].result_code,
        "RC2"
    );
}

#[test]
fn inline_orientation_lock_is_detected() {
    let html = r#"<html><head><style>
        @media (orientation: portrait) { html { transform: rotate(90deg); } }
    </style></head><body></body></html>"#;
    let doc = HtmlDocument::parse(html);
    let sheets = InlineStylesheets::from_document(&doc);
    let engine = only(ids::RULE_ORIENTATION_NOT_RESTRICTED);

    let bundle = PageBundle::source(&doc).with_stylesheets(&sheets);
    let report = block_on(engine.run(&bundle)).expect("run");

    let result = &report.rules[ids::RULE_ORIENTATION_NOT_RESTRICTED];
    assert_eq!(result.outcome(), Outcome::Failed);
    assert_eq!(result.results[0].result_code, "RC4");
}

#[test]
fn svg_title_does_not_title_the_page() {
    let report = run(
        &only(ids::RULE_HTML_HAS_TITLE),
        r#"<html lang="en"><head></head><body><svg><title>Chart</title></svg></body></html>"#,
    );
    let result = &report.rules[ids::RULE_HTML_HAS_TITLE];
    assert_eq!(result.outcome(), Outcome::Failed);
    assert_eq!(result.results[0].result_code, "RC2");
}

#[test]
fn three_letter_language_subtags_are_valid() {
    for lang in ["fil", "haw", "yue", "ast-ES"] {
        let html = format!(r#"<html lang="{lang}" xml:lang="{lang}"><head></head><body></body></html>"#);

        let report = run(&only(ids::RULE_HTML_LANG_VALID), &html);
        let result = &report.rules[ids::RULE_HTML_LANG_VALID];
        assert_eq!(result.outcome(), Outcome::Passed, "{lang}");

        let report = run(&only(ids::RULE_LANG_XML_LANG_MATCH), &html);
        let result = &report.rules[ids::RULE_LANG_XML_LANG_MATCH];
        assert_eq!(result.outcome(), Outcome::Passed, "{lang}");
        assert_eq!(result.results[0].result_code, "RC1");
    }
}

#[test]
fn viewport_that_blocks_zoom_fails() {
    let report = run(
        &only(ids::RULE_META_VIEWPORT_ZOOM),
        r#"<html><head>
            <meta name="description" content="Docs">
            <meta name="viewport" content="width=device-width, user-scalable=no">
        </head><body></body></html>"#,
    );
    let result = &report.rules[ids::RULE_META_VIEWPORT_ZOOM];
    assert_eq!(result.outcome(), Outcome::Failed);
    let codes: Vec<&str> = result.results.iter().map(|v| v.result_code.as_str()).collect();
    assert_eq!(codes, vec![ids::GATE_HAS_ATTRIBUTE_VALUE, "RC2"]);
}

#[test]
fn svg_images_are_checked_for_names() {
    let report = run(
        &only(ids::RULE_SVG_IMAGE_NAME),
        r#"<html><body>
            <svg role="img"><title>Sales</title></svg>
            <svg role="img"><circle r="4"></circle></svg>
        </body></html>"#,
    );
    let result = &report.rules[ids::RULE_SVG_IMAGE_NAME];
    assert_eq!(result.outcome(), Outcome::Failed);
    assert_eq!(result.metadata.counts.passed, 1);
    assert_eq!(result.metadata.counts.failed, 1);
}
