//! Stress test: include trees at and beyond the document cap.
//!
//! Covers chains, fan-out, cycles, duplicate elision, and the https
//! downgrade rule at every depth.

#[path = "../support/mock_web.rs"]
mod mock_web;

use assetlinks::{
    AssetLinksError, MatcherBinding, SourceVerifier, StatementMatcher, VerifierConfig,
    MAX_ASSET_LINKS_URIS,
};
use mock_web::*;

const ROOT: &str = "https://www.test.com/.well-known/assetlinks.json";
const SOURCE: &str = "https://www.test.com";

fn doc_uri(i: usize) -> String {
    format!("https://www.test.com/links/{i}.json")
}

fn verifier(web: MockWeb) -> SourceVerifier<MockWeb> {
    SourceVerifier::new(web, VerifierConfig::default())
}

/// Root includes doc 1, doc i includes doc i+1, up to `len` documents in total.
fn chain(len: usize) -> MockWeb {
    let mut web = MockWeb::new().json(ROOT, &statement_list(&[include(&doc_uri(1))]));
    for i in 1..len {
        let body = if i + 1 < len {
            statement_list(&[
                include(&doc_uri(i + 1)),
                web_statement(HANDLE_ALL_URLS, &format!("https://s{i}.test.com")),
            ])
        } else {
            statement_list(&[web_statement(HANDLE_ALL_URLS, &format!("https://s{i}.test.com"))])
        };
        web = web.json(&doc_uri(i), &body);
    }
    web
}

fn count_statements(v: &SourceVerifier<MockWeb>) -> assetlinks::Result<(usize, bool)> {
    let mut seen = 0;
    let binding = MatcherBinding::new(StatementMatcher::any(), |_, _| {
        seen += 1;
        Ok(())
    });
    let report = v.verify(SOURCE, vec![binding])?;
    Ok((seen, report.had_warnings))
}

#[test]
fn stress_chain_at_cap() {
    let v = verifier(chain(MAX_ASSET_LINKS_URIS));
    let (seen, warnings) = count_statements(&v).unwrap();
    assert_eq!(seen, MAX_ASSET_LINKS_URIS - 1);
    assert!(!warnings);
    assert_eq!(v.transport().fetch_count(), MAX_ASSET_LINKS_URIS);
}

#[test]
fn stress_chain_beyond_cap() {
    let v = verifier(chain(MAX_ASSET_LINKS_URIS + 1));
    let err = count_statements(&v).unwrap_err();
    assert!(matches!(err, AssetLinksError::TooManyIncludes { max } if max == MAX_ASSET_LINKS_URIS));
    // The 12th URI is discovered while processing the 11th document.
    assert_eq!(v.transport().fetch_count(), MAX_ASSET_LINKS_URIS);
}

#[test]
fn stress_fan_out_beyond_cap_fails_at_root() {
    let includes: Vec<String> = (1..=MAX_ASSET_LINKS_URIS).map(|i| include(&doc_uri(i))).collect();
    let v = verifier(MockWeb::new().json(ROOT, &statement_list(&includes)));
    let err = count_statements(&v).unwrap_err();
    assert!(matches!(err, AssetLinksError::TooManyIncludes { .. }));
    assert_eq!(v.transport().fetch_count(), 1);
}

#[test]
fn stress_cycle_terminates_with_warning() {
    let a = "https://www.test.com/a.json";
    let b = "https://www.test.com/b.json";
    let web = MockWeb::new()
        .json(ROOT, &statement_list(&[include(a)]))
        .json(a, &statement_list(&[include(b), web_statement(HANDLE_ALL_URLS, "https://a.test.com")]))
        .json(b, &statement_list(&[include(a), include(ROOT)]));
    let v = verifier(web);
    let (seen, warnings) = count_statements(&v).unwrap();
    assert_eq!(seen, 1);
    assert!(warnings);
    assert_eq!(v.transport().fetch_count(), 3);
}

#[test]
fn stress_self_include_elided() {
    let v = verifier(MockWeb::new().json(ROOT, &statement_list(&[include("assetlinks.json")])));
    let report = v.verify(SOURCE, Vec::new()).unwrap();
    assert_eq!(report.document_uris.len(), 1);
    assert!(report.had_warnings);
}

#[test]
fn stress_duplicates_do_not_count_towards_cap() {
    let mut includes = Vec::new();
    for _ in 0..50 {
        includes.push(include(&doc_uri(1)));
    }
    let web = MockWeb::new()
        .json(ROOT, &statement_list(&includes))
        .json(&doc_uri(1), "[]");
    let v = verifier(web);
    let report = v.verify(SOURCE, Vec::new()).unwrap();
    assert_eq!(report.document_uris.len(), 2);
    assert!(report.had_warnings);
}

#[test]
fn stress_insecure_include_fatal_at_any_depth() {
    for depth in 0..MAX_ASSET_LINKS_URIS - 1 {
        let mut web = chain(depth + 1);
        // The last document of the chain downgrades to http.
        let last = if depth == 0 { ROOT.to_string() } else { doc_uri(depth) };
        web = web.json(&last, &statement_list(&[include("http://www.test.com/plain.json")]));
        web = web.json("http://www.test.com/plain.json", "[]");
        let v = verifier(web);
        let err = count_statements(&v).unwrap_err();
        assert!(matches!(err, AssetLinksError::IllFormedStatement(_)), "depth {depth}: {err}");
    }
}

#[test]
fn stress_insecure_include_allowed_under_http_root() {
    let root = "http://www.test.com/.well-known/assetlinks.json";
    let web = MockWeb::new()
        .json(root, &statement_list(&[include("https://secure.test.com/x.json")]))
        .json(
            "https://secure.test.com/x.json",
            &statement_list(&[include("http://plain.test.com/y.json")]),
        )
        .json("http://plain.test.com/y.json", "[]");
    let v = verifier(web);
    let report = v.verify("http://www.test.com", Vec::new()).unwrap();
    assert_eq!(report.document_uris.len(), 3);
}

#[test]
fn stress_ill_formed_include_discarded_rest_of_tree_processed() {
    let web = MockWeb::new()
        .json(
            ROOT,
            &statement_list(&[
                include(&doc_uri(1)),
                include(&doc_uri(2)),
                web_statement(HANDLE_ALL_URLS, "https://root.test.com"),
            ]),
        )
        .json(&doc_uri(1), "not json")
        .json(&doc_uri(2), &statement_list(&[web_statement(HANDLE_ALL_URLS, "https://two.test.com")]));
    let v = verifier(web);
    let (seen, warnings) = count_statements(&v).unwrap();
    assert_eq!(seen, 2);
    assert!(warnings);
}

#[test]
fn stress_includes_of_discarded_document_are_not_followed() {
    let web = MockWeb::new()
        .json(ROOT, &statement_list(&[include(&doc_uri(1))]))
        .json(
            &doc_uri(1),
            &format!("[{}, {{\"target\": {{}}}}]", include(&doc_uri(2))),
        )
        .json(&doc_uri(2), "[]");
    let v = verifier(web);
    let report = v.verify(SOURCE, Vec::new()).unwrap();
    assert!(report.had_warnings);
    assert_eq!(report.document_uris.len(), 2);
    assert_eq!(v.transport().fetch_count(), 2);
}
