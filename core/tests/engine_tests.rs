use docsearch_core::engine::snippet;
use docsearch_core::{build_index, search, IndexStore};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

fn rec(title: &str, body: &str, url: &str) -> String {
    format!("{title}\u{3}{body}\u{3}{url}")
}

fn store_from(lines: &[String]) -> (TempDir, IndexStore) {
    let dir = tempfile::tempdir().unwrap();
    let path: PathBuf = dir.path().join("raw.txt");
    std::fs::write(&path, lines.join("\n")).unwrap();
    let store = build_index(&path).unwrap();
    (dir, store)
}

#[test]
fn title_match_outranks_body_match() {
    let (_dir, store) = store_from(&[
        rec("Plain cooking", "asio makes networking simple", "u0"),
        rec("Asio networking", "simple event loops", "u1"),
    ]);
    let results = search(&store, "asio");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "Asio networking");
    assert_eq!(results[1].title, "Plain cooking");
}

#[test]
fn equal_scores_rank_by_ascending_id() {
    let (_dir, store) = store_from(&[
        rec("Zeta", "token once here", "u0"),
        rec("Alpha", "token once there", "u1"),
        rec("Mu", "token once everywhere", "u2"),
    ]);
    let results = search(&store, "token");

    let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Zeta", "Alpha", "Mu"]);
}

#[test]
fn duplicate_query_tokens_score_twice() {
    // doc0 matches "lexer" once (weight 1), doc1 matches "parser" three
    // times (weight 3). Repeating "lexer" four times must overtake.
    let (_dir, store) = store_from(&[
        rec("One", "a lexer sits here", "u0"),
        rec("Two", "parser parser parser", "u1"),
    ]);

    let single = search(&store, "lexer parser");
    assert_eq!(single[0].title, "Two");

    let repeated = search(&store, "lexer lexer lexer lexer parser");
    assert_eq!(repeated[0].title, "One");
}

#[test]
fn empty_query_returns_empty() {
    let (_dir, store) = store_from(&[rec("Doc", "some body", "u0")]);
    assert!(search(&store, "").is_empty());
}

#[test]
fn stopword_only_query_returns_empty() {
    let (_dir, store) = store_from(&[rec("Doc", "some body", "u0")]);
    assert!(search(&store, "the and of").is_empty());
}

#[test]
fn unindexed_terms_return_empty() {
    let (_dir, store) = store_from(&[rec("Doc", "some body", "u0")]);
    assert!(search(&store, "zebra quartz").is_empty());
}

#[test]
fn unknown_tokens_are_ignored_next_to_known_ones() {
    let (_dir, store) = store_from(&[rec("Doc", "known token", "u0")]);
    let results = search(&store, "zebra known");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Doc");
}

#[test]
fn result_serializes_as_bare_array_of_title_url_snippet() {
    let (_dir, store) = store_from(&[rec("Doc", "known token", "u0")]);
    let value = serde_json::to_value(search(&store, "known")).unwrap();

    let arr = value.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    let obj = arr[0].as_object().unwrap();
    let mut keys: Vec<&str> = obj.keys().map(|k| k.as_str()).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["snippet", "title", "url"]);
    assert_eq!(obj["url"], "u0");
}

#[test]
fn snippet_window_is_prev_50_next_100() {
    // Match at byte offset 80 of a 500-byte body: window must span
    // [30, 80 + len("needle") + 100).
    let body = format!(
        "{}needle{}",
        "a".repeat(80),
        "b".repeat(500 - 80 - "needle".len())
    );
    assert_eq!(body.len(), 500);

    let out = snippet(&body, &["needle"]);
    let expected = format!(
        "...{}<em>needle</em>{}...",
        "a".repeat(50),
        "b".repeat(100)
    );
    assert_eq!(out, expected);
}

#[test]
fn snippet_window_clips_at_body_edges() {
    // Match at offset 10: only 10 chars of leading context exist.
    let body = format!("{}needle{}", "a".repeat(10), "b".repeat(20));
    let out = snippet(&body, &["needle"]);
    assert_eq!(out, format!("...{}<em>needle</em>{}...", "a".repeat(10), "b".repeat(20)));
}

#[test]
fn snippet_finds_term_case_insensitively_but_highlights_literal_only() {
    // The body spells the term "Needle"; the folded term "needle" is found
    // case-insensitively, but no literal occurrence exists, so the window
    // comes back without markers.
    let body = format!("{}Needle{}", "a".repeat(10), "b".repeat(20));
    let out = snippet(&body, &["needle"]);
    assert_eq!(out, format!("...{}Needle{}...", "a".repeat(10), "b".repeat(20)));
}

#[test]
fn snippet_without_terms_truncates_to_150_chars() {
    let body = "x".repeat(400);
    assert_eq!(snippet(&body, &[]), format!("{}...", "x".repeat(150)));

    let short = "short body";
    assert_eq!(snippet(short, &[]), short);
}

#[test]
fn snippet_falls_back_when_term_is_absent_from_body() {
    let body = "y".repeat(200);
    assert_eq!(snippet(&body, &["absent"]), format!("{}...", "y".repeat(150)));
}

#[test]
fn first_matched_term_drives_the_snippet() {
    // Query order decides the matched-term order, so "gamma" (first in the
    // query) is the highlighted term even though "delta" also matched.
    let (_dir, store) = store_from(&[rec(
        "Doc",
        "delta appears early but gamma is what gets highlighted",
        "u0",
    )]);
    let results = search(&store, "gamma delta");
    assert!(results[0].snippet.contains("<em>gamma</em>"));
    assert!(!results[0].snippet.contains("<em>delta</em>"));
}

#[test]
fn concurrent_searches_match_sequential_results() {
    let lines: Vec<String> = (0..32)
        .map(|i| {
            rec(
                &format!("Title {i}"),
                &format!("common text plus variant{} tokens", i % 7),
                &format!("u{i}"),
            )
        })
        .collect();
    let (_dir, store) = store_from(&lines);
    let store = Arc::new(store);

    let queries = ["common", "variant3 common", "tokens text", "variant0"];
    let sequential: Vec<_> = queries.iter().map(|q| search(&store, q)).collect();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                queries.iter().map(|q| search(&store, q)).collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        let got = handle.join().unwrap();
        assert_eq!(got, sequential);
    }
}
