use std::collections::HashMap;

use regex::RegexBuilder;
use serde::Serialize;

use crate::index::{DocId, IndexStore};
use crate::tokenizer::tokenize;

/// Context kept before and after a snippet match.
const SNIPPET_PREV: usize = 50;
const SNIPPET_NEXT: usize = 100;
/// Fallback excerpt length when no matched term can be located in the body.
const SNIPPET_LEAD: usize = 150;

/// One ranked hit, already shaped for the wire: a JSON array of these is
/// the whole query response.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RankedResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

#[derive(Default)]
struct Candidate<'a> {
    score: u32,
    /// Matched terms in first-seen order; the first one drives the snippet.
    terms: Vec<&'a str>,
}

/// Run a query against the store. Never fails: queries with no usable
/// tokens or no matching documents produce an empty result list.
pub fn search(store: &IndexStore, query: &str) -> Vec<RankedResult> {
    let mut by_doc: HashMap<DocId, Candidate> = HashMap::new();

    // Query tokens are deliberately not deduplicated: a term the user
    // repeats contributes its posting weight once per repetition.
    for token in tokenize(query) {
        let Some(postings) = store.postings(&token) else {
            continue;
        };
        for posting in postings {
            let candidate = by_doc.entry(posting.doc_id).or_default();
            candidate.score += posting.weight;
            if !candidate.terms.contains(&posting.term.as_str()) {
                candidate.terms.push(posting.term.as_str());
            }
        }
    }

    let mut candidates: Vec<(DocId, Candidate)> = by_doc
        .into_iter()
        .filter(|(_, candidate)| candidate.score > 0)
        .collect();
    // Score descending; equal scores resolve by ascending document id so
    // repeated queries always rank identically.
    candidates.sort_by(|a, b| b.1.score.cmp(&a.1.score).then(a.0.cmp(&b.0)));

    let mut results = Vec::with_capacity(candidates.len());
    for (doc_id, candidate) in candidates {
        let Some(doc) = store.document(doc_id) else {
            tracing::warn!(doc_id, "posting references a document outside the forward index");
            continue;
        };
        results.push(RankedResult {
            title: doc.title.clone(),
            url: doc.url.clone(),
            snippet: snippet(&doc.body, &candidate.terms),
        });
    }
    results
}

/// Extract a bounded excerpt of `body` around the first matched term,
/// wrapping that term in `<em>` markers when it occurs literally inside the
/// excerpt. Only the first matched term is ever highlighted.
pub fn snippet(body: &str, matched_terms: &[&str]) -> String {
    let Some(&term) = matched_terms.first() else {
        return leading_excerpt(body);
    };

    // An escaped case-insensitive regex keeps the match offsets valid in
    // the original body; lowercase-then-find can shift byte positions.
    let found = RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
        .ok()
        .and_then(|re| re.find(body));
    let Some(m) = found else {
        return leading_excerpt(body);
    };

    let start = floor_char_boundary(body, m.start().saturating_sub(SNIPPET_PREV));
    let end = ceil_char_boundary(body, (m.end() + SNIPPET_NEXT).min(body.len()));
    let window = &body[start..end];

    // Only a literal, case-sensitive occurrence is emphasized; a window
    // that differs in case from the folded term is returned untouched.
    match window.find(term) {
        Some(at) => format!(
            "...{}<em>{}</em>{}...",
            &window[..at],
            term,
            &window[at + term.len()..]
        ),
        None => format!("...{window}..."),
    }
}

fn leading_excerpt(body: &str) -> String {
    match body.char_indices().nth(SNIPPET_LEAD) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

fn floor_char_boundary(s: &str, mut at: usize) -> usize {
    while at > 0 && !s.is_char_boundary(at) {
        at -= 1;
    }
    at
}

fn ceil_char_boundary(s: &str, mut at: usize) -> usize {
    while at < s.len() && !s.is_char_boundary(at) {
        at += 1;
    }
    at
}
