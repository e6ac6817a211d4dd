use std::collections::HashMap;
use std::path::Path;

use crate::corpus::{self, BuildError, RawDoc};
use crate::tokenizer::tokenize;

pub type DocId = u32;

/// One title occurrence counts five times a body occurrence.
const TITLE_WEIGHT: u32 = 5;
const BODY_WEIGHT: u32 = 1;

/// A corpus record frozen into the forward index. `id` equals its position
/// in corpus read order and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub body: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: DocId,
    pub term: String,
    pub weight: u32,
}

/// Frozen forward + inverted index. Built exactly once per process, then
/// only read; sharing it across query threads needs no locking.
#[derive(Debug, Default)]
pub struct IndexStore {
    forward: Vec<Document>,
    inverted: HashMap<String, Vec<Posting>>,
}

impl IndexStore {
    /// Forward lookup. None for any id outside `[0, doc_count)`.
    pub fn document(&self, id: DocId) -> Option<&Document> {
        self.forward.get(id as usize)
    }

    /// Inverted lookup. None for terms that were never indexed. Postings
    /// appear in document insertion order, not sorted.
    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.inverted.get(term).map(|list| list.as_slice())
    }

    pub fn doc_count(&self) -> usize {
        self.forward.len()
    }

    pub fn term_count(&self) -> usize {
        self.inverted.len()
    }
}

#[derive(Default)]
struct FieldCounts {
    title: u32,
    body: u32,
}

#[derive(Default)]
struct IndexBuilder {
    forward: Vec<Document>,
    inverted: HashMap<String, Vec<Posting>>,
}

impl IndexBuilder {
    /// Assign the next sequential id, append the document to the forward
    /// index, and add one weighted posting per distinct term.
    fn add_document(&mut self, raw: RawDoc) {
        let id = self.forward.len() as DocId;

        let mut counts: HashMap<String, FieldCounts> = HashMap::new();
        for term in tokenize(&raw.title) {
            counts.entry(term).or_default().title += 1;
        }
        for term in tokenize(&raw.body) {
            counts.entry(term).or_default().body += 1;
        }

        for (term, seen) in counts {
            let weight = TITLE_WEIGHT * seen.title + BODY_WEIGHT * seen.body;
            let posting = Posting {
                doc_id: id,
                term: term.clone(),
                weight,
            };
            self.inverted.entry(term).or_default().push(posting);
        }

        self.forward.push(Document {
            id,
            title: raw.title,
            body: raw.body,
            url: raw.url,
        });
    }

    fn finish(self) -> IndexStore {
        IndexStore {
            forward: self.forward,
            inverted: self.inverted,
        }
    }
}

/// Build the immutable index from the delimited corpus at `path`.
///
/// Malformed records are skipped and consume no id; their count is surfaced
/// through logging only. An unreadable source is fatal and yields no store.
/// A corpus where every line is malformed still builds an empty store.
pub fn build_index(path: &Path) -> Result<IndexStore, BuildError> {
    let corpus = corpus::read_corpus(path)?;

    let mut builder = IndexBuilder::default();
    for raw in corpus.records {
        builder.add_document(raw);
    }
    let store = builder.finish();

    tracing::info!(
        docs = store.doc_count(),
        terms = store.term_count(),
        skipped = corpus.skipped,
        "index built"
    );
    Ok(store)
}
