pub mod corpus;
pub mod engine;
pub mod index;
pub mod tokenizer;

pub use corpus::{BuildError, Corpus, RawDoc};
pub use engine::{search, RankedResult};
pub use index::{build_index, DocId, Document, IndexStore, Posting};
