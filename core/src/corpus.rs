use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Field separator inside a corpus record. A control byte the extractor
/// strips from content, so it can never collide with document text.
pub const FIELD_SEP: char = '\u{3}';

/// Build-time failure taxonomy. `SourceUnreadable` is fatal and produces no
/// store; `RecordMalformed` is recoverable and only ever skips one line.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("corpus source {} is unreadable", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corpus line {line} has {fields} fields, expected 3")]
    RecordMalformed { line: usize, fields: usize },
}

/// One successfully parsed corpus record, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDoc {
    pub title: String,
    pub body: String,
    pub url: String,
}

/// A parsed corpus: records in file order plus the count of lines dropped
/// as malformed. Skipped lines consume no document id.
#[derive(Debug, Default)]
pub struct Corpus {
    pub records: Vec<RawDoc>,
    pub skipped: usize,
}

/// Split one corpus line into its title/body/url fields. `line_no` is
/// 1-based and only used for diagnostics.
pub fn parse_record(line: &str, line_no: usize) -> Result<RawDoc, BuildError> {
    let fields: Vec<&str> = line.split(FIELD_SEP).collect();
    if fields.len() != 3 {
        return Err(BuildError::RecordMalformed {
            line: line_no,
            fields: fields.len(),
        });
    }
    Ok(RawDoc {
        title: fields[0].to_string(),
        body: fields[1].to_string(),
        url: fields[2].to_string(),
    })
}

/// Read and validate the delimited corpus file. Malformed lines are logged
/// and skipped; a source that cannot be opened or read fails the build.
pub fn read_corpus(path: &Path) -> Result<Corpus, BuildError> {
    let file = File::open(path).map_err(|source| BuildError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut corpus = Corpus::default();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| BuildError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        match parse_record(&line, idx + 1) {
            Ok(record) => corpus.records.push(record),
            Err(BuildError::RecordMalformed { line, fields }) => {
                tracing::warn!(line, fields, "skipping malformed corpus record");
                corpus.skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(corpus)
}
