use anyhow::{bail, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*").expect("valid regex");
}

// Initialized at most once, either from `load_stopwords` or from the
// built-in list on first tokenization. Immutable afterwards, so concurrent
// tokenization never takes a lock.
static STOPWORDS: OnceLock<HashSet<String>> = OnceLock::new();

fn builtin_stopwords() -> HashSet<String> {
    let words: &[&str] = &[
        "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
        "be","because","been","before","being","below","between","both","but","by",
        "can","can't","cannot","could","couldn't",
        "did","didn't","do","does","doesn't","doing","don't","down","during",
        "each","few","for","from","further",
        "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
        "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
        "let's","me","more","most","mustn't","my","myself",
        "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
        "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
        "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
        "under","until","up","very",
        "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
        "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves",
    ];
    words.iter().map(|w| w.to_string()).collect()
}

/// Replace the built-in stopword list with one loaded from `path`, one word
/// per line. Must be called before the first tokenization; the set cannot
/// change once tokenization has started.
pub fn load_stopwords(path: &Path) -> Result<usize> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read stopword list {}", path.display()))?;
    let set: HashSet<String> = text
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .collect();
    let loaded = set.len();
    if STOPWORDS.set(set).is_err() {
        bail!("stopword list already initialized");
    }
    Ok(loaded)
}

fn is_stopword(token: &str) -> bool {
    STOPWORDS.get_or_init(builtin_stopwords).contains(token)
}

/// Tokenize text into case-folded terms using NFKC normalization, lowercase
/// folding, and stopword removal. No stemming: every emitted term occurs
/// literally in the normalized input, which postings and snippets rely on.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    let mut tokens = Vec::new();
    for mat in RE.find_iter(&normalized) {
        let token = mat.as_str();
        if is_stopword(token) {
            continue;
        }
        tokens.push(token.to_string());
    }
    tokens
}
