use anyhow::{Context, Result};
use clap::Parser;
use docsearch_core::corpus::FIELD_SEP;
use scraper::{Html, Selector};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "extractor")]
#[command(about = "Extract title/body/url records from an HTML tree into a delimited corpus", long_about = None)]
struct Cli {
    /// Directory tree containing the source .html files
    #[arg(long)]
    input: PathBuf,
    /// Corpus file to write
    #[arg(long, default_value = "./data/raw_html/raw.txt")]
    output: PathBuf,
    /// Prefix prepended to each file's input-relative path to form its url
    #[arg(long, default_value = "https://www.boost.org/doc/libs/1_78_0/doc/html")]
    url_prefix: String,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let htmls = collect_html_files(&cli.input)?;
    tracing::info!(files = htmls.len(), input = %cli.input.display(), "discovered html files");

    if let Some(dir) = cli.output.parent() {
        fs::create_dir_all(dir).ok();
    }
    let out = File::create(&cli.output)
        .with_context(|| format!("failed to create {}", cli.output.display()))?;
    let mut out = BufWriter::new(out);

    let sel_title = Selector::parse("title").expect("valid selector");
    let sel_body = Selector::parse("body").expect("valid selector");

    let mut written = 0usize;
    for path in &htmls {
        let (title, body) = match fs::read_to_string(path) {
            Ok(html) => extract_from_html(&html, &sel_title, &sel_body, path),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "failed to read html file");
                (String::new(), String::new())
            }
        };
        let url = build_url(path, &cli.input, &cli.url_prefix);
        // One record per line, three fields joined by the separator byte.
        writeln!(out, "{title}{FIELD_SEP}{body}{FIELD_SEP}{url}")?;
        written += 1;
    }
    out.flush()?;
    tracing::info!(written, output = %cli.output.display(), "corpus written");
    Ok(())
}

/// Recursively gather .html files under `root`, in sorted path order so
/// repeated runs emit byte-identical corpora.
fn collect_html_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|s| s.to_str()) != Some("html") {
            continue;
        }
        files.push(entry.path().to_path_buf());
    }
    Ok(files)
}

/// Pull the title element's text and the visible body text out of one
/// document. Extraction failures degrade to empty fields; the record is
/// still emitted with all three columns.
fn extract_from_html(
    html: &str,
    sel_title: &Selector,
    sel_body: &Selector,
    path: &Path,
) -> (String, String) {
    let doc = Html::parse_document(html);
    let title = match doc.select(sel_title).next() {
        Some(node) => sanitize(&node.text().collect::<Vec<_>>().join(" ")),
        None => {
            tracing::warn!(path = %path.display(), "html file has no title element");
            String::new()
        }
    };
    let body = doc
        .select(sel_body)
        .next()
        .map(|node| sanitize(&node.text().collect::<Vec<_>>().join(" ")))
        .unwrap_or_default();
    (title, body)
}

/// Collapse record-structure bytes out of extracted text: newlines would
/// split the record, the separator byte would change its arity.
fn sanitize(text: &str) -> String {
    let cleaned = text.replace(['\n', '\r', FIELD_SEP], " ");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn build_url(path: &Path, root: &Path, prefix: &str) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let rel = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    format!("{prefix}/{rel}")
}
