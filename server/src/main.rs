use anyhow::Result;
use axum::Router;
use clap::Parser;
use docsearch_core::{build_index, tokenizer};
use docsearch_server::build_app;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Delimited corpus file to index at startup
    #[arg(long, default_value = "./data/raw_html/raw.txt")]
    corpus: PathBuf,
    /// Optional stopword list (one word per line) replacing the built-in set
    #[arg(long)]
    stopwords: Option<PathBuf>,
    /// Directory holding the static search front-end
    #[arg(long, default_value = "./wwwroot")]
    www: PathBuf,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    if let Some(path) = &args.stopwords {
        let loaded = tokenizer::load_stopwords(path)?;
        tracing::info!(loaded, path = %path.display(), "stopword list loaded");
    }

    // The store is fully built before the listener opens, so every request
    // ever served sees the same frozen index.
    let store = Arc::new(build_index(&args.corpus)?);
    let app: Router = build_app(store, args.www.clone());

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
