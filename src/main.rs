use anyhow::{Context, Result};
use clap::Parser;
use cnfsearch::display::{format_doc_ids, format_help, format_index, format_results};
use cnfsearch::{CollectionOptions, Document, PostingList, QueryResult, SearchEngine};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Boolean (CNF) full-text search over a directory", long_about = None)]
struct Args {
    /// Collection root
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Descend into subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Directory name, file name, directory path or file path to skip (repeatable)
    #[arg(short = 'x', long = "exclude")]
    excluded: Vec<String>,

    /// Answer a single query and exit
    #[arg(short, long)]
    query: Option<String>,

    /// Print the one-shot query result as JSON
    #[arg(long, requires = "query")]
    json: bool,
}

#[derive(Debug, Serialize)]
struct QueryResponse<'a> {
    query: &'a str,
    total: usize,
    documents: Vec<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    postings: Option<&'a PostingList>,
}

const EXIT: &str = ";;";
const PROMPT: &str = "Search: ";

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let options = CollectionOptions::new(&args.dir)
        .recursive(args.recursive)
        .exclude_all(args.excluded);

    let engine = SearchEngine::new();
    let start = Instant::now();
    let count = engine
        .index_collection(&options)
        .with_context(|| format!("Failed to index {}", args.dir.display()))?;
    tracing::info!(documents = count, elapsed = ?start.elapsed(), "ready");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.query {
        Some(query) => answer_once(&engine, &query, args.json, &mut out),
        None => interactive(&engine, io::stdin().lock(), &mut out),
    }
}

fn answer_once(engine: &SearchEngine, query: &str, json: bool, out: &mut impl Write) -> Result<()> {
    let result = engine.search(query);
    let documents = engine.documents();

    if json {
        let response = QueryResponse {
            query,
            total: result.len(),
            documents: result
                .doc_ids()
                .into_iter()
                .filter_map(|id| documents.get(id).cloned())
                .collect(),
            postings: match &result {
                QueryResult::Postings(list) => Some(list),
                QueryResult::Documents(_) => None,
            },
        };
        serde_json::to_writer_pretty(&mut *out, &response).context("Failed to write JSON")?;
        writeln!(out)?;
    } else {
        write!(out, "{}", format_results(&result, &documents))?;
    }
    Ok(())
}

fn interactive(engine: &SearchEngine, input: impl BufRead, out: &mut impl Write) -> Result<()> {
    writeln!(out, "Type ;;help for more commands.")?;

    let mut lines = input.lines();
    loop {
        write!(out, "\n{PROMPT}")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let query = line.context("Failed to read query")?;
        if query == EXIT {
            break;
        }

        writeln!(out)?;
        if query.starts_with(EXIT) {
            match query.as_str() {
                ";;help" => write!(out, "{}", format_help())?,
                ";;index" => write!(out, "{}", engine.with_index(format_index))?,
                ";;docid" => write!(out, "{}", format_doc_ids(&engine.documents()))?,
                _ => writeln!(out, "Invalid command.")?,
            }
        } else {
            write!(out, "{}", format_results(&engine.search(&query), &engine.documents()))?;
        }
    }
    Ok(())
}
