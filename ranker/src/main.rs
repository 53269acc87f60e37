use anyhow::Result;
use clap::Parser;
use ranker::{run, RunConfig};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "ranker")]
#[command(about = "Rank HTML documents against XML queries by TF-IDF cosine similarity", long_about = None)]
struct Args {
    /// Directory of documents to rank
    #[arg(long, default_value = "./documents/")]
    documents: PathBuf,
    /// Query file with <DOC>/<DOCNO> records
    #[arg(long, default_value = "./query_devel.xml")]
    queries: PathBuf,
    /// Output file (tab-separated query, document, score)
    #[arg(long, default_value = "./output.txt")]
    output: PathBuf,
    /// Results kept per query
    #[arg(long, default_value_t = rank_core::DEFAULT_TOP_K)]
    top_k: usize,
    /// Extension of document files, without the dot
    #[arg(long, default_value = "html")]
    extension: String,
    /// Two-letter code of the trailing control stamp to cut from documents
    #[arg(long, default_value = "CA")]
    tail_code: String,
    /// Extra lemma lexicon (form<TAB>lemma per line)
    #[arg(long)]
    lexicon: Option<PathBuf>,
    /// Extra stopwords (one per line)
    #[arg(long)]
    stopwords: Option<PathBuf>,
    /// Also write a JSON run summary here
    #[arg(long)]
    summary: Option<PathBuf>,
}

impl From<Args> for RunConfig {
    fn from(a: Args) -> Self {
        RunConfig {
            documents: a.documents,
            queries: a.queries,
            output: a.output,
            top_k: a.top_k,
            extension: a.extension,
            tail_code: a.tail_code,
            lexicon: a.lexicon,
            stopwords: a.stopwords,
            summary: a.summary,
        }
    }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let config: RunConfig = Args::parse().into();
    run(&config)?;
    Ok(())
}
