use anyhow::{Context, Result};
use rank_core::corpus::{load_corpus, CorpusOptions, DEFAULT_EXTENSION};
use rank_core::queries::load_queries;
use rank_core::trim::{TailTrimmer, DEFAULT_TAIL_CODE};
use rank_core::{rank, write_rankings, Analyzer, Error, ModelConfig, TfidfVectorizer, Tokenizer, DEFAULT_TOP_K};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub documents: PathBuf,
    pub queries: PathBuf,
    pub output: PathBuf,
    pub top_k: usize,
    pub extension: String,
    pub tail_code: String,
    pub lexicon: Option<PathBuf>,
    pub stopwords: Option<PathBuf>,
    pub summary: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            documents: PathBuf::from("./documents/"),
            queries: PathBuf::from("./query_devel.xml"),
            output: PathBuf::from("./output.txt"),
            top_k: DEFAULT_TOP_K,
            extension: DEFAULT_EXTENSION.to_string(),
            tail_code: DEFAULT_TAIL_CODE.to_string(),
            lexicon: None,
            stopwords: None,
            summary: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub num_docs: usize,
    pub num_queries: usize,
    pub vocabulary_size: usize,
    pub rows_written: usize,
    pub created_at: String,
}

/// Load the language model. Done once, before any input is touched.
pub fn load_model(config: &RunConfig) -> Result<Analyzer> {
    let model = ModelConfig { lexicon: config.lexicon.clone(), stopwords: config.stopwords.clone() };
    Analyzer::load(&model).context("failed to load the language model")
}

pub fn run(config: &RunConfig) -> Result<RunSummary> {
    let analyzer = load_model(config)?;
    run_with(config, &analyzer)
}

/// Score every query against the corpus and write the ranked lists.
///
/// Nothing is written unless every stage succeeds.
pub fn run_with(config: &RunConfig, tokenizer: &dyn Tokenizer) -> Result<RunSummary> {
    if config.top_k == 0 {
        return Err(Error::Config("top-k must be at least 1".into()).into());
    }
    let options = CorpusOptions { extension: config.extension.clone(), trimmer: TailTrimmer::new(&config.tail_code)? };

    let corpus = load_corpus(&config.documents, &options, tokenizer)
        .with_context(|| format!("failed to load documents from {}", config.documents.display()))?;
    let queries = load_queries(&config.queries, tokenizer)
        .with_context(|| format!("failed to load queries from {}", config.queries.display()))?;
    if corpus.is_empty() {
        tracing::warn!(dir = %config.documents.display(), "no documents found; output will be empty");
    }

    let vectorizer = TfidfVectorizer::fit(&corpus);
    let similarity = vectorizer.similarity(&corpus, &queries);
    let rankings = rank(&similarity, config.top_k);
    let rows_written = write_rankings(&config.output, &rankings)
        .with_context(|| format!("failed to write {}", config.output.display()))?;

    let summary = RunSummary {
        num_docs: corpus.len(),
        num_queries: queries.len(),
        vocabulary_size: vectorizer.vocabulary_size(),
        rows_written,
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "".into()),
    };
    // The rankings are already in place, so a summary failure only gets logged.
    if let Some(path) = &config.summary {
        if let Err(e) = save_summary(path, &summary) {
            tracing::warn!(path = %path.display(), error = %format!("{e:#}"), "failed to write run summary");
        }
    }
    tracing::info!(
        num_docs = summary.num_docs,
        num_queries = summary.num_queries,
        rows = summary.rows_written,
        output = %config.output.display(),
        "ranking complete"
    );
    Ok(summary)
}

pub fn save_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let mut f = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let json = serde_json::to_string_pretty(summary)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_summary(path: &Path) -> Result<RunSummary> {
    let buf = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(serde_json::from_str(&buf)?)
}
