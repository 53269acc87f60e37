use crate::error::{Error, Result};
use crate::extract::extract_file;
use crate::model::{Corpus, Document};
use crate::tokenizer::Tokenizer;
use crate::trim::TailTrimmer;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const DEFAULT_EXTENSION: &str = "html";

#[derive(Debug, Clone)]
pub struct CorpusOptions {
    /// File extension (without the dot) that marks a document; anything else in the directory is ignored.
    pub extension: String,
    pub trimmer: TailTrimmer,
}

impl Default for CorpusOptions {
    fn default() -> Self {
        Self { extension: DEFAULT_EXTENSION.to_string(), trimmer: TailTrimmer::default() }
    }
}

/// Document files directly inside `dir`, sorted by file name.
///
/// The sorted list becomes the corpus row order, so the same directory always yields the same matrix rows.
pub fn list_documents(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            Error::io(path, e.into())
        })?;
        if !entry.file_type().is_file() { continue; }
        let p = entry.path();
        if p.extension().and_then(|s| s.to_str()) == Some(extension) {
            files.push(p.to_path_buf());
        }
    }
    Ok(files)
}

/// Extract, trim and tokenize every document in `dir`.
pub fn load_corpus(dir: &Path, options: &CorpusOptions, tokenizer: &dyn Tokenizer) -> Result<Corpus> {
    let files = list_documents(dir, &options.extension)?;
    let mut corpus = Corpus::new();
    for file in files {
        let id = match file.file_stem() {
            Some(stem) => stem.to_string_lossy().into_owned(),
            None => continue,
        };
        let text = extract_file(&file)?;
        let terms = tokenizer.terms(options.trimmer.trim(&text));
        tracing::debug!(doc = %id, terms = terms.len(), "tokenized document");
        if !corpus.push(Document { id: id.clone(), terms }) {
            return Err(Error::parse(&file, format!("duplicate document id {id:?}")));
        }
    }
    tracing::info!(dir = %dir.display(), num_docs = corpus.len(), "loaded corpus");
    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    struct Whitespace;

    impl Tokenizer for Whitespace {
        fn terms(&self, text: &str) -> Vec<String> {
            text.split_whitespace().map(|s| s.to_string()).collect()
        }
    }

    #[test]
    fn loads_only_matching_files_in_name_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.html"), "<p>beta CA12345 stamp</p>").unwrap();
        fs::write(dir.path().join("a.html"), "<p>alpha alpha</p>").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::create_dir(dir.path().join("sub.html")).unwrap();

        let corpus = load_corpus(dir.path(), &CorpusOptions::default(), &Whitespace).unwrap();
        assert_eq!(corpus.ids().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(corpus.get("a").unwrap().terms, vec!["alpha", "alpha"]);
        assert_eq!(corpus.get("b").unwrap().terms, vec!["beta"]);
    }

    #[test]
    fn id_strips_only_final_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("report.v2.html"), "x").unwrap();
        let corpus = load_corpus(dir.path(), &CorpusOptions::default(), &Whitespace).unwrap();
        assert_eq!(corpus.ids().collect::<Vec<_>>(), vec!["report.v2"]);
    }

    #[test]
    fn empty_directory_is_empty_corpus() {
        let dir = tempdir().unwrap();
        let corpus = load_corpus(dir.path(), &CorpusOptions::default(), &Whitespace).unwrap();
        assert!(corpus.is_empty());
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let err = load_corpus(&dir.path().join("nope"), &CorpusOptions::default(), &Whitespace).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
