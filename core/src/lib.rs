pub mod corpus;
pub mod error;
pub mod extract;
pub mod model;
pub mod queries;
pub mod rank;
pub mod tokenizer;
pub mod trim;
pub mod vectorizer;

pub use corpus::{load_corpus, CorpusOptions};
pub use error::{Error, Result};
pub use model::{Corpus, Document, Query, QueryNumber, QuerySet};
pub use rank::{rank, render, write_rankings, Hit, QueryRanking, DEFAULT_TOP_K};
pub use tokenizer::{Analyzer, ModelConfig, Token, Tokenizer};
pub use trim::TailTrimmer;
pub use vectorizer::{SimilarityMatrix, TfidfVectorizer};
