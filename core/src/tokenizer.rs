use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    // Word-ish runs (letters, digits, marks, underscores, inner apostrophes) or a single symbol.
    static ref SEGMENT_RE: Regex = Regex::new(r"[\p{L}\p{N}\p{M}_]+(?:['’][\p{L}\p{N}\p{M}_]+)*|[^\s\p{L}\p{N}\p{M}_]")
        .expect("valid regex");
}

const STOPWORDS: &[&str] = &[
    "a","about","above","across","after","afterwards","again","against","all","almost","alone","along","already","also","although","always","am","among","amongst","an","and","another","any","anyhow","anyone","anything","anyway","anywhere","are","aren't","around","as","at",
    "be","became","because","become","becomes","becoming","been","before","beforehand","behind","being","below","beside","besides","between","beyond","both","but","by",
    "can","can't","cannot","could","couldn't",
    "did","didn't","do","does","doesn't","doing","don't","done","down","due","during",
    "each","either","else","elsewhere","enough","even","ever","every","everyone","everything","everywhere","except",
    "few","for","former","formerly","from","further",
    "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","hence","her","here","here's","hereafter","hereby","herein","hers","herself","him","himself","his","how","how's","however",
    "i","i'd","i'll","i'm","i've","if","in","indeed","into","is","isn't","it","it's","its","itself",
    "just","let's","made","many","may","me","meanwhile","might","more","moreover","most","mostly","much","must","mustn't","my","myself",
    "namely","neither","never","nevertheless","next","no","nobody","none","nor","not","nothing","now","nowhere",
    "of","off","often","on","once","only","onto","or","other","others","otherwise","ought","our","ours","ourselves","out","over","own",
    "per","perhaps","please","put","quite","rather","really","regarding",
    "same","say","see","seem","seemed","seeming","seems","several","she","she'd","she'll","she's","should","shouldn't","since","so","some","somehow","someone","something","sometime","sometimes","somewhere","still","such",
    "than","that","that's","the","their","theirs","them","themselves","then","thence","there","there's","thereafter","thereby","therefore","therein","these","they","they'd","they'll","they're","they've","this","those","though","through","throughout","thus","to","together","too","toward","towards",
    "under","unless","until","up","upon","us","used","using",
    "various","very","via",
    "was","wasn't","we","we'd","we'll","we're","we've","well","were","weren't","what","what's","whatever","when","when's","whence","whenever","where","where's","whereas","whereby","wherein","whether","which","while","who","who's","whoever","whole","whom","whose","why","why's","will","with","within","without","won't","would","wouldn't",
    "yet","you","you'd","you'll","you're","you've","your","yours","yourself","yourselves",
];

// Irregular inflections the Snowball stemmer cannot map to a dictionary form.
const IRREGULAR_LEMMAS: &[(&str, &str)] = &[
    ("began", "begin"), ("begun", "begin"), ("bought", "buy"), ("brought", "bring"), ("built", "build"),
    ("came", "come"), ("children", "child"), ("chose", "choose"), ("chosen", "choose"), ("drove", "drive"),
    ("driven", "drive"), ("feet", "foot"), ("found", "find"), ("gave", "give"), ("geese", "goose"),
    ("given", "give"), ("gone", "go"), ("grew", "grow"), ("grown", "grow"), ("held", "hold"),
    ("kept", "keep"), ("knew", "know"), ("known", "know"), ("lost", "lose"), ("men", "man"),
    ("met", "meet"), ("mice", "mouse"), ("paid", "pay"), ("people", "person"), ("ran", "run"),
    ("said", "say"), ("sent", "send"), ("sold", "sell"), ("spoke", "speak"), ("spoken", "speak"),
    ("stood", "stand"), ("taken", "take"), ("teeth", "tooth"), ("thought", "think"), ("told", "tell"),
    ("took", "take"), ("went", "go"), ("women", "woman"), ("won", "win"), ("worse", "bad"),
    ("worst", "bad"), ("wrote", "write"), ("written", "write"),
];

/// Turns raw text into the normalized terms that get indexed.
///
/// Loaders take this as a capability so tests can swap in a trivial implementation.
pub trait Tokenizer {
    fn terms(&self, text: &str) -> Vec<String>;
}

/// One segmented token with the attributes the term filter looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// Lexicon lemma, else Snowball stem; lower-cased.
    pub lemma: String,
    pub is_stop: bool,
    pub is_alpha: bool,
}

/// Optional files that extend the built-in English model.
#[derive(Debug, Clone, Default)]
pub struct ModelConfig {
    /// Tab-separated `form<TAB>lemma` lines.
    pub lexicon: Option<PathBuf>,
    /// One extra stopword per line.
    pub stopwords: Option<PathBuf>,
}

/// English analyzer: NFKC normalization, segmentation, stopword and alphabetic flags, and
/// lemmatization via an irregular-form lexicon with a Snowball stemming fallback.
pub struct Analyzer {
    stopwords: HashSet<String>,
    lexicon: HashMap<String, String>,
    stemmer: Stemmer,
}

impl Analyzer {
    /// Load the model once before any document is processed. Every configured file must exist
    /// and parse; otherwise nothing downstream can be tokenized, so this fails with `Setup`.
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let mut analyzer = Analyzer::default();
        if let Some(path) = &config.stopwords {
            let extra = read_model_file(path)?;
            let before = analyzer.stopwords.len();
            analyzer.stopwords.extend(
                extra.lines()
                    .map(|l| l.trim())
                    .filter(|l| !l.is_empty() && !l.starts_with('#'))
                    .map(|l| l.to_lowercase()),
            );
            tracing::debug!(path = %path.display(), added = analyzer.stopwords.len() - before, "loaded stopwords");
        }
        if let Some(path) = &config.lexicon {
            let entries = parse_lexicon(path, &read_model_file(path)?)?;
            tracing::debug!(path = %path.display(), entries = entries.len(), "loaded lemma lexicon");
            analyzer.lexicon.extend(entries);
        }
        tracing::info!(stopwords = analyzer.stopwords.len(), lexicon = analyzer.lexicon.len(), "analyzer ready");
        Ok(analyzer)
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    /// Lexicon lemma of a single word, else its Snowball stem; lower-cased.
    pub fn lemma(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        match self.lexicon.get(&lower) {
            Some(lemma) => lemma.clone(),
            None => self.stemmer.stem(&lower).to_lowercase(),
        }
    }

    /// Segment text and annotate every token, punctuation included.
    pub fn analyze(&self, text: &str) -> Vec<Token> {
        let normalized = text.nfkc().collect::<String>();
        SEGMENT_RE
            .find_iter(&normalized)
            .map(|m| {
                let text = m.as_str();
                Token {
                    text: text.to_string(),
                    lemma: self.lemma(text),
                    is_stop: self.is_stopword(text),
                    is_alpha: text.chars().all(char::is_alphabetic),
                }
            })
            .collect()
    }
}

impl Default for Analyzer {
    /// The built-in model with no extension files.
    fn default() -> Self {
        Self {
            stopwords: STOPWORDS.iter().map(|w| w.to_string()).collect(),
            lexicon: IRREGULAR_LEMMAS.iter().map(|(f, l)| (f.to_string(), l.to_string())).collect(),
            stemmer: Stemmer::create(Algorithm::English),
        }
    }
}

impl Tokenizer for Analyzer {
    /// Non-stopword, purely alphabetic tokens as lower-cased lemmas. Duplicates are kept since
    /// term frequency feeds the weighting.
    fn terms(&self, text: &str) -> Vec<String> {
        self.analyze(text)
            .into_iter()
            .filter(|t| !t.is_stop && t.is_alpha)
            .map(|t| t.lemma.to_lowercase())
            // A lemma can land on a stopword even when the surface form is not one ("saying" -> "say").
            .filter(|lemma| !lemma.is_empty() && !self.is_stopword(lemma))
            .collect()
    }
}

fn read_model_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::Setup(format!("cannot read model file {}: {e}", path.display())))
}

fn parse_lexicon(path: &Path, content: &str) -> Result<Vec<(String, String)>> {
    let mut entries = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        match fields.as_slice() {
            [form, lemma] if !form.is_empty() && !lemma.is_empty() => {
                entries.push((form.to_lowercase(), lemma.to_lowercase()));
            }
            _ => {
                return Err(Error::Setup(format!(
                    "{}:{}: expected `form<TAB>lemma`, got {line:?}",
                    path.display(),
                    lineno + 1
                )))
            }
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_terms() {
        let a = Analyzer::default();
        let t = a.terms("Running, the runners run!");
        assert_eq!(t.iter().filter(|w| w.as_str() == "run").count(), 2);
        assert!(!t.contains(&"the".to_string()));
    }

    #[test]
    fn token_attributes() {
        let a = Analyzer::default();
        let toks = a.analyze("The 42 cats, abc123.");
        let by_text = |s: &str| toks.iter().find(|t| t.text == s).unwrap().clone();
        assert!(by_text("The").is_stop);
        assert!(!by_text("42").is_alpha);
        assert_eq!(by_text("cats").lemma, "cat");
        assert!(!by_text("abc123").is_alpha);
        assert!(!by_text(",").is_alpha);
    }

    #[test]
    fn irregular_forms_use_lexicon() {
        let a = Analyzer::default();
        assert_eq!(a.terms("Children went"), vec!["child", "go"]);
    }

    #[test]
    fn lexicon_parse_errors_name_the_line() {
        let err = parse_lexicon(Path::new("lex.tsv"), "geese\tgoose\nbroken line\n").unwrap_err();
        match err {
            Error::Setup(msg) => assert!(msg.contains("lex.tsv:2")),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
