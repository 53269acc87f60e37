use crate::error::{Error, Result};
use crate::extract::extract_fragment_text;
use crate::model::{Query, QueryNumber, QuerySet};
use crate::tokenizer::Tokenizer;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

lazy_static! {
    static ref DOC_OPEN_RE: Regex = Regex::new(r"(?i)<DOC>").expect("valid regex");
    static ref DOC_RE: Regex = Regex::new(r"(?is)<DOC>(.*?)</DOC>").expect("valid regex");
    static ref DOCNO_RE: Regex = Regex::new(r"(?is)<DOCNO>(.*?)</DOCNO>").expect("valid regex");
}

/// Read and parse a query file.
pub fn load_queries(path: &Path, tokenizer: &dyn Tokenizer) -> Result<QuerySet> {
    let source = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_queries(path, &source, tokenizer)
}

/// Parse `<DOC>` records, each holding a `<DOCNO>` number and free query text.
///
/// A record without a number or text, or a repeated number, fails the whole file: skipping it
/// would shift every later query onto the wrong label.
pub fn parse_queries(path: &Path, source: &str, tokenizer: &dyn Tokenizer) -> Result<QuerySet> {
    let mut queries = Vec::new();
    let mut seen: HashSet<QueryNumber> = HashSet::new();

    for (idx, caps) in DOC_RE.captures_iter(source).enumerate() {
        let record = idx + 1;
        let block = caps.get(1).map_or("", |m| m.as_str());

        let number_text = DOCNO_RE
            .captures(block)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .ok_or_else(|| Error::parse(path, format!("record {record} has no <DOCNO>")))?;
        let number: QueryNumber = number_text.parse().map_err(|_| {
            Error::parse(path, format!("record {record}: <DOCNO> {number_text:?} is not a query number"))
        })?;
        if !seen.insert(number) {
            return Err(Error::parse(path, format!("record {record}: duplicate query number {number}")));
        }

        let body = extract_fragment_text(&DOCNO_RE.replace_all(block, " "));
        if body.trim().is_empty() {
            return Err(Error::parse(path, format!("query {number} has no text")));
        }
        let terms = tokenizer.terms(&body);
        tracing::debug!(query = number, terms = terms.len(), "tokenized query");
        queries.push(Query { number, terms });
    }

    let opened = DOC_OPEN_RE.find_iter(source).count();
    if opened != queries.len() {
        return Err(Error::parse(path, format!("{opened} <DOC> tags but {} complete records", queries.len())));
    }

    tracing::info!(path = %path.display(), num_queries = queries.len(), "loaded queries");
    Ok(QuerySet::new(queries))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Whitespace;

    impl Tokenizer for Whitespace {
        fn terms(&self, text: &str) -> Vec<String> {
            text.split_whitespace().map(|s| s.to_lowercase()).collect()
        }
    }

    fn parse(src: &str) -> Result<QuerySet> {
        parse_queries(Path::new("q.xml"), src, &Whitespace)
    }

    #[test]
    fn keeps_file_order_and_numbers() {
        let src = "<DOC>\n<DOCNO>12</DOCNO>\nSpace Shuttle\n</DOC>\n<DOC>\n<DOCNO> 3 </DOCNO>\n<TEXT>moon &amp; sun</TEXT>\n</DOC>\n";
        let set = parse(src).unwrap();
        assert_eq!(set.numbers(), vec![12, 3]);
        assert_eq!(set.queries()[0].terms, vec!["space", "shuttle"]);
        assert_eq!(set.queries()[1].terms, vec!["moon", "&", "sun"]);
    }

    #[test]
    fn empty_file_has_no_queries() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn missing_docno_fails() {
        let err = parse("<DOC>text only</DOC>").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn non_numeric_docno_fails() {
        assert!(parse("<DOC><DOCNO>abc</DOCNO>text</DOC>").is_err());
    }

    #[test]
    fn missing_text_fails() {
        assert!(parse("<DOC><DOCNO>1</DOCNO>   </DOC>").is_err());
    }

    #[test]
    fn duplicate_number_fails() {
        assert!(parse("<DOC><DOCNO>1</DOCNO>a</DOC><DOC><DOCNO>1</DOCNO>b</DOC>").is_err());
    }

    #[test]
    fn unterminated_record_fails() {
        assert!(parse("<DOC><DOCNO>1</DOCNO>a</DOC><DOC><DOCNO>2</DOCNO>b").is_err());
    }
}
