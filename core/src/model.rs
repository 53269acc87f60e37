use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Query number as it appears in the query file's `<DOCNO>` field.
pub type QueryNumber = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// File stem of the source document.
    pub id: String,
    pub terms: Vec<String>,
}

/// Documents in a fixed row order. Every matrix built from a corpus uses this order for its rows.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
    by_id: HashMap<String, usize>,
}

impl Corpus {
    pub fn new() -> Self { Self::default() }

    /// Appends a document as the next row. Returns `false` and leaves the corpus untouched if the id is taken.
    pub fn push(&mut self, doc: Document) -> bool {
        if self.by_id.contains_key(&doc.id) {
            return false;
        }
        self.by_id.insert(doc.id.clone(), self.documents.len());
        self.documents.push(doc);
        true
    }

    pub fn documents(&self) -> &[Document] { &self.documents }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.documents.iter().map(|d| d.id.as_str())
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.by_id.get(id).map(|&row| &self.documents[row])
    }

    pub fn row_of(&self, id: &str) -> Option<usize> { self.by_id.get(id).copied() }

    pub fn len(&self) -> usize { self.documents.len() }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }
}

impl FromIterator<Document> for Corpus {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        let mut corpus = Corpus::new();
        for doc in iter {
            corpus.push(doc);
        }
        corpus
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub number: QueryNumber,
    pub terms: Vec<String>,
}

/// Queries in file order; a query's position is its column in the similarity matrix.
#[derive(Debug, Clone, Default)]
pub struct QuerySet {
    queries: Vec<Query>,
}

impl QuerySet {
    pub fn new(queries: Vec<Query>) -> Self { Self { queries } }

    pub fn queries(&self) -> &[Query] { &self.queries }

    /// Column index -> original query number.
    pub fn numbers(&self) -> Vec<QueryNumber> {
        self.queries.iter().map(|q| q.number).collect()
    }

    pub fn len(&self) -> usize { self.queries.len() }

    pub fn is_empty(&self) -> bool { self.queries.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, terms: &[&str]) -> Document {
        Document { id: id.into(), terms: terms.iter().map(|t| t.to_string()).collect() }
    }

    #[test]
    fn rows_follow_insertion_order() {
        let corpus: Corpus = vec![doc("b", &["x"]), doc("a", &["y"])].into_iter().collect();
        assert_eq!(corpus.ids().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(corpus.row_of("a"), Some(1));
        assert_eq!(corpus.get("b").map(|d| d.terms.len()), Some(1));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut corpus = Corpus::new();
        assert!(corpus.push(doc("a", &["x"])));
        assert!(!corpus.push(doc("a", &["z"])));
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.get("a").unwrap().terms, vec!["x".to_string()]);
    }

    #[test]
    fn query_numbers_keep_file_order() {
        let set = QuerySet::new(vec![
            Query { number: 7, terms: vec![] },
            Query { number: 3, terms: vec![] },
        ]);
        assert_eq!(set.numbers(), vec![7, 3]);
    }
}
