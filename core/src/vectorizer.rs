use crate::model::{Corpus, QueryNumber, QuerySet};
use sprs::CsMat;
use std::collections::{BTreeSet, HashMap};

/// Sparse row: `(column, weight)` pairs in ascending column order.
pub type SparseRow = Vec<(usize, f64)>;

/// TF-IDF weighting fitted on a corpus.
///
/// Weights are raw term counts times the smoothed idf `ln((1 + n) / (1 + df)) + 1`, and every
/// row is L2-normalized. The vocabulary is frozen at fit time.
///
/// Unlike scikit-learn's default token pattern, one-letter terms are kept as vocabulary entries.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    terms: Vec<String>,
    idf: Vec<f64>,
    num_docs: usize,
}

impl TfidfVectorizer {
    pub fn fit(corpus: &Corpus) -> Self {
        let terms: Vec<String> = corpus
            .documents()
            .iter()
            .flat_map(|d| d.terms.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let vocabulary: HashMap<String, usize> = terms.iter().enumerate().map(|(i, t)| (t.clone(), i)).collect();

        let mut df = vec![0u32; terms.len()];
        for doc in corpus.documents() {
            let distinct: BTreeSet<usize> = doc.terms.iter().filter_map(|t| vocabulary.get(t).copied()).collect();
            for col in distinct {
                df[col] += 1;
            }
        }

        let n = corpus.len() as f64;
        let idf = df.iter().map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0).collect();
        tracing::info!(num_docs = corpus.len(), vocabulary = terms.len(), "fitted tf-idf vocabulary");
        Self { vocabulary, terms, idf, num_docs: corpus.len() }
    }

    pub fn vocabulary_size(&self) -> usize { self.terms.len() }

    /// Vocabulary in column order.
    pub fn terms(&self) -> &[String] { &self.terms }

    pub fn column(&self, term: &str) -> Option<usize> { self.vocabulary.get(term).copied() }

    pub fn idf(&self, term: &str) -> Option<f64> { self.column(term).map(|c| self.idf[c]) }

    pub fn num_docs(&self) -> usize { self.num_docs }

    /// Project a term sequence into the fitted space. Unknown terms are dropped; a sequence with
    /// no known terms gives an empty (all-zero) row.
    pub fn transform(&self, terms: &[String]) -> SparseRow {
        let mut counts: HashMap<usize, u32> = HashMap::new();
        for term in terms {
            if let Some(&col) = self.vocabulary.get(term) {
                *counts.entry(col).or_insert(0) += 1;
            }
        }
        let mut row: SparseRow = counts.into_iter().map(|(col, tf)| (col, tf as f64 * self.idf[col])).collect();
        row.sort_unstable_by_key(|&(col, _)| col);

        let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in row.iter_mut() {
                *w /= norm;
            }
        }
        row
    }

    /// Term-document matrix: one row per corpus document, in corpus order.
    pub fn document_matrix(&self, corpus: &Corpus) -> CsMat<f64> {
        self.matrix(corpus.documents().iter().map(|d| d.terms.as_slice()))
    }

    /// Term-query matrix: one row per query, in file order.
    pub fn query_matrix(&self, queries: &QuerySet) -> CsMat<f64> {
        self.matrix(queries.queries().iter().map(|q| q.terms.as_slice()))
    }

    fn matrix<'a>(&self, rows: impl Iterator<Item = &'a [String]>) -> CsMat<f64> {
        let mut indptr = vec![0usize];
        let mut indices = Vec::new();
        let mut data = Vec::new();
        for terms in rows {
            for (col, w) in self.transform(terms) {
                indices.push(col);
                data.push(w);
            }
            indptr.push(indices.len());
        }
        CsMat::new((indptr.len() - 1, self.terms.len()), indptr, indices, data)
    }

    /// Cosine similarity of every document against every query.
    ///
    /// Rows are unit length or all-zero, so the sparse product `D * Q^T` is already the cosine,
    /// and a zero vector scores 0 against everything.
    pub fn similarity(&self, corpus: &Corpus, queries: &QuerySet) -> SimilarityMatrix {
        let mut matrix = SimilarityMatrix::zeros(corpus.ids().map(str::to_string).collect(), queries.numbers());
        if corpus.is_empty() || queries.is_empty() || self.terms.is_empty() {
            return matrix;
        }
        let docs = self.document_matrix(corpus);
        let qs = self.query_matrix(queries);
        let product = &docs * &qs.transpose_view();
        for (&value, (row, col)) in product.iter() {
            matrix.set(row, col, value.clamp(0.0, 1.0));
        }
        matrix
    }
}

/// Dense documents x queries score matrix that carries its own row and column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    doc_ids: Vec<String>,
    query_numbers: Vec<QueryNumber>,
    values: Vec<f64>, // row-major
}

impl SimilarityMatrix {
    pub fn zeros(doc_ids: Vec<String>, query_numbers: Vec<QueryNumber>) -> Self {
        let values = vec![0.0; doc_ids.len() * query_numbers.len()];
        Self { doc_ids, query_numbers, values }
    }

    /// `(documents, queries)`
    pub fn shape(&self) -> (usize, usize) { (self.doc_ids.len(), self.query_numbers.len()) }

    pub fn doc_ids(&self) -> &[String] { &self.doc_ids }

    pub fn query_numbers(&self) -> &[QueryNumber] { &self.query_numbers }

    pub fn get(&self, row: usize, col: usize) -> f64 { self.values[row * self.query_numbers.len() + col] }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let cols = self.query_numbers.len();
        self.values[row * cols + col] = value;
    }

    /// Scores of every document for one query, in row order.
    pub fn column(&self, col: usize) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.doc_ids.iter().enumerate().map(move |(row, id)| (id.as_str(), self.get(row, col)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Document, Query};

    fn terms(ts: &[&str]) -> Vec<String> { ts.iter().map(|t| t.to_string()).collect() }

    fn doc(id: &str, ts: &[&str]) -> Document { Document { id: id.to_string(), terms: terms(ts) } }

    fn corpus(docs: Vec<Document>) -> Corpus { docs.into_iter().collect() }

    #[test]
    fn smoothed_idf() {
        let c = corpus(vec![doc("d1", &["cat", "dog"]), doc("d2", &["dog", "dog", "fish"])]);
        let v = TfidfVectorizer::fit(&c);
        assert_eq!(v.terms(), &["cat", "dog", "fish"]);
        assert!((v.idf("dog").unwrap() - 1.0).abs() < 1e-12);
        assert!((v.idf("cat").unwrap() - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn one_letter_terms_are_vocabulary() {
        let c = corpus(vec![doc("d1", &["x", "long"]), doc("d2", &["long"])]);
        let v = TfidfVectorizer::fit(&c);
        assert_eq!(v.column("x"), Some(1));
        assert_eq!(v.vocabulary_size(), 2);
    }

    #[test]
    fn transform_is_unit_length_and_ignores_unknown_terms() {
        let c = corpus(vec![doc("d1", &["cat", "dog"]), doc("d2", &["fish"])]);
        let v = TfidfVectorizer::fit(&c);
        let row = v.transform(&terms(&["dog", "dog", "cat", "zebra"]));
        assert_eq!(row.iter().map(|(c, _)| *c).collect::<Vec<_>>(), vec![0, 1]);
        let norm: f64 = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
        assert!(v.transform(&terms(&["zebra"])).is_empty());
        assert_eq!(v.vocabulary_size(), 3);
    }

    #[test]
    fn matrix_shape_and_labels() {
        let c = corpus(vec![doc("a", &["x"]), doc("b", &["y"]), doc("c", &["x", "y"])]);
        let q = QuerySet::new(vec![Query { number: 9, terms: terms(&["x"]) }, Query { number: 4, terms: terms(&["y"]) }]);
        let sim = TfidfVectorizer::fit(&c).similarity(&c, &q);
        assert_eq!(sim.shape(), (3, 2));
        assert_eq!(sim.doc_ids(), &["a", "b", "c"]);
        assert_eq!(sim.query_numbers(), &[9, 4]);
        assert!((sim.get(0, 0) - 1.0).abs() < 1e-9);
        assert_eq!(sim.get(1, 0), 0.0);
        assert!((sim.get(1, 1) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_inputs_give_zero_matrices() {
        let c = corpus(vec![]);
        let q = QuerySet::new(vec![Query { number: 1, terms: terms(&["x"]) }]);
        let sim = TfidfVectorizer::fit(&c).similarity(&c, &q);
        assert_eq!(sim.shape(), (0, 1));

        let c = corpus(vec![doc("a", &[])]);
        let sim = TfidfVectorizer::fit(&c).similarity(&c, &q);
        assert_eq!(sim.shape(), (1, 1));
        assert_eq!(sim.get(0, 0), 0.0);
    }
}
