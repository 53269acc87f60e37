use crate::error::{Error, Result};
use crate::model::QueryNumber;
use crate::vectorizer::SimilarityMatrix;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub const DEFAULT_TOP_K: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub doc_id: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRanking {
    pub query_number: QueryNumber,
    pub hits: Vec<Hit>, // descending score
}

/// Top `top_k` documents per query, ordered by ascending query number.
///
/// Documents with equal scores keep corpus row order. Zero scores are ranked like any other, so
/// every query lists `min(top_k, documents)` hits even with no vocabulary overlap.
pub fn rank(matrix: &SimilarityMatrix, top_k: usize) -> Vec<QueryRanking> {
    let (_, num_queries) = matrix.shape();
    let mut rankings: Vec<QueryRanking> = (0..num_queries)
        .map(|col| {
            let mut scored: Vec<(&str, f64)> = matrix.column(col).collect();
            scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
            scored.truncate(top_k);
            QueryRanking {
                query_number: matrix.query_numbers()[col],
                hits: scored.into_iter().map(|(id, score)| Hit { doc_id: id.to_string(), score }).collect(),
            }
        })
        .collect();
    rankings.sort_by_key(|r| r.query_number);
    rankings
}

/// Shortest round-trip decimal, always with a fractional part (`0.0`, `0.25`).
pub fn format_score(score: f64) -> String {
    let s = format!("{score}");
    if s.contains('.') || !score.is_finite() { s } else { format!("{s}.0") }
}

/// Tab-separated `query<TAB>doc<TAB>score` lines.
pub fn write_rows<W: Write>(out: &mut W, rankings: &[QueryRanking]) -> io::Result<usize> {
    let mut rows = 0;
    for ranking in rankings {
        for hit in &ranking.hits {
            writeln!(out, "{}\t{}\t{}", ranking.query_number, hit.doc_id, format_score(hit.score))?;
            rows += 1;
        }
    }
    Ok(rows)
}

pub fn render(rankings: &[QueryRanking]) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_rows(&mut buf, rankings);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Write all rankings to `path`, replacing any existing file. The rows go to a temporary file
/// next to the target first, so the destination is never left half-written.
pub fn write_rankings(path: &Path, rankings: &[QueryRanking]) -> Result<usize> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    let rows = {
        let mut out = BufWriter::new(tmp.as_file_mut());
        let rows = write_rows(&mut out, rankings).map_err(|e| Error::io(path, e))?;
        out.flush().map_err(|e| Error::io(path, e))?;
        rows
    };
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;
    tracing::info!(path = %path.display(), rows, "wrote rankings");
    Ok(rows)
}
