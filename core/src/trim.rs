use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;

/// Control code that prefixes the trailing stamp in the reference corpus, e.g.
/// `CA581203 JB March 22, 1978  8:28 PM`.
pub const DEFAULT_TAIL_CODE: &str = "CA";

lazy_static! {
    static ref DEFAULT_TRIMMER: TailTrimmer = TailTrimmer::default();
}

/// Cuts a document at the first `<code><3+ digits>` marker, dropping the metadata footer after it.
#[derive(Debug, Clone)]
pub struct TailTrimmer {
    pattern: Regex,
}

impl TailTrimmer {
    /// `code` must be exactly two ASCII letters.
    pub fn new(code: &str) -> Result<Self> {
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(Error::Config(format!("tail code must be two ASCII letters, got {code:?}")));
        }
        let pattern = Regex::new(&format!(r"{}\d{{3,}}", regex::escape(code)))
            .map_err(|e| Error::Config(e.to_string()))?;
        Ok(Self { pattern })
    }

    /// Text before the first marker, or the whole text when there is none.
    pub fn trim<'a>(&self, text: &'a str) -> &'a str {
        match self.pattern.find(text) {
            Some(m) => &text[..m.start()],
            None => text,
        }
    }
}

impl Default for TailTrimmer {
    fn default() -> Self {
        Self { pattern: Regex::new(r"CA\d{3,}").expect("valid regex") }
    }
}

/// Trim with the default `CA` marker.
pub fn trim_tail(text: &str) -> &str { DEFAULT_TRIMMER.trim(text) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuts_before_marker() {
        let text = "The budget passed.\nCA581203 JB March 22, 1978  8:28 PM";
        assert_eq!(trim_tail(text), "The budget passed.\n");
    }

    #[test]
    fn needs_three_digits() {
        assert_eq!(trim_tail("see CA12 only"), "see CA12 only");
        assert_eq!(trim_tail("see CA123"), "see ");
    }

    #[test]
    fn first_occurrence_wins() {
        assert_eq!(trim_tail("a CA1000 b CA2000 c"), "a ");
    }

    #[test]
    fn idempotent() {
        for text in ["x CA999 y", "nothing here", "CA1234", ""] {
            let once = trim_tail(text);
            assert_eq!(trim_tail(once), once);
        }
    }

    #[test]
    fn custom_code() {
        let t = TailTrimmer::new("JB").unwrap();
        assert_eq!(t.trim("body JB4411 tail"), "body ");
        assert_eq!(t.trim("body CA4411 tail"), "body CA4411 tail");
    }

    #[test]
    fn rejects_bad_codes() {
        assert!(matches!(TailTrimmer::new("C"), Err(Error::Config(_))));
        assert!(matches!(TailTrimmer::new("C1"), Err(Error::Config(_))));
        assert!(matches!(TailTrimmer::new("ABC"), Err(Error::Config(_))));
    }
}
