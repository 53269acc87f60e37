use crate::error::{Error, Result};
use scraper::Html;
use std::fs;
use std::path::Path;

/// Read an HTML file and return its text content with markup removed.
pub fn extract_file(path: &Path) -> Result<String> {
    let source = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(extract_text(&source))
}

/// All text nodes of a full HTML document, concatenated in document order.
///
/// html5ever recovers from any malformed input, so this never fails; broken markup just yields
/// whatever text the tree builder kept.
pub fn extract_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    doc.root_element().text().collect::<String>()
}

/// Same as [`extract_text`] for a fragment such as the body of a query record.
pub fn extract_fragment_text(fragment: &str) -> String {
    let frag = Html::parse_fragment(fragment);
    frag.root_element().text().collect::<String>()
}
