//! Pulls the embedded `model: { ... }` state object out of a page.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::ScraperError;

static MODEL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bmodel\s*:").expect("valid regex"));

/// Return the first balanced `{...}` object at or after `start`.
///
/// Scans byte-by-byte tracking brace depth. A `"` or `'` opens a quoted run
/// that only the same unescaped quote closes; inside a run a backslash
/// escapes the next byte and braces do not count. All structural characters
/// are ASCII, so the returned slice always falls on UTF-8 boundaries.
///
/// # Errors
///
/// - [`ScraperError::NoObjectFound`] if there is no `{` at or after `start`.
/// - [`ScraperError::UnbalancedBraces`] if the text ends before depth returns to zero.
pub fn extract_braced_object(text: &str, start: usize) -> Result<&str, ScraperError> {
    let bytes = text.as_bytes();
    let open = bytes
        .get(start..)
        .and_then(|tail| tail.iter().position(|&b| b == b'{'))
        .map(|rel| start + rel)
        .ok_or(ScraperError::NoObjectFound { offset: start })?;

    let mut depth: usize = 0;
    let mut quote: Option<u8> = None;
    let mut escape = false;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if let Some(q) = quote {
            if escape {
                escape = false;
            } else if b == b'\\' {
                escape = true;
            } else if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'"' | b'\'' => quote = Some(b),
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Ok(&text[open..=i]);
                }
            }
            _ => {}
        }
    }

    Err(ScraperError::UnbalancedBraces { start: open })
}

/// Byte offset just past the first whole-word `model` followed by optional
/// whitespace and a colon.
#[must_use]
pub fn find_model_token(html: &str) -> Option<usize> {
    MODEL_TOKEN.find(html).map(|m| m.end())
}

/// Locate, extract, and parse the embedded model object of `html`.
///
/// `url` is only used for error context.
///
/// # Errors
///
/// - [`ScraperError::ModelNotFound`] if the page has no `model:` token.
/// - Extraction errors from [`extract_braced_object`].
/// - [`ScraperError::Deserialize`] if the object is not valid JSON.
pub fn parse_model(html: &str, url: &str) -> Result<Value, ScraperError> {
    let offset = find_model_token(html).ok_or_else(|| ScraperError::ModelNotFound {
        url: url.to_string(),
    })?;
    let object = extract_braced_object(html, offset)?;
    serde_json::from_str(object).map_err(|e| ScraperError::Deserialize {
        context: format!("embedded model from {url}"),
        source: e,
    })
}
