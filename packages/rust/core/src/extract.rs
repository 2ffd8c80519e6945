//! Decoding of raw extractor output.
//!
//! Models tend to wrap their JSON in Markdown code fences. The fences are
//! stripped before parsing; anything else is left to the canonicalizer.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use questform_shared::{QuestformError, Result};

/// Maximum number of characters of the offending text quoted in errors.
const EXCERPT_CHARS: usize = 500;

/// Opening fences with a language hint (```` ```json ````).
static JSON_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\n?").expect("json fence regex"));

/// Any remaining bare fence.
static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```\n?").expect("fence regex"));

/// Remove Markdown code fences and surrounding whitespace.
pub fn strip_code_fences(text: &str) -> String {
    let without_lang = JSON_FENCE_RE.replace_all(text, "");
    FENCE_RE.replace_all(&without_lang, "").trim().to_string()
}

/// Parse model output (optionally fenced) into a JSON value.
pub fn parse_model_output(text: &str) -> Result<Value> {
    let cleaned = strip_code_fences(text);
    if cleaned.is_empty() {
        return Err(QuestformError::parse("model output is empty"));
    }

    serde_json::from_str(&cleaned)
        .inspect(|_| debug!(len = cleaned.len(), "model output decoded"))
        .map_err(|e| {
            let excerpt: String = cleaned.chars().take(EXCERPT_CHARS).collect();
            QuestformError::parse(format!("model output is not valid JSON: {e}; got: {excerpt}"))
        })
}
