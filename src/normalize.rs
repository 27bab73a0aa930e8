//! Text normalization contract for template compilation.
//!
//! The catalog only depends on the input/output contract here: a normalizer
//! turns raw template text into normalized text plus the capture-group
//! definitions discovered in its tags. Matching consumers must run scanned
//! content through the same normalizer so both sides agree on spacing.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::pattern;

/// A capturing group discovered in a template tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureGroup {
    /// 1-based group number in the compiled pattern.
    pub index: usize,
    /// The raw regex fragment the template author supplied inside the tag.
    pub expression: String,
}

/// Output of one normalization run.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub text: String,
    pub capture_groups: Vec<CaptureGroup>,
}

/// Normalizes raw template text and reports the capture groups its tags
/// define. Implementations must be deterministic: the same input always
/// yields the same output, since compiled patterns are cached per template.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, raw: &str) -> Result<Normalized>;
}

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("invalid whitespace pattern"));

static GENERIC_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<<(.*?)>>").expect("invalid tag pattern"));

/// Default normalizer: collapses every whitespace run to a single space and
/// trims the ends, leaving the tag grammar untouched for the compiler.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicNormalizer;

impl Normalizer for BasicNormalizer {
    fn normalize(&self, raw: &str) -> Result<Normalized> {
        let text = WHITESPACE_RUN.replace_all(raw.trim(), " ").into_owned();

        // Reserved tags are tokenized before the scan so a reserved tag
        // nested inside a generic tag does not split the generic span. The
        // recorded expression restores the original tag spelling.
        let tokenized = pattern::tokenize_reserved_tags(&text);
        let mut capture_groups = Vec::new();
        for caps in GENERIC_TAG.captures_iter(&tokenized) {
            let Some(inner) = caps.get(1) else { continue };
            capture_groups.push(CaptureGroup {
                index: capture_groups.len() + 1,
                expression: pattern::restore_reserved_tags(inner.as_str()),
            });
        }

        Ok(Normalized {
            text,
            capture_groups,
        })
    }
}
