//! Template-tag pattern compiler.
//!
//! License templates are boilerplate text with a small tag grammar:
//! `<<omitable>> ... <</omitable>>` marks a span whose presence in scanned
//! text is optional, `<<copyright>>` marks an unconstrained wildcard run
//! (typically a holder name and year), and any other `<<...>>` span is an
//! inline regex fragment supplied by the template author which becomes a
//! capturing group. Everything outside tags is matched literally.
//!
//! Compilation is expensive relative to a containment precheck, so each
//! template compiles at most once: the first caller performs the work and
//! the outcome, success or failure, is cached for the life of the catalog.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};
use regex::{Regex, RegexBuilder};

use crate::error::CompileError;
use crate::normalize::{CaptureGroup, Normalizer};

const OMITABLE_OPEN_TAG: &str = "<<omitable>>";
const OMITABLE_CLOSE_TAG: &str = "<</omitable>>";
const COPYRIGHT_TAG: &str = "<<copyright>>";

// Internal placeholder tokens. Underscores survive regex escaping, so the
// tokens pass untouched through the literal-segment escape and are swapped
// for their final regex forms at the end.
const OMITABLE_OPEN_TOKEN: &str = "__BEGIN_OMITABLE__";
const OMITABLE_CLOSE_TOKEN: &str = "__END_OMITABLE__";
const COPYRIGHT_TOKEN: &str = "__COPYRIGHT_ANY__";

static TAG_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" *<<(.*?)>> *").expect("invalid tag segment pattern"));

/// Replace the three reserved tag forms with placeholder tokens. Reserved
/// tags are tokenized before any generic-tag scanning so a reserved tag
/// nested inside a generic tag cannot confuse the scan.
pub(crate) fn tokenize_reserved_tags(text: &str) -> String {
    text.replace(OMITABLE_OPEN_TAG, OMITABLE_OPEN_TOKEN)
        .replace(OMITABLE_CLOSE_TAG, OMITABLE_CLOSE_TOKEN)
        .replace(COPYRIGHT_TAG, COPYRIGHT_TOKEN)
}

/// Swap placeholder tokens back to their tag spellings.
pub(crate) fn restore_reserved_tags(text: &str) -> String {
    text.replace(OMITABLE_OPEN_TOKEN, OMITABLE_OPEN_TAG)
        .replace(OMITABLE_CLOSE_TOKEN, OMITABLE_CLOSE_TAG)
        .replace(COPYRIGHT_TOKEN, COPYRIGHT_TAG)
}

/// Outcome of compiling one template: the anchors-tolerant pattern plus the
/// capture groups its tags define.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub regex: Regex,
    pub capture_groups: Vec<CaptureGroup>,
}

/// Build the matching pattern for normalized template text.
///
/// Literal text is escaped and matched verbatim; a generic `<<...>>` span
/// becomes ` *(?:(fragment) *)` with the fragment kept as regex syntax; the
/// omitable tags become a non-capturing optional group tolerating
/// surrounding space; the copyright tag becomes an unconstrained run. The
/// final pattern is case-insensitive and lets `.` cross line boundaries.
pub fn regex_from_normalized(normalized: &str) -> Result<Regex, String> {
    // Eat one optional space adjacent to each tag delimiter.
    let text = normalized.replace(" <<", "<<").replace(">> ", ">>");
    let text = tokenize_reserved_tags(&text);

    let mut pattern = String::with_capacity(text.len() + 16);
    let mut fragments = Vec::new();
    let mut prev = 0;
    for caps in TAG_SEGMENT.captures_iter(&text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > prev {
            pattern.push_str(&regex::escape(&text[prev..whole.start()]));
        }
        pattern.push_str(" *(?:(");
        pattern.push_str(inner.as_str());
        pattern.push_str(") *)");
        fragments.push(inner.as_str().to_string());
        prev = whole.end();
    }
    if prev < text.len() {
        pattern.push_str(&regex::escape(&text[prev..]));
    }

    let pattern = pattern
        .replace(OMITABLE_OPEN_TOKEN, " *(?:")
        .replace(OMITABLE_CLOSE_TOKEN, " *)?")
        .replace(COPYRIGHT_TOKEN, ".*");

    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|err| describe_compile_failure(&fragments, err))
}

/// Name the offending inline fragment when one of them is the reason the
/// assembled pattern does not compile.
fn describe_compile_failure(fragments: &[String], err: regex::Error) -> String {
    for fragment in fragments {
        if Regex::new(fragment).is_err() {
            return format!("invalid fragment <<{fragment}>>: {err}");
        }
    }
    err.to_string()
}

/// A primary or associated license template whose compiled pattern is
/// computed on first use and cached, success or failure, forever after.
#[derive(Debug)]
pub struct PrimaryPattern {
    /// Raw template text as read from its source file.
    pub text: String,
    /// Originating template file path.
    pub path: PathBuf,
    compiled: OnceCell<Result<CompiledPattern, CompileError>>,
}

impl PrimaryPattern {
    pub fn new(text: impl Into<String>, path: impl Into<PathBuf>) -> Arc<Self> {
        Arc::new(Self {
            text: text.into(),
            path: path.into(),
            compiled: OnceCell::new(),
        })
    }

    /// Normalize and compile this template, at most once per instance.
    ///
    /// Concurrent first callers block until a single compilation attempt
    /// completes; every caller, including ones arriving later, observes the
    /// same cached outcome. Failures are terminal for this template and are
    /// never retried.
    pub fn compiled(
        &self,
        normalizer: &dyn Normalizer,
    ) -> Result<&CompiledPattern, CompileError> {
        self.compiled
            .get_or_init(|| self.compile(normalizer))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// True once a compilation attempt has happened, regardless of outcome.
    pub fn is_compiled(&self) -> bool {
        self.compiled.get().is_some()
    }

    fn compile(&self, normalizer: &dyn Normalizer) -> Result<CompiledPattern, CompileError> {
        let normalized = normalizer
            .normalize(&self.text)
            .map_err(|err| CompileError::new(&self.path, err.to_string()))?;
        let regex = regex_from_normalized(&normalized.text)
            .map_err(|detail| CompileError::new(&self.path, detail))?;
        Ok(CompiledPattern {
            regex,
            capture_groups: normalized.capture_groups,
        })
    }
}
