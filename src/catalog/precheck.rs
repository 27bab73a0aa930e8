//! Precheck records: literal substrings that gate expensive matching.
//!
//! A precheck record holds the ordered "static blocks" of one template
//! file. A matching consumer checks cheap containment of every block in the
//! candidate text before invoking the compiled pattern for that template.
//! Records are keyed by template file path rather than catalog key because
//! one license may own several independently gated primary templates. The
//! gating decision itself belongs to the consumer; a path with no record
//! means the template is always worth attempting.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Ordered set of literal substrings that must all appear in candidate
/// text before the gated template's compiled pattern is worth attempting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreCheckRecord {
    #[serde(rename = "StaticBlocks")]
    pub static_blocks: Vec<String>,
}

impl PreCheckRecord {
    /// True when every static block is contained in `text`.
    pub fn satisfied_by(&self, text: &str) -> bool {
        self.static_blocks
            .iter()
            .all(|block| text.contains(block.as_str()))
    }
}

/// Precheck records keyed by originating template file path.
pub type PreCheckMap = HashMap<PathBuf, PreCheckRecord>;

/// Parse a precheck payload. A malformed payload is a fatal build error.
pub(crate) fn parse_precheck(contents: &str, path: &Path) -> Result<PreCheckRecord, CatalogError> {
    serde_json::from_str(contents).map_err(|err| CatalogError::MalformedPayload {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })
}
