//! Core data structures for the license catalog.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::pattern::PrimaryPattern;

/// Catalog entry for one license or exception.
///
/// Primary patterns carry the principal template text whose match
/// establishes license identity; associated patterns may accompany or
/// substitute for a primary pattern but are not sufficient alone. Sources
/// are kept 1:1 alongside each template for audit and debugging.
#[derive(Debug, Clone, Default)]
pub struct License {
    /// SPDX license ID if applicable, for example "Apache-2.0". Empty for
    /// custom-only entries, which fall back to their display name.
    pub spdx_license_id: String,
    pub info: LicenseInfo,
    pub primary_patterns: Vec<Arc<PrimaryPattern>>,
    pub primary_sources: Vec<PatternSource>,
    pub associated_patterns: Vec<Arc<PrimaryPattern>>,
    pub associated_sources: Vec<PatternSource>,
    /// Lower-cased alias strings usable like primary patterns (unless
    /// disabled). Plain strings, not regex; consumers must enforce word
    /// boundaries.
    pub aliases: Vec<String>,
    /// Lower-cased, scheme-stripped URLs usable like primary patterns
    /// (unless disabled).
    pub urls: Vec<String>,
    /// License text or an expression.
    pub text: LicenseText,
}

impl License {
    /// The catalog identity of this entry: the SPDX ID when present,
    /// otherwise the declared display name. Never empty once the entry has
    /// been added to a library.
    pub fn id(&self) -> &str {
        if self.spdx_license_id.is_empty() {
            &self.info.name
        } else {
            &self.spdx_license_id
        }
    }

    pub(crate) fn push_primary(&mut self, text: String, path: PathBuf) {
        self.primary_sources.push(PatternSource {
            text: text.clone(),
            path: path.clone(),
        });
        self.primary_patterns.push(PrimaryPattern::new(text, path));
    }

    pub(crate) fn push_associated(&mut self, text: String, path: PathBuf) {
        self.associated_sources.push(PatternSource {
            text: text.clone(),
            path: path.clone(),
        });
        self.associated_patterns
            .push(PrimaryPattern::new(text, path));
    }
}

/// Raw template text and its originating path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSource {
    pub text: String,
    pub path: PathBuf,
}

/// License text content with its content type and encoding, for example
/// `text/plain` and `base64`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseText {
    pub content_type: String,
    pub encoding: String,
    pub content: String,
}

/// Declared metadata for a catalog entry, as carried by the custom
/// `license_info.json` payload and filled in from the standardized list.
///
/// `aliases`, `urls` and `eligible_licenses` accept either a single string
/// or a list of strings on the wire; the model only ever holds a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseInfo {
    pub name: String,
    pub family: String,
    pub is_standard: bool,
    pub is_exception: bool,
    pub osi_approved: bool,
    pub ignore_id_match: bool,
    pub ignore_name_match: bool,
    #[serde(deserialize_with = "string_or_list")]
    pub aliases: Vec<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub urls: Vec<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub eligible_licenses: Vec<String>,
    pub is_mutator: bool,
    pub is_deprecated: bool,
    pub is_fsf_libre: bool,
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<StringOrList>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(StringOrList::One(s)) => vec![s],
        Some(StringOrList::Many(list)) => list,
    })
}

/// One license entry of the standardized list document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StandardLicenseEntry {
    pub name: String,
    #[serde(rename = "licenseId")]
    pub license_id: String,
    #[serde(rename = "isOsiApproved")]
    pub is_osi_approved: bool,
    #[serde(rename = "isFsfLibre")]
    pub is_fsf_libre: bool,
    #[serde(rename = "isDeprecatedLicenseId")]
    pub is_deprecated: bool,
}

/// One exception entry of the standardized list document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StandardExceptionEntry {
    pub name: String,
    #[serde(rename = "licenseExceptionId")]
    pub exception_id: String,
    #[serde(rename = "isDeprecatedLicenseId")]
    pub is_deprecated: bool,
}

/// The standardized license/exception list document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StandardList {
    #[serde(rename = "licenseListVersion")]
    pub license_list_version: String,
    pub licenses: Vec<StandardLicenseEntry>,
    pub exceptions: Vec<StandardExceptionEntry>,
}
