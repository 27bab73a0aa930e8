//! Two-pass catalog construction.
//!
//! The standardized pass walks the official license and exception lists and
//! pulls in each entry's template and optional precheck. The custom pass
//! then loads the flat acceptable-pattern directory and the per-license
//! override directories, merging with whatever the standardized pass
//! already established. Both passes run single-threaded to completion
//! before the catalog is shared.

use std::path::Path;

use log::{debug, error, info};
use regex::RegexBuilder;

use crate::catalog::models::{License, LicenseInfo, StandardList};
use crate::catalog::precheck;
use crate::catalog::LicenseLibrary;
use crate::error::CatalogError;

/// The one metadata payload file of a per-license custom directory.
pub const LICENSE_INFO_JSON: &str = "license_info.json";
/// Filename prefix for precheck payloads gating a primary template.
pub const PRECHECKS_PREFIX: &str = "prechecks_";
/// Filename prefix for primary pattern templates.
pub const PRIMARY_PREFIX: &str = "license_";
/// Filename prefixes for associated/optional secondary templates.
pub const ASSOCIATED_PREFIX: &str = "associated_";
pub const OPTIONAL_PREFIX: &str = "optional_";
/// Flat custom directory holding license-agnostic acceptable patterns.
pub const ACCEPTABLE_PATTERNS_DIR: &str = "acceptable_patterns";

const TEMPLATE_EXT: &str = ".txt";

impl LicenseLibrary {
    /// Ingest the standardized license and exception lists. A listed entry
    /// whose template resource is missing is skipped with a diagnostic;
    /// every other failure aborts the build.
    pub fn add_standard(&mut self) -> Result<(), CatalogError> {
        let (license_doc, exception_doc) = self.resources.standard_lists()?;
        let license_list = parse_standard_list(&license_doc, "licenses.json")?;
        let exception_list = parse_standard_list(&exception_doc, "exceptions.json")?;

        self.spdx_list_version = license_list.license_list_version.clone();

        for entry in license_list.licenses {
            let Some((text, path)) =
                self.standard_template_or_skip(&entry.license_id, entry.is_deprecated)?
            else {
                continue;
            };
            let license = self.licenses.entry(entry.license_id.clone()).or_default();
            license.push_primary(text, path.clone());
            license.spdx_license_id = entry.license_id.clone();
            license.info.name = entry.name;
            license.info.is_standard = true;
            license.info.is_exception = false;
            license.info.is_deprecated = entry.is_deprecated;
            license.info.osi_approved = entry.is_osi_approved;
            license.info.is_fsf_libre = entry.is_fsf_libre;
            self.add_standard_precheck(&entry.license_id, entry.is_deprecated, &path)?;
        }

        for entry in exception_list.exceptions {
            let Some((text, path)) =
                self.standard_template_or_skip(&entry.exception_id, entry.is_deprecated)?
            else {
                continue;
            };
            let license = self.licenses.entry(entry.exception_id.clone()).or_default();
            license.push_primary(text, path.clone());
            license.spdx_license_id = entry.exception_id.clone();
            license.info.name = entry.name;
            license.info.is_standard = true;
            license.info.is_exception = true;
            license.info.is_deprecated = entry.is_deprecated;
            self.add_standard_precheck(&entry.exception_id, entry.is_deprecated, &path)?;
        }
        Ok(())
    }

    /// Ingest the custom tree: acceptable patterns first, then the
    /// per-license override directories.
    pub fn add_custom(&mut self) -> Result<(), CatalogError> {
        self.add_acceptable_patterns()?;
        debug!(
            "loaded {} acceptable patterns",
            self.acceptable_patterns.len()
        );

        for id in self.resources.custom_license_ids()? {
            if let Err(err) = self.add_custom_license(&id) {
                error!("failed to add custom license {id}: {err}");
                return Err(err);
            }
        }
        debug!("loaded {} licenses", self.licenses.len());
        Ok(())
    }

    fn standard_template_or_skip(
        &self,
        id: &str,
        deprecated: bool,
    ) -> Result<Option<(String, std::path::PathBuf)>, CatalogError> {
        match self.resources.standard_template(id, deprecated) {
            Ok(found) => Ok(Some(found)),
            Err(err) if err.is_not_found() => {
                debug!("skipping missing standard template for '{id}'");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn add_standard_precheck(
        &mut self,
        id: &str,
        deprecated: bool,
        template_path: &Path,
    ) -> Result<(), CatalogError> {
        let (contents, path) = match self.resources.standard_precheck(id, deprecated) {
            Ok(found) => found,
            Err(err) if err.is_not_found() => {
                debug!("no precheck for standard entry '{id}'");
                return Ok(());
            }
            Err(err) => return Err(err),
        };
        let record = precheck::parse_precheck(&contents, &path)?;
        self.prechecks.insert(template_path.to_path_buf(), record);
        Ok(())
    }

    fn add_acceptable_patterns(&mut self) -> Result<(), CatalogError> {
        for path in self.resources.custom_files(ACCEPTABLE_PATTERNS_DIR)? {
            let Some(id) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_string)
            else {
                continue;
            };
            let source = self.resources.read_file(&path)?;
            if let Err(err) = self.add_acceptable_pattern(&id, &source, &path) {
                error!("invalid pattern from {}: {err}", path.display());
                return Err(err);
            }
        }
        Ok(())
    }

    /// Register one license-agnostic acceptable pattern. The source is
    /// compiled immediately and case-insensitively; a duplicate identifier
    /// is a fatal build error.
    pub fn add_acceptable_pattern(
        &mut self,
        id: &str,
        source: &str,
        path: &Path,
    ) -> Result<(), CatalogError> {
        if self.acceptable_patterns.contains_key(id) {
            return Err(CatalogError::DuplicatePatternIdentifier { id: id.to_string() });
        }
        let regex = RegexBuilder::new(source.trim())
            .case_insensitive(true)
            .build()
            .map_err(|err| CatalogError::InvalidPattern {
                id: id.to_string(),
                path: path.to_path_buf(),
                detail: err.to_string(),
            })?;
        self.acceptable_patterns.insert(id.to_string(), regex);
        Ok(())
    }

    /// Load one per-license custom directory, recognizing files by the
    /// documented naming conventions. Unrecognized filenames are logged and
    /// skipped; malformed payloads and unreadable files abort the build.
    pub fn add_custom_license(&mut self, id: &str) -> Result<(), CatalogError> {
        let files = self.resources.custom_license_files(id)?;
        let existed = self.licenses.contains_key(id);
        self.licenses.entry(id.to_string()).or_default();

        for path in files {
            let Some(file_name) = path
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string)
            else {
                continue;
            };
            let lower = file_name.to_lowercase();

            if lower == LICENSE_INFO_JSON {
                let contents = self.resources.read_file(&path)?;
                let payload = parse_license_info(&contents, &path)?;
                let license = self.licenses.entry(id.to_string()).or_default();
                apply_metadata_payload(license, payload, id, existed)?;
            } else if lower.starts_with(PRIMARY_PREFIX) {
                let contents = self.resources.read_file(&path)?;
                self.licenses
                    .entry(id.to_string())
                    .or_default()
                    .push_primary(contents, path.clone());
            } else if lower.starts_with(PRECHECKS_PREFIX) {
                let contents = self.resources.read_file(&path)?;
                let record = precheck::parse_precheck(&contents, &path)?;
                let gated = path.with_file_name(gated_template_name(&file_name));
                self.prechecks.insert(gated, record);
            } else if lower.starts_with(ASSOCIATED_PREFIX) || lower.starts_with(OPTIONAL_PREFIX) {
                let contents = self.resources.read_file(&path)?;
                self.licenses
                    .entry(id.to_string())
                    .or_default()
                    .push_associated(contents, path.clone());
            } else {
                info!("found an invalid file name {}", path.display());
            }
        }
        Ok(())
    }
}

fn parse_standard_list(contents: &str, label: &str) -> Result<StandardList, CatalogError> {
    serde_json::from_str(contents).map_err(|err| CatalogError::MalformedPayload {
        path: label.into(),
        detail: err.to_string(),
    })
}

fn parse_license_info(contents: &str, path: &Path) -> Result<LicenseInfo, CatalogError> {
    serde_json::from_str(contents).map_err(|err| CatalogError::MalformedPayload {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })
}

/// `prechecks_license_foo.json` gates `license_foo.txt` in the same
/// directory: strip the prefix and substitute the payload extension with
/// the template's plain-text extension.
fn gated_template_name(precheck_name: &str) -> String {
    let stripped = precheck_name
        .strip_prefix(PRECHECKS_PREFIX)
        .unwrap_or(precheck_name);
    let stem = stripped
        .rsplit_once('.')
        .map_or(stripped, |(stem, _)| stem);
    format!("{stem}{TEMPLATE_EXT}")
}

/// Apply a custom metadata payload to an entry, deriving aliases and URLs
/// and merging with any attributes the standardized pass established.
fn apply_metadata_payload(
    license: &mut License,
    mut payload: LicenseInfo,
    id: &str,
    existed: bool,
) -> Result<(), CatalogError> {
    if license.spdx_license_id.is_empty() {
        if payload.is_standard {
            license.spdx_license_id = id.to_string();
        }
    } else if !payload.is_standard {
        return Err(CatalogError::ProvenanceConsistencyViolation {
            id: id.to_string(),
            spdx_id: license.spdx_license_id.clone(),
        });
    }

    // Aliases are matched against normalized data, so fold them to lower
    // case here. Word boundaries are the matching consumer's job. The
    // entry's own key and display name count as aliases unless suppressed.
    let mut aliases: Vec<String> = payload
        .aliases
        .iter()
        .map(|alias| alias.to_lowercase())
        .collect();
    if !payload.ignore_id_match {
        aliases.push(id.to_lowercase());
    }
    if !payload.ignore_name_match && !payload.name.is_empty() {
        aliases.push(payload.name.to_lowercase());
    }
    license.aliases = aliases;

    // URL matching is scheme- and case-agnostic.
    license.urls = payload
        .urls
        .iter()
        .map(|url| {
            url.split_once("://")
                .map_or(url.as_str(), |(_, rest)| rest)
                .to_lowercase()
        })
        .collect();

    if existed {
        // Merge with the attributes already on the entry: the first
        // non-empty name wins, and a true boolean classifier is never
        // downgraded.
        if !license.info.name.is_empty() {
            payload.name = license.info.name.clone();
        }
        payload.is_standard |= license.info.is_standard;
        payload.is_exception |= license.info.is_exception;
        payload.is_deprecated |= license.info.is_deprecated;
        payload.osi_approved |= license.info.osi_approved;
        payload.is_fsf_libre |= license.info.is_fsf_libre;
    }
    license.info = payload;
    Ok(())
}
