//! License catalog: an ID-keyed library of license and exception
//! definitions built from two provenance trees.
//!
//! A [`LicenseLibrary`] is constructed once per scanning session. The build
//! is single-threaded and write-heavy: the standardized pass ingests the
//! official license/exception list, then the custom pass overlays local
//! definitions with deterministic merge rules. Once built, the catalog is
//! read-mostly; templates compile their matching pattern lazily on first
//! use and keep it until the library is discarded.

pub mod listing;
pub mod models;
pub mod pattern;
pub mod precheck;

mod builder;

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;

use crate::error::CatalogError;
use crate::normalize::Normalizer;
use crate::resources::ResourceProvider;

pub use builder::{
    ACCEPTABLE_PATTERNS_DIR, ASSOCIATED_PREFIX, LICENSE_INFO_JSON, OPTIONAL_PREFIX,
    PRECHECKS_PREFIX, PRIMARY_PREFIX,
};
pub use listing::{CatalogListing, ExceptionSummary, LicenseSummary};
pub use models::{License, LicenseInfo, LicenseText, PatternSource, StandardList};
pub use pattern::{CompiledPattern, PrimaryPattern};
pub use precheck::{PreCheckMap, PreCheckRecord};

/// The aggregate, ID-keyed catalog of license definitions, precheck
/// records, and license-agnostic acceptable patterns.
pub struct LicenseLibrary {
    /// Version string of the standardized list the catalog was built from.
    pub spdx_list_version: String,
    /// At most one entry per catalog key; a key is never removed once added.
    pub licenses: HashMap<String, License>,
    /// Precheck records keyed by originating template file path.
    pub prechecks: PreCheckMap,
    /// Eagerly compiled acceptable patterns in a flat identifier namespace.
    pub acceptable_patterns: HashMap<String, Regex>,
    resources: Arc<dyn ResourceProvider>,
    normalizer: Arc<dyn Normalizer>,
}

impl LicenseLibrary {
    pub fn new(resources: Arc<dyn ResourceProvider>, normalizer: Arc<dyn Normalizer>) -> Self {
        Self {
            spdx_list_version: String::new(),
            licenses: HashMap::new(),
            prechecks: PreCheckMap::new(),
            acceptable_patterns: HashMap::new(),
            resources,
            normalizer,
        }
    }

    /// Build the whole catalog: the standardized pass, then the custom pass.
    /// Any error aborts construction; the caller must treat that as fatal
    /// for the scanning session.
    pub fn add_all(&mut self) -> Result<(), CatalogError> {
        self.add_standard()?;
        self.add_custom()
    }

    /// The normalizer templates are compiled against. Matching consumers
    /// must run candidate text through the same normalizer.
    pub fn normalizer(&self) -> &dyn Normalizer {
        self.normalizer.as_ref()
    }
}
