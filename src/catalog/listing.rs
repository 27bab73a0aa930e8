//! Deterministic, sorted summary view over a finished catalog.

use serde::Serialize;

use crate::catalog::LicenseLibrary;

/// Summary record for one license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LicenseSummary {
    pub id: String,
    pub name: String,
    pub family: String,
    pub num_templates: usize,
    pub is_osi_approved: bool,
    pub is_fsf_libre: bool,
}

/// Summary record for one license exception.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExceptionSummary {
    pub id: String,
    pub name: String,
    pub family: String,
    pub num_templates: usize,
}

/// The catalog split into four disjoint, ID-sorted buckets, plus the
/// version string of the standardized list it was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogListing {
    pub spdx_list_version: String,
    pub licenses: Vec<LicenseSummary>,
    pub deprecated_licenses: Vec<LicenseSummary>,
    pub exceptions: Vec<ExceptionSummary>,
    pub deprecated_exceptions: Vec<ExceptionSummary>,
}

impl LicenseLibrary {
    /// Snapshot the catalog. Sorting by the raw catalog key keeps repeated
    /// calls byte-stable across runs for identical input state.
    pub fn listing(&self) -> CatalogListing {
        let mut keys: Vec<&String> = self.licenses.keys().collect();
        keys.sort();

        let mut listing = CatalogListing {
            spdx_list_version: self.spdx_list_version.clone(),
            ..Default::default()
        };

        for key in keys {
            let license = &self.licenses[key];
            if license.info.is_exception {
                let summary = ExceptionSummary {
                    id: license.id().to_string(),
                    name: license.info.name.clone(),
                    family: license.info.family.clone(),
                    num_templates: license.primary_patterns.len(),
                };
                if license.info.is_deprecated {
                    listing.deprecated_exceptions.push(summary);
                } else {
                    listing.exceptions.push(summary);
                }
            } else {
                let summary = LicenseSummary {
                    id: license.id().to_string(),
                    name: license.info.name.clone(),
                    family: license.info.family.clone(),
                    num_templates: license.primary_patterns.len(),
                    is_osi_approved: license.info.osi_approved,
                    is_fsf_libre: license.info.is_fsf_libre,
                };
                if license.info.is_deprecated {
                    listing.deprecated_licenses.push(summary);
                } else {
                    listing.licenses.push(summary);
                }
            }
        }
        listing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::{License, LicenseInfo};
    use crate::normalize::BasicNormalizer;
    use crate::resources::FsResources;
    use std::sync::Arc;

    fn entry(id: &str, exception: bool, deprecated: bool) -> License {
        License {
            spdx_license_id: id.to_string(),
            info: LicenseInfo {
                name: format!("{id} name"),
                is_standard: true,
                is_exception: exception,
                is_deprecated: deprecated,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn populated_library() -> LicenseLibrary {
        let mut library = LicenseLibrary::new(
            Arc::new(FsResources::new("unused")),
            Arc::new(BasicNormalizer),
        );
        library.spdx_list_version = "3.23".to_string();
        for (id, exception, deprecated) in [
            ("Zlib", false, false),
            ("Apache-2.0", false, false),
            ("Old-1.0", false, true),
            ("Classpath-exception-2.0", true, false),
            ("Nokia-Qt-exception-1.1", true, true),
        ] {
            library
                .licenses
                .insert(id.to_string(), entry(id, exception, deprecated));
        }
        library
    }

    #[test]
    fn test_listing_partitions_into_four_buckets() {
        let listing = populated_library().listing();

        assert_eq!(listing.spdx_list_version, "3.23");
        let license_ids: Vec<_> = listing.licenses.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(license_ids, vec!["Apache-2.0", "Zlib"]);
        assert_eq!(listing.deprecated_licenses[0].id, "Old-1.0");
        assert_eq!(listing.exceptions[0].id, "Classpath-exception-2.0");
        assert_eq!(
            listing.deprecated_exceptions[0].id,
            "Nokia-Qt-exception-1.1"
        );
    }

    #[test]
    fn test_listing_is_deterministic() {
        let library = populated_library();
        assert_eq!(library.listing(), library.listing());
    }

    #[test]
    fn test_listing_id_falls_back_to_name() {
        let mut library = populated_library();
        library.licenses.insert(
            "House".to_string(),
            License {
                info: LicenseInfo {
                    name: "House Rules".to_string(),
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        let listing = library.listing();
        assert!(listing.licenses.iter().any(|l| l.id == "House Rules"));
    }
}
