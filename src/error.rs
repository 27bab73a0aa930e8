//! Error types for catalog construction and template compilation.
//!
//! Build-time failures abort the whole catalog build and carry the path of
//! the offending resource. A compile failure discovered lazily during first
//! use is scoped to a single template: it is cached on that template and
//! never retried, and the rest of the catalog stays usable.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// A fatal (or, for `ResourceNotFound` in the standardized pass, tolerated)
/// failure while building the license catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A resource lookup found nothing. Tolerated only for standardized
    /// template and precheck lookups; fatal everywhere else.
    #[error("resource not found: {}", path.display())]
    ResourceNotFound { path: PathBuf },

    /// A payload failed to parse.
    #[error("malformed payload in {}: {detail}", path.display())]
    MalformedPayload { path: PathBuf, detail: String },

    /// Two acceptable-pattern sources share the same identifier.
    #[error("an acceptable pattern already exists with the id {id}")]
    DuplicatePatternIdentifier { id: String },

    /// An acceptable-pattern source is not a valid regular expression.
    #[error("invalid acceptable pattern {id} from {}: {detail}", path.display())]
    InvalidPattern {
        id: String,
        path: PathBuf,
        detail: String,
    },

    /// A custom payload without standardized status was attached to a key
    /// already established as standardized.
    #[error("cannot add non-standard custom policies from {id} to existing standard license {spdx_id}")]
    ProvenanceConsistencyViolation { id: String, spdx_id: String },

    /// An I/O failure other than not-found.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    /// Classify an I/O error for `path`, mapping not-found onto the
    /// dedicated variant the builder can tolerate.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::ResourceNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. })
    }
}

/// Failure while compiling one template into its matching pattern.
///
/// Cloneable so every caller of a template's compile entry point observes
/// the same cached outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot compile template {}: {detail}", path.display())]
pub struct CompileError {
    pub path: PathBuf,
    pub detail: String,
}

impl CompileError {
    pub fn new(path: &Path, detail: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_not_found_io_maps_to_resource_not_found() {
        let err = CatalogError::from_io(
            Path::new("spdx/template/MIT.template.txt"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.is_not_found());
        assert!(err.to_string().contains("MIT.template.txt"));
    }

    #[test]
    fn test_other_io_stays_io() {
        let err = CatalogError::from_io(
            Path::new("custom/x"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_not_found());
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
