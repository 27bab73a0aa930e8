//! Resource access for catalog construction.
//!
//! The builder never touches the filesystem directly; it goes through a
//! [`ResourceProvider`], which supplies the standardized list documents,
//! per-ID template and precheck files, and the custom directory trees.
//! Reads are synchronous and blocking; templates are small and bounded.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::CatalogError;

/// Supplies raw text for the standardized license/exception list, per-ID
/// template and precheck files, and the custom license directory trees.
///
/// Directory enumeration must be name-sorted so builds are deterministic,
/// and a missing directory enumerates as empty. A missing *file* surfaces
/// as [`CatalogError::ResourceNotFound`], which the builder tolerates only
/// for standardized template and precheck lookups.
pub trait ResourceProvider: Send + Sync {
    /// The standardized license list and exception list documents.
    fn standard_lists(&self) -> Result<(String, String), CatalogError>;

    /// Template text for a standardized entry, with its originating path.
    fn standard_template(
        &self,
        id: &str,
        deprecated: bool,
    ) -> Result<(String, PathBuf), CatalogError>;

    /// Precheck payload for a standardized entry, with its originating path.
    fn standard_precheck(
        &self,
        id: &str,
        deprecated: bool,
    ) -> Result<(String, PathBuf), CatalogError>;

    /// Name-sorted files directly under the named flat custom directory.
    fn custom_files(&self, dir: &str) -> Result<Vec<PathBuf>, CatalogError>;

    /// Name-sorted per-license directory names under the custom pattern root.
    fn custom_license_ids(&self) -> Result<Vec<String>, CatalogError>;

    /// Name-sorted files in the per-license directory for `id`.
    fn custom_license_files(&self, id: &str) -> Result<Vec<PathBuf>, CatalogError>;

    /// Contents of one custom file.
    fn read_file(&self, path: &Path) -> Result<String, CatalogError>;
}

/// Filesystem-backed resources.
///
/// Expected layout under the root:
///
/// ```text
/// spdx/json/licenses.json
/// spdx/json/exceptions.json
/// spdx/template/<id>.template.txt       deprecated: deprecated_<id>.template.txt
/// spdx/precheck/<id>.json               deprecated: deprecated_<id>.json
/// custom/acceptable_patterns/<id>.txt
/// custom/license_patterns/<ID>/...
/// ```
#[derive(Debug, Clone)]
pub struct FsResources {
    root: PathBuf,
}

impl FsResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, path: PathBuf) -> Result<(String, PathBuf), CatalogError> {
        let contents =
            fs::read_to_string(&path).map_err(|err| CatalogError::from_io(&path, err))?;
        Ok((contents, path))
    }

    fn sorted_entries(dir: &Path, want_dirs: bool) -> Result<Vec<PathBuf>, CatalogError> {
        let reader = match fs::read_dir(dir) {
            Ok(reader) => reader,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(CatalogError::from_io(dir, err)),
        };

        let mut paths = Vec::new();
        for entry in reader {
            let entry = entry.map_err(|err| CatalogError::from_io(dir, err))?;
            let file_type = entry
                .file_type()
                .map_err(|err| CatalogError::from_io(&entry.path(), err))?;
            if file_type.is_dir() == want_dirs {
                paths.push(entry.path());
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn spdx_file_name(id: &str, deprecated: bool, suffix: &str) -> String {
        if deprecated {
            format!("deprecated_{id}{suffix}")
        } else {
            format!("{id}{suffix}")
        }
    }
}

impl ResourceProvider for FsResources {
    fn standard_lists(&self) -> Result<(String, String), CatalogError> {
        let json_dir = self.root.join("spdx").join("json");
        let (licenses, _) = self.read(json_dir.join("licenses.json"))?;
        let (exceptions, _) = self.read(json_dir.join("exceptions.json"))?;
        Ok((licenses, exceptions))
    }

    fn standard_template(
        &self,
        id: &str,
        deprecated: bool,
    ) -> Result<(String, PathBuf), CatalogError> {
        let name = Self::spdx_file_name(id, deprecated, ".template.txt");
        self.read(self.root.join("spdx").join("template").join(name))
    }

    fn standard_precheck(
        &self,
        id: &str,
        deprecated: bool,
    ) -> Result<(String, PathBuf), CatalogError> {
        let name = Self::spdx_file_name(id, deprecated, ".json");
        self.read(self.root.join("spdx").join("precheck").join(name))
    }

    fn custom_files(&self, dir: &str) -> Result<Vec<PathBuf>, CatalogError> {
        Self::sorted_entries(&self.root.join("custom").join(dir), false)
    }

    fn custom_license_ids(&self) -> Result<Vec<String>, CatalogError> {
        let dirs = Self::sorted_entries(&self.root.join("custom").join("license_patterns"), true)?;
        Ok(dirs
            .iter()
            .filter_map(|path| path.file_name())
            .filter_map(|name| name.to_str())
            .map(str::to_string)
            .collect())
    }

    fn custom_license_files(&self, id: &str) -> Result<Vec<PathBuf>, CatalogError> {
        Self::sorted_entries(
            &self.root.join("custom").join("license_patterns").join(id),
            false,
        )
    }

    fn read_file(&self, path: &Path) -> Result<String, CatalogError> {
        self.read(path.to_path_buf()).map(|(contents, _)| contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_standard_template_paths() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("spdx/template/MIT.template.txt"), "mit text");
        write(
            &root.join("spdx/template/deprecated_Old-1.0.template.txt"),
            "old text",
        );

        let resources = FsResources::new(root);
        let (text, path) = resources.standard_template("MIT", false).unwrap();
        assert_eq!(text, "mit text");
        assert!(path.ends_with("spdx/template/MIT.template.txt"));

        let (text, _) = resources.standard_template("Old-1.0", true).unwrap();
        assert_eq!(text, "old text");

        let err = resources.standard_template("Nope", false).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_enumeration_is_sorted_and_tolerates_missing_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("custom/acceptable_patterns/zeta.txt"), "z");
        write(&root.join("custom/acceptable_patterns/alpha.txt"), "a");

        let resources = FsResources::new(root);
        let files = resources.custom_files("acceptable_patterns").unwrap();
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name())
            .filter_map(|n| n.to_str())
            .collect();
        assert_eq!(names, vec!["alpha.txt", "zeta.txt"]);

        assert!(resources.custom_license_ids().unwrap().is_empty());
        assert!(resources.custom_files("missing").unwrap().is_empty());
    }

    #[test]
    fn test_custom_license_ids_lists_directories_only() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(
            &root.join("custom/license_patterns/MIT/license_MIT.txt"),
            "x",
        );
        write(
            &root.join("custom/license_patterns/Apache-2.0/license_info.json"),
            "{}",
        );
        write(&root.join("custom/license_patterns/stray.txt"), "x");

        let resources = FsResources::new(root);
        assert_eq!(
            resources.custom_license_ids().unwrap(),
            vec!["Apache-2.0".to_string(), "MIT".to_string()]
        );
    }
}
