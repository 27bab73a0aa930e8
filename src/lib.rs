pub mod catalog;
pub mod cli;
pub mod error;
pub mod normalize;
pub mod resources;

pub use catalog::{
    CatalogListing, CompiledPattern, ExceptionSummary, License, LicenseInfo, LicenseLibrary,
    LicenseSummary, LicenseText, PatternSource, PreCheckMap, PreCheckRecord, PrimaryPattern,
};
pub use error::{CatalogError, CompileError};
pub use normalize::{BasicNormalizer, CaptureGroup, Normalized, Normalizer};
pub use resources::{FsResources, ResourceProvider};
