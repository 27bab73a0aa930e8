use std::fs;
use std::path::Path;
use std::sync::Arc;

use licentia::catalog::LicenseLibrary;
use licentia::normalize::{BasicNormalizer, Normalizer};
use licentia::resources::FsResources;

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create dir");
    }
    fs::write(path, contents).expect("write file");
}

/// Lay out a small but complete resource tree: a standardized list with an
/// active, a deprecated, and a template-less entry, one exception, plus a
/// custom tree with an override, a custom-only license, and an acceptable
/// pattern.
fn build_resource_tree(root: &Path) {
    write(
        &root.join("spdx/json/licenses.json"),
        r#"{
            "licenseListVersion": "3.23",
            "licenses": [
                {"name": "MIT License", "licenseId": "MIT", "isOsiApproved": true, "isFsfLibre": true},
                {"name": "Old License", "licenseId": "Old-1.0", "isDeprecatedLicenseId": true},
                {"name": "Ghost License", "licenseId": "Ghost-1.0"}
            ]
        }"#,
    );
    write(
        &root.join("spdx/json/exceptions.json"),
        r#"{
            "exceptions": [
                {"name": "Classpath exception 2.0", "licenseExceptionId": "Classpath-exception-2.0"}
            ]
        }"#,
    );
    write(
        &root.join("spdx/template/MIT.template.txt"),
        "Copyright <<copyright>> Permission is hereby granted, free of charge, \
         to any person<<omitable>> obtaining a copy<</omitable>>.",
    );
    write(
        &root.join("spdx/template/deprecated_Old-1.0.template.txt"),
        "This is the old license text.",
    );
    write(
        &root.join("spdx/template/Classpath-exception-2.0.template.txt"),
        "As a special exception, the copyright holders give you permission.",
    );
    write(
        &root.join("spdx/precheck/MIT.json"),
        r#"{"StaticBlocks": ["hereby granted", "free of charge"]}"#,
    );

    write(
        &root.join("custom/acceptable_patterns/generic_disclaimer.txt"),
        "provided by the authors as.is",
    );
    write(
        &root.join("custom/license_patterns/MIT/license_info.json"),
        r#"{
            "name": "MIT License",
            "family": "Permissive",
            "is_standard": true,
            "aliases": ["Expat"],
            "urls": "https://Opensource.org/licenses/MIT"
        }"#,
    );
    write(
        &root.join("custom/license_patterns/House/license_info.json"),
        r#"{"name": "House Rules", "family": "Proprietary"}"#,
    );
    write(
        &root.join("custom/license_patterns/House/license_House.txt"),
        "Use of this code is governed by the house rules.",
    );
    write(
        &root.join("custom/license_patterns/House/prechecks_license_House.json"),
        r#"{"StaticBlocks": ["house rules"]}"#,
    );
}

fn build_library(root: &Path) -> LicenseLibrary {
    let mut library = LicenseLibrary::new(
        Arc::new(FsResources::new(root)),
        Arc::new(BasicNormalizer),
    );
    library.add_all().expect("catalog build should succeed");
    library
}

#[test]
fn test_full_catalog_build_and_listing() {
    let dir = tempfile::tempdir().expect("tempdir");
    build_resource_tree(dir.path());
    let library = build_library(dir.path());

    let listing = library.listing();
    assert_eq!(listing.spdx_list_version, "3.23");

    let license_ids: Vec<_> = listing.licenses.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(license_ids, vec!["House Rules", "MIT"]);

    let mit = &listing.licenses[1];
    assert_eq!(mit.name, "MIT License");
    assert_eq!(mit.family, "Permissive");
    assert_eq!(mit.num_templates, 1);
    assert!(mit.is_osi_approved);
    assert!(mit.is_fsf_libre);

    assert_eq!(listing.deprecated_licenses[0].id, "Old-1.0");
    assert_eq!(listing.exceptions[0].id, "Classpath-exception-2.0");
    assert!(listing.deprecated_exceptions.is_empty());

    // The listed-but-template-less entry was skipped without failing the build.
    assert!(!library.licenses.contains_key("Ghost-1.0"));

    // Identical input state, identical snapshot.
    assert_eq!(library.listing(), library.listing());
}

#[test]
fn test_custom_override_merges_with_standard_entry() {
    let dir = tempfile::tempdir().expect("tempdir");
    build_resource_tree(dir.path());
    let library = build_library(dir.path());

    let mit = &library.licenses["MIT"];
    assert_eq!(mit.spdx_license_id, "MIT");
    assert!(mit.info.is_standard);
    assert!(mit.info.osi_approved);
    assert_eq!(mit.info.family, "Permissive");
    assert_eq!(mit.aliases, vec!["expat", "mit", "mit license"]);
    assert_eq!(mit.urls, vec!["opensource.org/licenses/mit"]);
}

#[test]
fn test_lazy_compile_and_precheck_gate() {
    let dir = tempfile::tempdir().expect("tempdir");
    build_resource_tree(dir.path());
    let library = build_library(dir.path());

    let mit = &library.licenses["MIT"];
    let template = &mit.primary_patterns[0];
    assert!(!template.is_compiled());

    // The precheck gates the template by its file path: only candidate
    // text containing every static block is worth the compiled match.
    let record = &library.prechecks[&template.path];
    let candidate = "Copyright (c) 2024 Jane Doe  Permission is hereby granted,\n\
                     free of charge, to any person.";
    assert!(record.satisfied_by(candidate));
    assert!(!record.satisfied_by("unrelated text"));

    let normalized = library
        .normalizer()
        .normalize(candidate)
        .expect("normalize candidate");
    let compiled = template
        .compiled(library.normalizer())
        .expect("template should compile");
    assert!(compiled.regex.is_match(&normalized.text));
    assert!(template.is_compiled());

    // The omitable span may also be present.
    let with_optional = "Copyright 2024 ACME Permission is hereby granted, \
                         free of charge, to any person obtaining a copy.";
    assert!(compiled.regex.is_match(with_optional));

    // Acceptable patterns were compiled eagerly at build time.
    let generic = &library.acceptable_patterns["generic_disclaimer"];
    assert!(generic.is_match("PROVIDED BY THE AUTHORS AS-IS"));
}
