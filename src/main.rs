use clap::Parser;
use std::error::Error;
use std::sync::Arc;

use licentia::catalog::{CatalogListing, LicenseLibrary};
use licentia::cli::Cli;
use licentia::normalize::BasicNormalizer;
use licentia::resources::FsResources;

fn main() -> std::io::Result<()> {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let resources = Arc::new(FsResources::new(&cli.resources_path));
    let mut library = LicenseLibrary::new(resources, Arc::new(BasicNormalizer));
    library.add_all()?;

    let listing = library.listing();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        print_listing(&listing);
    }
    Ok(())
}

fn print_listing(listing: &CatalogListing) {
    println!("Standard list version: {}", listing.spdx_list_version);

    println!("\nLicenses ({}):", listing.licenses.len());
    for license in &listing.licenses {
        println!(
            "  {:<40} {} (templates: {}, OSI: {}, FSF: {})",
            license.id,
            license.name,
            license.num_templates,
            license.is_osi_approved,
            license.is_fsf_libre
        );
    }

    println!(
        "\nDeprecated licenses ({}):",
        listing.deprecated_licenses.len()
    );
    for license in &listing.deprecated_licenses {
        println!(
            "  {:<40} {} (templates: {})",
            license.id, license.name, license.num_templates
        );
    }

    println!("\nExceptions ({}):", listing.exceptions.len());
    for exception in &listing.exceptions {
        println!(
            "  {:<40} {} (templates: {})",
            exception.id, exception.name, exception.num_templates
        );
    }

    println!(
        "\nDeprecated exceptions ({}):",
        listing.deprecated_exceptions.len()
    );
    for exception in &listing.deprecated_exceptions {
        println!(
            "  {:<40} {} (templates: {})",
            exception.id, exception.name, exception.num_templates
        );
    }
}
