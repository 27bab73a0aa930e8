use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Resource root containing the spdx/ and custom/ trees
    pub resources_path: String,

    /// Emit the listing as JSON instead of text
    #[arg(short, long)]
    pub json: bool,
}
