//! Info command implementation

use anyhow::Result;
use clap::{ArgMatches, Command};

pub fn command() -> Command {
    Command::new("info").about("Show tool information").arg(
        clap::Arg::new("detailed")
            .short('d')
            .long("detailed")
            .help("Show detailed information")
            .action(clap::ArgAction::SetTrue),
    )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let detailed = matches.get_flag("detailed");

    println!("collection-schema - Content Collection Schema Resolver");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));

    if detailed {
        println!("\nDetailed Information:");
        println!("  - Classifies generated JSON Schema into typed form fields");
        println!("  - Flattens closed nested objects into dot-path fields");
        println!("  - Recovers reference targets and image fields from schema source");
        println!("  - Falls back to source-only schemas when JSON Schema is unusable");
        println!("  - XDG-compliant configuration lookup");
    }

    Ok(())
}
