//! Scan command implementation

use crate::cli::utils;
use crate::SourceScanner;
use anyhow::Result;
use clap::{ArgMatches, Command};
use tracing::info;

pub fn command() -> Command {
    Command::new("scan")
        .about("Show reference and image annotations found in schema source")
        .arg(
            clap::Arg::new("source")
                .short('s')
                .long("source")
                .help("Schema source file")
                .value_name("FILE")
                .required(true),
        )
        .arg(
            clap::Arg::new("collection")
                .short('n')
                .long("collection")
                .help("Only scan this collection's defineCollection block")
                .value_name("NAME"),
        )
        .arg(
            clap::Arg::new("config")
                .short('c')
                .long("config")
                .help("Configuration file path")
                .value_name("FILE"),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let source_path = matches
        .get_one::<String>("source")
        .ok_or_else(|| anyhow::anyhow!("--source is required"))?;

    info!("Scanning schema source {}", source_path);

    let config = utils::load_config(matches)?;
    let source = utils::read_input(source_path).await?;
    let scanner = SourceScanner::with_config(config.scanner)?;

    let scoped = match matches.get_one::<String>("collection") {
        Some(collection) => scanner
            .schema_source(&source, collection)
            .ok_or_else(|| anyhow::anyhow!("Collection not found in source: {}", collection))?,
        None => source.as_str(),
    };

    let annotations = scanner.extract_annotations(scoped);

    println!("Fields: {}", annotations.fields.join(", "));

    println!("References: {}", annotations.references.len());
    for reference in &annotations.references {
        println!(
            "  - {} -> {}{}",
            reference.field_path,
            reference.collection_name,
            if reference.is_array { " (array)" } else { "" }
        );
    }

    println!("Images: {}", annotations.images.len());
    for image in &annotations.images {
        println!("  - {image}");
    }

    Ok(())
}
