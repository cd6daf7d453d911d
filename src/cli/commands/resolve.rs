//! Resolve command implementation

use crate::cli::utils;
use anyhow::Result;
use clap::{ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;

pub fn command() -> Command {
    Command::new("resolve")
        .about("Resolve the complete field schema of a collection")
        .arg(
            clap::Arg::new("collection")
                .short('n')
                .long("collection")
                .help("Collection name")
                .value_name("NAME")
                .required(true),
        )
        .arg(
            clap::Arg::new("source")
                .short('s')
                .long("source")
                .help("Schema source file (e.g. src/content.config.ts)")
                .value_name("FILE")
                .required(true),
        )
        .arg(
            clap::Arg::new("schema")
                .short('j')
                .long("schema")
                .help("Generated JSON Schema of the collection")
                .value_name("FILE"),
        )
        .arg(
            clap::Arg::new("format")
                .short('f')
                .long("format")
                .help("Output format")
                .value_name("FORMAT")
                .value_parser(["json", "yaml"]),
        )
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("Output directory; prints to stdout when omitted")
                .value_name("DIR"),
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
    let collection = matches
        .get_one::<String>("collection")
        .ok_or_else(|| anyhow::anyhow!("--collection is required"))?;
    let source_path = matches
        .get_one::<String>("source")
        .ok_or_else(|| anyhow::anyhow!("--source is required"))?;

    info!("Resolving schema for collection {}", collection);

    let mut config = utils::load_config(matches)?;
    if let Some(format) = matches.get_one::<String>("format") {
        config.output.format = format.parse()?;
    }

    let source = utils::read_input(source_path).await?;
    let schema_json = match matches.get_one::<String>("schema") {
        Some(path) => Some(utils::read_input(path).await?),
        None => None,
    };

    let resolver = utils::create_resolver(&config)?;
    let resolution = resolver.resolve(collection, schema_json.as_deref(), &source);

    if let Some(warning) = resolution.warning() {
        eprintln!("Warning: {warning}");
    }
    for issue in resolution.issues.iter().filter(|i| !i.is_document_level()) {
        eprintln!("  Downgraded to unknown: {issue}");
    }

    match matches.get_one::<String>("output") {
        Some(dir) => {
            let path = config.output.write_to_dir(
                &resolution.schema,
                &PathBuf::from(dir),
                collection,
            )?;

            info!("Schema written to {:?}", path);
            println!("Schema written to {}", path.display());
            println!("Fields: {}", resolution.schema.len());
            println!("Cache key: {}", resolution.cache_key);
        }
        None => println!("{}", config.output.render(&resolution.schema)?),
    }

    Ok(())
}
