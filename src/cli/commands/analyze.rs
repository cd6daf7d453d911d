//! Analyze command implementation

use crate::cli::utils;
use crate::{SchemaAnalyzer, SchemaDocument, SchemaField};
use anyhow::Result;
use clap::{ArgMatches, Command};
use tracing::info;

pub fn command() -> Command {
    Command::new("analyze")
        .about("Classify the fields of a generated JSON Schema")
        .arg(
            clap::Arg::new("schema")
                .short('j')
                .long("schema")
                .help("Generated JSON Schema file")
                .value_name("FILE")
                .required(true),
        )
        .arg(
            clap::Arg::new("collection")
                .short('n')
                .long("collection")
                .help("Collection name, used to pick a definition")
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
    let schema_path = matches
        .get_one::<String>("schema")
        .ok_or_else(|| anyhow::anyhow!("--schema is required"))?;
    let collection = matches.get_one::<String>("collection").map(String::as_str);

    info!("Analyzing JSON Schema {}", schema_path);

    let config = utils::load_config(matches)?;
    let content = utils::read_input(schema_path).await?;

    let document = SchemaDocument::parse(&content)?;
    let analysis = SchemaAnalyzer::with_config(config.analyzer).analyze_document(&document, collection)?;

    println!("Fields: {}", analysis.fields.len());
    for field in &analysis.fields {
        println!("  {}", describe(field));
    }

    if !analysis.issues.is_empty() {
        println!("Issues: {}", analysis.issues.len());
        for issue in &analysis.issues {
            println!("  - {issue}");
        }
    }

    Ok(())
}

fn describe(field: &SchemaField) -> String {
    let mut line = format!("{}: {}", field.name, field.field_type.name());
    if field.required {
        line.push_str(" (required)");
    }
    if field.nullable {
        line.push_str(" (nullable)");
    }
    line
}
