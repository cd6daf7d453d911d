//! Configuration tests

use super::*;
use collection_schema_model::{CompleteSchema, FieldType, SchemaField};
use tempfile::NamedTempFile;

#[test]
fn test_config_serialization() {
    let config = ResolverConfig::default();
    let yaml = serde_yaml::to_string(&config).unwrap();
    let parsed: ResolverConfig = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(config.version, parsed.version);
    assert_eq!(config.analyzer.max_depth, parsed.analyzer.max_depth);
    assert_eq!(config.scanner.reference_helpers, parsed.scanner.reference_helpers);
    assert_eq!(config.output.format, parsed.output.format);
}

#[test]
fn test_config_from_file() {
    let mut config = ResolverConfig::default();
    config.scanner.image_helpers.push("asset".to_string());
    config.output.format = OutputFormat::Yaml;

    let temp_file = NamedTempFile::new().unwrap();
    config.save_to_file(temp_file.path()).unwrap();

    let loaded = ResolverConfig::from_file(temp_file.path()).unwrap();
    assert_eq!(loaded.version, "1.0");
    assert_eq!(loaded.scanner.image_helpers, vec!["image", "asset"]);
    assert_eq!(loaded.output.format, OutputFormat::Yaml);
}

#[test]
fn test_partial_config_uses_defaults() {
    let config = ResolverConfig::from_yaml("version: \"1.0\"\nanalyzer:\n  max_depth: 4\n").unwrap();

    assert_eq!(config.analyzer.max_depth, 4);
    assert_eq!(config.analyzer.ignored_properties, vec!["$schema"]);
    assert_eq!(config.scanner.array_wrappers, vec!["z.array"]);
    assert!(config.output.pretty);
}

#[test]
fn test_config_validation() {
    assert!(ResolverConfig::default().validate().is_ok());

    let mut config = ResolverConfig::default();
    config.version = "2.0".to_string();
    assert!(config.validate().is_err());

    let mut config = ResolverConfig::default();
    config.analyzer.max_depth = 0;
    assert!(config.validate().is_err());

    let mut config = ResolverConfig::default();
    config.scanner.reference_helpers.clear();
    assert!(config.validate().is_err());
}

#[test]
fn test_invalid_yaml_is_rejected() {
    assert!(ResolverConfig::from_yaml("version: [1.0").is_err());
    assert!(ResolverConfig::from_yaml("analyzer: {}").is_err());
}

#[test]
fn test_output_rendering() {
    let schema = CompleteSchema::new(
        "blog",
        vec![SchemaField::new("title", FieldType::String).with_required(true)],
    );

    let compact = OutputConfig {
        format: OutputFormat::Json,
        pretty: false,
    };
    let json = compact.render(&schema).unwrap();
    assert!(json.starts_with("{\"collection_name\":\"blog\""));
    assert!(!json.contains('\n'));

    let yaml = OutputConfig {
        format: OutputFormat::Yaml,
        pretty: false,
    };
    let rendered = yaml.render(&schema).unwrap();
    assert!(rendered.contains("collection_name: blog"));
    assert!(rendered.contains("kind: string"));
}

#[test]
fn test_output_format_parsing() {
    assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
    assert_eq!("yml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
    assert!("toml".parse::<OutputFormat>().is_err());
}

#[test]
fn test_write_to_dir() {
    let schema = CompleteSchema::new(
        "blog posts",
        vec![SchemaField::new("title", FieldType::String)],
    );
    let temp_dir = tempfile::TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("schemas");

    let config = OutputConfig {
        format: OutputFormat::Yaml,
        pretty: true,
    };
    let path = config.write_to_dir(&schema, &out_dir, "blog posts").unwrap();

    assert_eq!(path, out_dir.join("blog_posts.yaml"));
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("collection_name: blog posts"));
}

#[test]
fn test_write_to_dir_reports_io_errors() {
    let schema = CompleteSchema::new("blog", Vec::new());
    let blocker = NamedTempFile::new().unwrap();

    let result = OutputConfig::default().write_to_dir(&schema, blocker.path(), "blog");
    assert!(matches!(result, Err(crate::CollectionSchemaError::Io(_))));
}
