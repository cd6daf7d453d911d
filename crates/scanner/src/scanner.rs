//! Pattern-based scan of collection schema source

use anyhow::Result;
use regex::{Captures, Regex};
use std::collections::HashSet;
use tracing::{debug, info, trace, warn};

use crate::config::ScannerConfig;
use crate::source::SourceMap;
use crate::types::{Annotations, ReferenceMapping};

/// Object key: identifier or quoted name
const FIELD: &str = r#"(?:(?P<field>[A-Za-z_$][\w$]*)|['"](?P<quoted>[^'"\n]+)['"])"#;

/// Single quoted argument of a helper call
const COLLECTION_ARG: &str = r#"\(\s*['"`](?P<collection>[^'"`\n]+)['"`]\s*\)"#;

/// Recovers reference targets and image intent from schema source text.
///
/// Only a handful of call shapes are recognized; everything else in the
/// source is ignored.
pub struct SourceScanner {
    config: ScannerConfig,
    array_reference: Regex,
    chained_array_reference: Regex,
    reference: Regex,
    image: Regex,
    field: Regex,
    schema_key: Regex,
    schema_binding: Regex,
    object_open: Regex,
}

impl SourceScanner {
    pub fn with_config(config: ScannerConfig) -> Result<Self> {
        config.validate()?;

        let refs = alternation(&config.reference_helpers);
        let images = alternation(&config.image_helpers);
        let wrappers = alternation(&config.array_wrappers);

        let array_reference = Regex::new(&format!(
            r"{FIELD}\s*:\s*(?:{wrappers})\s*\(\s*(?:{refs})\s*{COLLECTION_ARG}"
        ))?;
        let chained_array_reference = Regex::new(&format!(
            r"{FIELD}\s*:\s*(?:{refs})\s*{COLLECTION_ARG}\s*\.\s*array\s*\("
        ))?;
        let reference = Regex::new(&format!(r"{FIELD}\s*:\s*(?:{refs})\s*{COLLECTION_ARG}"))?;
        let image = Regex::new(&format!(r"{FIELD}\s*:\s*(?:{images})\s*\("))?;
        let field = Regex::new(&format!(
            r"{FIELD}\s*:\s*(?:z\s*\.|(?:{refs}|{images}|{wrappers})\s*\()"
        ))?;

        Ok(Self {
            config,
            array_reference,
            chained_array_reference,
            reference,
            image,
            field,
            schema_key: Regex::new(r"\bschema\s*:")?,
            schema_binding: Regex::new(r"\bschema\s*:\s*(?P<ident>[A-Za-z_$][\w$]*)\s*[,}]")?,
            object_open: Regex::new(r"\bz\s*\.\s*object\s*\(\s*\{")?,
        })
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Scan schema source for reference, image and field declarations
    pub fn extract_annotations(&self, source: &str) -> Annotations {
        let map = SourceMap::new(source);
        let top_depth = if self.config.top_level_only {
            self.schema_depth(source, &map)
        } else {
            None
        };

        if self.config.top_level_only && top_depth.is_none() {
            debug!("No schema object literal found; accepting matches at any depth");
        }

        let accept = |anchor: usize| {
            map.is_code(anchor) && top_depth.map_or(true, |depth| map.depth_at(anchor) == depth)
        };

        let mut annotations = Annotations::default();
        let mut mapped = HashSet::new();

        // Array forms first so a field is never also recorded as a single reference
        for (pattern, is_array) in [
            (&self.array_reference, true),
            (&self.chained_array_reference, true),
            (&self.reference, false),
        ] {
            for caps in pattern.captures_iter(source) {
                let Some((anchor, name)) = field_name(&caps) else {
                    continue;
                };
                if !accept(anchor) {
                    trace!("Skipping reference match for {} outside the schema top level", name);
                    continue;
                }
                if !mapped.insert(name.to_string()) {
                    continue;
                }

                let collection_name = caps
                    .name("collection")
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default();

                debug!(
                    "Field {} references collection {} (array: {})",
                    name, collection_name, is_array
                );

                annotations.references.push(ReferenceMapping {
                    field_path: name.to_string(),
                    collection_name,
                    is_array,
                });
            }
        }

        for caps in self.image.captures_iter(source) {
            if let Some((anchor, name)) = field_name(&caps) {
                if accept(anchor) {
                    debug!("Field {} is an image", name);
                    annotations.images.insert(name.to_string());
                }
            }
        }

        let mut seen = HashSet::new();
        for caps in self.field.captures_iter(source) {
            if let Some((anchor, name)) = field_name(&caps) {
                if accept(anchor) && seen.insert(name.to_string()) {
                    annotations.fields.push(name.to_string());
                }
            }
        }

        // Matches are recorded in pattern order; report them in source order
        annotations
            .references
            .sort_by_key(|r| position_of(&annotations.fields, &r.field_path));

        info!(
            "Scanned schema source: {} references, {} images, {} fields",
            annotations.references.len(),
            annotations.images.len(),
            annotations.fields.len()
        );

        annotations
    }

    /// Slice the `defineCollection(...)` call bound to `collection`.
    ///
    /// Recognizes `const blog = defineCollection(` and `blog: defineCollection(`
    /// (with or without quotes around the key).
    pub fn collection_source<'s>(&self, source: &'s str, collection: &str) -> Option<&'s str> {
        let name = regex::escape(collection);
        let pattern = Regex::new(&format!(
            r#"(?:\b(?:const|let|var)\s+{name}\s*=\s*|(?:\b{name}|['"]{name}['"])\s*:\s*)defineCollection\s*\("#
        ))
        .ok()?;

        let map = SourceMap::new(source);
        for m in pattern.find_iter(source) {
            let open = m.end() - 1;
            if !map.is_code(open) {
                continue;
            }

            if let Some(close) = map.matching_close(open) {
                debug!("Found definition of collection {}", collection);
                return Some(&source[m.start()..=close]);
            }
        }

        None
    }

    /// Slice the schema declaration of `collection`.
    ///
    /// This is the `defineCollection(...)` call itself, unless its `schema`
    /// is a plain identifier (`schema: blogSchema`); then the initializer of
    /// that binding is returned when it can be found.
    pub fn schema_source<'s>(&self, source: &'s str, collection: &str) -> Option<&'s str> {
        let block = self.collection_source(source, collection)?;

        let map = SourceMap::new(block);
        let ident = self
            .schema_binding
            .captures_iter(block)
            .filter_map(|caps| caps.name("ident"))
            .find(|m| map.is_code(m.start()));

        let Some(ident) = ident else {
            return Some(block);
        };

        match self.binding_source(source, ident.as_str()) {
            Some(initializer) => {
                debug!(
                    "Schema of collection {} is bound to {}",
                    collection,
                    ident.as_str()
                );
                Some(initializer)
            }
            None => Some(block),
        }
    }

    /// `const name = call(...)` declaration, up to the close of its first call
    fn binding_source<'s>(&self, source: &'s str, name: &str) -> Option<&'s str> {
        let name = regex::escape(name);
        let pattern =
            Regex::new(&format!(r"\b(?:const|let|var)\s+{name}\b\s*(?::[^=\n]*)?=")).ok()?;

        let map = SourceMap::new(source);
        let bytes = source.as_bytes();

        for m in pattern.find_iter(source) {
            if !map.is_code(m.start()) {
                continue;
            }

            let open = (m.end()..bytes.len())
                .filter(|&offset| map.is_code(offset))
                .take_while(|&offset| bytes[offset] != b';')
                .find(|&offset| bytes[offset] == b'(');

            if let Some(close) = open.and_then(|open| map.matching_close(open)) {
                return Some(&source[m.start()..=close]);
            }
        }

        None
    }

    /// Brace depth of the top-level keys of the schema object literal
    fn schema_depth(&self, source: &str, map: &SourceMap<'_>) -> Option<u32> {
        let start = self
            .schema_key
            .find_iter(source)
            .find(|m| map.is_code(m.start()))
            .map(|m| m.end())
            .unwrap_or(0);

        self.object_open
            .find_iter(&source[start..])
            .map(|m| start + m.end() - 1)
            .find(|&brace| map.is_code(brace))
            .map(|brace| map.depth_at(brace) + 1)
    }
}

/// Scan with the default helper names
pub fn extract_annotations(source: &str) -> Annotations {
    match SourceScanner::with_config(ScannerConfig::default()) {
        Ok(scanner) => scanner.extract_annotations(source),
        Err(e) => {
            warn!("Could not build the default scanner: {}", e);
            Annotations::default()
        }
    }
}

fn alternation(names: &[String]) -> String {
    names
        .iter()
        .map(|n| regex::escape(n))
        .collect::<Vec<_>>()
        .join("|")
}

/// Field name of a match and the offset to check its context at.
///
/// For quoted keys the offset is just past the closing quote, since the key
/// itself sits inside a string literal.
fn field_name<'t>(caps: &Captures<'t>) -> Option<(usize, &'t str)> {
    if let Some(m) = caps.name("field") {
        return Some((m.start(), m.as_str()));
    }
    caps.name("quoted").map(|m| (m.end() + 1, m.as_str()))
}

fn position_of(fields: &[String], name: &str) -> usize {
    fields.iter().position(|f| f == name).unwrap_or(usize::MAX)
}
