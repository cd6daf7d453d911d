//! JSON Schema analyzer implementation

use std::borrow::Cow;
use std::collections::HashSet;

use collection_schema_model::path;
use collection_schema_model::{FieldConstraints, FieldType, SchemaError, SchemaField, SchemaResult};
use tracing::{debug, info, trace, warn};

use crate::config::AnalyzerConfig;
use crate::document::{NoDefinitions, RefResolver, SchemaDocument, MAX_REF_HOPS};
use crate::types::{AdditionalProperties, ItemsSpec, JsonSchemaProperty, SchemaNode, TypeSpec};

/// Fields of one entry schema together with the problems absorbed on the way
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    /// Classified fields in declaration order
    pub fields: Vec<SchemaField>,

    /// Property-level problems; each affected field was downgraded to `Unknown`
    pub issues: Vec<SchemaError>,
}

/// Classifies the properties of a generated JSON Schema into form fields
pub struct SchemaAnalyzer {
    config: AnalyzerConfig,
}

impl Default for SchemaAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaAnalyzer {
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Classify the root object schema of a collection.
    ///
    /// `$ref` pointers cannot be followed without the surrounding document;
    /// use [`SchemaAnalyzer::analyze_document`] for schemas that contain them.
    pub fn parse_entry_schema(&self, root: &JsonSchemaProperty) -> SchemaResult<Vec<SchemaField>> {
        self.analyze(root, &NoDefinitions).map(|analysis| analysis.fields)
    }

    /// Locate a collection's entry schema in `document` and classify it
    pub fn analyze_document(
        &self,
        document: &SchemaDocument,
        collection: Option<&str>,
    ) -> SchemaResult<Analysis> {
        let entry = document.entry_schema(collection)?;
        self.analyze(&entry, document)
    }

    /// Classify `root`, resolving `$ref` pointers through `resolver`.
    ///
    /// Only a root that is not an object schema is an error. Every other
    /// problem is recorded in [`Analysis::issues`] and the affected field is
    /// kept as `Unknown`.
    pub fn analyze(
        &self,
        root: &JsonSchemaProperty,
        resolver: &dyn RefResolver,
    ) -> SchemaResult<Analysis> {
        if root.properties.is_none() {
            return Err(SchemaError::MalformedDocument(
                "entry schema has no properties".to_string(),
            ));
        }

        if root.schema_type.is_some() && !root.has_type("object") {
            return Err(SchemaError::MalformedDocument(
                "entry schema is not an object".to_string(),
            ));
        }

        let mut walker = Walker {
            config: &self.config,
            resolver,
            issues: Vec::new(),
        };

        let fields = walker.walk_object("", "", root, 1);
        let fields = finalize(fields, &mut walker.issues);

        info!(
            "Analyzed entry schema: {} fields, {} issues",
            fields.len(),
            walker.issues.len()
        );

        Ok(Analysis {
            fields,
            issues: walker.issues,
        })
    }
}

/// Classification of a single schema node
enum Shape {
    /// A field of the given type
    Leaf(FieldType),

    /// Closed object with properties; flattened into its children
    Closed,

    /// Closed object without properties; produces nothing
    Empty,
}

struct Walker<'a> {
    config: &'a AnalyzerConfig,
    resolver: &'a dyn RefResolver,
    issues: Vec<SchemaError>,
}

impl<'a> Walker<'a> {
    /// Flatten the properties of `object` into fields named below `parent`.
    ///
    /// `scope` only prefixes diagnostics; it is non-empty when walking the
    /// element schema of an array of objects.
    fn walk_object(
        &mut self,
        scope: &str,
        parent: &str,
        object: &JsonSchemaProperty,
        depth: usize,
    ) -> Vec<SchemaField> {
        let mut fields = Vec::new();

        let Some(properties) = &object.properties else {
            return fields;
        };

        for (name, node) in properties {
            if parent.is_empty() && scope.is_empty() && self.config.is_ignored(name) {
                trace!("Skipping ignored property {}", name);
                continue;
            }

            let field_path = path::join(parent, name);
            let required = object.is_required(name);

            match self.visit_property(scope, parent, &field_path, node, required, depth) {
                Ok(produced) => fields.extend(produced),
                Err(err) => {
                    let err = scoped(scope, err);
                    warn!("{}; keeping it as an untyped field", err);
                    self.issues.push(err);
                    fields.push(leaf_field(parent, &field_path, FieldType::Unknown, required));
                }
            }
        }

        fields
    }

    fn visit_property(
        &mut self,
        scope: &str,
        parent: &str,
        field_path: &str,
        node: &SchemaNode,
        required: bool,
        depth: usize,
    ) -> SchemaResult<Vec<SchemaField>> {
        let schema = self.node_schema(field_path, node)?;
        let (effective, nullable) = self.unwrap_nullable(field_path, &schema)?;

        match self.classify(field_path, &effective, depth)? {
            Shape::Leaf(field_type) => {
                let mut field = leaf_field(parent, field_path, field_type, required);
                field.nullable = nullable;
                field.constraints = constraints_of(&effective);
                field.description = effective.description.clone();
                field.default = effective.default.clone();
                Ok(vec![field])
            }
            Shape::Closed => {
                if depth >= self.config.max_depth {
                    return Err(SchemaError::MalformedProperty(field_path.to_string()));
                }
                debug!("Flattening nested object {}", field_path);
                Ok(self.walk_object(scope, field_path, &effective, depth + 1))
            }
            Shape::Empty => {
                debug!("Nested object {} has no properties", field_path);
                Ok(Vec::new())
            }
        }
    }

    /// Schema behind a property node, with references followed
    fn node_schema<'n>(
        &self,
        field_path: &str,
        node: &'n SchemaNode,
    ) -> SchemaResult<Cow<'n, JsonSchemaProperty>> {
        match node {
            SchemaNode::Schema(schema) => self.resolve_refs(field_path, schema),
            SchemaNode::Bool(true) => Ok(Cow::Owned(JsonSchemaProperty::default())),
            SchemaNode::Bool(false) | SchemaNode::Invalid(_) => {
                Err(SchemaError::MalformedProperty(field_path.to_string()))
            }
        }
    }

    fn resolve_refs<'n>(
        &self,
        field_path: &str,
        schema: &'n JsonSchemaProperty,
    ) -> SchemaResult<Cow<'n, JsonSchemaProperty>> {
        let Some(first) = &schema.reference else {
            return Ok(Cow::Borrowed(schema));
        };

        let mut reference = first.clone();
        for _ in 0..MAX_REF_HOPS {
            let mut target = self.resolver.resolve(&reference).ok_or_else(|| {
                debug!("Unresolvable reference {} at {}", reference, field_path);
                SchemaError::MalformedProperty(field_path.to_string())
            })?;

            match target.reference.take() {
                Some(next) => reference = next,
                None => {
                    // Keywords next to the `$ref` describe this property, not the target
                    if schema.description.is_some() {
                        target.description = schema.description.clone();
                    }
                    if schema.default.is_some() {
                        target.default = schema.default.clone();
                    }
                    return Ok(Cow::Owned(target));
                }
            }
        }

        Err(SchemaError::MalformedProperty(field_path.to_string()))
    }

    /// Strip `null` alternatives from a schema.
    ///
    /// Returns the narrowed schema and whether anything was removed.
    fn unwrap_nullable<'s>(
        &self,
        field_path: &str,
        schema: &'s JsonSchemaProperty,
    ) -> SchemaResult<(Cow<'s, JsonSchemaProperty>, bool)> {
        let mut current = Cow::Borrowed(schema);
        let mut nullable = false;

        if let Some(TypeSpec::Multiple(types)) = &schema.schema_type {
            let rest: Vec<String> = types.iter().filter(|t| *t != "null").cloned().collect();
            if !rest.is_empty() && rest.len() < types.len() {
                nullable = true;
                current.to_mut().schema_type = Some(match rest.as_slice() {
                    [single] => TypeSpec::Single(single.clone()),
                    _ => TypeSpec::Multiple(rest),
                });
            }
        }

        if let Some(values) = &schema.enum_values {
            if values.len() > 1 && values.iter().any(|v| v.is_null()) {
                nullable = true;
                current.to_mut().enum_values =
                    Some(values.iter().filter(|v| !v.is_null()).cloned().collect());
            }
        }

        if let Some(alternatives) = schema.alternatives() {
            let mut rest = Vec::new();
            let mut saw_null = false;

            for node in alternatives {
                if self.is_null_node(field_path, node) {
                    saw_null = true;
                } else {
                    rest.push(node.clone());
                }
            }

            if saw_null && !rest.is_empty() {
                nullable = true;

                if let [single] = rest.as_slice() {
                    let mut inner = self.node_schema(field_path, single)?.into_owned();
                    if schema.description.is_some() {
                        inner.description = schema.description.clone();
                    }
                    if schema.default.is_some() {
                        inner.default = schema.default.clone();
                    }
                    current = Cow::Owned(inner);
                } else {
                    let narrowed = current.to_mut();
                    narrowed.any_of = Some(rest);
                    narrowed.one_of = None;
                }
            }
        }

        Ok((current, nullable))
    }

    fn is_null_node(&self, field_path: &str, node: &SchemaNode) -> bool {
        match node {
            SchemaNode::Schema(_) => self
                .node_schema(field_path, node)
                .map(|schema| schema.is_null())
                .unwrap_or(false),
            _ => false,
        }
    }

    fn classify(
        &mut self,
        field_path: &str,
        schema: &JsonSchemaProperty,
        depth: usize,
    ) -> SchemaResult<Shape> {
        if let Some(alternatives) = schema.alternatives() {
            return self
                .classify_alternatives(field_path, alternatives, depth)
                .map(Shape::Leaf);
        }

        if let Some(value) = &schema.const_value {
            return Ok(Shape::Leaf(FieldType::Literal {
                value: value.clone(),
            }));
        }

        if let Some(values) = &schema.enum_values {
            return Ok(Shape::Leaf(FieldType::Enum {
                values: values.iter().map(enum_label).collect(),
            }));
        }

        match &schema.schema_type {
            None => {
                if schema.properties.is_some() || schema.additional_properties.is_some() {
                    self.classify_object(field_path, schema, depth)
                } else if schema.items.is_some() {
                    self.classify_array(field_path, schema, depth).map(Shape::Leaf)
                } else {
                    // `{}` accepts anything
                    Ok(Shape::Leaf(FieldType::Unknown))
                }
            }
            Some(TypeSpec::Single(name)) => self.classify_named(field_path, name, schema, depth),
            Some(TypeSpec::Multiple(names)) => {
                if names.is_empty() {
                    return Err(SchemaError::MalformedProperty(field_path.to_string()));
                }

                if names.iter().all(|n| n == "null") {
                    return Ok(Shape::Leaf(FieldType::Literal {
                        value: serde_json::Value::Null,
                    }));
                }

                let mut variants = Vec::with_capacity(names.len());
                for name in names.iter().filter(|n| *n != "null") {
                    let shape = self.classify_named(field_path, name, schema, depth)?;
                    variants.push(self.into_inline(field_path, shape, schema, depth)?);
                }
                Ok(Shape::Leaf(FieldType::Union { variants }))
            }
        }
    }

    fn classify_named(
        &mut self,
        field_path: &str,
        name: &str,
        schema: &JsonSchemaProperty,
        depth: usize,
    ) -> SchemaResult<Shape> {
        let field_type = match name {
            "string" => {
                let is_date = schema
                    .format
                    .as_deref()
                    .map_or(false, |f| self.config.is_date_format(f));
                if is_date && self.config.plain_date_strings {
                    FieldType::Date
                } else {
                    FieldType::String
                }
            }
            "number" | "integer" => FieldType::Number,
            "boolean" => FieldType::Boolean,
            "null" => FieldType::Literal {
                value: serde_json::Value::Null,
            },
            "array" => self.classify_array(field_path, schema, depth)?,
            "object" => return self.classify_object(field_path, schema, depth),
            other => {
                debug!("Unknown schema type '{}' at {}", other, field_path);
                return Err(SchemaError::MalformedProperty(field_path.to_string()));
            }
        };

        Ok(Shape::Leaf(field_type))
    }

    /// Objects are either open maps (`Record`) or closed shapes to flatten
    fn classify_object(
        &mut self,
        field_path: &str,
        schema: &JsonSchemaProperty,
        depth: usize,
    ) -> SchemaResult<Shape> {
        match &schema.additional_properties {
            Some(AdditionalProperties::Allowed(true)) => Ok(Shape::Leaf(FieldType::Record {
                values: Box::new(FieldType::Unknown),
            })),
            Some(AdditionalProperties::Schema(node)) => {
                let values = self.inline_node(field_path, node, depth)?;
                Ok(Shape::Leaf(FieldType::Record {
                    values: Box::new(values),
                }))
            }
            closed => {
                if schema.has_properties() {
                    Ok(Shape::Closed)
                } else if matches!(closed, Some(AdditionalProperties::Allowed(false))) {
                    Ok(Shape::Empty)
                } else {
                    // No properties and no restriction: open by default
                    Ok(Shape::Leaf(FieldType::Record {
                        values: Box::new(FieldType::Unknown),
                    }))
                }
            }
        }
    }

    fn classify_array(
        &mut self,
        field_path: &str,
        schema: &JsonSchemaProperty,
        depth: usize,
    ) -> SchemaResult<FieldType> {
        match &schema.items {
            None => Ok(FieldType::Array {
                items: Box::new(FieldType::Unknown),
            }),
            Some(ItemsSpec::Tuple(nodes)) => {
                let mut items = Vec::with_capacity(nodes.len());
                for node in nodes {
                    items.push(self.inline_node(field_path, node, depth)?);
                }
                Ok(FieldType::Tuple { items })
            }
            Some(ItemsSpec::Single(node)) => {
                let item = self.node_schema(field_path, node)?;
                if self.is_reference_shape(field_path, &item) {
                    return Ok(FieldType::ArrayReference);
                }

                let items = self.inline_node(field_path, node, depth)?;
                Ok(FieldType::Array {
                    items: Box::new(items),
                })
            }
        }
    }

    fn classify_alternatives(
        &mut self,
        field_path: &str,
        alternatives: &[SchemaNode],
        depth: usize,
    ) -> SchemaResult<FieldType> {
        if alternatives.is_empty() {
            return Err(SchemaError::MalformedProperty(field_path.to_string()));
        }

        let mut resolved = Vec::with_capacity(alternatives.len());
        for node in alternatives {
            resolved.push(self.node_schema(field_path, node)?);
        }

        if self.is_date_union(&resolved) {
            return Ok(FieldType::Date);
        }

        if resolved.iter().any(|schema| is_reference_object(schema)) {
            return Ok(FieldType::Reference);
        }

        if let Some(values) = string_literals(&resolved) {
            return Ok(FieldType::Enum { values });
        }

        if let [single] = alternatives {
            return self.inline_node(field_path, single, depth);
        }

        let mut variants = Vec::with_capacity(alternatives.len());
        for node in alternatives {
            variants.push(self.inline_node(field_path, node, depth)?);
        }
        Ok(FieldType::Union { variants })
    }

    /// Classify a node that cannot be flattened into top-level fields
    fn inline_node(
        &mut self,
        field_path: &str,
        node: &SchemaNode,
        depth: usize,
    ) -> SchemaResult<FieldType> {
        // Self-referencing items and alternatives recurse through here
        if depth >= self.config.max_depth {
            debug!("Nesting limit reached at {}", field_path);
            return Err(SchemaError::MalformedProperty(field_path.to_string()));
        }

        let depth = depth + 1;
        let schema = self.node_schema(field_path, node)?;
        let (effective, _) = self.unwrap_nullable(field_path, &schema)?;
        let shape = self.classify(field_path, &effective, depth)?;
        self.into_inline(field_path, shape, &effective, depth)
    }

    fn into_inline(
        &mut self,
        field_path: &str,
        shape: Shape,
        schema: &JsonSchemaProperty,
        depth: usize,
    ) -> SchemaResult<FieldType> {
        match shape {
            Shape::Leaf(field_type) => Ok(field_type),
            Shape::Empty => Ok(FieldType::Object { fields: Vec::new() }),
            Shape::Closed => {
                if depth >= self.config.max_depth {
                    return Err(SchemaError::MalformedProperty(field_path.to_string()));
                }

                let scope = format!("{field_path}[]");
                let fields = self.walk_object(&scope, "", schema, depth + 1);
                let fields = finalize(fields, &mut self.issues);
                Ok(FieldType::Object { fields })
            }
        }
    }

    /// Every alternative is a date-time, date or unix-time representation
    fn is_date_union(&self, alternatives: &[Cow<'_, JsonSchemaProperty>]) -> bool {
        let is_date_variant = |schema: &JsonSchemaProperty| {
            let dated = schema
                .format
                .as_deref()
                .map_or(false, |f| self.config.is_date_format(f));
            dated
                && (schema.has_type("string")
                    || schema.has_type("integer")
                    || schema.has_type("number"))
        };

        alternatives.iter().all(|schema| is_date_variant(&**schema))
            && alternatives.iter().any(|schema| schema.has_type("string"))
    }

    /// Whether `schema` is an `anyOf` with a reference-object alternative
    fn is_reference_shape(&self, field_path: &str, schema: &JsonSchemaProperty) -> bool {
        schema.alternatives().map_or(false, |alternatives| {
            alternatives.iter().any(|node| {
                self.node_schema(field_path, node)
                    .map(|alt| is_reference_object(&alt))
                    .unwrap_or(false)
            })
        })
    }
}

/// Object carrying a `collection` plus an `id` or `slug`
fn is_reference_object(schema: &JsonSchemaProperty) -> bool {
    schema.property("collection").is_some()
        && (schema.property("id").is_some() || schema.property("slug").is_some())
}

/// Values of an all-string-`const` union
fn string_literals(alternatives: &[Cow<'_, JsonSchemaProperty>]) -> Option<Vec<String>> {
    alternatives
        .iter()
        .map(|schema| match &schema.const_value {
            Some(serde_json::Value::String(value)) => Some(value.clone()),
            _ => None,
        })
        .collect()
}

fn enum_label(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn leaf_field(parent: &str, field_path: &str, field_type: FieldType, required: bool) -> SchemaField {
    let mut field = SchemaField::new(field_path, field_type).with_required(required);
    field.is_nested = !parent.is_empty();
    field.parent_path = (!parent.is_empty()).then(|| parent.to_string());
    field
}

fn constraints_of(schema: &JsonSchemaProperty) -> FieldConstraints {
    let integer = match &schema.schema_type {
        Some(TypeSpec::Single(t)) => t == "integer",
        Some(TypeSpec::Multiple(types)) => types.iter().any(|t| t == "integer"),
        None => false,
    };

    FieldConstraints {
        min_length: schema.min_length,
        max_length: schema.max_length,
        minimum: schema.minimum,
        maximum: schema.maximum,
        exclusive_minimum: schema.exclusive_minimum.clone(),
        exclusive_maximum: schema.exclusive_maximum.clone(),
        multiple_of: schema.multiple_of,
        integer,
        format: schema.format.clone(),
        pattern: schema.pattern.clone(),
        min_items: schema.min_items,
        max_items: schema.max_items,
    }
}

fn scoped(scope: &str, err: SchemaError) -> SchemaError {
    match err {
        SchemaError::MalformedProperty(p) if !scope.is_empty() => {
            SchemaError::MalformedProperty(path::join(scope, &p))
        }
        other => other,
    }
}

/// Drop duplicate names and assign positions
fn finalize(fields: Vec<SchemaField>, issues: &mut Vec<SchemaError>) -> Vec<SchemaField> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(fields.len());

    for mut field in fields {
        if !seen.insert(field.name.clone()) {
            warn!("Duplicate field name '{}' dropped", field.name);
            issues.push(SchemaError::MalformedProperty(field.name));
            continue;
        }
        field.order = out.len();
        out.push(field);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn schema(json: &str) -> JsonSchemaProperty {
        serde_json::from_str(json).unwrap()
    }

    fn analyze(json: &str) -> Analysis {
        SchemaAnalyzer::new()
            .analyze(&schema(json), &NoDefinitions)
            .unwrap()
    }

    fn single_type(property: &str) -> FieldType {
        let root = format!(r#"{{"type": "object", "properties": {{"value": {property}}}}}"#);
        let analysis = analyze(&root);
        assert_eq!(analysis.fields.len(), 1);
        analysis.fields[0].field_type.clone()
    }

    #[rstest]
    #[case(r#"{"type": "string"}"#, FieldType::String)]
    #[case(r#"{"type": "number"}"#, FieldType::Number)]
    #[case(r#"{"type": "integer"}"#, FieldType::Number)]
    #[case(r#"{"type": "boolean"}"#, FieldType::Boolean)]
    #[case(r#"{"type": "string", "format": "date-time"}"#, FieldType::Date)]
    #[case(r#"{"type": "string", "format": "email"}"#, FieldType::String)]
    #[case(r#"{}"#, FieldType::Unknown)]
    #[case(r#"true"#, FieldType::Unknown)]
    #[case(r#"{"type": "string", "const": "post"}"#, FieldType::Literal { value: serde_json::json!("post") })]
    #[case(r#"{"type": "string", "enum": ["draft", "published"]}"#, FieldType::Enum { values: vec!["draft".into(), "published".into()] })]
    #[case(r#"{"type": "array", "items": {"type": "string"}}"#, FieldType::Array { items: Box::new(FieldType::String) })]
    #[case(r#"{"type": "array"}"#, FieldType::Array { items: Box::new(FieldType::Unknown) })]
    #[case(r#"{"type": "object", "additionalProperties": true}"#, FieldType::Record { values: Box::new(FieldType::Unknown) })]
    #[case(r#"{"type": "object", "additionalProperties": {"type": "number"}}"#, FieldType::Record { values: Box::new(FieldType::Number) })]
    #[case(r#"{"type": "object"}"#, FieldType::Record { values: Box::new(FieldType::Unknown) })]
    fn test_primitive_classification(#[case] property: &str, #[case] expected: FieldType) {
        assert_eq!(single_type(property), expected);
    }

    #[test]
    fn test_title_and_tags_scenario() {
        let analysis = analyze(
            r#"{
                "properties": {
                    "title": {"type": "string"},
                    "tags": {"type": "array", "items": {"type": "string"}}
                },
                "required": ["title"]
            }"#,
        );

        assert!(analysis.issues.is_empty());
        let fields = &analysis.fields;
        assert_eq!(fields.len(), 2);

        assert_eq!(fields[0].name, "title");
        assert_eq!(fields[0].field_type, FieldType::String);
        assert!(fields[0].required);
        assert_eq!(fields[0].order, 0);

        assert_eq!(fields[1].name, "tags");
        assert_eq!(
            fields[1].field_type,
            FieldType::Array {
                items: Box::new(FieldType::String)
            }
        );
        assert!(!fields[1].required);
        assert_eq!(fields[1].order, 1);
    }

    #[test]
    fn test_closed_object_is_flattened() {
        let analysis = analyze(
            r#"{
                "type": "object",
                "properties": {
                    "metadata": {
                        "type": "object",
                        "properties": {
                            "category": {"type": "string"},
                            "priority": {"type": "number"}
                        },
                        "required": ["category"],
                        "additionalProperties": false
                    }
                }
            }"#,
        );

        let fields = &analysis.fields;
        assert_eq!(fields.len(), 2);
        assert!(fields.iter().all(|f| f.name != "metadata"));

        assert_eq!(fields[0].name, "metadata.category");
        assert!(fields[0].required);
        assert!(fields[0].is_nested);
        assert_eq!(fields[0].parent_path.as_deref(), Some("metadata"));

        assert_eq!(fields[1].name, "metadata.priority");
        assert!(!fields[1].required);
        assert!(fields[1].is_nested);
        assert_eq!(fields[1].parent_path.as_deref(), Some("metadata"));
    }

    #[rstest]
    #[case("true", true)]
    #[case(r#"{"type": "string"}"#, true)]
    #[case("false", false)]
    fn test_open_object_is_never_flattened(#[case] additional: &str, #[case] is_record: bool) {
        let root = format!(
            r#"{{"type": "object", "properties": {{
                "extra": {{
                    "type": "object",
                    "properties": {{"known": {{"type": "string"}}}},
                    "additionalProperties": {additional}
                }}
            }}}}"#
        );
        let analysis = analyze(&root);

        if is_record {
            assert_eq!(analysis.fields.len(), 1);
            assert_eq!(analysis.fields[0].name, "extra");
            assert!(matches!(
                analysis.fields[0].field_type,
                FieldType::Record { .. }
            ));
        } else {
            assert_eq!(analysis.fields.len(), 1);
            assert_eq!(analysis.fields[0].name, "extra.known");
            assert!(!matches!(
                analysis.fields[0].field_type,
                FieldType::Record { .. }
            ));
        }
    }

    #[test]
    fn test_declaration_order_with_flattening() {
        let analysis = analyze(
            r#"{
                "type": "object",
                "properties": {
                    "zeta": {"type": "string"},
                    "seo": {
                        "type": "object",
                        "properties": {
                            "title": {"type": "string"},
                            "og": {
                                "type": "object",
                                "properties": {"image": {"type": "string"}},
                                "additionalProperties": false
                            }
                        },
                        "additionalProperties": false
                    },
                    "alpha": {"type": "boolean"}
                }
            }"#,
        );

        let names: Vec<&str> = analysis.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "seo.title", "seo.og.image", "alpha"]);

        let orders: Vec<usize> = analysis.fields.iter().map(|f| f.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);

        assert_eq!(analysis.fields[2].parent_path.as_deref(), Some("seo.og"));
    }

    #[test]
    fn test_astro_date_union() {
        let field_type = single_type(
            r#"{"anyOf": [
                {"type": "string", "format": "date-time"},
                {"type": "string", "format": "date"},
                {"type": "integer", "format": "unix-time"}
            ]}"#,
        );
        assert_eq!(field_type, FieldType::Date);
    }

    #[test]
    fn test_nullable_unwrapping() {
        let analysis = analyze(
            r#"{"type": "object", "properties": {
                "subtitle": {"anyOf": [{"type": "string", "maxLength": 80}, {"type": "null"}]},
                "rating": {"type": ["number", "null"], "minimum": 0},
                "status": {"enum": ["draft", null, "live"]}
            }}"#,
        );

        let subtitle = &analysis.fields[0];
        assert_eq!(subtitle.field_type, FieldType::String);
        assert!(subtitle.nullable);
        assert_eq!(subtitle.constraints.max_length, Some(80));

        let rating = &analysis.fields[1];
        assert_eq!(rating.field_type, FieldType::Number);
        assert!(rating.nullable);
        assert_eq!(rating.constraints.minimum, Some(0.0));

        let status = &analysis.fields[2];
        assert!(status.nullable);
        assert_eq!(
            status.field_type,
            FieldType::Enum {
                values: vec!["draft".into(), "live".into()]
            }
        );
    }

    #[test]
    fn test_nullable_nested_object_is_flattened() {
        let analysis = analyze(
            r#"{"type": "object", "properties": {
                "hero": {"anyOf": [
                    {"type": "object", "properties": {"alt": {"type": "string"}}, "additionalProperties": false},
                    {"type": "null"}
                ]}
            }}"#,
        );

        assert_eq!(analysis.fields.len(), 1);
        assert_eq!(analysis.fields[0].name, "hero.alt");
    }

    const REFERENCE_SHAPE: &str = r#"{"anyOf": [
        {"type": "string"},
        {"type": "object", "properties": {"id": {"type": "string"}, "collection": {"type": "string"}}, "required": ["id", "collection"], "additionalProperties": false},
        {"type": "object", "properties": {"slug": {"type": "string"}, "collection": {"type": "string"}}, "required": ["slug", "collection"], "additionalProperties": false}
    ]}"#;

    #[test]
    fn test_reference_shapes() {
        assert_eq!(single_type(REFERENCE_SHAPE), FieldType::Reference);

        let array = format!(r#"{{"type": "array", "items": {REFERENCE_SHAPE}}}"#);
        assert_eq!(single_type(&array), FieldType::ArrayReference);
    }

    #[test]
    fn test_nested_reference_is_reference_shaped() {
        let root = format!(
            r#"{{"type": "object", "properties": {{
                "seo": {{"type": "object", "properties": {{"author": {REFERENCE_SHAPE}}}, "additionalProperties": false}}
            }}}}"#
        );
        let analysis = analyze(&root);

        assert_eq!(analysis.fields[0].name, "seo.author");
        assert_eq!(analysis.fields[0].field_type, FieldType::Reference);
        assert_eq!(analysis.fields[0].reference_collection, None);
    }

    #[test]
    fn test_tuple_and_array_of_objects() {
        let tuple = single_type(
            r#"{"type": "array", "minItems": 2, "maxItems": 2, "items": [{"type": "number"}, {"type": "string"}]}"#,
        );
        assert_eq!(
            tuple,
            FieldType::Tuple {
                items: vec![FieldType::Number, FieldType::String]
            }
        );

        let links = single_type(
            r#"{"type": "array", "items": {
                "type": "object",
                "properties": {
                    "label": {"type": "string"},
                    "target": {"type": "object", "properties": {"url": {"type": "string", "format": "uri"}}, "additionalProperties": false}
                },
                "required": ["label"],
                "additionalProperties": false
            }}"#,
        );

        let FieldType::Array { items } = links else {
            panic!("expected an array");
        };
        let FieldType::Object { fields } = *items else {
            panic!("expected object items");
        };
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["label", "target.url"]);
        assert!(fields[0].required);
        assert_eq!(fields[1].constraints.format.as_deref(), Some("uri"));
    }

    #[test]
    fn test_unions() {
        let literals = single_type(
            r#"{"anyOf": [{"type": "string", "const": "a"}, {"type": "string", "const": "b"}]}"#,
        );
        assert_eq!(
            literals,
            FieldType::Enum {
                values: vec!["a".into(), "b".into()]
            }
        );

        let mixed = single_type(r#"{"anyOf": [{"type": "string"}, {"type": "number"}]}"#);
        assert_eq!(
            mixed,
            FieldType::Union {
                variants: vec![FieldType::String, FieldType::Number]
            }
        );

        let listed = single_type(r#"{"type": ["string", "boolean"]}"#);
        assert_eq!(
            listed,
            FieldType::Union {
                variants: vec![FieldType::String, FieldType::Boolean]
            }
        );
    }

    #[test]
    fn test_malformed_property_is_downgraded() {
        let analysis = analyze(
            r#"{"type": "object", "properties": {
                "title": {"type": "string"},
                "broken": {"type": "wat"},
                "garbage": 42,
                "empty": {"anyOf": []},
                "count": {"type": "integer", "minimum": 1}
            }, "required": ["broken"]}"#,
        );

        let names: Vec<&str> = analysis.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["title", "broken", "garbage", "empty", "count"]);

        assert_eq!(analysis.fields[1].field_type, FieldType::Unknown);
        assert!(analysis.fields[1].required);
        assert_eq!(analysis.fields[2].field_type, FieldType::Unknown);
        assert_eq!(analysis.fields[3].field_type, FieldType::Unknown);

        assert_eq!(analysis.fields[4].field_type, FieldType::Number);
        assert!(analysis.fields[4].constraints.integer);

        assert_eq!(
            analysis.issues,
            vec![
                SchemaError::MalformedProperty("broken".to_string()),
                SchemaError::MalformedProperty("garbage".to_string()),
                SchemaError::MalformedProperty("empty".to_string()),
            ]
        );
    }

    #[test]
    fn test_constraints_and_metadata_copied() {
        let analysis = analyze(
            r#"{"type": "object", "properties": {
                "slug": {
                    "type": "string",
                    "minLength": 3,
                    "maxLength": 64,
                    "pattern": "^[a-z0-9-]+$",
                    "description": "URL slug",
                    "default": "untitled"
                },
                "score": {"type": "number", "exclusiveMinimum": 0, "maximum": 10, "multipleOf": 0.5}
            }}"#,
        );

        let slug = &analysis.fields[0];
        assert_eq!(slug.constraints.min_length, Some(3));
        assert_eq!(slug.constraints.max_length, Some(64));
        assert_eq!(slug.constraints.pattern.as_deref(), Some("^[a-z0-9-]+$"));
        assert_eq!(slug.description.as_deref(), Some("URL slug"));
        assert_eq!(slug.default, Some(serde_json::json!("untitled")));

        let score = &analysis.fields[1];
        assert_eq!(
            score.constraints.exclusive_minimum,
            Some(collection_schema_model::ExclusiveBound::Value(0.0))
        );
        assert_eq!(score.constraints.maximum, Some(10.0));
        assert_eq!(score.constraints.multiple_of, Some(0.5));
    }

    #[test]
    fn test_schema_property_is_ignored() {
        let analysis = analyze(
            r#"{"type": "object", "properties": {"$schema": {"type": "string"}, "title": {"type": "string"}}}"#,
        );
        assert_eq!(analysis.fields.len(), 1);
        assert_eq!(analysis.fields[0].name, "title");
    }

    #[test]
    fn test_references_resolved_through_document() {
        let document = SchemaDocument::parse(
            r##"{
                "$ref": "#/definitions/docs",
                "definitions": {
                    "docs": {
                        "type": "object",
                        "properties": {
                            "author": {"type": "string", "minLength": 2},
                            "editor": {"$ref": "#/definitions/docs/properties/author", "description": "Reviewer"},
                            "missing": {"$ref": "#/definitions/nowhere"}
                        }
                    }
                }
            }"##,
        )
        .unwrap();

        let analysis = SchemaAnalyzer::new()
            .analyze_document(&document, Some("docs"))
            .unwrap();

        let editor = &analysis.fields[1];
        assert_eq!(editor.field_type, FieldType::String);
        assert_eq!(editor.constraints.min_length, Some(2));
        assert_eq!(editor.description.as_deref(), Some("Reviewer"));

        assert_eq!(analysis.fields[2].field_type, FieldType::Unknown);
        assert_eq!(
            analysis.issues,
            vec![SchemaError::MalformedProperty("missing".to_string())]
        );
    }

    #[test]
    fn test_recursive_references_are_bounded() {
        let document = SchemaDocument::parse(
            r##"{
                "$ref": "#/definitions/docs",
                "definitions": {
                    "node": {"type": "array", "items": {"$ref": "#/definitions/node"}},
                    "json": {"anyOf": [{"type": "string"}, {"type": "array", "items": {"$ref": "#/definitions/json"}}]},
                    "docs": {
                        "type": "object",
                        "properties": {
                            "title": {"type": "string"},
                            "tree": {"$ref": "#/definitions/node"},
                            "json": {"$ref": "#/definitions/json"}
                        },
                        "required": ["title"]
                    }
                }
            }"##,
        )
        .unwrap();

        let analysis = SchemaAnalyzer::new()
            .analyze_document(&document, Some("docs"))
            .unwrap();

        let names: Vec<&str> = analysis.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["title", "tree", "json"]);

        assert_eq!(analysis.fields[0].field_type, FieldType::String);
        assert!(analysis.fields[0].required);
        assert_eq!(analysis.fields[1].field_type, FieldType::Unknown);
        assert_eq!(analysis.fields[2].field_type, FieldType::Unknown);
        assert_eq!(
            analysis.issues,
            vec![
                SchemaError::MalformedProperty("tree".to_string()),
                SchemaError::MalformedProperty("json".to_string()),
            ]
        );
    }

    #[test]
    fn test_array_nesting_counts_toward_depth() {
        let analyzer = SchemaAnalyzer::with_config(AnalyzerConfig {
            max_depth: 3,
            ..Default::default()
        });

        let root = schema(
            r#"{"type": "object", "properties": {
                "shallow": {"type": "array", "items": {"type": "array", "items": {"type": "string"}}},
                "deep": {"type": "array", "items": {"type": "array", "items": {"type": "array", "items": {"type": "string"}}}}
            }}"#,
        );

        let analysis = analyzer.analyze(&root, &NoDefinitions).unwrap();
        assert_eq!(
            analysis.fields[0].field_type,
            FieldType::Array {
                items: Box::new(FieldType::Array {
                    items: Box::new(FieldType::String)
                })
            }
        );
        assert_eq!(analysis.fields[1].field_type, FieldType::Unknown);
        assert_eq!(
            analysis.issues,
            vec![SchemaError::MalformedProperty("deep".to_string())]
        );
    }

    #[test]
    fn test_depth_limit() {
        let analyzer = SchemaAnalyzer::with_config(AnalyzerConfig {
            max_depth: 2,
            ..Default::default()
        });

        let root = schema(
            r#"{"type": "object", "properties": {
                "a": {"type": "object", "additionalProperties": false, "properties": {
                    "b": {"type": "object", "additionalProperties": false, "properties": {
                        "c": {"type": "string"}
                    }}
                }}
            }}"#,
        );

        let analysis = analyzer.analyze(&root, &NoDefinitions).unwrap();
        assert_eq!(analysis.fields.len(), 1);
        assert_eq!(analysis.fields[0].name, "a.b");
        assert_eq!(analysis.fields[0].field_type, FieldType::Unknown);
    }

    #[test]
    fn test_root_must_be_object_schema() {
        let analyzer = SchemaAnalyzer::new();
        assert!(matches!(
            analyzer.parse_entry_schema(&schema(r#"{"type": "string"}"#)),
            Err(SchemaError::MalformedDocument(_))
        ));
        assert!(analyzer
            .parse_entry_schema(&schema(r#"{"type": "object", "properties": {}}"#))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_leaf_count_matches_flattened_properties() {
        let analysis = analyze(
            r#"{"type": "object", "properties": {
                "a": {"type": "string"},
                "b": {"type": "object", "additionalProperties": false, "properties": {
                    "c": {"type": "string"},
                    "d": {"type": "object", "additionalProperties": false, "properties": {
                        "e": {"type": "number"},
                        "f": {"type": "boolean"}
                    }}
                }},
                "g": {"type": "object", "additionalProperties": true},
                "h": {"type": "object", "additionalProperties": false, "properties": {}}
            }}"#,
        );

        let names: Vec<&str> = analysis.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b.c", "b.d.e", "b.d.f", "g"]);
    }
}
