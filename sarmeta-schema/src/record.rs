//! Record schemas.
//!
//! A [`RecordSchema`] is the ordered field list of one record type together
//! with its required set, collection declarations, output formats,
//! cross-field predicates and derivation hooks. Schemas are immutable once
//! built and shared through [`Arc`].

use crate::derive::DerivationHook;
use crate::descriptor::{CollectionMode, FieldDescriptor, FieldKind};
use crate::error::SchemaError;
use crate::validation::Predicate;
use sarmeta_core::{NumericFormat, PrimitiveKind};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Immutable description of one record type.
pub struct RecordSchema {
    name: String,
    fields: Vec<FieldDescriptor>,
    index: HashMap<String, usize>,
    predicates: Vec<Arc<dyn Predicate>>,
    hooks: Vec<Arc<dyn DerivationHook>>,
}

impl RecordSchema {
    /// Starts building a schema with the given record name.
    pub fn builder(name: impl Into<String>) -> RecordSchemaBuilder {
        RecordSchemaBuilder::new(name)
    }

    /// Record name, also used as the XML element tag.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the declaration position of a field.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.position(name).map(|i| &self.fields[i])
    }

    /// Iterates over the names of required fields.
    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.is_required())
            .map(FieldDescriptor::name)
    }

    /// Iterates over non-scalar collection declarations.
    pub fn collections(&self) -> impl Iterator<Item = (&str, &CollectionMode)> {
        self.fields
            .iter()
            .filter(|f| *f.collection_mode() != CollectionMode::Scalar)
            .map(|f| (f.name(), f.collection_mode()))
    }

    /// Cross-field predicates evaluated by validation.
    #[must_use]
    pub fn predicates(&self) -> &[Arc<dyn Predicate>] {
        &self.predicates
    }

    /// Looks up a derivation hook by name.
    #[must_use]
    pub fn hook(&self, name: &str) -> Option<&Arc<dyn DerivationHook>> {
        self.hooks.iter().find(|h| h.name() == name)
    }

    /// Names of the registered derivation hooks.
    pub fn hook_names(&self) -> impl Iterator<Item = &str> {
        self.hooks.iter().map(|h| h.name())
    }

    /// Returns true if `other` describes the same record type.
    #[must_use]
    pub fn same_record(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || self.name == other.name
    }
}

impl fmt::Debug for RecordSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSchema")
            .field("name", &self.name)
            .field(
                "fields",
                &self.fields.iter().map(FieldDescriptor::name).collect::<Vec<_>>(),
            )
            .field("predicates", &self.predicates.len())
            .field("hooks", &self.hook_names().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`RecordSchema`].
pub struct RecordSchemaBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
    required: Vec<String>,
    collections: Vec<(String, CollectionMode)>,
    formats: Vec<(String, String)>,
    predicates: Vec<Arc<dyn Predicate>>,
    hooks: Vec<Arc<dyn DerivationHook>>,
}

impl RecordSchemaBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            required: Vec::new(),
            collections: Vec::new(),
            formats: Vec::new(),
            predicates: Vec::new(),
            hooks: Vec::new(),
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Declares fields as required.
    #[must_use]
    pub fn required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(names.into_iter().map(Into::into));
        self
    }

    /// Declares the collection mode of a field.
    #[must_use]
    pub fn collection(mut self, name: impl Into<String>, mode: CollectionMode) -> Self {
        self.collections.push((name.into(), mode));
        self
    }

    /// Declares the numeric output format of a field, e.g. `0.16G`.
    #[must_use]
    pub fn numeric_format(mut self, name: impl Into<String>, spec: impl Into<String>) -> Self {
        self.formats.push((name.into(), spec.into()));
        self
    }

    /// Adds a cross-field predicate.
    #[must_use]
    pub fn predicate(mut self, predicate: impl Predicate + 'static) -> Self {
        self.predicates.push(Arc::new(predicate));
        self
    }

    /// Registers a named derivation hook.
    #[must_use]
    pub fn hook(mut self, hook: impl DerivationHook + 'static) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Checks the declarations and builds the schema.
    ///
    /// # Errors
    /// Returns `SchemaError` if field names repeat, a declaration references
    /// an unknown field, a format specifier is malformed, or a field's
    /// declarations are inconsistent with its kind.
    pub fn build(self) -> Result<Arc<RecordSchema>, SchemaError> {
        let Self {
            name,
            mut fields,
            required,
            collections,
            formats,
            predicates,
            hooks,
        } = self;

        let mut index = HashMap::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            if index.insert(field.name().to_string(), i).is_some() {
                return Err(SchemaError::DuplicateField {
                    record: name,
                    field: field.name().to_string(),
                });
            }
        }

        let lookup = |field: &str, declaration: &'static str| {
            index
                .get(field)
                .copied()
                .ok_or_else(|| SchemaError::UnknownField {
                    record: name.clone(),
                    field: field.to_string(),
                    declaration,
                })
        };

        for field in &required {
            let i = lookup(field, "required set")?;
            fields[i].required = true;
        }
        for (field, mode) in collections {
            let i = lookup(&field, "collection table")?;
            fields[i].collection = mode;
        }
        for (field, spec) in formats {
            let i = lookup(&field, "format table")?;
            let format = NumericFormat::parse(&spec)
                .map_err(|_| SchemaError::InvalidFormat { field, spec })?;
            fields[i].numeric_format = Some(format);
        }

        for field in &fields {
            check_field(&name, field)?;
        }

        for predicate in &predicates {
            for referenced in predicate.fields() {
                lookup(referenced, "predicate")?;
            }
        }

        let mut seen = Vec::with_capacity(hooks.len());
        for hook in &hooks {
            if seen.contains(&hook.name()) {
                return Err(SchemaError::invalid_field(
                    &name,
                    hook.name(),
                    "derivation hook registered twice",
                ));
            }
            seen.push(hook.name());
        }

        Ok(Arc::new(RecordSchema {
            name,
            fields,
            index,
            predicates,
            hooks,
        }))
    }
}

fn check_field(record: &str, field: &FieldDescriptor) -> Result<(), SchemaError> {
    let invalid = |message: &str| Err(SchemaError::invalid_field(record, field.name(), message));
    let primitive = field.kind().primitive();

    match (primitive, field.enum_values()) {
        (Some(PrimitiveKind::EnumString), None) => {
            return invalid("enumerated field without a value set");
        }
        (Some(PrimitiveKind::EnumString), Some(values)) if values.is_empty() => {
            return invalid("enumerated field with an empty value set");
        }
        (Some(PrimitiveKind::EnumString), Some(_)) | (_, None) => {}
        (_, Some(_)) => return invalid("value set declared on a non-enumerated field"),
    }

    if field.integer_range().is_some() && primitive != Some(PrimitiveKind::Integer) {
        return invalid("integer range declared on a non-integer field");
    }
    if field.is_frequency_relative() && primitive != Some(PrimitiveKind::Float) {
        return invalid("frequency-relative field must be a float");
    }
    if let Some(format) = field.numeric_format()
        && !matches!(
            primitive,
            Some(PrimitiveKind::Integer | PrimitiveKind::Float | PrimitiveKind::Complex)
        )
    {
        return invalid(&format!(
            "numeric format {format:?} declared on a non-numeric field"
        ));
    }

    match field.collection_mode() {
        CollectionMode::Scalar => {}
        CollectionMode::ArrayOfScalars { columns } => {
            if *columns == 0 {
                return invalid("array declared with zero columns");
            }
            if !matches!(
                primitive,
                Some(PrimitiveKind::Integer | PrimitiveKind::Float)
            ) {
                return invalid("arrays hold integers or floats");
            }
        }
        CollectionMode::RepeatedChild(tag) => {
            if tag.is_empty() {
                return invalid("repeated child tag is empty");
            }
        }
        CollectionMode::ParameterMap(tag) => {
            if tag.is_empty() {
                return invalid("parameter tag is empty");
            }
            if !matches!(field.kind(), FieldKind::Primitive(PrimitiveKind::String)) {
                return invalid("parameter maps hold strings");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::OrderedFields;
    use sarmeta_core::EnumValues;

    fn processing() -> Arc<RecordSchema> {
        RecordSchema::builder("Processing")
            .field(FieldDescriptor::string("Type"))
            .field(FieldDescriptor::boolean("Applied"))
            .field(FieldDescriptor::string("Parameter"))
            .required(["Type", "Applied"])
            .collection("Parameter", CollectionMode::ParameterMap("Parameter".into()))
            .build()
            .expect("Failed to build schema")
    }

    #[test]
    fn test_build_schema() {
        let schema = processing();
        assert_eq!(schema.name(), "Processing");
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.position("Applied"), Some(1));
        assert_eq!(schema.required().collect::<Vec<_>>(), vec!["Type", "Applied"]);
        let collections: Vec<_> = schema.collections().collect();
        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].0, "Parameter");
    }

    #[test]
    fn test_duplicate_field() {
        let result = RecordSchema::builder("R")
            .field(FieldDescriptor::float("A"))
            .field(FieldDescriptor::integer("A"))
            .build();
        assert!(matches!(result, Err(SchemaError::DuplicateField { .. })));
    }

    #[test]
    fn test_required_unknown_field() {
        let result = RecordSchema::builder("R")
            .field(FieldDescriptor::float("A"))
            .required(["B"])
            .build();
        assert!(matches!(
            result,
            Err(SchemaError::UnknownField {
                declaration: "required set",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_format() {
        let result = RecordSchema::builder("R")
            .field(FieldDescriptor::float("A"))
            .numeric_format("A", "0.16Q")
            .build();
        assert!(matches!(result, Err(SchemaError::InvalidFormat { .. })));
    }

    #[test]
    fn test_format_table_applies() {
        let schema = RecordSchema::builder("R")
            .field(FieldDescriptor::float("A"))
            .numeric_format("A", "0.16G")
            .build()
            .expect("Failed to build schema");
        assert_eq!(
            schema.field("A").and_then(FieldDescriptor::numeric_format),
            Some(&NumericFormat::GENERAL_16)
        );
    }

    #[test]
    fn test_inconsistent_declarations() {
        let range_on_float = RecordSchema::builder("R")
            .field(FieldDescriptor::float("A").range(sarmeta_core::IntegerRange::U8))
            .build();
        assert!(matches!(range_on_float, Err(SchemaError::InvalidField { .. })));

        let empty_enum = RecordSchema::builder("R")
            .field(FieldDescriptor::enumeration(
                "E",
                EnumValues::new(Vec::<String>::new()),
            ))
            .build();
        assert!(matches!(empty_enum, Err(SchemaError::InvalidField { .. })));

        let text_array = RecordSchema::builder("R")
            .field(FieldDescriptor::string("S"))
            .collection("S", CollectionMode::ArrayOfScalars { columns: 2 })
            .build();
        assert!(matches!(text_array, Err(SchemaError::InvalidField { .. })));
    }

    #[test]
    fn test_predicate_fields_checked() {
        let result = RecordSchema::builder("R")
            .field(FieldDescriptor::float("Low"))
            .predicate(OrderedFields::new("Low", "High"))
            .build();
        assert!(matches!(
            result,
            Err(SchemaError::UnknownField {
                declaration: "predicate",
                ..
            })
        ));
    }

    #[test]
    fn test_nested_record_field() {
        let schema = RecordSchema::builder("Outer")
            .field(FieldDescriptor::record("Processing", processing()))
            .collection("Processing", CollectionMode::RepeatedChild("Processing".into()))
            .build()
            .expect("Failed to build schema");
        let field = schema.field("Processing").expect("Failed to find field");
        assert_eq!(
            field.kind().record().map(|s| s.name()),
            Some("Processing")
        );
        assert!(format!("{schema:?}").contains("Outer"));
    }
}
