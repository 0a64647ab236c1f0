use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};

/// Canonical field mapping: field name -> type tag, in declaration order
pub type FieldMap = IndexMap<String, String>;

/// Foreign key target of a field
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct FieldReference {
    pub table: String,
    pub field: String,
}

/// Column of a table
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_foreign: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<FieldReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            is_primary: None,
            is_foreign: None,
            references: None,
            nullable: None,
            default_value: None,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary = Some(true);
        self.nullable = Some(false);
        self
    }

    /// Marks the field as a foreign key pointing at `table.field`
    pub fn references(mut self, table: impl Into<String>, field: impl Into<String>) -> Self {
        self.is_foreign = Some(true);
        self.references = Some(FieldReference {
            table: table.into(),
            field: field.into(),
        });
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    pub fn with_default(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// Field collection of a table.
///
/// Documents may carry either a list of field records or the compact
/// `{"name": "type"}` object; both normalize through [`Fields::to_map`].
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum Fields {
    Records(Vec<Field>),
    Mapping(FieldMap),
}

impl Default for Fields {
    fn default() -> Self {
        Fields::Mapping(FieldMap::new())
    }
}

impl Fields {
    /// Builds the record form, rejecting repeated field names
    pub fn try_from_records(records: Vec<Field>) -> Result<Self> {
        if let Some(field) = first_duplicate(records.iter().map(|f| f.name.as_str())) {
            return Err(Error::DuplicateField {
                table: None,
                field: field.to_string(),
            });
        }
        Ok(Fields::Records(records))
    }

    pub fn len(&self) -> usize {
        match self {
            Fields::Records(records) => records.len(),
            Fields::Mapping(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Canonical name -> type mapping.
    ///
    /// For records a repeated name overwrites the earlier type but keeps the
    /// position of its first occurrence.
    pub fn to_map(&self) -> FieldMap {
        match self {
            Fields::Mapping(map) => map.clone(),
            Fields::Records(records) => records
                .iter()
                .map(|f| (f.name.clone(), f.data_type.clone()))
                .collect(),
        }
    }

    /// Field names that occur more than once (record form only)
    pub fn duplicate_names(&self) -> Vec<&str> {
        let Fields::Records(records) = self else {
            return Vec::new();
        };
        let mut seen = std::collections::HashSet::new();
        let mut reported = std::collections::HashSet::new();
        records
            .iter()
            .map(|f| f.name.as_str())
            .filter(|name| !seen.insert(*name) && reported.insert(*name))
            .collect()
    }
}

impl From<Vec<Field>> for Fields {
    fn from(records: Vec<Field>) -> Self {
        Fields::Records(records)
    }
}

impl From<FieldMap> for Fields {
    fn from(map: FieldMap) -> Self {
        Fields::Mapping(map)
    }
}

/// Table of the schema; its name is its identity
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Fields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
}

impl Table {
    pub fn new(name: impl Into<String>, fields: impl Into<Fields>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            description: None,
            fields: fields.into(),
            primary_key: None,
        }
    }

    /// Like [`Table::new`] but fails on repeated field names
    pub fn try_new(name: impl Into<String>, fields: impl Into<Fields>) -> Result<Self> {
        let table = Self::new(name, fields);
        if let Some(field) = table.fields.duplicate_names().first() {
            return Err(Error::DuplicateField {
                table: Some(table.name.clone()),
                field: field.to_string(),
            });
        }
        Ok(table)
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = Some(primary_key.into());
        self
    }

    /// Display label: the display name when non-empty, else the table name
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.name)
    }
}

/// Kind of association between two tables
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RelationKind {
    #[serde(rename = "one-to-one")]
    #[display("one-to-one")]
    OneToOne,
    #[serde(rename = "one-to-many")]
    #[display("one-to-many")]
    OneToMany,
    #[serde(rename = "many-to-many")]
    #[display("many-to-many")]
    ManyToMany,
    #[serde(rename = "belongs_to")]
    #[display("belongs_to")]
    BelongsTo,
}

/// Directed association between two tables, referenced by name
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: RelationKind,
    pub source_field: String,
    pub target_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Relation {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        kind: RelationKind,
        source_field: impl Into<String>,
        target_field: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            source_field: source_field.into(),
            target_field: target_field.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Edge label: the display name when non-empty, else the relation kind tag
    pub fn label(&self) -> String {
        match self.display_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.kind.to_string(),
        }
    }
}

/// Descriptive header of a schema document
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct SchemaMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

impl SchemaMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_created(mut self, created: impl Into<String>) -> Self {
        self.created = Some(created.into());
        self
    }
}

/// Whole database description: metadata, tables and relations
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct Schema {
    #[serde(default)]
    pub metadata: SchemaMetadata,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl Schema {
    /// Assembles a schema, rejecting repeated table names
    pub fn try_new(
        metadata: SchemaMetadata,
        tables: Vec<Table>,
        relations: Vec<Relation>,
    ) -> Result<Self> {
        let schema = Self {
            metadata,
            tables,
            relations,
        };
        schema.ensure_unique_tables()?;
        Ok(schema)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Fails with [`Error::DuplicateTable`] on the first repeated table name
    pub fn ensure_unique_tables(&self) -> Result<()> {
        match first_duplicate(self.tables.iter().map(|t| t.name.as_str())) {
            Some(name) => Err(Error::DuplicateTable(name.to_string())),
            None => Ok(()),
        }
    }
}

fn first_duplicate<'a>(names: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = std::collections::HashSet::new();
    names.into_iter().find(|name| !seen.insert(*name))
}
