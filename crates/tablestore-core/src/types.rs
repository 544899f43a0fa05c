//! Record types a filter is evaluated against
//!
//! The persistence layer hands the query engine either an entity or a table
//! descriptor. Both are read-only from the engine's point of view.

use crate::property::{Properties, PropertyValue};
use serde::{Deserialize, Serialize};

/// Name of the built-in partition key identifier
pub const PARTITION_KEY: &str = "PartitionKey";

/// Name of the built-in row key identifier
pub const ROW_KEY: &str = "RowKey";

/// Name of the built-in table name identifier
pub const TABLE_NAME: &str = "TableName";

/// A stored entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "PartitionKey")]
    pub partition_key: String,

    #[serde(rename = "RowKey")]
    pub row_key: String,

    #[serde(default)]
    pub properties: Properties,
}

impl Entity {
    /// Create an entity without properties
    pub fn new<P: Into<String>, R: Into<String>>(partition_key: P, row_key: R) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
            properties: Properties::new(),
        }
    }

    /// Builder: add a property
    pub fn with_property<K: Into<String>, V: Into<PropertyValue>>(mut self, key: K, value: V) -> Self {
        self.properties.set(key, value);
        self
    }
}

/// A table descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    #[serde(rename = "table")]
    pub name: String,

    pub account: String,
}

impl Table {
    /// Create a new table descriptor
    pub fn new<N: Into<String>, A: Into<String>>(name: N, account: A) -> Self {
        Self {
            name: name.into(),
            account: account.into(),
        }
    }
}

/// Either kind of record, as found in a record file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Record {
    Entity(Entity),
    Table(Table),
}

/// The record a parsed filter is evaluated against
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryContext<'a> {
    Entity(&'a Entity),
    Table(&'a Table),
}

impl<'a> QueryContext<'a> {
    /// Returns true if this context is an entity
    pub fn is_entity(&self) -> bool {
        matches!(self, QueryContext::Entity(_))
    }

    /// Returns true if this context is a table descriptor
    pub fn is_table(&self) -> bool {
        matches!(self, QueryContext::Table(_))
    }

    /// Resolve an identifier against the record.
    ///
    /// `PartitionKey` and `RowKey` map to the entity keys, every other name
    /// to the entity's properties. Table descriptors expose no identifiers.
    pub fn lookup(&self, name: &str) -> Option<PropertyValue> {
        match self {
            QueryContext::Entity(entity) => match name {
                PARTITION_KEY => Some(PropertyValue::String(entity.partition_key.clone())),
                ROW_KEY => Some(PropertyValue::String(entity.row_key.clone())),
                _ => entity.properties.get(name).cloned(),
            },
            QueryContext::Table(_) => None,
        }
    }

    /// The table name, present only on table descriptors
    pub fn table_name(&self) -> Option<&'a str> {
        match self {
            QueryContext::Entity(_) => None,
            QueryContext::Table(table) => Some(&table.name),
        }
    }
}

impl<'a> From<&'a Entity> for QueryContext<'a> {
    fn from(entity: &'a Entity) -> Self {
        QueryContext::Entity(entity)
    }
}

impl<'a> From<&'a Table> for QueryContext<'a> {
    fn from(table: &'a Table) -> Self {
        QueryContext::Table(table)
    }
}

impl<'a> From<&'a Record> for QueryContext<'a> {
    fn from(record: &'a Record) -> Self {
        match record {
            Record::Entity(entity) => QueryContext::Entity(entity),
            Record::Table(table) => QueryContext::Table(table),
        }
    }
}
