//! Tablestore Core Library
//!
//! This crate provides the record types, property values, storage encodings
//! and error handling shared by the tablestore query engine.
//!
//! # Modules
//!
//! - `error` - Error types and result aliases
//! - `property` - Entity property values
//! - `types` - Entities, table descriptors and the query context
//! - `temporal` - Timestamp parsing for DateTime values
//! - `encoding` - Stored Guid and Binary encodings

pub mod encoding;
pub mod error;
pub mod property;
pub mod temporal;
pub mod types;

pub use error::{Error, Result};
pub use property::{Properties, PropertyValue};
pub use types::{Entity, QueryContext, Record, Table};
