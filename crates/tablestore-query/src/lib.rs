//! Tablestore Query Engine
//!
//! Parses and evaluates OData `$filter` expressions against table entities
//! and table descriptors.
//!
//! # Overview
//!
//! The query engine implements:
//! - An on-demand lexer for the filter grammar
//! - A recursive descent parser producing an immutable tree
//! - Typed literal comparison (Int64, DateTime, Guid, Binary)
//! - Validation and comparison limits at compile time
//! - Evaluation of compiled filters over records
//!
//! ```
//! use tablestore_core::Entity;
//! use tablestore_query::{FilterConfig, QueryFilter};
//!
//! let filter = QueryFilter::compile(Some("PartitionKey eq 'p' and n gt 3"), &FilterConfig::default())?;
//! let entity = Entity::new("p", "r").with_property("n", 5);
//! assert!(filter.matches(&entity));
//! # Ok::<(), tablestore_core::Error>(())
//! ```

pub mod ast;
pub mod compare;
pub mod config;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod validator;

pub use ast::{BinaryOp, QueryNode, ValueNode};
pub use compare::Comparison;
pub use config::FilterConfig;
pub use interpreter::{execute_query, QueryFilter};
pub use lexer::{tokenize, QueryLexer, Token, TokenKind};
pub use parser::parse_query;
pub use validator::{count_comparisons, count_identifier_references, validate_query_tree};
