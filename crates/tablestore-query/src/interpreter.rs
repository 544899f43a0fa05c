//! Filter evaluation
//!
//! [`execute_query`] runs a parsed tree against one record. [`QueryFilter`]
//! wraps the whole pipeline (parse, validate, limit check) behind a single
//! compiled value that listing code can hold and reuse across records and
//! threads.

use crate::ast::QueryNode;
use crate::config::FilterConfig;
use crate::parser::parse_query;
use crate::validator::{count_comparisons, validate_query_tree};
use std::fmt;
use tablestore_core::{Error, QueryContext, Result};
use tracing::{debug, trace, warn};

/// Evaluate a parsed filter against a record
pub fn execute_query(context: &QueryContext<'_>, root: &QueryNode) -> bool {
    root.is_truthy(context)
}

/// A compiled `$filter`
#[derive(Debug, Clone, PartialEq)]
pub struct QueryFilter {
    /// `None` accepts every record
    root: Option<QueryNode>,
}

impl QueryFilter {
    /// A filter that accepts every record
    pub fn accept_all() -> Self {
        Self { root: None }
    }

    /// Compile a filter string.
    ///
    /// An absent or blank filter accepts every record. Anything else must
    /// parse, pass validation (unless disabled) and stay within the
    /// configured comparison limit.
    pub fn compile(filter: Option<&str>, config: &FilterConfig) -> Result<Self> {
        let Some(filter) = filter.filter(|f| !f.trim().is_empty()) else {
            debug!("No filter given, accepting all records");
            return Ok(Self::accept_all());
        };

        let root = Self::check(filter, config).inspect_err(|e| {
            warn!("Rejected filter {:?}: {}", filter, e);
        })?;

        debug!("Compiled filter {:?} as {}", filter, root);
        Ok(Self { root: Some(root) })
    }

    fn check(filter: &str, config: &FilterConfig) -> Result<QueryNode> {
        let root = parse_query(filter)?;

        if config.validate_identifiers {
            validate_query_tree(&root)?;
        }

        if let Some(limit) = config.max_comparisons {
            let comparisons = count_comparisons(&root);
            if comparisons > limit {
                return Err(Error::InvalidQuery(format!(
                    "filter has {} comparisons, the limit is {}",
                    comparisons, limit
                )));
            }
        }

        Ok(root)
    }

    pub fn is_accept_all(&self) -> bool {
        self.root.is_none()
    }

    /// Whether a record satisfies the filter
    pub fn matches<'c>(&self, context: impl Into<QueryContext<'c>>) -> bool {
        let context = context.into();
        let accepted = self
            .root
            .as_ref()
            .is_none_or(|root| execute_query(&context, root));

        trace!(accepted, "Evaluated filter against {:?}", context);
        accepted
    }

    /// Lazily keep the records that satisfy the filter
    pub fn filter<'c, I>(&self, records: I) -> impl Iterator<Item = I::Item>
    where
        I: IntoIterator,
        I::Item: Copy + Into<QueryContext<'c>>,
    {
        records.into_iter().filter(move |record| self.matches(*record))
    }
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self::accept_all()
    }
}

impl fmt::Display for QueryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => write!(f, "{}", root),
            None => f.write_str("(all)"),
        }
    }
}
