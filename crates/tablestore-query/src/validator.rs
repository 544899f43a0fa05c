//! Semantic checks on parsed filters

use crate::ast::QueryNode;
use tablestore_core::{Error, Result};

/// Reject trees that never reference a record field.
///
/// A filter such as `1 eq 1` can never tell two records apart, so it is
/// treated as a malformed query rather than as accept-all or reject-all.
pub fn validate_query_tree(root: &QueryNode) -> Result<()> {
    if count_identifier_references(root) == 0 {
        return Err(Error::InvalidQuery(
            "filter must reference at least one property".to_string(),
        ));
    }
    Ok(())
}

/// Number of identifier nodes (`TableName` included) in the tree
pub fn count_identifier_references(node: &QueryNode) -> usize {
    match node {
        QueryNode::Value(value) => usize::from(value.is_identifier()),
        QueryNode::Group(child) | QueryNode::Not(child) => count_identifier_references(child),
        QueryNode::Binary { left, right, .. } => {
            count_identifier_references(left) + count_identifier_references(right)
        }
    }
}

/// Number of comparison operators (`eq`, `ne`, `gt`, `ge`, `lt`, `le`) in the tree
pub fn count_comparisons(node: &QueryNode) -> usize {
    match node {
        QueryNode::Value(_) => 0,
        QueryNode::Group(child) | QueryNode::Not(child) => count_comparisons(child),
        QueryNode::Binary { op, left, right } => {
            usize::from(op.is_comparison()) + count_comparisons(left) + count_comparisons(right)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_query;

    #[test]
    fn test_literal_only_query_is_rejected() {
        let tree = parse_query("1 eq 1").unwrap();
        let err = validate_query_tree(&tree).unwrap_err();
        assert!(err.is_semantic_error());

        let tree = parse_query("not (true or 'a' lt 'b')").unwrap();
        assert!(validate_query_tree(&tree).is_err());
    }

    #[test]
    fn test_identifier_anywhere_is_accepted() {
        for query in [
            "PartitionKey eq 'p'",
            "1 eq 1 or flag",
            "not (TableName eq 'tbl')",
            "(true and (false or (n gt 3L)))",
        ] {
            let tree = parse_query(query).unwrap();
            assert!(validate_query_tree(&tree).is_ok(), "query: {}", query);
        }
    }

    #[test]
    fn test_count_identifier_references() {
        let tree = parse_query("a eq b and not (c lt 1 or TableName eq 'x')").unwrap();
        assert_eq!(count_identifier_references(&tree), 4);
    }

    #[test]
    fn test_count_comparisons() {
        let tree = parse_query("a eq 1 and (b ne 2 or not c gt 3) and flag").unwrap();
        assert_eq!(count_comparisons(&tree), 3);
        assert_eq!(count_comparisons(&parse_query("flag").unwrap()), 0);
    }
}
