//! Tablestore - Table storage `$filter` engine
//!
//! This is the main library crate that re-exports all tablestore components.

pub use tablestore_core as core;
pub use tablestore_query as query;

// Re-export commonly used types
pub use tablestore_core::{Entity, Error, Properties, PropertyValue, QueryContext, Record, Result, Table};

pub use tablestore_query::{FilterConfig, QueryFilter, QueryNode, execute_query, parse_query};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_json_records() {
        let records: Vec<Record> = serde_json::from_str(
            r#"[
                {"PartitionKey": "p", "RowKey": "r", "properties": {"n": 5, "active": true}},
                {"PartitionKey": "p", "RowKey": "s", "properties": {"n": 1}},
                {"table": "people", "account": "devstoreaccount1"}
            ]"#,
        )
        .unwrap();

        let filter = QueryFilter::compile(Some("n gt 3 and active"), &FilterConfig::default()).unwrap();
        let keys: Vec<&str> = filter
            .filter(&records)
            .filter_map(|record| match record {
                Record::Entity(entity) => Some(entity.row_key.as_str()),
                Record::Table(_) => None,
            })
            .collect();

        assert_eq!(keys, vec!["r"]);
    }

    #[test]
    fn test_parse_and_execute() {
        let tree = parse_query("PartitionKey eq 'p' and n gt 3").unwrap();
        let entity = Entity::new("p", "r").with_property("n", 5);
        assert!(execute_query(&QueryContext::from(&entity), &tree));
    }
}
