//! Support code for the `tablestore-filter` command
//!
//! Loads record files and streams the records accepted by a compiled filter
//! as JSON lines.

use std::io::Write;
use std::path::Path;
use tablestore_core::{Error, Record, Result};
use tablestore_query::{FilterConfig, QueryFilter};
use tracing::{debug, info};

/// Parse a JSON array of entities and table descriptors
pub fn parse_records(json: &str) -> Result<Vec<Record>> {
    Ok(serde_json::from_str(json)?)
}

/// Load a JSON array of records from a file
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let records = parse_records(&contents)?;

    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Load the filter configuration, falling back to the defaults
pub fn load_config(path: Option<&Path>) -> Result<FilterConfig> {
    match path {
        Some(path) => FilterConfig::from_file(path),
        None => Ok(FilterConfig::default()),
    }
}

/// Write every record accepted by `filter` as one JSON line.
///
/// Returns the number of records written.
pub fn write_matches<W: Write>(filter: &QueryFilter, records: &[Record], mut out: W) -> Result<usize> {
    let mut written = 0;

    for record in filter.filter(records) {
        serde_json::to_writer(&mut out, record)?;
        out.write_all(b"\n")?;
        written += 1;
    }

    out.flush()?;
    Ok(written)
}

/// Compile `filter`, evaluate it over the record file and write the matches
pub fn run<W: Write>(
    filter: &str,
    records_path: &Path,
    config_path: Option<&Path>,
    out: W,
) -> Result<usize> {
    let config = load_config(config_path)?;
    let compiled = QueryFilter::compile(Some(filter), &config)?;
    let records = load_records(records_path)?;

    let written = write_matches(&compiled, &records, out)?;
    info!("{} of {} records matched", written, records.len());
    Ok(written)
}

/// Process exit status for an error: 2 for rejected filters, 1 otherwise
pub fn exit_code(error: &Error) -> i32 {
    if error.is_query_error() { 2 } else { 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablestore_core::{Entity, Table};
    use tempfile::NamedTempFile;

    const RECORDS: &str = r#"[
        {"PartitionKey": "p", "RowKey": "1", "properties": {"n": 1}},
        {"PartitionKey": "p", "RowKey": "2", "properties": {"n": 7, "name": "seven"}},
        {"table": "orders", "account": "devstoreaccount1"},
        {"PartitionKey": "q", "RowKey": "3"}
    ]"#;

    fn records_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_records() {
        let records = parse_records(RECORDS).unwrap();
        assert_eq!(records.len(), 4);
        assert!(matches!(&records[2], Record::Table(t) if t.name == "orders"));
        assert_eq!(records[3], Record::Entity(Entity::new("q", "3")));
    }

    #[test]
    fn test_load_records() {
        let file = records_file(RECORDS);
        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn test_load_invalid_records() {
        let file = records_file("{\"not\": \"an array\"}");
        let err = load_records(file.path()).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));

        let dir = tempfile::tempdir().unwrap();
        let err = load_records(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_write_matches() {
        let records = vec![
            Record::Entity(Entity::new("p", "1").with_property("n", 7)),
            Record::Table(Table::new("orders", "acct")),
        ];
        let filter = QueryFilter::compile(Some("n gt 3"), &FilterConfig::default()).unwrap();

        let mut out = Vec::new();
        assert_eq!(write_matches(&filter, &records, &mut out).unwrap(), 1);

        let line = String::from_utf8(out).unwrap();
        let parsed: Record = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(parsed, records[0]);
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn test_run() {
        let file = records_file(RECORDS);

        let mut out = Vec::new();
        let written = run("PartitionKey eq 'p' and n gt 3", file.path(), None, &mut out).unwrap();
        assert_eq!(written, 1);
        assert!(String::from_utf8(out).unwrap().contains("\"seven\""));

        let written = run("TableName eq 'orders'", file.path(), None, std::io::sink()).unwrap();
        assert_eq!(written, 1);
    }

    #[test]
    fn test_run_with_config() {
        let file = records_file(RECORDS);
        let config = records_file(r#"{"validate_identifiers": false}"#);

        let written = run("true", file.path(), Some(config.path()), std::io::sink()).unwrap();
        assert_eq!(written, 4);

        let err = run("true", file.path(), None, std::io::sink()).unwrap_err();
        assert_eq!(exit_code(&err), 2);
    }

    #[test]
    fn test_exit_codes() {
        let file = records_file(RECORDS);
        let err = run("a eq", file.path(), None, std::io::sink()).unwrap_err();
        assert_eq!(exit_code(&err), 2);

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = run("a eq 1", &missing, None, std::io::sink()).unwrap_err();
        assert_eq!(exit_code(&err), 1);
    }
}
