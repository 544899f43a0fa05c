//! Stored encodings for Guid and Binary properties
//!
//! Guid properties are persisted as the base64 encoding of their textual
//! form. Older stores kept the raw hyphenated string instead, and both
//! encodings must remain queryable. Binary properties are persisted as
//! base64 while filter literals spell them in hex.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use uuid::Uuid;

/// Length of a hyphenated GUID (8-4-4-4-12)
const HYPHENATED_GUID_LEN: usize = 36;

/// Returns true if the value is a raw hyphenated GUID string
pub fn is_raw_guid(value: &str) -> bool {
    value.len() == HYPHENATED_GUID_LEN && Uuid::try_parse(value).is_ok()
}

/// Encode a GUID literal the way modern stores persist it
pub fn encode_guid(guid: &str) -> String {
    STANDARD.encode(guid.as_bytes())
}

/// Convert a hex string to the base64 encoding used for stored binary data
pub fn hex_to_base64(hex_value: &str) -> Option<String> {
    hex::decode(hex_value)
        .ok()
        .map(|bytes| STANDARD.encode(bytes))
}
