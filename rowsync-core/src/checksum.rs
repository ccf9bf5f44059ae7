//! Row content checksums
//!
//! Change classification compares a row's current checksum against the
//! last recorded one. The checksum covers the full field set and is
//! order-independent: pairs are hashed in sorted column-name order, so
//! a source that happens to emit columns in a different order does not
//! register as a change. Changing any single field value changes the
//! checksum.

use crate::row::Row;
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 content checksum of a row
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Checksum(String);

impl Checksum {
    /// The hex digest string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Checksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the content checksum of a row
///
/// Each field contributes its column name and canonical value text,
/// NUL-separated so adjacent fields cannot collide by concatenation.
/// `Row` iterates in sorted column order, which makes the digest
/// independent of source emission order.
pub fn row_checksum(row: &Row) -> Checksum {
    let mut hasher = Sha256::new();
    for (name, value) in row.iter() {
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
        hasher.update(value.canonical_text().as_bytes());
        hasher.update([0u8]);
    }
    Checksum(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_checksum_stable_across_insert_order() {
        let a = Row::new().with("A.x", "1").with("B.y", "2");
        let b = Row::new().with("B.y", "2").with("A.x", "1");
        assert_eq!(row_checksum(&a), row_checksum(&b));
    }

    #[test]
    fn test_checksum_sensitive_to_any_field() {
        let base = Row::new()
            .with("Device.deviceid", "D1")
            .with("Device.devicetype", "Temp");
        let changed = Row::new()
            .with("Device.deviceid", "D1")
            .with("Device.devicetype", "Temp2");
        assert_ne!(row_checksum(&base), row_checksum(&changed));
    }

    #[test]
    fn test_checksum_distinguishes_name_value_boundary() {
        // "ab" + "c" must not hash like "a" + "bc"
        let a = Row::new().with("T.ab", "c");
        let b = Row::new().with("T.a", "bc");
        assert_ne!(row_checksum(&a), row_checksum(&b));
    }

    #[test]
    fn test_null_and_missing_differ() {
        let with_null = Row::new().with("T.a", Value::Null);
        let empty = Row::new();
        assert_ne!(row_checksum(&with_null), row_checksum(&empty));
    }
}
