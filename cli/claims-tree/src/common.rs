use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::Deserialize;

use crate::codec::{Record, ADDRESS_SIZE};
use crate::error::{Error, Result};
use crate::hasher::Hash;

/// Parses an Ethereum address from a hex string.
///
/// # Arguments
/// * `addr_str` - The address string, `0x` followed by 40 hex characters (any case)
///
/// # Returns
/// A 20-byte array representing the address
///
/// # Errors
/// Returns `Error::Encoding` if the prefix is missing, the length is not 40 hex
/// chars, or the string contains invalid hex
pub fn parse_address(addr_str: &str) -> Result<[u8; ADDRESS_SIZE]> {
    let trimmed = addr_str.trim();
    let cleaned = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| Error::Encoding(format!("address '{trimmed}' must start with 0x")))?;
    if cleaned.len() != 2 * ADDRESS_SIZE {
        return Err(Error::Encoding(format!(
            "invalid address length: expected 40 hex chars, got {}",
            cleaned.len()
        )));
    }
    let mut address = [0u8; ADDRESS_SIZE];
    hex::decode_to_slice(cleaned, &mut address)
        .map_err(|e| Error::Encoding(format!("invalid hex encoding in address: {e}")))?;
    Ok(address)
}

/// Parses a 32-byte hash (root or proof element) from a `0x` hex string.
pub fn parse_hash(hash_str: &str) -> Result<Hash> {
    let trimmed = hash_str.trim();
    let cleaned = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if cleaned.len() != 64 {
        return Err(Error::Encoding(format!(
            "invalid hash length: expected 64 hex chars, got {}",
            cleaned.len()
        )));
    }
    let mut hash = [0u8; 32];
    hex::decode_to_slice(cleaned, &mut hash)
        .map_err(|e| Error::Encoding(format!("invalid hex encoding in hash: {e}")))?;
    Ok(hash)
}

/// Lowercase `0x`-prefixed hex encoding.
pub fn hex_encode<T: AsRef<[u8]>>(bytes: T) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Writes `contents` to `path` through a temporary sibling file and a rename,
/// so readers never observe a half-written file.
pub fn write_file_atomic(path: &Path, contents: &str) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path)?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct JsonRecord {
    address: String,
    index: serde_json::Value,
    amount: serde_json::Value,
}

/// Numbers may be given as JSON integers or decimal strings.
fn json_number_text(value: &serde_json::Value, field: &str) -> Result<String> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) if n.is_u64() => Ok(n.to_string()),
        other => Err(Error::Encoding(format!(
            "{field} must be an unsigned integer or decimal string, got {other}"
        ))),
    }
}

/// Parses a JSON array of `{ "address", "index", "amount" }` objects.
pub fn parse_records_json(text: &str) -> Result<Vec<Record>> {
    let raw: Vec<JsonRecord> = serde_json::from_str(text)?;
    raw.iter()
        .map(|r| {
            Record::parse(
                &r.address,
                &json_number_text(&r.index, "index")?,
                &json_number_text(&r.amount, "amount")?,
            )
        })
        .collect()
}

/// Parses `address,index,amount` lines.
///
/// Blank lines and `#` comments are skipped, as is a leading header line
/// starting with `address`.
pub fn parse_records_csv(text: &str) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for (line_num, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if records.is_empty() && trimmed.to_ascii_lowercase().starts_with("address") {
            continue;
        }
        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(Error::Encoding(format!(
                "invalid format at line {}: expected 'address,index,amount', got '{}'",
                line_num + 1,
                trimmed
            )));
        }
        let record = Record::parse(parts[0], parts[1], parts[2]).map_err(|e| {
            Error::Encoding(format!("line {}: {}", line_num + 1, e))
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Loads records from a file, choosing JSON or CSV by the `.json` extension.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let text = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        parse_records_json(&text)
    } else {
        parse_records_csv(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    #[test]
    fn test_parse_address_with_prefix() {
        let addr = "0x1234567890abcdef1234567890ABCDEF12345678";
        let result = parse_address(addr).unwrap();
        assert_eq!(result[0], 0x12);
        assert_eq!(result[19], 0x78);
    }

    #[test]
    fn test_parse_address_requires_prefix() {
        let addr = "1234567890abcdef1234567890abcdef12345678";
        assert!(parse_address(addr).is_err());
    }

    #[test]
    fn test_parse_address_invalid_length() {
        assert!(parse_address("0x1234").is_err());
    }

    #[test]
    fn test_parse_address_invalid_hex() {
        let addr = "0xghijklmnopqrstuvwxyz1234567890abcdef1234";
        assert!(parse_address(addr).is_err());
    }

    #[test]
    fn test_parse_hash() {
        let text = format!("0x{}", "ab".repeat(32));
        assert_eq!(parse_hash(&text).unwrap(), [0xab; 32]);
        assert!(parse_hash("0xabcd").is_err());
    }

    #[test]
    fn test_hex_encode() {
        assert_eq!(hex_encode([0xde, 0xad]), "0xdead");
    }

    #[test]
    fn test_parse_records_csv() {
        let text = "\
address,index,amount
# first batch
0x1234567890123456789012345678901234567890,0,100

0x2345678901234567890123456789012345678901, 1 , 200
";
        let records = parse_records_csv(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].index, 1);
        assert_eq!(records[1].amount, U256::from(200u64));
    }

    #[test]
    fn test_parse_records_csv_bad_line() {
        let text = "0x1234567890123456789012345678901234567890,0\n";
        assert!(matches!(parse_records_csv(text), Err(Error::Encoding(_))));
    }

    #[test]
    fn test_parse_records_json() {
        let text = r#"[
            {"address": "0x1234567890123456789012345678901234567890", "index": 0, "amount": 100},
            {"address": "0x2345678901234567890123456789012345678901", "index": "1", "amount": "200000000000000000000000000000"}
        ]"#;
        let records = parse_records_json(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].amount, U256::from(100u64));
        assert_eq!(
            records[1].amount.to_string(),
            "200000000000000000000000000000"
        );
    }

    #[test]
    fn test_parse_records_json_rejects_negative() {
        let text = r#"[{"address": "0x1234567890123456789012345678901234567890", "index": 0, "amount": -5}]"#;
        assert!(matches!(parse_records_json(text), Err(Error::Encoding(_))));
    }

    #[test]
    fn test_write_file_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_file_atomic(&path, "{}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
        assert!(!path.with_extension("tmp").exists());
    }
}
