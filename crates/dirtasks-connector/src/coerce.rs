//! Attribute coercion
//!
//! Converts raw attribute values into the representation requested by the
//! caller's attribute specs.

use uuid::Uuid;

use crate::error::{ConnectorError, ConnectorResult};
use crate::operation::{AttributeSpec, AttributeValue, DirectoryEntry, EntryAttribute, RawEntry};
use crate::types::ReturnType;

/// Find the first spec whose key matches `name` case-insensitively.
pub fn find_spec<'a>(name: &str, specs: &'a [AttributeSpec]) -> Option<&'a AttributeSpec> {
    specs.iter().find(|s| s.key.eq_ignore_ascii_case(name))
}

/// Coerce the raw values of one attribute.
///
/// Byte and GUID representations use the first value only; any further
/// values are ignored. An attribute without values (types-only searches)
/// yields an empty list whatever the requested representation.
pub fn coerce(
    name: &str,
    raw_values: &[Vec<u8>],
    specs: &[AttributeSpec],
) -> ConnectorResult<AttributeValue> {
    let return_type = find_spec(name, specs)
        .map(|s| s.return_type)
        .unwrap_or_default();

    let first = match raw_values.first() {
        Some(first) => first,
        None => return Ok(AttributeValue::List(Vec::new())),
    };

    match return_type {
        ReturnType::String => Ok(to_strings(raw_values)),
        ReturnType::Byte => Ok(AttributeValue::Scalar(hex::encode_upper(first))),
        ReturnType::Guid => guid_string(name, first).map(AttributeValue::Scalar),
    }
}

fn to_strings(raw_values: &[Vec<u8>]) -> AttributeValue {
    match raw_values {
        [single] => AttributeValue::Scalar(String::from_utf8_lossy(single).into_owned()),
        many => AttributeValue::List(
            many.iter()
                .map(|v| String::from_utf8_lossy(v).into_owned())
                .collect(),
        ),
    }
}

/// Render a 16-byte Microsoft GUID (first three fields little-endian, as AD
/// stores `objectGUID`) in canonical hyphenated lowercase form.
pub fn guid_string(name: &str, bytes: &[u8]) -> ConnectorResult<String> {
    let array: [u8; 16] = bytes.try_into().map_err(|_| ConnectorError::InvalidData {
        attribute: name.to_string(),
        message: format!("expected 16 bytes for a GUID, got {}", bytes.len()),
    })?;

    Ok(Uuid::from_bytes_le(array).hyphenated().to_string())
}

/// Coerce every attribute of a raw entry, preserving attribute order.
pub fn coerce_entry(entry: RawEntry, specs: &[AttributeSpec]) -> ConnectorResult<DirectoryEntry> {
    let attributes = entry
        .attributes
        .into_iter()
        .map(|attr| {
            let value = coerce(&attr.name, &attr.values, specs)?;
            Ok(EntryAttribute {
                key: attr.name,
                value,
            })
        })
        .collect::<ConnectorResult<Vec<_>>>()?;

    Ok(DirectoryEntry {
        distinguished_name: entry.dn,
        attributes,
    })
}
