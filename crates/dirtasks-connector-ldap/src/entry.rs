//! Search result decoding
//!
//! `SearchEntry::construct` collects attributes into hash maps, which loses
//! the server's attribute order and splits binary values from text ones.
//! Entries are decoded here straight from the BER structure instead:
//!
//! ```text
//! SearchResultEntry ::= [APPLICATION 4] SEQUENCE {
//!     objectName      LDAPDN,
//!     attributes      SEQUENCE OF SEQUENCE {
//!         type    AttributeDescription,
//!         vals    SET OF AttributeValue } }
//! ```

use dirtasks_connector::error::{ConnectorError, ConnectorResult};
use dirtasks_connector::operation::{PageCursor, RawAttribute, RawEntry};
use ldap3::asn1::{parse_tag, parse_uint, StructureTag, TagClass, Types};
use ldap3::controls::{Control, ControlType, PagedResults};
use ldap3::ResultEntry;

/// OID of the RFC 2696 paged results control.
pub const PAGED_RESULTS_OID: &str = "1.2.840.113556.1.4.319";

const SEARCH_RESULT_ENTRY: u64 = 4;

/// Decode every search result entry, skipping referrals and intermediate
/// messages.
pub fn decode_entries(entries: Vec<ResultEntry>) -> ConnectorResult<Vec<RawEntry>> {
    entries
        .into_iter()
        .filter(|e| !e.is_ref() && !e.is_intermediate())
        .map(decode_entry)
        .collect()
}

/// Decode one search result entry, preserving attribute and value order.
pub fn decode_entry(entry: ResultEntry) -> ConnectorResult<RawEntry> {
    let mut parts = entry
        .0
        .match_id(SEARCH_RESULT_ENTRY)
        .and_then(StructureTag::expect_constructed)
        .ok_or_else(|| ConnectorError::protocol("search result is not an entry"))?
        .into_iter();

    let dn = parts
        .next()
        .and_then(StructureTag::expect_primitive)
        .ok_or_else(|| ConnectorError::protocol("entry without a distinguished name"))?;
    let dn = String::from_utf8(dn)
        .map_err(|_| ConnectorError::protocol("distinguished name is not valid UTF-8"))?;

    let attributes = match parts.next() {
        Some(list) => list
            .expect_constructed()
            .ok_or_else(|| {
                ConnectorError::protocol(format!("malformed attribute list for {}", dn))
            })?
            .into_iter()
            .map(|attr| decode_attribute(&dn, attr))
            .collect::<ConnectorResult<Vec<_>>>()?,
        None => Vec::new(),
    };

    Ok(RawEntry { dn, attributes })
}

fn decode_attribute(dn: &str, tag: StructureTag) -> ConnectorResult<RawAttribute> {
    let malformed = || ConnectorError::protocol(format!("malformed attribute in {}", dn));

    let mut parts = tag.expect_constructed().ok_or_else(malformed)?.into_iter();

    let name = parts
        .next()
        .and_then(StructureTag::expect_primitive)
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or_else(malformed)?;

    let values = match parts.next() {
        Some(set) => set
            .expect_constructed()
            .ok_or_else(malformed)?
            .into_iter()
            .map(|value| value.expect_primitive().ok_or_else(malformed))
            .collect::<ConnectorResult<Vec<_>>>()?,
        None => Vec::new(),
    };

    Ok(RawAttribute::new(name, values))
}

/// Cursor carried by the paged results response control.
///
/// `Ok(None)` when the server sent no paging control, which ends the search.
pub fn paged_cursor(controls: &[Control]) -> ConnectorResult<Option<PageCursor>> {
    let raw = controls.iter().find_map(|Control(kind, raw)| match kind {
        Some(ControlType::PagedResults) => Some(raw),
        _ if raw.ctype == PAGED_RESULTS_OID => Some(raw),
        _ => None,
    });

    match raw.map(|raw| raw.val.as_deref()) {
        Some(Some(val)) => {
            let paged = decode_paged_value(val)?;
            Ok(Some(PageCursor::from_cookie(paged.cookie)))
        }
        Some(None) => Err(ConnectorError::protocol(
            "paged results control without a value",
        )),
        None => Ok(None),
    }
}

/// Decode a paged results control value:
/// `SEQUENCE { size INTEGER, cookie OCTET STRING }`.
pub fn decode_paged_value(val: &[u8]) -> ConnectorResult<PagedResults> {
    let malformed = || ConnectorError::protocol("malformed paged results control value");

    let (_, tag) = parse_tag(val).map_err(|_| malformed())?;
    let mut parts = tag
        .match_class(TagClass::Universal)
        .and_then(|t| t.match_id(Types::Sequence as u64))
        .and_then(StructureTag::expect_constructed)
        .ok_or_else(malformed)?
        .into_iter();

    let size = parts
        .next()
        .and_then(|t| t.match_class(TagClass::Universal))
        .and_then(|t| t.match_id(Types::Integer as u64))
        .and_then(StructureTag::expect_primitive)
        .filter(|bytes| !bytes.is_empty() && bytes.len() <= 4)
        .ok_or_else(malformed)?;
    let (_, size) = parse_uint(&size).map_err(|_| malformed())?;

    let cookie = parts
        .next()
        .and_then(|t| t.match_class(TagClass::Universal))
        .and_then(|t| t.match_id(Types::OctetString as u64))
        .and_then(StructureTag::expect_primitive)
        .ok_or_else(malformed)?;

    Ok(PagedResults {
        size: size as i32,
        cookie,
    })
}
