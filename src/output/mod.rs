//! Output module for handing crawl results to callers
//!
//! This module handles:
//! - Attaching pass-through metadata to every record
//! - Writing records as a JSON array
//! - Summarizing a run

pub mod stats;

pub use stats::{print_summary, write_summary, RunSummary};

use crate::listing::ListingRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// Caller-supplied key/value pairs copied onto every record
pub type Metadata = BTreeMap<String, String>;

/// Field names of [`ListingRecord`]; metadata may not shadow them
const RECORD_FIELDS: [&str; 10] = [
    "title",
    "price",
    "currency",
    "area",
    "unit",
    "location",
    "image",
    "link",
    "price_per_area",
    "retrieved_at",
];

/// A listing record with the caller's metadata alongside its fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedListing {
    #[serde(flatten)]
    pub record: ListingRecord,
    #[serde(flatten)]
    pub metadata: Metadata,
}

/// Attaches metadata to every record, preserving record order
///
/// Keys that collide with a record field are dropped so the record's own
/// value is never overwritten.
pub fn annotate(records: Vec<ListingRecord>, metadata: &Metadata) -> Vec<AnnotatedListing> {
    let mut metadata = metadata.clone();
    metadata.retain(|key, _| {
        let shadows = RECORD_FIELDS.contains(&key.as_str());
        if shadows {
            tracing::warn!("Metadata key '{}' shadows a listing field; dropped", key);
        }
        !shadows
    });

    records
        .into_iter()
        .map(|record| AnnotatedListing {
            record,
            metadata: metadata.clone(),
        })
        .collect()
}

/// Writes listings as a pretty-printed JSON array
pub fn write_json<W: Write>(listings: &[AnnotatedListing], mut writer: W) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, listings)?;
    writeln!(writer)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(title: &str) -> ListingRecord {
        ListingRecord {
            title: title.to_string(),
            price: Some(26000.0),
            currency: Some("MAD".to_string()),
            area: Some(120.0),
            unit: Some("m²".to_string()),
            location: Some("Hay El Menzah".to_string()),
            image: None,
            link: Some("https://www.mubawab.ma/en/a/1".to_string()),
            price_per_area: Some(216.67),
            retrieved_at: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        }
    }

    fn metadata() -> Metadata {
        Metadata::from([
            ("city".to_string(), "Rabat".to_string()),
            ("asset_type".to_string(), "office".to_string()),
        ])
    }

    #[test]
    fn test_annotate_keeps_order() {
        let listings = annotate(vec![record("a"), record("b")], &metadata());
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].record.title, "a");
        assert_eq!(listings[1].record.title, "b");
        assert_eq!(listings[1].metadata["city"], "Rabat");
    }

    #[test]
    fn test_shadowing_keys_dropped() {
        let mut meta = metadata();
        meta.insert("title".to_string(), "overwritten".to_string());

        let listings = annotate(vec![record("kept")], &meta);
        assert!(!listings[0].metadata.contains_key("title"));
        assert_eq!(listings[0].metadata.len(), 2);
    }

    #[test]
    fn test_write_json_flattens() {
        let listings = annotate(vec![record("Office")], &metadata());
        let mut buffer = Vec::new();
        write_json(&listings, &mut buffer).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        let first = &value[0];
        assert_eq!(first["title"], "Office");
        assert_eq!(first["price"], 26000.0);
        assert_eq!(first["image"], serde_json::Value::Null);
        assert_eq!(first["retrieved_at"], "2026-10-18");
        assert_eq!(first["city"], "Rabat");
        assert_eq!(first["asset_type"], "office");
    }

    #[test]
    fn test_write_json_empty() {
        let mut buffer = Vec::new();
        write_json(&[], &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap().trim(), "[]");
    }
}
