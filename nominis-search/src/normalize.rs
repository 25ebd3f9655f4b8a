//! Projection of raw upstream records into [`NormalizedRecord`]s.
//!
//! Pure and infallible: a missing or oddly-typed field becomes `None` for
//! that record and never aborts the batch.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::types::{NormalizedRecord, RawRecord};

/// Where a label candidate is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRule {
    /// A field nested one level down: `record[outer][inner]`.
    Nested(&'static str, &'static str),
    /// A top-level field.
    Field(&'static str),
}

impl LabelRule {
    /// Apply this rule, returning the text verbatim if it is a non-blank string.
    pub fn extract(self, record: &RawRecord) -> Option<String> {
        let value = match self {
            Self::Nested(outer, inner) => record.get(outer)?.get(inner)?,
            Self::Field(name) => record.get(name)?,
        };
        let text = value.as_str()?;
        (!text.trim().is_empty()).then(|| text.to_owned())
    }
}

/// Label sources, in priority order. The first non-blank match wins.
pub const LABEL_RULES: &[LabelRule] = &[
    LabelRule::Nested("wordMarkSpecification", "verbalElement"),
    LabelRule::Field("markText"),
    LabelRule::Field("verbalElement"),
    LabelRule::Field("reference"),
    LabelRule::Field("title"),
    LabelRule::Field("name"),
];

/// Normalise `raw` in order, keeping only records that share a category
/// with `category_filter` when a non-empty filter is given.
pub fn normalize(
    raw: &[RawRecord],
    category_filter: Option<&BTreeSet<u32>>,
) -> Vec<NormalizedRecord> {
    let filter = category_filter.filter(|f| !f.is_empty());
    raw.iter()
        .filter_map(|record| {
            let categories = extract_categories(record);
            if let Some(wanted) = filter {
                if !categories.iter().any(|c| wanted.contains(c)) {
                    return None;
                }
            }
            Some(project(record, categories))
        })
        .collect()
}

/// Normalise a single record without filtering.
pub fn normalize_record(record: &RawRecord) -> NormalizedRecord {
    project(record, extract_categories(record))
}

/// Drop records whose status is not in `allowed`. Records without a
/// status are dropped too.
pub fn retain_statuses(records: &mut Vec<NormalizedRecord>, allowed: &[String]) {
    records.retain(|r| {
        r.status
            .as_deref()
            .is_some_and(|s| allowed.iter().any(|a| a.eq_ignore_ascii_case(s)))
    });
}

/// First non-blank label per [`LABEL_RULES`].
pub fn extract_label(record: &RawRecord) -> Option<String> {
    LABEL_RULES.iter().find_map(|rule| rule.extract(record))
}

fn project(record: &RawRecord, categories: Vec<u32>) -> NormalizedRecord {
    NormalizedRecord {
        application_number: scalar(record, "applicationNumber"),
        label: extract_label(record),
        status: scalar(record, "status"),
        categories,
        mark_feature: scalar(record, "markFeature"),
        application_date: scalar(record, "applicationDate"),
        registration_date: scalar(record, "registrationDate"),
    }
}

fn extract_categories(record: &RawRecord) -> Vec<u32> {
    record
        .get("niceClasses")
        .and_then(Value::as_array)
        .map(|classes| {
            classes
                .iter()
                .filter_map(|c| match c {
                    Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
                    Value::String(s) => s.trim().parse().ok(),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// String fields verbatim; numbers and booleans as their JSON text.
fn scalar(record: &RawRecord, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
