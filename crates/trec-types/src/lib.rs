//! Wire model for inspection report JSON.
//!
//! These types mirror the structure of the inspection export consumed by the
//! form populator: a root object carrying `inspection` (client, address,
//! inspector, schedule, sections of line items) and `account`. Deserialization
//! is deliberately tolerant — missing sub-objects default to empty values and
//! identifier fields accept either strings or JSON numbers — because the
//! export format varies between producers. Unknown fields are ignored.

use serde::{Deserialize, Deserializer};

/// Root of the inspection report export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InspectionReport {
    #[serde(default)]
    pub inspection: Inspection,
    #[serde(default)]
    pub account: Account,
}

/// The inspection proper: identity metadata plus the inspected sections.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    #[serde(default)]
    pub client_info: ClientInfo,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub inspector: Inspector,
    #[serde(default)]
    pub schedule: Schedule,
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientInfo {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Precomposed full address, preferred when present.
    #[serde(default)]
    pub full_address: String,
    /// Street-only fallback.
    #[serde(default)]
    pub street: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Inspector {
    #[serde(default)]
    pub name: String,
    /// Licence number; some exports carry this as a JSON number.
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    pub date: Option<DateValue>,
}

/// Sponsoring account for the inspector.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
}

/// An inspection date: either a millisecond timestamp or a date string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    Millis(i64),
    Fractional(f64),
    Text(String),
}

/// One inspected area of the property, holding an ordered run of line items.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

/// One inspected component/condition record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default)]
    pub name: String,
    /// Raw status code as exported (`I`, `NI`, `NP`, `D`). Kept as a string so
    /// unrecognized codes pass through without failing deserialization.
    #[serde(default)]
    pub inspection_status: Option<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl LineItem {
    /// An item is empty when it carries neither a status nor any comments.
    /// Empty items are skipped entirely by the populator.
    pub fn is_empty(&self) -> bool {
        self.inspection_status.is_none() && self.comments.is_empty()
    }

    /// The parsed status, or `None` when absent or unrecognized.
    pub fn status(&self) -> Option<InspectionStatus> {
        self.inspection_status
            .as_deref()
            .and_then(InspectionStatus::parse)
    }
}

/// A single finding attached to a line item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Comment {
    /// Body text. Exports disagree on the field name.
    #[serde(default, alias = "commentText", alias = "value")]
    pub text: String,
    #[serde(default)]
    pub location: String,
    /// Sort key; ties keep their original relative order.
    #[serde(default)]
    pub order: f64,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub videos: Vec<Video>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Photo {
    /// Caption text, preferring `caption` over `description`.
    pub fn caption_text(&self) -> &str {
        self.caption
            .as_deref()
            .filter(|c| !c.is_empty())
            .or(self.description.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub url: String,
}

/// The four TREC inspection status codes.
///
/// Each code corresponds to a fixed checkbox position within a form item's
/// status group: I=0, NI=1, NP=2, D=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectionStatus {
    Inspected,
    NotInspected,
    NotPresent,
    Deficient,
}

impl InspectionStatus {
    /// Parses a raw status code, case-insensitively. Unknown codes yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "I" => Some(Self::Inspected),
            "NI" => Some(Self::NotInspected),
            "NP" => Some(Self::NotPresent),
            "D" => Some(Self::Deficient),
            _ => None,
        }
    }

    /// Index of this status's checkbox within the item's status group.
    pub fn checkbox_index(self) -> usize {
        match self {
            Self::Inspected => 0,
            Self::NotInspected => 1,
            Self::NotPresent => 2,
            Self::Deficient => 3,
        }
    }
}

/// Accepts a string, a JSON number, or null, always yielding a `String`.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => String::new(),
        Some(Raw::Text(s)) => s,
        Some(Raw::Int(n)) => n.to_string(),
        Some(Raw::Float(n)) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_full_report() {
        let raw = r#"{
            "inspection": {
                "clientInfo": {"name": "Jane Buyer"},
                "address": {"fullAddress": "12 Oak St, Austin, TX", "street": "12 Oak St"},
                "inspector": {"name": "Sam Inspector", "id": 40412},
                "schedule": {"date": 1709596800000},
                "sections": [{
                    "name": "Roof",
                    "lineItems": [{
                        "name": "Roof Covering Materials",
                        "inspectionStatus": "D",
                        "comments": [{"commentText": "Shingle damage", "location": "NE corner"}]
                    }]
                }]
            },
            "account": {"companyName": "Acme Inspections", "id": "9001"}
        }"#;
        let report: InspectionReport = serde_json::from_str(raw).unwrap();
        assert_eq!(report.inspection.client_info.name, "Jane Buyer");
        assert_eq!(report.inspection.inspector.id, "40412");
        assert_eq!(report.account.company_name, "Acme Inspections");
        let item = &report.inspection.sections[0].line_items[0];
        assert_eq!(item.status(), Some(InspectionStatus::Deficient));
        assert_eq!(item.comments[0].text, "Shingle damage");
        assert_eq!(
            report.inspection.schedule.date,
            Some(DateValue::Millis(1709596800000))
        );
    }

    #[test]
    fn missing_sub_objects_default() {
        let report: InspectionReport = serde_json::from_str("{}").unwrap();
        assert!(report.inspection.sections.is_empty());
        assert!(report.account.name.is_empty());
    }

    #[test]
    fn date_value_accepts_string() {
        let schedule: Schedule = serde_json::from_str(r#"{"date": "2024-03-05"}"#).unwrap();
        assert_eq!(schedule.date, Some(DateValue::Text("2024-03-05".into())));
    }

    #[test]
    fn comment_text_aliases() {
        let c: Comment = serde_json::from_str(r#"{"value": "via value"}"#).unwrap();
        assert_eq!(c.text, "via value");
        let c: Comment = serde_json::from_str(r#"{"text": "via text"}"#).unwrap();
        assert_eq!(c.text, "via text");
    }

    #[test]
    fn empty_item_requires_no_status_and_no_comments() {
        let item = LineItem::default();
        assert!(item.is_empty());

        let with_status = LineItem {
            inspection_status: Some("I".into()),
            ..LineItem::default()
        };
        assert!(!with_status.is_empty());

        let with_comment = LineItem {
            comments: vec![Comment::default()],
            ..LineItem::default()
        };
        assert!(!with_comment.is_empty());
    }

    #[test]
    fn status_parse_is_case_insensitive_and_strict() {
        assert_eq!(
            InspectionStatus::parse("ni"),
            Some(InspectionStatus::NotInspected)
        );
        assert_eq!(InspectionStatus::parse(" D "), Some(InspectionStatus::Deficient));
        assert_eq!(InspectionStatus::parse("X"), None);
        assert_eq!(InspectionStatus::parse(""), None);
    }

    #[test]
    fn checkbox_indices_are_fixed() {
        assert_eq!(InspectionStatus::Inspected.checkbox_index(), 0);
        assert_eq!(InspectionStatus::NotInspected.checkbox_index(), 1);
        assert_eq!(InspectionStatus::NotPresent.checkbox_index(), 2);
        assert_eq!(InspectionStatus::Deficient.checkbox_index(), 3);
    }

    #[test]
    fn photo_caption_prefers_caption_over_description() {
        let photo: Photo = serde_json::from_str(
            r#"{"url": "a.jpg", "caption": "Cap", "description": "Desc"}"#,
        )
        .unwrap();
        assert_eq!(photo.caption_text(), "Cap");

        let photo: Photo =
            serde_json::from_str(r#"{"url": "a.jpg", "description": "Desc"}"#).unwrap();
        assert_eq!(photo.caption_text(), "Desc");
    }
}
