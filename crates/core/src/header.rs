//! Fills the form's cover-page identification fields.
//!
//! Every field is best-effort: a missing template element or an
//! unparseable date is logged and leaves that field alone (or empty),
//! never aborting the run.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::warn;
use trec_document::Document;
use trec_types::{DateValue, InspectionReport};

/// Writes client, date, address, inspector, and license fields into the
/// template's identification inputs (matched by element id).
pub fn populate_header(doc: &mut Document, report: &InspectionReport) {
    let inspection = &report.inspection;
    let account = &report.account;

    set_field(doc, "client", &inspection.client_info.name);

    let date = inspection
        .schedule
        .date
        .as_ref()
        .and_then(format_inspection_date)
        .unwrap_or_default();
    set_field(doc, "date", &date);

    let address = if !inspection.address.full_address.is_empty() {
        &inspection.address.full_address
    } else {
        &inspection.address.street
    };
    set_field(doc, "address", address);

    set_field(doc, "inspector", &inspection.inspector.name);
    set_field(doc, "trec1", &inspection.inspector.id);

    let sponsor = if !account.company_name.is_empty() {
        &account.company_name
    } else {
        &account.name
    };
    set_field(doc, "sponsor", sponsor);
    set_field(doc, "trec2", &account.id);
}

fn set_field(doc: &mut Document, id: &str, value: &str) {
    match doc.element_by_id(id) {
        Some(node) => doc.set_attr(node, "value", value),
        None => warn!(field = id, "header field not found in template"),
    }
}

/// Formats a schedule date as MM/DD/YYYY. Millisecond timestamps are
/// interpreted as UTC; strings are tried as RFC 3339, then common
/// datetime layouts, then a bare date.
pub fn format_inspection_date(value: &DateValue) -> Option<String> {
    let formatted = match value {
        DateValue::Millis(ms) => Utc
            .timestamp_millis_opt(*ms)
            .single()?
            .format("%m/%d/%Y")
            .to_string(),
        DateValue::Fractional(ms) => Utc
            .timestamp_millis_opt(*ms as i64)
            .single()?
            .format("%m/%d/%Y")
            .to_string(),
        DateValue::Text(text) => parse_date_text(text)?.format("%m/%d/%Y").to_string(),
    };
    Some(formatted)
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc).date_naive());
    }
    for layout in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, layout) {
            return Some(parsed.date());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use trec_types::InspectionReport;

    fn template() -> Document {
        Document::parse(concat!(
            r#"<input id="client" type="text">"#,
            r#"<input id="date" type="text">"#,
            r#"<input id="address" type="text">"#,
            r#"<input id="inspector" type="text">"#,
            r#"<input id="trec1" type="text">"#,
            r#"<input id="sponsor" type="text">"#,
            r#"<input id="trec2" type="text">"#,
        ))
    }

    fn field(doc: &Document, id: &str) -> String {
        let node = doc.element_by_id(id).unwrap();
        doc.attr(node, "value").unwrap_or_default().to_string()
    }

    fn report(json: &str) -> InspectionReport {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn fills_all_identification_fields() {
        let mut doc = template();
        let report = report(
            r#"{
                "inspection": {
                    "clientInfo": {"name": "Jane Roe"},
                    "address": {"fullAddress": "12 Oak St, Austin, TX 78701"},
                    "inspector": {"name": "Sam Field", "id": 20412},
                    "schedule": {"date": 1709596800000},
                    "sections": []
                },
                "account": {"companyName": "Lone Star Inspections", "id": "SP-7"}
            }"#,
        );
        populate_header(&mut doc, &report);
        assert_eq!(field(&doc, "client"), "Jane Roe");
        assert_eq!(field(&doc, "date"), "03/05/2024");
        assert_eq!(field(&doc, "address"), "12 Oak St, Austin, TX 78701");
        assert_eq!(field(&doc, "inspector"), "Sam Field");
        assert_eq!(field(&doc, "trec1"), "20412");
        assert_eq!(field(&doc, "sponsor"), "Lone Star Inspections");
        assert_eq!(field(&doc, "trec2"), "SP-7");
    }

    #[test]
    fn address_falls_back_to_street() {
        let mut doc = template();
        let report = report(
            r#"{"inspection": {"address": {"street": "14 Elm St"}, "sections": []}, "account": {}}"#,
        );
        populate_header(&mut doc, &report);
        assert_eq!(field(&doc, "address"), "14 Elm St");
    }

    #[test]
    fn sponsor_falls_back_to_account_name() {
        let mut doc = template();
        let report =
            report(r#"{"inspection": {"sections": []}, "account": {"name": "A. Sponsor"}}"#);
        populate_header(&mut doc, &report);
        assert_eq!(field(&doc, "sponsor"), "A. Sponsor");
    }

    #[test]
    fn missing_template_field_is_skipped() {
        let mut doc = Document::parse(r#"<input id="client" type="text">"#);
        let report = report(
            r#"{"inspection": {"clientInfo": {"name": "Jane"}, "sections": []}, "account": {}}"#,
        );
        populate_header(&mut doc, &report);
        assert_eq!(field(&doc, "client"), "Jane");
    }

    #[test]
    fn millisecond_timestamps_format_as_utc() {
        assert_eq!(
            format_inspection_date(&DateValue::Millis(1709596800000)),
            Some("03/05/2024".to_string())
        );
        assert_eq!(
            format_inspection_date(&DateValue::Fractional(1709596800000.0)),
            Some("03/05/2024".to_string())
        );
    }

    #[test]
    fn date_strings_format_across_layouts() {
        for text in [
            "2024-03-05",
            "2024-03-05T10:30:00",
            "2024-03-05 10:30:00",
            "2024-03-05T10:30:00+00:00",
        ] {
            assert_eq!(
                format_inspection_date(&DateValue::Text(text.to_string())).as_deref(),
                Some("03/05/2024"),
                "layout: {text}"
            );
        }
    }

    #[test]
    fn unparseable_date_leaves_field_empty() {
        assert_eq!(
            format_inspection_date(&DateValue::Text("next Tuesday".to_string())),
            None
        );

        let mut doc = template();
        let report = report(
            r#"{"inspection": {"schedule": {"date": "next Tuesday"}, "sections": []}, "account": {}}"#,
        );
        populate_header(&mut doc, &report);
        assert_eq!(field(&doc, "date"), "");
    }
}
