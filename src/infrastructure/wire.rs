// src/infrastructure/wire.rs
//
// Normalization of NoteHub response bodies. Deployments disagree on field
// names and sometimes send partial records; everything is mapped onto the
// canonical domain types here and nowhere else.
use crate::domain::{DeletedNote, Note, NoteTag, NotesPage, QueryKey};
use serde_json::{Map, Value};
use tracing::warn;

/// Where a list response keeps its notes
#[derive(Debug, PartialEq)]
pub(crate) enum RawNoteList {
    Items(Vec<Value>),
    Notes(Vec<Value>),
    Results(Vec<Value>),
    Missing,
}

impl RawNoteList {
    /// Take the first of `items`, `notes`, `results` that holds an array
    pub(crate) fn sniff(body: &mut Map<String, Value>) -> Self {
        for field in ["items", "notes", "results"] {
            if let Some(Value::Array(records)) = body.remove(field) {
                return match field {
                    "items" => RawNoteList::Items(records),
                    "notes" => RawNoteList::Notes(records),
                    _ => RawNoteList::Results(records),
                };
            }
        }
        RawNoteList::Missing
    }

    pub(crate) fn into_records(self) -> Vec<Value> {
        match self {
            RawNoteList::Items(records)
            | RawNoteList::Notes(records)
            | RawNoteList::Results(records) => records,
            RawNoteList::Missing => Vec::new(),
        }
    }
}

fn read_u64(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Like `read_u64`, but values that do not fit count as missing
fn read_u32(value: Option<&Value>) -> Option<u32> {
    read_u64(value).and_then(|n| u32::try_from(n).ok())
}

fn read_string(record: &Map<String, Value>, fields: &[&str]) -> String {
    fields
        .iter()
        .find_map(|field| match record.get(*field) {
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

fn read_id(record: &Map<String, Value>) -> String {
    ["id", "_id"]
        .iter()
        .find_map(|field| match record.get(*field) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

/// Map one note record, substituting defaults for anything missing or mistyped
pub(crate) fn normalize_note(record: &Value) -> Note {
    let empty = Map::new();
    let record = record.as_object().unwrap_or(&empty);

    let id = read_id(record);
    if id.is_empty() {
        warn!("Note record without identifier");
    }
    let tag = match record.get("tag") {
        Some(Value::String(s)) => s.parse().unwrap_or_else(|_| {
            warn!(tag = %s, "Unknown tag, falling back to default");
            NoteTag::default()
        }),
        _ => NoteTag::default(),
    };

    Note {
        id,
        title: read_string(record, &["title"]),
        content: read_string(record, &["content"]),
        tag,
        created_at: read_string(record, &["createdAt", "created_at"]),
        updated_at: read_string(record, &["updatedAt", "updated_at"]),
    }
}

/// Map a list response onto a page for `key`
pub(crate) fn normalize_page(body: Value, key: &QueryKey) -> NotesPage {
    let mut body = match body {
        Value::Object(map) => map,
        other => {
            warn!(body = %other, "List response is not an object");
            Map::new()
        }
    };

    let raw = RawNoteList::sniff(&mut body);
    if raw == RawNoteList::Missing {
        warn!("List response carries no notes array");
    }
    let items: Vec<Note> = raw.into_records().iter().map(normalize_note).collect();

    let page = read_u32(body.get("page"))
        .filter(|p| *p > 0)
        .unwrap_or(key.page());
    let per_page = read_u32(body.get("perPage"))
        .filter(|p| *p > 0)
        .unwrap_or(key.per_page());
    let total_items = read_u64(body.get("totalItems")).unwrap_or(items.len() as u64);
    let total_pages = read_u32(body.get("totalPages")).unwrap_or_else(|| {
        u32::try_from(total_items.div_ceil(u64::from(per_page))).unwrap_or(u32::MAX)
    });

    NotesPage {
        items,
        page,
        per_page,
        total_items,
        total_pages,
    }
}

/// Map a delete response; accepts a bare note or `{deleted|success, note}`
pub(crate) fn normalize_deleted(body: Value, requested_id: &str) -> DeletedNote {
    let (deleted, record) = match body {
        Value::Object(mut map) if map.get("note").is_some_and(Value::is_object) => {
            let deleted = ["deleted", "success"]
                .iter()
                .find_map(|f| map.get(*f).and_then(Value::as_bool))
                .unwrap_or(true);
            let record = map.remove("note").unwrap_or(Value::Null);
            (deleted, record)
        }
        other => (true, other),
    };

    let mut note = normalize_note(&record);
    if note.id.is_empty() {
        note.id = requested_id.to_string();
    }
    DeletedNote { deleted, note }
}

/// Human-readable message from an error body, if the service sent one
pub(crate) fn error_message(status: u16, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let extracted = parsed.as_ref().and_then(|v| {
        v.get("message")
            .and_then(Value::as_str)
            .or_else(|| v.get("error").and_then(Value::as_str))
            .or_else(|| {
                v.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(Value::as_str)
            })
    });

    match extracted {
        Some(msg) if !msg.trim().is_empty() => msg.trim().to_string(),
        _ => format!("Request failed with status code {status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn record() -> Value {
        json!({
            "id": "65f1",
            "title": "Buy milk",
            "content": "2%",
            "tag": "Shopping",
            "createdAt": "2025-01-01T10:00:00.000Z",
            "updatedAt": "2025-01-02T10:00:00.000Z"
        })
    }

    #[rstest]
    #[case("items")]
    #[case("notes")]
    #[case("results")]
    fn given_any_array_field_when_normalizing_page_then_exposes_items(#[case] field: &str) {
        let mut body = json!({"page": 1, "perPage": 12, "totalItems": 1, "totalPages": 1});
        body[field] = json!([record()]);

        let page = normalize_page(body, &QueryKey::new(1, ""));

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "Buy milk");
        assert_eq!(page.items[0].tag, NoteTag::Shopping);
    }

    #[test]
    fn given_non_array_items_field_when_sniffing_then_falls_through_to_notes() {
        let mut body = json!({"items": null, "notes": [record()]})
            .as_object()
            .cloned()
            .unwrap();

        let raw = RawNoteList::sniff(&mut body);

        assert!(matches!(raw, RawNoteList::Notes(ref r) if r.len() == 1));
    }

    #[test]
    fn given_no_array_when_normalizing_page_then_empty_items() {
        let page = normalize_page(json!({"totalPages": 3}), &QueryKey::new(4, ""));

        assert!(page.items.is_empty());
        assert_eq!(page.page, 4);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn given_missing_counters_when_normalizing_page_then_derived_from_request() {
        let records: Vec<Value> = (0..5).map(|_| record()).collect();

        let page = normalize_page(json!({ "results": records }), &QueryKey::new(1, ""));

        assert_eq!(page.per_page, 12);
        assert_eq!(page.total_items, 5);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn given_counters_beyond_u32_when_normalizing_page_then_request_values_kept() {
        let body = json!({"items": [], "page": 4_294_967_296u64, "perPage": 5_000_000_000u64});

        let page = normalize_page(body, &QueryKey::new(2, ""));

        assert_eq!(page.page, 2);
        assert_eq!(page.per_page, 12);
    }

    #[test]
    fn given_partial_record_when_normalizing_note_then_defaults_substituted() {
        let note = normalize_note(&json!({"_id": "abc", "title": 42, "tag": "Groceries"}));

        assert_eq!(note.id, "abc");
        assert_eq!(note.title, "");
        assert_eq!(note.content, "");
        assert_eq!(note.tag, NoteTag::Todo);
        assert_eq!(note.created_at, "");
    }

    #[test]
    fn given_numeric_id_when_normalizing_note_then_stringified() {
        assert_eq!(normalize_note(&json!({"id": 17})).id, "17");
    }

    #[test]
    fn given_empty_primary_id_when_normalizing_note_then_uses_secondary() {
        assert_eq!(normalize_note(&json!({"id": "", "_id": "x1"})).id, "x1");
    }

    #[test]
    fn given_not_an_object_when_normalizing_note_then_all_defaults() {
        let note = normalize_note(&json!("garbage"));

        assert_eq!(note.id, "");
        assert_eq!(note.tag, NoteTag::Todo);
    }

    #[test]
    fn given_bare_note_when_normalizing_delete_then_deleted() {
        let deleted = normalize_deleted(record(), "65f1");

        assert!(deleted.deleted);
        assert_eq!(deleted.note.title, "Buy milk");
    }

    #[test]
    fn given_wrapped_note_when_normalizing_delete_then_reads_flag_and_note() {
        let deleted = normalize_deleted(json!({"success": false, "note": record()}), "65f1");

        assert!(!deleted.deleted);
        assert_eq!(deleted.note.id, "65f1");
    }

    #[test]
    fn given_empty_body_when_normalizing_delete_then_keeps_requested_id() {
        let deleted = normalize_deleted(Value::Null, "65f1");

        assert_eq!(deleted.note.id, "65f1");
    }

    #[rstest]
    #[case(r#"{"message": "Note not found"}"#, "Note not found")]
    #[case(r#"{"error": "Unauthorized"}"#, "Unauthorized")]
    #[case(r#"{"error": {"message": "Bad tag"}}"#, "Bad tag")]
    #[case("<html>502</html>", "Request failed with status code 404")]
    #[case("", "Request failed with status code 404")]
    fn given_error_body_when_extracting_message_then_prefers_service_text(
        #[case] body: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(error_message(404, body), expected);
    }
}
