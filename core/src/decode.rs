//! Bulk-page parsing and polymorphic list decoding.
//!
//! # Design
//! Bulk endpoints answer with one JSON object: the items as an array under
//! the resource's plural key, plus a `_links.next` cursor that is absent (or
//! `null`) on the last page. [`BulkPage::parse`] splits that shape apart
//! without knowing anything about the entity inside; [`decode_list`] turns
//! the raw array into typed entities through each entity kind's decode
//! contract, which here is simply `DeserializeOwned` — every entity derives
//! it, so the decoder dispatches through a statically known capability
//! instead of inspecting types at runtime.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::DecodeError;

/// One page of a bulk-list response, split into raw items and the cursor to
/// the next page.
#[derive(Debug, Clone)]
pub struct BulkPage {
    pub items: Vec<Value>,
    pub next: Option<String>,
}

impl BulkPage {
    /// Split a bulk response body into the raw array under `key` and the
    /// optional next-page cursor.
    pub fn parse(body: &Value, key: &str) -> Result<Self, DecodeError> {
        let items = body
            .get(key)
            .and_then(Value::as_array)
            .ok_or_else(|| DecodeError::Page(format!("no \"{key}\" array in response")))?
            .clone();
        // A JSON null cursor and a missing one are both "last page".
        let next = body
            .get("_links")
            .and_then(|links| links.get("next"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(Self { items, next })
    }
}

/// Decode a raw JSON array into an ordered sequence of entities.
///
/// Elements decode in array order. The first element that fails sinks the
/// whole list — no skipping.
pub fn decode_list<T: DeserializeOwned>(raw: &[Value]) -> Result<Vec<T>, DecodeError> {
    raw.iter()
        .enumerate()
        .map(|(index, element)| {
            serde_json::from_value(element.clone()).map_err(|err| DecodeError::Element {
                index,
                detail: err.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Priority;
    use serde_json::json;

    #[test]
    fn parse_page_with_next_cursor() {
        let body = json!({
            "offset": 0,
            "limit": 2,
            "size": 2,
            "_links": { "next": "/api/v2/get_cases/1?limit=2&offset=2", "prev": null },
            "cases": [ { "id": 1 }, { "id": 2 } ],
        });
        let page = BulkPage::parse(&body, "cases").unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(
            page.next.as_deref(),
            Some("/api/v2/get_cases/1?limit=2&offset=2")
        );
    }

    #[test]
    fn parse_last_page_with_null_cursor() {
        let body = json!({
            "_links": { "next": null, "prev": "/api/v2/get_cases/1?limit=2" },
            "cases": [ { "id": 3 } ],
        });
        let page = BulkPage::parse(&body, "cases").unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(page.next.is_none());
    }

    #[test]
    fn parse_page_without_links_object() {
        let body = json!({ "projects": [] });
        let page = BulkPage::parse(&body, "projects").unwrap();
        assert!(page.items.is_empty());
        assert!(page.next.is_none());
    }

    #[test]
    fn parse_rejects_missing_array_key() {
        let body = json!({ "cases": [] });
        let err = BulkPage::parse(&body, "runs").unwrap_err();
        assert!(matches!(err, DecodeError::Page(_)));
        assert!(err.to_string().contains("runs"));
    }

    #[test]
    fn decode_list_preserves_order() {
        let raw = vec![
            json!({ "id": 1, "name": "Critical", "priority": 4, "is_default": false }),
            json!({ "id": 2, "name": "Medium", "priority": 2, "is_default": true }),
        ];
        let priorities: Vec<Priority> = decode_list(&raw).unwrap();
        assert_eq!(priorities.len(), 2);
        assert_eq!(priorities[0].name, "Critical");
        assert_eq!(priorities[1].name, "Medium");
    }

    #[test]
    fn decode_list_fails_whole_list_with_element_index() {
        let raw = vec![
            json!({ "id": 1, "name": "Critical", "priority": 4, "is_default": false }),
            json!({ "name": "missing id" }),
        ];
        let err = decode_list::<Priority>(&raw).unwrap_err();
        match err {
            DecodeError::Element { index, .. } => assert_eq!(index, 1),
            other => panic!("expected element error, got {other}"),
        }
    }

    #[test]
    fn decode_empty_list() {
        let priorities: Vec<Priority> = decode_list(&[]).unwrap();
        assert!(priorities.is_empty());
    }
}
