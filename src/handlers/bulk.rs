use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::ApiError;

/// Reads `body[key]` as the item array of a bulk request
pub fn bulk_items<'a>(body: &'a Value, key: &str, max: usize) -> Result<&'a Vec<Value>, ApiError> {
    let items = body
        .get(key)
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or_else(|| ApiError::bad_request(format!("{} must be a non-empty array", key)))?;

    if items.len() > max {
        return Err(ApiError::bad_request(format!(
            "Cannot process more than {} {} at once",
            max, key
        )));
    }

    Ok(items)
}

/// Per-item outcome list for bulk endpoints. Failures never abort the batch.
#[derive(Debug, Default)]
pub struct BulkReport {
    results: Vec<Value>,
    succeeded: usize,
    failed: usize,
}

impl BulkReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// `label` is the item's identifying field, e.g. `("email", "a@b.co")`
    pub fn succeed<T: Serialize>(&mut self, index: usize, label: (&str, Value), entity_key: &str, entity: &T) {
        let mut item = Map::new();
        item.insert("index".to_string(), json!(index));
        item.insert(label.0.to_string(), label.1);
        item.insert("success".to_string(), Value::Bool(true));
        item.insert(entity_key.to_string(), json!(entity));
        self.results.push(Value::Object(item));
        self.succeeded += 1;
    }

    pub fn fail(&mut self, index: usize, label: (&str, Value), error: &ApiError) {
        let mut item = Map::new();
        item.insert("index".to_string(), json!(index));
        item.insert(label.0.to_string(), label.1);
        item.insert("success".to_string(), Value::Bool(false));
        item.insert("error".to_string(), json!(error.message()));
        if !error.details().is_empty() {
            item.insert("details".to_string(), json!(error.details()));
        }
        self.results.push(Value::Object(item));
        self.failed += 1;
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn to_json(&self) -> Value {
        json!({
            "results": self.results,
            "summary": {
                "total": self.total(),
                "succeeded": self.succeeded,
                "failed": self.failed,
            }
        })
    }
}

impl IntoResponse for BulkReport {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self.to_json())).into_response()
    }
}
