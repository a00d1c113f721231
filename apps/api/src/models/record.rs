//! Boundary shaping between client JSON and stored BSON documents.
//!
//! Inbound: server-owned fields are stripped. Outbound: the native `_id` is
//! replaced by a plain string `id` and BSON-only types become JSON strings.

use bson::{Bson, Document};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::store::{CREATED_AT_FIELD, NATIVE_ID_FIELD, OPAQUE_ID_FIELD, UPDATED_AT_FIELD};

/// Converts a create body into a storable document.
///
/// `id` survives only as a string: it is the opaque identifier scheme.
pub fn from_create_body(body: Value) -> Result<Document, AppError> {
    let mut fields = into_object(body)?;
    fields.remove(NATIVE_ID_FIELD);
    fields.remove(CREATED_AT_FIELD);
    fields.remove(UPDATED_AT_FIELD);
    if !matches!(fields.get(OPAQUE_ID_FIELD), Some(Value::String(s)) if !s.trim().is_empty()) {
        fields.remove(OPAQUE_ID_FIELD);
    }
    to_document(&fields)
}

/// Converts an update body into the set of fields to merge. Identifiers and
/// `createdAt` are immutable and silently dropped.
pub fn from_update_body(body: Value) -> Result<Document, AppError> {
    let mut fields = into_object(body)?;
    fields.remove(NATIVE_ID_FIELD);
    fields.remove(OPAQUE_ID_FIELD);
    fields.remove(CREATED_AT_FIELD);
    fields.remove(UPDATED_AT_FIELD);
    to_document(&fields)
}

pub fn stamp_created(doc: &mut Document, now: DateTime<Utc>) {
    let ts = bson::DateTime::from_chrono(now);
    doc.insert(CREATED_AT_FIELD, ts);
    doc.insert(UPDATED_AT_FIELD, ts);
}

pub fn stamp_updated(doc: &mut Document, now: DateTime<Utc>) {
    doc.insert(UPDATED_AT_FIELD, bson::DateTime::from_chrono(now));
}

/// Shapes a stored document for the client.
///
/// The emitted `id` is the opaque string id when present, else the native
/// id in hex, so it always resolves through `RecordKey`.
pub fn to_public(mut doc: Document) -> Value {
    let native = doc.remove(NATIVE_ID_FIELD);
    let id = match (doc.get(OPAQUE_ID_FIELD), native) {
        (Some(Bson::String(opaque)), _) if !opaque.is_empty() => opaque.clone(),
        (_, Some(Bson::ObjectId(oid))) => oid.to_hex(),
        (_, Some(Bson::String(s))) => s,
        (_, Some(other)) => other.to_string(),
        (_, None) => String::new(),
    };

    let mut object = match bson_to_json(Bson::Document(doc)) {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    object.insert(OPAQUE_ID_FIELD.to_string(), Value::String(id));
    Value::Object(object)
}

pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::Document(doc) => Value::Object(
            doc.into_iter()
                .map(|(k, v)| (k, bson_to_json(v)))
                .collect(),
        ),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::DateTime(dt) => Value::String(format_timestamp(dt.to_chrono())),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        other => other.into_relaxed_extjson(),
    }
}

fn into_object(body: Value) -> Result<Map<String, Value>, AppError> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::Validation(
            "Request body must be a JSON object".to_string(),
        )),
    }
}

fn to_document(fields: &Map<String, Value>) -> Result<Document, AppError> {
    bson::to_document(fields).map_err(|e| AppError::Validation(format!("Invalid document: {e}")))
}
