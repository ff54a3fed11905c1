//! Schema checks for the professor and grades payloads.
//!
//! Everything the API sends passes through here before reaching the
//! aggregator, so the rest of the crate only ever sees typed records.

use serde_json::Value;
use tracing::warn;

use super::types::{GradeBucket, GradeEntry, GradeRecord, InstructorProfile, ProfessorPayload};
use crate::error::{DrTerpError, Result};

/// The API reports failures as `{"error": "..."}` with a 200 status in some cases.
fn api_error(value: &Value) -> Option<String> {
    value
        .as_object()
        .and_then(|o| o.get("error"))
        .map(|e| e.as_str().map_or_else(|| e.to_string(), str::to_string))
}

/// Validate a professor payload into an `InstructorProfile`.
pub fn validate_profile(value: Value) -> std::result::Result<InstructorProfile, String> {
    if let Some(err) = api_error(&value) {
        return Err(format!("API error: {}", err));
    }
    let payload: ProfessorPayload =
        serde_json::from_value(value).map_err(|e| format!("Unexpected professor shape: {}", e))?;
    Ok(payload.into())
}

/// Turn a grades payload into a sequence of elements. A bare object is a
/// one-element sequence and `null` is an empty one.
pub fn normalize_grades_payload(value: Value) -> std::result::Result<Vec<Value>, String> {
    if let Some(err) = api_error(&value) {
        return Err(format!("API error: {}", err));
    }
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(_) => Ok(vec![value]),
        Value::Null => Ok(Vec::new()),
        other => Err(format!("Unexpected grades payload: {}", other)),
    }
}

/// 2^64: the first float that no longer fits a `u64` count.
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

fn bucket_count(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| *f >= 0.0 && *f < U64_LIMIT && f.fract() == 0.0)
        .map(|f| f as u64)
}

fn text_field(obj: &serde_json::Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Validate one grades element. Every bucket must be a non-negative whole number.
pub fn validate_grade_record(value: &Value) -> Result<GradeRecord> {
    let obj = value.as_object().ok_or_else(|| {
        DrTerpError::MalformedGradeRecord(format!("expected an object, got {}", value))
    })?;

    let mut record = GradeRecord::new(
        &text_field(obj, "course"),
        &text_field(obj, "professor"),
        &text_field(obj, "semester"),
        &text_field(obj, "section"),
    );

    let mut total: u64 = 0;
    for bucket in GradeBucket::ALL {
        let raw = obj.get(bucket.key()).ok_or_else(|| {
            DrTerpError::MalformedGradeRecord(format!("missing bucket '{}'", bucket.key()))
        })?;
        let count = bucket_count(raw).ok_or_else(|| {
            DrTerpError::MalformedGradeRecord(format!(
                "bucket '{}' is not a count: {}",
                bucket.key(),
                raw
            ))
        })?;
        total = total.checked_add(count).ok_or_else(|| {
            DrTerpError::MalformedGradeRecord(format!(
                "student total overflows at bucket '{}'",
                bucket.key()
            ))
        })?;
        record.set_count(bucket, count);
    }

    Ok(record)
}

/// Validate a whole grades payload. Malformed elements become
/// `GradeEntry::Malformed` instead of failing the batch.
pub fn validate_grades(value: Value) -> std::result::Result<Vec<GradeEntry>, String> {
    let items = normalize_grades_payload(value)?;
    Ok(items
        .iter()
        .map(|item| match validate_grade_record(item) {
            Ok(record) => GradeEntry::Record(record),
            Err(e) => {
                warn!("{}", e);
                GradeEntry::Malformed(e.to_string())
            }
        })
        .collect())
}
