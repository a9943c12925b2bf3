//! Validation of homework API responses and message rendering

use serde_json::Value;

use crate::verdict::HomeworkStatus;
use crate::{BotError, Result};

/// Field names of the API payload
pub const HOMEWORKS_KEY: &str = "homeworks";
pub const CURRENT_DATE_KEY: &str = "current_date";
pub const HOMEWORK_NAME_KEY: &str = "homework_name";
pub const STATUS_KEY: &str = "status";
pub const DATE_UPDATED_KEY: &str = "date_updated";

/// Check the shape of a decoded API response and return its homework records.
///
/// The records are returned unmodified and in API order. An empty list is an
/// error, not a "nothing changed" result.
pub fn validate_response(response: Value) -> Result<Vec<Value>> {
    let mut body = match response {
        Value::Object(body) => body,
        other => {
            return Err(shape_error(format!(
                "response is not an object: {}",
                json_type(&other)
            )))
        }
    };

    let homeworks = body
        .remove(HOMEWORKS_KEY)
        .ok_or_else(|| shape_error(format!("response has no '{}' key", HOMEWORKS_KEY)))?;
    if !body.contains_key(CURRENT_DATE_KEY) {
        return Err(shape_error(format!(
            "response has no '{}' key",
            CURRENT_DATE_KEY
        )));
    }

    match homeworks {
        Value::Array(homeworks) if homeworks.is_empty() => {
            Err(shape_error(format!("'{}' is empty", HOMEWORKS_KEY)))
        }
        Value::Array(homeworks) => {
            tracing::debug!("Response contains {} homework records", homeworks.len());
            Ok(homeworks)
        }
        other => Err(shape_error(format!(
            "'{}' is not a list: {}",
            HOMEWORKS_KEY,
            json_type(&other)
        ))),
    }
}

/// Render the status change notification for a single homework record
pub fn parse_status(record: &Value) -> Result<String> {
    let homework_name = match record.get(HOMEWORK_NAME_KEY) {
        None | Some(Value::Null) => return Err(BotError::MissingField(HOMEWORK_NAME_KEY)),
        Some(Value::String(name)) => name.clone(),
        Some(other) => other.to_string(),
    };

    let status = match record.get(STATUS_KEY) {
        None | Some(Value::Null) => return Err(BotError::MissingField(STATUS_KEY)),
        Some(Value::String(code)) => code.parse::<HomeworkStatus>()?,
        Some(other) => return Err(BotError::UnknownStatus(other.to_string())),
    };

    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        homework_name,
        status.verdict()
    ))
}

/// Change-detection marker of a record; a missing field reads as `null`
pub fn status_marker(record: &Value) -> Value {
    record.get(DATE_UPDATED_KEY).cloned().unwrap_or(Value::Null)
}

fn shape_error(reason: String) -> BotError {
    tracing::error!("Invalid API response: {}", reason);
    BotError::Shape(reason)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
