//! Argument Decoder
//!
//! Information Hiding:
//! - Coercion rules and the free-form extraction pattern live here only
//! - Tools declare schemas; none of them parse payloads themselves
//!
//! Pure function of (payload, schema). The structured path is the primary
//! contract; free-form text is a lossy fallback kept because orchestration
//! frameworks routinely hand tools loosely formatted strings. Text is tried
//! as a JSON object first, then scanned for `field: value` / `field=value`
//! pairs, and a schema with a single required field accepts the whole text
//! as that field when no pair matches.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use super::error::DecodeError;
use super::{ArgType, ArgValue, DecodedArgs, FieldSpec, Payload};

static PAIR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?x)
        ([A-Za-z_][A-Za-z0-9_]*)        # field name
        \s* [:=] \s*
        (?:
            "([^"]*)"                   # double-quoted value
          | '([^']*)'                   # single-quoted value
          | ([^\s,;]+)                  # bare value
        )"#,
    )
    .expect("pair pattern is a valid regex")
});

/// Decode a raw payload against a tool's schema.
pub fn decode(payload: &Payload, schema: &[FieldSpec]) -> Result<DecodedArgs, DecodeError> {
    match payload {
        Payload::Structured(Value::Object(map)) => decode_object(map, schema),
        // Callers sometimes wrap a text payload in a JSON string; route it
        // through the text path rather than rejecting it.
        Payload::Structured(Value::String(text)) => decode_text(text, schema),
        Payload::Structured(Value::Null) => decode_object(&Map::new(), schema),
        Payload::Structured(_) => Err(DecodeError::UnparsableInput),
        Payload::Text(text) => decode_text(text, schema),
    }
}

fn decode_object(map: &Map<String, Value>, schema: &[FieldSpec]) -> Result<DecodedArgs, DecodeError> {
    let mut args = DecodedArgs::new();

    for field in schema {
        match map.get(&field.name) {
            Some(value) => args.insert(&field.name, coerce_json(value, field)?),
            None => {
                if let Some(default) = &field.default {
                    args.insert(&field.name, default.clone());
                } else if field.required {
                    return Err(DecodeError::MissingArgument {
                        field: field.name.clone(),
                    });
                }
            }
        }
    }

    Ok(args)
}

fn decode_text(text: &str, schema: &[FieldSpec]) -> Result<DecodedArgs, DecodeError> {
    let trimmed = text.trim();

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        return decode_object(&map, schema);
    }

    let mut args = DecodedArgs::new();
    let mut matched_any = false;

    for caps in PAIR_PATTERN.captures_iter(trimmed) {
        let key = &caps[1];
        let Some(field) = schema.iter().find(|f| f.name == key) else {
            continue;
        };
        let raw = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str())
            .unwrap_or_default();
        args.insert(&field.name, coerce_text(raw, field)?);
        matched_any = true;
    }

    let required: Vec<&FieldSpec> = schema.iter().filter(|f| f.required).collect();

    // Whole-text fallback: a bare "path/to/file.txt" payload for a
    // single-required-field schema.
    if !matched_any && !trimmed.is_empty() {
        if let [only] = required.as_slice() {
            args.insert(&only.name, coerce_text(trimmed, only)?);
        }
    }

    if !required.is_empty() && required.iter().all(|f| args.get(&f.name).is_none()) {
        return Err(DecodeError::UnparsableInput);
    }

    for field in schema {
        if args.get(&field.name).is_some() {
            continue;
        }
        if let Some(default) = &field.default {
            args.insert(&field.name, default.clone());
        } else if field.required {
            return Err(DecodeError::MissingArgument {
                field: field.name.clone(),
            });
        }
    }

    Ok(args)
}

fn coerce_json(value: &Value, field: &FieldSpec) -> Result<ArgValue, DecodeError> {
    let mismatch = || DecodeError::TypeMismatch {
        field: field.name.clone(),
        expected: field.ty,
    };

    match field.ty {
        ArgType::String => match value {
            Value::String(s) => Ok(ArgValue::Str(s.clone())),
            // Orchestrators send numbers and bools for string fields often
            // enough that rejecting them is churn, not safety.
            Value::Number(n) => Ok(ArgValue::Str(n.to_string())),
            Value::Bool(b) => Ok(ArgValue::Str(b.to_string())),
            _ => Err(mismatch()),
        },
        ArgType::Int => match value {
            Value::Number(n) => n.as_i64().map(ArgValue::Int).ok_or_else(mismatch),
            Value::String(s) => parse_int(s).ok_or_else(mismatch),
            _ => Err(mismatch()),
        },
        ArgType::Float => match value {
            Value::Number(n) => n.as_f64().map(ArgValue::Float).ok_or_else(mismatch),
            Value::String(s) => parse_float(s).ok_or_else(mismatch),
            _ => Err(mismatch()),
        },
        ArgType::Bool => match value {
            Value::Bool(b) => Ok(ArgValue::Bool(*b)),
            Value::String(s) => parse_bool(s).ok_or_else(mismatch),
            _ => Err(mismatch()),
        },
    }
}

fn coerce_text(raw: &str, field: &FieldSpec) -> Result<ArgValue, DecodeError> {
    let mismatch = || DecodeError::TypeMismatch {
        field: field.name.clone(),
        expected: field.ty,
    };
    let raw = raw.trim();

    match field.ty {
        ArgType::String => Ok(ArgValue::Str(raw.to_string())),
        ArgType::Int => parse_int(raw).ok_or_else(mismatch),
        ArgType::Float => parse_float(raw).ok_or_else(mismatch),
        ArgType::Bool => parse_bool(raw).ok_or_else(mismatch),
    }
}

fn parse_int(raw: &str) -> Option<ArgValue> {
    raw.trim().parse::<i64>().ok().map(ArgValue::Int)
}

fn parse_float(raw: &str) -> Option<ArgValue> {
    raw.trim().parse::<f64>().ok().map(ArgValue::Float)
}

fn parse_bool(raw: &str) -> Option<ArgValue> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" => Some(ArgValue::Bool(true)),
        "false" | "no" => Some(ArgValue::Bool(false)),
        _ => None,
    }
}
