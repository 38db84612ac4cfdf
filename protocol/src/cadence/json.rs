//! JSON-Cadence argument encoding.
//!
//! Every value is a JSON object `{"type": <tag>, "value": <payload>}`.
//! Container types nest further values inside their payload; `Void` carries
//! no payload and `Optional` carries `null` when empty.
//!
//! The encoder terminates its output with a newline, matching the stream
//! encoders that produced the arguments already on chain. The payload
//! builder strips that byte again (see
//! [`crate::transaction::canonical::strip_trailing_newline`]).

use serde_json::{Map, Value};

use super::{ArgumentCodec, ArgumentCodecError};

/// Type tags with a scalar JSON payload (string, bool or nested object
/// handled elsewhere).
const SCALAR_TYPES: &[&str] = &[
    "Bool", "String", "Character", "Address", "Int", "Int8", "Int16", "Int32", "Int64",
    "Int128", "Int256", "UInt", "UInt8", "UInt16", "UInt32", "UInt64", "UInt128", "UInt256",
    "Word8", "Word16", "Word32", "Word64", "Fix64", "UFix64", "Path", "Type", "Capability",
    "Function",
];

/// Composite type tags whose payload is `{"id": .., "fields": [{name, value}]}`.
const COMPOSITE_TYPES: &[&str] = &["Struct", "Resource", "Event", "Contract", "Enum"];

/// Decode options for [`JsonCdc`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonCdcOptions {
    /// Accept type tags outside the known set instead of failing.
    pub allow_unknown_types: bool,
}

impl JsonCdcOptions {
    /// Options that tolerate unrecognized type tags.
    pub fn permissive() -> Self {
        Self {
            allow_unknown_types: true,
        }
    }
}

/// JSON-Cadence codec over [`serde_json::Value`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCdc;

impl JsonCdc {
    pub fn new() -> Self {
        Self
    }
}

impl ArgumentCodec for JsonCdc {
    type Value = Value;
    type Options = JsonCdcOptions;

    fn encode(&self, value: &Value) -> Result<Vec<u8>, ArgumentCodecError> {
        validate(value, "$", &JsonCdcOptions::default())?;
        let mut out = serde_json::to_vec(value)?;
        out.push(b'\n');
        Ok(out)
    }

    fn decode(&self, bytes: &[u8], options: &JsonCdcOptions) -> Result<Value, ArgumentCodecError> {
        let value: Value = serde_json::from_slice(bytes)?;
        validate(&value, "$", options)?;
        Ok(value)
    }
}

fn malformed(path: &str, reason: impl Into<String>) -> ArgumentCodecError {
    ArgumentCodecError::Malformed {
        path: path.to_string(),
        reason: reason.into(),
    }
}

fn validate(value: &Value, path: &str, options: &JsonCdcOptions) -> Result<(), ArgumentCodecError> {
    let object = value
        .as_object()
        .ok_or_else(|| malformed(path, "expected an object"))?;
    let type_name = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(path, "missing string field \"type\""))?;

    match type_name {
        "Void" => Ok(()),
        "Optional" => match payload(object, path)? {
            Value::Null => Ok(()),
            inner => validate(inner, &format!("{path}.value"), options),
        },
        "Array" => {
            let items = payload(object, path)?
                .as_array()
                .ok_or_else(|| malformed(path, "array payload must be a list"))?;
            for (i, item) in items.iter().enumerate() {
                validate(item, &format!("{path}.value[{i}]"), options)?;
            }
            Ok(())
        }
        "Dictionary" => {
            let entries = payload(object, path)?
                .as_array()
                .ok_or_else(|| malformed(path, "dictionary payload must be a list"))?;
            for (i, entry) in entries.iter().enumerate() {
                let entry_path = format!("{path}.value[{i}]");
                let key = entry
                    .get("key")
                    .ok_or_else(|| malformed(&entry_path, "missing field \"key\""))?;
                let val = entry
                    .get("value")
                    .ok_or_else(|| malformed(&entry_path, "missing field \"value\""))?;
                validate(key, &format!("{entry_path}.key"), options)?;
                validate(val, &format!("{entry_path}.value"), options)?;
            }
            Ok(())
        }
        t if COMPOSITE_TYPES.contains(&t) => {
            let body = payload(object, path)?;
            let fields = body
                .get("fields")
                .and_then(Value::as_array)
                .ok_or_else(|| malformed(path, "composite payload needs a \"fields\" list"))?;
            for (i, field) in fields.iter().enumerate() {
                let field_path = format!("{path}.value.fields[{i}]");
                let inner = field
                    .get("value")
                    .ok_or_else(|| malformed(&field_path, "missing field \"value\""))?;
                validate(inner, &format!("{field_path}.value"), options)?;
            }
            Ok(())
        }
        t if SCALAR_TYPES.contains(&t) => payload(object, path).map(|_| ()),
        other if options.allow_unknown_types => {
            tracing::debug!(type_name = other, path, "accepting unknown value type");
            Ok(())
        }
        other => Err(ArgumentCodecError::UnknownType {
            path: path.to_string(),
            type_name: other.to_string(),
        }),
    }
}

fn payload<'a>(object: &'a Map<String, Value>, path: &str) -> Result<&'a Value, ArgumentCodecError> {
    object
        .get("value")
        .ok_or_else(|| malformed(path, "missing field \"value\""))
}
