use propkv_common::{PropError, PropResult, PropValue};
use serde_json::Value;

/// Pluggable conversion between logical values and host primitives.
///
/// `serialize` returns a JSON value that the engine then maps onto the
/// closed host-primitive set (see [`to_primitive`]); returning a shape with
/// no mapping surfaces [`PropError::InvalidSerializationResult`] at the call
/// site. `deserialize` is total: foreign or damaged payloads decode to the
/// closest JSON representation rather than erroring.
pub trait PropCodec {
    fn serialize(&self, value: &Value, id: &str) -> PropResult<Value>;
    fn deserialize(&self, raw: PropValue, id: &str) -> Value;
}

/// Default codec: every logical value round-trips as JSON text.
///
/// Stringifying even plain strings keeps decoding unambiguous — a stored
/// `"abc"` (with quotes) is a serialized string, while a bare `abc` is
/// foreign data and decodes to itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl PropCodec for JsonCodec {
    fn serialize(&self, value: &Value, _id: &str) -> PropResult<Value> {
        match serde_json::to_string(value) {
            Ok(text) => Ok(Value::String(text)),
            Err(e) => Err(PropError::Serialize(e.to_string().into())),
        }
    }

    fn deserialize(&self, raw: PropValue, _id: &str) -> Value {
        match raw {
            PropValue::String(s) => serde_json::from_str(&s).unwrap_or(Value::String(s)),
            PropValue::Bool(b) => Value::Bool(b),
            PropValue::Double(d) => serde_json::Number::from_f64(d)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            PropValue::Vec3(v) => serde_json::json!([v.x, v.y, v.z]),
        }
    }
}

/// Map a serializer's JSON output onto a host primitive.
///
/// Bool, finite number and string map directly; an array of exactly three
/// numbers maps to [PropValue::Vec3]. Everything else is a programming
/// error in the active serializer.
pub(crate) fn to_primitive(value: Value, id: &str) -> PropResult<PropValue> {
    let kind = json_kind(&value);
    let invalid = || PropError::InvalidSerializationResult {
        id: id.into(),
        kind: kind.into(),
    };
    match value {
        Value::Bool(b) => Ok(PropValue::Bool(b)),
        Value::Number(n) => n.as_f64().map(PropValue::Double).ok_or_else(invalid),
        Value::String(s) => Ok(PropValue::String(s)),
        Value::Array(items) if items.len() == 3 => {
            let mut xyz = [0.0f64; 3];
            for (slot, item) in xyz.iter_mut().zip(&items) {
                match item.as_f64() {
                    Some(f) => *slot = f,
                    None => return Err(invalid()),
                }
            }
            Ok(PropValue::Vec3(xyz.into()))
        }
        _ => Err(invalid()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
