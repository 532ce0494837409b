//! JSON interop

use super::impls::Reflect;
use super::types::TypeDesc;
use super::value::Value;

impl Value {
    /// Objects become expandos, arrays untyped sequences
    ///
    /// Integers that fit `i64` become `Int`; larger ones become `UInt`, whose
    /// runtime type is `u64`. Comparing such a member against an `i64` one
    /// therefore reports a TypeMismatch noting `u64 != i64`, the same way an
    /// integer against a fraction reports `i64 != f64`.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Array(items) => {
                Value::untyped_seq(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => {
                Value::expando(map.iter().map(|(k, v)| (k.clone(), Value::from_json(v))))
            }
        }
    }
}

/// A JSON document has no static shape
impl Reflect for serde_json::Value {
    fn type_desc() -> TypeDesc {
        TypeDesc::any()
    }

    fn to_value(&self) -> Value {
        Value::from_json(self)
    }
}
