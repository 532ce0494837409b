//! Dynamically-shaped values walked by the engine

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::types::{MemberInfo, Shape, TypeDesc};

/// An object that enumerates its members at runtime
pub trait DynamicMembers: Send + Sync + fmt::Debug {
    fn type_desc(&self) -> TypeDesc;

    fn member_names(&self) -> Vec<String>;

    fn member(&self, name: &str) -> Option<Value>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectValue {
    pub ty: TypeDesc,
    pub fields: Vec<(String, Value)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeqValue {
    pub ty: TypeDesc,
    pub items: Vec<Value>,
}

/// Row-major rectangular array
#[derive(Debug, Clone, PartialEq)]
pub struct GridValue {
    pub ty: TypeDesc,
    pub dims: Vec<usize>,
    pub items: Vec<Value>,
}

impl GridValue {
    pub fn rank(&self) -> usize {
        self.dims.len()
    }
}

/// A runtime value
///
/// Composite variants are reference counted, so cloning a value never copies
/// an object graph.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Str(String),
    Type(TypeDesc),
    Object(Arc<ObjectValue>),
    Seq(Arc<SeqValue>),
    Grid(Arc<GridValue>),
    Expando(Arc<BTreeMap<String, Value>>),
    Dynamic(Arc<dyn DynamicMembers>),
}

impl Value {
    pub fn object(ty: TypeDesc, fields: Vec<(String, Value)>) -> Self {
        Value::Object(Arc::new(ObjectValue { ty, fields }))
    }

    pub fn seq(ty: TypeDesc, items: Vec<Value>) -> Self {
        Value::Seq(Arc::new(SeqValue { ty, items }))
    }

    /// A heterogeneous sequence
    pub fn untyped_seq(items: Vec<Value>) -> Self {
        Self::seq(TypeDesc::untyped_list(), items)
    }

    pub fn expando<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Expando(Arc::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn dynamic(object: impl DynamicMembers + 'static) -> Self {
        Value::Dynamic(Arc::new(object))
    }

    /// A record of an unnamed type, named after its members (`{a, b}`)
    ///
    /// Member types are taken from the runtime type of each field.
    pub fn anonymous<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let fields: Vec<(String, Value)> =
            fields.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let name = format!(
            "{{{}}}",
            fields
                .iter()
                .map(|(k, _)| k.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        let members = fields
            .iter()
            .map(|(k, v)| {
                MemberInfo::new(
                    k.clone(),
                    v.runtime_type().unwrap_or_else(TypeDesc::any),
                    name.clone(),
                )
            })
            .collect();
        let ty = TypeDesc::with_members(name, Shape::Record, members);
        Self::object(ty, fields)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Bool(_)
                | Value::Int(_)
                | Value::UInt(_)
                | Value::Float(_)
                | Value::Char(_)
                | Value::Str(_)
        )
    }

    /// Runtime type of the value; `None` for null
    pub fn runtime_type(&self) -> Option<TypeDesc> {
        let ty = match self {
            Value::Null => return None,
            Value::Bool(_) => TypeDesc::primitive("bool", Value::Bool(false)),
            Value::Int(_) => TypeDesc::primitive("i64", Value::Int(0)),
            Value::UInt(_) => TypeDesc::primitive("u64", Value::UInt(0)),
            Value::Float(_) => TypeDesc::primitive("f64", Value::Float(0.0)),
            Value::Char(_) => TypeDesc::primitive("char", Value::Char('\0')),
            Value::Str(_) => TypeDesc::primitive("String", Value::Str(String::new())),
            Value::Type(_) => TypeDesc::type_descriptor(),
            Value::Object(o) => o.ty.clone(),
            Value::Seq(s) => s.ty.clone(),
            Value::Grid(g) => g.ty.clone(),
            Value::Expando(_) => TypeDesc::expando(),
            Value::Dynamic(d) => d.type_desc(),
        };
        Some(ty)
    }

    /// Value of a named member; `None` when the value has no such member
    pub fn member_value(&self, name: &str) -> Option<Value> {
        match self {
            Value::Object(o) => o
                .fields
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone()),
            Value::Expando(map) => map.get(name).cloned(),
            Value::Dynamic(d) => d.member(name),
            _ => None,
        }
    }

    /// Member names of objects, expandos and dynamic objects
    pub fn member_names(&self) -> Vec<String> {
        match self {
            Value::Object(o) => o.fields.iter().map(|(k, _)| k.clone()).collect(),
            Value::Expando(map) => map.keys().cloned().collect(),
            Value::Dynamic(d) => d.member_names(),
            _ => Vec::new(),
        }
    }

    /// Elements of a sequence or grid
    pub fn items(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(s) => Some(&s.items),
            Value::Grid(g) => Some(&g.items),
            _ => None,
        }
    }

    /// Whether the value can stand for a value of `ty`; null always can
    pub fn conforms_to(&self, ty: &TypeDesc) -> bool {
        match (ty.shape(), self) {
            (_, Value::Null) | (Shape::Any, _) => true,
            (Shape::Primitive, v) => match ty.default_value() {
                Value::Null => v.is_scalar(),
                default => default.scalar_family() == v.scalar_family(),
            },
            (Shape::Struct | Shape::Record, Value::Object(o)) => o.ty == *ty,
            (
                Shape::List(_) | Shape::Array(_) | Shape::Set(_) | Shape::Untyped,
                Value::Seq(_),
            ) => true,
            (Shape::MultiArray(_), Value::Grid(_)) => true,
            (Shape::Expando, Value::Expando(_)) => true,
            (Shape::Dynamic, Value::Dynamic(d)) => d.type_desc() == *ty,
            (Shape::TypeDescriptor, Value::Type(_)) => true,
            _ => false,
        }
    }

    fn scalar_family(&self) -> Option<u8> {
        match self {
            Value::Bool(_) => Some(0),
            Value::Int(_) | Value::UInt(_) | Value::Float(_) => Some(1),
            Value::Char(_) => Some(2),
            Value::Str(_) => Some(3),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<&TypeDesc> {
        match self {
            Value::Type(t) => Some(t),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Int(a), Value::UInt(b)) | (Value::UInt(b), Value::Int(a)) => {
                u64::try_from(*a).map_or(false, |a| a == *b)
            }
            // NaN equals NaN so that a value always equals itself
            (Value::Float(a), Value::Float(b)) => a == b || a.to_bits() == b.to_bits(),
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Type(a), Value::Type(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b) || a == b,
            (Value::Seq(a), Value::Seq(b)) => Arc::ptr_eq(a, b) || a == b,
            (Value::Grid(a), Value::Grid(b)) => Arc::ptr_eq(a, b) || a == b,
            (Value::Expando(a), Value::Expando(b)) => Arc::ptr_eq(a, b) || a == b,
            (Value::Dynamic(a), Value::Dynamic(b)) => {
                Arc::ptr_eq(a, b)
                    || (a.type_desc() == b.type_desc()
                        && a.member_names() == b.member_names()
                        && a
                            .member_names()
                            .iter()
                            .all(|n| a.member(n) == b.member(n)))
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::UInt(u) => write!(f, "{}", u),
            Value::Float(x) => write!(f, "{}", x),
            Value::Char(c) => write!(f, "{}", c),
            Value::Str(s) => f.write_str(s),
            Value::Type(t) => f.write_str(t.name()),
            Value::Object(o) => f.write_str(o.ty.name()),
            Value::Seq(s) => f.write_str(s.ty.name()),
            Value::Grid(g) => f.write_str(g.ty.name()),
            Value::Expando(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_str("}")
            }
            Value::Dynamic(d) => f.write_str(d.type_desc().name()),
        }
    }
}
