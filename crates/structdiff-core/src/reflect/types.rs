//! Type descriptors and member metadata

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use super::value::Value;

/// Structural category of a type, used for engine and strategy dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Compared as a whole by a value comparer
    Primitive,
    /// Static type unknown; the runtime type of each operand decides
    Any,
    /// Named members, compared member by member
    Struct,
    /// Named members compared exhaustively against each operand's own type
    Record,
    /// Growable ordered sequence
    List(TypeDesc),
    /// Fixed-size ordered sequence
    Array(TypeDesc),
    /// Unordered collection
    Set(TypeDesc),
    /// Sequence whose elements carry unrelated runtime types
    Untyped,
    /// Rectangular array with one or more dimensions
    MultiArray(TypeDesc),
    /// String-keyed property bag
    Expando,
    /// Object exposing its members through [`DynamicMembers`](super::DynamicMembers)
    Dynamic,
    /// A value that is itself a type descriptor
    TypeDescriptor,
}

/// A structural member of a type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    name: String,
    declared_type: TypeDesc,
    declaring_type: String,
}

impl MemberInfo {
    pub fn new(
        name: impl Into<String>,
        declared_type: TypeDesc,
        declaring_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_type,
            declaring_type: declaring_type.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_type(&self) -> &TypeDesc {
        &self.declared_type
    }

    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    /// `Declaring.member`, the identity used by exact member overrides
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.declaring_type, self.name)
    }
}

type MemberFn = fn() -> Vec<MemberInfo>;

struct TypeInfo {
    name: String,
    shape: Shape,
    member_fn: Option<MemberFn>,
    members: OnceLock<Vec<MemberInfo>>,
    default: Value,
}

/// Shared, cheaply cloneable description of a type
///
/// Two descriptors are equal when their names are equal. Member lists may be
/// supplied as a function so that self-referential types can be described;
/// the function runs on first access.
#[derive(Clone)]
pub struct TypeDesc(Arc<TypeInfo>);

impl TypeDesc {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self::build(name.into(), shape, None, OnceLock::new(), Value::Null)
    }

    fn build(
        name: String,
        shape: Shape,
        member_fn: Option<MemberFn>,
        members: OnceLock<Vec<MemberInfo>>,
        default: Value,
    ) -> Self {
        TypeDesc(Arc::new(TypeInfo {
            name,
            shape,
            member_fn,
            members,
            default,
        }))
    }

    /// A primitive type with the value used when a member is absent
    pub fn primitive(name: impl Into<String>, default: Value) -> Self {
        Self::build(name.into(), Shape::Primitive, None, OnceLock::new(), default)
    }

    /// A struct whose members are produced lazily by `members`
    pub fn structure(name: impl Into<String>, members: MemberFn) -> Self {
        Self::build(
            name.into(),
            Shape::Struct,
            Some(members),
            OnceLock::new(),
            Value::Null,
        )
    }

    /// A record whose members are produced lazily by `members`
    pub fn record(name: impl Into<String>, members: MemberFn) -> Self {
        Self::build(
            name.into(),
            Shape::Record,
            Some(members),
            OnceLock::new(),
            Value::Null,
        )
    }

    /// A type with an already known member list
    pub fn with_members(name: impl Into<String>, shape: Shape, members: Vec<MemberInfo>) -> Self {
        Self::build(
            name.into(),
            shape,
            None,
            OnceLock::from(dedup_members(members)),
            Value::Null,
        )
    }

    pub fn any() -> Self {
        Self::new("Any", Shape::Any)
    }

    pub fn expando() -> Self {
        Self::new("Expando", Shape::Expando)
    }

    pub fn untyped_list() -> Self {
        Self::new("List", Shape::Untyped)
    }

    pub fn type_descriptor() -> Self {
        Self::new("Type", Shape::TypeDescriptor)
    }

    pub fn list(element: TypeDesc) -> Self {
        Self::new(format!("Vec<{}>", element.name()), Shape::List(element))
    }

    pub fn array(element: TypeDesc, len: usize) -> Self {
        Self::new(
            format!("[{}; {}]", element.name(), len),
            Shape::Array(element),
        )
    }

    pub fn set(name: impl Into<String>, element: TypeDesc) -> Self {
        Self::new(name, Shape::Set(element))
    }

    pub fn grid(element: TypeDesc) -> Self {
        Self::new(
            format!("Grid<{}>", element.name()),
            Shape::MultiArray(element),
        )
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn shape(&self) -> &Shape {
        &self.0.shape
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.0.shape, Shape::Primitive)
    }

    pub fn is_any(&self) -> bool {
        matches!(self.0.shape, Shape::Any)
    }

    pub fn is_record(&self) -> bool {
        matches!(self.0.shape, Shape::Record)
    }

    /// Element type of a list, array, set or grid
    pub fn element_type(&self) -> Option<&TypeDesc> {
        match &self.0.shape {
            Shape::List(e) | Shape::Array(e) | Shape::Set(e) | Shape::MultiArray(e) => Some(e),
            _ => None,
        }
    }

    /// Members in declaration order, deduplicated by name
    pub fn members(&self) -> &[MemberInfo] {
        self.0.members.get_or_init(|| {
            self.0
                .member_fn
                .map(|f| dedup_members(f()))
                .unwrap_or_default()
        })
    }

    pub fn member(&self, name: &str) -> Option<&MemberInfo> {
        self.members().iter().find(|m| m.name() == name)
    }

    /// Value substituted for an absent member of this type
    pub fn default_value(&self) -> Value {
        self.0.default.clone()
    }
}

/// Keeps the first member of each name
fn dedup_members(members: Vec<MemberInfo>) -> Vec<MemberInfo> {
    let mut seen = std::collections::BTreeSet::new();
    members
        .into_iter()
        .filter(|m| seen.insert(m.name.clone()))
        .collect()
}

impl PartialEq for TypeDesc {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for TypeDesc {}

impl Hash for TypeDesc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl fmt::Debug for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDesc({})", self.name())
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
