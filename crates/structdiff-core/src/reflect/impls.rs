//! `Reflect` trait, standard-library impls and the derivation macros

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use super::types::{MemberInfo, Shape, TypeDesc};
use super::value::{GridValue, Value};

/// A type the engine can compare
///
/// `type_desc` is the static type; `to_value` captures an instance.
pub trait Reflect {
    fn type_desc() -> TypeDesc;

    fn to_value(&self) -> Value;
}

macro_rules! reflect_primitive {
    ($variant:ident, $default:expr, $($ty:ty),+) => {
        $(
            impl Reflect for $ty {
                fn type_desc() -> TypeDesc {
                    TypeDesc::primitive(stringify!($ty), Value::$variant($default))
                }

                fn to_value(&self) -> Value {
                    Value::$variant((*self).into())
                }
            }
        )+
    };
}

reflect_primitive!(Int, 0, i8, i16, i32, i64);
reflect_primitive!(UInt, 0, u8, u16, u32, u64);
reflect_primitive!(Float, 0.0, f32, f64);
reflect_primitive!(Bool, false, bool);
reflect_primitive!(Char, '\0', char);

impl Reflect for isize {
    fn type_desc() -> TypeDesc {
        TypeDesc::primitive("isize", Value::Int(0))
    }

    fn to_value(&self) -> Value {
        Value::Int(*self as i64)
    }
}

impl Reflect for usize {
    fn type_desc() -> TypeDesc {
        TypeDesc::primitive("usize", Value::UInt(0))
    }

    fn to_value(&self) -> Value {
        Value::UInt(*self as u64)
    }
}

impl Reflect for String {
    fn type_desc() -> TypeDesc {
        TypeDesc::primitive("String", Value::Str(String::new()))
    }

    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl Reflect for &str {
    fn type_desc() -> TypeDesc {
        String::type_desc()
    }

    fn to_value(&self) -> Value {
        Value::Str((*self).to_string())
    }
}

/// `None` is the absent value of `T`
impl<T: Reflect> Reflect for Option<T> {
    fn type_desc() -> TypeDesc {
        T::type_desc()
    }

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, Reflect::to_value)
    }
}

impl<T: Reflect> Reflect for Box<T> {
    fn type_desc() -> TypeDesc {
        T::type_desc()
    }

    fn to_value(&self) -> Value {
        self.as_ref().to_value()
    }
}

impl<T: Reflect> Reflect for Arc<T> {
    fn type_desc() -> TypeDesc {
        T::type_desc()
    }

    fn to_value(&self) -> Value {
        self.as_ref().to_value()
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::list(T::type_desc())
    }

    fn to_value(&self) -> Value {
        Value::seq(Self::type_desc(), self.iter().map(Reflect::to_value).collect())
    }
}

impl<T: Reflect> Reflect for VecDeque<T> {
    fn type_desc() -> TypeDesc {
        let element = T::type_desc();
        TypeDesc::new(
            format!("VecDeque<{}>", element.name()),
            Shape::List(element),
        )
    }

    fn to_value(&self) -> Value {
        Value::seq(Self::type_desc(), self.iter().map(Reflect::to_value).collect())
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn type_desc() -> TypeDesc {
        TypeDesc::array(T::type_desc(), N)
    }

    fn to_value(&self) -> Value {
        Value::seq(Self::type_desc(), self.iter().map(Reflect::to_value).collect())
    }
}

impl<T: Reflect> Reflect for BTreeSet<T> {
    fn type_desc() -> TypeDesc {
        let element = T::type_desc();
        TypeDesc::set(format!("BTreeSet<{}>", element.name()), element)
    }

    fn to_value(&self) -> Value {
        Value::seq(Self::type_desc(), self.iter().map(Reflect::to_value).collect())
    }
}

impl<T: Reflect, S> Reflect for HashSet<T, S> {
    fn type_desc() -> TypeDesc {
        let element = T::type_desc();
        TypeDesc::set(format!("HashSet<{}>", element.name()), element)
    }

    fn to_value(&self) -> Value {
        Value::seq(Self::type_desc(), self.iter().map(Reflect::to_value).collect())
    }
}

/// String-keyed maps are property bags
impl<V: Reflect> Reflect for BTreeMap<String, V> {
    fn type_desc() -> TypeDesc {
        TypeDesc::expando()
    }

    fn to_value(&self) -> Value {
        Value::expando(self.iter().map(|(k, v)| (k.clone(), v.to_value())))
    }
}

impl<V: Reflect, S> Reflect for HashMap<String, V, S> {
    fn type_desc() -> TypeDesc {
        TypeDesc::expando()
    }

    fn to_value(&self) -> Value {
        Value::expando(self.iter().map(|(k, v)| (k.clone(), v.to_value())))
    }
}

impl Reflect for TypeDesc {
    fn type_desc() -> TypeDesc {
        TypeDesc::type_descriptor()
    }

    fn to_value(&self) -> Value {
        Value::Type(self.clone())
    }
}

macro_rules! reflect_tuple {
    ($($idx:tt : $name:ident),+) => {
        impl<$($name: Reflect),+> Reflect for ($($name,)+) {
            fn type_desc() -> TypeDesc {
                let name = format!(
                    "({})",
                    [$($name::type_desc().name().to_string()),+].join(", ")
                );
                let members = vec![
                    $(MemberInfo::new(stringify!($idx), $name::type_desc(), name.clone())),+
                ];
                TypeDesc::with_members(name, Shape::Record, members)
            }

            fn to_value(&self) -> Value {
                Value::object(
                    Self::type_desc(),
                    vec![$((stringify!($idx).to_string(), self.$idx.to_value())),+],
                )
            }
        }
    };
}

reflect_tuple!(0: A, 1: B);
reflect_tuple!(0: A, 1: B, 2: C);

/// Rectangular multi-dimensional array stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    dims: Vec<usize>,
    items: Vec<T>,
}

impl<T> Grid<T> {
    /// `None` when the item count does not match the dimensions
    pub fn new(dims: Vec<usize>, items: Vec<T>) -> Option<Self> {
        (dims.iter().product::<usize>() == items.len()).then_some(Self { dims, items })
    }

    /// Two-dimensional grid from equally long rows
    pub fn from_rows(rows: Vec<Vec<T>>) -> Option<Self> {
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != width) {
            return None;
        }
        let height = rows.len();
        Self::new(vec![height, width], rows.into_iter().flatten().collect())
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }
}

impl<T: Reflect> Reflect for Grid<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::grid(T::type_desc())
    }

    fn to_value(&self) -> Value {
        Value::Grid(Arc::new(GridValue {
            ty: Self::type_desc(),
            dims: self.dims.clone(),
            items: self.items.iter().map(Reflect::to_value).collect(),
        }))
    }
}

/// Declare a struct and derive [`Reflect`] for it
///
/// Members are the struct's fields, in declaration order, named after the
/// field identifiers.
///
/// ```
/// use structdiff_core::reflect::Reflect;
///
/// structdiff_core::reflect_struct! {
///     #[derive(Debug, Clone)]
///     pub struct Line {
///         pub sku: String,
///         pub qty: u32,
///     }
/// }
///
/// let desc = Line::type_desc();
/// assert_eq!(desc.members().len(), 2);
/// ```
#[macro_export]
macro_rules! reflect_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $fty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field : $fty ),*
        }

        $crate::__reflect_impl!(structure, $name { $($field : $fty),* });
    };
}

/// Declare a struct compared as a record and derive [`Reflect`] for it
///
/// Records are compared exhaustively against the members of each operand's
/// own type, and the engine never looks inside them any other way.
#[macro_export]
macro_rules! reflect_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $fty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field : $fty ),*
        }

        $crate::__reflect_impl!(record, $name { $($field : $fty),* });
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __reflect_impl {
    ($ctor:ident, $name:ident { $($field:ident : $fty:ty),* }) => {
        impl $crate::reflect::Reflect for $name {
            fn type_desc() -> $crate::reflect::TypeDesc {
                static DESC: ::std::sync::OnceLock<$crate::reflect::TypeDesc> =
                    ::std::sync::OnceLock::new();
                DESC.get_or_init(|| {
                    fn members() -> ::std::vec::Vec<$crate::reflect::MemberInfo> {
                        ::std::vec![
                            $(
                                $crate::reflect::MemberInfo::new(
                                    stringify!($field),
                                    <$fty as $crate::reflect::Reflect>::type_desc(),
                                    stringify!($name),
                                )
                            ),*
                        ]
                    }
                    $crate::reflect::TypeDesc::$ctor(stringify!($name), members)
                })
                .clone()
            }

            fn to_value(&self) -> $crate::reflect::Value {
                $crate::reflect::Value::object(
                    <Self as $crate::reflect::Reflect>::type_desc(),
                    ::std::vec![
                        $(
                            (
                                stringify!($field).to_string(),
                                $crate::reflect::Reflect::to_value(&self.$field),
                            )
                        ),*
                    ],
                )
            }
        }
    };
}
