//! Compile-time reflection
//!
//! Rust has no runtime member enumeration, so every comparable type describes
//! itself through the [`Reflect`] trait: a [`TypeDesc`] naming its shape and
//! members, and a conversion into the dynamically-shaped [`Value`] the engine
//! walks. Plain structs get both from [`reflect_struct!`](crate::reflect_struct).

pub mod impls;
pub mod json;
pub mod types;
pub mod value;

pub use impls::{Grid, Reflect};
pub use types::{MemberInfo, Shape, TypeDesc};
pub use value::{DynamicMembers, GridValue, ObjectValue, SeqValue, Value};
