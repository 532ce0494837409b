//! structdiff Core - Deep structural comparison engine
//!
//! This crate compares two values of the same static type and reports every
//! discrepancy as a [`Difference`] located by a path such as
//! `orders[7].total`, including:
//! - Compile-time reflection of structs, records and collections
//! - Comparer overrides by member, name, type or predicate
//! - Container strategies for sequences, sets, grids and dynamic objects
//! - Index- and key-based list reconciliation
//! - An optional difference tree mirroring the compared object graph
//!
//! ```
//! use structdiff_core::{reflect_struct, Comparer};
//!
//! reflect_struct! {
//!     pub struct Order {
//!         pub id: u32,
//!         pub total: f64,
//!     }
//! }
//!
//! let comparer = Comparer::new();
//! let (equal, differences) = comparer
//!     .compare_with_differences(&Order { id: 1, total: 9.5 }, &Order { id: 1, total: 10.0 })
//!     .unwrap();
//! assert!(!equal);
//! assert_eq!(differences[0].path, "total");
//! ```

pub mod config;
pub mod diff;
pub mod engine;
pub mod errors;
pub mod logging_facility;
pub mod overrides;
pub mod reflect;
pub mod settings;
pub mod strategies;
pub mod value_comparer;

#[doc(hidden)]
pub mod __macro_support {
    pub use structdiff_core_types::schema;
    pub use tracing;
}

// Re-export commonly used types
pub use config::CompareProfile;
pub use diff::{Difference, DifferenceKind, DifferenceTree, NodeContext, TreeMember};
pub use engine::{Comparer, ComparerFactory, Differences, ObjectComparer};
pub use errors::{CompareError, ExError, ExErrorKind, Result};
pub use overrides::{OverridesCollection, ResolverStage};
pub use reflect::{Grid, MemberInfo, Reflect, TypeDesc, Value};
pub use settings::ComparisonSettings;
pub use strategies::{ContainerStrategy, KeyOptions, ListComparisonOptions, ListMode};
pub use value_comparer::{
    AlwaysEqualComparer, DefaultValueComparer, FnValueComparer, IgnoreCaseComparer,
    NullAsDefaultComparer, ValueComparer,
};
