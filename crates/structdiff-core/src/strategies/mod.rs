//! Container strategies
//!
//! A strategy takes over the comparison of a value pair whose type it
//! recognizes. The engine probes strategies in order and uses the first
//! match; built-ins come in this order:
//!
//! | Strategy | Matches |
//! |---|---|
//! | `multi_array` | `Grid<T>` |
//! | `expando` | string-keyed property bags |
//! | `dynamic` | [`DynamicMembers`](crate::reflect::DynamicMembers) objects |
//! | `record` | tuples, anonymous records, `reflect_record!` types |
//! | `set` | `BTreeSet`, `HashSet` |
//! | `sequence` | `Vec`, `VecDeque`, arrays |
//! | `untyped_sequence` | heterogeneous sequences |
//! | `type_descriptor` | `TypeDesc` values |

pub mod dynamic;
pub mod lists;
pub mod multi_array;
pub mod sequence;
pub mod set;
pub mod type_desc;

use std::sync::Arc;

use crate::diff::NodeCursor;
use crate::engine::{Comparer, Differences};
use crate::reflect::{MemberInfo, TypeDesc, Value};
use crate::settings::ComparisonSettings;

pub use dynamic::{DynamicObjectStrategy, ExpandoStrategy, RecordStrategy};
pub use lists::{KeyOptions, ListComparisonOptions, ListMode};
pub use multi_array::MultiArrayStrategy;
pub use sequence::{GenericSequenceStrategy, UntypedSequenceStrategy};
pub use set::SetStrategy;
pub use type_desc::TypeDescriptorStrategy;

/// Everything a strategy needs about the value pair being compared
pub struct StrategyScope<'a> {
    pub comparer: &'a Comparer,
    pub ty: &'a TypeDesc,
    pub v1: &'a Value,
    pub v2: &'a Value,
    pub member: Option<&'a MemberInfo>,
    pub cursor: &'a NodeCursor,
}

pub trait ContainerStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn matches(&self, ty: &TypeDesc, v1: &Value, v2: &Value) -> bool;

    fn compare(&self, scope: &StrategyScope<'_>) -> Differences;

    /// False lets the engine continue with the null guard and members
    fn stops_further_comparison(&self, _scope: &StrategyScope<'_>) -> bool {
        true
    }

    /// Members of a matched type the engine must not compare
    fn skips_member(&self, _declaring: &TypeDesc, _member: &MemberInfo) -> bool {
        false
    }
}

/// Built-in strategies in probing order
pub fn builtin_strategies() -> Vec<Arc<dyn ContainerStrategy>> {
    vec![
        Arc::new(MultiArrayStrategy),
        Arc::new(ExpandoStrategy),
        Arc::new(DynamicObjectStrategy),
        Arc::new(RecordStrategy),
        Arc::new(SetStrategy),
        Arc::new(GenericSequenceStrategy),
        Arc::new(UntypedSequenceStrategy),
        Arc::new(TypeDescriptorStrategy),
    ]
}

/// How a pair of collections relates when nulls are involved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NullPair {
    NeitherNull,
    BothNull,
    /// One side null, the other empty, and empty counts as null
    Equivalent,
    /// One side null and not equivalent to the other
    OneNull,
}

pub(crate) fn null_pair(settings: &ComparisonSettings, v1: &Value, v2: &Value) -> NullPair {
    match (v1.is_null(), v2.is_null()) {
        (false, false) => NullPair::NeitherNull,
        (true, true) => NullPair::BothNull,
        (true, false) | (false, true) => {
            let other = if v1.is_null() { v2 } else { v1 };
            if settings.empty_and_null_collections_equal() && is_empty_collection(other) {
                NullPair::Equivalent
            } else {
                NullPair::OneNull
            }
        }
    }
}

fn is_empty_collection(value: &Value) -> bool {
    match value {
        Value::Seq(s) => s.items.is_empty(),
        Value::Grid(g) => g.items.is_empty(),
        Value::Expando(map) => map.is_empty(),
        _ => false,
    }
}

/// Collections leave a lone null to the engine's null guard
pub(crate) fn collection_stops(scope: &StrategyScope<'_>) -> bool {
    null_pair(scope.comparer.settings(), scope.v1, scope.v2) != NullPair::OneNull
}

pub(crate) fn precondition(strategy: &'static str, ty: &TypeDesc, reason: impl Into<String>) -> Differences {
    crate::engine::failed(crate::errors::CompareError::Precondition {
        strategy,
        type_name: ty.name().to_string(),
        reason: reason.into(),
    })
}
