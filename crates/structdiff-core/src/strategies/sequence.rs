//! Ordered sequences

use super::lists::compare_lists;
use super::{collection_stops, null_pair, precondition, ContainerStrategy, NullPair, StrategyScope};
use crate::engine::{empty, Differences};
use crate::reflect::{MemberInfo, Shape, TypeDesc, Value};

/// `Vec`, `VecDeque` and fixed-size arrays
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericSequenceStrategy;

impl ContainerStrategy for GenericSequenceStrategy {
    fn name(&self) -> &'static str {
        "sequence"
    }

    fn matches(&self, ty: &TypeDesc, _v1: &Value, _v2: &Value) -> bool {
        matches!(ty.shape(), Shape::List(_) | Shape::Array(_))
    }

    fn compare(&self, scope: &StrategyScope<'_>) -> Differences {
        let (element, label) = match scope.ty.shape() {
            Shape::Array(e) => (e.clone(), "Length"),
            Shape::List(e) => (e.clone(), "Count"),
            _ => return precondition(self.name(), scope.ty, "not a sequence type"),
        };
        compare_sequences(self.name(), scope, element, label)
    }

    fn stops_further_comparison(&self, scope: &StrategyScope<'_>) -> bool {
        collection_stops(scope)
    }

    fn skips_member(&self, _declaring: &TypeDesc, _member: &MemberInfo) -> bool {
        true
    }
}

/// Sequences whose elements carry their own runtime types
#[derive(Debug, Clone, Copy, Default)]
pub struct UntypedSequenceStrategy;

impl ContainerStrategy for UntypedSequenceStrategy {
    fn name(&self) -> &'static str {
        "untyped_sequence"
    }

    fn matches(&self, ty: &TypeDesc, _v1: &Value, _v2: &Value) -> bool {
        matches!(ty.shape(), Shape::Untyped)
    }

    fn compare(&self, scope: &StrategyScope<'_>) -> Differences {
        compare_sequences(self.name(), scope, TypeDesc::any(), "Count")
    }

    fn stops_further_comparison(&self, scope: &StrategyScope<'_>) -> bool {
        collection_stops(scope)
    }

    fn skips_member(&self, _declaring: &TypeDesc, _member: &MemberInfo) -> bool {
        true
    }
}

fn compare_sequences(
    strategy: &'static str,
    scope: &StrategyScope<'_>,
    element: TypeDesc,
    count_label: &'static str,
) -> Differences {
    if null_pair(scope.comparer.settings(), scope.v1, scope.v2) != NullPair::NeitherNull {
        return empty();
    }
    match (scope.v1, scope.v2) {
        (Value::Seq(left), Value::Seq(right)) => compare_lists(
            scope.comparer,
            scope.cursor,
            left.clone(),
            right.clone(),
            element,
            count_label,
        ),
        _ => precondition(strategy, scope.ty, "operands are not sequences"),
    }
}
