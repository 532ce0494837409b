//! Unordered collections

use super::{collection_stops, null_pair, precondition, ContainerStrategy, NullPair, StrategyScope};
use crate::diff::{Difference, DifferenceKind};
use crate::engine::{empty, failed, Differences};
use crate::reflect::{Shape, TypeDesc, Value};

/// Compares sets as multisets using the element type's value comparer
///
/// Unmatched elements are reported at the set's own path.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetStrategy;

impl ContainerStrategy for SetStrategy {
    fn name(&self) -> &'static str {
        "set"
    }

    fn matches(&self, ty: &TypeDesc, _v1: &Value, _v2: &Value) -> bool {
        matches!(ty.shape(), Shape::Set(_))
    }

    fn compare(&self, scope: &StrategyScope<'_>) -> Differences {
        let element = match scope.ty.element_type() {
            Some(e) => e.clone(),
            None => return precondition(self.name(), scope.ty, "not a set type"),
        };
        if null_pair(scope.comparer.settings(), scope.v1, scope.v2) != NullPair::NeitherNull {
            return empty();
        }
        let (left, right) = match (scope.v1.items(), scope.v2.items()) {
            (Some(l), Some(r)) if matches!(scope.v1, Value::Seq(_)) && matches!(scope.v2, Value::Seq(_)) => (l, r),
            _ => return precondition(self.name(), scope.ty, "operands are not sets"),
        };
        if let Some(bad) = left.iter().chain(right).find(|v| !v.conforms_to(&element)) {
            let found = bad
                .runtime_type()
                .map_or_else(|| "null".to_string(), |t| t.name().to_string());
            return precondition(
                self.name(),
                scope.ty,
                format!("element of type {} in a set of {}", found, element.name()),
            );
        }

        let value_comparer = match scope.comparer.value_comparer_for(&element) {
            Ok(c) => c,
            Err(e) => return failed(e),
        };
        let settings = scope.comparer.settings();
        let mut matched = vec![false; right.len()];
        let mut out = Vec::new();
        for item in left {
            let found = right
                .iter()
                .enumerate()
                .find(|(j, other)| !matched[*j] && value_comparer.equal(item, other, settings))
                .map(|(j, _)| j);
            match found {
                Some(j) => matched[j] = true,
                None => out.push(Difference::new(
                    "",
                    value_comparer.render(item),
                    "",
                    DifferenceKind::MissingInSecond,
                )),
            }
        }
        for (item, _) in right.iter().zip(&matched).filter(|(_, m)| !**m) {
            out.push(Difference::new(
                "",
                "",
                value_comparer.render(item),
                DifferenceKind::MissingInFirst,
            ));
        }
        tracing::trace!(unmatched = out.len(), "set compared");

        let comparer = scope.comparer.clone();
        let cursor = scope.cursor.clone();
        Box::new(out.into_iter().map(move |d| Ok(comparer.record(&cursor, d))))
    }

    fn stops_further_comparison(&self, scope: &StrategyScope<'_>) -> bool {
        collection_stops(scope)
    }
}
