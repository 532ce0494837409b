//! Values that are themselves types

use super::{precondition, ContainerStrategy, StrategyScope};
use crate::diff::{Difference, DifferenceKind};
use crate::engine::{empty, Differences};
use crate::reflect::{Shape, TypeDesc, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct TypeDescriptorStrategy;

impl ContainerStrategy for TypeDescriptorStrategy {
    fn name(&self) -> &'static str {
        "type_descriptor"
    }

    fn matches(&self, ty: &TypeDesc, _v1: &Value, _v2: &Value) -> bool {
        matches!(ty.shape(), Shape::TypeDescriptor)
    }

    fn compare(&self, scope: &StrategyScope<'_>) -> Differences {
        let comparer = scope.comparer;
        match (scope.v1, scope.v2) {
            (Value::Null, Value::Null) => empty(),
            (Value::Type(a), Value::Type(b)) if a == b => empty(),
            (Value::Type(a), Value::Type(b)) => comparer.emit(
                scope.cursor,
                Difference::new("", a.name(), b.name(), DifferenceKind::TypeMismatch),
            ),
            (Value::Null, Value::Type(_)) | (Value::Type(_), Value::Null) => comparer.emit(
                scope.cursor,
                Difference::value_mismatch("", comparer.render(scope.v1), comparer.render(scope.v2)),
            ),
            _ => precondition(self.name(), scope.ty, "operands are not type descriptors"),
        }
    }
}
