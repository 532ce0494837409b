//! Objects compared by member name
//!
//! Expandos and dynamic objects enumerate their members at runtime; records
//! declare them on each operand's own type. All three take the union of both
//! sides' member names and compare each name on its own.

use super::{null_pair, precondition, ContainerStrategy, NullPair, StrategyScope};
use crate::diff::{Difference, DifferenceKind, NodeCursor};
use crate::engine::{empty, failed, Comparer, Differences};
use crate::reflect::{MemberInfo, Shape, TypeDesc, Value};

/// String-keyed property bags
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpandoStrategy;

impl ContainerStrategy for ExpandoStrategy {
    fn name(&self) -> &'static str {
        "expando"
    }

    fn matches(&self, ty: &TypeDesc, _v1: &Value, _v2: &Value) -> bool {
        matches!(ty.shape(), Shape::Expando)
    }

    fn compare(&self, scope: &StrategyScope<'_>) -> Differences {
        if !operands_are(scope, |v| matches!(v, Value::Expando(_))) {
            return precondition(self.name(), scope.ty, "operands are not expando objects");
        }
        compare_by_name(scope, undeclared, synthesized)
    }
}

/// Objects exposing members through `DynamicMembers`
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicObjectStrategy;

impl ContainerStrategy for DynamicObjectStrategy {
    fn name(&self) -> &'static str {
        "dynamic"
    }

    fn matches(&self, ty: &TypeDesc, _v1: &Value, _v2: &Value) -> bool {
        matches!(ty.shape(), Shape::Dynamic)
    }

    fn compare(&self, scope: &StrategyScope<'_>) -> Differences {
        if !operands_are(scope, |v| matches!(v, Value::Dynamic(_))) {
            return precondition(self.name(), scope.ty, "operands are not dynamic objects");
        }
        compare_by_name(scope, undeclared, synthesized)
    }
}

/// Tuples, anonymous records and `reflect_record!` types
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordStrategy;

impl ContainerStrategy for RecordStrategy {
    fn name(&self) -> &'static str {
        "record"
    }

    fn matches(&self, ty: &TypeDesc, _v1: &Value, _v2: &Value) -> bool {
        ty.is_record()
    }

    fn compare(&self, scope: &StrategyScope<'_>) -> Differences {
        if !operands_are(scope, |v| matches!(v, Value::Object(_))) {
            return precondition(self.name(), scope.ty, "operands are not records");
        }
        compare_by_name(scope, declared_member, declared_names)
    }
}

fn operands_are(scope: &StrategyScope<'_>, accepts: impl Fn(&Value) -> bool) -> bool {
    [scope.v1, scope.v2]
        .iter()
        .all(|v| v.is_null() || accepts(v))
}

/// Member names a value exposes, in its own order
fn synthesized(value: &Value) -> Vec<String> {
    value.member_names()
}

/// Member names declared by the value's runtime type
fn declared_names(value: &Value) -> Vec<String> {
    value
        .runtime_type()
        .map(|t| t.members().iter().map(|m| m.name().to_string()).collect())
        .unwrap_or_default()
}

fn undeclared(_value: &Value, _name: &str) -> Option<MemberInfo> {
    None
}

fn declared_member(value: &Value, name: &str) -> Option<MemberInfo> {
    value.runtime_type()?.member(name).cloned()
}

/// One member on each side; `None` when the side lacks the member
struct MemberPair {
    name: String,
    left: Option<Value>,
    right: Option<Value>,
    declared: Option<MemberInfo>,
}

fn compare_by_name(
    scope: &StrategyScope<'_>,
    declared: fn(&Value, &str) -> Option<MemberInfo>,
    names_of: fn(&Value) -> Vec<String>,
) -> Differences {
    let comparer = scope.comparer;
    match null_pair(comparer.settings(), scope.v1, scope.v2) {
        NullPair::BothNull | NullPair::Equivalent => return empty(),
        NullPair::OneNull => {
            return comparer.emit(
                scope.cursor,
                Difference::value_mismatch("", comparer.render(scope.v1), comparer.render(scope.v2)),
            )
        }
        NullPair::NeitherNull => {}
    }

    let mut names = names_of(scope.v1);
    for name in names_of(scope.v2) {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    let left_names = names_of(scope.v1);
    let right_names = names_of(scope.v2);

    let pairs: Vec<MemberPair> = names
        .into_iter()
        .map(|name| {
            let left = left_names
                .contains(&name)
                .then(|| scope.v1.member_value(&name).unwrap_or(Value::Null));
            let right = right_names
                .contains(&name)
                .then(|| scope.v2.member_value(&name).unwrap_or(Value::Null));
            let member = declared(scope.v1, &name).or_else(|| declared(scope.v2, &name));
            MemberPair {
                name,
                left,
                right,
                declared: member,
            }
        })
        .collect();
    tracing::trace!(type_name = scope.ty.name(), members = pairs.len(), "comparing members by name");

    let comparer = comparer.clone();
    let cursor = scope.cursor.clone();
    let owner = scope.ty.name().to_string();
    Box::new(
        pairs
            .into_iter()
            .flat_map(move |pair| compare_pair(&comparer, &cursor, &owner, pair)),
    )
}

fn compare_pair(comparer: &Comparer, cursor: &NodeCursor, owner: &str, pair: MemberPair) -> Differences {
    let use_default = comparer.settings().use_default_if_member_absent();
    let (left, right) = match (pair.left, pair.right) {
        (Some(l), Some(r)) => (l, r),
        (Some(l), None) if use_default => {
            let default = default_for(&l);
            (l, default)
        }
        (None, Some(r)) if use_default => (default_for(&r), r),
        (Some(l), None) => {
            return comparer.emit(
                cursor,
                Difference::new(pair.name, comparer.render(&l), "", DifferenceKind::MissingInSecond),
            )
        }
        (None, Some(r)) => {
            return comparer.emit(
                cursor,
                Difference::new(pair.name, "", comparer.render(&r), DifferenceKind::MissingInFirst),
            )
        }
        (None, None) => return empty(),
    };

    let runtime = left.runtime_type().or_else(|| right.runtime_type());
    let member = match pair.declared {
        Some(m) if !m.declared_type().is_any() => m,
        _ => MemberInfo::new(
            pair.name.clone(),
            runtime.unwrap_or_else(TypeDesc::any),
            owner,
        ),
    };
    let node = cursor.add_descendant(Some(comparer.settings().tree_member(cursor.context(), &member)));

    match (left.runtime_type(), right.runtime_type()) {
        (None, None) => empty(),
        (None, Some(_)) | (Some(_), None) => comparer.emit(
            &node,
            Difference::value_mismatch(pair.name, comparer.render(&left), comparer.render(&right)),
        ),
        (Some(t1), Some(t2)) if t1 != t2 && !(t1.is_record() && t2.is_record()) => comparer.emit(
            &node,
            Difference::new(
                pair.name,
                comparer.render(&left),
                comparer.render(&right),
                DifferenceKind::TypeMismatch,
            )
            .with_note(format!("{} != {}", t1.name(), t2.name())),
        ),
        (Some(t1), Some(_)) => {
            let resolved = match comparer.overrides().resolve_member(&member) {
                Ok(resolved) => resolved,
                Err(e) => return failed(e),
            };
            if let Some(value_comparer) = resolved {
                return comparer.compare_directly(value_comparer.as_ref(), &left, &right, &pair.name, &node);
            }
            let ty = if member.declared_type().is_any() {
                t1
            } else {
                member.declared_type().clone()
            };
            if ty.is_primitive() {
                let value_comparer = match comparer.value_comparer_for(&ty) {
                    Ok(c) => c,
                    Err(e) => return failed(e),
                };
                return comparer.compare_directly(value_comparer.as_ref(), &left, &right, &pair.name, &node);
            }
            let nested = comparer.nested_differences(&ty, &left, &right, Some(&member), &node);
            comparer.prefixed(nested, &pair.name, node)
        }
    }
}

/// Default of the present value's runtime type
fn default_for(present: &Value) -> Value {
    present
        .runtime_type()
        .map_or(Value::Null, |t| t.default_value())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_for_scalars() {
        assert_eq!(default_for(&Value::Int(5)), Value::Int(0));
        assert_eq!(default_for(&Value::Str("x".into())), Value::Str(String::new()));
        assert_eq!(default_for(&Value::Null), Value::Null);
    }

    #[test]
    fn test_declared_names_follow_runtime_type() {
        let record = Value::anonymous([("a", Value::Int(1)), ("b", Value::Int(2))]);
        assert_eq!(declared_names(&record), vec!["a".to_string(), "b".to_string()]);
        assert!(declared_member(&record, "b").is_some());
        assert!(declared_member(&record, "c").is_none());
    }
}
