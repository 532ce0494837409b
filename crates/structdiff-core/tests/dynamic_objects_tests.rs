#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::*;
use structdiff_core::reflect::TypeDesc;
use structdiff_core::{
    AlwaysEqualComparer, CompareError, Comparer, ComparisonSettings, DifferenceKind,
    IgnoreCaseComparer, Value,
};

#[test]
fn test_dynamic_members_compared_by_name() {
    let a = bag(&[("a", Value::Int(1)), ("b", s("x"))]);
    let b = bag(&[("a", Value::Int(2)), ("c", s("y"))]);
    let differences = Comparer::new()
        .compare_values_with_differences(&bag_type(), &a, &b)
        .unwrap()
        .1;
    assert_eq!(
        summary(&differences),
        vec![
            ("a".to_string(), DifferenceKind::ValueMismatch),
            ("b".to_string(), DifferenceKind::MissingInSecond),
            ("c".to_string(), DifferenceKind::MissingInFirst),
        ]
    );
    assert_eq!(differences[1].value1, "x");
    assert_eq!(differences[2].value2, "y");
}

#[test]
fn test_absent_members_use_runtime_default() {
    let comparer = Comparer::with_settings(ComparisonSettings::new().with_use_default_if_member_absent(true));
    let empty = bag(&[]);

    assert!(comparer
        .compare_values(&bag_type(), &bag(&[("a", Value::Int(0))]), &empty)
        .unwrap());

    let differences = comparer
        .compare_values_with_differences(&bag_type(), &bag(&[("a", Value::Int(5))]), &empty)
        .unwrap()
        .1;
    assert_eq!(summary(&differences), vec![("a".to_string(), DifferenceKind::ValueMismatch)]);
    assert_eq!(differences[0].value2, "0");
}

#[test]
fn test_member_runtime_type_mismatch() {
    let a = bag(&[("a", Value::Int(1))]);
    let b = bag(&[("a", s("1"))]);
    let differences = Comparer::new()
        .compare_values_with_differences(&bag_type(), &a, &b)
        .unwrap()
        .1;
    assert_eq!(summary(&differences), vec![("a".to_string(), DifferenceKind::TypeMismatch)]);
    assert_eq!(differences[0].note.as_deref(), Some("i64 != String"));
}

#[test]
fn test_member_override_does_not_hide_type_mismatch() {
    let a = Value::expando([("a", Value::Int(1))]);
    let b = Value::expando([("a", s("1"))]);

    let mut ignore_case = Comparer::new();
    ignore_case.add_name_override("a", IgnoreCaseComparer, None);
    let mut ignored = Comparer::new();
    ignored.add_name_override("a", AlwaysEqualComparer, None);

    for comparer in [ignore_case, ignored] {
        let differences = comparer
            .compare_values_with_differences(&TypeDesc::expando(), &a, &b)
            .unwrap()
            .1;
        assert_eq!(summary(&differences), vec![("a".to_string(), DifferenceKind::TypeMismatch)]);
        assert_eq!(differences[0].note.as_deref(), Some("i64 != String"));
    }
}

#[test]
fn test_member_override_does_not_hide_one_null_side() {
    let mut comparer = Comparer::new();
    comparer.add_name_override("a", AlwaysEqualComparer, None);

    let differences = comparer
        .compare_values_with_differences(
            &bag_type(),
            &bag(&[("a", Value::Int(1))]),
            &bag(&[("a", Value::Null)]),
        )
        .unwrap()
        .1;
    assert_eq!(summary(&differences), vec![("a".to_string(), DifferenceKind::ValueMismatch)]);
    assert_eq!(differences[0].value2, "null");
}

#[test]
fn test_null_member_value() {
    let a = bag(&[("a", Value::Null)]);
    let b = bag(&[("a", Value::Int(3))]);
    let differences = Comparer::new()
        .compare_values_with_differences(&bag_type(), &a, &b)
        .unwrap()
        .1;
    assert_eq!(summary(&differences), vec![("a".to_string(), DifferenceKind::ValueMismatch)]);
    assert_eq!(differences[0].value1, "null");
}

#[test]
fn test_nested_dynamic_objects() {
    let a = bag(&[("inner", bag(&[("x", Value::Int(1))]))]);
    let b = bag(&[("inner", bag(&[("x", Value::Int(2))]))]);
    let differences = Comparer::new()
        .compare_values_with_differences(&bag_type(), &a, &b)
        .unwrap()
        .1;
    assert_eq!(summary(&differences), vec![("inner.x".to_string(), DifferenceKind::ValueMismatch)]);
}

#[test]
fn test_overrides_apply_to_runtime_members() {
    let mut comparer = Comparer::new();
    comparer.add_name_override("a", AlwaysEqualComparer, None);

    let a = bag(&[("a", Value::Int(1)), ("b", Value::Int(1))]);
    let b = bag(&[("a", Value::Int(2))]);
    let differences = comparer
        .compare_values_with_differences(&bag_type(), &a, &b)
        .unwrap()
        .1;
    assert_eq!(summary(&differences), vec![("b".to_string(), DifferenceKind::MissingInSecond)]);

    let c = bag(&[("b", Value::Int(1))]);
    let differences = comparer
        .compare_values_with_differences(&bag_type(), &a, &c)
        .unwrap()
        .1;
    assert_eq!(summary(&differences), vec![("a".to_string(), DifferenceKind::MissingInSecond)]);
}

#[test]
fn test_expando_objects() {
    let a = Value::expando([("name", s("a")), ("size", Value::Int(1))]);
    let b = Value::expando([("name", s("a")), ("size", Value::Int(2)), ("extra", Value::Bool(true))]);
    let differences = Comparer::new()
        .compare_values_with_differences(&TypeDesc::expando(), &a, &b)
        .unwrap()
        .1;
    assert_eq!(
        summary(&differences),
        vec![
            ("size".to_string(), DifferenceKind::ValueMismatch),
            ("extra".to_string(), DifferenceKind::MissingInFirst),
        ]
    );
}

#[test]
fn test_empty_expando_equals_null_when_enabled() {
    let comparer = Comparer::with_settings(
        ComparisonSettings::new().with_empty_and_null_collections_equal(true),
    );
    let empty = Value::expando(Vec::<(String, Value)>::new());
    assert!(comparer
        .compare_values(&TypeDesc::expando(), &empty, &Value::Null)
        .unwrap());
    assert!(!Comparer::new()
        .compare_values(&TypeDesc::expando(), &empty, &Value::Null)
        .unwrap());
}

#[test]
fn test_anonymous_records_compared_by_own_members() {
    let comparer = Comparer::new();
    let a = Value::anonymous([("a", Value::Int(1)), ("b", s("x"))]);
    let b = Value::anonymous([("a", Value::Int(1)), ("b", s("y"))]);
    let differences = comparer
        .compare_values_with_differences(&TypeDesc::any(), &a, &b)
        .unwrap()
        .1;
    assert_eq!(summary(&differences), vec![("b".to_string(), DifferenceKind::ValueMismatch)]);

    let narrow = Value::anonymous([("a", Value::Int(1))]);
    let differences = comparer
        .compare_values_with_differences(&TypeDesc::any(), &narrow, &b)
        .unwrap()
        .1;
    assert_eq!(summary(&differences), vec![("b".to_string(), DifferenceKind::MissingInFirst)]);
}

#[test]
fn test_dynamic_strategy_rejects_other_values() {
    let err = Comparer::new()
        .compare_values(&bag_type(), &Value::Int(1), &Value::Int(2))
        .unwrap_err();
    match err {
        CompareError::Precondition {
            strategy,
            type_name,
            ..
        } => {
            assert_eq!(strategy, "dynamic");
            assert_eq!(type_name, "Bag");
        }
        other => panic!("expected Precondition, got {:?}", other),
    }
}

#[test]
fn test_one_null_dynamic_object() {
    let a = bag(&[("a", Value::Int(1))]);
    let differences = Comparer::new()
        .compare_values_with_differences(&bag_type(), &a, &Value::Null)
        .unwrap()
        .1;
    assert_eq!(summary(&differences), vec![(String::new(), DifferenceKind::ValueMismatch)]);
    assert_eq!(differences[0].value1, "Bag");
    assert_eq!(differences[0].value2, "null");
}
