#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use common::*;
use structdiff_core::reflect::TypeDesc;
use structdiff_core::{
    AlwaysEqualComparer, CompareError, Comparer, DefaultValueComparer, DifferenceKind,
    FnValueComparer, IgnoreCaseComparer, NullAsDefaultComparer, Reflect, Value,
};

fn order_with_email(email: &str) -> Order {
    let mut o = order(1, vec![]);
    o.customer = Some(customer("Ada", email));
    o
}

#[test]
fn test_member_override_replaces_default_comparison() {
    let mut comparer = Comparer::new();
    comparer
        .add_member_override_for::<Customer>("email", IgnoreCaseComparer)
        .unwrap();
    assert!(comparer
        .compare(&order_with_email("ADA@example.com"), &order_with_email("ada@example.com"))
        .unwrap());
    assert!(!comparer
        .compare(&order_with_email("bob@example.com"), &order_with_email("ada@example.com"))
        .unwrap());
}

#[test]
fn test_member_override_for_unknown_member() {
    let mut comparer = Comparer::new();
    let err = comparer
        .add_member_override_for::<Customer>("phone", IgnoreCaseComparer)
        .unwrap_err();
    assert_eq!(
        err,
        CompareError::UnknownMember {
            type_name: "Customer".to_string(),
            member: "phone".to_string(),
        }
    );
}

#[test]
fn test_duplicate_member_override_rejected() {
    let mut comparer = Comparer::new();
    comparer
        .add_member_override_for::<Customer>("email", IgnoreCaseComparer)
        .unwrap();
    let err = comparer
        .add_member_override_for::<Customer>("email", AlwaysEqualComparer)
        .unwrap_err();
    assert_eq!(
        err,
        CompareError::DuplicateOverride {
            member: "Customer.email".to_string()
        }
    );
}

#[test]
fn test_member_stage_beats_name_stage() {
    let mut comparer = Comparer::new();
    comparer.add_name_override("email", AlwaysEqualComparer, None);
    comparer
        .add_member_override_for::<Customer>("email", DefaultValueComparer)
        .unwrap();
    let differences = comparer
        .compare_with_differences(&order_with_email("a@x"), &order_with_email("b@x"))
        .unwrap()
        .1;
    assert_eq!(summary(&differences), vec![("customer.email".to_string(), DifferenceKind::ValueMismatch)]);
}

#[test]
fn test_name_stage_beats_type_stage() {
    let mut comparer = Comparer::new();
    comparer.add_type_override_for::<String>(AlwaysEqualComparer, None);
    comparer.add_name_override("email", DefaultValueComparer, None);

    let mut a = order_with_email("a@x");
    let mut b = order_with_email("b@x");
    a.customer.as_mut().unwrap().name = "Ada".to_string();
    b.customer.as_mut().unwrap().name = "Bob".to_string();

    let differences = comparer.compare_with_differences(&a, &b).unwrap().1;
    assert_eq!(summary(&differences), vec![("customer.email".to_string(), DifferenceKind::ValueMismatch)]);
}

#[test]
fn test_type_stage_beats_predicate_stage() {
    let mut comparer = Comparer::new();
    comparer.add_predicate_override(|m| m.name().ends_with("_property"), AlwaysEqualComparer);
    comparer.add_type_override_for::<i32>(DefaultValueComparer, None);

    let a = Primitives {
        int_property: 1,
        string_property: "a".to_string(),
        ..Primitives::default()
    };
    let b = Primitives {
        int_property: 2,
        string_property: "b".to_string(),
        ..Primitives::default()
    };
    let differences = comparer.compare_with_differences(&a, &b).unwrap().1;
    assert_eq!(summary(&differences), vec![("int_property".to_string(), DifferenceKind::ValueMismatch)]);
}

#[test]
fn test_ambiguous_name_overrides_fail_the_comparison() {
    let mut comparer = Comparer::new();
    comparer.add_name_override("email", IgnoreCaseComparer, None);
    comparer.add_name_override("email", AlwaysEqualComparer, None);

    let err = comparer
        .compare(&order_with_email("a@x"), &order_with_email("a@x"))
        .unwrap_err();
    match err {
        CompareError::AmbiguousOverride {
            stage,
            target,
            candidates,
        } => {
            assert_eq!(stage, "name");
            assert_eq!(target, "Customer.email");
            assert_eq!(candidates, vec!["name[email]#0".to_string(), "name[email]#1".to_string()]);
        }
        other => panic!("expected AmbiguousOverride, got {:?}", other),
    }
}

#[test]
fn test_filters_disambiguate_type_overrides() {
    let mut comparer = Comparer::new();
    comparer.add_type_override_for::<String>(
        IgnoreCaseComparer,
        Some(Arc::new(|m| m.declaring_type() == "Customer")),
    );
    comparer.add_type_override_for::<String>(
        AlwaysEqualComparer,
        Some(Arc::new(|m| m.declaring_type() == "Line")),
    );

    let mut a = order_with_email("A@X");
    a.lines = vec![line(1, "sku-1", 1)];
    let mut b = order_with_email("a@x");
    b.lines = vec![line(1, "SKU-2", 1)];
    assert!(comparer.compare(&a, &b).unwrap());

    b.customer.as_mut().unwrap().name = "Bob".to_string();
    let differences = comparer.compare_with_differences(&a, &b).unwrap().1;
    assert_eq!(summary(&differences), vec![("customer.name".to_string(), DifferenceKind::ValueMismatch)]);
}

#[test]
fn test_filtered_type_override_ignored_for_top_level_values() {
    let mut comparer = Comparer::new();
    comparer.add_type_override_for::<String>(IgnoreCaseComparer, Some(Arc::new(|_| true)));
    let ty = String::type_desc();
    assert!(!comparer.compare_values(&ty, &s("A"), &s("a")).unwrap());

    comparer.add_type_override_for::<String>(IgnoreCaseComparer, None);
    assert!(comparer.compare_values(&ty, &s("A"), &s("a")).unwrap());
}

#[test]
fn test_custom_comparer_renders_values() {
    let mut comparer = Comparer::new();
    let tolerant = FnValueComparer::new(|a, b| match (a, b) {
        (Value::Float(x), Value::Float(y)) => (x - y).abs() < 0.01,
        _ => a == b,
    })
    .with_render(|v| format!("~{}", v));
    comparer.add_name_override("total", tolerant, None);

    let mut a = order(1, vec![]);
    let mut b = order(1, vec![]);
    a.total = 10.001;
    b.total = 10.0;
    assert!(comparer.compare(&a, &b).unwrap());

    b.total = 11.0;
    let differences = comparer.compare_with_differences(&a, &b).unwrap().1;
    assert_eq!(differences[0].path, "total");
    assert_eq!(differences[0].value2, "~11");
}

#[test]
fn test_null_as_default_comparer() {
    let mut comparer = Comparer::new();
    comparer
        .add_member_override_for::<Primitives>(
            "nickname",
            NullAsDefaultComparer::for_type(&String::type_desc()),
        )
        .unwrap();
    let a = Primitives::default();
    let b = Primitives {
        nickname: Some(String::new()),
        ..Primitives::default()
    };
    assert!(comparer.compare(&a, &b).unwrap());
}

#[test]
fn test_overrides_are_snapshotted_per_comparer() {
    let mut comparer = Comparer::new();
    let before = comparer.clone();
    comparer
        .add_member_override_for::<Customer>("email", AlwaysEqualComparer)
        .unwrap();

    let a = order_with_email("a@x");
    let b = order_with_email("b@x");
    assert!(comparer.compare(&a, &b).unwrap());
    assert!(!before.compare(&a, &b).unwrap());
    assert!(before.overrides().is_empty());
}

#[test]
fn test_override_on_nested_object_member_compares_it_whole() {
    let mut comparer = Comparer::new();
    comparer
        .add_member_override_for::<Order>(
            "customer",
            FnValueComparer::new(|a, b| a.member_value("name") == b.member_value("name")),
        )
        .unwrap();
    let a = order_with_email("a@x");
    let b = order_with_email("b@x");
    assert!(comparer.compare(&a, &b).unwrap());
}

#[test]
fn test_type_override_applies_to_list_elements() {
    let mut comparer = Comparer::new();
    comparer.add_type_override(&TypeDesc::primitive("u32", Value::UInt(0)), AlwaysEqualComparer, None);
    let a = order(1, vec![line(1, "A", 1)]);
    let b = order(2, vec![line(7, "A", 3)]);
    assert!(comparer.compare(&a, &b).unwrap());
}
