#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::*;
use structdiff_core::reflect::TypeDesc;
use structdiff_core::{
    CompareError, Comparer, ComparisonSettings, DifferenceKind, KeyOptions, NodeContext, Reflect,
    Value,
};

fn keyed(key: KeyOptions) -> Comparer {
    Comparer::with_settings(ComparisonSettings::new().configure_list_comparison(
        move |_ctx, options| {
            options.compare_elements_by_key(key.clone());
        },
    ))
}

fn keyed_unequal() -> Comparer {
    Comparer::with_settings(ComparisonSettings::new().configure_list_comparison(
        |_ctx, options| {
            options
                .compare_elements_by_key(KeyOptions::new())
                .with_unequal_lists(true);
        },
    ))
}

fn member_is(ctx: &NodeContext, name: &str) -> bool {
    ctx.member().map(|m| m.name.as_str()) == Some(name)
}

#[test]
fn test_key_mode_pairs_reordered_elements() {
    let a = order(1, vec![line(1, "A", 1), line(2, "B", 2)]);
    let b = order(1, vec![line(2, "B", 2), line(1, "A", 5)]);

    let by_index = Comparer::new().compare_with_differences(&a, &b).unwrap().1;
    assert!(by_index.len() > 1);

    let differences = keyed(KeyOptions::new())
        .compare_with_differences(&a, &b)
        .unwrap()
        .1;
    assert_eq!(summary(&differences), vec![("lines[1].qty".to_string(), DifferenceKind::ValueMismatch)]);
}

#[test]
fn test_key_mode_reports_unmatched_keys() {
    let a = order(1, vec![line(1, "A", 1), line(2, "B", 2)]);
    let b = order(1, vec![line(1, "A", 1), line(3, "C", 3)]);
    let differences = keyed(KeyOptions::new())
        .compare_with_differences(&a, &b)
        .unwrap()
        .1;
    assert_eq!(
        summary(&differences),
        vec![
            ("lines[2]".to_string(), DifferenceKind::MissingInSecond),
            ("lines[3]".to_string(), DifferenceKind::MissingInFirst),
        ]
    );
    assert_eq!(differences[0].value1, "Line");
    assert!(differences[0].value2.is_empty());
}

#[test]
fn test_key_mode_with_unequal_lists() {
    let a = order(1, vec![line(1, "A", 1)]);
    let b = order(1, vec![line(1, "A", 1), line(2, "B", 2)]);
    let differences = keyed_unequal().compare_with_differences(&a, &b).unwrap().1;
    assert_eq!(
        summary(&differences),
        vec![
            ("lines.Count".to_string(), DifferenceKind::CountMismatch),
            ("lines[2]".to_string(), DifferenceKind::MissingInFirst),
        ]
    );
}

#[test]
fn test_index_mode_with_unequal_lists_reports_tail() {
    let comparer = Comparer::with_settings(ComparisonSettings::new().configure_list_comparison(
        |_ctx, options| {
            options.with_unequal_lists(true);
        },
    ));
    let a = order(1, vec![line(1, "A", 1), line(2, "B", 2)]);
    let b = order(1, vec![line(1, "A", 4)]);
    let differences = comparer.compare_with_differences(&a, &b).unwrap().1;
    assert_eq!(
        summary(&differences),
        vec![
            ("lines.Count".to_string(), DifferenceKind::CountMismatch),
            ("lines[0].qty".to_string(), DifferenceKind::ValueMismatch),
            ("lines[1]".to_string(), DifferenceKind::MissingInSecond),
        ]
    );
}

#[test]
fn test_custom_key_member() {
    let a = order(1, vec![line(1, "A", 1), line(2, "B", 2)]);
    let b = order(1, vec![line(5, "B", 2), line(6, "A", 1)]);
    let differences = keyed(KeyOptions::new().use_key("sku"))
        .compare_with_differences(&a, &b)
        .unwrap()
        .1;
    assert_eq!(
        summary(&differences),
        vec![
            ("lines[A].id".to_string(), DifferenceKind::ValueMismatch),
            ("lines[B].id".to_string(), DifferenceKind::ValueMismatch),
        ]
    );
}

#[test]
fn test_missing_key_is_an_error() {
    let a = order(1, vec![line(1, "A", 1)]);
    let b = order(1, vec![line(1, "A", 1)]);
    let err = keyed(KeyOptions::new().use_key("barcode"))
        .compare_with_differences(&a, &b)
        .unwrap_err();
    assert_eq!(
        err,
        CompareError::KeyNotFound {
            index: 0,
            element: "Line".to_string(),
        }
    );
}

#[test]
fn test_missing_key_skipped_when_not_throwing() {
    let a = order(1, vec![line(1, "A", 1)]);
    let b = order(1, vec![line(2, "B", 2)]);
    let comparer = keyed(KeyOptions::new().use_key("barcode").throw_key_not_found(false));
    assert!(comparer.compare(&a, &b).unwrap());
}

#[test]
fn test_key_formatter_shapes_segment() {
    let a = order(1, vec![line(1, "A", 1)]);
    let b = order(1, vec![line(1, "A", 2)]);
    let comparer = keyed(KeyOptions::new().format_key(|args| format!("Id={}", args.key)));
    let differences = comparer.compare_with_differences(&a, &b).unwrap().1;
    assert_eq!(summary(&differences), vec![("lines[Id=1].qty".to_string(), DifferenceKind::ValueMismatch)]);
}

#[test]
fn test_null_elements_identified_by_position() {
    let ty = TypeDesc::list(Line::type_desc());
    let a = Value::seq(ty.clone(), vec![line(1, "A", 1).to_value(), Value::Null]);
    let b = Value::seq(ty.clone(), vec![Value::Null, line(1, "A", 1).to_value()]);
    let differences = keyed(KeyOptions::new())
        .compare_values_with_differences(&ty, &a, &b)
        .unwrap()
        .1;
    assert_eq!(
        summary(&differences),
        vec![
            ("[NullAtIdx=1]".to_string(), DifferenceKind::MissingInSecond),
            ("[NullAtIdx=0]".to_string(), DifferenceKind::MissingInFirst),
        ]
    );
    assert_eq!(differences[0].value1, "null");
}

#[test]
fn test_null_identifier_is_truncated() {
    let ty = TypeDesc::list(Line::type_desc());
    let a = Value::seq(ty.clone(), vec![Value::Null]);
    let b = Value::seq(ty.clone(), vec![line(1, "A", 1).to_value()]);
    let comparer = keyed(KeyOptions::new().format_null_element(|i| format!("{}{}", "n".repeat(40), i)));
    let differences = comparer.compare_values_with_differences(&ty, &a, &b).unwrap().1;
    assert_eq!(differences[0].path, format!("[{}]", "n".repeat(32)));
    assert_eq!(differences[1].path, "[1]");
}

#[test]
fn test_scalar_lists_keyed_by_value() {
    let comparer = keyed(KeyOptions::new());
    let a = Inventory {
        codes: [0, 0, 0],
        counts: vec![1, 2, 3],
    };
    let mut b = a.clone();
    b.counts = vec![3, 2, 1];
    assert!(comparer.compare(&a, &b).unwrap());

    b.counts = vec![3, 2, 4];
    let differences = comparer.compare_with_differences(&a, &b).unwrap().1;
    assert_eq!(
        summary(&differences),
        vec![
            ("counts[1]".to_string(), DifferenceKind::MissingInSecond),
            ("counts[4]".to_string(), DifferenceKind::MissingInFirst),
        ]
    );
}

#[test]
fn test_duplicate_keys_pair_with_first_match() {
    let a = order(1, vec![line(1, "A", 1), line(1, "A", 2)]);
    let b = order(1, vec![line(1, "A", 1), line(1, "A", 2)]);
    let differences = keyed(KeyOptions::new())
        .compare_with_differences(&a, &b)
        .unwrap()
        .1;
    assert_eq!(summary(&differences), vec![("lines[1].qty".to_string(), DifferenceKind::ValueMismatch)]);
}

#[test]
fn test_hook_selects_list_by_context() {
    let comparer = Comparer::with_settings(ComparisonSettings::new().configure_list_comparison(
        |ctx, options| {
            if member_is(ctx, "counts") {
                options.compare_elements_by_key(KeyOptions::new());
            }
        },
    ));
    let a = Inventory {
        codes: [1, 2, 3],
        counts: vec![1, 2],
    };
    let b = Inventory {
        codes: [3, 2, 1],
        counts: vec![2, 1],
    };
    let differences = comparer.compare_with_differences(&a, &b).unwrap().1;
    assert_eq!(
        summary(&differences),
        vec![
            ("codes[0]".to_string(), DifferenceKind::ValueMismatch),
            ("codes[2]".to_string(), DifferenceKind::ValueMismatch),
        ]
    );
}

#[test]
fn test_untyped_lists_from_json() {
    let a = Value::from_json(&serde_json::json!([{"id": 1, "v": "a"}, {"id": 2, "v": "b"}]));
    let b = Value::from_json(&serde_json::json!([{"id": 2, "v": "b"}, {"id": 1, "v": "z"}]));
    let differences = keyed(KeyOptions::new())
        .compare_values_with_differences(&TypeDesc::any(), &a, &b)
        .unwrap()
        .1;
    assert_eq!(summary(&differences), vec![("[1].v".to_string(), DifferenceKind::ValueMismatch)]);
}
