#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::io::Write;

use common::*;
use structdiff_core::{CompareError, CompareProfile, DifferenceKind};

const PROFILE: &str = r##"
ignored_members = ["total"]
ignore_case_members = ["email"]

[lists]
mode = "key"
key_template = "#{key}"
compare_unequal_lists = true
applies_to = ["lines"]
"##;

#[test]
fn test_profile_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PROFILE.as_bytes()).unwrap();

    let profile = CompareProfile::from_path(file.path()).unwrap();
    assert!(profile.recursive_comparison);
    assert_eq!(profile.ignored_members, vec!["total".to_string()]);
    assert!(profile.lists.compare_unequal_lists);
}

#[test]
fn test_profile_builds_configured_comparer() {
    let comparer = CompareProfile::from_toml_str(PROFILE)
        .unwrap()
        .build_comparer()
        .unwrap();

    let mut a = order(1, vec![line(1, "A", 1), line(2, "B", 2)]);
    let mut b = order(1, vec![line(2, "B", 2), line(1, "A", 1), line(3, "C", 3)]);
    a.total = 1.0;
    b.total = 2.0;
    a.customer = Some(customer("Ada", "ADA@X"));
    b.customer = Some(customer("Ada", "ada@x"));

    let differences = comparer.compare_with_differences(&a, &b).unwrap().1;
    assert_eq!(
        summary(&differences),
        vec![
            ("lines.Count".to_string(), DifferenceKind::CountMismatch),
            ("lines[#3]".to_string(), DifferenceKind::MissingInFirst),
        ]
    );
}

#[test]
fn test_profile_defaults_treat_null_as_value() {
    let comparer = CompareProfile::from_toml_str("[defaults]\nnickname = \"\"\n")
        .unwrap()
        .build_comparer()
        .unwrap();
    let a = Primitives::default();
    let b = Primitives {
        nickname: Some(String::new()),
        ..Primitives::default()
    };
    assert!(comparer.compare(&a, &b).unwrap());
}

#[test]
fn test_template_without_placeholder_rejected() {
    let err = CompareProfile::from_toml_str("[lists]\nmode = \"key\"\nkey_template = \"id\"\n")
        .unwrap_err();
    assert!(matches!(err, CompareError::InvalidConfig { .. }));
}

#[test]
fn test_ignored_member_cannot_be_configured() {
    let err = CompareProfile::from_toml_str(
        "ignored_members = [\"email\"]\nignore_case_members = [\"email\"]\n",
    )
    .unwrap_err();
    assert!(matches!(err, CompareError::InvalidConfig { .. }));
}

#[test]
fn test_missing_profile_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = CompareProfile::from_path(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, CompareError::Io { .. }));
}

#[test]
fn test_unknown_list_mode_rejected() {
    let err = CompareProfile::from_toml_str("[lists]\nmode = \"hash\"\n").unwrap_err();
    assert!(matches!(err, CompareError::InvalidConfig { .. }));
}
