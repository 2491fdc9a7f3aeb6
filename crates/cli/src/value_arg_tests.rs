// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    string   = { "hello", Kind::String, Value::String("hello".into()) },
    uint16   = { "42",    Kind::U16,    Value::U16(42) },
    int      = { "-3",    Kind::I32,    Value::I32(-3) },
    uint64   = { "18446744073709551615", Kind::U64, Value::U64(u64::MAX) },
    double   = { "2.5",   Kind::Double, Value::Double(2.5) },
    bool_yes = { "yes",   Kind::Bool,   Value::Bool(true) },
    bool_0   = { "0",     Kind::Bool,   Value::Bool(false) },
    strv     = { "a, b,,c", Kind::Strv, Value::Strv(vec!["a".into(), "b".into(), "c".into()]) },
)]
fn parses_scalars(raw: &str, kind: Kind, expected: Value) {
    assert_eq!(parse_value(raw, kind).unwrap(), expected);
}

#[yare::parameterized(
    not_a_number = { "abc", Kind::U32 },
    overflow     = { "300", Kind::U8 },
    negative     = { "-1",  Kind::U64 },
    bad_bool     = { "maybe", Kind::Bool },
    array        = { "1",   Kind::Array },
)]
fn rejects_bad_input(raw: &str, kind: Kind) {
    assert!(parse_value(raw, kind).is_err());
}

#[test]
fn elements_default_to_strings() {
    let values = vec!["x".to_string(), "1".to_string()];
    assert_eq!(
        parse_elements(&values, &[]).unwrap(),
        vec![Value::String("x".into()), Value::String("1".into())]
    );
}

#[test]
fn single_type_applies_to_every_element() {
    let values = vec!["1".to_string(), "2".to_string()];
    assert_eq!(parse_elements(&values, &[Kind::U8]).unwrap(), vec![Value::U8(1), Value::U8(2)]);
}

#[test]
fn paired_types_match_by_position() {
    let values = vec!["7".to_string(), "name".to_string(), "true".to_string()];
    let kinds = [Kind::U16, Kind::String, Kind::Bool];
    assert_eq!(
        parse_elements(&values, &kinds).unwrap(),
        vec![Value::U16(7), Value::String("name".into()), Value::Bool(true)]
    );
}

#[test]
fn mismatched_counts_are_rejected() {
    let values = vec!["1".to_string(), "2".to_string(), "3".to_string()];
    let err = parse_elements(&values, &[Kind::U8, Kind::U8]).unwrap_err();
    assert!(err.to_string().contains("2 --type given for 3 --value"), "{err}");
}

#[test]
fn bad_element_names_its_index() {
    let values = vec!["1".to_string(), "x".to_string()];
    let err = parse_elements(&values, &[Kind::U8]).unwrap_err();
    assert_eq!(err.to_string(), "element 1");
}

#[test]
fn empty_array_is_rejected() {
    assert!(parse_elements(&[], &[Kind::U8]).is_err());
}
