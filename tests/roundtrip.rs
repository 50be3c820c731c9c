use pretty_assertions::assert_eq;
use qail_array::prelude::*;

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn decode(literal: &str) -> ArrayResult<Vec<String>> {
    StringArray::from_value(PgValue::Text(literal)).map(|a| a.0)
}

fn encode(v: &[&str]) -> String {
    StringArray(strings(v)).to_literal()
}

#[test]
fn roundtrip_tricky_strings() {
    let corpus: &[&[&str]] = &[
        &[],
        &[""],
        &["", ""],
        &["NULL"],
        &["null", "Null"],
        &["a,b", "{c}", "}{", "{{"],
        &["say \"hi\"", "c:\\tmp\\", "\\\""],
        &["  padded  ", "\ttab", "line\nbreak"],
        &["ünïcödé", "日本語", "emoji 🪝"],
        &["\\x48656c6c6f", "\\141"],
    ];

    for case in corpus {
        let literal = encode(case);
        assert_eq!(decode(&literal).unwrap(), strings(case), "literal: {}", literal);
    }
}

#[test]
fn empty_array() {
    assert_eq!(encode(&[]), "{}");
    assert_eq!(decode("{}").unwrap(), Vec::<String>::new());
}

#[test]
fn null_elements_are_rejected() {
    let err = decode("{NULL}").unwrap_err();
    assert!(matches!(err, ArrayError::NullElement { index: 0, .. }));

    let err = decode("{a,NULL,b}").unwrap_err();
    assert!(matches!(err, ArrayError::NullElement { index: 1, .. }));
}

#[test]
fn quoted_null_is_a_string() {
    assert_eq!(decode(r#"{"NULL"}"#).unwrap(), strings(&["NULL"]));
}

#[test]
fn escaping() {
    let literal = encode(&["a\"b", "c\\d"]);
    assert_eq!(literal, r#"{"a\"b","c\\d"}"#);
    assert_eq!(decode(&literal).unwrap(), strings(&["a\"b", "c\\d"]));
}

#[test]
fn unquoted_elements_are_not_unescaped() {
    assert_eq!(decode(r"{a\b}").unwrap(), strings(&["a\\b"]));
}

#[test]
fn two_dimensions_rejected() {
    let err = decode("{{1,2},{3,4}}").unwrap_err();
    match &err {
        ArrayError::Dimensions { dims, .. } => assert_eq!(dims, &vec![2, 2]),
        other => panic!("Expected dimensions error, got {:?}", other),
    }
}

#[test]
fn malformed_input() {
    let err = decode("{1,2").unwrap_err();
    assert_eq!(
        err.to_string(),
        "unable to parse array; expected '}' at offset 4"
    );

    let err = decode("1,2}").unwrap_err();
    assert_eq!(
        err.to_string(),
        "unable to parse array; expected '{' at offset 0"
    );
}

#[test]
fn inconsistent_dimensions() {
    let err = decode("{{1,2,3},{4,5}}").unwrap_err();
    assert!(matches!(err, ArrayError::MismatchedDimensions));
}

#[test]
fn bytea_forms() {
    assert_eq!(decode_bytea(b"\\x48656c6c6f").unwrap(), b"Hello".to_vec());
    assert_eq!(decode_bytea(b"\\141").unwrap(), vec![0x61]);
    assert_eq!(decode_bytea(b"\\\\").unwrap(), vec![0x5c]);
}

#[test]
fn wrong_source_fails_before_parsing() {
    let err = StringArray::from_value(PgValue::Float(1.5)).unwrap_err();
    assert!(matches!(
        err,
        ArrayError::UnsupportedSource {
            found: "float8",
            target: "StringArray"
        }
    ));
}

#[test]
fn custom_delimiter_linear_scan() {
    let elems = scan_linear_array(b"{(0,0),(1,1);(2,2),(3,3)}", b";", "box[]").unwrap();
    assert_eq!(elems.len(), 2);
    assert_eq!(elems[1].as_bytes(), Some(&b"(2,2),(3,3)"[..]));
}

#[test]
fn to_pg_matches_literal() {
    let arr = StringArray(strings(&["x", "y"]));
    let (bytes, oid_val, format) = arr.to_pg();
    assert_eq!(bytes, arr.to_literal().into_bytes());
    assert_eq!(oid_val, oid::TEXT_ARRAY);
    assert_eq!(format, 0);
}
