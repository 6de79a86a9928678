use ecf::{DecodeOptions, DynamicRecord, ErrorKind, SchemaDescription};
use rstest::rstest;
use serde_json::{json, Value};

const SCHEMA: &str = r#"{"fields": [
    {"name": "Name", "type": "string"},
    {"name": "Small", "type": "i8"},
    {"name": "Count", "type": "u16"},
    {"name": "Ratio", "type": "f64"},
    {"name": "Narrow", "type": "f32"},
    {"name": "Active", "type": "bool"},
    {"name": "Hobbies", "type": "list<string>"},
    {"name": "WorkPlaces", "type": "map<string,list<string>>"},
    {"name": "Languages", "type": "map<string,block>", "attributes": ["Native", "Region"]},
    {"name": "Checksum", "type": "u32", "readonly": true},
    {"name": "Scores", "type": "list<i32>"},
    {"name": "Lookup", "type": "map<u8,list<string>>"},
    {"name": "Nested", "type": "struct"}
]}"#;

fn decode(input: &str) -> ecf::Result<DynamicRecord> {
    let description = SchemaDescription::from_json(SCHEMA).expect("schema");
    let mut record = DynamicRecord::new(&description);
    ecf::decode_str_with_options(input, &mut record, &DecodeOptions::default())?;
    Ok(record)
}

fn field(input: &str, name: &str) -> Value {
    decode(input)
        .unwrap_or_else(|err| panic!("decode failed: {err}"))
        .to_json()[name]
        .clone()
}

#[rstest]
#[case("Name: Alice", "Name", json!("Alice"))]
#[case("Name:   padded value  ", "Name", json!("padded value"))]
#[case("Small: -128", "Small", json!(-128))]
#[case("Count: 65535", "Count", json!(65535))]
#[case("Ratio: -0.25", "Ratio", json!(-0.25))]
#[case("Narrow: 1.5", "Narrow", json!(1.5))]
#[case("Active: TRUE", "Active", json!(true))]
#[case("Active: no", "Active", json!(false))]
#[case("Hobbies: x\n  a\n  b", "Hobbies", json!(["a", "b"]))]
#[case("WorkPlaces: Acme\n  Office1", "WorkPlaces", json!({"Acme": ["Office1"]}))]
#[case(
    "Languages: English native=true region=uk\n  Hello",
    "Languages",
    json!({"English": {"Name": "English", "Native": "true", "Region": "uk", "Items": ["Hello"]}})
)]
fn decode_fields(#[case] input: &str, #[case] name: &str, #[case] expected: Value) {
    assert_eq!(field(input, name), expected);
}

#[rstest]
#[case("Small: 128", "IntegerOverflow")]
#[case("Small: abc", "ExpectedInteger")]
#[case("Count: 65536", "UnsignedOverflow")]
#[case("Count: -1", "ExpectedUnsigned")]
#[case("Ratio: 1e999", "FloatOverflow")]
#[case("Narrow: 1e39", "FloatOverflow")]
#[case("Ratio: one", "ExpectedFloat")]
#[case("Active: sure", "ExpectedBoolean")]
#[case("Checksum: 1", "UnsettableField")]
#[case("Scores:", "InvalidContainerShape")]
#[case("Lookup: a", "InvalidContainerShape")]
#[case("Nested: a", "UnsupportedFieldType")]
#[case("Missing: a", "UnknownField")]
#[case("Languages: English dialect=x", "MissingBlockBinding")]
#[case("Languages: English items=x", "MissingBlockBinding")]
#[case("no colon here", "Syntax")]
fn decode_errors(#[case] input: &str, #[case] variant: &str) {
    let err = decode(input).unwrap_err();
    assert!(
        format!("{:?}", err.kind).starts_with(variant),
        "expected {variant}, got {err:?}"
    );
    assert_eq!(err.line(), Some(1));
}

#[rstest]
fn untouched_fields_render_defaults() {
    let value = decode("Name: Alice").unwrap().to_json();
    assert_eq!(value["Count"], json!(0));
    assert_eq!(value["Hobbies"], json!([]));
    assert_eq!(value["Languages"], json!({}));
    assert_eq!(value["Nested"], Value::Null);
}

#[rstest]
fn block_members_keep_declaration_order() {
    let value = decode("Languages: French region=fr\n  Bonjour").unwrap().to_json();
    let block = value["Languages"]["French"].as_object().unwrap();
    let keys: Vec<&str> = block.keys().map(String::as_str).collect();
    assert_eq!(keys, ["Name", "Native", "Region", "Items"]);
}

#[rstest]
fn error_display_carries_field_and_line() {
    let err = decode("Name: Alice\nCount: lots").unwrap_err();
    assert_eq!(
        err.to_string(),
        "expected unsigned integer for \"Count\", found \"lots\" (line 2)"
    );
    assert!(matches!(err.kind, ErrorKind::ExpectedUnsigned { .. }));
}
