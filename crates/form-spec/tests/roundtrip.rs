use schemars::schema_for;
use serde_json::Value;

use form_spec::{Field, Form, FieldKind, InputType, QuestionTemplate, SnapshotIndex};

fn fixture(name: &str) -> &'static str {
    match name {
        "household_form" => include_str!("../tests/fixtures/household_form.json"),
        _ => panic!("unknown fixture {}", name),
    }
}

#[test]
fn snapshot_roundtrip() {
    let raw = fixture("household_form");
    let parsed: Vec<Field> = serde_json::from_str(raw).expect("deserialize");
    let serialized = serde_json::to_string_pretty(&parsed).expect("serialize");
    let re_parsed: Vec<Field> = serde_json::from_str(&serialized).expect("roundtrip");
    assert_eq!(parsed, re_parsed);
}

#[test]
fn legacy_keys_are_dropped_and_repeat_wins() {
    let parsed: Vec<Field> = serde_json::from_str(fixture("household_form")).expect("deserialize");
    let child_age = &parsed[2];
    assert_eq!(
        child_age.kind,
        FieldKind::Text {
            input_type: Some(InputType::Number)
        }
    );
    assert_eq!(child_age.logic.repeat_source(), Some("q_children"));
    assert_eq!(child_age.logic.visible_if(), None);

    let value = serde_json::to_value(child_age).expect("serialize");
    let object = value.as_object().expect("object");
    assert!(!object.contains_key("name"));
    assert!(!object.contains_key("visibleIf"));
    assert_eq!(object["repeat"]["countSource"], "q_children");
}

#[test]
fn stored_expressions_are_kept_verbatim() {
    let parsed: Vec<Field> = serde_json::from_str(fixture("household_form")).expect("deserialize");
    let notes = &parsed[6];
    assert_eq!(notes.logic.enable_if(), Some("{q_agree} = 'true'"));
    assert_eq!(
        notes.logic.triggers()[0].expression,
        r"{q_dog_name} = 'Rex \'the\' dog'"
    );
}

#[test]
fn form_serializes_as_the_field_list() {
    let raw = fixture("household_form");
    let form: Form = serde_json::from_str(raw).expect("deserialize");
    let fields: Vec<Field> = serde_json::from_str(raw).expect("deserialize");
    assert_eq!(form.fields(), fields.as_slice());
    let value: Value = serde_json::to_value(&form).expect("serialize");
    assert_eq!(value.as_array().map(Vec::len), Some(7));
}

#[test]
fn schemas_compile() {
    let field_schema = schema_for!(Field);
    let template_schema = schema_for!(QuestionTemplate);
    let index_schema = schema_for!(SnapshotIndex);
    for schema in [field_schema, template_schema, index_schema] {
        let json = serde_json::to_string(&schema).expect("schema serializes");
        assert!(json.starts_with('{'));
    }
}
