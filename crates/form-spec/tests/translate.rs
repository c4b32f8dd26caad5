use serde_json::{Value, json};

use form_spec::{
    Field, FieldKind, FormNode, InputType, Logic, SurveyElement, TranslateOptions, translate,
    translate_grouped, translate_nodes,
};

fn fixture(name: &str) -> &'static str {
    match name {
        "household_form" => include_str!("../tests/fixtures/household_form.json"),
        "household_survey" => include_str!("../tests/fixtures/household_survey.json"),
        _ => panic!("unknown fixture {}", name),
    }
}

fn household() -> Vec<Field> {
    serde_json::from_str(fixture("household_form")).expect("deserialize form")
}

#[test]
fn grouped_translation_matches_fixture() {
    let doc = translate_grouped(&household(), &TranslateOptions::default());
    let actual = serde_json::to_value(&doc).expect("serialize");
    let expected: Value = serde_json::from_str(fixture("household_survey")).expect("fixture");
    assert_eq!(actual, expected);
}

#[test]
fn flat_translation_keeps_one_element_per_field() {
    let fields = household();
    let doc = translate(&fields, &TranslateOptions::default());
    assert_eq!(doc.elements().len(), fields.len());
    let names = doc
        .elements()
        .iter()
        .map(|element| match element {
            SurveyElement::Question(question) => question.name.as_str(),
            SurveyElement::DynamicPanel(panel) => panel.name.as_str(),
            SurveyElement::Panel(panel) => panel.name.as_str(),
        })
        .collect::<Vec<_>>();
    let ids = fields
        .iter()
        .map(|field| field.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, ids);
}

#[test]
fn empty_form_has_one_empty_page() {
    let doc = translate(&[], &TranslateOptions::default());
    let value = serde_json::to_value(&doc).expect("serialize");
    assert_eq!(
        value,
        json!({
            "pages": [{ "name": "page1", "elements": [] }],
            "showQuestionNumbers": "on",
            "completedHtml": "<h3>Thank you for completing the survey!</h3>"
        })
    );
}

#[test]
fn options_flow_into_document() {
    let options = TranslateOptions {
        page_name: "intro".into(),
        show_question_numbers: "off".into(),
        completed_html: "<p>Done</p>".into(),
    };
    let doc = translate(&[], &options);
    assert_eq!(doc.pages[0].name, "intro");
    assert_eq!(doc.show_question_numbers, "off");
    assert_eq!(doc.completed_html, "<p>Done</p>");
}

#[test]
fn repeat_field_becomes_dynamic_panel() {
    let count = Field::new(
        "q1",
        "How many cars?",
        FieldKind::Text {
            input_type: Some(InputType::Number),
        },
    );
    let plate = Field::new("q2", "Plate number", FieldKind::Text { input_type: None })
        .with_logic(Logic::repeat("q1").required(true));
    let doc = translate(&[count, plate], &TranslateOptions::default());
    let value = serde_json::to_value(&doc.elements()[1]).expect("serialize");
    assert_eq!(
        value,
        json!({
            "type": "paneldynamic",
            "name": "q2",
            "title": "Plate number",
            "isRequired": true,
            "visibleIf": "{q1} > 0",
            "bindings": { "panelCount": "q1" },
            "allowAddPanel": false,
            "allowRemovePanel": false,
            "templateElements": [{
                "name": "q2_child",
                "title": "Response",
                "type": "text",
                "isRequired": true
            }]
        })
    );
}

#[test]
fn explicit_panel_nodes_are_translated_one_level() {
    let a = Field::new("a", "A", FieldKind::Rating);
    let b = Field::new("b", "B", FieldKind::File);
    let nodes = vec![
        FormNode::Panel {
            name: "details".into(),
            title: "Details".into(),
            fields: vec![&a],
        },
        FormNode::Field(&b),
    ];
    let doc = translate_nodes(&nodes, &TranslateOptions::default());
    let value = serde_json::to_value(doc.elements()).expect("serialize");
    assert_eq!(
        value,
        json!([
            {
                "type": "panel",
                "name": "details",
                "title": "Details",
                "elements": [{ "name": "a", "title": "A", "type": "rating" }]
            },
            { "name": "b", "title": "B", "type": "file" }
        ])
    );
}

#[test]
fn translation_does_not_touch_fields() {
    let fields = household();
    let before = fields.clone();
    let _ = translate_grouped(&fields, &TranslateOptions::default());
    assert_eq!(fields, before);
}
