use form_spec::{
    Choice, Field, FieldKind, InputType, LogicDraft, LogicError, LogicMode, Operator, Rule,
    RuleKind, RuleValue, compile_logic,
};

fn fields() -> Vec<Field> {
    vec![
        Field::new(
            "q1",
            "How many?",
            FieldKind::Text {
                input_type: Some(InputType::Number),
            },
        ),
        Field::new(
            "q2",
            "Colour",
            FieldKind::RadioGroup {
                choices: vec![Choice::new("item1", "Red"), Choice::new("item2", "Blue")],
            },
        ),
        Field::new(
            "q3",
            "Toppings",
            FieldKind::Checkbox {
                choices: vec![Choice::new("item1", "Cheese")],
            },
        ),
        Field::new("q4", "Notes", FieldKind::Comment),
    ]
}

#[test]
fn routes_rules_by_kind() {
    let fields = fields();
    let draft = LogicDraft::conditional(vec![
        Rule::new(RuleKind::Visible, "q2", Operator::Equals, "item1"),
        Rule::new(RuleKind::Enable, "q1", Operator::NotEmpty, ""),
        Rule::new("require", "q3", Operator::Equals, "item1"),
    ])
    .with_required(true);

    let logic = compile_logic("q4", &fields, &draft).expect("compiles");
    assert!(logic.is_required);
    assert_eq!(logic.visible_if(), Some("{q2} = 'item1'"));
    assert_eq!(logic.enable_if(), Some("{q1} notempty"));
    let triggers = logic.triggers();
    assert_eq!(triggers.len(), 1);
    assert_eq!(triggers[0].kind, "require");
    assert_eq!(triggers[0].expression, "{q3} contains 'item1'");
}

#[test]
fn last_visible_rule_wins() {
    let fields = fields();
    let draft = LogicDraft::conditional(vec![
        Rule::new(RuleKind::Visible, "q2", Operator::Equals, "item1"),
        Rule::new(RuleKind::Visible, "q2", Operator::NotEquals, "item2"),
    ]);
    let logic = compile_logic("q4", &fields, &draft).expect("compiles");
    assert_eq!(logic.visible_if(), Some("{q2} <> 'item2'"));
}

#[test]
fn incomplete_rules_are_skipped() {
    let fields = fields();
    let draft = LogicDraft::conditional(vec![
        Rule::new(RuleKind::Visible, "", Operator::Equals, "x"),
        Rule::new(RuleKind::Enable, "q2", Operator::Equals, " "),
    ]);
    let logic = compile_logic("q4", &fields, &draft).expect("compiles");
    assert!(logic.conditions().is_some_and(|c| c.is_empty()));
    assert!(!logic.is_required);
}

#[test]
fn repeat_mode_discards_rules() {
    let fields = fields();
    let mut draft = LogicDraft::repeat("q1");
    draft.rules = vec![Rule::new(RuleKind::Visible, "q2", Operator::Equals, "item1")];
    let logic = compile_logic("q4", &fields, &draft).expect("compiles");
    assert_eq!(logic.repeat_source(), Some("q1"));
    assert_eq!(logic.visible_if(), None);
    assert!(logic.triggers().is_empty());
}

#[test]
fn repeat_without_source_clears_logic() {
    let fields = fields();
    let draft = LogicDraft {
        mode: LogicMode::Repeat,
        ..LogicDraft::default()
    };
    let logic = compile_logic("q4", &fields, &draft).expect("compiles");
    assert_eq!(logic.repeat_source(), None);
    assert!(logic.conditions().is_some_and(|c| c.is_empty()));
}

#[test]
fn compile_replaces_previous_logic() {
    let mut fields = fields();
    fields[3].logic = compile_logic("q4", &fields, &LogicDraft::repeat("q1")).expect("repeat");
    let cleared = compile_logic("q4", &fields, &LogicDraft::default()).expect("cleared");
    assert_eq!(cleared.repeat_source(), None);
    assert!(!cleared.is_required);
}

#[test]
fn references_must_point_backwards() {
    let fields = fields();
    let forward = LogicDraft::conditional(vec![Rule::new(
        RuleKind::Visible,
        "q4",
        Operator::NotEmpty,
        "",
    )]);
    assert_eq!(
        compile_logic("q2", &fields, &forward),
        Err(LogicError::ForwardReference {
            field: "q2".into(),
            source_id: "q4".into()
        })
    );

    let self_ref = LogicDraft::conditional(vec![Rule::new(
        RuleKind::Visible,
        "q2",
        Operator::NotEmpty,
        "",
    )]);
    assert!(matches!(
        compile_logic("q2", &fields, &self_ref),
        Err(LogicError::ForwardReference { .. })
    ));

    let unknown = LogicDraft::conditional(vec![Rule::new(
        RuleKind::Visible,
        "q99",
        Operator::NotEmpty,
        "",
    )]);
    assert!(matches!(
        compile_logic("q4", &fields, &unknown),
        Err(LogicError::UnknownSource { .. })
    ));

    assert_eq!(
        compile_logic("q99", &fields, &LogicDraft::default()),
        Err(LogicError::UnknownTarget("q99".into()))
    );
}

#[test]
fn repeat_source_must_be_numeric() {
    let fields = fields();
    assert_eq!(
        compile_logic("q4", &fields, &LogicDraft::repeat("q2")),
        Err(LogicError::RepeatSourceNotNumeric {
            source_id: "q2".into()
        })
    );
}

#[test]
fn draft_is_repopulated_from_stored_logic() {
    let mut fields = fields();
    let draft = LogicDraft::conditional(vec![
        Rule::new(RuleKind::Visible, "q2", Operator::Equals, "item1"),
        Rule::new("require", "q1", Operator::NotEmpty, ""),
    ])
    .with_required(true);
    fields[3].logic = compile_logic("q4", &fields, &draft).expect("compiles");

    let restored = LogicDraft::from_field(&fields[3], &fields);
    assert_eq!(restored.mode, LogicMode::Conditional);
    assert!(restored.always_required);
    assert_eq!(restored.rules.len(), 2);
    assert_eq!(restored.rules[0].kind, RuleKind::Visible);
    assert_eq!(restored.rules[0].value, RuleValue::Text("item1".into()));
    assert_eq!(restored.rules[1].kind, RuleKind::Trigger("require".into()));

    fields[3].logic = compile_logic("q4", &fields, &LogicDraft::repeat("q1")).expect("repeat");
    let restored = LogicDraft::from_field(&fields[3], &fields);
    assert_eq!(restored.mode, LogicMode::Repeat);
    assert_eq!(restored.repeat_source.as_deref(), Some("q1"));
}

#[test]
fn emptiness_rule_on_multi_select_source_is_kept() {
    let fields = fields();
    let draft = LogicDraft::conditional(vec![
        Rule::new(RuleKind::Visible, "q3", Operator::NotEmpty, ""),
        Rule::new(RuleKind::Enable, "q3", Operator::Empty, ""),
    ]);
    let logic = compile_logic("q4", &fields, &draft).expect("compiles");
    assert_eq!(logic.visible_if(), Some("{q3} notempty"));
    assert_eq!(logic.enable_if(), Some("{q3} empty"));
}

#[test]
fn rules_without_a_kind_are_skipped() {
    let fields = fields();
    let draft = LogicDraft::conditional(vec![
        Rule::new("", "q1", Operator::NotEmpty, ""),
        Rule::new("   ", "q2", Operator::Equals, "item1"),
        Rule::new("require", "q1", Operator::NotEmpty, ""),
    ]);
    let logic = compile_logic("q4", &fields, &draft).expect("compiles");
    let triggers = logic.triggers();
    assert_eq!(triggers.len(), 1);
    assert_eq!(triggers[0].kind, "require");
}
