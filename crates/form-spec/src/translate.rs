use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::expr::Expression;
use crate::group::group_fields;
use crate::spec::{Behavior, Field, FieldKind, Trigger};

const REPEAT_CHILD_TITLE: &str = "Response";

/// Document-level presentation settings for the rendering engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TranslateOptions {
    pub page_name: String,
    pub show_question_numbers: String,
    pub completed_html: String,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            page_name: "page1".to_string(),
            show_question_numbers: "on".to_string(),
            completed_html: "<h3>Thank you for completing the survey!</h3>".to_string(),
        }
    }
}

/// Input node for translation: a bare field or a labelled panel of fields.
#[derive(Debug, Clone, PartialEq)]
pub enum FormNode<'a> {
    Field(&'a Field),
    Panel {
        name: String,
        title: String,
        fields: Vec<&'a Field>,
    },
}

/// Root document handed to the rendering engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDocument {
    pub pages: Vec<SurveyPage>,
    pub show_question_numbers: String,
    pub completed_html: String,
}

impl SurveyDocument {
    pub fn elements(&self) -> &[SurveyElement] {
        self.pages
            .first()
            .map(|page| page.elements.as_slice())
            .unwrap_or_default()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyPage {
    pub name: String,
    pub elements: Vec<SurveyElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SurveyElement {
    Question(QuestionElement),
    Panel(PanelElement),
    DynamicPanel(DynamicPanelElement),
}

/// A question element; its `type` and type attributes come from the field kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionElement {
    pub name: String,
    pub title: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "is_false")]
    pub is_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_if: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_if: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<Trigger>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "panel")]
pub struct PanelElement {
    pub name: String,
    pub title: String,
    pub elements: Vec<SurveyElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelBindings {
    pub panel_count: String,
}

/// Repeated field: one template child instantiated once per counted answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "paneldynamic", rename_all = "camelCase")]
pub struct DynamicPanelElement {
    pub name: String,
    pub title: String,
    #[serde(skip_serializing_if = "is_false")]
    pub is_required: bool,
    pub visible_if: String,
    pub bindings: PanelBindings,
    pub allow_add_panel: bool,
    pub allow_remove_panel: bool,
    pub template_elements: Vec<QuestionElement>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Translates a flat field list, one top-level element per field.
pub fn translate(fields: &[Field], options: &TranslateOptions) -> SurveyDocument {
    let nodes = fields.iter().map(FormNode::Field).collect::<Vec<_>>();
    translate_nodes(&nodes, options)
}

/// Translates fields with labelled groups wrapped into panels.
pub fn translate_grouped(fields: &[Field], options: &TranslateOptions) -> SurveyDocument {
    let mut nodes = Vec::new();
    let mut panel_number = 0;
    for group in group_fields(fields) {
        match group.label {
            Some(label) => {
                panel_number += 1;
                nodes.push(FormNode::Panel {
                    name: format!("panel{panel_number}"),
                    title: label.to_string(),
                    fields: group.fields,
                });
            }
            None => nodes.extend(group.fields.into_iter().map(FormNode::Field)),
        }
    }
    translate_nodes(&nodes, options)
}

pub fn translate_nodes(nodes: &[FormNode<'_>], options: &TranslateOptions) -> SurveyDocument {
    let elements = nodes
        .iter()
        .map(|node| match node {
            FormNode::Field(field) => translate_field(field),
            FormNode::Panel {
                name,
                title,
                fields,
            } => SurveyElement::Panel(PanelElement {
                name: name.clone(),
                title: title.clone(),
                elements: fields.iter().map(|field| translate_field(field)).collect(),
            }),
        })
        .collect::<Vec<_>>();
    debug!(elements = elements.len(), "translated survey document");

    SurveyDocument {
        pages: vec![SurveyPage {
            name: options.page_name.clone(),
            elements,
        }],
        show_question_numbers: options.show_question_numbers.clone(),
        completed_html: options.completed_html.clone(),
    }
}

fn translate_field(field: &Field) -> SurveyElement {
    match &field.logic.behavior {
        Behavior::Repeat { repeat } => {
            let source = repeat.count_source.clone();
            let gate = Expression::GreaterThan {
                field: source.clone(),
                threshold: 0,
            };
            SurveyElement::DynamicPanel(DynamicPanelElement {
                name: field.id.clone(),
                title: field.title.clone(),
                is_required: field.logic.is_required,
                visible_if: gate.to_string(),
                bindings: PanelBindings {
                    panel_count: source,
                },
                allow_add_panel: false,
                allow_remove_panel: false,
                template_elements: vec![QuestionElement {
                    name: format!("{}_child", field.id),
                    title: REPEAT_CHILD_TITLE.to_string(),
                    kind: field.kind.clone(),
                    is_required: true,
                    visible_if: None,
                    enable_if: None,
                    triggers: Vec::new(),
                }],
            })
        }
        Behavior::Conditional(conditions) => SurveyElement::Question(QuestionElement {
            name: field.id.clone(),
            title: field.title.clone(),
            kind: field.kind.clone(),
            is_required: field.logic.is_required,
            visible_if: conditions.visible_if.clone(),
            enable_if: conditions.enable_if.clone(),
            triggers: conditions.triggers.clone(),
        }),
    }
}
