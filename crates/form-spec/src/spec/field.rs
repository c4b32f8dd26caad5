use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::logic::Logic;

/// A `{value, text}` pair used for choices, grid rows and grid columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Choice {
    pub value: String,
    pub text: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
        }
    }
}

/// Input variants of the single-line text question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Number,
}

/// Question kind with only the attributes that kind carries.
///
/// Serialized through the rendering engine's `type` key so a field reads back
/// as `{"type": "radiogroup", "choices": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text {
        #[serde(
            rename = "inputType",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        input_type: Option<InputType>,
    },
    Comment,
    RadioGroup {
        #[serde(default)]
        choices: Vec<Choice>,
    },
    Checkbox {
        #[serde(default)]
        choices: Vec<Choice>,
    },
    Dropdown {
        #[serde(default)]
        choices: Vec<Choice>,
    },
    Boolean {
        #[serde(rename = "labelTrue", default = "default_label_true")]
        label_true: String,
        #[serde(rename = "labelFalse", default = "default_label_false")]
        label_false: String,
    },
    Rating,
    Matrix {
        #[serde(default)]
        rows: Vec<Choice>,
        #[serde(default)]
        columns: Vec<Choice>,
    },
    Ranking {
        #[serde(default)]
        choices: Vec<Choice>,
    },
    File,
}

fn default_label_true() -> String {
    "Yes".to_string()
}

fn default_label_false() -> String {
    "No".to_string()
}

impl FieldKind {
    pub fn question_type(&self) -> QuestionType {
        match self {
            FieldKind::Text {
                input_type: Some(InputType::Number),
            } => QuestionType::Number,
            FieldKind::Text { input_type: None } => QuestionType::Text,
            FieldKind::Comment => QuestionType::Comment,
            FieldKind::RadioGroup { .. } => QuestionType::RadioGroup,
            FieldKind::Checkbox { .. } => QuestionType::Checkbox,
            FieldKind::Dropdown { .. } => QuestionType::Dropdown,
            FieldKind::Boolean { .. } => QuestionType::Boolean,
            FieldKind::Rating => QuestionType::Rating,
            FieldKind::Matrix { .. } => QuestionType::Matrix,
            FieldKind::Ranking { .. } => QuestionType::Ranking,
            FieldKind::File => QuestionType::File,
        }
    }

    /// Answers are arrays of selected values; rules against them use `contains`.
    pub fn is_multi_select(&self) -> bool {
        matches!(self, FieldKind::Checkbox { .. } | FieldKind::Ranking { .. })
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, FieldKind::Boolean { .. })
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldKind::Text {
                input_type: Some(InputType::Number)
            }
        )
    }

    pub fn choices(&self) -> Option<&[Choice]> {
        match self {
            FieldKind::RadioGroup { choices }
            | FieldKind::Checkbox { choices }
            | FieldKind::Dropdown { choices }
            | FieldKind::Ranking { choices } => Some(choices),
            _ => None,
        }
    }

    pub(crate) fn choices_mut(&mut self) -> Option<&mut Vec<Choice>> {
        match self {
            FieldKind::RadioGroup { choices }
            | FieldKind::Checkbox { choices }
            | FieldKind::Dropdown { choices }
            | FieldKind::Ranking { choices } => Some(choices),
            _ => None,
        }
    }
}

/// Selector for the question kinds offered by the custom question flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum QuestionType {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "comment")]
    Comment,
    #[serde(rename = "text-number")]
    Number,
    #[serde(rename = "radiogroup")]
    RadioGroup,
    #[serde(rename = "checkbox")]
    Checkbox,
    #[serde(rename = "dropdown")]
    Dropdown,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "rating")]
    Rating,
    #[serde(rename = "matrix")]
    Matrix,
    #[serde(rename = "ranking")]
    Ranking,
    #[serde(rename = "file")]
    File,
}

impl QuestionType {
    pub const ALL: [QuestionType; 11] = [
        QuestionType::Text,
        QuestionType::Comment,
        QuestionType::Number,
        QuestionType::RadioGroup,
        QuestionType::Checkbox,
        QuestionType::Dropdown,
        QuestionType::Boolean,
        QuestionType::Rating,
        QuestionType::Matrix,
        QuestionType::Ranking,
        QuestionType::File,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Text => "text",
            QuestionType::Comment => "comment",
            QuestionType::Number => "text-number",
            QuestionType::RadioGroup => "radiogroup",
            QuestionType::Checkbox => "checkbox",
            QuestionType::Dropdown => "dropdown",
            QuestionType::Boolean => "boolean",
            QuestionType::Rating => "rating",
            QuestionType::Matrix => "matrix",
            QuestionType::Ranking => "ranking",
            QuestionType::File => "file",
        }
    }

    /// Kind with empty lists and default boolean labels.
    pub fn empty_kind(&self) -> FieldKind {
        match self {
            QuestionType::Text => FieldKind::Text { input_type: None },
            QuestionType::Comment => FieldKind::Comment,
            QuestionType::Number => FieldKind::Text {
                input_type: Some(InputType::Number),
            },
            QuestionType::RadioGroup => FieldKind::RadioGroup {
                choices: Vec::new(),
            },
            QuestionType::Checkbox => FieldKind::Checkbox {
                choices: Vec::new(),
            },
            QuestionType::Dropdown => FieldKind::Dropdown {
                choices: Vec::new(),
            },
            QuestionType::Boolean => FieldKind::Boolean {
                label_true: default_label_true(),
                label_false: default_label_false(),
            },
            QuestionType::Rating => FieldKind::Rating,
            QuestionType::Matrix => FieldKind::Matrix {
                rows: Vec::new(),
                columns: Vec::new(),
            },
            QuestionType::Ranking => FieldKind::Ranking {
                choices: Vec::new(),
            },
            QuestionType::File => FieldKind::File,
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_ascii_lowercase();
        QuestionType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| format!("unknown question type '{raw}'"))
    }
}

/// One question in the builder's flat field list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Field {
    pub id: String,
    pub title: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(flatten)]
    pub logic: Logic,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl Field {
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            logic: Logic::default(),
            group: None,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_logic(mut self, logic: Logic) -> Self {
        self.logic = logic;
        self
    }

    /// Group label, treating blank labels as ungrouped.
    pub fn group_label(&self) -> Option<&str> {
        self.group
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
    }
}
