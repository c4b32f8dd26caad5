use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::IdSource;
use crate::spec::{Field, FieldKind};

static QUESTION_POOL: Lazy<Vec<QuestionTemplate>> = Lazy::new(|| {
    serde_json::from_str(include_str!("../assets/question_pool.json"))
        .expect("parse embedded assets/question_pool.json")
});

/// Read-only catalog entry a new field is instantiated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionTemplate {
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl QuestionTemplate {
    /// Deep-copies the template into a fresh field titled with the template label.
    pub fn instantiate(&self, ids: &mut dyn IdSource) -> Field {
        Field::new(ids.next_id(), self.label.clone(), self.kind.clone())
    }
}

pub fn question_pool() -> &'static [QuestionTemplate] {
    QUESTION_POOL.as_slice()
}

pub fn template(id: &str) -> Option<&'static QuestionTemplate> {
    question_pool().iter().find(|template| template.id == id)
}
