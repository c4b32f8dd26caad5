use thiserror::Error;

use crate::ids::IdSource;
use crate::spec::{Choice, Field, FieldKind, QuestionType};

/// Input problems reported when a question is saved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("question title cannot be empty")]
    EmptyTitle,
    #[error("add at least one choice")]
    MissingChoices,
    #[error("add at least one row and one column for the matrix")]
    MissingGrid,
}

/// Builds `{value, text}` entries from texts, valued `<prefix>1`, `<prefix>2`, ...
pub fn entries_from_texts<S: AsRef<str>>(prefix: &str, texts: &[S]) -> Vec<Choice> {
    texts
        .iter()
        .enumerate()
        .map(|(index, text)| Choice::new(format!("{prefix}{}", index + 1), text.as_ref()))
        .collect()
}

fn non_blank(entries: Vec<Choice>) -> Vec<Choice> {
    entries
        .into_iter()
        .filter(|entry| !entry.text.trim().is_empty())
        .collect()
}

/// Custom question flow input.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestion {
    pub title: String,
    pub question_type: QuestionType,
    pub choices: Vec<Choice>,
    pub rows: Vec<Choice>,
    pub columns: Vec<Choice>,
}

impl NewQuestion {
    pub fn new(title: impl Into<String>, question_type: QuestionType) -> Self {
        Self {
            title: title.into(),
            question_type,
            choices: Vec::new(),
            rows: Vec::new(),
            columns: Vec::new(),
        }
    }

    pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }

    pub fn with_grid(mut self, rows: Vec<Choice>, columns: Vec<Choice>) -> Self {
        self.rows = rows;
        self.columns = columns;
        self
    }

    /// Validates the input and creates a field with a fresh id and no logic.
    pub fn build(self, ids: &mut dyn IdSource) -> Result<Field, EditError> {
        if self.title.trim().is_empty() {
            return Err(EditError::EmptyTitle);
        }
        let mut kind = self.question_type.empty_kind();
        fill_lists(
            &mut kind,
            Some(self.choices),
            Some(self.rows),
            Some(self.columns),
        );
        check_lists(&kind)?;
        Ok(Field::new(ids.next_id(), self.title, kind))
    }
}

/// Edit flow input. `None` keeps the current value.
///
/// Editing changes content only; the field's kind and logic are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldEdit {
    pub title: Option<String>,
    pub choices: Option<Vec<Choice>>,
    pub rows: Option<Vec<Choice>>,
    pub columns: Option<Vec<Choice>>,
}

impl FieldEdit {
    pub fn apply(&self, field: &Field) -> Result<Field, EditError> {
        let mut updated = field.clone();
        if let Some(title) = &self.title {
            updated.title = title.clone();
        }
        if updated.title.trim().is_empty() {
            return Err(EditError::EmptyTitle);
        }
        fill_lists(
            &mut updated.kind,
            self.choices.clone(),
            self.rows.clone(),
            self.columns.clone(),
        );
        check_lists(&updated.kind)?;
        Ok(updated)
    }
}

fn fill_lists(
    kind: &mut FieldKind,
    choices: Option<Vec<Choice>>,
    rows: Option<Vec<Choice>>,
    columns: Option<Vec<Choice>>,
) {
    if let FieldKind::Matrix {
        rows: current_rows,
        columns: current_columns,
    } = kind
    {
        if let Some(rows) = rows {
            *current_rows = non_blank(rows);
        }
        if let Some(columns) = columns {
            *current_columns = non_blank(columns);
        }
    } else if let (Some(current), Some(choices)) = (kind.choices_mut(), choices) {
        *current = non_blank(choices);
    }
}

fn check_lists(kind: &FieldKind) -> Result<(), EditError> {
    match kind {
        FieldKind::Matrix { rows, columns } if rows.is_empty() || columns.is_empty() => {
            Err(EditError::MissingGrid)
        }
        _ if kind.choices().is_some_and(<[Choice]>::is_empty) => Err(EditError::MissingChoices),
        _ => Ok(()),
    }
}
