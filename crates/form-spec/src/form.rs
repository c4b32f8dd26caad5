use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::template;
use crate::compile::{LogicDraft, LogicError, compile_logic};
use crate::edit::{EditError, FieldEdit, NewQuestion};
use crate::ids::IdSource;
use crate::spec::Field;
use crate::translate::{SurveyDocument, TranslateOptions, translate, translate_grouped};

#[derive(Debug, Error)]
pub enum FormError {
    #[error("no field with id '{0}'")]
    UnknownField(String),
    #[error("no question template with id '{0}'")]
    UnknownTemplate(String),
    #[error("field id '{0}' is already used")]
    DuplicateId(String),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Logic(#[from] LogicError),
}

/// The builder's ordered field list.
///
/// Every mutation either succeeds completely or leaves the list untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Form {
    fields: Vec<Field>,
}

impl Form {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.id == id)
    }

    fn require(&self, id: &str) -> Result<usize, FormError> {
        self.position(id)
            .ok_or_else(|| FormError::UnknownField(id.to_string()))
    }

    pub fn append(&mut self, field: Field) -> Result<(), FormError> {
        let end = self.fields.len();
        self.insert_at(end, field)
    }

    /// Inserts `field` at `index`, clamped to the end of the list.
    pub fn insert_at(&mut self, index: usize, field: Field) -> Result<(), FormError> {
        if self.find(&field.id).is_some() {
            return Err(FormError::DuplicateId(field.id));
        }
        let index = index.min(self.fields.len());
        debug!(field = %field.id, index, "inserting field");
        self.fields.insert(index, field);
        Ok(())
    }

    /// Instantiates a catalog template, appending when `index` is `None`.
    pub fn add_template(
        &mut self,
        template_id: &str,
        index: Option<usize>,
        ids: &mut dyn IdSource,
    ) -> Result<&Field, FormError> {
        let field = template(template_id)
            .ok_or_else(|| FormError::UnknownTemplate(template_id.to_string()))?
            .instantiate(ids);
        self.place(field, index)
    }

    /// Validates and adds a custom question, appending when `index` is `None`.
    pub fn add_question(
        &mut self,
        question: NewQuestion,
        index: Option<usize>,
        ids: &mut dyn IdSource,
    ) -> Result<&Field, FormError> {
        let field = question.build(ids)?;
        self.place(field, index)
    }

    fn place(&mut self, field: Field, index: Option<usize>) -> Result<&Field, FormError> {
        let index = index.unwrap_or(self.fields.len()).min(self.fields.len());
        self.insert_at(index, field)?;
        Ok(&self.fields[index])
    }

    /// Moves a field to `index` (clamped) among the remaining fields.
    pub fn move_field(&mut self, id: &str, index: usize) -> Result<(), FormError> {
        let from = self.require(id)?;
        let field = self.fields.remove(from);
        let to = index.min(self.fields.len());
        self.fields.insert(to, field);
        for dangling in self.forward_references() {
            warn!(field = %dangling.0, source_id = %dangling.1, "logic now references a later field");
        }
        Ok(())
    }

    /// Removes a field by id and returns it.
    ///
    /// Logic on other fields that pointed at it is kept and reported.
    pub fn remove(&mut self, id: &str) -> Result<Field, FormError> {
        let index = self.require(id)?;
        let removed = self.fields.remove(index);
        for field in &self.fields {
            if field.logic.referenced_ids().iter().any(|source| source == id) {
                warn!(field = %field.id, source_id = id, "logic references a removed field");
            }
        }
        Ok(removed)
    }

    /// Applies an edit-flow change to one field's content.
    pub fn edit(&mut self, id: &str, edit: &FieldEdit) -> Result<&Field, FormError> {
        let index = self.require(id)?;
        let updated = edit.apply(&self.fields[index])?;
        self.fields[index] = updated;
        Ok(&self.fields[index])
    }

    /// Sets or clears (`None` or blank) a field's group label.
    pub fn set_group(&mut self, id: &str, group: Option<&str>) -> Result<(), FormError> {
        let index = self.require(id)?;
        self.fields[index].group = group
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string);
        Ok(())
    }

    /// Compiles `draft` and replaces the field's logic block.
    pub fn apply_logic(&mut self, id: &str, draft: &LogicDraft) -> Result<&Field, FormError> {
        let index = self.require(id)?;
        let logic = compile_logic(id, &self.fields, draft)?;
        self.fields[index].logic = logic;
        Ok(&self.fields[index])
    }

    pub fn logic_draft(&self, id: &str) -> Result<LogicDraft, FormError> {
        let index = self.require(id)?;
        Ok(LogicDraft::from_field(&self.fields[index], &self.fields))
    }

    pub fn translate(&self, options: &TranslateOptions, grouped: bool) -> SurveyDocument {
        if grouped {
            translate_grouped(&self.fields, options)
        } else {
            translate(&self.fields, options)
        }
    }

    fn forward_references(&self) -> Vec<(&str, String)> {
        let mut found = Vec::new();
        for (index, field) in self.fields.iter().enumerate() {
            for source in field.logic.referenced_ids() {
                let earlier = self.fields[..index].iter().any(|f| f.id == source);
                if !earlier {
                    found.push((field.id.as_str(), source));
                }
            }
        }
        found
    }
}

impl From<Vec<Field>> for Form {
    fn from(fields: Vec<Field>) -> Self {
        Self::new(fields)
    }
}
