use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::rules::{Rule, RuleKind, decode_rule, encode_rule};
use crate::spec::{Behavior, Conditions, Field, Logic, Repeat, Trigger};

/// Which logic editor tab produced the draft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicMode {
    #[default]
    Conditional,
    Repeat,
}

/// Editor state for one field's logic, before compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicDraft {
    #[serde(default)]
    pub mode: LogicMode,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_source: Option<String>,
    #[serde(default)]
    pub always_required: bool,
}

impl LogicDraft {
    pub fn conditional(rules: Vec<Rule>) -> Self {
        Self {
            mode: LogicMode::Conditional,
            rules,
            repeat_source: None,
            always_required: false,
        }
    }

    pub fn repeat(source: impl Into<String>) -> Self {
        Self {
            mode: LogicMode::Repeat,
            rules: Vec::new(),
            repeat_source: Some(source.into()),
            always_required: false,
        }
    }

    pub fn with_required(mut self, always_required: bool) -> Self {
        self.always_required = always_required;
        self
    }

    /// Repopulates editor state from a stored field.
    ///
    /// Expressions that no longer parse are left out of the rule list.
    pub fn from_field(field: &Field, fields: &[Field]) -> Self {
        let always_required = field.logic.is_required;
        match &field.logic.behavior {
            Behavior::Repeat { repeat } => {
                LogicDraft::repeat(repeat.count_source.clone()).with_required(always_required)
            }
            Behavior::Conditional(conditions) => {
                let mut rules = Vec::new();
                if let Some(expression) = &conditions.visible_if {
                    rules.extend(decode_rule(RuleKind::Visible, expression, fields));
                }
                if let Some(expression) = &conditions.enable_if {
                    rules.extend(decode_rule(RuleKind::Enable, expression, fields));
                }
                for trigger in &conditions.triggers {
                    rules.extend(decode_rule(
                        trigger.kind.as_str(),
                        &trigger.expression,
                        fields,
                    ));
                }
                LogicDraft::conditional(rules).with_required(always_required)
            }
        }
    }
}

/// Reference problems found while compiling a draft.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogicError {
    #[error("field '{0}' is not part of the form")]
    UnknownTarget(String),
    #[error("field '{field}' references unknown field '{source_id}'")]
    UnknownSource { field: String, source_id: String },
    #[error("field '{field}' may only reference fields placed before it, not '{source_id}'")]
    ForwardReference { field: String, source_id: String },
    #[error("repeat source '{source_id}' must be a number input")]
    RepeatSourceNotNumeric { source_id: String },
}

/// Compiles a draft into the logic block stored on field `target`.
///
/// The result replaces the previous logic entirely. Incomplete rules are
/// dropped; references to missing, later, or the same field are rejected.
pub fn compile_logic(
    target: &str,
    fields: &[Field],
    draft: &LogicDraft,
) -> Result<Logic, LogicError> {
    let position = fields
        .iter()
        .position(|field| field.id == target)
        .ok_or_else(|| LogicError::UnknownTarget(target.to_string()))?;
    let earlier = &fields[..position];

    let mut logic = Logic {
        is_required: draft.always_required,
        behavior: Behavior::default(),
    };

    match draft.mode {
        LogicMode::Repeat => {
            let source = draft
                .repeat_source
                .as_deref()
                .map(str::trim)
                .filter(|source| !source.is_empty());
            if let Some(source) = source {
                let source_field = resolve_source(target, source, earlier, fields)?;
                if !source_field.kind.is_numeric() {
                    return Err(LogicError::RepeatSourceNotNumeric {
                        source_id: source.to_string(),
                    });
                }
                logic.behavior = Behavior::Repeat {
                    repeat: Repeat {
                        count_source: source.to_string(),
                    },
                };
            } else {
                debug!(field = target, "repeat mode without a source; logic cleared");
            }
        }
        LogicMode::Conditional => {
            let mut conditions = Conditions::default();
            for rule in &draft.rules {
                if !rule.has_source() {
                    continue;
                }
                if rule.kind.as_str().trim().is_empty() {
                    debug!(field = target, source = %rule.source, "rule has no kind; dropped");
                    continue;
                }
                let source_field = resolve_source(target, rule.source.trim(), earlier, fields)?;
                let Some(expression) = encode_rule(rule, Some(&source_field.kind)) else {
                    continue;
                };
                route(&mut conditions, rule, expression.to_string());
            }
            logic.behavior = Behavior::Conditional(conditions);
        }
    }

    Ok(logic)
}

fn route(conditions: &mut Conditions, rule: &Rule, expression: String) {
    match &rule.kind {
        RuleKind::Visible => conditions.visible_if = Some(expression),
        RuleKind::Enable => conditions.enable_if = Some(expression),
        RuleKind::Trigger(kind) => conditions.triggers.push(Trigger {
            kind: kind.clone(),
            expression,
        }),
    }
}

fn resolve_source<'a>(
    target: &str,
    source: &str,
    earlier: &'a [Field],
    fields: &[Field],
) -> Result<&'a Field, LogicError> {
    if let Some(field) = earlier.iter().find(|field| field.id == source) {
        return Ok(field);
    }
    if fields.iter().any(|field| field.id == source) {
        Err(LogicError::ForwardReference {
            field: target.to_string(),
            source_id: source.to_string(),
        })
    } else {
        Err(LogicError::UnknownSource {
            field: target.to_string(),
            source_id: source.to_string(),
        })
    }
}
