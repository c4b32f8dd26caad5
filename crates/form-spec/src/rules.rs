use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::expr::{Expression, Operator};
use crate::spec::{Field, FieldKind};

/// What a rule controls once its condition holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuleKind {
    Visible,
    Enable,
    /// Any other effect, stored as a trigger with this tag (e.g. `require`).
    Trigger(String),
}

impl RuleKind {
    pub fn as_str(&self) -> &str {
        match self {
            RuleKind::Visible => "visible",
            RuleKind::Enable => "enable",
            RuleKind::Trigger(tag) => tag,
        }
    }
}

impl From<String> for RuleKind {
    fn from(tag: String) -> Self {
        match tag.trim() {
            "visible" => RuleKind::Visible,
            "enable" => RuleKind::Enable,
            other => RuleKind::Trigger(other.to_string()),
        }
    }
}

impl From<&str> for RuleKind {
    fn from(tag: &str) -> Self {
        RuleKind::from(tag.to_string())
    }
}

impl From<RuleKind> for String {
    fn from(kind: RuleKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison value edited in the rule editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Bool(bool),
    Text(String),
}

impl RuleValue {
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            RuleValue::Bool(flag) => Cow::Owned(flag.to_string()),
            RuleValue::Text(text) => Cow::Borrowed(text),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            RuleValue::Bool(_) => false,
            RuleValue::Text(text) => text.trim().is_empty(),
        }
    }
}

impl Default for RuleValue {
    fn default() -> Self {
        RuleValue::Text(String::new())
    }
}

impl From<&str> for RuleValue {
    fn from(text: &str) -> Self {
        RuleValue::Text(text.to_string())
    }
}

impl From<String> for RuleValue {
    fn from(text: String) -> Self {
        RuleValue::Text(text)
    }
}

impl From<bool> for RuleValue {
    fn from(flag: bool) -> Self {
        RuleValue::Bool(flag)
    }
}

/// Transient editor rule; stored fields only keep the encoded expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub kind: RuleKind,
    pub source: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: RuleValue,
}

impl Rule {
    pub fn new(
        kind: impl Into<RuleKind>,
        source: impl Into<String>,
        operator: Operator,
        value: impl Into<RuleValue>,
    ) -> Self {
        Self {
            kind: kind.into(),
            source: source.into(),
            operator,
            value: value.into(),
        }
    }

    /// A rule without a selected source is still being edited.
    pub fn has_source(&self) -> bool {
        !self.source.trim().is_empty()
    }
}

/// Encodes a rule given its source field's kind.
///
/// Value comparisons against multi-select sources always use `contains`;
/// `empty`/`notempty` keep their own form. Value operators with a blank value
/// produce nothing.
pub fn encode_rule(rule: &Rule, source_kind: Option<&FieldKind>) -> Option<Expression> {
    if !rule.has_source() {
        debug!(kind = %rule.kind, "rule has no source; dropped");
        return None;
    }
    let source = rule.source.trim();
    let multi_select = source_kind.is_some_and(FieldKind::is_multi_select);
    let operator = if multi_select && rule.operator.takes_value() {
        Operator::Contains
    } else {
        rule.operator
    };
    if operator.takes_value() && rule.value.is_blank() {
        debug!(kind = %rule.kind, source, "rule value is blank; dropped");
        return None;
    }
    Some(Expression::compare(source, operator, rule.value.text()))
}

/// Decodes a stored expression back into an editor rule.
///
/// Unparseable expressions yield `None`. Boolean sources read `'true'` and
/// `'false'` back as booleans.
pub fn decode_rule(kind: impl Into<RuleKind>, expression: &str, fields: &[Field]) -> Option<Rule> {
    let kind = kind.into();
    let Some(parsed) = Expression::parse(expression) else {
        debug!(%kind, expression, "expression not recognised; dropped");
        return None;
    };
    let operator = parsed.operator()?;
    let source_is_boolean = fields
        .iter()
        .find(|field| field.id == parsed.field())
        .is_some_and(|field| field.kind.is_boolean());
    let value = match parsed.value() {
        Some("true") if source_is_boolean => RuleValue::Bool(true),
        Some("false") if source_is_boolean => RuleValue::Bool(false),
        Some(text) => RuleValue::Text(text.to_string()),
        None => RuleValue::default(),
    };
    Some(Rule {
        kind,
        source: parsed.field().to_string(),
        operator,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Choice;

    fn checkbox() -> FieldKind {
        FieldKind::Checkbox {
            choices: vec![Choice::new("item1", "A")],
        }
    }

    #[test]
    fn kind_tags_round_trip_through_strings() {
        assert_eq!(RuleKind::from("visible"), RuleKind::Visible);
        assert_eq!(RuleKind::from("enable"), RuleKind::Enable);
        assert_eq!(
            RuleKind::from("require"),
            RuleKind::Trigger("require".into())
        );
        assert_eq!(String::from(RuleKind::Trigger("require".into())), "require");
    }

    #[test]
    fn multi_select_ignores_operator() {
        let rule = Rule::new("visible", "q1", Operator::NotEquals, "item1");
        let expression = encode_rule(&rule, Some(&checkbox())).expect("encoded");
        assert_eq!(expression.to_string(), "{q1} contains 'item1'");
    }

    #[test]
    fn multi_select_keeps_emptiness_checks() {
        let empty = Rule::new("visible", "q1", Operator::Empty, "");
        let expression = encode_rule(&empty, Some(&checkbox())).expect("encoded");
        assert_eq!(expression.to_string(), "{q1} empty");

        let ranking = FieldKind::Ranking {
            choices: vec![Choice::new("item1", "A")],
        };
        let not_empty = Rule::new("visible", "q1", Operator::NotEmpty, "");
        let expression = encode_rule(&not_empty, Some(&ranking)).expect("encoded");
        assert_eq!(expression.to_string(), "{q1} notempty");
    }

    #[test]
    fn emptiness_carries_no_value() {
        let rule = Rule::new("enable", "q1", Operator::NotEmpty, "ignored");
        let expression = encode_rule(&rule, None).expect("encoded");
        assert_eq!(expression.to_string(), "{q1} notempty");
    }

    #[test]
    fn blank_value_or_source_drops_rule() {
        let blank_value = Rule::new("visible", "q1", Operator::Equals, "   ");
        assert_eq!(encode_rule(&blank_value, None), None);
        let no_source = Rule::new("visible", "", Operator::Empty, "");
        assert_eq!(encode_rule(&no_source, None), None);
    }

    #[test]
    fn boolean_values_encode_as_text() {
        let rule = Rule::new("visible", "q1", Operator::Equals, true);
        let expression = encode_rule(&rule, None).expect("encoded");
        assert_eq!(expression.to_string(), "{q1} = 'true'");
    }

    #[test]
    fn rule_value_deserializes_untagged() {
        let flag: RuleValue = serde_json::from_str("true").expect("bool");
        assert_eq!(flag, RuleValue::Bool(true));
        let text: RuleValue = serde_json::from_str("\"x\"").expect("text");
        assert_eq!(text, RuleValue::Text("x".into()));
    }
}
