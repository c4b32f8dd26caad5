use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Repeats a field once per unit of another field's numeric answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Repeat {
    #[serde(rename = "countSource")]
    pub count_source: String,
}

/// Auxiliary conditional effect such as `require`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Trigger {
    #[serde(rename = "type")]
    pub kind: String,
    pub expression: String,
}

/// Expression-gated behaviour. All members absent means no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Conditions {
    #[serde(rename = "visibleIf", default, skip_serializing_if = "Option::is_none")]
    pub visible_if: Option<String>,
    #[serde(rename = "enableIf", default, skip_serializing_if = "Option::is_none")]
    pub enable_if: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<Trigger>,
}

impl Conditions {
    pub fn is_empty(&self) -> bool {
        self.visible_if.is_none() && self.enable_if.is_none() && self.triggers.is_empty()
    }
}

/// Repeat and conditional logic are mutually exclusive.
///
/// A stored record carrying both `repeat` and conditional keys reads back as
/// [`Behavior::Repeat`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Behavior {
    Repeat { repeat: Repeat },
    Conditional(Conditions),
}

impl Default for Behavior {
    fn default() -> Self {
        Behavior::Conditional(Conditions::default())
    }
}

/// Logic attributes stored on a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Logic {
    #[serde(rename = "isRequired", default, skip_serializing_if = "is_false")]
    pub is_required: bool,
    #[serde(flatten)]
    pub behavior: Behavior,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Logic {
    pub fn repeat(count_source: impl Into<String>) -> Self {
        Self {
            is_required: false,
            behavior: Behavior::Repeat {
                repeat: Repeat {
                    count_source: count_source.into(),
                },
            },
        }
    }

    pub fn conditional(conditions: Conditions) -> Self {
        Self {
            is_required: false,
            behavior: Behavior::Conditional(conditions),
        }
    }

    pub fn required(mut self, is_required: bool) -> Self {
        self.is_required = is_required;
        self
    }

    pub fn repeat_source(&self) -> Option<&str> {
        match &self.behavior {
            Behavior::Repeat { repeat } => Some(repeat.count_source.as_str()),
            Behavior::Conditional(_) => None,
        }
    }

    pub fn conditions(&self) -> Option<&Conditions> {
        match &self.behavior {
            Behavior::Conditional(conditions) => Some(conditions),
            Behavior::Repeat { .. } => None,
        }
    }

    pub fn visible_if(&self) -> Option<&str> {
        self.conditions()
            .and_then(|conditions| conditions.visible_if.as_deref())
    }

    pub fn enable_if(&self) -> Option<&str> {
        self.conditions()
            .and_then(|conditions| conditions.enable_if.as_deref())
    }

    pub fn triggers(&self) -> &[Trigger] {
        self.conditions()
            .map(|conditions| conditions.triggers.as_slice())
            .unwrap_or_default()
    }

    /// Every field id this logic block points at.
    pub fn referenced_ids(&self) -> Vec<String> {
        match &self.behavior {
            Behavior::Repeat { repeat } => vec![repeat.count_source.clone()],
            Behavior::Conditional(conditions) => conditions
                .visible_if
                .iter()
                .chain(conditions.enable_if.iter())
                .chain(conditions.triggers.iter().map(|trigger| &trigger.expression))
                .filter_map(|expression| crate::expr::Expression::parse(expression))
                .map(|expression| expression.field().to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_logic_serializes_to_nothing() {
        let value = serde_json::to_value(Logic::default()).expect("serialize");
        assert_eq!(value, json!({}));
    }

    #[test]
    fn repeat_wins_when_both_are_stored() {
        let logic: Logic = serde_json::from_value(json!({
            "isRequired": true,
            "repeat": { "countSource": "q1" },
            "visibleIf": "{q2} = 'x'"
        }))
        .expect("deserialize");
        assert!(logic.is_required);
        assert_eq!(logic.repeat_source(), Some("q1"));
        assert_eq!(logic.visible_if(), None);
    }

    #[test]
    fn conditional_logic_reads_back_flat() {
        let logic: Logic = serde_json::from_value(json!({
            "visibleIf": "{q1} = 'yes'",
            "triggers": [{ "type": "require", "expression": "{q2} notempty" }]
        }))
        .expect("deserialize");
        assert_eq!(logic.visible_if(), Some("{q1} = 'yes'"));
        assert_eq!(logic.triggers().len(), 1);
        assert_eq!(logic.referenced_ids(), vec!["q1", "q2"]);
    }
}
