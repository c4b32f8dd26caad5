use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// `{field} op 'literal'?`, with `\'` and `\\` escapes inside the literal.
// The closing quote may be missing in hand-edited records.
static CONDITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\{([^{}]+)\}\s*(<>|=|notempty|empty|contains)(?:\s*'((?:[^'\\]|\\.)*)'?)?\s*$")
        .expect("condition pattern compiles")
});

/// Comparison operators understood by the rendering engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Operator {
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "<>")]
    NotEquals,
    #[serde(rename = "empty")]
    Empty,
    #[serde(rename = "notempty")]
    NotEmpty,
    #[serde(rename = "contains")]
    Contains,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::NotEquals => "<>",
            Operator::Empty => "empty",
            Operator::NotEmpty => "notempty",
            Operator::Contains => "contains",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "=" => Some(Operator::Equals),
            "<>" => Some(Operator::NotEquals),
            "empty" => Some(Operator::Empty),
            "notempty" => Some(Operator::NotEmpty),
            "contains" => Some(Operator::Contains),
            _ => None,
        }
    }

    /// Whether the operator compares against a literal.
    pub fn takes_value(&self) -> bool {
        !matches!(self, Operator::Empty | Operator::NotEmpty)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single condition over one field's answer.
///
/// `Display` writes the engine grammar (`{q1} = 'yes'`); [`Expression::parse`]
/// reads it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Equals { field: String, value: String },
    NotEquals { field: String, value: String },
    Empty { field: String },
    NotEmpty { field: String },
    Contains { field: String, value: String },
    /// Numeric gate used by repeat panels; never produced by the rule editor.
    GreaterThan { field: String, threshold: i64 },
}

impl Expression {
    pub fn compare(
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<String>,
    ) -> Expression {
        let field = field.into();
        let value = value.into();
        match operator {
            Operator::Equals => Expression::Equals { field, value },
            Operator::NotEquals => Expression::NotEquals { field, value },
            Operator::Empty => Expression::Empty { field },
            Operator::NotEmpty => Expression::NotEmpty { field },
            Operator::Contains => Expression::Contains { field, value },
        }
    }

    /// Parses `{field} op 'value'`. Anything else yields `None`.
    pub fn parse(input: &str) -> Option<Expression> {
        let captures = CONDITION.captures(input)?;
        let field = captures.get(1)?.as_str().trim();
        if field.is_empty() {
            return None;
        }
        let operator = Operator::from_token(captures.get(2)?.as_str())?;
        let value = captures
            .get(3)
            .map(|literal| unescape(literal.as_str()))
            .unwrap_or_default();
        Some(Expression::compare(field, operator, value))
    }

    pub fn field(&self) -> &str {
        match self {
            Expression::Equals { field, .. }
            | Expression::NotEquals { field, .. }
            | Expression::Empty { field }
            | Expression::NotEmpty { field }
            | Expression::Contains { field, .. }
            | Expression::GreaterThan { field, .. } => field,
        }
    }

    pub fn operator(&self) -> Option<Operator> {
        match self {
            Expression::Equals { .. } => Some(Operator::Equals),
            Expression::NotEquals { .. } => Some(Operator::NotEquals),
            Expression::Empty { .. } => Some(Operator::Empty),
            Expression::NotEmpty { .. } => Some(Operator::NotEmpty),
            Expression::Contains { .. } => Some(Operator::Contains),
            Expression::GreaterThan { .. } => None,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Expression::Equals { value, .. }
            | Expression::NotEquals { value, .. }
            | Expression::Contains { value, .. } => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Equals { field, value } => {
                write!(f, "{{{field}}} = '{}'", escape(value))
            }
            Expression::NotEquals { field, value } => {
                write!(f, "{{{field}}} <> '{}'", escape(value))
            }
            Expression::Empty { field } => write!(f, "{{{field}}} empty"),
            Expression::NotEmpty { field } => write!(f, "{{{field}}} notempty"),
            Expression::Contains { field, value } => {
                write!(f, "{{{field}}} contains '{}'", escape(value))
            }
            Expression::GreaterThan { field, threshold } => {
                write!(f, "{{{field}}} > {threshold}")
            }
        }
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == '\'' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn unescape(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    let mut chars = literal.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(ch);
        }
    }
    out
}
