use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::operator::Operator;

/// One typed comparison between a context field and a value or value list.
///
/// `value` is used by single-value operators, `values` by the multi-value
/// operators (`*_in`, `arr_any`, `arr_all`); valueless operators (`exists`,
/// `not_exists`, `arr_empty`) use neither.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Constraint {
    pub context_name: String,
    pub operator: Operator,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub value: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub values: Option<Vec<String>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub inverted: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub case_insensitive: bool,
}

impl Constraint {
    /// Negate the operator's result.
    #[must_use]
    pub fn invert(mut self) -> Self {
        self.inverted = true;
        self
    }

    /// Compare string-family operands case-insensitively.
    #[must_use]
    pub fn ignore_case(mut self) -> Self {
        self.case_insensitive = true;
        self
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverted {
            f.write_str("NOT ")?;
        }
        write!(f, "{} {}", self.context_name, self.operator)?;
        if let Some(value) = &self.value {
            write!(f, " \"{value}\"")?;
        }
        if let Some(values) = &self.values {
            write!(f, " [{}]", values.join(", "))?;
        }
        if self.case_insensitive {
            f.write_str(" (ci)")?;
        }
        Ok(())
    }
}

/// An entry of a strategy or segment: either an inline constraint or a
/// reference to a stored segment by id.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Condition {
    Constraint(Constraint),
    Segment(String),
}

impl From<Constraint> for Condition {
    fn from(c: Constraint) -> Self {
        Condition::Constraint(c)
    }
}

/// Intermediate builder for constraints.
/// Created by [`field()`]; requires an operator method to produce a [`Constraint`].
#[derive(Debug, Clone)]
pub struct FieldRef {
    context_name: String,
}

impl FieldRef {
    /// A single-value constraint, e.g. `field("userLevel").is(Operator::NumGt, 10)`.
    #[must_use]
    pub fn is(self, operator: Operator, value: impl fmt::Display) -> Constraint {
        Constraint {
            context_name: self.context_name,
            operator,
            value: Some(value.to_string()),
            values: None,
            inverted: false,
            case_insensitive: false,
        }
    }

    /// A multi-value constraint, e.g. `field("country").is_any(Operator::StrIn, ["KR", "US"])`.
    #[must_use]
    pub fn is_any<I, T>(self, operator: Operator, values: I) -> Constraint
    where
        I: IntoIterator<Item = T>,
        T: fmt::Display,
    {
        Constraint {
            context_name: self.context_name,
            operator,
            value: None,
            values: Some(values.into_iter().map(|v| v.to_string()).collect()),
            inverted: false,
            case_insensitive: false,
        }
    }

    /// A valueless constraint (`exists`, `not_exists`, `arr_empty`).
    #[must_use]
    pub fn check(self, operator: Operator) -> Constraint {
        Constraint {
            context_name: self.context_name,
            operator,
            value: None,
            values: None,
            inverted: false,
            case_insensitive: false,
        }
    }

    #[must_use]
    pub fn exists(self) -> Constraint {
        self.check(Operator::Exists)
    }

    #[must_use]
    pub fn not_exists(self) -> Constraint {
        self.check(Operator::NotExists)
    }
}

#[must_use]
pub fn field(context_name: &str) -> FieldRef {
    FieldRef {
        context_name: context_name.to_owned(),
    }
}

/// A reference to a stored segment.
#[must_use]
pub fn segment(id: &str) -> Condition {
    Condition::Segment(id.to_owned())
}
