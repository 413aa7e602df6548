#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::constraint::Condition;

/// A named, persisted AND-group of conditions reusable by reference.
///
/// A segment's conditions may themselves reference other segments. Missing
/// and cyclic references are tolerated in stored data and fail closed at
/// evaluation time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Segment {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub conditions: Vec<Condition>,
}

impl Segment {
    #[must_use]
    pub fn new<I, C>(id: &str, conditions: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Condition>,
    {
        Self {
            id: id.to_owned(),
            name: id.to_owned(),
            conditions: conditions.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_owned();
        self
    }
}

/// Why a segment reference could not be expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedSegment {
    /// The referenced id is not in the snapshot.
    Missing(String),
    /// The reference closes a cycle; the path starts and ends with the same id.
    Cycle(Vec<String>),
}

impl std::fmt::Display for UnresolvedSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnresolvedSegment::Missing(id) => write!(f, "missing segment '{id}'"),
            UnresolvedSegment::Cycle(path) => write!(f, "segment cycle {}", path.join(" -> ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Operator, field, segment};

    #[test]
    fn new_segment_converts_constraints() {
        let seg =
            Segment::new("whales", [field("spend").is(Operator::NumGte, 1000)]).named("Whales");
        assert_eq!(seg.id, "whales");
        assert_eq!(seg.name, "Whales");
        assert_eq!(seg.conditions.len(), 1);
    }

    #[test]
    fn segments_may_reference_segments() {
        let seg = Segment::new("kr_whales", [segment("whales")]);
        assert_eq!(seg.conditions, vec![Condition::Segment("whales".into())]);
    }

    #[test]
    fn unresolved_display() {
        assert_eq!(
            UnresolvedSegment::Missing("ghost".into()).to_string(),
            "missing segment 'ghost'"
        );
        assert_eq!(
            UnresolvedSegment::Cycle(vec!["a".into(), "b".into(), "a".into()]).to_string(),
            "segment cycle a -> b -> a"
        );
    }
}
