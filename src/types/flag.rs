#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::constraint::Condition;

/// An AND-group of conditions with an opaque payload returned on match.
///
/// The payload (variant id, rollout parameters, remote-config value, ...) is
/// never inspected by the engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Strategy<P = ()> {
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub conditions: Vec<Condition>,
    pub payload: P,
}

impl<P> Strategy<P> {
    #[must_use]
    pub fn new<I, C>(conditions: I, payload: P) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Condition>,
    {
        Self {
            name: String::new(),
            conditions: conditions.into_iter().map(Into::into).collect(),
            payload,
        }
    }

    /// A strategy with no conditions. It always matches.
    #[must_use]
    pub fn always(payload: P) -> Self {
        Self {
            name: String::new(),
            conditions: Vec::new(),
            payload,
        }
    }
}

/// A feature flag: an ordered list of strategies evaluated first-match-wins.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Flag<P = ()> {
    pub key: String,
    pub strategies: Vec<Strategy<P>>,
}

impl<P> Flag<P> {
    #[must_use]
    pub fn new(key: &str, strategies: Vec<Strategy<P>>) -> Self {
        Self {
            key: key.to_owned(),
            strategies,
        }
    }

    /// Start building a flag.
    ///
    /// # Example
    ///
    /// ```
    /// use flagpole::{field, segment, Flag, Operator};
    ///
    /// let flag = Flag::builder("new_shop")
    ///     .strategy("vip", "variant_b", |s| s.segment("whales"))
    ///     .strategy("korea", "variant_a", |s| {
    ///         s.when(field("country").is_any(Operator::StrIn, ["KR"]))
    ///     })
    ///     .build();
    /// assert_eq!(flag.strategies.len(), 2);
    /// ```
    #[must_use]
    pub fn builder(key: &str) -> FlagBuilder<P> {
        FlagBuilder {
            key: key.to_owned(),
            strategies: Vec::new(),
        }
    }
}

/// Builder for constructing a [`Flag`]. Strategies keep declaration order.
#[derive(Debug)]
pub struct FlagBuilder<P> {
    key: String,
    strategies: Vec<Strategy<P>>,
}

/// Intermediate builder passed to the strategy definition closure.
#[derive(Debug, Default)]
pub struct StrategyBuilder {
    conditions: Vec<Condition>,
}

impl<P> FlagBuilder<P> {
    /// Append a strategy. The closure adds its conditions; a closure that adds
    /// none produces an always-matching strategy.
    #[must_use]
    pub fn strategy(
        mut self,
        name: &str,
        payload: P,
        f: impl FnOnce(StrategyBuilder) -> StrategyBuilder,
    ) -> Self {
        let builder = f(StrategyBuilder::default());
        self.strategies.push(Strategy {
            name: name.to_owned(),
            conditions: builder.conditions,
            payload,
        });
        self
    }

    #[must_use]
    pub fn build(self) -> Flag<P> {
        Flag {
            key: self.key,
            strategies: self.strategies,
        }
    }
}

impl StrategyBuilder {
    /// Add an inline condition (ANDed with the others).
    #[must_use]
    pub fn when(mut self, condition: impl Into<Condition>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    /// Add a reference to a stored segment.
    #[must_use]
    pub fn segment(mut self, id: &str) -> Self {
        self.conditions.push(Condition::Segment(id.to_owned()));
        self
    }
}
