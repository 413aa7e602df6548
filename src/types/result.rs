use std::fmt;

/// Outcome of evaluating a [`Flag`](crate::Flag): whether a strategy matched,
/// which one, and a borrow of its payload.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct EvaluationResult<'a, P> {
    strategy_index: Option<usize>,
    payload: Option<&'a P>,
}

// Manual impls: only a reference is held, so `P` need not be `Clone`.
impl<P> Clone for EvaluationResult<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for EvaluationResult<'_, P> {}

impl<P> fmt::Display for EvaluationResult<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.strategy_index {
            Some(idx) => write!(f, "matched strategy {idx}"),
            None => write!(f, "no match"),
        }
    }
}

impl<'a, P> EvaluationResult<'a, P> {
    pub fn matched_at(strategy_index: usize, payload: &'a P) -> Self {
        Self {
            strategy_index: Some(strategy_index),
            payload: Some(payload),
        }
    }

    pub fn no_match() -> Self {
        Self {
            strategy_index: None,
            payload: None,
        }
    }

    #[must_use]
    pub fn matched(&self) -> bool {
        self.strategy_index.is_some()
    }

    /// Index of the first matching strategy, in declaration order.
    #[must_use]
    pub fn strategy_index(&self) -> Option<usize> {
        self.strategy_index
    }

    #[must_use]
    pub fn payload(&self) -> Option<&'a P> {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matched_result() {
        let payload = "variant_b";
        let r = EvaluationResult::matched_at(1, &payload);
        assert!(r.matched());
        assert_eq!(r.strategy_index(), Some(1));
        assert_eq!(r.payload(), Some(&"variant_b"));
        assert_eq!(r.to_string(), "matched strategy 1");
    }

    #[test]
    fn no_match_result() {
        let r: EvaluationResult<'_, ()> = EvaluationResult::no_match();
        assert!(!r.matched());
        assert_eq!(r.strategy_index(), None);
        assert_eq!(r.payload(), None);
        assert_eq!(r.to_string(), "no match");
    }

    #[test]
    fn result_equality() {
        let a = 7_u32;
        let b = 7_u32;
        assert_eq!(
            EvaluationResult::matched_at(0, &a),
            EvaluationResult::matched_at(0, &b)
        );
        assert_ne!(
            EvaluationResult::matched_at(0, &a),
            EvaluationResult::matched_at(1, &b)
        );
    }
}
