use std::fmt;

use super::result::EvaluationResult;
use super::segment::UnresolvedSegment;

/// How a single constraint fared during a detailed evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOutcome {
    /// The comparison (after inversion) held.
    Matched,
    /// The comparison (after inversion) did not hold.
    NotMatched,
    /// The context has no entry for the field.
    Absent,
    /// The context value or the constraint value could not be coerced.
    Invalid,
    /// The operator does not apply to the field's type.
    Unsupported,
}

impl ConstraintOutcome {
    #[must_use]
    pub fn is_match(self) -> bool {
        self == ConstraintOutcome::Matched
    }
}

impl fmt::Display for ConstraintOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConstraintOutcome::Matched => "matched",
            ConstraintOutcome::NotMatched => "not matched",
            ConstraintOutcome::Absent => "absent",
            ConstraintOutcome::Invalid => "invalid",
            ConstraintOutcome::Unsupported => "unsupported",
        };
        f.write_str(s)
    }
}

/// Detailed report for one condition group, returned by
/// [`Snapshot::evaluate_conditions_detailed()`](crate::Snapshot::evaluate_conditions_detailed).
///
/// Unlike plain evaluation, every flattened constraint is evaluated so the
/// report shows each outcome, in expansion order.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct ConditionReport {
    result: bool,
    outcomes: Vec<(String, ConstraintOutcome)>,
    unresolved: Option<UnresolvedSegment>,
}

impl ConditionReport {
    pub(crate) fn new(
        outcomes: Vec<(String, ConstraintOutcome)>,
        unresolved: Option<UnresolvedSegment>,
    ) -> Self {
        let result = unresolved.is_none() && outcomes.iter().all(|(_, o)| o.is_match());
        Self {
            result,
            outcomes,
            unresolved,
        }
    }

    /// The group's boolean result, same as
    /// [`Snapshot::evaluate_conditions()`](crate::Snapshot::evaluate_conditions).
    #[must_use]
    pub fn result(&self) -> bool {
        self.result
    }

    /// `(constraint description, outcome)` pairs.
    #[must_use]
    pub fn outcomes(&self) -> &[(String, ConstraintOutcome)] {
        &self.outcomes
    }

    /// The segment reference that forced this group to fail, if any.
    #[must_use]
    pub fn unresolved(&self) -> Option<&UnresolvedSegment> {
        self.unresolved.as_ref()
    }
}

impl fmt::Display for ConditionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "result: {}", self.result)?;
        if let Some(unresolved) = &self.unresolved {
            write!(f, " ({unresolved})")?;
        }
        for (constraint, outcome) in &self.outcomes {
            write!(f, "\n  {constraint}: {outcome}")?;
        }
        Ok(())
    }
}

/// Detailed flag report returned by
/// [`Snapshot::evaluate_flag_detailed()`](crate::Snapshot::evaluate_flag_detailed).
///
/// Holds one [`ConditionReport`] per strategy visited, stopping after the
/// first match.
#[derive(Debug, Clone)]
#[must_use]
pub struct FlagReport<'a, P> {
    result: EvaluationResult<'a, P>,
    strategies: Vec<ConditionReport>,
}

impl<'a, P> FlagReport<'a, P> {
    pub(crate) fn new(result: EvaluationResult<'a, P>, strategies: Vec<ConditionReport>) -> Self {
        Self { result, strategies }
    }

    /// The evaluation result, same as
    /// [`Snapshot::evaluate_flag()`](crate::Snapshot::evaluate_flag).
    pub fn result(&self) -> EvaluationResult<'a, P> {
        self.result
    }

    #[must_use]
    pub fn matched(&self) -> bool {
        self.result.matched()
    }

    #[must_use]
    pub fn strategy_index(&self) -> Option<usize> {
        self.result.strategy_index()
    }

    #[must_use]
    pub fn payload(&self) -> Option<&'a P> {
        self.result.payload()
    }

    /// Per-strategy reports, in evaluation order.
    #[must_use]
    pub fn strategies(&self) -> &[ConditionReport] {
        &self.strategies
    }
}

impl<P> fmt::Display for FlagReport<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.result)?;
        for (i, report) in self.strategies.iter().enumerate() {
            write!(f, "\nstrategy {i}: {report}")?;
        }
        Ok(())
    }
}
