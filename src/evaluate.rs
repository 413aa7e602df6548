use tracing::{debug, trace};

use crate::coerce::{Coerced, Coercer, TypedValue};
use crate::operators::{self, MatchOptions};
use crate::{
    Arity, Condition, ConditionReport, Constraint, ConstraintOutcome, Context, EvaluationResult,
    Flag, FlagReport, Operator, OperatorFamily, Snapshot,
};

/// Evaluate one constraint and classify the outcome.
///
/// Fail-closed: anything other than [`ConstraintOutcome::Matched`] counts as
/// `false`. Inversion is applied only to a definite base result.
pub(crate) fn constraint_outcome(
    constraint: &Constraint,
    ctx: &Context,
    snapshot: &Snapshot,
) -> ConstraintOutcome {
    let name = constraint.context_name.as_str();
    let op = constraint.operator;
    let raw = ctx.get(name);

    if let Some(base) = operators::presence(op, raw.is_some()) {
        return decided(base, constraint.inverted);
    }

    let definition = snapshot.registry().get(name);
    let field_type = match definition {
        Some(def) => def.field_type,
        None => snapshot.config().unknown_field_policy().resolve(op),
    };
    if !op.supports(field_type) {
        trace!(field = name, operator = %op, %field_type, "operator unsupported for field type");
        return ConstraintOutcome::Unsupported;
    }

    let fold = constraint.case_insensitive && op.family() == OperatorFamily::String;
    let coercer = definition
        .map_or_else(|| Coercer::new(field_type), Coercer::for_field)
        .epoch_unit(snapshot.config().epoch_unit());

    let subject = match coercer.fold_case(fold).context(raw) {
        Coerced::Value(v) => v,
        Coerced::Absent => {
            trace!(field = name, operator = %op, "context value absent");
            return ConstraintOutcome::Absent;
        }
        Coerced::Invalid => {
            trace!(field = name, operator = %op, "context value failed to coerce");
            return ConstraintOutcome::Invalid;
        }
    };

    // Regex patterns keep their case; the regex itself is compiled case-insensitively.
    let literal = coercer.fold_case(fold && op != Operator::StrRegex);
    let operand = match operand(constraint, &literal) {
        Ok(operand) => operand,
        Err(()) => {
            trace!(field = name, operator = %op, "constraint value failed to coerce");
            return ConstraintOutcome::Invalid;
        }
    };

    let options = MatchOptions {
        case_insensitive: fold,
        regex_size_limit: snapshot.config().regex_size_limit(),
    };
    match operators::apply(op, &subject, operand.as_ref(), options) {
        Some(base) => decided(base, constraint.inverted),
        None => {
            trace!(field = name, operator = %op, "operands did not fit operator");
            ConstraintOutcome::Invalid
        }
    }
}

fn decided(base: bool, inverted: bool) -> ConstraintOutcome {
    if base != inverted {
        ConstraintOutcome::Matched
    } else {
        ConstraintOutcome::NotMatched
    }
}

/// The coerced `value`/`values` the operator consumes. A missing or
/// unparseable operand is an error.
fn operand(constraint: &Constraint, coercer: &Coercer) -> Result<Option<TypedValue>, ()> {
    let coerced = match constraint.operator.arity() {
        Arity::None => return Ok(None),
        Arity::Single => coercer.literal(constraint.value.as_deref()),
        Arity::Multi => coercer.literal_set(constraint.values.as_deref()),
    };
    match coerced {
        Coerced::Value(v) => Ok(Some(v)),
        Coerced::Absent | Coerced::Invalid => Err(()),
    }
}

/// AND over a condition list after segment expansion. Short-circuits on the
/// first failing constraint; an empty list is `true`.
pub(crate) fn evaluate_conditions(
    conditions: &[Condition],
    ctx: &Context,
    snapshot: &Snapshot,
) -> bool {
    let group = snapshot.segments().expand(conditions);
    if let Some(unresolved) = group.unresolved() {
        trace!(%unresolved, "condition group unsatisfiable");
        return false;
    }
    group
        .constraints()
        .iter()
        .all(|c| constraint_outcome(c, ctx, snapshot).is_match())
}

/// Like [`evaluate_conditions`] but evaluates every constraint and records
/// each outcome.
pub(crate) fn evaluate_conditions_detailed(
    conditions: &[Condition],
    ctx: &Context,
    snapshot: &Snapshot,
) -> ConditionReport {
    let (constraints, unresolved) = snapshot.segments().expand(conditions).into_parts();
    if let Some(unresolved) = &unresolved {
        trace!(%unresolved, "condition group unsatisfiable");
    }
    let outcomes = constraints
        .into_iter()
        .map(|c| (c.to_string(), constraint_outcome(c, ctx, snapshot)))
        .collect();
    ConditionReport::new(outcomes, unresolved)
}

/// First-match-wins over the flag's strategies.
pub(crate) fn evaluate_flag<'f, P>(
    flag: &'f Flag<P>,
    ctx: &Context,
    snapshot: &Snapshot,
) -> EvaluationResult<'f, P> {
    for (idx, strategy) in flag.strategies.iter().enumerate() {
        if evaluate_conditions(&strategy.conditions, ctx, snapshot) {
            debug!(flag = %flag.key, strategy = idx, name = %strategy.name, "flag matched");
            return EvaluationResult::matched_at(idx, &strategy.payload);
        }
    }
    debug!(flag = %flag.key, strategies = flag.strategies.len(), "flag did not match");
    EvaluationResult::no_match()
}

pub(crate) fn evaluate_flag_detailed<'f, P>(
    flag: &'f Flag<P>,
    ctx: &Context,
    snapshot: &Snapshot,
) -> FlagReport<'f, P> {
    let mut reports = Vec::with_capacity(flag.strategies.len());
    for (idx, strategy) in flag.strategies.iter().enumerate() {
        let report = evaluate_conditions_detailed(&strategy.conditions, ctx, snapshot);
        let matched = report.result();
        reports.push(report);
        if matched {
            debug!(flag = %flag.key, strategy = idx, name = %strategy.name, "flag matched");
            return FlagReport::new(EvaluationResult::matched_at(idx, &strategy.payload), reports);
        }
    }
    debug!(flag = %flag.key, strategies = flag.strategies.len(), "flag did not match");
    FlagReport::new(EvaluationResult::no_match(), reports)
}
