//! The operator table: base semantics of every operator over coerced values.
//!
//! Inversion is applied by the caller on the returned base result.

use std::cmp::Ordering;

use regex::RegexBuilder;

use crate::coerce::{Element, TypedValue};
use crate::Operator;

/// Per-evaluation switches that change how string operators match.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MatchOptions {
    pub case_insensitive: bool,
    pub regex_size_limit: usize,
}

/// Apply `op` to a coerced context value and coerced operand.
///
/// `operand` is `None` for valueless operators. Returns `None` when the
/// operand shapes do not fit the operator or a regex fails to compile; the
/// caller treats that as invalid input.
pub(crate) fn apply(
    op: Operator,
    subject: &TypedValue,
    operand: Option<&TypedValue>,
    options: MatchOptions,
) -> Option<bool> {
    match op {
        Operator::StrEq => strings(subject, operand).map(|(s, v)| s == v),
        Operator::StrContains => strings(subject, operand).map(|(s, v)| s.contains(v)),
        Operator::StrStartsWith => strings(subject, operand).map(|(s, v)| s.starts_with(v)),
        Operator::StrEndsWith => strings(subject, operand).map(|(s, v)| s.ends_with(v)),
        Operator::StrRegex => {
            let (s, pattern) = strings(subject, operand)?;
            let re = RegexBuilder::new(pattern)
                .case_insensitive(options.case_insensitive)
                .size_limit(options.regex_size_limit)
                .build()
                .ok()?;
            Some(re.is_match(s))
        }
        Operator::StrIn | Operator::NumIn | Operator::SemverIn => member(subject, operand),
        Operator::NumEq
        | Operator::NumGt
        | Operator::NumGte
        | Operator::NumLt
        | Operator::NumLte
        | Operator::DateEq
        | Operator::DateGt
        | Operator::DateGte
        | Operator::DateLt
        | Operator::DateLte
        | Operator::SemverEq
        | Operator::SemverGt
        | Operator::SemverGte
        | Operator::SemverLt
        | Operator::SemverLte => {
            let ord = ordering(subject, operand?)?;
            Some(op.comparison()?.holds(ord))
        }
        Operator::BoolIs => match (subject, operand?) {
            (TypedValue::Bool(a), TypedValue::Bool(b)) => Some(a == b),
            _ => None,
        },
        Operator::ArrAny => {
            let (have, want) = sets(subject, operand)?;
            Some(want.iter().any(|e| have.contains(e)))
        }
        Operator::ArrAll => {
            let (have, want) = sets(subject, operand)?;
            Some(want.iter().all(|e| have.contains(e)))
        }
        Operator::ArrEmpty => match subject {
            TypedValue::Set(have) => Some(have.is_empty()),
            _ => None,
        },
        // A coerced subject means the entry is present.
        Operator::Exists => Some(true),
        Operator::NotExists => Some(false),
    }
}

/// Base result of `exists`/`not_exists` given raw presence.
pub(crate) fn presence(op: Operator, present: bool) -> Option<bool> {
    match op {
        Operator::Exists => Some(present),
        Operator::NotExists => Some(!present),
        _ => None,
    }
}

fn strings<'a>(
    subject: &'a TypedValue,
    operand: Option<&'a TypedValue>,
) -> Option<(&'a str, &'a str)> {
    match (subject, operand?) {
        (TypedValue::Str(s), TypedValue::Str(v)) => Some((s.as_str(), v.as_str())),
        _ => None,
    }
}

fn ordering(subject: &TypedValue, operand: &TypedValue) -> Option<Ordering> {
    match (subject, operand) {
        (TypedValue::Number(a), TypedValue::Number(b)) => a.partial_cmp(b),
        (TypedValue::Date(a), TypedValue::Date(b)) => Some(a.cmp(b)),
        (TypedValue::Semver(a), TypedValue::Semver(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Membership of a scalar in an operand list. An empty list never matches.
fn member(subject: &TypedValue, operand: Option<&TypedValue>) -> Option<bool> {
    let TypedValue::Set(candidates) = operand? else {
        return None;
    };
    let needle = subject.as_element()?;
    Some(candidates.contains(&needle))
}

fn sets<'a>(
    subject: &'a TypedValue,
    operand: Option<&'a TypedValue>,
) -> Option<(&'a [Element], &'a [Element])> {
    match (subject, operand?) {
        (TypedValue::Set(have), TypedValue::Set(want)) => Some((have.as_slice(), want.as_slice())),
        _ => None,
    }
}
