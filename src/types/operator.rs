use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::ParseOperatorError;
use super::field::FieldType;

/// Constraint operators. Names render as the snake_case identifiers stored
/// with constraint definitions (`str_eq`, `semver_gte`, `arr_any`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Operator {
    StrEq,
    StrContains,
    StrStartsWith,
    StrEndsWith,
    StrIn,
    StrRegex,
    NumEq,
    NumGt,
    NumGte,
    NumLt,
    NumLte,
    NumIn,
    BoolIs,
    DateEq,
    DateGt,
    DateGte,
    DateLt,
    DateLte,
    SemverEq,
    SemverGt,
    SemverGte,
    SemverLt,
    SemverLte,
    SemverIn,
    ArrAny,
    ArrAll,
    ArrEmpty,
    Exists,
    NotExists,
}

/// The operator families. Each family targets one kind of field value,
/// except [`Universal`](OperatorFamily::Universal) which applies to every type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorFamily {
    String,
    Number,
    Boolean,
    Date,
    Semver,
    Array,
    Universal,
}

/// What shape of constraint value an operator consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// No value; `value` and `values` must both be unset.
    None,
    /// A single `value`.
    Single,
    /// A `values` list.
    Multi,
}

/// Ordering comparisons shared by the number, date and semver families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    #[must_use]
    pub fn holds(self, ord: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering;
        match self {
            CompareOp::Eq => ord == Ordering::Equal,
            CompareOp::Gt => ord == Ordering::Greater,
            CompareOp::Gte => ord != Ordering::Less,
            CompareOp::Lt => ord == Ordering::Less,
            CompareOp::Lte => ord != Ordering::Greater,
        }
    }
}

impl Operator {
    pub const ALL: [Operator; 29] = [
        Operator::StrEq,
        Operator::StrContains,
        Operator::StrStartsWith,
        Operator::StrEndsWith,
        Operator::StrIn,
        Operator::StrRegex,
        Operator::NumEq,
        Operator::NumGt,
        Operator::NumGte,
        Operator::NumLt,
        Operator::NumLte,
        Operator::NumIn,
        Operator::BoolIs,
        Operator::DateEq,
        Operator::DateGt,
        Operator::DateGte,
        Operator::DateLt,
        Operator::DateLte,
        Operator::SemverEq,
        Operator::SemverGt,
        Operator::SemverGte,
        Operator::SemverLt,
        Operator::SemverLte,
        Operator::SemverIn,
        Operator::ArrAny,
        Operator::ArrAll,
        Operator::ArrEmpty,
        Operator::Exists,
        Operator::NotExists,
    ];

    #[must_use]
    pub fn family(self) -> OperatorFamily {
        match self {
            Operator::StrEq
            | Operator::StrContains
            | Operator::StrStartsWith
            | Operator::StrEndsWith
            | Operator::StrIn
            | Operator::StrRegex => OperatorFamily::String,
            Operator::NumEq
            | Operator::NumGt
            | Operator::NumGte
            | Operator::NumLt
            | Operator::NumLte
            | Operator::NumIn => OperatorFamily::Number,
            Operator::BoolIs => OperatorFamily::Boolean,
            Operator::DateEq
            | Operator::DateGt
            | Operator::DateGte
            | Operator::DateLt
            | Operator::DateLte => OperatorFamily::Date,
            Operator::SemverEq
            | Operator::SemverGt
            | Operator::SemverGte
            | Operator::SemverLt
            | Operator::SemverLte
            | Operator::SemverIn => OperatorFamily::Semver,
            Operator::ArrAny | Operator::ArrAll | Operator::ArrEmpty => OperatorFamily::Array,
            Operator::Exists | Operator::NotExists => OperatorFamily::Universal,
        }
    }

    #[must_use]
    pub fn arity(self) -> Arity {
        match self {
            Operator::ArrEmpty | Operator::Exists | Operator::NotExists => Arity::None,
            Operator::StrIn
            | Operator::NumIn
            | Operator::SemverIn
            | Operator::ArrAny
            | Operator::ArrAll => Arity::Multi,
            Operator::StrEq
            | Operator::StrContains
            | Operator::StrStartsWith
            | Operator::StrEndsWith
            | Operator::StrRegex
            | Operator::NumEq
            | Operator::NumGt
            | Operator::NumGte
            | Operator::NumLt
            | Operator::NumLte
            | Operator::BoolIs
            | Operator::DateEq
            | Operator::DateGt
            | Operator::DateGte
            | Operator::DateLt
            | Operator::DateLte
            | Operator::SemverEq
            | Operator::SemverGt
            | Operator::SemverGte
            | Operator::SemverLt
            | Operator::SemverLte => Arity::Single,
        }
    }

    /// The ordering comparison behind a `*_eq`/`*_gt`/... operator, if any.
    /// `bool_is` and `str_eq` are plain equality and return `None`.
    #[must_use]
    pub fn comparison(self) -> Option<CompareOp> {
        match self {
            Operator::NumEq | Operator::DateEq | Operator::SemverEq => Some(CompareOp::Eq),
            Operator::NumGt | Operator::DateGt | Operator::SemverGt => Some(CompareOp::Gt),
            Operator::NumGte | Operator::DateGte | Operator::SemverGte => Some(CompareOp::Gte),
            Operator::NumLt | Operator::DateLt | Operator::SemverLt => Some(CompareOp::Lt),
            Operator::NumLte | Operator::DateLte | Operator::SemverLte => Some(CompareOp::Lte),
            _ => None,
        }
    }

    /// Whether this operator may target a field of the given type.
    #[must_use]
    pub fn supports(self, field_type: FieldType) -> bool {
        match self.family() {
            OperatorFamily::String => field_type.is_string_like(),
            OperatorFamily::Number => field_type == FieldType::Number,
            OperatorFamily::Boolean => field_type == FieldType::Boolean,
            OperatorFamily::Date => field_type == FieldType::Date,
            OperatorFamily::Semver => field_type == FieldType::Semver,
            OperatorFamily::Array => field_type == FieldType::Array,
            OperatorFamily::Universal => true,
        }
    }

    /// The field type this operator implies when the field itself is not
    /// registered. Universal operators imply `string`.
    #[must_use]
    pub fn implied_field_type(self) -> FieldType {
        match self.family() {
            OperatorFamily::String | OperatorFamily::Universal => FieldType::String,
            OperatorFamily::Number => FieldType::Number,
            OperatorFamily::Boolean => FieldType::Boolean,
            OperatorFamily::Date => FieldType::Date,
            OperatorFamily::Semver => FieldType::Semver,
            OperatorFamily::Array => FieldType::Array,
        }
    }

    /// Operators a field of the given type accepts, in declaration order.
    pub fn supported_by(field_type: FieldType) -> impl Iterator<Item = Operator> {
        Operator::ALL
            .into_iter()
            .filter(move |op| op.supports(field_type))
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::StrEq => "str_eq",
            Operator::StrContains => "str_contains",
            Operator::StrStartsWith => "str_starts_with",
            Operator::StrEndsWith => "str_ends_with",
            Operator::StrIn => "str_in",
            Operator::StrRegex => "str_regex",
            Operator::NumEq => "num_eq",
            Operator::NumGt => "num_gt",
            Operator::NumGte => "num_gte",
            Operator::NumLt => "num_lt",
            Operator::NumLte => "num_lte",
            Operator::NumIn => "num_in",
            Operator::BoolIs => "bool_is",
            Operator::DateEq => "date_eq",
            Operator::DateGt => "date_gt",
            Operator::DateGte => "date_gte",
            Operator::DateLt => "date_lt",
            Operator::DateLte => "date_lte",
            Operator::SemverEq => "semver_eq",
            Operator::SemverGt => "semver_gt",
            Operator::SemverGte => "semver_gte",
            Operator::SemverLt => "semver_lt",
            Operator::SemverLte => "semver_lte",
            Operator::SemverIn => "semver_in",
            Operator::ArrAny => "arr_any",
            Operator::ArrAll => "arr_all",
            Operator::ArrEmpty => "arr_empty",
            Operator::Exists => "exists",
            Operator::NotExists => "not_exists",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = ParseOperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ParseOperatorError { name: s.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for op in Operator::ALL {
            assert_eq!(op.as_str().parse::<Operator>().unwrap(), op);
        }
    }

    #[test]
    fn unknown_name() {
        let err = "str_like".parse::<Operator>().unwrap_err();
        assert_eq!(err.to_string(), "unknown operator 'str_like'");
    }

    #[test]
    fn universal_operators_support_every_type() {
        for t in FieldType::ALL {
            assert!(Operator::Exists.supports(t));
            assert!(Operator::NotExists.supports(t));
        }
    }

    #[test]
    fn string_family_targets_string_like_types() {
        assert!(Operator::StrEq.supports(FieldType::Country));
        assert!(Operator::StrRegex.supports(FieldType::LocaleCode));
        assert!(!Operator::StrEq.supports(FieldType::Number));
        assert!(!Operator::StrIn.supports(FieldType::Array));
    }

    #[test]
    fn each_typed_family_targets_one_type() {
        assert!(Operator::NumGt.supports(FieldType::Number));
        assert!(!Operator::NumGt.supports(FieldType::String));
        assert!(Operator::BoolIs.supports(FieldType::Boolean));
        assert!(Operator::DateLt.supports(FieldType::Date));
        assert!(Operator::SemverIn.supports(FieldType::Semver));
        assert!(Operator::ArrAll.supports(FieldType::Array));
        assert!(!Operator::ArrAll.supports(FieldType::String));
    }

    #[test]
    fn supported_by_boolean() {
        let ops: Vec<Operator> = Operator::supported_by(FieldType::Boolean).collect();
        assert_eq!(
            ops,
            vec![Operator::BoolIs, Operator::Exists, Operator::NotExists]
        );
    }

    #[test]
    fn arity_partitions() {
        assert_eq!(Operator::Exists.arity(), Arity::None);
        assert_eq!(Operator::ArrEmpty.arity(), Arity::None);
        assert_eq!(Operator::StrIn.arity(), Arity::Multi);
        assert_eq!(Operator::ArrAll.arity(), Arity::Multi);
        assert_eq!(Operator::SemverGte.arity(), Arity::Single);
    }

    #[test]
    fn compare_op_holds() {
        use std::cmp::Ordering;
        assert!(CompareOp::Gte.holds(Ordering::Equal));
        assert!(CompareOp::Gte.holds(Ordering::Greater));
        assert!(!CompareOp::Gt.holds(Ordering::Equal));
        assert!(CompareOp::Lte.holds(Ordering::Less));
        assert!(!CompareOp::Eq.holds(Ordering::Less));
    }

    #[test]
    fn comparison_mapping() {
        assert_eq!(Operator::NumGte.comparison(), Some(CompareOp::Gte));
        assert_eq!(Operator::DateLt.comparison(), Some(CompareOp::Lt));
        assert_eq!(Operator::SemverEq.comparison(), Some(CompareOp::Eq));
        assert_eq!(Operator::StrEq.comparison(), None);
    }
}
