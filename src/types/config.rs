#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::field::FieldType;
use super::operator::Operator;

/// How a constraint on a field missing from the registry is typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnknownFieldPolicy {
    /// Always treat the field as `string`; non-string operators then never match.
    #[default]
    TreatAsString,
    /// Use the field type the operator's family implies, so `num_gt` on an
    /// unregistered field compares numbers.
    InferFromOperator,
}

impl UnknownFieldPolicy {
    #[must_use]
    pub fn resolve(self, operator: Operator) -> FieldType {
        match self {
            UnknownFieldPolicy::InferFromOperator => operator.implied_field_type(),
            UnknownFieldPolicy::TreatAsString => FieldType::String,
        }
    }
}

/// Unit of numeric epoch timestamps supplied for `date` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EpochUnit {
    #[default]
    Millis,
    Seconds,
}

pub const DEFAULT_REGEX_SIZE_LIMIT: usize = 256 * 1024;

/// Immutable engine configuration carried by a [`Snapshot`](crate::Snapshot).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    unknown_field_policy: UnknownFieldPolicy,
    regex_size_limit: usize,
    epoch_unit: EpochUnit,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            unknown_field_policy: UnknownFieldPolicy::default(),
            regex_size_limit: DEFAULT_REGEX_SIZE_LIMIT,
            epoch_unit: EpochUnit::default(),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_unknown_field_policy(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_field_policy = policy;
        self
    }

    /// Upper bound, in bytes, on the compiled size of `str_regex` patterns.
    #[must_use]
    pub fn with_regex_size_limit(mut self, bytes: usize) -> Self {
        self.regex_size_limit = bytes;
        self
    }

    #[must_use]
    pub fn with_epoch_unit(mut self, unit: EpochUnit) -> Self {
        self.epoch_unit = unit;
        self
    }

    #[must_use]
    pub fn unknown_field_policy(&self) -> UnknownFieldPolicy {
        self.unknown_field_policy
    }

    #[must_use]
    pub fn regex_size_limit(&self) -> usize {
        self.regex_size_limit
    }

    #[must_use]
    pub fn epoch_unit(&self) -> EpochUnit {
        self.epoch_unit
    }
}
