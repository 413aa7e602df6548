use thiserror::Error;

use super::field::FieldType;
use super::operator::Operator;

/// Errors raised while assembling a [`Snapshot`](crate::Snapshot).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate field key '{key}'")]
    DuplicateField { key: String },

    #[error("duplicate segment id '{id}'")]
    DuplicateSegment { id: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown operator '{name}'")]
pub struct ParseOperatorError {
    pub name: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown field type '{name}'")]
pub struct ParseFieldTypeError {
    pub name: String,
}

/// Advisory problems reported by
/// [`Snapshot::validate_conditions()`](crate::Snapshot::validate_conditions),
/// [`Snapshot::validate_segments()`](crate::Snapshot::validate_segments) and
/// [`Snapshot::validate_context()`](crate::Snapshot::validate_context).
///
/// `index` is the position of the offending condition in the list that was
/// validated. None of these ever affect evaluation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("condition {index}: unknown field '{field}'")]
    UnknownField { index: usize, field: String },

    #[error("condition {index}: operator {operator} is not supported for field '{field}' of type {field_type}")]
    UnsupportedOperator {
        index: usize,
        field: String,
        operator: Operator,
        field_type: FieldType,
    },

    #[error("condition {index}: operator {operator} on field '{field}' requires a value")]
    MissingValue {
        index: usize,
        field: String,
        operator: Operator,
    },

    #[error("condition {index}: operator {operator} on field '{field}' requires a list of values")]
    MissingValues {
        index: usize,
        field: String,
        operator: Operator,
    },

    #[error("condition {index}: operator {operator} on field '{field}' has an empty list of values")]
    EmptyValues {
        index: usize,
        field: String,
        operator: Operator,
    },

    #[error("condition {index}: operator {operator} on field '{field}' takes no value")]
    UnexpectedValue {
        index: usize,
        field: String,
        operator: Operator,
    },

    #[error("condition {index}: field '{field}' sets both a value and a list of values")]
    AmbiguousValue { index: usize, field: String },

    #[error("condition {index}: '{value}' is not a valid {expected} value for field '{field}'")]
    InvalidValue {
        index: usize,
        field: String,
        value: String,
        expected: FieldType,
    },

    #[error("condition {index}: invalid regex for field '{field}': {reason}")]
    InvalidRegex {
        index: usize,
        field: String,
        reason: String,
    },

    #[error("condition {index}: '{value}' is not a legal value for field '{field}'")]
    IllegalValue {
        index: usize,
        field: String,
        value: String,
    },

    #[error("condition {index}: unknown segment '{segment}'")]
    UnknownSegment { index: usize, segment: String },

    #[error("cyclic segment reference: {}", path.join(" -> "))]
    CyclicSegment { path: Vec<String> },

    #[error("in segment '{segment}': {source}")]
    InSegment {
        segment: String,
        source: Box<ValidationError>,
    },

    #[error("required field '{field}' is missing")]
    MissingRequired { field: String },

    #[error("field '{field}' expects a {expected} value, got {found}")]
    ContextTypeMismatch {
        field: String,
        expected: FieldType,
        found: &'static str,
    },

    #[error("field '{field}' has an invalid pattern rule: {reason}")]
    InvalidFieldPattern { field: String, reason: String },

    #[error("'{value}' is not a legal value for field '{field}'")]
    NotLegalValue { field: String, value: String },

    #[error("'{value}' does not match the pattern of field '{field}'")]
    PatternMismatch { field: String, value: String },

    #[error("{value} is outside the allowed range of field '{field}'")]
    OutOfRange { field: String, value: f64 },

    #[error("length {len} is outside the allowed length of field '{field}'")]
    LengthOutOfRange { field: String, len: usize },

    #[error("field '{field}' only accepts integers, got {value}")]
    NotInteger { field: String, value: f64 },
}
