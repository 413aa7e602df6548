pub mod coerce;
mod error;
mod evaluate;
mod operators;
pub mod parse;
mod segments;
mod types;
mod validate;

pub use error::FlagpoleError;
pub use parse::SemverError;
pub use segments::{ConstraintGroup, SegmentArena};
pub use types::{
    Arity, ArrayItems, CatalogError, CompareOp, Condition, ConditionReport, Constraint,
    ConstraintOutcome, Context, ContextFieldDefinition, DEFAULT_REGEX_SIZE_LIMIT, EngineConfig,
    EpochUnit, EvaluationResult, FieldRef, FieldRegistry, FieldType, Flag, FlagBuilder, FlagReport,
    Identifier, Operator, OperatorFamily, ParseFieldTypeError, ParseOperatorError, Segment,
    Snapshot, SnapshotBuilder, SnapshotHandle, Strategy, StrategyBuilder, UnknownFieldPolicy,
    UnresolvedSegment, ValidationError, ValidationRules, Value, Version, field, segment,
};
