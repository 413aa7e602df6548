mod config;
mod constraint;
mod context;
mod error;
mod field;
mod field_registry;
mod flag;
mod operator;
mod report;
mod result;
mod segment;
mod snapshot;
mod value;
mod version;

pub use config::{DEFAULT_REGEX_SIZE_LIMIT, EngineConfig, EpochUnit, UnknownFieldPolicy};
pub use constraint::{Condition, Constraint, FieldRef, field, segment};
pub use context::Context;
pub use error::{CatalogError, ParseFieldTypeError, ParseOperatorError, ValidationError};
pub use field::{ArrayItems, ContextFieldDefinition, FieldType, ValidationRules};
pub use field_registry::FieldRegistry;
pub use flag::{Flag, FlagBuilder, Strategy, StrategyBuilder};
pub use operator::{Arity, CompareOp, Operator, OperatorFamily};
pub use report::{ConditionReport, ConstraintOutcome, FlagReport};
pub use result::EvaluationResult;
pub use segment::{Segment, UnresolvedSegment};
pub use snapshot::{Snapshot, SnapshotBuilder, SnapshotHandle};
pub use value::Value;
pub use version::{Identifier, Version};
