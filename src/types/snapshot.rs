use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::info;

use super::config::EngineConfig;
use super::constraint::Condition;
use super::context::Context;
use super::error::{CatalogError, ValidationError};
use super::field::ContextFieldDefinition;
use super::field_registry::FieldRegistry;
use super::flag::Flag;
use super::report::{ConditionReport, FlagReport};
use super::result::EvaluationResult;
use super::segment::Segment;
use crate::segments::SegmentArena;

/// Builder for constructing a [`Snapshot`].
///
/// # Example
///
/// ```
/// use flagpole::{field, ContextFieldDefinition, FieldType, Operator, Segment, Snapshot};
///
/// let snapshot = Snapshot::builder()
///     .field(ContextFieldDefinition::new("country", FieldType::Country))
///     .field(ContextFieldDefinition::new("userLevel", FieldType::Number))
///     .segment(Segment::new("veterans", [field("userLevel").is(Operator::NumGte, 50)]))
///     .build()
///     .unwrap();
/// assert_eq!(snapshot.registry().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    fields: Vec<ContextFieldDefinition>,
    segments: Vec<Segment>,
    config: EngineConfig,
}

impl SnapshotBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a context field definition.
    #[must_use]
    pub fn field(mut self, definition: ContextFieldDefinition) -> Self {
        self.fields.push(definition);
        self
    }

    #[must_use]
    pub fn fields(mut self, definitions: impl IntoIterator<Item = ContextFieldDefinition>) -> Self {
        self.fields.extend(definitions);
        self
    }

    /// Store a reusable segment.
    #[must_use]
    pub fn segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    #[must_use]
    pub fn segments(mut self, segments: impl IntoIterator<Item = Segment>) -> Self {
        self.segments.extend(segments);
        self
    }

    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Assemble the immutable snapshot.
    ///
    /// Dangling and cyclic segment references are accepted here; they fail
    /// closed at evaluation time and are reported by
    /// [`Snapshot::validate_segments()`].
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on a duplicate field key or segment id.
    pub fn build(self) -> Result<Snapshot, CatalogError> {
        let mut registry = FieldRegistry::new();
        for definition in self.fields {
            registry.register(definition)?;
        }
        let segments = SegmentArena::new(self.segments)?;
        Ok(Snapshot {
            registry,
            segments,
            config: self.config,
            version: 0,
        })
    }
}

/// An immutable bundle of field definitions, segments and engine
/// configuration. Every evaluation reads exactly one snapshot.
///
/// Thread-safe and designed to live behind `Arc`; see [`SnapshotHandle`] for
/// publishing replacements.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    registry: FieldRegistry,
    segments: SegmentArena,
    config: EngineConfig,
    version: u64,
}

impl Snapshot {
    #[must_use]
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::new()
    }

    /// A snapshot with no fields, no segments and the default configuration.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Evaluate a flag, returning the first matching strategy.
    pub fn evaluate_flag<'f, P>(
        &self,
        flag: &'f Flag<P>,
        ctx: &Context,
    ) -> EvaluationResult<'f, P> {
        crate::evaluate::evaluate_flag(flag, ctx, self)
    }

    /// Evaluate a flag and record the outcome of every constraint visited.
    pub fn evaluate_flag_detailed<'f, P>(
        &self,
        flag: &'f Flag<P>,
        ctx: &Context,
    ) -> FlagReport<'f, P> {
        crate::evaluate::evaluate_flag_detailed(flag, ctx, self)
    }

    /// Evaluate an AND-group of conditions, expanding segment references.
    #[must_use]
    pub fn evaluate_conditions(&self, conditions: &[Condition], ctx: &Context) -> bool {
        crate::evaluate::evaluate_conditions(conditions, ctx, self)
    }

    pub fn evaluate_conditions_detailed(
        &self,
        conditions: &[Condition],
        ctx: &Context,
    ) -> ConditionReport {
        crate::evaluate::evaluate_conditions_detailed(conditions, ctx, self)
    }

    /// Static checks of a condition list against the registry. Advisory only;
    /// evaluation never consults the result.
    #[must_use]
    pub fn validate_conditions(&self, conditions: &[Condition]) -> Vec<ValidationError> {
        crate::validate::validate_conditions(conditions, self)
    }

    /// Run [`validate_conditions()`](Self::validate_conditions) over every
    /// stored segment and report segment cycles.
    #[must_use]
    pub fn validate_segments(&self) -> Vec<ValidationError> {
        crate::validate::validate_segments(self)
    }

    /// Check a sample context against each registered field's rules.
    #[must_use]
    pub fn validate_context(&self, ctx: &Context) -> Vec<ValidationError> {
        crate::validate::validate_context(ctx, self)
    }

    #[must_use]
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    #[must_use]
    pub fn segments(&self) -> &SegmentArena {
        &self.segments
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Version assigned by [`SnapshotHandle::publish()`]; `0` for a snapshot
    /// that was never published.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Snapshot(v{}, {} fields, {} segments)",
            self.version,
            self.registry.len(),
            self.segments.len(),
        )
    }
}

/// Holder of the current [`Snapshot`], swapped atomically on publish.
///
/// Readers clone the `Arc` and evaluate without holding any lock, so an
/// in-flight evaluation always sees one consistent snapshot.
#[derive(Debug)]
pub struct SnapshotHandle {
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotHandle {
    #[must_use]
    pub fn new(initial: Snapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// The current snapshot.
    #[must_use]
    pub fn load(&self) -> Arc<Snapshot> {
        // The guarded value is only ever replaced whole, so a poisoned lock
        // still holds a valid snapshot.
        let guard = self
            .current
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the current snapshot, returning the version assigned to it.
    pub fn publish(&self, mut next: Snapshot) -> u64 {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        next.version = guard.version + 1;
        let version = next.version;
        info!(
            version,
            fields = next.registry.len(),
            segments = next.segments.len(),
            "published snapshot"
        );
        *guard = Arc::new(next);
        version
    }
}

impl Default for SnapshotHandle {
    fn default() -> Self {
        Self::new(Snapshot::empty())
    }
}
