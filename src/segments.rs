use std::collections::HashMap;
use std::fmt;

use crate::{CatalogError, Condition, Constraint, Segment, UnresolvedSegment};

/// Stored segments, indexed by position with an id lookup table.
#[derive(Debug, Clone, Default)]
pub struct SegmentArena {
    segments: Vec<Segment>,
    index: HashMap<String, usize>,
}

/// A flattened AND-group: the constraints of a strategy (or segment) with
/// every segment reference replaced by the referenced constraints.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct ConstraintGroup<'a> {
    constraints: Vec<&'a Constraint>,
    unresolved: Option<UnresolvedSegment>,
}

impl<'a> ConstraintGroup<'a> {
    /// Constraints in expansion order. When [`unresolved()`](Self::unresolved)
    /// is set this holds only what was expanded before the bad reference.
    #[must_use]
    pub fn constraints(&self) -> &[&'a Constraint] {
        &self.constraints
    }

    #[must_use]
    pub fn unresolved(&self) -> Option<&UnresolvedSegment> {
        self.unresolved.as_ref()
    }

    /// A group with a dangling or cyclic reference can never match.
    #[must_use]
    pub fn is_satisfiable(&self) -> bool {
        self.unresolved.is_none()
    }

    pub(crate) fn into_parts(self) -> (Vec<&'a Constraint>, Option<UnresolvedSegment>) {
        (self.constraints, self.unresolved)
    }
}

impl SegmentArena {
    /// Build an arena, rejecting duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateSegment`] for the first repeated id.
    pub fn new(segments: Vec<Segment>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(segments.len());
        for (i, segment) in segments.iter().enumerate() {
            if index.insert(segment.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateSegment {
                    id: segment.id.clone(),
                });
            }
        }
        Ok(Self { segments, index })
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Segment> {
        self.index.get(id).map(|&i| &self.segments[i])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Flatten a condition list, inlining referenced segments.
    ///
    /// A segment reached more than once within the group is inlined only the
    /// first time; its constraints are already part of the conjunction. The
    /// walk keeps its own stack, so nesting depth is bounded by the number of
    /// segments rather than by the thread's stack.
    ///
    /// Expansion stops at the first missing or cyclic reference and records
    /// it in the returned group, which then never matches.
    pub fn expand<'a>(&'a self, conditions: &'a [Condition]) -> ConstraintGroup<'a> {
        let mut constraints = Vec::with_capacity(conditions.len());
        let unresolved = self.expand_into(conditions, &mut constraints).err();
        ConstraintGroup {
            constraints,
            unresolved,
        }
    }

    fn expand_into<'a>(
        &'a self,
        conditions: &'a [Condition],
        out: &mut Vec<&'a Constraint>,
    ) -> Result<(), UnresolvedSegment> {
        // Sized on the first segment reference.
        let mut state: Vec<DfsState> = Vec::new();
        // (segment being inlined, its remaining conditions); `None` is the root list.
        let mut stack: Vec<(Option<usize>, std::slice::Iter<'a, Condition>)> =
            vec![(None, conditions.iter())];

        while let Some((owner, pending)) = stack.last_mut() {
            let Some(condition) = pending.next() else {
                if let Some(idx) = *owner {
                    state[idx] = DfsState::Done;
                }
                stack.pop();
                continue;
            };
            let id = match condition {
                Condition::Constraint(c) => {
                    out.push(c);
                    continue;
                }
                Condition::Segment(id) => id,
            };
            let Some(&idx) = self.index.get(id.as_str()) else {
                return Err(UnresolvedSegment::Missing(id.clone()));
            };
            if state.is_empty() {
                state.resize(self.segments.len(), DfsState::Unvisited);
            }
            match state[idx] {
                DfsState::Done => {}
                DfsState::InStack => {
                    let path: Vec<usize> = stack.iter().filter_map(|(owner, _)| *owner).collect();
                    let pos = path.iter().position(|&p| p == idx).unwrap_or(0);
                    return Err(UnresolvedSegment::Cycle(self.cycle_path(&path[pos..], idx)));
                }
                DfsState::Unvisited => {
                    state[idx] = DfsState::InStack;
                    stack.push((Some(idx), self.segments[idx].conditions.iter()));
                }
            }
        }
        Ok(())
    }

    fn cycle_path(&self, stack: &[usize], closing: usize) -> Vec<String> {
        stack
            .iter()
            .chain(std::iter::once(&closing))
            .map(|&i| self.segments[i].id.clone())
            .collect()
    }

    /// Find one cycle among segment references, if any.
    ///
    /// The returned path starts and ends with the same id. References to
    /// missing segments are ignored here.
    #[must_use]
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let adj: Vec<Vec<usize>> = self
            .segments
            .iter()
            .map(|segment| {
                segment
                    .conditions
                    .iter()
                    .filter_map(|c| match c {
                        Condition::Segment(id) => self.index.get(id.as_str()).copied(),
                        Condition::Constraint(_) => None,
                    })
                    .collect()
            })
            .collect();

        let mut state = vec![DfsState::Unvisited; self.segments.len()];
        for start in 0..self.segments.len() {
            if state[start] == DfsState::Unvisited {
                if let Some(cycle) = self.dfs(start, &adj, &mut state) {
                    return Some(cycle);
                }
            }
        }
        None
    }

    /// Depth-first walk from `start` with an explicit stack of
    /// `(node, next edge)` frames.
    fn dfs(&self, start: usize, adj: &[Vec<usize>], state: &mut [DfsState]) -> Option<Vec<String>> {
        state[start] = DfsState::InStack;
        let mut stack = vec![(start, 0_usize)];

        while let Some((node, edge)) = stack.last_mut() {
            let node = *node;
            let Some(&next) = adj[node].get(*edge) else {
                state[node] = DfsState::Done;
                stack.pop();
                continue;
            };
            *edge += 1;
            match state[next] {
                DfsState::InStack => {
                    let path: Vec<usize> = stack.iter().map(|&(n, _)| n).collect();
                    let pos = path.iter().position(|&n| n == next)?;
                    return Some(self.cycle_path(&path[pos..], next));
                }
                DfsState::Unvisited => {
                    state[next] = DfsState::InStack;
                    stack.push((next, 0));
                }
                DfsState::Done => {}
            }
        }
        None
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum DfsState {
    Unvisited,
    InStack,
    Done,
}

impl fmt::Display for SegmentArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SegmentArena({} segments)", self.segments.len())
    }
}
