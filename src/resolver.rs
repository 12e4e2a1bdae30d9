//! Cascading selection resolver.
//!
//! Owns the ordered dropdown levels for one root type and keeps them
//! consistent: values at level n are only valid under the exact picks at
//! levels `0..n`, so any upstream change discards everything below it.
//!
//! Transitions are split so fetches can run elsewhere:
//! [`Resolver::begin_root`] / [`Resolver::begin_select`] mutate state and
//! hand out a [`PendingFetch`] ticket; [`Resolver::apply_expansion`] commits
//! the fetched result only while the ticket is still current. The blocking
//! helpers (`select_root_type`, `select_value`, `initialize_from_pairs`) run
//! both halves back to back against a [`FitmentCatalog`].

use crate::catalog::{FitmentCatalog, root_types_or_empty};
use crate::model::{
    DropdownLevel, FitmentType, FitmentValue, RootType, RootTypeId, SelectionPair, ValueId,
};
use crate::pairs::{encode_levels, is_contiguous, selected_prefix};

mod expand;
pub use self::expand::expand;
mod restore;
pub use self::restore::Restore;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// No root type chosen, or the root has no levels.
    #[default]
    Empty,
    /// Waiting for the level at this index.
    Loading { level: usize },
    Ready,
    /// The fetch for this level failed; levels above it are intact.
    Error { level: usize },
}

/// Ticket for an outstanding expansion. Stale once the generation, root type
/// or level count it was issued against has moved on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingFetch {
    pub generation: u64,
    pub root_type: RootTypeId,
    pub level: usize,
    pub context: Vec<SelectionPair>,
}

/// Result of asking the catalog for the level after `PendingFetch::context`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expansion {
    Next {
        fitment_type: FitmentType,
        values: Vec<FitmentValue>,
    },
    /// No further type: the cascade is resolved.
    Terminal,
    /// A lookup failed. Carries the type when only the values call failed.
    Failed { fitment_type: Option<FitmentType> },
}

#[derive(Debug, Default)]
pub struct Resolver {
    root_types: Vec<RootType>,
    selected_root: Option<RootTypeId>,
    levels: Vec<DropdownLevel>,
    phase: Phase,
    generation: u64,
    terminal: bool,
    restored_from: Option<String>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root_types(root_types: Vec<RootType>) -> Self {
        Self {
            root_types,
            ..Self::default()
        }
    }

    pub fn root_types(&self) -> &[RootType] {
        &self.root_types
    }

    pub fn set_root_types(&mut self, root_types: Vec<RootType>) {
        self.root_types = root_types;
    }

    pub fn selected_root(&self) -> Option<RootTypeId> {
        self.selected_root
    }

    pub fn levels(&self) -> &[DropdownLevel] {
        &self.levels
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading { .. })
    }

    pub fn has_selection(&self) -> bool {
        self.levels.iter().any(|l| l.is_selected())
    }

    /// Every level picked, nothing in flight, and the catalog has reported
    /// that no further type follows.
    pub fn is_complete(&self) -> bool {
        self.terminal
            && self.phase == Phase::Ready
            && !self.levels.is_empty()
            && self.levels.iter().all(|l| l.is_selected())
    }

    pub fn selected_pairs(&self) -> String {
        encode_levels(&self.levels)
    }

    pub fn selection(&self) -> Vec<SelectionPair> {
        selected_prefix(&self.levels)
    }

    /// Loads root types through the catalog; an unreachable backend yields
    /// none.
    pub fn load_root_types<C: FitmentCatalog + ?Sized>(&mut self, catalog: &C) -> &[RootType] {
        self.root_types = root_types_or_empty(catalog);
        &self.root_types
    }

    fn next_ticket(&mut self, root_type: RootTypeId, context: Vec<SelectionPair>) -> PendingFetch {
        self.generation += 1;
        self.terminal = false;
        let level = self.levels.len();
        self.phase = Phase::Loading { level };
        PendingFetch {
            generation: self.generation,
            root_type,
            level,
            context,
        }
    }

    /// Records the root type without fetching its first level, for callers
    /// that restore pairs right after. In-flight fetches become stale.
    pub fn preselect_root(&mut self, root: RootTypeId) {
        tracing::debug!(root = %root, "preselect root type");
        self.selected_root = Some(root);
        self.levels.clear();
        self.generation += 1;
        self.terminal = false;
        self.phase = Phase::Empty;
        self.restored_from = None;
    }

    /// Switches taxonomy. Everything previously resolved is dropped and any
    /// fetch still in flight becomes stale.
    pub fn begin_root(&mut self, root: RootTypeId) -> PendingFetch {
        tracing::debug!(root = %root, "select root type");
        self.selected_root = Some(root);
        self.levels.clear();
        self.next_ticket(root, Vec::new())
    }

    /// Records a pick at `level_index` and truncates everything below it.
    /// Returns the fetch for the next level, or `None` when nothing needs
    /// fetching (unset value, unknown level, or a pick below an unpicked
    /// level).
    pub fn begin_select(
        &mut self,
        level_index: usize,
        value_id: ValueId,
        label: &str,
    ) -> Option<PendingFetch> {
        let root = self.selected_root?;
        if level_index >= self.levels.len() {
            tracing::debug!(level_index, "select on missing level ignored");
            return None;
        }
        if self.levels[..level_index].iter().any(|l| !l.is_selected()) {
            tracing::debug!(level_index, "select below an unselected level ignored");
            return None;
        }

        self.levels.truncate(level_index + 1);
        if value_id.is_unset() {
            self.levels[level_index].clear_selection();
            self.generation += 1;
            self.terminal = false;
            self.phase = Phase::Ready;
            return None;
        }

        self.levels[level_index].select(value_id, label);
        let context = selected_prefix(&self.levels);
        tracing::debug!(level_index, value = %value_id, "select value");
        Some(self.next_ticket(root, context))
    }

    pub fn is_current(&self, fetch: &PendingFetch) -> bool {
        fetch.generation == self.generation
            && self.selected_root == Some(fetch.root_type)
            && self.levels.len() == fetch.level
            && self.phase == (Phase::Loading { level: fetch.level })
    }

    /// Commits an expansion. Returns `false` (and changes nothing) when the
    /// ticket has been superseded.
    pub fn apply_expansion(&mut self, fetch: &PendingFetch, expansion: Expansion) -> bool {
        if !self.is_current(fetch) {
            tracing::debug!(
                level = fetch.level,
                generation = fetch.generation,
                current = self.generation,
                "discarding stale fitment response"
            );
            return false;
        }

        match expansion {
            Expansion::Next {
                fitment_type,
                values,
            } => {
                self.levels.push(DropdownLevel::new(fitment_type, values));
                self.phase = Phase::Ready;
            }
            Expansion::Terminal => {
                self.terminal = true;
                self.phase = if self.levels.is_empty() {
                    Phase::Empty
                } else {
                    Phase::Ready
                };
            }
            Expansion::Failed { fitment_type } => {
                if let Some(ty) = fitment_type {
                    self.levels.push(DropdownLevel::new(ty, Vec::new()));
                }
                self.phase = Phase::Error { level: fetch.level };
            }
        }
        debug_assert!(is_contiguous(&self.levels));
        true
    }

    pub fn select_root_type<C: FitmentCatalog + ?Sized>(&mut self, catalog: &C, root: RootTypeId) {
        let fetch = self.begin_root(root);
        let expansion = expand(catalog, &fetch);
        self.apply_expansion(&fetch, expansion);
    }

    /// Returns `false` when the pick was rejected (see [`Self::begin_select`]).
    pub fn select_value<C: FitmentCatalog + ?Sized>(
        &mut self,
        catalog: &C,
        level_index: usize,
        value_id: ValueId,
        label: &str,
    ) -> bool {
        let Some(fetch) = self.begin_select(level_index, value_id, label) else {
            return self
                .levels
                .get(level_index)
                .is_some_and(|l| l.selected_id == value_id);
        };
        let expansion = expand(catalog, &fetch);
        self.apply_expansion(&fetch, expansion);
        true
    }

    /// Forgets which pair string was last restored so it can be replayed.
    pub fn reset_initialization(&mut self) {
        self.restored_from = None;
    }

    /// Back to the first root type with nothing selected.
    pub fn clear<C: FitmentCatalog + ?Sized>(&mut self, catalog: &C) {
        self.reset_initialization();
        match self.root_types.first().map(|r| r.id) {
            Some(root) => self.select_root_type(catalog, root),
            None => {
                self.generation += 1;
                self.selected_root = None;
                self.levels.clear();
                self.terminal = false;
                self.phase = Phase::Empty;
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod tests;
