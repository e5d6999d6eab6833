//! Resolved completion context
//!
//! The state the grammar walker leaves behind after consuming every completed
//! word: which node the cursor is in and what has already been used there.

use serde::Serialize;

use super::tracker::ConstraintTracker;
use crate::grammar::{ArgumentSpec, GrammarNode, OptionId, OptionSpec};

/// Progress of the current node's positional slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionalState {
    /// No word consumed into the slot yet
    Unfilled,
    /// Variadic slot that absorbed this many words so far
    Filling(usize),
    /// Single-value slot that received its value
    Filled,
}

/// Where the cursor is in the grammar, and what is still legal there
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedContext<'g> {
    node: &'g GrammarNode,
    path: Vec<&'g str>,
    tracker: ConstraintTracker,
    positional: PositionalState,
    pending: Option<OptionId>,
    options_terminated: bool,
    degraded: bool,
}

impl<'g> ResolvedContext<'g> {
    /// Context positioned at the root, before any word was consumed
    pub fn new(root: &'g GrammarNode) -> Self {
        Self {
            node: root,
            path: vec![root.name()],
            tracker: ConstraintTracker::new(),
            positional: PositionalState::Unfilled,
            pending: None,
            options_terminated: false,
            degraded: false,
        }
    }

    pub fn node(&self) -> &'g GrammarNode {
        self.node
    }

    /// Node names from the root down to the current node
    pub fn path(&self) -> &[&'g str] {
        &self.path
    }

    pub fn tracker(&self) -> &ConstraintTracker {
        &self.tracker
    }

    pub fn positional(&self) -> PositionalState {
        self.positional
    }

    /// True once `--` ended option parsing in this node
    pub fn options_terminated(&self) -> bool {
        self.options_terminated
    }

    /// True when a word could not be matched against the grammar
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// The option whose value is expected next, if any
    pub fn pending_argument(&self) -> Option<(OptionId, &'g OptionSpec, &'g ArgumentSpec)> {
        let id = self.pending?;
        let option = self.node.option(id)?;
        let argument = option.takes_argument()?;
        Some((id, option, argument))
    }

    /// The positional slot, if it can still take words
    pub fn open_slot(&self) -> Option<&'g ArgumentSpec> {
        let slot = self.node.positional()?;
        match self.positional {
            PositionalState::Unfilled => Some(slot),
            PositionalState::Filling(_) if slot.is_variadic() => Some(slot),
            _ => None,
        }
    }

    /// A started variadic slot that swallows every further word
    pub fn is_absorbing(&self) -> bool {
        matches!(self.positional, PositionalState::Filling(_))
            && self
                .node
                .positional()
                .is_some_and(|slot| !slot.options_can_break_variadic())
    }

    /// Option state, positional state and `--` are scoped to the node: descending starts over
    pub(super) fn descend(&mut self, child: &'g GrammarNode) {
        self.node = child;
        self.path.push(child.name());
        self.tracker = ConstraintTracker::new();
        self.positional = PositionalState::Unfilled;
        self.pending = None;
        self.options_terminated = false;
    }

    pub(super) fn fire(&mut self, id: OptionId, option: &OptionSpec) {
        self.tracker.record_firing(id, option);
    }

    pub(super) fn await_argument(&mut self, id: OptionId) {
        self.pending = Some(id);
    }

    pub(super) fn take_pending(&mut self) -> Option<OptionId> {
        self.pending.take()
    }

    pub(super) fn terminate_options(&mut self) {
        self.options_terminated = true;
    }

    pub(super) fn push_positional(&mut self) {
        let variadic = self.node.positional().is_some_and(ArgumentSpec::is_variadic);
        self.positional = match (self.positional, variadic) {
            (PositionalState::Filling(count), _) => PositionalState::Filling(count + 1),
            (PositionalState::Unfilled, true) => PositionalState::Filling(1),
            _ => PositionalState::Filled,
        };
    }

    pub(super) fn mark_degraded(&mut self) {
        self.degraded = true;
        self.pending = None;
    }
}
