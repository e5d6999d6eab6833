//! Per-context option bookkeeping: occurrence counts and exclusivity bans.

use std::collections::{BTreeMap, BTreeSet};

use crate::grammar::{OptionId, OptionSpec};

/// Tracks which options fired in the current context.
///
/// Markings are only ever added. A fresh tracker is created whenever the
/// walker descends into a subcommand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintTracker {
    counts: BTreeMap<OptionId, usize>,
    forbidden: BTreeSet<OptionId>,
}

impl ConstraintTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `option` and ban its exclusivity partners.
    pub fn record_firing(&mut self, id: OptionId, option: &OptionSpec) {
        *self.counts.entry(id).or_default() += 1;
        self.forbidden.extend(option.exclusive_with().iter().copied());
    }

    /// Whether `option` may still be offered in this context.
    pub fn is_available(&self, id: OptionId, option: &OptionSpec) -> bool {
        if self.forbidden.contains(&id) {
            return false;
        }
        option.is_repeatable() || self.count(id) == 0
    }

    pub fn count(&self, id: OptionId) -> usize {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    pub fn is_forbidden(&self, id: OptionId) -> bool {
        self.forbidden.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;

    fn grammar() -> Grammar {
        Grammar::from_json_str(
            r#"{"name": "tool", "options": [
                {"name": ["-i", "--interactive"], "exclusiveOn": ["-l"]},
                {"name": ["-l", "--list"]},
                {"name": "--from", "isRepeatable": true},
                {"name": "--merge"}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_fresh_tracker_allows_everything() {
        let grammar = grammar();
        let tracker = ConstraintTracker::new();
        assert!(grammar
            .root()
            .options()
            .all(|(id, option)| tracker.is_available(id, option)));
    }

    #[test]
    fn test_non_repeatable_consumed_once() {
        let grammar = grammar();
        let (id, merge) = grammar.root().resolve_option("--merge").unwrap();
        let mut tracker = ConstraintTracker::new();

        tracker.record_firing(id, merge);
        assert_eq!(tracker.count(id), 1);
        assert!(!tracker.is_available(id, merge));
    }

    #[test]
    fn test_repeatable_stays_available() {
        let grammar = grammar();
        let (id, from) = grammar.root().resolve_option("--from").unwrap();
        let mut tracker = ConstraintTracker::new();

        for _ in 0..3 {
            tracker.record_firing(id, from);
        }
        assert_eq!(tracker.count(id), 3);
        assert!(tracker.is_available(id, from));
    }

    #[test]
    fn test_exclusivity_bans_partner_both_ways() {
        let grammar = grammar();
        let root = grammar.root();
        let (i, interactive) = root.resolve_option("-i").unwrap();
        let (l, list) = root.resolve_option("-l").unwrap();

        let mut tracker = ConstraintTracker::new();
        tracker.record_firing(i, interactive);
        assert!(tracker.is_forbidden(l));
        assert!(!tracker.is_available(l, list));

        let mut tracker = ConstraintTracker::new();
        tracker.record_firing(l, list);
        assert!(tracker.is_forbidden(i));
        assert!(!tracker.is_available(i, interactive));
    }
}
