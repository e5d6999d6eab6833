//! Grammar walker
//!
//! Consumes the completed words of a command line left to right against the
//! grammar and produces the [`ResolvedContext`] the cursor ends up in. The
//! walker is:
//! - Deterministic (same grammar and words, same context)
//! - Error-tolerant (unknown words degrade the context instead of failing)
//! - Fast (one pass, no backtracking)
//!
//! Per word the priority is: subcommand, then option, then `--`, then the
//! positional slot.

use serde::Serialize;
use tracing::{debug, trace};

use super::context::{PositionalState, ResolvedContext};
use crate::grammar::{GrammarNode, OptionId, OptionSpec};

/// What the walker did with one word
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Descended into a subcommand
    Subcommand { name: String },
    /// Fired an option; `awaits_value` when its value is the next word
    Option { alias: String, awaits_value: bool },
    /// Consumed as the value of the preceding option
    OptionValue { alias: String },
    /// Option and value given in one `--name=value` word
    InlineOptionValue { alias: String },
    /// `--` ended option parsing
    EndOfOptions,
    /// Consumed into the positional slot
    Positional,
    /// Did not match anything; the context is degraded from here on
    Unrecognized,
    /// Skipped because the context was already degraded
    Ignored,
}

/// Walks words against a grammar root
#[derive(Debug, Clone, Copy)]
pub struct GrammarWalker<'g> {
    root: &'g GrammarNode,
}

impl<'g> GrammarWalker<'g> {
    pub fn new(root: &'g GrammarNode) -> Self {
        Self { root }
    }

    /// Run the walker over completed words (the command word excluded)
    pub fn walk<S: AsRef<str>>(&self, words: &[S]) -> ResolvedContext<'g> {
        let mut ctx = ResolvedContext::new(self.root);
        for word in words {
            self.step(&mut ctx, word.as_ref());
        }
        ctx
    }

    /// Consume a single word
    pub fn step(&self, ctx: &mut ResolvedContext<'g>, word: &str) -> Step {
        if ctx.is_degraded() {
            return Step::Ignored;
        }

        let node = ctx.node();

        // A pending option takes this word as its value unless it is an option itself
        if let Some(id) = ctx.take_pending() {
            if !Self::is_recognized_option(ctx, word) {
                let alias = node.option(id).map(OptionSpec::primary_alias).unwrap_or_default();
                trace!(alias, value = word, "option value");
                return Step::OptionValue {
                    alias: alias.to_string(),
                };
            }
        }

        if ctx.is_absorbing() {
            ctx.push_positional();
            return Step::Positional;
        }

        if let Some(child) = Self::subcommand_candidate(ctx, word) {
            debug!(subcommand = child.name(), "descending");
            ctx.descend(child);
            return Step::Subcommand {
                name: child.name().to_string(),
            };
        }

        if !ctx.options_terminated() {
            if let Some((id, option)) = node.resolve_option(word) {
                ctx.fire(id, option);
                let awaits_value = option.takes_argument().is_some();
                if awaits_value {
                    ctx.await_argument(id);
                }
                return Step::Option {
                    alias: word.to_string(),
                    awaits_value,
                };
            }

            if let Some((id, option, _)) = Self::split_inline_value(node, word) {
                ctx.fire(id, option);
                return Step::InlineOptionValue {
                    alias: option.primary_alias().to_string(),
                };
            }

            if word == "--" {
                ctx.terminate_options();
                return Step::EndOfOptions;
            }
        }

        if ctx.open_slot().is_some() {
            ctx.push_positional();
            return Step::Positional;
        }

        debug!(word, node = node.name(), "unrecognized word, context degraded");
        ctx.mark_degraded();
        Step::Unrecognized
    }

    /// Subcommands are only matched before the positional slot received anything
    fn subcommand_candidate(ctx: &ResolvedContext<'g>, word: &str) -> Option<&'g GrammarNode> {
        if ctx.options_terminated() || ctx.positional() != PositionalState::Unfilled {
            return None;
        }
        ctx.node().resolve_subcommand(word)
    }

    fn is_recognized_option(ctx: &ResolvedContext<'g>, word: &str) -> bool {
        let node = ctx.node();
        !ctx.options_terminated()
            && (node.resolve_option(word).is_some()
                || Self::split_inline_value(node, word).is_some())
    }

    /// Split `--name=value` when `--name` is an option taking a value
    pub(super) fn split_inline_value<'w>(
        node: &'g GrammarNode,
        word: &'w str,
    ) -> Option<(OptionId, &'g OptionSpec, &'w str)> {
        if !word.starts_with("--") {
            return None;
        }
        let (name, value) = word.split_once('=')?;
        let (id, option) = node.resolve_option(name)?;
        option.takes_argument()?;
        Some((id, option, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;

    const ZOXIDE: &str = include_str!("../../grammars/zoxide.json");

    fn zoxide() -> Grammar {
        Grammar::from_json_str(ZOXIDE).unwrap()
    }

    fn steps(grammar: &Grammar, words: &[&str]) -> Vec<Step> {
        let walker = GrammarWalker::new(grammar.root());
        let mut ctx = ResolvedContext::new(grammar.root());
        words.iter().map(|w| walker.step(&mut ctx, w)).collect()
    }

    #[test]
    fn test_empty_walk_stays_at_root() {
        let grammar = zoxide();
        let ctx = GrammarWalker::new(grammar.root()).walk::<&str>(&[]);
        assert_eq!(ctx.path(), ["zoxide"]);
        assert!(!ctx.is_degraded());
    }

    #[test]
    fn test_descends_into_subcommand() {
        let grammar = zoxide();
        let ctx = GrammarWalker::new(grammar.root()).walk(&["query"]);
        assert_eq!(ctx.node().name(), "query");
        assert_eq!(ctx.path(), ["zoxide", "query"]);
    }

    #[test]
    fn test_hidden_subcommand_accepted() {
        let grammar = zoxide();
        let ctx = GrammarWalker::new(grammar.root()).walk(&["edit", "reload"]);
        assert_eq!(ctx.path(), ["zoxide", "edit", "reload"]);
        assert!(!ctx.is_degraded());
    }

    #[test]
    fn test_option_counts_per_alias_identity() {
        let grammar = zoxide();
        let ctx = GrammarWalker::new(grammar.root()).walk(&["query", "-s", "--score"]);
        let (id, _) = ctx.node().resolve_option("-s").unwrap();
        assert_eq!(ctx.tracker().count(id), 2);
    }

    #[test]
    fn test_option_value_consumed() {
        let grammar = zoxide();
        assert_eq!(
            steps(&grammar, &["import", "--from", "z", "--merge"]),
            vec![
                Step::Subcommand {
                    name: "import".to_string()
                },
                Step::Option {
                    alias: "--from".to_string(),
                    awaits_value: true
                },
                Step::OptionValue {
                    alias: "--from".to_string()
                },
                Step::Option {
                    alias: "--merge".to_string(),
                    awaits_value: false
                },
            ]
        );
    }

    #[test]
    fn test_option_value_not_taken_from_option() {
        let grammar = zoxide();
        let ctx = GrammarWalker::new(grammar.root()).walk(&["import", "--from", "--merge"]);
        let (merge, _) = ctx.node().resolve_option("--merge").unwrap();
        assert_eq!(ctx.tracker().count(merge), 1);
        assert!(ctx.pending_argument().is_none());
    }

    #[test]
    fn test_value_that_matches_subcommand_name_is_a_value() {
        let grammar = Grammar::from_json_str(
            r#"{"name": "tool",
                "options": [{"name": "--profile", "args": {"name": "name"}}],
                "subcommands": [{"name": "run"}]}"#,
        )
        .unwrap();
        let ctx = GrammarWalker::new(grammar.root()).walk(&["--profile", "run"]);
        assert_eq!(ctx.path(), ["tool"]);
    }

    #[test]
    fn test_pending_value_at_end_of_words() {
        let grammar = zoxide();
        let ctx = GrammarWalker::new(grammar.root()).walk(&["import", "--from"]);
        let (_, option, _) = ctx.pending_argument().unwrap();
        assert_eq!(option.primary_alias(), "--from");
    }

    #[test]
    fn test_inline_option_value() {
        let grammar = zoxide();
        let ctx = GrammarWalker::new(grammar.root()).walk(&["import", "--from=z", "db.txt"]);
        let (from, _) = ctx.node().resolve_option("--from").unwrap();
        assert_eq!(ctx.tracker().count(from), 1);
        assert_eq!(ctx.positional(), PositionalState::Filled);
        assert!(!ctx.is_degraded());
    }

    #[test]
    fn test_inline_value_on_flag_is_unrecognized() {
        let grammar = zoxide();
        let ctx = GrammarWalker::new(grammar.root()).walk(&["import", "--merge=yes"]);
        // import's path slot takes the word instead
        assert_eq!(ctx.positional(), PositionalState::Filled);

        let ctx = GrammarWalker::new(grammar.root()).walk(&["edit", "--merge=yes"]);
        assert!(ctx.is_degraded());
    }

    #[test]
    fn test_variadic_absorbs_options() {
        let grammar = zoxide();
        let ctx = GrammarWalker::new(grammar.root()).walk(&["add", "foo", "--help", "bar"]);
        assert_eq!(ctx.positional(), PositionalState::Filling(3));
        let (help, _) = ctx.node().resolve_option("--help").unwrap();
        assert_eq!(ctx.tracker().count(help), 0);
    }

    #[test]
    fn test_options_before_variadic_still_fire() {
        let grammar = zoxide();
        let ctx = GrammarWalker::new(grammar.root()).walk(&["query", "-i", "foo"]);
        let (i, _) = ctx.node().resolve_option("-i").unwrap();
        assert_eq!(ctx.tracker().count(i), 1);
        assert_eq!(ctx.positional(), PositionalState::Filling(1));
    }

    #[test]
    fn test_interleaving_when_allowed() {
        let grammar = Grammar::from_json_str(
            r#"{"name": "tool", "options": [{"name": "-v"}],
                "args": {"name": "files", "isVariadic": true, "optionsCanBreakVariadicArg": true}}"#,
        )
        .unwrap();
        let ctx = GrammarWalker::new(grammar.root()).walk(&["a", "-v", "b"]);
        let (v, _) = ctx.node().resolve_option("-v").unwrap();
        assert_eq!(ctx.tracker().count(v), 1);
        assert_eq!(ctx.positional(), PositionalState::Filling(2));
    }

    #[test]
    fn test_subcommand_not_matched_after_positional() {
        let grammar = Grammar::from_json_str(
            r#"{"name": "tool", "args": {"name": "target"},
                "subcommands": [{"name": "run"}]}"#,
        )
        .unwrap();
        let ctx = GrammarWalker::new(grammar.root()).walk(&["x", "run"]);
        assert_eq!(ctx.path(), ["tool"]);
        assert!(ctx.is_degraded());
    }

    #[test]
    fn test_subcommand_wins_over_positional() {
        let grammar = Grammar::from_json_str(
            r#"{"name": "tool", "args": {"name": "target"},
                "subcommands": [{"name": "run"}]}"#,
        )
        .unwrap();
        let ctx = GrammarWalker::new(grammar.root()).walk(&["run"]);
        assert_eq!(ctx.path(), ["tool", "run"]);
    }

    #[test]
    fn test_double_dash_ends_options() {
        let grammar = zoxide();
        let ctx = GrammarWalker::new(grammar.root()).walk(&["query", "--", "-i"]);
        assert!(ctx.options_terminated());
        let (i, _) = ctx.node().resolve_option("-i").unwrap();
        assert_eq!(ctx.tracker().count(i), 0);
        assert_eq!(ctx.positional(), PositionalState::Filling(1));
    }

    #[test]
    fn test_unrecognized_word_degrades() {
        let grammar = zoxide();
        assert_eq!(
            steps(&grammar, &["frobnicate", "add"]),
            vec![Step::Unrecognized, Step::Ignored]
        );
    }

    #[test]
    fn test_extra_word_after_filled_slot_degrades() {
        let grammar = zoxide();
        let ctx = GrammarWalker::new(grammar.root()).walk(&["init", "bash", "zsh"]);
        assert!(ctx.is_degraded());
        assert_eq!(ctx.node().name(), "init");
    }

    #[test]
    fn test_walk_is_deterministic() {
        let grammar = zoxide();
        let walker = GrammarWalker::new(grammar.root());
        let words = ["query", "-i", "--exclude", "/tmp", "foo"];
        assert_eq!(walker.walk(&words), walker.walk(&words));
    }
}
