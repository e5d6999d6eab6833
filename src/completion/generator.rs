//! Candidate generator
//!
//! Turns a [`ResolvedContext`] and the prefix of the active word into the
//! ordered list of legal next words. Filtering is a case-sensitive prefix
//! match and ordering is declaration order (subcommands before options), so
//! the output is stable for a given grammar.

use std::collections::HashSet;

use serde::Serialize;

use super::context::{PositionalState, ResolvedContext};
use super::walker::GrammarWalker;
use crate::grammar::{ArgumentSpec, Template, ValueSource};

/// Candidate suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Text to show and insert
    pub display: String,
    /// Optional description for the candidate
    pub description: Option<String>,
    /// Which grammar element produced the candidate
    pub source: CandidateSource,
}

/// Origin of a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "template", rename_all = "snake_case")]
pub enum CandidateSource {
    Subcommand,
    Option,
    Suggestion,
    /// Marker asking the host to resolve an external source; `display` is the
    /// text typed so far
    Template(Template),
}

impl Candidate {
    fn new(display: impl Into<String>, description: Option<&str>, source: CandidateSource) -> Self {
        Self {
            display: display.into(),
            description: description.map(str::to_owned),
            source,
        }
    }

    pub fn is_template(&self) -> bool {
        matches!(self.source, CandidateSource::Template(_))
    }
}

/// Produces candidates for a resolved context
#[derive(Debug, Clone, Copy)]
pub struct CandidateGenerator<'a> {
    /// Aliases still offered after the context degraded (help/version style flags)
    generic_options: &'a [String],
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(generic_options: &'a [String]) -> Self {
        Self { generic_options }
    }

    /// Candidates for the active word `prefix` in `ctx`
    pub fn generate(&self, ctx: &ResolvedContext<'_>, prefix: &str) -> Vec<Candidate> {
        let mut out = Vec::new();

        if ctx.is_degraded() {
            self.push_generic_options(ctx, prefix, &mut out);
            return dedup(out);
        }

        // The walker lets a recognized option pre-empt a pending value, so both are offered
        if let Some((_, _, argument)) = ctx.pending_argument() {
            push_values(argument, prefix, "", &mut out);
            push_listing(ctx, prefix, &mut out);
            return dedup(out);
        }

        // An absorbing slot takes `--name=value` words literally, so they are not options there
        if !ctx.options_terminated() && !ctx.is_absorbing() {
            if let Some((id, option, value)) = GrammarWalker::split_inline_value(ctx.node(), prefix)
            {
                if let Some(argument) = option.takes_argument() {
                    if ctx.tracker().is_available(id, option) {
                        let lead = &prefix[..prefix.len() - value.len()];
                        push_values(argument, value, lead, &mut out);
                    }
                }
                return dedup(out);
            }
        }

        if let Some(slot) = ctx.open_slot() {
            let wants_options = prefix.starts_with('-') && !ctx.options_terminated();
            if ctx.is_absorbing() || (!slot.value_source().is_none() && !wants_options) {
                push_values(slot, prefix, "", &mut out);
                return dedup(out);
            }
        }

        push_listing(ctx, prefix, &mut out);
        dedup(out)
    }

    fn push_generic_options(
        &self,
        ctx: &ResolvedContext<'_>,
        prefix: &str,
        out: &mut Vec<Candidate>,
    ) {
        let tracker = ctx.tracker();
        for (id, option) in ctx.node().options() {
            let is_generic = option
                .aliases()
                .iter()
                .any(|alias| self.generic_options.contains(alias));
            if !is_generic || !tracker.is_available(id, option) {
                continue;
            }
            for alias in option.aliases() {
                if alias.starts_with(prefix) {
                    out.push(Candidate::new(
                        alias.as_str(),
                        option.description(),
                        CandidateSource::Option,
                    ));
                }
            }
        }
    }
}

/// Subcommands (while the positional slot is untouched) followed by available options
fn push_listing(ctx: &ResolvedContext<'_>, prefix: &str, out: &mut Vec<Candidate>) {
    if ctx.options_terminated() {
        return;
    }
    let node = ctx.node();

    if ctx.positional() == PositionalState::Unfilled {
        for child in node.subcommands() {
            if is_listed(child.name(), child.is_hidden(), prefix) {
                out.push(Candidate::new(
                    child.name(),
                    child.description(),
                    CandidateSource::Subcommand,
                ));
            }
        }
    }

    let tracker = ctx.tracker();
    for (id, option) in node.options() {
        if !tracker.is_available(id, option) {
            continue;
        }
        for alias in option.aliases() {
            if is_listed(alias, option.is_hidden(), prefix) {
                out.push(Candidate::new(
                    alias.as_str(),
                    option.description(),
                    CandidateSource::Option,
                ));
            }
        }
    }
}

/// Hidden entries only show up once typed in full
fn is_listed(name: &str, hidden: bool, prefix: &str) -> bool {
    if hidden {
        name == prefix
    } else {
        name.starts_with(prefix)
    }
}

/// Static suggestions matching `prefix`, or one marker per template.
///
/// `lead` is glued in front of every value, e.g. `--from=` for inline values.
fn push_values(argument: &ArgumentSpec, prefix: &str, lead: &str, out: &mut Vec<Candidate>) {
    match argument.value_source() {
        ValueSource::Suggestions(suggestions) => {
            for suggestion in suggestions {
                if suggestion.name.starts_with(prefix) {
                    out.push(Candidate::new(
                        format!("{lead}{}", suggestion.name),
                        suggestion.description.as_deref(),
                        CandidateSource::Suggestion,
                    ));
                }
            }
        }
        ValueSource::Templates(templates) => {
            let name = Some(argument.name()).filter(|name| !name.is_empty());
            for &template in templates {
                out.push(Candidate::new(
                    format!("{lead}{prefix}"),
                    argument.description().or(name),
                    CandidateSource::Template(template),
                ));
            }
        }
        ValueSource::None => {}
    }
}

/// Keep the first candidate per display text; template markers dedup per template
fn dedup(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen_text = HashSet::new();
    let mut seen_templates = HashSet::new();
    candidates
        .into_iter()
        .filter(|candidate| match candidate.source {
            CandidateSource::Template(template) => seen_templates.insert(template),
            _ => seen_text.insert(candidate.display.clone()),
        })
        .collect()
}
