//! Completion engine - orchestrates the completion flow
//!
//! Ties together tokenizing, grammar walking and candidate generation for one
//! `(buffer, cursor)` request.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::context::ResolvedContext;
use super::generator::{Candidate, CandidateGenerator, CandidateSource};
use super::token_stream::{Token, TokenStream};
use super::walker::{GrammarWalker, Step};
use crate::config::EngineConfig;
use crate::grammar::Grammar;

/// Result of one completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    /// Byte offset where the active word starts; candidates replace `start..cursor`
    pub start: usize,
    /// Candidates in presentation order
    pub candidates: Vec<Candidate>,
}

/// Step-by-step account of how a request was resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub tokens: Vec<Token>,
    pub active_index: usize,
    pub prefix: String,
    /// Completed words (command word excluded) with what the walker did to each
    pub steps: Vec<(String, Step)>,
    /// Node names from the root to the resolved node
    pub path: Vec<String>,
    pub degraded: bool,
    pub completion: Completion,
}

/// Main completion engine
///
/// Holds an immutable grammar; clone freely and share between threads.
#[derive(Debug, Clone)]
pub struct CompletionEngine {
    grammar: Arc<Grammar>,
    config: EngineConfig,
}

impl CompletionEngine {
    /// Create a completion engine with the default configuration
    pub fn new(grammar: Arc<Grammar>) -> Self {
        Self::with_config(grammar, EngineConfig::default())
    }

    pub fn with_config(grammar: Arc<Grammar>, config: EngineConfig) -> Self {
        Self { grammar, config }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Complete the input at the given cursor position
    ///
    /// # Arguments
    /// * `line` - The input line
    /// * `pos` - Cursor position (byte index)
    pub fn complete(&self, line: &str, pos: usize) -> Completion {
        // 1. Split into words and locate the cursor
        let stream = TokenStream::tokenize(line, pos);
        let prefix = stream.current_prefix();

        // 2. Walk the completed words and generate candidates
        let mut candidates = if stream.token_index == 0 {
            self.complete_command_word(prefix)
        } else {
            let context = self.resolve(&stream);
            CandidateGenerator::new(&self.config.generic_options).generate(&context, prefix)
        };

        // 3. Optionally drop the candidate that is exactly what was typed
        if self.config.hide_exact_match && !prefix.is_empty() {
            candidates.retain(|c| c.is_template() || c.display != prefix);
        }

        if let Some(max) = self.config.max_candidates {
            candidates.truncate(max);
        }

        debug!(
            words = stream.tokens.len(),
            active = stream.token_index,
            prefix,
            candidates = candidates.len(),
            "completion resolved"
        );

        Completion {
            start: stream.completion_start(),
            candidates,
        }
    }

    /// Walk the words before the cursor, skipping the command word
    pub fn resolve(&self, stream: &TokenStream) -> ResolvedContext<'_> {
        let words: Vec<&str> = stream
            .tokens_before_cursor()
            .iter()
            .skip(1)
            .map(|t| t.text.as_str())
            .collect();
        GrammarWalker::new(self.grammar.root()).walk(&words)
    }

    /// Resolve a request and record every walker step
    pub fn explain(&self, line: &str, pos: usize) -> Explanation {
        let stream = TokenStream::tokenize(line, pos);
        let walker = GrammarWalker::new(self.grammar.root());
        let mut context = ResolvedContext::new(self.grammar.root());

        let steps = stream
            .tokens_before_cursor()
            .iter()
            .skip(1)
            .map(|t| (t.text.clone(), walker.step(&mut context, &t.text)))
            .collect();

        Explanation {
            tokens: stream.tokens.clone(),
            active_index: stream.token_index,
            prefix: stream.current_prefix().to_string(),
            steps,
            path: context.path().iter().map(|name| name.to_string()).collect(),
            degraded: context.is_degraded(),
            completion: self.complete(line, pos),
        }
    }

    /// The command word itself can only complete to the grammar's root name
    fn complete_command_word(&self, prefix: &str) -> Vec<Candidate> {
        let root = self.grammar.root();
        if root.name().starts_with(prefix) {
            vec![Candidate {
                display: root.name().to_string(),
                description: root.description().map(str::to_owned),
                source: CandidateSource::Subcommand,
            }]
        } else {
            Vec::new()
        }
    }
}
