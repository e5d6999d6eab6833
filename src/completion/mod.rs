//! Completion system for cmdcomplete
//!
//! Resolves the candidates legal at the cursor of a partially typed command
//! line against a [`Grammar`](crate::grammar::Grammar). The system is
//! error-tolerant: input the grammar does not describe narrows the result
//! instead of failing the request.
//!
//! # Architecture
//!
//! The completion system consists of several components:
//!
//! - **TokenStream**: Shell-style word splitting with cursor awareness
//! - **Walker**: Replays the completed words against the grammar tree
//! - **Context**: Where the cursor ended up and what was already used there
//! - **Tracker**: Option repetition and mutual-exclusion bookkeeping
//! - **Generator**: Turns a context and prefix into ordered candidates
//! - **Engine**: Orchestrates the entire completion flow
//!
//! # Examples
//!
//! ```
//! use cmdcomplete::completion::CompletionEngine;
//! use cmdcomplete::grammar::Grammar;
//! use std::sync::Arc;
//!
//! let grammar = Grammar::from_json_str(
//!     r#"{"name": "zoxide", "subcommands": [{"name": "query"}, {"name": "init"}]}"#,
//! )
//! .unwrap();
//! let engine = CompletionEngine::new(Arc::new(grammar));
//!
//! // Complete "zoxide qu" with cursor at the end
//! let completion = engine.complete("zoxide qu", 9);
//! assert_eq!(completion.start, 7);
//! assert_eq!(completion.candidates[0].display, "query");
//! ```

mod context;
mod engine;
mod generator;
mod token_stream;
mod tracker;
mod walker;


pub use context::{PositionalState, ResolvedContext};
pub use engine::{Completion, CompletionEngine, Explanation};
pub use generator::{Candidate, CandidateGenerator, CandidateSource};
pub use token_stream::{Token, TokenStream};
pub use tracker::ConstraintTracker;
pub use walker::{GrammarWalker, Step};
