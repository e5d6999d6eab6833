//! cmdcomplete Library
//!
//! Grammar-driven completion for command-line programs. A command's
//! invocation grammar (subcommands, options, positional arguments) is loaded
//! once from a declarative description; each request then resolves the
//! candidates legal at the cursor of a partially typed command line.
//!
//! # Modules
//!
//! - `cli`: Command-line interface of the reference binary
//! - `completion`: Tokenizer, grammar walker and candidate generation
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `grammar`: Grammar model and description loader
//!
//! # Example
//!
//! ```
//! use cmdcomplete::{CompletionEngine, Grammar};
//! use std::sync::Arc;
//!
//! let grammar = Grammar::from_json_str(
//!     r#"{"name": "zoxide", "subcommands": [{"name": "query",
//!         "options": [{"name": ["-i", "--interactive"], "exclusiveOn": ["-l"]},
//!                     {"name": ["-l", "--list"], "exclusiveOn": ["-i"]}]}]}"#,
//! )?;
//! let engine = CompletionEngine::new(Arc::new(grammar));
//!
//! let completion = engine.complete("zoxide query -i -", 17);
//! assert!(completion.candidates.iter().all(|c| c.display != "--list"));
//! # Ok::<(), cmdcomplete::error::GrammarError>(())
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod grammar;

// Re-export commonly used types
pub use completion::{Candidate, CandidateSource, Completion, CompletionEngine};
pub use config::Config;
pub use error::{CmdcompleteError, Result};
pub use grammar::{Grammar, Template};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}
