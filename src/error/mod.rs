//! Error handling module for cmdcomplete.
//!
//! Only grammar loading and configuration can fail. Completion requests never
//! return errors: unknown input degrades the candidate list instead.
//!
//! # Example
//!
//! ```rust
//! use cmdcomplete::error::{GrammarError, MalformedGrammar};
//! use cmdcomplete::grammar::Grammar;
//!
//! let doc = r#"{"name": "tool", "options": [{"name": ["-a"]}, {"name": ["-a"]}]}"#;
//! match Grammar::from_json_str(doc) {
//!     Err(GrammarError::Malformed(MalformedGrammar::DuplicateAlias { alias, .. })) => {
//!         assert_eq!(alias, "-a");
//!     }
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{CmdcompleteError, ConfigError, GrammarError, MalformedGrammar, Result};
