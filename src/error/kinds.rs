use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide `Result` type using [`CmdcompleteError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is used by the
/// binary and the configuration layer. Grammar loading returns the narrower
/// [`GrammarError`] so hosts can keep other grammars alive when one fails.
pub type Result<T> = std::result::Result<T, CmdcompleteError>;

/// Top-level error type for cmdcomplete operations.
#[derive(Debug, Error)]
pub enum CmdcompleteError {
    /// Grammar loading errors.
    #[error("Grammar error: {0}")]
    Grammar(#[from] GrammarError),

    /// Configuration errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization of command output failed.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Errors raised while turning a grammar document into a [`Grammar`].
///
/// [`Grammar`]: crate::grammar::Grammar
#[derive(Debug, Error)]
pub enum GrammarError {
    /// The grammar file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The document is not valid JSON/TOML or does not match the schema.
    #[error("invalid {format} grammar document: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    /// The document parsed but is structurally invalid.
    #[error(transparent)]
    Malformed(#[from] MalformedGrammar),
}

/// Structural defects detected at load time.
///
/// `node` is the slash separated path from the root, e.g. `zoxide/query`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedGrammar {
    /// Two options of the same node share an alias.
    #[error("{node}: alias '{alias}' is declared by more than one option")]
    DuplicateAlias { node: String, alias: String },

    /// An option was declared with an empty alias list.
    #[error("{node}: option #{index} declares no aliases")]
    EmptyAliases { node: String, index: usize },

    /// Two sibling subcommands share a name.
    #[error("{node}: subcommand '{name}' is declared more than once")]
    DuplicateSubcommand { node: String, name: String },

    /// A node or option declares more than one argument slot.
    #[error("{node}: {count} argument slots declared, at most one is allowed")]
    MultiplePositionals { node: String, count: usize },

    /// `exclusiveOn` names an alias that is not declared in the node.
    #[error("{node}: option '{option}' is exclusive with undeclared alias '{alias}'")]
    DanglingExclusion {
        node: String,
        option: String,
        alias: String,
    },

    /// An argument lists static suggestions and templates at the same time.
    #[error("{node}: argument '{argument}' declares both suggestions and templates")]
    ConflictingValueSource { node: String, argument: String },
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Invalid config format.
    #[error("Invalid config format: {0}")]
    InvalidFormat(String),

    /// Invalid field value.
    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidValue { field: String, value: String },
}

impl From<MalformedGrammar> for CmdcompleteError {
    fn from(err: MalformedGrammar) -> Self {
        CmdcompleteError::Grammar(GrammarError::Malformed(err))
    }
}
