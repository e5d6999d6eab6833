//! Grammar model
//!
//! In-memory representation of a command's invocation grammar: a tree of
//! [`GrammarNode`]s carrying options, an optional trailing positional slot and
//! nested subcommands. A [`Grammar`] is built once from a description
//! document and never mutated afterwards, so it can be shared read-only
//! between any number of completion requests.
//!
//! # Examples
//!
//! ```
//! use cmdcomplete::grammar::Grammar;
//!
//! let grammar = Grammar::from_json_str(
//!     r#"{
//!         "name": "zoxide",
//!         "subcommands": [{"name": "query", "options": [{"name": ["-l", "--list"]}]}]
//!     }"#,
//! )
//! .unwrap();
//!
//! let query = grammar.root().resolve_subcommand("query").unwrap();
//! assert!(query.resolve_option("--list").is_some());
//! assert!(query.resolve_option("--lis").is_none());
//! ```

pub mod description;
mod loader;

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GrammarError, MalformedGrammar};

pub use description::NodeDescription;

/// Identity of an option inside its owning node (declaration index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct OptionId(pub usize);

/// External value sources resolved by the shell-integration host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    /// Files and folders.
    Filepaths,
    /// Folders only.
    Folders,
    /// Entries from the shell history.
    History,
    /// Subcommand names of the command, for `help <command>` style slots.
    Help,
}

impl Template {
    pub fn as_str(&self) -> &'static str {
        match self {
            Template::Filepaths => "filepaths",
            Template::Folders => "folders",
            Template::History => "history",
            Template::Help => "help",
        }
    }
}

/// A static value suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub name: String,
    pub description: Option<String>,
}

/// Where an argument's candidate values come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Literal values known up front.
    Suggestions(Vec<Suggestion>),
    /// Values the host has to produce (filesystem entries, history, ...).
    Templates(Vec<Template>),
    /// Free-form input, nothing to suggest.
    None,
}

impl ValueSource {
    pub fn is_none(&self) -> bool {
        matches!(self, ValueSource::None)
    }
}

/// A positional slot, or the value taken by an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSpec {
    name: String,
    description: Option<String>,
    variadic: bool,
    optional: bool,
    value_source: ValueSource,
    options_can_break_variadic: bool,
}

impl ArgumentSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Absorbs this and every following token once it starts.
    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn value_source(&self) -> &ValueSource {
        &self.value_source
    }

    /// Whether options are still recognized after the variadic slot started.
    pub fn options_can_break_variadic(&self) -> bool {
        self.options_can_break_variadic
    }
}

/// A flag with one or more aliases consuming a single grammar slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    aliases: Vec<String>,
    description: Option<String>,
    takes_argument: Option<ArgumentSpec>,
    repeatable: bool,
    exclusive_with: BTreeSet<OptionId>,
    hidden: bool,
}

impl OptionSpec {
    /// All spellings, in declaration order. Never empty.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// The first declared alias, used when an option has to be named in logs.
    pub fn primary_alias(&self) -> &str {
        self.aliases.first().map(String::as_str).unwrap_or_default()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn takes_argument(&self) -> Option<&ArgumentSpec> {
        self.takes_argument.as_ref()
    }

    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    /// Options of the same node that may not fire once this one has.
    ///
    /// The relation is symmetric: if `a` lists `b`, `b` lists `a`.
    pub fn exclusive_with(&self) -> &BTreeSet<OptionId> {
        &self.exclusive_with
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

/// Whether a node has children or is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Has subcommands, in declaration order.
    Branch(Vec<GrammarNode>),
    /// Terminal command.
    Leaf,
}

/// One command or subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarNode {
    name: String,
    description: Option<String>,
    hidden: bool,
    kind: NodeKind,
    options: Vec<OptionSpec>,
    alias_index: HashMap<String, OptionId>,
    positional: Option<ArgumentSpec>,
}

impl GrammarNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Hidden nodes are accepted when typed but never listed.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn subcommands(&self) -> &[GrammarNode] {
        match &self.kind {
            NodeKind::Branch(children) => children,
            NodeKind::Leaf => &[],
        }
    }

    pub fn positional(&self) -> Option<&ArgumentSpec> {
        self.positional.as_ref()
    }

    /// Options with their identities, in declaration order.
    pub fn options(&self) -> impl Iterator<Item = (OptionId, &OptionSpec)> {
        self.options
            .iter()
            .enumerate()
            .map(|(index, option)| (OptionId(index), option))
    }

    pub fn option(&self, id: OptionId) -> Option<&OptionSpec> {
        self.options.get(id.0)
    }

    /// Exact, case-sensitive lookup of a child by name.
    pub fn resolve_subcommand(&self, name: &str) -> Option<&GrammarNode> {
        self.subcommands().iter().find(|child| child.name == name)
    }

    /// Exact, case-sensitive lookup of an option by any of its aliases.
    pub fn resolve_option(&self, token: &str) -> Option<(OptionId, &OptionSpec)> {
        let id = *self.alias_index.get(token)?;
        self.option(id).map(|option| (id, option))
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self
            .subcommands()
            .iter()
            .map(GrammarNode::node_count)
            .sum::<usize>()
    }
}

/// A loaded, validated grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    root: GrammarNode,
}

impl Grammar {
    /// Validate a description document and build the grammar tree.
    pub fn load(description: NodeDescription) -> Result<Self, MalformedGrammar> {
        let root = loader::build_node(description, "")?;
        debug!(
            root = %root.name,
            nodes = root.node_count(),
            "grammar loaded"
        );
        Ok(Self { root })
    }

    pub fn from_json_str(input: &str) -> Result<Self, GrammarError> {
        let description: NodeDescription =
            serde_json::from_str(input).map_err(|e| GrammarError::Parse {
                format: "JSON",
                message: e.to_string(),
            })?;
        Ok(Self::load(description)?)
    }

    pub fn from_toml_str(input: &str) -> Result<Self, GrammarError> {
        let description: NodeDescription =
            toml::from_str(input).map_err(|e| GrammarError::Parse {
                format: "TOML",
                message: e.to_string(),
            })?;
        Ok(Self::load(description)?)
    }

    /// Load a grammar file. `.toml` files are read as TOML, anything else as JSON.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, GrammarError> {
        let path = path.as_ref();
        let input = fs::read_to_string(path).map_err(|source| GrammarError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            Self::from_toml_str(&input)
        } else {
            Self::from_json_str(&input)
        }
    }

    pub fn root(&self) -> &GrammarNode {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZOXIDE: &str = include_str!("../../grammars/zoxide.json");

    fn zoxide() -> Grammar {
        Grammar::from_json_str(ZOXIDE).unwrap()
    }

    #[test]
    fn test_load_bundled_grammar() {
        let grammar = zoxide();
        let root = grammar.root();

        assert_eq!(root.name(), "zoxide");
        assert!(matches!(root.kind(), NodeKind::Branch(_)));
        let names: Vec<&str> = root.subcommands().iter().map(GrammarNode::name).collect();
        assert_eq!(names, ["add", "edit", "import", "init", "query", "remove"]);
    }

    #[test]
    fn test_leaf_node() {
        let grammar = zoxide();
        let add = grammar.root().resolve_subcommand("add").unwrap();

        assert_eq!(add.kind(), &NodeKind::Leaf);
        assert!(add.subcommands().is_empty());

        let paths = add.positional().unwrap();
        assert_eq!(paths.name(), "paths");
        assert!(paths.is_variadic());
        assert_eq!(
            paths.value_source(),
            &ValueSource::Templates(vec![Template::Folders])
        );
    }

    #[test]
    fn test_resolve_subcommand_exact_only() {
        let grammar = zoxide();
        let root = grammar.root();

        assert!(root.resolve_subcommand("query").is_some());
        assert!(root.resolve_subcommand("que").is_none());
        assert!(root.resolve_subcommand("Query").is_none());
    }

    #[test]
    fn test_hidden_subcommand_still_resolves() {
        let grammar = zoxide();
        let edit = grammar.root().resolve_subcommand("edit").unwrap();
        let reload = edit.resolve_subcommand("reload").unwrap();

        assert!(reload.is_hidden());
        assert!(reload.positional().is_none());
    }

    #[test]
    fn test_resolve_option_by_any_alias() {
        let grammar = zoxide();
        let query = grammar.root().resolve_subcommand("query").unwrap();

        let (short_id, _) = query.resolve_option("-i").unwrap();
        let (long_id, option) = query.resolve_option("--interactive").unwrap();
        assert_eq!(short_id, long_id);
        assert_eq!(option.primary_alias(), "-i");
        assert!(query.resolve_option("--INTERACTIVE").is_none());
    }

    #[test]
    fn test_exclusivity_is_symmetric() {
        let grammar = zoxide();
        let query = grammar.root().resolve_subcommand("query").unwrap();

        let (interactive, interactive_spec) = query.resolve_option("-i").unwrap();
        let (list, list_spec) = query.resolve_option("--list").unwrap();
        assert!(interactive_spec.exclusive_with().contains(&list));
        assert!(list_spec.exclusive_with().contains(&interactive));
    }

    #[test]
    fn test_option_argument() {
        let grammar = zoxide();
        let import = grammar.root().resolve_subcommand("import").unwrap();
        let (_, from) = import.resolve_option("--from").unwrap();

        assert!(from.is_repeatable());
        let arg = from.takes_argument().unwrap();
        match arg.value_source() {
            ValueSource::Suggestions(values) => {
                let names: Vec<&str> = values.iter().map(|s| s.name.as_str()).collect();
                assert_eq!(names, ["autojump", "z"]);
            }
            other => panic!("unexpected value source {other:?}"),
        }
    }

    #[test]
    fn test_node_count() {
        // root + 6 subcommands + 4 hidden edit children
        assert_eq!(zoxide().root().node_count(), 11);
    }

    #[test]
    fn test_from_toml_str() {
        let grammar = Grammar::from_toml_str(
            r#"
name = "tool"

[[options]]
name = "--color"

[options.args]
suggestions = ["always", "never"]
"#,
        )
        .unwrap();

        let (_, color) = grammar.root().resolve_option("--color").unwrap();
        assert!(color.takes_argument().is_some());
    }

    #[test]
    fn test_parse_error_reports_format() {
        let err = Grammar::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, GrammarError::Parse { format: "JSON", .. }));

        let err = Grammar::from_toml_str("name = ").unwrap_err();
        assert!(matches!(err, GrammarError::Parse { format: "TOML", .. }));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = Grammar::from_path("/nonexistent/grammar.json").unwrap_err();
        assert!(matches!(err, GrammarError::Io { .. }));
    }

    #[test]
    fn test_from_path_bundled() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/grammars/zoxide.json");
        assert_eq!(Grammar::from_path(path).unwrap(), zoxide());
    }
}
