//! Command-line interface for cmdcomplete
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and argument overrides
//! - Dispatching `complete`, `explain` and `check`
//! - Rendering results as text or JSON

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::completion::{Candidate, CandidateSource, Completion, CompletionEngine, Explanation};
use crate::config::{Config, LogLevel};
use crate::error::Result;
use crate::grammar::Grammar;

/// Grammar-driven command-line completion
#[derive(Parser, Debug)]
#[command(
    name = "cmdcomplete",
    version,
    about = "Resolve command-line completions against a declarative grammar",
    long_about = "Loads a Fig-style command description (JSON or TOML) and prints the
candidates legal at the cursor position of a partially typed command line."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Verbose mode (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands for cmdcomplete
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the candidates for a command line
    Complete {
        /// Grammar description file (.json or .toml)
        #[arg(short = 'g', long, value_name = "FILE")]
        grammar: PathBuf,

        /// Cursor byte offset (defaults to the end of the buffer)
        #[arg(long, value_name = "N")]
        cursor: Option<usize>,

        /// Command line being typed
        #[arg(value_name = "BUFFER", allow_hyphen_values = true)]
        buffer: String,
    },

    /// Print tokens and walker state for a command line
    Explain {
        /// Grammar description file (.json or .toml)
        #[arg(short = 'g', long, value_name = "FILE")]
        grammar: PathBuf,

        /// Cursor byte offset (defaults to the end of the buffer)
        #[arg(long, value_name = "N")]
        cursor: Option<usize>,

        /// Command line being typed
        #[arg(value_name = "BUFFER", allow_hyphen_values = true)]
        buffer: String,
    },

    /// Validate a grammar file
    Check {
        /// Grammar description file (.json or .toml)
        #[arg(short = 'g', long, value_name = "FILE")]
        grammar: PathBuf,
    },
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Parse process arguments and load configuration
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;

        // An invalid file falls back to defaults rather than aborting completion
        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {}", e);
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        Self::apply_args_to_config(&mut config, args);
        Ok(config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Apply CLI arguments to configuration
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else {
            config.logging.level
        };
    }

    /// Run the selected subcommand and return what should be printed
    pub fn execute(&self) -> Result<String> {
        match &self.args.command {
            Commands::Complete {
                grammar,
                cursor,
                buffer,
            } => {
                let engine = self.engine(grammar)?;
                let completion = engine.complete(buffer, cursor.unwrap_or(buffer.len()));
                if self.args.json {
                    Ok(serde_json::to_string(&completion)?)
                } else {
                    Ok(render_completion(&completion))
                }
            }
            Commands::Explain {
                grammar,
                cursor,
                buffer,
            } => {
                let engine = self.engine(grammar)?;
                let explanation = engine.explain(buffer, cursor.unwrap_or(buffer.len()));
                if self.args.json {
                    Ok(serde_json::to_string_pretty(&explanation)?)
                } else {
                    Ok(render_explanation(&explanation))
                }
            }
            Commands::Check { grammar } => {
                let loaded = Grammar::from_path(grammar)?;
                let summary = format!(
                    "{}: ok ({} nodes)",
                    grammar.display(),
                    loaded.root().node_count()
                );
                info!("{}", summary);
                Ok(summary)
            }
        }
    }

    fn engine(&self, path: &Path) -> Result<CompletionEngine> {
        let grammar = Grammar::from_path(path)?;
        if self.config.engine.generic_options.is_empty() {
            warn!("no generic options configured, degraded lines will have no candidates");
        }
        Ok(CompletionEngine::with_config(
            Arc::new(grammar),
            self.config.engine.clone(),
        ))
    }
}

/// Short label for a candidate's origin
pub fn source_label(source: &CandidateSource) -> String {
    match source {
        CandidateSource::Subcommand => "subcommand".to_string(),
        CandidateSource::Option => "option".to_string(),
        CandidateSource::Suggestion => "suggestion".to_string(),
        CandidateSource::Template(template) => format!("template:{}", template.as_str()),
    }
}

fn render_candidate(candidate: &Candidate) -> String {
    let mut line = format!("{}\t{}", candidate.display, source_label(&candidate.source));
    if let Some(description) = &candidate.description {
        line.push('\t');
        line.push_str(description);
    }
    line
}

/// One `display<TAB>source[<TAB>description]` line per candidate
pub fn render_completion(completion: &Completion) -> String {
    completion
        .candidates
        .iter()
        .map(render_candidate)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_explanation(explanation: &Explanation) -> String {
    let mut lines = vec!["tokens:".to_string()];
    for (index, token) in explanation.tokens.iter().enumerate() {
        let marker = if index == explanation.active_index { '>' } else { ' ' };
        lines.push(format!(
            "{marker} {index:>2} {:?} {}..{}",
            token.text, token.span.start, token.span.end
        ));
    }
    lines.push(format!("prefix: {:?}", explanation.prefix));
    lines.push("steps:".to_string());
    for (word, step) in &explanation.steps {
        lines.push(format!("  {word:?} -> {step:?}"));
    }
    lines.push(format!("path: {}", explanation.path.join(" ")));
    lines.push(format!("degraded: {}", explanation.degraded));
    lines.push(format!("start: {}", explanation.completion.start));
    lines.push("candidates:".to_string());
    for candidate in &explanation.completion.candidates {
        lines.push(format!("  {}", render_candidate(candidate)));
    }
    lines.join("\n")
}
