//! Description document → validated grammar tree.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::description::{
    ArgumentDescription, NodeDescription, OneOrMany, OptionDescription, SuggestionDescription,
};
use super::{ArgumentSpec, GrammarNode, NodeKind, OptionId, OptionSpec, Suggestion, ValueSource};
use crate::error::MalformedGrammar;

/// Build one node and, recursively, its children.
///
/// `parent` is the slash separated path of the parent node, empty for the root.
pub(super) fn build_node(
    description: NodeDescription,
    parent: &str,
) -> Result<GrammarNode, MalformedGrammar> {
    let path = if parent.is_empty() {
        description.name.clone()
    } else {
        format!("{parent}/{}", description.name)
    };

    let (options, alias_index) = build_options(description.options, &path)?;
    let positional = build_argument(description.args, &path)?;

    let mut seen = HashSet::new();
    let mut children = Vec::with_capacity(description.subcommands.len());
    for child in description.subcommands {
        if !seen.insert(child.name.clone()) {
            return Err(MalformedGrammar::DuplicateSubcommand {
                node: path,
                name: child.name,
            });
        }
        children.push(build_node(child, &path)?);
    }

    let kind = if children.is_empty() {
        NodeKind::Leaf
    } else {
        NodeKind::Branch(children)
    };

    Ok(GrammarNode {
        name: description.name,
        description: description.description,
        hidden: description.hidden,
        kind,
        options,
        alias_index,
        positional,
    })
}

fn build_options(
    descriptions: Vec<OptionDescription>,
    path: &str,
) -> Result<(Vec<OptionSpec>, HashMap<String, OptionId>), MalformedGrammar> {
    let mut alias_index = HashMap::new();
    let mut options = Vec::with_capacity(descriptions.len());
    let mut exclusions = Vec::with_capacity(descriptions.len());

    for (index, description) in descriptions.into_iter().enumerate() {
        let aliases = description.name.into_vec();
        if aliases.is_empty() {
            return Err(MalformedGrammar::EmptyAliases {
                node: path.to_string(),
                index,
            });
        }

        for alias in &aliases {
            if alias_index.insert(alias.clone(), OptionId(index)).is_some() {
                return Err(MalformedGrammar::DuplicateAlias {
                    node: path.to_string(),
                    alias: alias.clone(),
                });
            }
        }

        let owner = format!("{path} {}", aliases[0]);
        let takes_argument = build_argument(description.args, &owner)?;

        exclusions.push(description.exclusive_on);
        options.push(OptionSpec {
            aliases,
            description: description.description,
            takes_argument,
            repeatable: description.is_repeatable,
            exclusive_with: BTreeSet::new(),
            hidden: description.hidden,
        });
    }

    // Second pass: every alias is known now, so references can be checked.
    for (index, targets) in exclusions.into_iter().enumerate() {
        for alias in targets {
            let Some(&partner) = alias_index.get(&alias) else {
                return Err(MalformedGrammar::DanglingExclusion {
                    node: path.to_string(),
                    option: options[index].primary_alias().to_string(),
                    alias,
                });
            };
            if partner.0 == index {
                continue;
            }
            options[index].exclusive_with.insert(partner);
            options[partner.0].exclusive_with.insert(OptionId(index));
        }
    }

    Ok((options, alias_index))
}

fn build_argument(
    args: Option<OneOrMany<ArgumentDescription>>,
    owner: &str,
) -> Result<Option<ArgumentSpec>, MalformedGrammar> {
    let mut args = args.map(OneOrMany::into_vec).unwrap_or_default();
    if args.len() > 1 {
        return Err(MalformedGrammar::MultiplePositionals {
            node: owner.to_string(),
            count: args.len(),
        });
    }
    let Some(arg) = args.pop() else {
        return Ok(None);
    };

    let name = arg.name.unwrap_or_default();
    let templates = arg.template.map(OneOrMany::into_vec).unwrap_or_default();

    let value_source = match (arg.suggestions.is_empty(), templates.is_empty()) {
        (false, false) => {
            return Err(MalformedGrammar::ConflictingValueSource {
                node: owner.to_string(),
                argument: name,
            });
        }
        (false, true) => ValueSource::Suggestions(
            arg.suggestions.into_iter().map(Suggestion::from).collect(),
        ),
        (true, false) => ValueSource::Templates(templates),
        (true, true) => ValueSource::None,
    };

    Ok(Some(ArgumentSpec {
        name,
        description: arg.description,
        variadic: arg.is_variadic,
        optional: arg.is_optional,
        value_source,
        options_can_break_variadic: arg.options_can_break_variadic_arg,
    }))
}

impl From<SuggestionDescription> for Suggestion {
    fn from(description: SuggestionDescription) -> Self {
        match description {
            SuggestionDescription::Name(name) => Suggestion {
                name,
                description: None,
            },
            SuggestionDescription::Detailed { name, description } => {
                Suggestion { name, description }
            }
        }
    }
}
