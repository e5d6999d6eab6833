//! Serde mirror of the grammar description document.
//!
//! Field names follow the Fig completion-spec convention (`isVariadic`,
//! `exclusiveOn`, ...) so existing specs can be converted to JSON and loaded
//! directly. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

use super::Template;

/// A value that may be written either as a single item or as a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    // Tried first: a derived struct would otherwise accept a JSON array.
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

/// One command or subcommand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescription {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub hidden: bool,

    #[serde(default)]
    pub subcommands: Vec<NodeDescription>,

    #[serde(default)]
    pub options: Vec<OptionDescription>,

    #[serde(default)]
    pub args: Option<OneOrMany<ArgumentDescription>>,
}

/// A flag with one or more spellings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionDescription {
    pub name: OneOrMany<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub is_repeatable: bool,

    #[serde(default)]
    pub exclusive_on: Vec<String>,

    #[serde(default)]
    pub hidden: bool,

    #[serde(default)]
    pub args: Option<OneOrMany<ArgumentDescription>>,
}

/// A positional slot or an option's value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentDescription {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub is_variadic: bool,

    #[serde(default)]
    pub is_optional: bool,

    #[serde(default)]
    pub template: Option<OneOrMany<Template>>,

    #[serde(default)]
    pub suggestions: Vec<SuggestionDescription>,

    #[serde(default)]
    pub options_can_break_variadic_arg: bool,
}

/// A static suggestion, either bare or with a description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SuggestionDescription {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        description: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_name_string_or_list() {
        let one: OptionDescription = serde_json::from_str(r#"{"name": "--merge"}"#).unwrap();
        assert_eq!(one.name.into_vec(), vec!["--merge".to_string()]);

        let many: OptionDescription =
            serde_json::from_str(r#"{"name": ["-i", "--interactive"]}"#).unwrap();
        assert_eq!(many.name.into_vec(), vec!["-i", "--interactive"]);
    }

    #[test]
    fn test_argument_defaults() {
        let arg: ArgumentDescription = serde_json::from_str(r#"{"name": "path"}"#).unwrap();
        assert!(!arg.is_variadic);
        assert!(!arg.is_optional);
        assert!(!arg.options_can_break_variadic_arg);
        assert!(arg.template.is_none());
        assert!(arg.suggestions.is_empty());
    }

    #[test]
    fn test_mixed_suggestions() {
        let arg: ArgumentDescription = serde_json::from_str(
            r#"{"suggestions": ["z", {"name": "autojump", "description": "autojump db"}]}"#,
        )
        .unwrap();
        assert_eq!(arg.suggestions.len(), 2);
        assert_eq!(arg.suggestions[0], SuggestionDescription::Name("z".to_string()));
        assert!(matches!(
            &arg.suggestions[1],
            SuggestionDescription::Detailed { name, description: Some(_) } if name == "autojump"
        ));
    }

    #[test]
    fn test_template_list() {
        let arg: ArgumentDescription =
            serde_json::from_str(r#"{"template": ["filepaths", "folders"]}"#).unwrap();
        assert_eq!(
            arg.template.map(OneOrMany::into_vec),
            Some(vec![Template::Filepaths, Template::Folders])
        );
    }

    #[test]
    fn test_unknown_template_rejected() {
        let parsed: Result<ArgumentDescription, _> =
            serde_json::from_str(r#"{"template": "network"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_node_from_toml() {
        let node: NodeDescription = toml::from_str(
            r#"
name = "tool"

[[options]]
name = ["-v", "--verbose"]
isRepeatable = true

[[subcommands]]
name = "run"
hidden = true

[subcommands.args]
name = "script"
template = "filepaths"
"#,
        )
        .unwrap();

        assert_eq!(node.name, "tool");
        assert!(node.options[0].is_repeatable);
        assert!(node.subcommands[0].hidden);
        assert!(matches!(node.subcommands[0].args, Some(OneOrMany::One(_))));
    }
}
