//! Custom rule files
//!
//! A rules file extends the built-in tables without writing Rust. It is a
//! TOML document with two optional tables:
//!
//! ```toml
//! [commands]
//! void = ["mycolor", "hl"]
//! skip = ["mylabel"]
//! skip_two = ["setcounter"]
//! reference = ["citealp"]
//! literal = { etal = "et al." }
//!
//! [environments]
//! transparent = ["mybox"]
//! titled = ["observation"]
//! named = { obs = "Observation" }
//! math = ["dmath"]
//! ordered_list = ["steps"]
//! unordered_list = ["checklist"]
//! ```
//!
//! Unknown keys are rejected so that a typo does not silently disable a rule.

use indexmap::IndexMap;
use serde::Deserialize;
use std::borrow::Cow;
use std::fs;
use std::path::Path;

use super::registry::{CommandKind, EnvironmentKind, HandlerRegistry};
use crate::data::constants::COMMAND_TERMINATORS;
use crate::utils::error::{ConversionResult, GrammafyError};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CustomRules {
    pub commands: CommandRules,
    pub environments: EnvironmentRules,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommandRules {
    /// Dropped, arguments kept
    pub void: Vec<String>,
    /// Dropped with one argument
    pub skip: Vec<String>,
    /// Dropped with two arguments
    pub skip_two: Vec<String>,
    /// Replaced with the placeholder
    pub reference: Vec<String>,
    /// Replaced with fixed text
    pub literal: IndexMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentRules {
    pub transparent: Vec<String>,
    pub titled: Vec<String>,
    /// Environment name to title
    pub named: IndexMap<String, String>,
    pub math: Vec<String>,
    pub ordered_list: Vec<String>,
    pub unordered_list: Vec<String>,
}

impl CustomRules {
    /// Parse and validate a rules document
    pub fn from_toml(text: &str) -> ConversionResult<Self> {
        let rules: CustomRules =
            toml::from_str(text).map_err(|e| GrammafyError::rules(e.to_string()))?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn load(path: impl AsRef<Path>) -> ConversionResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| GrammafyError::rules(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&text)
    }

    fn command_names(&self) -> impl Iterator<Item = &String> {
        let c = &self.commands;
        c.void
            .iter()
            .chain(&c.skip)
            .chain(&c.skip_two)
            .chain(&c.reference)
            .chain(c.literal.keys())
    }

    fn environment_names(&self) -> impl Iterator<Item = &String> {
        let e = &self.environments;
        e.transparent
            .iter()
            .chain(&e.titled)
            .chain(e.named.keys())
            .chain(&e.math)
            .chain(&e.ordered_list)
            .chain(&e.unordered_list)
    }

    /// Every name must be something the scanner can actually produce
    fn validate(&self) -> ConversionResult<()> {
        for name in self.command_names() {
            if name.is_empty() || name.contains(COMMAND_TERMINATORS) {
                return Err(GrammafyError::rules(format!(
                    "'{}' cannot be a command name",
                    name
                )));
            }
        }
        for name in self.environment_names() {
            if name.trim().is_empty() || name.contains('}') {
                return Err(GrammafyError::rules(format!(
                    "'{}' cannot be an environment name",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Number of rules in the file
    pub fn len(&self) -> usize {
        self.command_names().count() + self.environment_names().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register every rule in `registry`
    pub fn apply(&self, registry: &mut HandlerRegistry) {
        let c = &self.commands;
        for name in &c.void {
            registry.register_void_command(name.as_str());
        }
        for name in &c.skip {
            registry.register_command(name.as_str(), CommandKind::SkipGroups(1));
        }
        for name in &c.skip_two {
            registry.register_command(name.as_str(), CommandKind::SkipGroups(2));
        }
        for name in &c.reference {
            registry.register_command(name.as_str(), CommandKind::Reference);
        }
        for (name, text) in &c.literal {
            registry.register_command(
                name.as_str(),
                CommandKind::Literal(Cow::Owned(text.clone())),
            );
        }

        let e = &self.environments;
        for name in &e.transparent {
            registry.register_transparent_environment(name.as_str());
        }
        for name in &e.titled {
            registry.register_environment(name.as_str(), EnvironmentKind::Titled);
        }
        for (name, title) in &e.named {
            registry.register_environment(
                name.as_str(),
                EnvironmentKind::Named(Cow::Owned(title.clone())),
            );
        }
        for name in &e.math {
            registry.register_environment(name.as_str(), EnvironmentKind::Math);
        }
        for name in &e.ordered_list {
            registry.register_environment(name.as_str(), EnvironmentKind::OrderedList);
        }
        for name in &e.unordered_list {
            registry.register_environment(name.as_str(), EnvironmentKind::UnorderedList);
        }

        tracing::debug!(rules = self.len(), "custom rules applied");
    }

    pub fn into_registry(self) -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        self.apply(&mut registry);
        registry
    }
}
