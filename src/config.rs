// Copyright 2023 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Configuration of the translation workflow.
//!
//! The configuration is read from an optional `i18n.toml` file. Every
//! field has a default, so an empty file (or no file at all) gives
//! the standard setup: French source texts, English reference texts
//! and the built-in Wakfu categories.

use crate::category::Language;
use crate::rules::{CategoryRule, KeyFilter, RuleError, RuleTable};
use anyhow::{bail, Context};
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "i18n.toml";

/// Parameters of a translation run.
///
/// ## Example
///
/// ```toml
/// source-language = "fr"
/// reference-language = "en"
/// default-language = "de"
///
/// [languages]
/// "de" = "German"
/// "en" = "English"
/// "fr" = "French"
/// "es" = "Spanish"
///
/// [[categories]]
/// name = "user-interface"
/// excluded-prefixes = ["content."]
///
/// [[categories]]
/// name = "attacks"
/// prefixes = ["content.3."]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    /// Language of the texts being translated.
    pub source_language: String,
    /// Language shown to translators next to the source text.
    pub reference_language: String,
    /// Target language used when none is given on the command line.
    pub default_language: String,
    /// A map of language codes to language names.
    ///
    /// Only languages listed here can be translated to. The names end
    /// up in the `Language-Team` header of the catalogs.
    pub languages: BTreeMap<String, String>,
    /// Categories in priority order, replacing the built-in ones.
    ///
    /// The catch-all `uncategorized` category is always added at the
    /// end.
    pub categories: Option<Vec<CategoryConfig>>,
}

/// A category as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct CategoryConfig {
    pub name: String,
    #[serde(default)]
    pub prefixes: Vec<String>,
    #[serde(default)]
    pub excluded_prefixes: Vec<String>,
}

impl From<&CategoryConfig> for CategoryRule {
    fn from(category: &CategoryConfig) -> Self {
        CategoryRule {
            name: category.name.clone(),
            filter: KeyFilter {
                prefixes: category.prefixes.clone(),
                excluded_prefixes: category.excluded_prefixes.clone(),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let languages = [("de", "German"), ("en", "English"), ("fr", "French")]
            .into_iter()
            .map(|(code, name)| (String::from(code), String::from(name)))
            .collect();
        Config {
            source_language: String::from("fr"),
            reference_language: String::from("en"),
            default_language: String::from("de"),
            languages,
            categories: None,
        }
    }
}

impl Config {
    /// Parse a configuration from TOML.
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(text)?;
        if config.source_language == config.reference_language {
            bail!(
                "The source and reference language must differ, both are {:?}",
                config.source_language
            );
        }
        Ok(config)
    }

    /// Read the configuration file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        Config::from_toml(&text).with_context(|| format!("Could not parse {}", path.display()))
    }

    /// Read `i18n.toml` from `directory`, or use the defaults if the
    /// file does not exist.
    pub fn discover(directory: &Path) -> anyhow::Result<Self> {
        let path = directory.join(CONFIG_FILE_NAME);
        if path.exists() {
            debug!("Reading configuration from {}", path.display());
            Config::load(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// The categories to sort the texts into.
    pub fn rule_table(&self) -> Result<RuleTable, RuleError> {
        match &self.categories {
            Some(categories) => RuleTable::new(categories.iter().map(CategoryRule::from).collect()),
            None => Ok(RuleTable::wakfu()),
        }
    }

    /// The reference language, named after the `languages` table when
    /// it is listed there.
    pub fn reference(&self) -> Language {
        let code = &self.reference_language;
        let name = self.languages.get(code).unwrap_or(code);
        Language::new(code, name)
    }

    /// Look up a language which texts can be translated to.
    pub fn target(&self, code: &str) -> anyhow::Result<Language> {
        if code == self.source_language || code == self.reference_language {
            bail!("Cannot translate to {code:?}: it is the source or reference language");
        }
        match self.languages.get(code) {
            Some(name) => Ok(Language::new(code, name)),
            None => bail!(
                "Unknown language {code:?}, expected one of: {}",
                self.target_codes().collect::<Vec<_>>().join(", ")
            ),
        }
    }

    fn target_codes(&self) -> impl Iterator<Item = &str> {
        self.languages
            .keys()
            .map(String::as_str)
            .filter(|code| *code != self.source_language && *code != self.reference_language)
    }
}
