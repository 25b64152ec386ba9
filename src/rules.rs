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

//! Classification of keys into categories.
//!
//! A [`RuleTable`] is an ordered list of named key filters. A key
//! belongs to the first category whose filter matches it. The table
//! always ends with the [`UNCATEGORIZED`] catch-all, so every key
//! has a category.

use std::collections::HashSet;
use thiserror::Error;

/// Name of the catch-all category.
pub const UNCATEGORIZED: &str = "uncategorized";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RuleError {
    #[error("Category {0:?} is defined more than once")]
    DuplicateName(String),
    #[error("Category name {0:?} cannot be used as a directory name")]
    InvalidName(String),
    #[error("Category name {0:?} is reserved for the catch-all category")]
    ReservedName(String),
}

/// Membership test for keys.
///
/// A key matches when it starts with one of `prefixes` (or
/// `prefixes` is empty) and starts with none of `excluded_prefixes`.
/// The default filter matches every key.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KeyFilter {
    pub prefixes: Vec<String>,
    pub excluded_prefixes: Vec<String>,
}

impl KeyFilter {
    /// A filter matching keys with any of the given prefixes.
    pub fn prefixes(prefixes: &[&str]) -> Self {
        KeyFilter {
            prefixes: prefixes.iter().map(|prefix| String::from(*prefix)).collect(),
            excluded_prefixes: Vec::new(),
        }
    }

    /// A filter matching keys with none of the given prefixes.
    pub fn excluding(prefixes: &[&str]) -> Self {
        KeyFilter {
            prefixes: Vec::new(),
            excluded_prefixes: prefixes.iter().map(|prefix| String::from(*prefix)).collect(),
        }
    }

    pub fn matches(&self, key: &str) -> bool {
        (self.prefixes.is_empty() || self.prefixes.iter().any(|p| key.starts_with(p.as_str())))
            && !self
                .excluded_prefixes
                .iter()
                .any(|p| key.starts_with(p.as_str()))
    }
}

/// A named category together with the keys it accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub name: String,
    pub filter: KeyFilter,
}

impl CategoryRule {
    pub fn new(name: &str, filter: KeyFilter) -> Self {
        CategoryRule {
            name: String::from(name),
            filter,
        }
    }
}

/// Categories of the Wakfu texts, in priority order.
///
/// Keys outside `content.` are user interface strings. The content
/// keys are `content.<type>.<id>` where `<type>` is the kind of game
/// object the text belongs to.
const WAKFU_CONTENT_CATEGORIES: &[(&str, &[&str])] = &[
    ("attacks", &["content.3."]),
    ("attack-descriptions", &["content.4.", "content.5."]),
    ("combat-objects", &["content.6."]),
    ("mobs", &["content.7."]),
    ("states", &["content.8."]),
    ("state-descriptions", &["content.9."]),
    ("effects", &["content.10."]),
    ("world-entities", &["content.12."]),
    ("effect-descriptions", &["content.13.", "content.33."]),
    ("item-types", &["content.14.", "content.37."]),
    ("items", &["content.15."]),
    ("item-descriptions", &["content.16."]),
    ("sets", &["content.20."]),
    ("professions", &["content.22.", "content.43."]),
    ("book-covers", &["content.24."]),
    ("task-logs", &["content.25."]),
    ("env-quests", &["content.26."]),
    ("env-quest-tasks", &["content.28."]),
    ("effect-logs", &["content.30."]),
    ("titles", &["content.34."]),
    ("signs", &["content.35."]),
    (
        "interactive-entities",
        &["content.36.", "content.59.", "content.79.", "content.82."],
    ),
    ("mob-types", &["content.38."]),
    ("nations", &["content.39."]),
    ("government-descriptions", &["content.40."]),
    ("recipes", &["content.46."]),
    ("mob-chatter", &["content.47."]),
    ("clan-members", &["content.48."]),
    ("clan-member-chatter", &["content.49."]),
    ("clan-member-effects", &["content.50.", "content.51."]),
    ("weather-options", &["content.52."]),
    ("weather-descriptions", &["content.53."]),
    ("places", &["content.54."]),
    ("government-ranks", &["content.57."]),
    ("emote-logs", &["content.60."]),
    ("special-places", &["content.61.", "content.66."]),
    ("achievements", &["content.62."]),
    ("achievement-descriptions", &["content.63."]),
    ("achievement-tasks", &["content.64."]),
    ("achievement-task-descriptions", &["content.65."]),
    ("book-texts", &["content.67."]),
    ("clan-member-dialogs", &["content.75."]),
    ("clan-member-dialog-choices", &["content.76."]),
    // content.61. is already claimed by special-places.
    ("place-banners", &["content.61.", "content.77.", "content.88."]),
    ("emotes", &["content.80."]),
    ("clan-member-job", &["content.90."]),
    ("clan-member-sex", &["content.91."]),
    ("clan-member-height", &["content.92."]),
    ("clan-member-weight", &["content.93."]),
    ("clan-member-profile", &["content.94."]),
    ("laws", &["content.97."]),
    ("law-descriptions", &["content.98."]),
];

fn check_name(name: &str) -> Result<(), RuleError> {
    if name == UNCATEGORIZED {
        return Err(RuleError::ReservedName(String::from(name)));
    }
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(RuleError::InvalidName(String::from(name)));
    }
    Ok(())
}

/// Ordered list of categories; the first matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<CategoryRule>,
}

impl RuleTable {
    /// Build a table from `rules` and append the catch-all category.
    pub fn new(rules: Vec<CategoryRule>) -> Result<Self, RuleError> {
        let mut names = HashSet::new();
        for rule in &rules {
            check_name(&rule.name)?;
            if !names.insert(rule.name.as_str()) {
                return Err(RuleError::DuplicateName(rule.name.clone()));
            }
        }

        let mut rules = rules;
        rules.push(CategoryRule::new(UNCATEGORIZED, KeyFilter::default()));
        Ok(RuleTable { rules })
    }

    /// The built-in categories for the Wakfu texts.
    pub fn wakfu() -> Self {
        let mut rules = vec![CategoryRule::new(
            "user-interface",
            KeyFilter::excluding(&["content."]),
        )];
        rules.extend(
            WAKFU_CONTENT_CATEGORIES
                .iter()
                .map(|(name, prefixes)| CategoryRule::new(name, KeyFilter::prefixes(prefixes))),
        );
        rules.push(CategoryRule::new(UNCATEGORIZED, KeyFilter::default()));
        RuleTable { rules }
    }

    /// Find the category of `key`.
    pub fn classify(&self, key: &str) -> &CategoryRule {
        self.rules
            .iter()
            .find(|rule| rule.filter.matches(key))
            .unwrap_or_else(|| self.catch_all())
    }

    fn catch_all(&self) -> &CategoryRule {
        // `new` and `wakfu` both end the list with the catch-all.
        &self.rules[self.rules.len() - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryRule> {
        self.rules.iter()
    }

    /// Number of categories, including the catch-all.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        RuleTable::wakfu()
    }
}
