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

//! Conversion between properties files and categories.
//!
//! [`disassemble`] sorts the texts of a properties file into
//! categories and [`assemble`] builds a translated properties file
//! from them. Both take the categories in rule table order, which is
//! also the order in which they are tried.

use crate::category::{CatalogSettings, Category};
use crate::properties::Properties;
use crate::rules::RuleTable;
use log::debug;
use std::path::Path;

/// Create one category per rule of `table`, stored under `root`.
pub fn load_categories(
    table: &RuleTable,
    root: &Path,
    settings: &CatalogSettings,
) -> anyhow::Result<Vec<Category>> {
    table
        .iter()
        .map(|rule| Category::load(rule.clone(), root, settings))
        .collect()
}

/// Save all categories.
///
/// Stops at the first error. Categories saved before the error stay
/// on disk.
pub fn save_categories(categories: &[Category]) -> anyhow::Result<()> {
    for category in categories {
        category.save()?;
    }
    Ok(())
}

/// Sort the texts of `source` into `categories`.
///
/// The reference text and the fallback translation of a key are taken
/// from `reference` and `target`, empty if the key is missing there.
/// Keys with an empty source text are skipped. Returns the number of
/// texts processed.
pub fn disassemble(
    categories: &mut [Category],
    source: &Properties,
    reference: &Properties,
    target: &Properties,
) -> usize {
    let mut count = 0;
    for (key, source_text) in source {
        if source_text.is_empty() {
            continue;
        }

        let reference_text = reference.get(key).map_or("", String::as_str);
        let fallback = target.get(key).map_or("", String::as_str);
        let claimed = categories
            .iter_mut()
            .any(|category| category.add(key, source_text, reference_text, fallback));
        debug_assert!(claimed, "no category for {key:?}");
        count += 1;
    }

    for category in categories.iter() {
        debug!("{}: {} texts", category.name(), category.len());
    }
    count
}

/// Fill `target` with the translations of every key in `source`.
///
/// Keys with an empty source text get an empty translation. Returns
/// the number of non-empty texts processed.
pub fn assemble(
    categories: &mut [Category],
    source: &Properties,
    reference: &Properties,
    target: &mut Properties,
) -> usize {
    let mut count = 0;
    for (key, source_text) in source {
        if source_text.is_empty() {
            target.insert(key.clone(), String::new());
            continue;
        }

        let reference_text = reference.get(key).map_or("", String::as_str);
        if let Some(translation) = categories
            .iter_mut()
            .find_map(|category| category.get(key, source_text, reference_text))
        {
            target.insert(key.clone(), translation);
        }
        count += 1;
    }
    count
}
