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

//! Helpers for translating the game texts of Wakfu.
//!
//! The game ships its texts as large `texts_<lang>.properties` files.
//! The functions here split those files into one pair of GNU Gettext
//! catalogs per category of content (attacks, items, mobs, ...) so
//! human translators can work on manageable, deduplicated files. The
//! same categories are later used to assemble a translated
//! properties file again.
//!
//! A typical run looks like this:
//!
//! 1. Load the French source texts and the English reference texts
//!    with [`properties::load`].
//! 2. Create the categories with [`load_categories`]. This reads the
//!    translations saved by the previous run.
//! 3. Call [`disassemble`] and then [`save_categories`] to write new
//!    catalogs, or call [`assemble`] to produce the translated
//!    properties file.

pub mod category;
pub mod config;
pub mod convert;
pub mod properties;
pub mod rules;

pub use category::{CatalogSettings, Category, Fingerprint, Language};
pub use convert::{assemble, disassemble, load_categories, save_categories};
pub use properties::Properties;
pub use rules::{CategoryRule, KeyFilter, RuleTable, UNCATEGORIZED};
