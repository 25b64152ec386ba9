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

//! Reading and writing `texts_<lang>.properties` files.
//!
//! The format is deliberately simple: one `key=value` pair per line,
//! with newlines inside a value written as a literal `\n`.

use anyhow::Context;
use indexmap::IndexMap;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

/// A key-value store which remembers the order of its keys.
pub type Properties = IndexMap<String, String>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PropertiesError {
    #[error("Invalid line #{lineno}: {line:?}")]
    InvalidLine { lineno: usize, line: String },
}

fn property_regex() -> &'static Regex {
    static PROPERTY: OnceLock<Regex> = OnceLock::new();
    PROPERTY.get_or_init(|| Regex::new(r"^([^=]+)=(.*)$").unwrap())
}

fn unescape(value: &str) -> String {
    value.replace("\\n", "\n")
}

fn escape(value: &str) -> String {
    value.replace('\n', "\\n")
}

/// Name of the properties file holding the texts of `language`.
pub fn file_name(language: &str) -> String {
    format!("texts_{language}.properties")
}

/// Parse the text of a properties file.
///
/// Later occurrences of a key overwrite the value but keep the
/// position of the first occurrence.
///
/// # Examples
///
/// ```
/// use wakfu_i18n_helpers::properties::parse;
///
/// let texts = parse("ui.ok=OK\ncontent.3.1=Two\\nlines\n").unwrap();
/// assert_eq!(texts["ui.ok"], "OK");
/// assert_eq!(texts["content.3.1"], "Two\nlines");
/// ```
pub fn parse(text: &str) -> Result<Properties, PropertiesError> {
    let mut properties = Properties::new();
    for (idx, line) in text.lines().enumerate() {
        let captures = property_regex()
            .captures(line)
            .ok_or_else(|| PropertiesError::InvalidLine {
                lineno: idx + 1,
                line: String::from(line),
            })?;
        properties.insert(String::from(&captures[1]), unescape(&captures[2]));
    }
    Ok(properties)
}

/// Render `properties` in the on-disk format.
pub fn to_string(properties: &Properties) -> String {
    let mut text = String::new();
    for (key, value) in properties {
        text.push_str(key);
        text.push('=');
        text.push_str(&escape(value));
        text.push('\n');
    }
    text
}

/// Read and parse the properties file at `path`.
pub fn load(path: &Path) -> anyhow::Result<Properties> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    parse(&text).with_context(|| format!("Could not parse {}", path.display()))
}

/// Write `properties` to `path`, replacing any existing file.
pub fn write(properties: &Properties, path: &Path) -> anyhow::Result<()> {
    fs::write(path, to_string(properties))
        .with_context(|| format!("Could not write {}", path.display()))
}
