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

//! One category of texts and its pair of PO files.
//!
//! Every category lives in its own directory with two catalogs:
//!
//! - `<reference>.po` maps the source text to the reference text
//!   (French to English). Translators read it for context.
//! - `<language>.po` maps the source text to the translation being
//!   worked on. This is the file translators edit.
//!
//! Texts are deduplicated: a (source, reference) pair appears only
//! once per category, no matter how many keys use it. The keys are
//! kept as extracted comments, which is how translations are found
//! again on the next run.

use crate::rules::CategoryRule;
use anyhow::{anyhow, bail, Context};
use indexmap::map::Entry;
use indexmap::IndexMap;
use log::debug;
use polib::catalog::Catalog;
use polib::message::Message;
use polib::metadata::CatalogMetadata;
use polib::po_file::{self, POParseOptions};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// A language code together with the name used as `Language-Team`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub code: String,
    pub name: String,
}

impl Language {
    pub fn new(code: &str, name: &str) -> Self {
        Language {
            code: String::from(code),
            name: String::from(name),
        }
    }
}

/// Values written to the header of every catalog in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSettings {
    /// Game version, used in `Project-Id-Version`.
    pub version: String,
    /// Value of `PO-Revision-Date`.
    pub revision_date: String,
    /// Language of the reference texts, usually English.
    pub reference: Language,
    /// Language being translated to.
    pub target: Language,
}

/// Content identity of a text.
///
/// Two keys with the same source and reference text are duplicates
/// and share a single translation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    source: String,
    reference: String,
}

impl Fingerprint {
    pub fn new(source: &str, reference: &str) -> Self {
        Fingerprint {
            source: String::from(source),
            reference: String::from(reference),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }
}

/// The translation chosen for a fingerprint in this run.
#[derive(Debug, Clone)]
struct Assignment {
    translation: String,
    /// Keys passed to `add` with this fingerprint, in order.
    keys: Vec<String>,
}

#[derive(Debug, Copy, Clone)]
enum CatalogField {
    Reference,
    Translation,
}

impl CatalogField {
    fn project<'a>(&self, fingerprint: &'a Fingerprint, assignment: &'a Assignment) -> &'a str {
        match self {
            CatalogField::Reference => &fingerprint.reference,
            CatalogField::Translation => &assignment.translation,
        }
    }
}

/// Header fields which must be present for polib to read a catalog.
const REQUIRED_HEADER_FIELDS: &[&str] = &[
    "Project-Id-Version",
    "POT-Creation-Date",
    "PO-Revision-Date",
    "Language-Team",
    "MIME-Version",
    "Content-Type",
    "Content-Transfer-Encoding",
    "Language",
    "Plural-Forms",
];

/// Find the required header fields missing from the PO file `text`.
///
/// The header is the `msgstr` of the first message.
fn missing_header_fields(text: &str) -> Vec<&'static str> {
    let mut lines = text
        .lines()
        .map(str::trim)
        .skip_while(|line| !line.starts_with("msgstr"));
    let mut header = String::new();
    if let Some(first) = lines.next() {
        let continuation = lines.take_while(|line| line.starts_with('"'));
        for part in std::iter::once(first.trim_start_matches("msgstr").trim()).chain(continuation) {
            let part = part
                .strip_prefix('"')
                .and_then(|part| part.strip_suffix('"'))
                .unwrap_or(part);
            header.push_str(part);
        }
    }

    let present = header
        .split("\\n")
        .filter_map(|line| line.split_once(':'))
        .map(|(field, _)| field)
        .collect::<HashSet<_>>();
    REQUIRED_HEADER_FIELDS
        .iter()
        .copied()
        .filter(|field| !present.contains(field))
        .collect()
}

/// Read the translated messages of the PO file at `path`.
///
/// Every key listed in the comments of a message maps to its
/// `msgstr`. A missing file simply means there are no translations
/// yet.
fn load_known_translations(path: &Path) -> anyhow::Result<HashMap<String, String>> {
    let mut known = HashMap::new();
    if !path.exists() {
        debug!("No translations found at {}", path.display());
        return Ok(known);
    }

    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    let missing = missing_header_fields(&text);
    if !missing.is_empty() {
        bail!(
            "Could not parse {:?} as PO file: missing header fields {}",
            path,
            missing.join(", ")
        );
    }

    let options = POParseOptions {
        translated_only: true,
        ..POParseOptions::default()
    };
    let catalog = po_file::parse_with_option(path, &options)
        .map_err(|err| anyhow!("{err}"))
        .with_context(|| format!("Could not parse {:?} as PO file", path))?;
    for message in catalog.messages() {
        let msgstr = match message.msgstr() {
            Ok(msgstr) if !msgstr.is_empty() => msgstr,
            _ => continue,
        };
        for key in message.comments().lines() {
            known
                .entry(String::from(key))
                .or_insert_with(|| String::from(msgstr));
        }
    }
    Ok(known)
}

/// A category of texts, see the [module documentation](self).
#[derive(Debug)]
pub struct Category {
    rule: CategoryRule,
    directory: PathBuf,
    settings: CatalogSettings,
    /// Translations saved by the previous run, by key.
    known: HashMap<String, String>,
    /// Translations chosen in this run, in first-seen order.
    assigned: IndexMap<Fingerprint, Assignment>,
}

impl Category {
    /// Create the category stored in `<root>/<name>/`.
    ///
    /// This reads the existing translations from
    /// `<root>/<name>/<language>.po`, if any.
    pub fn load(
        rule: CategoryRule,
        root: &Path,
        settings: &CatalogSettings,
    ) -> anyhow::Result<Self> {
        let directory = root.join(&rule.name);
        let path = directory.join(format!("{}.po", settings.target.code));
        let known = load_known_translations(&path)
            .with_context(|| format!("Could not load category {}", rule.name))?;
        debug!("{}: {} known translations", rule.name, known.len());

        Ok(Category {
            rule,
            directory,
            settings: settings.clone(),
            known,
            assigned: IndexMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.rule.name
    }

    /// Number of distinct texts seen in this run.
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    /// Previously saved translation for `key`.
    pub fn known_translation(&self, key: &str) -> Option<&str> {
        self.known.get(key).map(String::as_str)
    }

    /// Path of the source to reference catalog.
    pub fn reference_path(&self) -> PathBuf {
        self.directory.join(format!("{}.po", self.settings.reference.code))
    }

    /// Path of the source to translation catalog.
    pub fn translation_path(&self) -> PathBuf {
        self.directory.join(format!("{}.po", self.settings.target.code))
    }

    /// Offer a text to the category for translation.
    ///
    /// Returns `false` if `key` does not belong to the category.
    /// Otherwise the text is added, unless an identical text was
    /// added before, and `true` is returned. A new text starts out
    /// with the saved translation for `key`, or `fallback` when there
    /// is none.
    pub fn add(&mut self, key: &str, source: &str, reference: &str, fallback: &str) -> bool {
        if !self.rule.filter.matches(key) {
            return false;
        }

        match self.assigned.entry(Fingerprint::new(source, reference)) {
            Entry::Occupied(mut entry) => entry.get_mut().keys.push(String::from(key)),
            Entry::Vacant(entry) => {
                let translation = self.known.get(key).map_or(fallback, String::as_str);
                entry.insert(Assignment {
                    translation: String::from(translation),
                    keys: vec![String::from(key)],
                });
            }
        }
        true
    }

    /// Find the translation of a text.
    ///
    /// Returns `None` if `key` does not belong to the category. All
    /// keys with the same text get the translation chosen for the
    /// first of them: the saved translation for that key, else the
    /// reference text, else the source text.
    pub fn get(&mut self, key: &str, source: &str, reference: &str) -> Option<String> {
        if !self.rule.filter.matches(key) {
            return None;
        }

        // The keys are only needed for saving, which assembling never does.
        let assignment = self
            .assigned
            .entry(Fingerprint::new(source, reference))
            .or_insert_with(|| {
                let translation = match self.known.get(key) {
                    Some(known) => known.as_str(),
                    None if !reference.is_empty() => reference,
                    None => source,
                };
                Assignment {
                    translation: String::from(translation),
                    keys: Vec::new(),
                }
            });
        Some(assignment.translation.clone())
    }

    fn metadata(&self, language: &Language) -> CatalogMetadata {
        let mut metadata = CatalogMetadata::new();
        metadata.project_id_version = format!("{}-{}", self.rule.name, self.settings.version);
        metadata.po_revision_date = self.settings.revision_date.clone();
        metadata.language_team = language.name.clone();
        metadata.language = language.code.clone();
        metadata.mime_version = String::from("1.0");
        metadata.content_type = String::from("text/plain; charset=UTF-8");
        metadata.content_transfer_encoding = String::from("8bit");
        metadata
    }

    fn catalog(&self, language: &Language, field: CatalogField) -> Catalog {
        let mut catalog = Catalog::new(self.metadata(language));
        let mut msgids = HashSet::new();
        for (fingerprint, assignment) in &self.assigned {
            let mut builder = Message::build_singular();
            builder
                .with_comments(assignment.keys.join("\n"))
                .with_msgid(fingerprint.source.clone())
                .with_msgstr(String::from(field.project(fingerprint, assignment)));
            // The same source text can come with different reference
            // texts. The context keeps the messages apart.
            if !msgids.insert(fingerprint.source.as_str()) {
                builder.with_msgctxt(assignment.keys[0].clone());
            }
            catalog.append_or_update(builder.done());
        }
        catalog
    }

    /// Write both catalogs of the category.
    ///
    /// Only texts seen in this run are written: translations of keys
    /// which no longer exist are dropped.
    pub fn save(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.directory)
            .with_context(|| format!("Could not create {}", self.directory.display()))?;

        let reference_path = self.reference_path();
        let catalog = self.catalog(&self.settings.reference, CatalogField::Reference);
        po_file::write(&catalog, &reference_path)
            .with_context(|| format!("Writing messages to {}", reference_path.display()))?;

        let translation_path = self.translation_path();
        let catalog = self.catalog(&self.settings.target, CatalogField::Translation);
        po_file::write(&catalog, &translation_path)
            .with_context(|| format!("Writing messages to {}", translation_path.display()))?;

        debug!("{}: saved {} messages", self.rule.name, self.assigned.len());
        Ok(())
    }
}
