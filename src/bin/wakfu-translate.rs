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

//! Translation helper for the Wakfu texts.
//!
//! Run in a directory with `texts_fr.properties` and
//! `texts_en.properties`, this program sorts the texts into one
//! directory per category, each with an `en.po` for reference and a
//! `<language>.po` to translate. With `--assemble` it does the
//! reverse and writes `texts_<language>.properties` from the
//! translated catalogs.

use anyhow::{bail, Context};
use clap::Parser;
use log::info;
use std::path::{Path, PathBuf};
use wakfu_i18n_helpers::config::Config;
use wakfu_i18n_helpers::properties::{self, Properties};
use wakfu_i18n_helpers::{assemble, disassemble, load_categories, save_categories, CatalogSettings};

#[derive(Debug, Parser)]
#[command(about = "Split the Wakfu texts into gettext catalogs and back")]
struct Cli {
    /// Game version written to the catalog headers.
    #[arg(default_value = "1")]
    version: String,
    /// Language to translate to [default: from the configuration, "de"].
    language: Option<String>,
    /// Assemble texts_<LANGUAGE>.properties from the catalogs.
    #[arg(short, long)]
    assemble: bool,
    /// Directory with the properties files and the catalogs.
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    directory: PathBuf,
    /// Configuration file [default: <DIR>/i18n.toml if it exists].
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn read_properties(path: &Path) -> anyhow::Result<Properties> {
    info!("Reading {}...", path.display());
    properties::load(path)
}

/// Run the conversion and return the number of texts processed.
fn run(cli: &Cli, revision_date: &str) -> anyhow::Result<usize> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(&cli.directory)?,
    };
    let language = cli.language.as_deref().unwrap_or(&config.default_language);
    let target = config.target(language)?;
    let table = config.rule_table().context("Invalid categories")?;

    let source_path = cli.directory.join(properties::file_name(&config.source_language));
    let reference_path = cli
        .directory
        .join(properties::file_name(&config.reference_language));
    if !source_path.exists() || !reference_path.exists() {
        bail!(
            "Please provide at least {:?} and {:?} in {}",
            properties::file_name(&config.source_language),
            properties::file_name(&config.reference_language),
            cli.directory.display()
        );
    }
    let source = read_properties(&source_path)?;
    let reference = read_properties(&reference_path)?;
    let target_path = cli.directory.join(properties::file_name(&target.code));

    info!("Preparing...");
    let settings = CatalogSettings {
        version: cli.version.clone(),
        revision_date: String::from(revision_date),
        reference: config.reference(),
        target,
    };
    let mut categories = load_categories(&table, &cli.directory, &settings)?;

    if cli.assemble {
        info!("Processing...");
        let mut texts = Properties::new();
        let count = assemble(&mut categories, &source, &reference, &mut texts);
        info!("Saving {}...", target_path.display());
        properties::write(&texts, &target_path)?;
        Ok(count)
    } else {
        let texts = if target_path.exists() {
            read_properties(&target_path)?
        } else {
            Properties::new()
        };
        info!("Processing...");
        let count = disassemble(&mut categories, &source, &reference, &texts);
        info!("Saving...");
        save_categories(&categories)?;
        Ok(count)
    }
}

#[allow(clippy::print_stdout)]
fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"));
    let cli = Cli::parse();
    let revision_date = chrono::Local::now()
        .format("%Y-%m-%d %H:%M:%S%:z")
        .to_string();
    let count = run(&cli, &revision_date)?;
    println!("All done. {count} entries processed.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    const REVISION_DATE: &str = "2016-05-01 12:00:00+02:00";

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("wakfu-translate").chain(args.iter().copied()))
            .unwrap()
    }

    fn setup(dir: &Path) {
        fs::write(
            dir.join("texts_fr.properties"),
            "ui.ok=OK\ncontent.3.1=Attaque\ncontent.3.2=Attaque\ncontent.7.1=\n",
        )
        .unwrap();
        fs::write(
            dir.join("texts_en.properties"),
            "ui.ok=OK\ncontent.3.1=Attack\ncontent.3.2=Attack\n",
        )
        .unwrap();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = cli(&[]);
        assert_eq!(cli.version, "1");
        assert_eq!(cli.language, None);
        assert!(!cli.assemble);
        assert_eq!(cli.directory, PathBuf::from("."));
    }

    #[test]
    fn test_cli_arguments() {
        let cli = cli(&["-a", "-C", "texts", "1.42", "es"]);
        assert_eq!(cli.version, "1.42");
        assert_eq!(cli.language.as_deref(), Some("es"));
        assert!(cli.assemble);
        assert_eq!(cli.directory, PathBuf::from("texts"));
    }

    #[test]
    fn test_missing_inputs() {
        let tmpdir = tempfile::tempdir().unwrap();
        let dir = tmpdir.path().to_str().unwrap();
        fs::write(tmpdir.path().join("texts_fr.properties"), "ui.ok=OK\n").unwrap();

        let err = run(&cli(&["-C", dir]), REVISION_DATE).unwrap_err();
        assert!(err.to_string().contains("texts_en.properties"));
        // Nothing was written.
        assert!(!tmpdir.path().join("attacks").exists());
    }

    #[test]
    fn test_invalid_properties_line() {
        let tmpdir = tempfile::tempdir().unwrap();
        setup(tmpdir.path());
        fs::write(
            tmpdir.path().join("texts_en.properties"),
            "ui.ok=OK\ncontent.3.1 Attack\n",
        )
        .unwrap();
        let dir = tmpdir.path().to_str().unwrap();

        let err = run(&cli(&["-C", dir]), REVISION_DATE).unwrap_err();
        let err = format!("{err:#}");
        assert!(err.contains("texts_en.properties"), "{err}");
        assert!(err.contains("Invalid line #2"), "{err}");
        // No category was saved.
        assert!(!tmpdir.path().join("attacks").exists());
        assert!(!tmpdir.path().join("uncategorized").exists());
    }

    #[test]
    fn test_unknown_language() {
        let tmpdir = tempfile::tempdir().unwrap();
        setup(tmpdir.path());
        let dir = tmpdir.path().to_str().unwrap();
        assert!(run(&cli(&["-C", dir, "1", "xx"]), REVISION_DATE).is_err());
    }

    #[test]
    fn test_disassemble_and_assemble() {
        let tmpdir = tempfile::tempdir().unwrap();
        setup(tmpdir.path());
        let dir = tmpdir.path().to_str().unwrap();

        let count = run(&cli(&["-C", dir, "1.42"]), REVISION_DATE).unwrap();
        assert_eq!(count, 3);
        assert!(tmpdir.path().join("attacks/en.po").exists());
        assert!(tmpdir.path().join("attacks/de.po").exists());
        assert!(tmpdir.path().join("uncategorized/de.po").exists());

        let po = fs::read_to_string(tmpdir.path().join("attacks/de.po")).unwrap();
        assert!(po.contains("Project-Id-Version: attacks-1.42"));
        let po = po.replace("msgstr \"\"\n\n", "msgstr \"Angriff\"\n\n");
        fs::write(tmpdir.path().join("attacks/de.po"), po).unwrap();

        let count = run(&cli(&["-C", dir, "-a", "1.42"]), REVISION_DATE).unwrap();
        assert_eq!(count, 3);
        let texts = fs::read_to_string(tmpdir.path().join("texts_de.properties")).unwrap();
        assert_eq!(
            texts,
            "ui.ok=OK\ncontent.3.1=Angriff\ncontent.3.2=Angriff\ncontent.7.1=\n"
        );
        // Assembling leaves the catalogs alone.
        let po = fs::read_to_string(tmpdir.path().join("attacks/de.po")).unwrap();
        assert!(po.contains("msgstr \"Angriff\""));
    }

    #[test]
    fn test_disassemble_reads_existing_target() {
        let tmpdir = tempfile::tempdir().unwrap();
        setup(tmpdir.path());
        fs::write(
            tmpdir.path().join("texts_de.properties"),
            "content.3.1=Attacke\n",
        )
        .unwrap();
        let dir = tmpdir.path().to_str().unwrap();

        run(&cli(&["-C", dir]), REVISION_DATE).unwrap();
        let po = fs::read_to_string(tmpdir.path().join("attacks/de.po")).unwrap();
        assert!(po.contains("msgstr \"Attacke\""));
    }

    #[test]
    fn test_config_file() {
        let tmpdir = tempfile::tempdir().unwrap();
        setup(tmpdir.path());
        fs::write(
            tmpdir.path().join("i18n.toml"),
            "default-language = \"es\"\n\
             \n\
             [languages]\n\
             es = \"Spanish\"\n\
             \n\
             [[categories]]\n\
             name = \"spells\"\n\
             prefixes = [\"content.3.\"]\n",
        )
        .unwrap();
        let dir = tmpdir.path().to_str().unwrap();

        run(&cli(&["-C", dir]), REVISION_DATE).unwrap();
        assert!(tmpdir.path().join("spells/es.po").exists());
        assert!(tmpdir.path().join("uncategorized/en.po").exists());
        assert!(!tmpdir.path().join("attacks").exists());
    }
}
