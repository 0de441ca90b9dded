//! Demo CLI for the localization core.
//!
//! Operates on already-exported platform JSON: a file of entries (either a
//! bare array or an `{ "items": [...] }` envelope) plus a small config file
//! describing the project. Three subcommands mirror the library operations:
//!
//! - `resources` lists the translatable resource records for a batch
//! - `extract` prints one entry's segment payload
//! - `reinsert` splices a translated payload back and prints the fields

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::warn;

use contentful_l10n::ingest::{entries_from_value, fields_to_value};
use contentful_l10n::{
    Entry, L10nContext, TranslationUnit, extract_segments, list_translatable_resources,
    reinsert_translations,
};

#[derive(Parser)]
#[command(name = "contentful-l10n", version, about = "Segment extraction and reinsertion for CMS entry graphs")]
struct Cli {
    /// Project configuration file (JSON)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List translatable resource records for a batch of entries
    Resources {
        /// Entries file: a JSON array or an `{ "items": [...] }` envelope
        entries: PathBuf,
    },
    /// Print the segment payload for one entry
    Extract {
        entries: PathBuf,
        /// Entry id to extract
        #[arg(long)]
        id: String,
    },
    /// Splice a translated payload into one entry and print its fields
    Reinsert {
        entries: PathBuf,
        #[arg(long)]
        id: String,
        /// Target language tag, e.g. `fr` or `de-DE`
        #[arg(long)]
        lang: String,
        /// Translated payload file: a JSON array of `{ sid, str?, nstr? }`
        #[arg(long)]
        translations: PathBuf,
    },
}

/// On-disk shape of the project configuration.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct Config {
    source_lang: Option<String>,
    prj: Option<String>,
    localized_fields: HashMap<String, Vec<String>>,
    content_type_whitelist: Option<Vec<String>>,
    dnt_tags: Vec<String>,
    clear_stale_targets: bool,
}

impl Config {
    fn load(path: Option<&PathBuf>) -> Result<Config, Box<dyn std::error::Error>> {
        let Some(path) = path else {
            return Ok(Config::default());
        };
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn into_context(self) -> L10nContext {
        let mut ctx = L10nContext::new();
        if let Some(lang) = self.source_lang {
            ctx.source_lang = lang;
        }
        ctx.prj = self.prj;
        ctx.localized_fields = self.localized_fields;
        ctx.content_type_whitelist = self
            .content_type_whitelist
            .map(|types| types.into_iter().collect());
        ctx.dnt_tags = self.dnt_tags.into_iter().collect();
        ctx.clear_stale_targets = self.clear_stale_targets;
        ctx
    }
}

fn load_entries(path: &PathBuf) -> Result<Vec<Entry>, Box<dyn std::error::Error>> {
    let raw = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    Ok(entries_from_value(&value)?)
}

fn find_entry<'a>(entries: &'a [Entry], id: &str) -> Result<&'a Entry, Box<dyn std::error::Error>> {
    entries
        .iter()
        .find(|entry| entry.id == id)
        .ok_or_else(|| format!("no entry with id {id}").into())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let ctx = Config::load(cli.config.as_ref())?.into_context();

    match cli.command {
        Commands::Resources { entries } => {
            let entries = load_entries(&entries)?;
            let outcome = list_translatable_resources(&entries, &ctx);
            println!("{}", serde_json::to_string_pretty(&outcome.resources)?);
        }
        Commands::Extract { entries, id } => {
            let entries = load_entries(&entries)?;
            let outcome = list_translatable_resources(&entries, &ctx);
            let entry = outcome
                .entries
                .get(&id)
                .map(Ok)
                .unwrap_or_else(|| find_entry(&entries, &id))?;
            match extract_segments(entry, &ctx) {
                Some(payload) => println!("{}", serde_json::to_string_pretty(&payload)?),
                None => warn!(id = %id, "entry has no translatable content"),
            }
        }
        Commands::Reinsert {
            entries,
            id,
            lang,
            translations,
        } => {
            let entries = load_entries(&entries)?;
            let outcome = list_translatable_resources(&entries, &ctx);
            let entry = outcome
                .entries
                .get(&id)
                .map(Ok)
                .unwrap_or_else(|| find_entry(&entries, &id))?;
            let raw = fs::read_to_string(&translations)?;
            let units: Vec<TranslationUnit> = serde_json::from_str(&raw)?;
            let result = reinsert_translations(entry, &lang, &units, &ctx)?;
            if !result.needs_write_back {
                warn!(id = %id, lang = %lang, "nothing changed");
            }
            println!("{}", serde_json::to_string_pretty(&fields_to_value(&result.fields))?);
        }
    }
    Ok(())
}
