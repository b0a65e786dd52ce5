//! `junkyard catalog` command handler

use std::collections::BTreeSet;
use std::io::Write;

use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;

use junkyard_core::types::PartsCatalogEntry;
use junkyard_inventory::{KeyValueStorage, PartsCatalog};

use crate::cli::{CatalogAction, CatalogArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render, truncate};
use crate::state::AppState;

/// Execute the `catalog` command.
pub async fn execute(
    args: CatalogArgs,
    state: &AppState,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let mut catalog = state.load_catalog()?;
    match args.action {
        CatalogAction::List { make } => {
            writer.render(&CatalogListReport::new(&catalog, make))?;
        }
        CatalogAction::Add {
            name,
            category,
            price,
            makes,
            description,
        } => {
            let entry = PartsCatalogEntry {
                category,
                default_price: price,
                compatible_makes: makes.into_iter().collect(),
                description,
            };
            let report = add_entry(
                &mut catalog,
                state.storage(),
                &state.config.storage.catalog_key,
                &name,
                entry,
            )?;
            writer.render(&report)?;
        }
    }
    Ok(())
}

/// Inserts (or replaces) an entry and persists the catalog.
pub fn add_entry<S: KeyValueStorage + ?Sized>(
    catalog: &mut PartsCatalog,
    storage: &S,
    key: &str,
    name: &str,
    entry: PartsCatalogEntry,
) -> Result<CatalogAddReport, CliError> {
    let replaced = catalog.get(name.trim()).is_some();
    catalog.insert(storage, key, name, entry)?;
    let name = name.trim();
    let entry = catalog
        .get(name)
        .map(|e| CatalogLine::new(name, e))
        .ok_or_else(|| CliError::Command(format!("catalog entry {name} missing after insert")))?;
    Ok(CatalogAddReport {
        entry,
        replaced,
        total: catalog.len(),
    })
}

#[derive(Debug, Serialize)]
pub struct CatalogLine {
    pub name: String,
    pub category: String,
    pub default_price: Decimal,
    pub compatible_makes: BTreeSet<String>,
    pub description: String,
}

impl CatalogLine {
    fn new(name: &str, entry: &PartsCatalogEntry) -> Self {
        Self {
            name: name.to_owned(),
            category: entry.category.clone(),
            default_price: entry.default_price,
            compatible_makes: entry.compatible_makes.clone(),
            description: entry.description.clone(),
        }
    }

    fn makes(&self) -> String {
        self.compatible_makes
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogListReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    pub total: usize,
    pub entries: Vec<CatalogLine>,
}

impl CatalogListReport {
    pub fn new(catalog: &PartsCatalog, make: Option<String>) -> Self {
        let entries: Vec<CatalogLine> = match make.as_deref() {
            Some(make) => catalog
                .entries_for_make(make)
                .map(|(name, e)| CatalogLine::new(name, e))
                .collect(),
            None => catalog
                .iter()
                .map(|(name, e)| CatalogLine::new(name, e))
                .collect(),
        };
        Self {
            make,
            total: entries.len(),
            entries,
        }
    }
}

impl Render for CatalogListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        match &self.make {
            Some(make) => writeln!(
                w,
                "Parts Catalog ({} entries for {})",
                self.total.to_string().bold(),
                make
            )?,
            None => writeln!(w, "Parts Catalog ({} entries)", self.total.to_string().bold())?,
        }
        writeln!(w)?;
        writeln!(
            w,
            "{:<26} {:<14} {:>10} {:<20} Description",
            "Name", "Category", "Price", "Makes"
        )?;
        writeln!(w, "{}", "-".repeat(90))?;
        for e in &self.entries {
            writeln!(
                w,
                "{:<26} {:<14} {:>10} {:<20} {}",
                truncate(&e.name, 26),
                truncate(&e.category, 14),
                format!("${}", e.default_price),
                truncate(&e.makes(), 20),
                e.description
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogAddReport {
    pub entry: CatalogLine,
    pub replaced: bool,
    pub total: usize,
}

impl Render for CatalogAddReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        let verb = if self.replaced { "Updated" } else { "Added" };
        writeln!(
            w,
            "{} catalog entry {} ({}, ${}, makes: {})",
            verb.green().bold(),
            self.entry.name.bold(),
            self.entry.category,
            self.entry.default_price,
            self.entry.makes()
        )?;
        writeln!(w, "  Catalog now has {} entries", self.total)
    }
}
