//! `junkyard list` command handler
//!
//! Also defines [`VehicleCard`], the rendered form of a vehicle shared by
//! every command that prints one.

use std::io::Write;

use chrono::{DateTime, Utc};
use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;

use junkyard_core::types::{PartCondition, PartRecord, PartSource, PartStatus, VehicleRecord};

use crate::cli::ListArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render, truncate};
use crate::state::AppState;

/// Execute the `list` command.
pub async fn execute(
    args: ListArgs,
    state: &AppState,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let store = state.open_store()?;
    let vehicles = match args.search.as_deref() {
        Some(term) => store.search(term),
        None => store.vehicles().iter().collect(),
    };
    let report = InventoryListReport::new(args.search, vehicles);
    writer.render(&report)?;
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct InventoryListReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub total: usize,
    pub vehicles: Vec<VehicleCard>,
}

impl InventoryListReport {
    pub fn new<'a>(
        search: Option<String>,
        vehicles: impl IntoIterator<Item = &'a VehicleRecord>,
    ) -> Self {
        let vehicles: Vec<VehicleCard> = vehicles.into_iter().map(VehicleCard::from).collect();
        Self {
            search,
            total: vehicles.len(),
            vehicles,
        }
    }
}

impl Render for InventoryListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        match &self.search {
            Some(term) => writeln!(
                w,
                "Inventory ({} matching '{}')",
                self.total.to_string().bold(),
                term
            )?,
            None => writeln!(w, "Inventory ({} vehicles)", self.total.to_string().bold())?,
        }

        if self.vehicles.is_empty() {
            writeln!(w, "  No vehicles found.")?;
            return Ok(());
        }

        for card in &self.vehicles {
            writeln!(w)?;
            card.render_text(w)?;
        }
        Ok(())
    }
}

/// One vehicle as shown to the operator.
///
/// Attachment and photo payloads are left out; only their metadata is shown.
#[derive(Debug, Serialize)]
pub struct VehicleCard {
    pub id: String,
    pub vin: String,
    pub title: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: Decimal,
    pub location: String,
    pub color: String,
    pub engine: String,
    pub trim: String,
    pub created_at: DateTime<Utc>,
    pub parts_total: Decimal,
    pub available_parts: usize,
    pub sold_parts: usize,
    pub reserved_parts: usize,
    pub parts: Vec<PartLine>,
    pub attachments: Vec<AttachmentLine>,
    pub has_photo: bool,
}

impl From<&VehicleRecord> for VehicleCard {
    fn from(v: &VehicleRecord) -> Self {
        Self {
            id: v.id.clone(),
            vin: v.vin.to_string(),
            title: v.title(),
            make: v.make.clone(),
            model: v.model.clone(),
            year: v.year,
            price: v.price,
            location: v.location.clone(),
            color: v.color.clone(),
            engine: v.engine.clone(),
            trim: v.trim.clone(),
            created_at: v.created_at,
            parts_total: v.parts_total(),
            available_parts: v.count_parts(PartStatus::Available),
            sold_parts: v.count_parts(PartStatus::Sold),
            reserved_parts: v.count_parts(PartStatus::Reserved),
            parts: v.parts.iter().map(PartLine::from).collect(),
            attachments: v
                .attachments
                .iter()
                .map(|a| AttachmentLine {
                    id: a.id.clone(),
                    file_name: a.file_name.clone(),
                    mime_type: a.mime_type.clone(),
                    size: a.size,
                })
                .collect(),
            has_photo: v.photo.is_some(),
        }
    }
}

impl Render for VehicleCard {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "{}  ({})", self.title.bold(), self.id)?;
        writeln!(
            w,
            "  VIN: {}   Price: ${}   Location: {}",
            self.vin, self.price, self.location
        )?;
        writeln!(
            w,
            "  Color: {}   Engine: {}   Trim: {}",
            or_dash(&self.color),
            or_dash(&self.engine),
            or_dash(&self.trim)
        )?;
        writeln!(
            w,
            "  Added: {}{}",
            self.created_at.format("%Y-%m-%d %H:%M UTC"),
            if self.has_photo { "   [photo]" } else { "" }
        )?;

        writeln!(
            w,
            "  Parts: {} (total ${}) {} available, {} sold, {} reserved",
            self.parts.len(),
            self.parts_total,
            self.available_parts,
            self.sold_parts,
            self.reserved_parts
        )?;
        if !self.parts.is_empty() {
            render_parts(w, &self.parts)?;
        }

        if !self.attachments.is_empty() {
            writeln!(w, "  Attachments:")?;
            for a in &self.attachments {
                writeln!(w, "    {} ({}, {} bytes)", a.file_name, a.mime_type, a.size)?;
            }
        }
        Ok(())
    }
}

/// Indented part table.
pub fn render_parts(w: &mut dyn Write, parts: &[PartLine]) -> std::io::Result<()> {
    writeln!(
        w,
        "    {:<36} {:<26} {:>10} {:<8} Status",
        "ID", "Name", "Price", "Cond."
    )?;
    writeln!(w, "    {}", "-".repeat(92))?;
    for p in parts {
        let status = p.status.to_string();
        let status = match p.status {
            PartStatus::Available => status.green(),
            PartStatus::Sold => status.red(),
            PartStatus::Reserved => status.yellow(),
        };
        writeln!(
            w,
            "    {:<36} {:<26} {:>10} {:<8} {}",
            p.id,
            truncate(&p.name, 26),
            format!("${}", p.price),
            p.condition.to_string(),
            status
        )?;
    }
    Ok(())
}

fn or_dash(s: &str) -> &str {
    if s.trim().is_empty() { "-" } else { s }
}

#[derive(Debug, Serialize)]
pub struct PartLine {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub condition: PartCondition,
    pub status: PartStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PartSource>,
}

impl From<&PartRecord> for PartLine {
    fn from(p: &PartRecord) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            price: p.price,
            condition: p.condition,
            status: p.status,
            category: p.category.clone(),
            source: p.source,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AttachmentLine {
    pub id: String,
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
}
