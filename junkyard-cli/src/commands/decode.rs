//! `junkyard decode` command handler

use std::io::Write;

use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use junkyard_core::types::DecodedVehicleAttributes;
use junkyard_core::vin::Vin;
use junkyard_inventory::parts::parts_total;
use junkyard_inventory::{PartsCatalog, generate_parts, suggested_price};
use junkyard_vin::{VehicleLookup, VinResolver};

use crate::cli::DecodeArgs;
use crate::commands::list::{PartLine, render_parts};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};
use crate::state::AppState;

/// Execute the `decode` command.
pub async fn execute(
    args: DecodeArgs,
    state: &AppState,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let vin = Vin::parse(&args.vin)?;
    let catalog = state.load_catalog()?;
    let resolver = state.resolver(args.offline);

    let report = build_decode_report(&resolver, &catalog, &vin).await;
    writer.render(&report)?;
    Ok(())
}

/// Resolves `vin` and previews the parts list it would generate.
pub async fn build_decode_report<L: VehicleLookup>(
    resolver: &VinResolver<L>,
    catalog: &PartsCatalog,
    vin: &Vin,
) -> DecodeReport {
    let resolved = resolver.resolve(vin).await;
    let attrs = resolved.attributes;
    let parts = generate_parts(catalog, &attrs.make, attrs.body_type);

    info!(
        vin = %vin,
        source = %resolved.source,
        make = attrs.make.as_str(),
        model = attrs.model.as_str(),
        parts = parts.len(),
        "vin decoded"
    );

    DecodeReport {
        vin: vin.to_string(),
        source: resolved.source.to_string(),
        region: resolved.region.map(|r| r.to_string()),
        parts_total: parts_total(&parts),
        suggested_price: suggested_price(&parts),
        parts: parts.iter().map(PartLine::from).collect(),
        attributes: attrs,
    }
}

#[derive(Debug, Serialize)]
pub struct DecodeReport {
    pub vin: String,
    /// `remote` or `local`
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub attributes: DecodedVehicleAttributes,
    pub parts: Vec<PartLine>,
    pub parts_total: Decimal,
    pub suggested_price: Decimal,
}

impl Render for DecodeReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        let a = &self.attributes;
        writeln!(w, "VIN {}", self.vin.bold())?;
        match &self.region {
            Some(region) => writeln!(w, "  Source: {} ({} decoder)", self.source, region)?,
            None => writeln!(w, "  Source: {}", self.source)?,
        }
        writeln!(w, "  Make:   {}", a.make)?;
        writeln!(w, "  Model:  {}", a.model)?;
        writeln!(w, "  Year:   {}", a.year)?;
        writeln!(w, "  Engine: {}", a.engine)?;
        writeln!(w, "  Trim:   {}", a.trim)?;
        writeln!(w, "  Body:   {}", a.body_type)?;
        if let Some(color) = &a.color {
            writeln!(w, "  Color:  {}", color)?;
        }
        writeln!(w)?;
        writeln!(
            w,
            "  Generated parts: {} (total ${})",
            self.parts.len(),
            self.parts_total
        )?;
        render_parts(w, &self.parts)?;
        writeln!(
            w,
            "  Suggested price: {}",
            format!("${}", self.suggested_price).green().bold()
        )?;
        Ok(())
    }
}
