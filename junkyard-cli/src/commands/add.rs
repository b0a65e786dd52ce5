//! `junkyard add` command handler
//!
//! Builds a [`VehicleDraft`] from the flags, optionally decoding the VIN first,
//! reads photo and attachments, then hands the draft to the inventory store.
//! Any failure before the store accepts the vehicle leaves the inventory untouched.

use std::io::Write;

use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use junkyard_core::vin::Vin;
use junkyard_inventory::{
    InventoryStore, KeyValueStorage, PartsCatalog, VehicleDraft, read_attachment,
};
use junkyard_vin::{VehicleLookup, VinResolver};

use crate::cli::AddArgs;
use crate::commands::list::VehicleCard;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};
use crate::state::AppState;

/// Execute the `add` command.
pub async fn execute(
    args: AddArgs,
    state: &AppState,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let catalog = state.load_catalog()?;
    let resolver = state.resolver(args.offline);
    let max_size = state.config.attachments.max_size_bytes;

    let (draft, decoded_from) = build_draft(args, &resolver, &catalog, max_size).await?;

    let mut store = state.open_store()?;
    let report = add_vehicle(&mut store, draft, decoded_from)?;
    writer.render(&report)?;
    Ok(())
}

/// Fills a draft from the command flags.
///
/// Returns the draft and, when `--decode` was given, where the attributes
/// came from (`remote` or `local`).
pub async fn build_draft<L: VehicleLookup>(
    args: AddArgs,
    resolver: &VinResolver<L>,
    catalog: &PartsCatalog,
    max_attachment_size: u64,
) -> Result<(VehicleDraft, Option<String>), CliError> {
    let mut draft = VehicleDraft::new();
    draft.vin = args.vin.trim().to_uppercase();

    let mut decoded_from = None;
    if args.decode {
        let vin = Vin::parse(&draft.vin)?;
        let resolved = resolver.resolve(&vin).await;
        draft.apply_decoded(&resolved.attributes, catalog);
        decoded_from = Some(resolved.source.to_string());
    }

    // Explicit flags win over decoded values.
    if let Some(make) = args.make {
        draft.make = make;
    }
    if let Some(model) = args.model {
        draft.model = model;
    }
    if let Some(year) = args.year {
        draft.year = Some(year);
    }
    if let Some(location) = args.location {
        draft.location = location;
    }
    if let Some(color) = args.color {
        draft.color = color;
    }
    if let Some(engine) = args.engine {
        draft.engine = engine;
    }
    if let Some(trim) = args.trim {
        draft.trim = trim;
    }

    for name in &args.parts {
        draft.add_common_part(name)?;
    }
    for part in &args.custom_parts {
        draft.add_custom_part(&part.name, Some(part.price))?;
    }

    draft.price = args.price;
    if let Some(suggested) = draft.fill_suggested_price() {
        info!(price = %suggested, "price filled from suggested price");
    }

    if let Some(path) = &args.photo {
        let photo = read_attachment(path, max_attachment_size).await?;
        draft.set_photo(photo.content);
    }
    for path in &args.attachments {
        draft.add_attachment(read_attachment(path, max_attachment_size).await?);
    }

    Ok((draft, decoded_from))
}

/// Commits a draft to the store.
pub fn add_vehicle<S: KeyValueStorage>(
    store: &mut InventoryStore<S>,
    draft: VehicleDraft,
    decoded_from: Option<String>,
) -> Result<AddReport, CliError> {
    let suggested_price = (!draft.parts.is_empty()).then(|| draft.suggested_price());
    let failures_before = store.persist_failures();
    let record = store.add(draft.into_new_vehicle())?;
    let vehicle = VehicleCard::from(record);
    let persisted = store.persist_failures() == failures_before;
    if !persisted {
        warn!(id = vehicle.id.as_str(), "vehicle kept in memory only");
    }
    Ok(AddReport {
        vehicle,
        decoded_from,
        suggested_price,
        persisted,
    })
}

#[derive(Debug, Serialize)]
pub struct AddReport {
    pub vehicle: VehicleCard,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoded_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_price: Option<Decimal>,
    /// `false` when saving to the data directory failed
    pub persisted: bool,
}

impl Render for AddReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "{} {}", "Added".green().bold(), self.vehicle.title)?;
        if let Some(source) = &self.decoded_from {
            writeln!(w, "  Attributes decoded ({})", source)?;
        }
        if let Some(price) = self.suggested_price {
            writeln!(w, "  Suggested price: ${}", price)?;
        }
        if !self.persisted {
            writeln!(
                w,
                "  {}",
                "warning: could not save inventory; changes are not on disk".yellow()
            )?;
        }
        writeln!(w)?;
        self.vehicle.render_text(w)
    }
}
