//! `junkyard part-status` command handler

use std::io::Write;

use serde::Serialize;

use junkyard_core::error::ValidationError;
use junkyard_core::types::PartStatus;
use junkyard_inventory::{InventoryStore, KeyValueStorage};

use crate::cli::PartStatusArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};
use crate::state::AppState;

/// Execute the `part-status` command.
pub async fn execute(
    args: PartStatusArgs,
    state: &AppState,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let status = parse_status(&args.status)?;
    let mut store = state.open_store()?;
    let report = update_status(&mut store, &args.vehicle_id, &args.part_id, status)?;
    writer.render(&report)?;
    Ok(())
}

fn parse_status(raw: &str) -> Result<PartStatus, ValidationError> {
    PartStatus::from_str_loose(raw).ok_or_else(|| ValidationError::InvalidField {
        field: "status".to_owned(),
        reason: format!("'{raw}' is not one of available, sold, reserved"),
    })
}

pub fn update_status<S: KeyValueStorage>(
    store: &mut InventoryStore<S>,
    vehicle_id: &str,
    part_id: &str,
    status: PartStatus,
) -> Result<PartStatusReport, CliError> {
    let failures_before = store.persist_failures();
    if !store.update_part_status(vehicle_id, part_id, status) {
        return Err(CliError::Command(format!(
            "no part {part_id} on vehicle {vehicle_id}"
        )));
    }

    let (vehicle, part) = store
        .get(vehicle_id)
        .and_then(|v| v.find_part(part_id).map(|p| (v.title(), p.name.clone())))
        .unwrap_or_default();

    Ok(PartStatusReport {
        vehicle_id: vehicle_id.to_owned(),
        part_id: part_id.to_owned(),
        vehicle,
        part,
        status,
        persisted: store.persist_failures() == failures_before,
    })
}

#[derive(Debug, Serialize)]
pub struct PartStatusReport {
    pub vehicle_id: String,
    pub part_id: String,
    pub vehicle: String,
    pub part: String,
    pub status: PartStatus,
    pub persisted: bool,
}

impl Render for PartStatusReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "{} on {} is now {}",
            self.part,
            self.vehicle,
            self.status.to_string().bold()
        )?;
        if !self.persisted {
            writeln!(
                w,
                "  {}",
                "warning: could not save inventory; changes are not on disk".yellow()
            )?;
        }
        Ok(())
    }
}
