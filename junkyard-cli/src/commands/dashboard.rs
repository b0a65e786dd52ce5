//! `junkyard dashboard` command handler

use std::io::Write;

use colored::Colorize;
use serde::Serialize;

use junkyard_inventory::DashboardSummary;

use crate::error::CliError;
use crate::output::{OutputWriter, Render};
use crate::state::AppState;

/// Execute the `dashboard` command.
pub async fn execute(state: &AppState, writer: &OutputWriter) -> Result<(), CliError> {
    let store = state.open_store()?;
    let report = DashboardReport(DashboardSummary::compute(store.vehicles()));
    writer.render(&report)?;
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct DashboardReport(pub DashboardSummary);

impl Render for DashboardReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        let s = &self.0;
        writeln!(w, "{}", "Inventory Dashboard".bold())?;
        writeln!(w)?;
        writeln!(w, "  Vehicles:          {}", s.total_vehicles)?;
        writeln!(w, "  Inventory value:   ${}", s.inventory_value)?;
        writeln!(w)?;
        writeln!(w, "  Parts:             {}", s.total_parts)?;
        writeln!(
            w,
            "    available:       {} (${})",
            s.available_parts.to_string().green(),
            s.available_parts_value
        )?;
        writeln!(
            w,
            "    sold:            {} (${})",
            s.sold_parts.to_string().red(),
            s.sold_revenue
        )?;
        writeln!(
            w,
            "    reserved:        {}",
            s.reserved_parts.to_string().yellow()
        )?;

        if !s.makes.is_empty() {
            writeln!(w)?;
            writeln!(w, "  By make:")?;
            for (make, count) in &s.makes {
                writeln!(w, "    {:<18} {}", make, count)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_dashboard_render_text() {
        let mut summary = DashboardSummary {
            total_vehicles: 2,
            total_parts: 7,
            available_parts: 5,
            sold_parts: 1,
            reserved_parts: 1,
            inventory_value: Decimal::from(3400),
            available_parts_value: Decimal::from(900),
            sold_revenue: Decimal::from(500),
            ..DashboardSummary::default()
        };
        summary.makes.insert("NISSAN".to_owned(), 1);
        summary.makes.insert("HONDA".to_owned(), 1);

        let mut buffer = Vec::new();
        DashboardReport(summary)
            .render_text(&mut buffer)
            .expect("text rendering should succeed");
        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("Vehicles:          2"));
        assert!(output.contains("$3400"));
        assert!(output.contains("By make:"));
        assert!(output.contains("NISSAN"));
    }

    #[test]
    fn test_dashboard_json_is_flat() {
        let report = DashboardReport(DashboardSummary::default());
        let json = serde_json::to_string(&report).expect("JSON serialization should succeed");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("should parse JSON");
        assert_eq!(parsed["total_vehicles"].as_u64(), Some(0));
        assert!(parsed["makes"].as_object().is_some_and(|m| m.is_empty()));
    }
}
