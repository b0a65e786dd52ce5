//! `junkyard delete` command handler

use std::io::{BufRead, Write};

use colored::Colorize;
use serde::Serialize;

use junkyard_inventory::{InventoryStore, KeyValueStorage};

use crate::cli::DeleteArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};
use crate::state::AppState;

/// Execute the `delete` command.
///
/// Without `--yes` the operator is asked on stderr and answers on stdin.
pub async fn execute(
    args: DeleteArgs,
    state: &AppState,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let mut store = state.open_store()?;

    let report = if args.yes {
        delete_vehicle(&mut store, &args.id, |_| Ok(true))?
    } else {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut prompt = std::io::stderr();
        delete_vehicle(&mut store, &args.id, |title| {
            confirm(
                &format!("Delete {} ({})? [y/N] ", title, args.id),
                &mut input,
                &mut prompt,
            )
        })?
    };

    writer.render(&report)?;
    Ok(())
}

/// Deletes `id` after `confirm` approves. An unknown id is a no-op and the
/// confirmation is never asked.
pub fn delete_vehicle<S, F>(
    store: &mut InventoryStore<S>,
    id: &str,
    confirm: F,
) -> Result<DeleteReport, CliError>
where
    S: KeyValueStorage,
    F: FnOnce(&str) -> std::io::Result<bool>,
{
    let Some(title) = store.get(id).map(|v| v.title()) else {
        return Ok(DeleteReport {
            id: id.to_owned(),
            title: None,
            outcome: DeleteOutcome::NotFound,
            persisted: true,
        });
    };

    if !confirm(&title)? {
        return Ok(DeleteReport {
            id: id.to_owned(),
            title: Some(title),
            outcome: DeleteOutcome::Cancelled,
            persisted: true,
        });
    }

    let failures_before = store.persist_failures();
    store.delete(id);
    Ok(DeleteReport {
        id: id.to_owned(),
        title: Some(title),
        outcome: DeleteOutcome::Deleted,
        persisted: store.persist_failures() == failures_before,
    })
}

/// Writes `question` and reads one line. Only `y`/`yes` confirm.
pub fn confirm(
    question: &str,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> std::io::Result<bool> {
    write!(out, "{}", question)?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    Cancelled,
}

#[derive(Debug, Serialize)]
pub struct DeleteReport {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub outcome: DeleteOutcome,
    pub persisted: bool,
}

impl Render for DeleteReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        let title = self.title.as_deref().unwrap_or("vehicle");
        match self.outcome {
            DeleteOutcome::Deleted => {
                writeln!(w, "{} {} ({})", "Deleted".red().bold(), title, self.id)?
            }
            DeleteOutcome::NotFound => writeln!(w, "No vehicle with id {}", self.id)?,
            DeleteOutcome::Cancelled => writeln!(w, "Cancelled; {} kept", title)?,
        }
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
