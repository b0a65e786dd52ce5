//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "junkyard.toml";

/// Junkyard -- salvage yard inventory manager.
///
/// Use `junkyard <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "junkyard", version, about, long_about = None)]
pub struct Cli {
    /// Path to the junkyard.toml configuration file [default: junkyard.toml].
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Config path to load and whether the user named it explicitly.
    ///
    /// Only an implicit default path may be missing.
    pub fn config_source(&self) -> (&Path, bool) {
        match &self.config {
            Some(path) => (path.as_path(), true),
            None => (Path::new(DEFAULT_CONFIG_PATH), false),
        }
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a vehicle in the inventory.
    Add(AddArgs),

    /// List inventory cards.
    List(ListArgs),

    /// Delete a vehicle and everything attached to it.
    Delete(DeleteArgs),

    /// Change the sale status of one part.
    PartStatus(PartStatusArgs),

    /// Decode a VIN into vehicle attributes and a parts list.
    Decode(DecodeArgs),

    /// Scan a VIN barcode, then decode it.
    Scan(ScanArgs),

    /// Manage the parts catalog.
    Catalog(CatalogArgs),

    /// Show inventory aggregates.
    Dashboard,

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- add ----

/// Register a vehicle.
///
/// With `--decode`, attributes and parts come from the VIN first; any field
/// flag given explicitly overrides the decoded value.
#[derive(Args, Debug, Default)]
pub struct AddArgs {
    /// 17-character VIN.
    #[arg(long)]
    pub vin: String,

    #[arg(long)]
    pub make: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub year: Option<i32>,

    /// Vehicle price. Filled from the suggested price when omitted.
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Yard location (row, lot, ...).
    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub engine: Option<String>,

    #[arg(long)]
    pub trim: Option<String>,

    /// Photo file stored as the vehicle's main picture.
    #[arg(long)]
    pub photo: Option<PathBuf>,

    /// File to attach (repeatable).
    #[arg(long = "attach", value_name = "FILE")]
    pub attachments: Vec<PathBuf>,

    /// Common part added at its list price (repeatable).
    #[arg(long = "part", value_name = "NAME")]
    pub parts: Vec<String>,

    /// Custom part as NAME=PRICE (repeatable).
    #[arg(long = "custom-part", value_name = "NAME=PRICE", value_parser = parse_custom_part)]
    pub custom_parts: Vec<CustomPart>,

    /// Fill attributes and generate parts from the VIN.
    #[arg(long)]
    pub decode: bool,

    /// Skip the remote lookup and decode locally.
    #[arg(long)]
    pub offline: bool,
}

/// A `NAME=PRICE` pair from `--custom-part`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomPart {
    pub name: String,
    pub price: Decimal,
}

/// Parses `NAME=PRICE`. The last `=` separates the price, so names may contain `=`.
pub fn parse_custom_part(s: &str) -> Result<CustomPart, String> {
    let (name, price) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=PRICE, got '{s}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("part name must not be empty".to_owned());
    }
    let price: Decimal = price
        .trim()
        .parse()
        .map_err(|e| format!("invalid price '{}': {e}", price.trim()))?;
    Ok(CustomPart {
        name: name.to_owned(),
        price,
    })
}

// ---- list ----

/// List inventory cards.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Case-insensitive filter on VIN, make, model and location.
    #[arg(short, long)]
    pub search: Option<String>,
}

// ---- delete ----

/// Delete a vehicle.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Vehicle ID.
    pub id: String,

    /// Skip the confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

// ---- part-status ----

/// Change a part's sale status.
#[derive(Args, Debug)]
pub struct PartStatusArgs {
    pub vehicle_id: String,

    pub part_id: String,

    /// New status (available, sold, reserved).
    pub status: String,
}

// ---- decode ----

/// Decode a VIN.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    pub vin: String,

    /// Skip the remote lookup and decode locally.
    #[arg(long)]
    pub offline: bool,
}

// ---- scan ----

/// Scan a VIN barcode.
///
/// Without `--frames` or `--demo` no camera is available and the scan is
/// denied.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Frame script file, one decoded symbol per line (blank = no symbol).
    #[arg(long, value_name = "FILE", conflicts_with = "demo")]
    pub frames: Option<PathBuf>,

    /// Run without barcode detection; a demo VIN is returned after a delay.
    #[arg(long)]
    pub demo: bool,

    /// Skip the remote lookup and decode locally.
    #[arg(long)]
    pub offline: bool,
}

// ---- catalog ----

/// Manage the parts catalog.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub action: CatalogAction,
}

#[derive(Subcommand, Debug)]
pub enum CatalogAction {
    /// List catalog entries.
    List {
        /// Only entries compatible with this make.
        #[arg(long)]
        make: Option<String>,
    },
    /// Add or replace a catalog entry.
    Add {
        /// Part name.
        name: String,

        #[arg(long)]
        category: String,

        /// Default price for generated parts.
        #[arg(long)]
        price: Decimal,

        /// Compatible makes, comma separated. `ALL` matches every make.
        #[arg(long, value_delimiter = ',', default_value = "ALL")]
        makes: Vec<String>,

        #[arg(long, default_value = "")]
        description: String,
    },
}

// ---- config ----

/// Manage junkyard configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, storage, inventory, lookup, scanner, attachments).
        #[arg(long)]
        section: Option<String>,
    },
}
