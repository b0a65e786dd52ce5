//! `junkyard scan` command handler
//!
//! Runs the scan pipeline against the selected camera, then decodes the
//! captured VIN the same way `junkyard decode` does. Ctrl-C cancels the scan
//! and releases the camera.

use std::io::Write;

use colored::Colorize;
use serde::Serialize;
use tracing::{info, warn};

use junkyard_inventory::PartsCatalog;
use junkyard_scanner::{
    BlankCamera, CameraSource, CancellationToken, FrameFileCamera, HostCapabilities, ScanOutcome,
    ScanPipeline, ScanSettings, UnavailableCamera,
};
use junkyard_vin::{VehicleLookup, VinResolver};

use crate::cli::ScanArgs;
use crate::commands::decode::{DecodeReport, build_decode_report};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};
use crate::state::AppState;

/// Execute the `scan` command.
pub async fn execute(
    args: ScanArgs,
    state: &AppState,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let settings = ScanSettings::from_config(&state.config.scanner);
    let catalog = state.load_catalog()?;
    let resolver = state.resolver(args.offline);

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, cancelling scan");
                cancel.cancel();
            }
        })
    };

    let result = match (&args.frames, args.demo) {
        (Some(path), _) => {
            let camera = FrameFileCamera::from_path(path).await?;
            let pipeline =
                ScanPipeline::new(camera, HostCapabilities::with_barcode_detection(), settings);
            scan_and_decode(pipeline, cancel, &resolver, &catalog).await
        }
        (None, true) => {
            let pipeline = ScanPipeline::new(BlankCamera, HostCapabilities::default(), settings);
            scan_and_decode(pipeline, cancel, &resolver, &catalog).await
        }
        (None, false) => {
            let pipeline = ScanPipeline::new(
                UnavailableCamera::default(),
                HostCapabilities::default(),
                settings,
            );
            scan_and_decode(pipeline, cancel, &resolver, &catalog).await
        }
    };
    interrupt.abort();

    writer.render(&result?)?;
    Ok(())
}

/// Scans once and decodes the captured VIN.
///
/// Feedback about invalid reads is logged when the scan fails, since there is
/// no report to carry it.
pub async fn scan_and_decode<C, L>(
    mut pipeline: ScanPipeline<C>,
    cancel: CancellationToken,
    resolver: &VinResolver<L>,
    catalog: &PartsCatalog,
) -> Result<ScanReport, CliError>
where
    C: CameraSource,
    L: VehicleLookup,
{
    let result = pipeline.scan(cancel).await;
    let feedback: Vec<String> = pipeline.feedback().iter().map(ToString::to_string).collect();
    let detector = pipeline.detector_name().to_owned();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            for line in &feedback {
                warn!(feedback = line.as_str(), "scan feedback");
            }
            return Err(e.into());
        }
    };

    let vehicle = match &outcome {
        ScanOutcome::Captured(vin) => Some(build_decode_report(resolver, catalog, vin).await),
        ScanOutcome::Cancelled => None,
    };

    Ok(ScanReport {
        captured: vehicle.is_some(),
        detector,
        feedback,
        vehicle,
    })
}

#[derive(Debug, Serialize)]
pub struct ScanReport {
    /// `false` when the scan was cancelled
    pub captured: bool,
    pub detector: String,
    pub feedback: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<DecodeReport>,
}

impl Render for ScanReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        for line in &self.feedback {
            writeln!(w, "  {}", line.yellow())?;
        }
        match &self.vehicle {
            Some(report) => {
                writeln!(w, "{} (detector: {})", "Captured".green().bold(), self.detector)?;
                writeln!(w)?;
                report.render_text(w)
            }
            None => writeln!(w, "Scan cancelled"),
        }
    }
}
