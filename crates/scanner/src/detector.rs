//! Barcode detection.
//!
//! The detector is chosen once, at construction, from [`HostCapabilities`]:
//!
//! - host can decode barcodes: [`SymbolDetector`] reports what the host decoded
//! - otherwise: [`DemoFallbackDetector`] waits a fixed delay, then returns a
//!   VIN drawn from a static demo pool

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::camera::Frame;

/// Demo VINs used when no pool is configured.
pub const DEFAULT_DEMO_VINS: [&str; 3] = [
    "1N4AL3AP8JC231503",
    "1HGCM82633A004352",
    "5YJ3E1EA7KF317000",
];

/// What the host environment can do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostCapabilities {
    /// The host exposes a barcode detection capability.
    pub barcode_detection: bool,
}

impl HostCapabilities {
    pub fn with_barcode_detection() -> Self {
        Self {
            barcode_detection: true,
        }
    }
}

/// Frame-level barcode detector.
pub trait BarcodeDetector: Send {
    fn name(&self) -> &'static str;

    /// Inspects one frame. `elapsed` is the time since streaming started.
    ///
    /// Returns the raw code read, which may not be a valid VIN.
    fn detect(&mut self, frame: &Frame, elapsed: Duration) -> Option<String>;
}

/// Reports the symbol the host decoded from the frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolDetector;

impl BarcodeDetector for SymbolDetector {
    fn name(&self) -> &'static str {
        "symbol"
    }

    fn detect(&mut self, frame: &Frame, _elapsed: Duration) -> Option<String> {
        frame.symbol.clone()
    }
}

/// Timed fallback that fires once after `delay`.
#[derive(Debug)]
pub struct DemoFallbackDetector {
    pool: Vec<String>,
    delay: Duration,
    fired: bool,
    rng: StdRng,
}

impl DemoFallbackDetector {
    /// An empty `pool` falls back to [`DEFAULT_DEMO_VINS`].
    pub fn new(pool: Vec<String>, delay: Duration) -> Self {
        Self::with_rng(pool, delay, StdRng::from_entropy())
    }

    pub fn with_rng(pool: Vec<String>, delay: Duration, rng: StdRng) -> Self {
        let pool = if pool.is_empty() {
            DEFAULT_DEMO_VINS.iter().map(|v| (*v).to_owned()).collect()
        } else {
            pool
        };
        Self {
            pool,
            delay,
            fired: false,
            rng,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn pool(&self) -> &[String] {
        &self.pool
    }
}

impl BarcodeDetector for DemoFallbackDetector {
    fn name(&self) -> &'static str {
        "demo-fallback"
    }

    fn detect(&mut self, _frame: &Frame, elapsed: Duration) -> Option<String> {
        if self.fired || elapsed < self.delay || self.pool.is_empty() {
            return None;
        }
        self.fired = true;
        let index = self.rng.gen_range(0..self.pool.len());
        let vin = self.pool[index].clone();
        info!(
            vin = vin.as_str(),
            elapsed_ms = elapsed.as_millis() as u64,
            "demo fallback fired"
        );
        Some(vin)
    }
}

/// Picks the detector for the given host.
pub fn detector_for(
    capabilities: HostCapabilities,
    demo_pool: Vec<String>,
    fallback_delay: Duration,
) -> Box<dyn BarcodeDetector> {
    if capabilities.barcode_detection {
        Box::new(SymbolDetector)
    } else {
        Box::new(DemoFallbackDetector::new(demo_pool, fallback_delay))
    }
}
