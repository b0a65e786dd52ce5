#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`ScannerError`)
//! - [`camera`]: Camera abstraction (`CameraSource`, `CameraStream`, scripted/blank/unavailable cameras)
//! - [`detector`]: Barcode detection (`BarcodeDetector`, `SymbolDetector`, `DemoFallbackDetector`)
//! - [`pipeline`]: Scan state machine (`ScanPipeline`, `ScanState`)
//!
//! # Architecture
//!
//! ```text
//! CameraSource.acquire() --> CameraStream
//!                                 |
//!                    frame_rate ticks (next_frame)
//!                                 |
//!                     BarcodeDetector.detect()
//!                                 |
//!                           Vin::parse()
//!                        /              \
//!               invalid: feedback     valid: capture_delay
//!                                            |
//!                                  release camera, return Vin
//! ```

pub mod camera;
pub mod detector;
pub mod error;
pub mod pipeline;

// --- Public API Re-exports ---

// Pipeline
pub use pipeline::{MAX_FEEDBACK, ScanFeedback, ScanOutcome, ScanPipeline, ScanSettings, ScanState};

// Error
pub use error::ScannerError;

// Camera
pub use camera::{
    BlankCamera, CameraSource, CameraStream, Frame, FrameFileCamera, UnavailableCamera,
};

// Detector
pub use detector::{
    BarcodeDetector, DEFAULT_DEMO_VINS, DemoFallbackDetector, HostCapabilities, SymbolDetector,
};

// Re-exported so callers can cancel a running scan without depending on tokio-util.
pub use tokio_util::sync::CancellationToken;
