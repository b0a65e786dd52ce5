//! Scan pipeline state machine.
//!
//! ```text
//! Idle --open--> CameraRequested --ok--> Streaming <--> Detecting --valid--> Matched --capture--> Idle
//!                       |                    |
//!                       +------denied--------+--> Error --close--> Idle
//! ```
//!
//! - Frames are sampled at `frame_rate` Hz.
//! - An invalid read is recorded as feedback and scanning continues. Repeats of
//!   the same read fold into one entry; at most [`MAX_FEEDBACK`] entries are kept.
//! - A valid read is held for `capture_delay`, then the camera is released and
//!   the VIN is returned.
//! - `close`, cancellation, errors and drop all release the camera.

use std::fmt;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use junkyard_core::config::ScannerConfig;
use junkyard_core::vin::Vin;

use crate::camera::{CameraSource, CameraStream};
use crate::detector::{BarcodeDetector, HostCapabilities, detector_for};
use crate::error::ScannerError;

/// Scanner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    CameraRequested,
    Streaming,
    Detecting,
    Matched,
    Error,
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::CameraRequested => write!(f, "requesting camera"),
            Self::Streaming => write!(f, "streaming"),
            Self::Detecting => write!(f, "detecting"),
            Self::Matched => write!(f, "matched"),
            Self::Error => write!(f, "in error"),
        }
    }
}

/// Timing settings.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub frame_interval: Duration,
    pub fallback_delay: Duration,
    pub capture_delay: Duration,
    /// Empty means the built-in demo pool.
    pub demo_vins: Vec<String>,
}

impl ScanSettings {
    pub fn from_config(config: &ScannerConfig) -> Self {
        let rate = u64::from(config.frame_rate.max(1));
        Self {
            frame_interval: Duration::from_nanos(1_000_000_000 / rate),
            fallback_delay: Duration::from_millis(config.fallback_delay_ms),
            capture_delay: Duration::from_millis(config.capture_delay_ms),
            demo_vins: config.demo_vins.clone(),
        }
    }
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self::from_config(&ScannerConfig::default())
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// A valid VIN was read and captured.
    Captured(Vin),
    /// The run was cancelled before capture.
    Cancelled,
}

/// Upper bound on retained feedback entries; the oldest entry is dropped first.
pub const MAX_FEEDBACK: usize = 8;

/// Feedback for an invalid read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFeedback {
    /// Raw code as read from the frame
    pub code: String,
    pub message: String,
    /// Consecutive frames that produced this same code
    pub repeats: u32,
}

impl fmt::Display for ScanFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.repeats > 1 {
            write!(f, "{} (x{})", self.message, self.repeats)
        } else {
            f.write_str(&self.message)
        }
    }
}

/// Scan pipeline over a camera source.
pub struct ScanPipeline<C: CameraSource> {
    camera: C,
    detector: Box<dyn BarcodeDetector>,
    settings: ScanSettings,
    state: ScanState,
    stream: Option<C::Stream>,
    feedback: Vec<ScanFeedback>,
    last_error: Option<String>,
}

impl<C: CameraSource> ScanPipeline<C> {
    /// Creates a pipeline, selecting the detector from `capabilities`.
    pub fn new(camera: C, capabilities: HostCapabilities, settings: ScanSettings) -> Self {
        let detector = detector_for(
            capabilities,
            settings.demo_vins.clone(),
            settings.fallback_delay,
        );
        Self::with_detector(camera, detector, settings)
    }

    pub fn with_detector(
        camera: C,
        detector: Box<dyn BarcodeDetector>,
        settings: ScanSettings,
    ) -> Self {
        Self {
            camera,
            detector,
            settings,
            state: ScanState::Idle,
            stream: None,
            feedback: Vec::new(),
            last_error: None,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Transient messages for invalid reads, oldest first.
    pub fn feedback(&self) -> &[ScanFeedback] {
        &self.feedback
    }

    /// User-visible message of the last error, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn detector_name(&self) -> &'static str {
        self.detector.name()
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.is_some()
    }

    /// Requests the camera.
    ///
    /// # Errors
    ///
    /// - [`ScannerError::InvalidState`] unless the scanner is idle
    /// - [`ScannerError::CameraDenied`] if access is refused; the scanner is
    ///   left in [`ScanState::Error`] until closed
    pub async fn open(&mut self) -> Result<(), ScannerError> {
        if self.state != ScanState::Idle {
            return Err(ScannerError::InvalidState {
                operation: "open",
                state: self.state,
            });
        }

        self.state = ScanState::CameraRequested;
        self.feedback.clear();
        self.last_error = None;
        debug!(camera = self.camera.name(), "camera requested");

        match self.camera.acquire().await {
            Ok(stream) => {
                self.stream = Some(stream);
                self.state = ScanState::Streaming;
                info!(
                    camera = self.camera.name(),
                    detector = self.detector.name(),
                    "scanner streaming"
                );
                Ok(())
            }
            Err(e) => {
                warn!(camera = self.camera.name(), error = %e, "camera unavailable");
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Samples frames until a valid VIN is captured, the stream ends, or
    /// `cancel` fires.
    ///
    /// Cancellation releases the camera and returns [`ScanOutcome::Cancelled`].
    ///
    /// # Errors
    ///
    /// - [`ScannerError::InvalidState`] unless the scanner is streaming
    /// - [`ScannerError::StreamEnded`] if the stream ends first
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<ScanOutcome, ScannerError> {
        if self.state != ScanState::Streaming {
            return Err(ScannerError::InvalidState {
                operation: "run",
                state: self.state,
            });
        }

        let result = self.sample(&cancel).await;
        if let Some(mut stream) = self.stream.take() {
            stream.release();
        }

        match &result {
            Ok(ScanOutcome::Captured(vin)) => {
                info!(vin = %vin, "VIN captured, camera released");
                self.state = ScanState::Idle;
            }
            Ok(ScanOutcome::Cancelled) => {
                info!("scan cancelled, camera released");
                self.state = ScanState::Idle;
            }
            Err(e) => {
                warn!(error = %e, "scan failed, camera released");
                self.fail(e);
            }
        }
        result
    }

    // 스트림은 self에 남겨 둔다. run 퓨처가 중간에 drop되어도 close/Drop이 해제한다.
    async fn sample(&mut self, cancel: &CancellationToken) -> Result<ScanOutcome, ScannerError> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(ScannerError::InvalidState {
                operation: "run",
                state: self.state,
            });
        };
        let started = Instant::now();
        let mut ticker = tokio::time::interval(self.settings.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let vin = loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(ScanOutcome::Cancelled),
                _ = ticker.tick() => {}
            }

            self.state = ScanState::Detecting;
            let Some(frame) = stream.next_frame().await else {
                return Err(ScannerError::StreamEnded);
            };

            match self.detector.detect(&frame, started.elapsed()) {
                None => {}
                Some(code) => match Vin::parse(&code) {
                    Ok(vin) => break vin,
                    Err(e) => {
                        debug!(
                            frame = frame.sequence,
                            code = code.as_str(),
                            error = %e,
                            "invalid read"
                        );
                        let message = format!("Invalid VIN read '{code}': {e}");
                        record_invalid_read(&mut self.feedback, code, message);
                    }
                },
            }
            self.state = ScanState::Streaming;
        };

        self.state = ScanState::Matched;
        info!(
            vin = %vin,
            delay_ms = self.settings.capture_delay.as_millis() as u64,
            "VIN matched"
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Ok(ScanOutcome::Cancelled),
            _ = tokio::time::sleep(self.settings.capture_delay) => Ok(ScanOutcome::Captured(vin)),
        }
    }

    /// Releases the camera and resets to [`ScanState::Idle`]. Valid in any state.
    pub fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.release();
            debug!("camera released on close");
        }
        self.state = ScanState::Idle;
    }

    /// Opens, runs and closes in one call.
    pub async fn scan(&mut self, cancel: CancellationToken) -> Result<ScanOutcome, ScannerError> {
        let result = match self.open().await {
            Ok(()) => self.run(cancel).await,
            Err(e) => Err(e),
        };
        self.close();
        result
    }

    fn fail(&mut self, err: &ScannerError) {
        if let Some(mut stream) = self.stream.take() {
            stream.release();
        }
        self.last_error = Some(err.to_string());
        self.state = ScanState::Error;
    }
}

impl<C: CameraSource> Drop for ScanPipeline<C> {
    fn drop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.release();
            debug!("camera released on drop");
        }
    }
}

// A repeat of the newest entry's code bumps its count instead of adding an entry.
fn record_invalid_read(feedback: &mut Vec<ScanFeedback>, code: String, message: String) {
    match feedback.last_mut() {
        Some(last) if last.code == code => {
            last.repeats = last.repeats.saturating_add(1);
        }
        _ => {
            if feedback.len() >= MAX_FEEDBACK {
                feedback.remove(0);
            }
            feedback.push(ScanFeedback {
                code,
                message,
                repeats: 1,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{BlankCamera, Frame, ScriptedStream, UnavailableCamera};
    use crate::detector::DemoFallbackDetector;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Camera that counts acquisitions and releases.
    #[derive(Clone, Default)]
    struct CountingCamera {
        script: Vec<Option<String>>,
        endless: bool,
        acquired: Arc<AtomicUsize>,
        released: Arc<AtomicUsize>,
    }

    impl CountingCamera {
        fn scripted(lines: &[&str]) -> Self {
            Self {
                script: lines
                    .iter()
                    .map(|l| (!l.is_empty()).then(|| (*l).to_owned()))
                    .collect(),
                ..Self::default()
            }
        }

        fn endless() -> Self {
            Self {
                endless: true,
                ..Self::default()
            }
        }

        fn acquired(&self) -> usize {
            self.acquired.load(Ordering::SeqCst)
        }

        fn released(&self) -> usize {
            self.released.load(Ordering::SeqCst)
        }
    }

    struct CountingStream {
        inner: ScriptedStream,
        endless: bool,
        sequence: u64,
        released: Arc<AtomicUsize>,
        done: bool,
    }

    impl CameraStream for CountingStream {
        async fn next_frame(&mut self) -> Option<Frame> {
            if self.done {
                return None;
            }
            if self.endless {
                self.sequence += 1;
                return Some(Frame::blank(self.sequence));
            }
            self.inner.next_frame().await
        }

        fn release(&mut self) {
            if !self.done {
                self.done = true;
                self.inner.release();
                self.released.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn is_released(&self) -> bool {
            self.done
        }
    }

    impl CameraSource for CountingCamera {
        type Stream = CountingStream;

        fn name(&self) -> &str {
            "counting"
        }

        async fn acquire(&self) -> Result<CountingStream, ScannerError> {
            self.acquired.fetch_add(1, Ordering::SeqCst);
            Ok(CountingStream {
                inner: ScriptedStream::new(self.script.clone()),
                endless: self.endless,
                sequence: 0,
                released: Arc::clone(&self.released),
                done: false,
            })
        }
    }

    fn host() -> HostCapabilities {
        HostCapabilities::with_barcode_detection()
    }

    #[tokio::test(start_paused = true)]
    async fn captures_valid_read_and_releases_camera() {
        let camera = CountingCamera::scripted(&["", "1N4AL3AP8JC231503"]);
        let mut pipeline = ScanPipeline::new(camera.clone(), host(), ScanSettings::default());

        pipeline.open().await.unwrap();
        assert_eq!(pipeline.state(), ScanState::Streaming);

        let started = Instant::now();
        let outcome = pipeline.run(CancellationToken::new()).await.unwrap();

        assert_eq!(
            outcome,
            ScanOutcome::Captured(Vin::parse("1N4AL3AP8JC231503").unwrap())
        );
        assert!(started.elapsed() >= Duration::from_millis(1000));
        assert_eq!(pipeline.state(), ScanState::Idle);
        assert_eq!(camera.acquired(), 1);
        assert_eq!(camera.released(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_reads_produce_feedback_and_scanning_continues() {
        let camera =
            CountingCamera::scripted(&["NOT-A-VIN", "1N4AL3AP8JC23150O", "1HGCM82633A004352"]);
        let mut pipeline = ScanPipeline::new(camera.clone(), host(), ScanSettings::default());

        let outcome = pipeline.scan(CancellationToken::new()).await.unwrap();
        assert_eq!(
            outcome,
            ScanOutcome::Captured(Vin::parse("1HGCM82633A004352").unwrap())
        );
        assert_eq!(pipeline.feedback().len(), 2);
        assert!(pipeline.feedback()[0].message.contains("NOT-A-VIN"));
        assert_eq!(camera.released(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_invalid_read_folds_into_one_entry() {
        let mut script = vec!["NOT-A-VIN"; 5000];
        script.push("1HGCM82633A004352");
        let camera = CountingCamera::scripted(&script);
        let mut pipeline = ScanPipeline::new(camera.clone(), host(), ScanSettings::default());

        let outcome = pipeline.scan(CancellationToken::new()).await.unwrap();
        assert!(matches!(outcome, ScanOutcome::Captured(_)));
        assert_eq!(pipeline.feedback().len(), 1);
        assert_eq!(pipeline.feedback()[0].code, "NOT-A-VIN");
        assert_eq!(pipeline.feedback()[0].repeats, 5000);
        assert!(pipeline.feedback()[0].to_string().ends_with("(x5000)"));
    }

    #[tokio::test(start_paused = true)]
    async fn distinct_invalid_reads_keep_only_the_newest() {
        let codes: Vec<String> = (0..MAX_FEEDBACK + 5).map(|i| format!("BAD-{i}")).collect();
        let mut script: Vec<&str> = codes.iter().map(String::as_str).collect();
        script.push("1HGCM82633A004352");
        let camera = CountingCamera::scripted(&script);
        let mut pipeline = ScanPipeline::new(camera.clone(), host(), ScanSettings::default());

        pipeline.scan(CancellationToken::new()).await.unwrap();
        let feedback = pipeline.feedback();
        assert_eq!(feedback.len(), MAX_FEEDBACK);
        assert_eq!(feedback[0].code, "BAD-5");
        assert_eq!(feedback[MAX_FEEDBACK - 1].code, format!("BAD-{}", MAX_FEEDBACK + 4));
        assert!(feedback.iter().all(|f| f.repeats == 1));
    }

    #[tokio::test(start_paused = true)]
    async fn stream_end_is_error_and_releases_camera() {
        let camera = CountingCamera::scripted(&["garbage"]);
        let mut pipeline = ScanPipeline::new(camera.clone(), host(), ScanSettings::default());
        pipeline.open().await.unwrap();

        let err = pipeline.run(CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, ScannerError::StreamEnded));
        assert_eq!(pipeline.state(), ScanState::Error);
        assert!(pipeline.last_error().is_some());
        assert_eq!(camera.released(), 1);

        pipeline.close();
        assert_eq!(pipeline.state(), ScanState::Idle);
        assert_eq!(camera.released(), 1);
    }

    #[tokio::test]
    async fn denied_camera_goes_to_error_then_idle() {
        let mut pipeline =
            ScanPipeline::new(UnavailableCamera::default(), host(), ScanSettings::default());
        let err = pipeline.open().await.unwrap_err();
        assert!(matches!(err, ScannerError::CameraDenied(_)));
        assert_eq!(pipeline.state(), ScanState::Error);
        assert!(pipeline.last_error().unwrap().contains("no camera"));

        assert!(matches!(
            pipeline.open().await,
            Err(ScannerError::InvalidState { .. })
        ));
        pipeline.close();
        assert_eq!(pipeline.state(), ScanState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_while_streaming_releases_camera() {
        let camera = CountingCamera::endless();
        let mut pipeline = ScanPipeline::new(camera.clone(), host(), ScanSettings::default());
        pipeline.open().await.unwrap();

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            trigger.cancel();
        });

        let outcome = pipeline.run(cancel).await.unwrap();
        assert_eq!(outcome, ScanOutcome::Cancelled);
        assert_eq!(pipeline.state(), ScanState::Idle);
        assert_eq!(camera.released(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_during_capture_delay_releases_camera() {
        let camera = CountingCamera::scripted(&["1N4AL3AP8JC231503"]);
        let mut pipeline = ScanPipeline::new(camera.clone(), host(), ScanSettings::default());
        pipeline.open().await.unwrap();

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            trigger.cancel();
        });

        assert_eq!(pipeline.run(cancel).await.unwrap(), ScanOutcome::Cancelled);
        assert_eq!(camera.released(), 1);
    }

    #[tokio::test]
    async fn close_and_drop_release_open_stream() {
        let camera = CountingCamera::endless();
        {
            let mut pipeline = ScanPipeline::new(camera.clone(), host(), ScanSettings::default());
            pipeline.open().await.unwrap();
            pipeline.close();
            assert!(!pipeline.is_streaming());
            assert_eq!(camera.released(), 1);

            pipeline.open().await.unwrap();
            assert!(pipeline.is_streaming());
        }
        assert_eq!(camera.acquired(), 2);
        assert_eq!(camera.released(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_run_still_releases_on_drop() {
        let camera = CountingCamera::endless();
        let mut pipeline = ScanPipeline::new(camera.clone(), host(), ScanSettings::default());
        pipeline.open().await.unwrap();

        let timed_out =
            tokio::time::timeout(Duration::from_millis(100), pipeline.run(CancellationToken::new()))
                .await;
        assert!(timed_out.is_err());
        assert!(pipeline.is_streaming());
        assert_eq!(camera.released(), 0);

        drop(pipeline);
        assert_eq!(camera.released(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn demo_fallback_fires_after_delay() {
        let settings = ScanSettings::default();
        let detector = DemoFallbackDetector::with_rng(
            Vec::new(),
            settings.fallback_delay,
            StdRng::seed_from_u64(1),
        );
        let mut pipeline = ScanPipeline::with_detector(BlankCamera, Box::new(detector), settings);
        assert_eq!(pipeline.detector_name(), "demo-fallback");

        let started = Instant::now();
        let outcome = pipeline.scan(CancellationToken::new()).await.unwrap();
        assert!(matches!(outcome, ScanOutcome::Captured(_)));
        assert!(started.elapsed() >= Duration::from_millis(4000));
    }

    #[test]
    fn settings_from_config() {
        let config = ScannerConfig {
            frame_rate: 50,
            ..ScannerConfig::default()
        };
        let settings = ScanSettings::from_config(&config);
        assert_eq!(settings.frame_interval, Duration::from_millis(20));
        assert_eq!(settings.fallback_delay, Duration::from_millis(3000));
        assert_eq!(settings.capture_delay, Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn run_requires_open() {
        let mut pipeline = ScanPipeline::new(BlankCamera, host(), ScanSettings::default());
        assert!(matches!(
            pipeline.run(CancellationToken::new()).await,
            Err(ScannerError::InvalidState { state: ScanState::Idle, .. })
        ));
    }
}
