//! Camera abstraction.
//!
//! [`CameraSource`] models the host's camera permission prompt: acquiring it
//! either yields a [`CameraStream`] or fails with a denial. Streams hand out
//! [`Frame`]s until they are released.
//!
//! # Implementations
//!
//! - [`FrameFileCamera`]: frames scripted from a text file, one symbol per line
//!   (blank lines are frames without a symbol)
//! - [`BlankCamera`]: endless frames without symbols, for demo mode
//! - [`UnavailableCamera`]: acquisition is always denied

use std::collections::VecDeque;
use std::future::Future;
use std::path::Path;

use tracing::debug;

use crate::error::ScannerError;

/// A single sampled frame.
///
/// No image data is carried. `symbol` is what the host's barcode
/// capability decoded from the frame, if anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Monotonic frame counter within one stream, starting at 0.
    pub sequence: u64,
    /// Raw symbol text decoded by the host.
    pub symbol: Option<String>,
}

impl Frame {
    pub fn blank(sequence: u64) -> Self {
        Self {
            sequence,
            symbol: None,
        }
    }

    pub fn with_symbol(sequence: u64, symbol: impl Into<String>) -> Self {
        Self {
            sequence,
            symbol: Some(symbol.into()),
        }
    }
}

/// Source of camera streams.
pub trait CameraSource: Send + Sync {
    /// Stream type produced on successful acquisition.
    type Stream: CameraStream;

    /// Short name for logs.
    fn name(&self) -> &str;

    /// Requests camera access.
    ///
    /// # Errors
    ///
    /// Returns [`ScannerError::CameraDenied`] when access is refused.
    fn acquire(&self) -> impl Future<Output = Result<Self::Stream, ScannerError>> + Send;
}

/// An acquired camera stream.
///
/// `release` must be idempotent; the pipeline may call it from several exit
/// paths.
pub trait CameraStream: Send {
    /// Next frame, or `None` once the stream has ended or been released.
    fn next_frame(&mut self) -> impl Future<Output = Option<Frame>> + Send;

    /// Stops the stream and frees the device.
    fn release(&mut self);

    fn is_released(&self) -> bool;
}

/// Camera fed by a scripted list of symbols.
#[derive(Debug, Clone, Default)]
pub struct FrameFileCamera {
    script: Vec<Option<String>>,
}

impl FrameFileCamera {
    /// Builds a camera from script lines. Blank lines become blank frames.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let script = lines
            .into_iter()
            .map(|line| {
                let trimmed = line.as_ref().trim();
                (!trimmed.is_empty()).then(|| trimmed.to_owned())
            })
            .collect();
        Self { script }
    }

    /// Reads a frame script file.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ScannerError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ScannerError::FrameScript {
                path: path.display().to_string(),
                source,
            })?;
        let camera = Self::from_lines(content.lines());
        debug!(path = %path.display(), frames = camera.script.len(), "frame script loaded");
        Ok(camera)
    }

    pub fn frame_count(&self) -> usize {
        self.script.len()
    }
}

impl CameraSource for FrameFileCamera {
    type Stream = ScriptedStream;

    fn name(&self) -> &str {
        "frame-file"
    }

    async fn acquire(&self) -> Result<ScriptedStream, ScannerError> {
        Ok(ScriptedStream::new(self.script.clone()))
    }
}

/// Stream over a fixed script of symbols.
#[derive(Debug)]
pub struct ScriptedStream {
    frames: VecDeque<Option<String>>,
    sequence: u64,
    released: bool,
}

impl ScriptedStream {
    pub fn new(frames: impl IntoIterator<Item = Option<String>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            sequence: 0,
            released: false,
        }
    }
}

impl CameraStream for ScriptedStream {
    async fn next_frame(&mut self) -> Option<Frame> {
        if self.released {
            return None;
        }
        let symbol = self.frames.pop_front()?;
        let frame = Frame {
            sequence: self.sequence,
            symbol,
        };
        self.sequence += 1;
        Some(frame)
    }

    fn release(&mut self) {
        self.released = true;
        self.frames.clear();
    }

    fn is_released(&self) -> bool {
        self.released
    }
}

/// Camera producing frames with no decodable symbol.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankCamera;

impl CameraSource for BlankCamera {
    type Stream = BlankStream;

    fn name(&self) -> &str {
        "blank"
    }

    async fn acquire(&self) -> Result<BlankStream, ScannerError> {
        Ok(BlankStream::default())
    }
}

#[derive(Debug, Default)]
pub struct BlankStream {
    sequence: u64,
    released: bool,
}

impl CameraStream for BlankStream {
    async fn next_frame(&mut self) -> Option<Frame> {
        if self.released {
            return None;
        }
        let frame = Frame::blank(self.sequence);
        self.sequence += 1;
        Some(frame)
    }

    fn release(&mut self) {
        self.released = true;
    }

    fn is_released(&self) -> bool {
        self.released
    }
}

/// Camera whose acquisition is always denied.
#[derive(Debug, Clone)]
pub struct UnavailableCamera {
    reason: String,
}

impl UnavailableCamera {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for UnavailableCamera {
    fn default() -> Self {
        Self::new("no camera available on this host")
    }
}

impl CameraSource for UnavailableCamera {
    type Stream = BlankStream;

    fn name(&self) -> &str {
        "unavailable"
    }

    async fn acquire(&self) -> Result<BlankStream, ScannerError> {
        Err(ScannerError::CameraDenied(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_stream_yields_lines_in_order() {
        let camera = FrameFileCamera::from_lines(["", "  ABC ", "1N4AL3AP8JC231503"]);
        assert_eq!(camera.frame_count(), 3);

        let mut stream = camera.acquire().await.unwrap();
        assert_eq!(stream.next_frame().await, Some(Frame::blank(0)));
        assert_eq!(stream.next_frame().await, Some(Frame::with_symbol(1, "ABC")));
        assert_eq!(
            stream.next_frame().await,
            Some(Frame::with_symbol(2, "1N4AL3AP8JC231503"))
        );
        assert_eq!(stream.next_frame().await, None);
    }

    #[tokio::test]
    async fn released_stream_stops() {
        let mut stream = BlankCamera.acquire().await.unwrap();
        assert!(stream.next_frame().await.is_some());
        stream.release();
        stream.release();
        assert!(stream.is_released());
        assert_eq!(stream.next_frame().await, None);
    }

    #[tokio::test]
    async fn unavailable_camera_is_denied() {
        let err = UnavailableCamera::new("permission denied")
            .acquire()
            .await
            .unwrap_err();
        assert!(matches!(err, ScannerError::CameraDenied(reason) if reason == "permission denied"));
    }

    #[tokio::test]
    async fn frame_script_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.txt");
        std::fs::write(&path, "\nNOT-A-VIN\n1HGCM82633A004352\n").unwrap();

        let camera = FrameFileCamera::from_path(&path).await.unwrap();
        assert_eq!(camera.frame_count(), 3);

        let missing = FrameFileCamera::from_path(dir.path().join("none.txt")).await;
        assert!(matches!(missing, Err(ScannerError::FrameScript { .. })));
    }
}
