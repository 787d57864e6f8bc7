use std::path::PathBuf;

use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("camera {0} is unavailable")]
    DeviceUnavailable(i32),
    #[error("no frame could be captured")]
    NoFrame,
    #[error("failed to load image {path}: {source}")]
    InvalidImage {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("capture backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A sequence of colour frames.
///
/// `next_frame` may block until the device has a frame ready and returns
/// `Ok(None)` once the stream has ended (including a failed device read).
/// `close` releases the underlying device; it must be idempotent, and
/// implementations also release on drop.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, CaptureError>;

    fn close(&mut self);
}

/// Reads exactly one frame and releases the source, on success or failure.
pub fn capture_single_frame(source: &mut dyn FrameSource) -> Result<Frame, CaptureError> {
    let result = source.next_frame();
    source.close();
    result?.ok_or(CaptureError::NoFrame)
}
