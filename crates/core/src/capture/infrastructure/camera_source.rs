use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};

use crate::capture::domain::frame_source::{CaptureError, FrameSource};
use crate::shared::frame::Frame;
use crate::shared::mat_interop::bgr_mat_to_frame;

/// Continuous frame source over an OpenCV video capture device.
///
/// Owns the device exclusively; the handle is released exactly once, by
/// [`FrameSource::close`] or on drop, whichever comes first.
pub struct CameraSource {
    device: i32,
    capture: Option<VideoCapture>,
    buffer: Mat,
    frames_read: usize,
}

impl CameraSource {
    pub fn open(device: i32) -> Result<Self, CaptureError> {
        let capture = VideoCapture::new(device, videoio::CAP_ANY)
            .map_err(|e| CaptureError::Backend(Box::new(e)))?;
        let opened = capture
            .is_opened()
            .map_err(|e| CaptureError::Backend(Box::new(e)))?;
        if !opened {
            // `capture` drops here, which releases whatever OpenCV allocated.
            return Err(CaptureError::DeviceUnavailable(device));
        }

        log::info!("Opened camera {device}");
        Ok(Self {
            device,
            capture: Some(capture),
            buffer: Mat::default(),
            frames_read: 0,
        })
    }
}

impl FrameSource for CameraSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
        let Some(capture) = self.capture.as_mut() else {
            return Ok(None);
        };

        let grabbed = capture
            .read(&mut self.buffer)
            .map_err(|e| CaptureError::Backend(Box::new(e)))?;
        if !grabbed || self.buffer.empty() {
            log::warn!(
                "Camera {} returned no frame after {} frames",
                self.device,
                self.frames_read
            );
            return Ok(None);
        }

        let frame = bgr_mat_to_frame(&self.buffer, self.frames_read)
            .map_err(|e| CaptureError::Backend(Box::new(e)))?;
        self.frames_read += 1;
        Ok(Some(frame))
    }

    fn close(&mut self) {
        if let Some(mut capture) = self.capture.take() {
            if let Err(e) = capture.release() {
                log::warn!("Failed to release camera {}: {e}", self.device);
            } else {
                log::debug!("Released camera {}", self.device);
            }
        }
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        self.close();
    }
}
