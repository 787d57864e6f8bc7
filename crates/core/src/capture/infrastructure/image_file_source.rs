use std::path::Path;

use image::{DynamicImage, ImageDecoder, ImageReader};

use crate::capture::domain::frame_source::{CaptureError, FrameSource};
use crate::shared::frame::Frame;

/// Decodes a still image into an RGB frame using the `image` crate.
///
/// The EXIF orientation tag, when present, is applied so the frame is
/// upright.
pub fn load_image(path: &Path) -> Result<Frame, CaptureError> {
    let invalid =
        |source: Box<dyn std::error::Error + Send + Sync>| CaptureError::InvalidImage {
            path: path.to_path_buf(),
            source,
        };

    let mut decoder = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| invalid(Box::new(e)))?
        .into_decoder()
        .map_err(|e| invalid(Box::new(e)))?;
    let orientation = decoder.orientation().map_err(|e| invalid(Box::new(e)))?;
    let mut decoded =
        DynamicImage::from_decoder(decoder).map_err(|e| invalid(Box::new(e)))?;
    decoded.apply_orientation(orientation);

    let rgb = decoded.into_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(invalid("image has no pixels".into()));
    }
    Ok(Frame::new(rgb.into_raw(), width, height, 3, 0))
}

/// Adapts a single image file to the [`FrameSource`] interface: one frame,
/// then end of stream.
pub struct ImageFileSource {
    frame: Option<Frame>,
}

impl ImageFileSource {
    pub fn open(path: &Path) -> Result<Self, CaptureError> {
        let frame = load_image(path)?;
        log::info!(
            "Loaded {} ({}x{})",
            path.display(),
            frame.width(),
            frame.height()
        );
        Ok(Self { frame: Some(frame) })
    }
}

impl FrameSource for ImageFileSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
        Ok(self.frame.take())
    }

    fn close(&mut self) {
        self.frame = None;
    }
}
