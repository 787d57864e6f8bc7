use crate::detection::domain::detection_parameters::DetectionParameters;
use crate::shared::detected_face::DetectedFace;
use crate::shared::frame::Frame;

/// Domain interface for face detection.
///
/// `intensity` is a single-channel frame; callers convert colour frames
/// with `mat_interop::intensity_frame` first. The search arguments are
/// passed per call so the same detector can serve a live-tuned loop and a
/// fixed parameter sweep. Implementations wrap external handles, hence `&mut self`.
pub trait FaceDetector {
    fn detect(
        &mut self,
        intensity: &Frame,
        parameters: &DetectionParameters,
    ) -> Result<Vec<DetectedFace>, Box<dyn std::error::Error>>;
}
