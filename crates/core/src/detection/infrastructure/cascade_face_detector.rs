use std::path::{Path, PathBuf};

use opencv::core::{Rect, Size, Vector};
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;
use thiserror::Error;

use crate::detection::domain::detection_parameters::DetectionParameters;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::detected_face::DetectedFace;
use crate::shared::frame::Frame;
use crate::shared::mat_interop::frame_to_mat;

#[derive(Error, Debug)]
pub enum ClassifierLoadError {
    #[error("failed to read classifier {path}: {source}")]
    Backend {
        path: PathBuf,
        #[source]
        source: opencv::Error,
    },
    #[error("classifier {0} is empty or not a valid cascade")]
    Invalid(PathBuf),
}

/// Haar-cascade detector backed by OpenCV's `CascadeClassifier`.
///
/// The multi-scale search itself is entirely OpenCV's; this type only
/// moves frames and arguments across the boundary.
pub struct CascadeFaceDetector {
    classifier: CascadeClassifier,
}

impl CascadeFaceDetector {
    /// Loads and validates a cascade definition.
    pub fn load(path: &Path) -> Result<Self, ClassifierLoadError> {
        let backend_err = |e| ClassifierLoadError::Backend {
            path: path.to_path_buf(),
            source: e,
        };

        let classifier =
            CascadeClassifier::new(&path.to_string_lossy()).map_err(backend_err)?;
        if classifier.empty().map_err(backend_err)? {
            return Err(ClassifierLoadError::Invalid(path.to_path_buf()));
        }

        log::info!("Loaded cascade classifier from {}", path.display());
        Ok(Self { classifier })
    }
}

impl FaceDetector for CascadeFaceDetector {
    fn detect(
        &mut self,
        intensity: &Frame,
        parameters: &DetectionParameters,
    ) -> Result<Vec<DetectedFace>, Box<dyn std::error::Error>> {
        if intensity.channels() != 1 {
            return Err(format!(
                "cascade detection expects a single-channel frame, got {} channels",
                intensity.channels()
            )
            .into());
        }

        let gray = frame_to_mat(intensity)?;
        let mut found = Vector::<Rect>::new();
        let (min_w, min_h) = parameters.min_size;
        self.classifier.detect_multi_scale(
            &gray,
            &mut found,
            parameters.scale_factor,
            parameters.min_neighbors,
            0,
            Size::new(min_w, min_h),
            Size::new(0, 0),
        )?;

        Ok(found
            .iter()
            .map(|r| DetectedFace::new(r.x, r.y, r.width, r.height))
            .collect())
    }
}
