use opencv::core::{Point, Scalar};
use opencv::imgproc;
use opencv::prelude::*;

use crate::annotation::domain::annotation::{Annotation, AnnotationStyle, Color};
use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::shared::frame::Frame;
use crate::shared::mat_interop::frame_to_mat;

/// Rasterises boxes and Hershey text with OpenCV's drawing primitives.
pub struct OpencvAnnotator {
    style: AnnotationStyle,
}

impl OpencvAnnotator {
    pub fn new(style: AnnotationStyle) -> Self {
        Self { style }
    }
}

impl Default for OpencvAnnotator {
    fn default() -> Self {
        Self::new(AnnotationStyle::default())
    }
}

// Frames are RGB, so the scalar is laid out in the same order.
fn scalar(color: Color) -> Scalar {
    Scalar::new(color.r as f64, color.g as f64, color.b as f64, 0.0)
}

impl FrameAnnotator for OpencvAnnotator {
    fn annotate(
        &self,
        frame: &mut Frame,
        annotation: &Annotation,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if frame.channels() != 3 {
            return Err(format!(
                "annotation expects a colour frame, got {} channels",
                frame.channels()
            )
            .into());
        }

        let mut canvas = frame_to_mat(frame)?;

        for face in &annotation.boxes {
            let Some(visible) = face.clamp_to(frame.width(), frame.height()) else {
                continue;
            };
            imgproc::rectangle_points(
                &mut canvas,
                Point::new(visible.x, visible.y),
                Point::new(visible.right(), visible.bottom()),
                scalar(self.style.box_color),
                self.style.box_thickness,
                imgproc::LINE_8,
                0,
            )?;
        }

        for line in &annotation.lines {
            imgproc::put_text(
                &mut canvas,
                &line.text,
                Point::new(line.origin.0, line.origin.1),
                imgproc::FONT_HERSHEY_SIMPLEX,
                self.style.text_scale,
                scalar(self.style.text_color),
                self.style.text_thickness,
                imgproc::LINE_8,
                false,
            )?;
        }

        frame.data_mut().copy_from_slice(canvas.data_bytes()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::detected_face::DetectedFace;

    fn pixel(frame: &Frame, x: u32, y: u32) -> [u8; 3] {
        let idx = ((y * frame.width() + x) * 3) as usize;
        [frame.data()[idx], frame.data()[idx + 1], frame.data()[idx + 2]]
    }

    #[test]
    fn test_empty_annotation_leaves_frame_untouched() {
        let mut frame = Frame::blank(64, 48, 3);
        OpencvAnnotator::default()
            .annotate(&mut frame, &Annotation::default())
            .unwrap();
        assert!(frame.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_box_is_drawn_in_green() {
        let mut frame = Frame::blank(100, 100, 3);
        let annotation = Annotation::new(vec![DetectedFace::new(20, 20, 40, 40)], Vec::new());
        OpencvAnnotator::default()
            .annotate(&mut frame, &annotation)
            .unwrap();

        assert_eq!(pixel(&frame, 20, 40), [0, 255, 0]);
        assert_eq!(pixel(&frame, 40, 20), [0, 255, 0]);
        // Interior stays untouched.
        assert_eq!(pixel(&frame, 40, 40), [0, 0, 0]);
        // Outside as well.
        assert_eq!(pixel(&frame, 5, 5), [0, 0, 0]);
    }

    #[test]
    fn test_box_outside_frame_is_skipped() {
        let mut frame = Frame::blank(50, 50, 3);
        let annotation = Annotation::new(vec![DetectedFace::new(200, 200, 10, 10)], Vec::new());
        OpencvAnnotator::default()
            .annotate(&mut frame, &annotation)
            .unwrap();
        assert!(frame.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_text_is_drawn_in_red() {
        let mut frame = Frame::blank(200, 60, 3);
        let annotation = Annotation::new(vec![], ["Faces: 0".to_string()]);
        OpencvAnnotator::default()
            .annotate(&mut frame, &annotation)
            .unwrap();

        let data = frame.data();
        let touched: Vec<_> = data
            .chunks_exact(3)
            .filter(|px| px.iter().any(|&v| v != 0))
            .collect();
        assert!(!touched.is_empty());
        assert!(touched.iter().all(|px| px[1] == 0 && px[2] == 0));
    }

    #[test]
    fn test_rejects_intensity_frames() {
        let mut frame = Frame::blank(10, 10, 1);
        assert!(OpencvAnnotator::default()
            .annotate(&mut frame, &Annotation::default())
            .is_err());
    }
}
