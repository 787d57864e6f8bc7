use crate::detection::domain::comparison_preset::ComparisonPreset;
use crate::detection::domain::detection_parameters::DetectionParameters;
use crate::shared::detected_face::DetectedFace;

/// 8-bit RGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0 };
}

/// How annotations are rasterised.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnnotationStyle {
    pub box_color: Color,
    pub box_thickness: i32,
    pub text_color: Color,
    pub text_scale: f64,
    pub text_thickness: i32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            box_color: Color::GREEN,
            box_thickness: 2,
            text_color: Color::RED,
            text_scale: 0.7,
            text_thickness: 2,
        }
    }
}

/// Left margin and baseline spacing of overlay text, in pixels.
pub const TEXT_MARGIN_X: i32 = 10;
pub const TEXT_LINE_HEIGHT: i32 = 30;

/// One overlay line; `origin` is the bottom-left of the text baseline.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub origin: (i32, i32),
}

/// Everything to draw onto one frame: face boxes and stacked text lines.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Annotation {
    pub boxes: Vec<DetectedFace>,
    pub lines: Vec<TextLine>,
}

impl Annotation {
    /// Boxes plus text lines stacked from the top-left corner.
    pub fn new<I>(boxes: Vec<DetectedFace>, texts: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let lines = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| TextLine {
                text,
                origin: (TEXT_MARGIN_X, TEXT_LINE_HEIGHT * (i as i32 + 1)),
            })
            .collect();
        Self { boxes, lines }
    }

    /// Live viewer overlay: current parameters and the face count.
    pub fn live(parameters: &DetectionParameters, faces: &[DetectedFace]) -> Self {
        Self::new(
            faces.to_vec(),
            [
                format!("Scale Factor: {:.1}", parameters.scale_factor),
                format!("Min Neighbors: {}", parameters.min_neighbors),
                format!("Min Size: {}", parameters.min_size.0),
                format!("Faces detected: {}", faces.len()),
            ],
        )
    }

    /// Comparison tile overlay: preset label and the face count.
    pub fn preset(preset: &ComparisonPreset, faces: &[DetectedFace]) -> Self {
        Self::new(
            faces.to_vec(),
            [preset.label.clone(), format!("Faces: {}", faces.len())],
        )
    }

    pub fn face_count(&self) -> usize {
        self.boxes.len()
    }
}
