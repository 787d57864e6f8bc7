use crate::annotation::domain::annotation::Annotation;
use crate::shared::frame::Frame;

/// Draws an [`Annotation`] onto a colour frame in place.
pub trait FrameAnnotator {
    fn annotate(
        &self,
        frame: &mut Frame,
        annotation: &Annotation,
    ) -> Result<(), Box<dyn std::error::Error>>;
}
