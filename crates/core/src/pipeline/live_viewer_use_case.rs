use std::time::Instant;

use thiserror::Error;

use crate::annotation::domain::annotation::Annotation;
use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::capture::domain::frame_source::FrameSource;
use crate::detection::domain::detection_parameters::DetectionParameters;
use crate::detection::domain::face_detector::FaceDetector;
use crate::display::domain::frame_display::FrameDisplay;
use crate::display::domain::parameter_controls::ParameterControls;
use crate::pipeline::session_logger::SessionLogger;
use crate::shared::constants::QUIT_KEY;
use crate::shared::mat_interop::intensity_frame;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    QuitRequested,
    CaptureFailed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerState {
    Running,
    Stopped(StopReason),
}

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("intensity conversion failed: {0}")]
    Intensity(#[source] opencv::Error),
    #[error("detection failed: {0}")]
    Detect(#[source] Box<dyn std::error::Error>),
    #[error("annotation failed: {0}")]
    Annotate(#[source] Box<dyn std::error::Error>),
    #[error("display failed: {0}")]
    Display(#[source] Box<dyn std::error::Error>),
    #[error("reading controls failed: {0}")]
    Controls(#[source] Box<dyn std::error::Error>),
}

/// Outcome of a finished viewer session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionReport {
    pub frames: usize,
    pub reason: StopReason,
}

/// Live loop: capture → intensity → detect → annotate → show → poll.
///
/// The parameters are owned by the caller. Controls are sampled after the
/// frame is shown, so a change takes effect from the next captured frame.
pub struct LiveViewerUseCase {
    source: Box<dyn FrameSource>,
    detector: Box<dyn FaceDetector>,
    annotator: Box<dyn FrameAnnotator>,
    display: Box<dyn FrameDisplay>,
    controls: Box<dyn ParameterControls>,
    logger: Box<dyn SessionLogger>,
    state: ViewerState,
    frames_shown: usize,
}

impl LiveViewerUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn FaceDetector>,
        annotator: Box<dyn FrameAnnotator>,
        display: Box<dyn FrameDisplay>,
        controls: Box<dyn ParameterControls>,
        logger: Box<dyn SessionLogger>,
    ) -> Self {
        Self {
            source,
            detector,
            annotator,
            display,
            controls,
            logger,
            state: ViewerState::Running,
            frames_shown: 0,
        }
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    /// Runs until the quit key is pressed or the source stops producing
    /// frames. The source, controls and display are released on every
    /// return path, including errors.
    pub fn run(
        &mut self,
        parameters: &mut DetectionParameters,
    ) -> Result<SessionReport, ViewerError> {
        self.state = ViewerState::Running;
        self.logger.info(&format!("Starting live detection with {parameters}"));

        let result = self.run_loop(parameters);
        self.shutdown();
        self.logger.summary();
        result
    }

    fn run_loop(
        &mut self,
        parameters: &mut DetectionParameters,
    ) -> Result<SessionReport, ViewerError> {
        loop {
            if let ViewerState::Stopped(reason) = self.step(parameters)? {
                return Ok(SessionReport {
                    frames: self.frames_shown,
                    reason,
                });
            }
        }
    }

    /// Processes a single iteration and returns the resulting state.
    pub fn step(
        &mut self,
        parameters: &mut DetectionParameters,
    ) -> Result<ViewerState, ViewerError> {
        if let ViewerState::Stopped(_) = self.state {
            return Ok(self.state);
        }

        let t = Instant::now();
        let captured = match self.source.next_frame() {
            Ok(frame) => frame,
            Err(e) => {
                log::error!("{e}");
                None
            }
        };
        let Some(mut frame) = captured else {
            log::error!("Failed to capture frame; stopping");
            self.state = ViewerState::Stopped(StopReason::CaptureFailed);
            return Ok(self.state);
        };
        self.logger.timing("capture", elapsed_ms(t));

        let t = Instant::now();
        let intensity = intensity_frame(&frame).map_err(ViewerError::Intensity)?;
        let faces = self
            .detector
            .detect(&intensity, parameters)
            .map_err(ViewerError::Detect)?;
        self.logger.timing("detect", elapsed_ms(t));
        self.logger.metric("faces", faces.len() as f64);

        let t = Instant::now();
        let annotation = Annotation::live(parameters, &faces);
        self.annotator
            .annotate(&mut frame, &annotation)
            .map_err(ViewerError::Annotate)?;
        self.logger.timing("annotate", elapsed_ms(t));

        let t = Instant::now();
        self.display.show(&frame).map_err(ViewerError::Display)?;
        let key = self.display.poll_key().map_err(ViewerError::Display)?;
        self.logger.timing("display", elapsed_ms(t));
        self.frames_shown += 1;
        self.logger.frame(self.frames_shown);

        if key == Some(QUIT_KEY) {
            self.logger.info("Quit requested");
            self.state = ViewerState::Stopped(StopReason::QuitRequested);
            return Ok(self.state);
        }

        let controls = self.controls.sample().map_err(ViewerError::Controls)?;
        if parameters.update_from_controls(controls) {
            log::info!("Parameters changed: {parameters}");
        }

        Ok(ViewerState::Running)
    }

    fn shutdown(&mut self) {
        self.source.close();
        self.controls.close();
        self.display.close();
        log::debug!("Viewer resources released");
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
