use thiserror::Error;

use crate::annotation::domain::annotation::Annotation;
use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::capture::domain::frame_source::{capture_single_frame, CaptureError, FrameSource};
use crate::detection::domain::comparison_preset::ComparisonPreset;
use crate::detection::domain::face_detector::FaceDetector;
use crate::display::domain::frame_display::FrameDisplay;
use crate::pipeline::grid::{compose_grid, GridError};
use crate::shared::constants::GRID_COLUMNS;
use crate::shared::frame::Frame;
use crate::shared::mat_interop::intensity_frame;

#[derive(Error, Debug)]
pub enum CompareError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error("intensity conversion failed: {0}")]
    Intensity(#[from] opencv::Error),
    #[error("detection failed for preset '{label}': {source}")]
    Detect {
        label: String,
        #[source]
        source: Box<dyn std::error::Error>,
    },
    #[error("annotation failed: {0}")]
    Annotate(#[source] Box<dyn std::error::Error>),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("display failed: {0}")]
    Display(#[source] Box<dyn std::error::Error>),
}

/// Per-preset face counts of one comparison run, in preset order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresetResult {
    pub label: String,
    pub faces: usize,
}

/// Single-pass parameter sweep: one frame, one detection per preset, one
/// annotated tile per preset, laid out in a two-column grid.
pub struct CompareParametersUseCase {
    detector: Box<dyn FaceDetector>,
    annotator: Box<dyn FrameAnnotator>,
    presets: Vec<ComparisonPreset>,
}

impl CompareParametersUseCase {
    pub fn new(
        detector: Box<dyn FaceDetector>,
        annotator: Box<dyn FrameAnnotator>,
        presets: Vec<ComparisonPreset>,
    ) -> Self {
        Self {
            detector,
            annotator,
            presets,
        }
    }

    /// Detects with every preset and returns the composed grid together
    /// with the per-preset counts.
    pub fn compose(&mut self, frame: &Frame) -> Result<(Frame, Vec<PresetResult>), CompareError> {
        let intensity = intensity_frame(frame)?;
        let mut tiles = Vec::with_capacity(self.presets.len());
        let mut results = Vec::with_capacity(self.presets.len());

        for preset in &self.presets {
            let faces = self
                .detector
                .detect(&intensity, &preset.parameters)
                .map_err(|e| CompareError::Detect {
                    label: preset.label.clone(),
                    source: e,
                })?;

            let mut tile = frame.clone();
            self.annotator
                .annotate(&mut tile, &Annotation::preset(preset, &faces))
                .map_err(CompareError::Annotate)?;

            log::info!("{}: {} faces", preset.label, faces.len());
            results.push(PresetResult {
                label: preset.label.clone(),
                faces: faces.len(),
            });
            tiles.push(tile);
        }

        let grid = compose_grid(&tiles, GRID_COLUMNS)?;
        Ok((grid, results))
    }

    /// Acquires one frame from `source`, composes the grid, then opens a
    /// display, shows the grid and waits for a key.
    ///
    /// The display is only opened once a grid exists, so a capture failure
    /// never shows a window. The source and the display are closed on
    /// every path.
    pub fn run<F>(
        &mut self,
        source: &mut dyn FrameSource,
        open_display: F,
    ) -> Result<Vec<PresetResult>, CompareError>
    where
        F: FnOnce() -> Result<Box<dyn FrameDisplay>, Box<dyn std::error::Error>>,
    {
        let frame = capture_single_frame(source)?;
        let (grid, results) = self.compose(&frame)?;

        let mut display = open_display().map_err(CompareError::Display)?;
        let shown = present(display.as_mut(), &grid);
        display.close();
        shown?;

        Ok(results)
    }
}

fn present(display: &mut dyn FrameDisplay, grid: &Frame) -> Result<(), CompareError> {
    display.show(grid).map_err(CompareError::Display)?;
    log::info!("Press any key to exit");
    display.wait_for_key().map_err(CompareError::Display)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::detection_parameters::DetectionParameters;
    use crate::shared::detected_face::DetectedFace;
    use ndarray::s;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    struct OneShotSource {
        frame: Option<Frame>,
        closed: Arc<Mutex<usize>>,
    }

    impl FrameSource for OneShotSource {
        fn next_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
            Ok(self.frame.take())
        }

        fn close(&mut self) {
            *self.closed.lock().unwrap() += 1;
        }
    }

    /// Finds one face per unit of `min_neighbors` below 6, so each preset
    /// yields a distinct count.
    struct NeighborCountingDetector {
        calls: Arc<Mutex<Vec<DetectionParameters>>>,
    }

    impl FaceDetector for NeighborCountingDetector {
        fn detect(
            &mut self,
            intensity: &Frame,
            parameters: &DetectionParameters,
        ) -> Result<Vec<DetectedFace>, Box<dyn std::error::Error>> {
            assert_eq!(intensity.channels(), 1);
            self.calls.lock().unwrap().push(*parameters);
            let n = (6 - parameters.min_neighbors).max(0) as usize;
            Ok((0..n).map(|i| DetectedFace::new(i as i32, 0, 2, 2)).collect())
        }
    }

    struct FailingDetector;

    impl FaceDetector for FailingDetector {
        fn detect(
            &mut self,
            _intensity: &Frame,
            _parameters: &DetectionParameters,
        ) -> Result<Vec<DetectedFace>, Box<dyn std::error::Error>> {
            Err("boom".into())
        }
    }

    /// Paints the whole tile with its face count so placement is visible.
    struct FillAnnotator;

    impl FrameAnnotator for FillAnnotator {
        fn annotate(
            &self,
            frame: &mut Frame,
            annotation: &Annotation,
        ) -> Result<(), Box<dyn std::error::Error>> {
            frame.data_mut().fill(annotation.face_count() as u8 + 100);
            Ok(())
        }
    }

    #[derive(Default)]
    struct DisplayJournal {
        opened: usize,
        shown: Vec<(u32, u32)>,
        waited: usize,
        closed: usize,
    }

    struct StubDisplay {
        journal: Arc<Mutex<DisplayJournal>>,
        fail_show: bool,
    }

    impl FrameDisplay for StubDisplay {
        fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            if self.fail_show {
                return Err("no screen".into());
            }
            self.journal
                .lock()
                .unwrap()
                .shown
                .push((frame.width(), frame.height()));
            Ok(())
        }

        fn poll_key(&mut self) -> Result<Option<char>, Box<dyn std::error::Error>> {
            Ok(None)
        }

        fn wait_for_key(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            self.journal.lock().unwrap().waited += 1;
            Ok(())
        }

        fn close(&mut self) {
            self.journal.lock().unwrap().closed += 1;
        }
    }

    fn display_factory(
        journal: &Arc<Mutex<DisplayJournal>>,
        fail_show: bool,
    ) -> impl FnOnce() -> Result<Box<dyn FrameDisplay>, Box<dyn std::error::Error>> {
        let journal = journal.clone();
        move || {
            journal.lock().unwrap().opened += 1;
            Ok(Box::new(StubDisplay { journal, fail_show }) as Box<dyn FrameDisplay>)
        }
    }

    fn use_case(calls: &Arc<Mutex<Vec<DetectionParameters>>>) -> CompareParametersUseCase {
        CompareParametersUseCase::new(
            Box::new(NeighborCountingDetector {
                calls: calls.clone(),
            }),
            Box::new(FillAnnotator),
            ComparisonPreset::standard_set(),
        )
    }

    // --- Tests ---

    #[test]
    fn test_compose_runs_each_preset_once_in_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut uc = use_case(&calls);
        let (_, results) = uc.compose(&Frame::blank(30, 20, 3)).unwrap();

        let neighbors: Vec<_> = calls.lock().unwrap().iter().map(|p| p.min_neighbors).collect();
        assert_eq!(neighbors, [3, 5, 3, 8]);
        let counts: Vec<_> = results.iter().map(|r| r.faces).collect();
        assert_eq!(counts, [3, 1, 3, 0]);
        assert_eq!(results[1].label, "SF: 1.3, MN: 5");
    }

    #[test]
    fn test_compose_places_tiles_in_two_by_two_grid() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut uc = use_case(&calls);
        let (grid, _) = uc.compose(&Frame::blank(30, 20, 3)).unwrap();

        assert_eq!((grid.width(), grid.height()), (60, 40));
        let view = grid.as_ndarray();
        let expected = [
            ((0, 20), (0, 30), 103u8),
            ((0, 20), (30, 60), 101),
            ((20, 40), (0, 30), 103),
            ((20, 40), (30, 60), 100),
        ];
        for ((r0, r1), (c0, c1), value) in expected {
            assert!(view.slice(s![r0..r1, c0..c1, ..]).iter().all(|&v| v == value));
        }
    }

    #[test]
    fn test_compose_leaves_input_frame_untouched() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut uc = use_case(&calls);
        let frame = Frame::blank(8, 8, 3);
        uc.compose(&frame).unwrap();
        assert!(frame.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_run_shows_grid_once_and_waits() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let journal = Arc::new(Mutex::new(DisplayJournal::default()));
        let closed = Arc::new(Mutex::new(0));
        let mut source = OneShotSource {
            frame: Some(Frame::blank(16, 12, 3)),
            closed: closed.clone(),
        };

        let results = use_case(&calls)
            .run(&mut source, display_factory(&journal, false))
            .unwrap();

        assert_eq!(results.len(), 4);
        let j = journal.lock().unwrap();
        assert_eq!(j.opened, 1);
        assert_eq!(j.shown, [(32, 24)]);
        assert_eq!(j.waited, 1);
        assert_eq!(j.closed, 1);
        assert_eq!(*closed.lock().unwrap(), 1);
    }

    #[test]
    fn test_no_frame_reports_capture_error_without_display() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let journal = Arc::new(Mutex::new(DisplayJournal::default()));
        let closed = Arc::new(Mutex::new(0));
        let mut source = OneShotSource {
            frame: None,
            closed: closed.clone(),
        };

        let err = use_case(&calls)
            .run(&mut source, display_factory(&journal, false))
            .unwrap_err();

        assert!(matches!(err, CompareError::Capture(CaptureError::NoFrame)));
        assert_eq!(journal.lock().unwrap().opened, 0);
        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(*closed.lock().unwrap(), 1);
    }

    #[test]
    fn test_detection_failure_names_preset() {
        let mut uc = CompareParametersUseCase::new(
            Box::new(FailingDetector),
            Box::new(FillAnnotator),
            ComparisonPreset::standard_set(),
        );
        let err = uc.compose(&Frame::blank(4, 4, 3)).unwrap_err();
        assert!(err.to_string().contains("SF: 1.1, MN: 3"));
    }

    #[test]
    fn test_display_failure_still_closes_display() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let journal = Arc::new(Mutex::new(DisplayJournal::default()));
        let mut source = OneShotSource {
            frame: Some(Frame::blank(4, 4, 3)),
            closed: Arc::new(Mutex::new(0)),
        };

        let result = use_case(&calls).run(&mut source, display_factory(&journal, true));

        assert!(matches!(result, Err(CompareError::Display(_))));
        let j = journal.lock().unwrap();
        assert_eq!(j.closed, 1);
        assert_eq!(j.waited, 0);
    }
}
