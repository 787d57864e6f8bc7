use std::process;

use clap::Parser;

use haarscope_core::annotation::infrastructure::opencv_annotator::OpencvAnnotator;
use haarscope_core::capture::infrastructure::camera_source::CameraSource;
use haarscope_core::detection::infrastructure::cascade_face_detector::CascadeFaceDetector;
use haarscope_core::detection::infrastructure::classifier_resolver;
use haarscope_core::display::infrastructure::highgui_controls::HighguiControls;
use haarscope_core::display::infrastructure::highgui_display::HighguiDisplay;
use haarscope_core::pipeline::live_viewer_use_case::{LiveViewerUseCase, StopReason};
use haarscope_core::pipeline::session_logger::LogSessionLogger;
use haarscope_core::shared::constants::{QUIT_KEY, VIEWER_WINDOW};
use haarscope_core::shared::settings::Settings;

/// Live webcam face detection with adjustable cascade parameters.
///
/// Drag the trackbars in the "Parameters" window to tune detection; press
/// `q` in the video window to quit.
#[derive(Parser)]
#[command(name = "face-viewer")]
struct Cli {}

fn main() {
    env_logger::init();
    Cli::parse();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load();

    let classifier_path = classifier_resolver::ensure(
        &settings.classifier_path()?,
        &settings.classifier_url,
        Some(Box::new(download_progress)),
    )?;
    eprintln!();
    let detector = CascadeFaceDetector::load(&classifier_path)?;

    let source = CameraSource::open(settings.camera_index)?;

    let mut parameters = settings.initial_parameters;
    let display = HighguiDisplay::open(VIEWER_WINDOW)?;
    let controls = HighguiControls::open(&parameters)?;

    log::info!("Press '{QUIT_KEY}' in the video window to quit");
    let mut use_case = LiveViewerUseCase::new(
        Box::new(source),
        Box::new(detector),
        Box::new(OpencvAnnotator::default()),
        Box::new(display),
        Box::new(controls),
        Box::new(LogSessionLogger::default()),
    );
    let report = use_case.run(&mut parameters)?;

    match report.reason {
        StopReason::QuitRequested => {
            log::info!("Stopped after {} frames with {parameters}", report.frames);
            Ok(())
        }
        StopReason::CaptureFailed => Err(format!(
            "failed to read a frame from camera {} after {} frames",
            settings.camera_index, report.frames
        )
        .into()),
    }
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading cascade classifier... {pct}%");
    } else {
        eprint!("\rDownloading cascade classifier... {downloaded} bytes");
    }
}
