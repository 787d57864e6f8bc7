use std::path::PathBuf;
use std::process;

use clap::Parser;

use haarscope_core::annotation::infrastructure::opencv_annotator::OpencvAnnotator;
use haarscope_core::capture::domain::frame_source::FrameSource;
use haarscope_core::capture::infrastructure::camera_source::CameraSource;
use haarscope_core::capture::infrastructure::image_file_source::ImageFileSource;
use haarscope_core::detection::domain::comparison_preset::ComparisonPreset;
use haarscope_core::detection::infrastructure::cascade_face_detector::CascadeFaceDetector;
use haarscope_core::detection::infrastructure::classifier_resolver;
use haarscope_core::display::domain::frame_display::FrameDisplay;
use haarscope_core::display::infrastructure::highgui_display::HighguiDisplay;
use haarscope_core::pipeline::compare_parameters_use_case::CompareParametersUseCase;
use haarscope_core::shared::constants::COMPARISON_WINDOW;
use haarscope_core::shared::settings::Settings;

/// Runs four cascade parameter presets on one frame and shows the results
/// side by side.
#[derive(Parser)]
#[command(name = "param-compare")]
struct Cli {
    /// Image to analyse. Without it, a single frame is taken from the camera.
    image: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = Settings::load();

    let classifier_path = classifier_resolver::ensure(
        &settings.classifier_path()?,
        &settings.classifier_url,
        Some(Box::new(download_progress)),
    )?;
    eprintln!();
    let detector = CascadeFaceDetector::load(&classifier_path)?;

    let mut source: Box<dyn FrameSource> = match &cli.image {
        Some(path) => {
            log::info!("Comparing presets on {}", path.display());
            Box::new(ImageFileSource::open(path)?)
        }
        None => {
            log::info!("Capturing one frame from camera {}", settings.camera_index);
            Box::new(CameraSource::open(settings.camera_index)?)
        }
    };

    let mut use_case = CompareParametersUseCase::new(
        Box::new(detector),
        Box::new(OpencvAnnotator::default()),
        ComparisonPreset::standard_set(),
    );
    use_case.run(source.as_mut(), || {
        Ok(Box::new(HighguiDisplay::open(COMPARISON_WINDOW)?) as Box<dyn FrameDisplay>)
    })?;

    Ok(())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading cascade classifier... {pct}%");
    } else {
        eprint!("\rDownloading cascade classifier... {downloaded} bytes");
    }
}
