pub const CLASSIFIER_FILE_NAME: &str = "haarcascade_frontalface_default.xml";
pub const CLASSIFIER_URL: &str =
    "https://raw.githubusercontent.com/opencv/opencv/master/data/haarcascades/haarcascade_frontalface_default.xml";

/// Application directory name under the platform cache/config roots.
pub const APP_DIR_NAME: &str = "Haarscope";

pub const DEFAULT_CAMERA_INDEX: i32 = 0;

/// Parameters the live viewer starts with.
pub const INITIAL_SCALE_FACTOR: f64 = 1.3;
pub const INITIAL_MIN_NEIGHBORS: i32 = 5;
pub const INITIAL_MIN_SIZE: i32 = 30;

/// Clamping floors for live-adjusted parameters.
pub const MIN_SCALE_FACTOR: f64 = 1.1;
pub const MIN_NEIGHBORS_FLOOR: i32 = 1;
pub const MIN_SIZE_FLOOR: i32 = 20;

/// Trackbar upper bounds (raw units).
pub const SCALE_CONTROL_MAX: i32 = 20;
pub const NEIGHBORS_CONTROL_MAX: i32 = 20;
pub const MIN_SIZE_CONTROL_MAX: i32 = 100;

pub const VIEWER_WINDOW: &str = "Face Detection";
pub const CONTROLS_WINDOW: &str = "Parameters";
pub const COMPARISON_WINDOW: &str = "Parameter Comparison";

pub const SCALE_CONTROL: &str = "Scale Factor x10";
pub const NEIGHBORS_CONTROL: &str = "Min Neighbors";
pub const MIN_SIZE_CONTROL: &str = "Min Size";

pub const QUIT_KEY: char = 'q';

/// Comparison grid is always two tiles wide.
pub const GRID_COLUMNS: usize = 2;
