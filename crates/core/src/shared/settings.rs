use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::detection::domain::detection_parameters::DetectionParameters;
use crate::detection::infrastructure::classifier_resolver::{
    default_classifier_path, ClassifierResolveError,
};
use crate::shared::constants::{APP_DIR_NAME, CLASSIFIER_URL, DEFAULT_CAMERA_INDEX};

/// Optional per-user settings shared by both binaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub camera_index: i32,
    pub classifier_path: Option<PathBuf>,
    pub classifier_url: String,
    pub initial_parameters: DetectionParameters,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            camera_index: DEFAULT_CAMERA_INDEX,
            classifier_path: None,
            classifier_url: CLASSIFIER_URL.to_string(),
            initial_parameters: DetectionParameters::default(),
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("settings.json"))
    }

    /// Reads the user's settings file, falling back to defaults.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// A missing file yields defaults silently; an unreadable or malformed
    /// one is reported as a warning and also yields defaults.
    pub fn load_from(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("Could not read {}: {e}; using defaults", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str::<Settings>(&json) {
            Ok(mut settings) => {
                settings.initial_parameters = settings.initial_parameters.clamped();
                log::debug!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring malformed {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Where the classifier lives: the configured override, or the
    /// per-user cache location.
    pub fn classifier_path(&self) -> Result<PathBuf, ClassifierResolveError> {
        match &self.classifier_path {
            Some(path) => Ok(path.clone()),
            None => default_classifier_path(),
        }
    }
}
