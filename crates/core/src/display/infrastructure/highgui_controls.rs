use opencv::highgui;

use crate::detection::domain::detection_parameters::{ControlValues, DetectionParameters};
use crate::display::domain::parameter_controls::ParameterControls;
use crate::shared::constants::{
    CONTROLS_WINDOW, MIN_SIZE_CONTROL, MIN_SIZE_CONTROL_MAX, NEIGHBORS_CONTROL,
    NEIGHBORS_CONTROL_MAX, SCALE_CONTROL, SCALE_CONTROL_MAX,
};

/// Three trackbars in a dedicated highgui window.
///
/// Trackbars are read by polling rather than through change callbacks, so
/// parameter state stays with the caller.
pub struct HighguiControls {
    window: String,
    open: bool,
    detached: bool,
}

impl HighguiControls {
    /// Opens the controls window with trackbars positioned at `initial`.
    pub fn open(initial: &DetectionParameters) -> opencv::Result<Self> {
        let window = CONTROLS_WINDOW.to_string();
        highgui::named_window(&window, highgui::WINDOW_AUTOSIZE)?;
        // Constructed before the trackbars so a failure below still
        // destroys the window.
        let controls = Self {
            window,
            open: true,
            detached: false,
        };

        let start = initial.to_controls();
        for (name, max, value) in [
            (SCALE_CONTROL, SCALE_CONTROL_MAX, start.scale),
            (NEIGHBORS_CONTROL, NEIGHBORS_CONTROL_MAX, start.neighbors),
            (MIN_SIZE_CONTROL, MIN_SIZE_CONTROL_MAX, start.min_size),
        ] {
            highgui::create_trackbar(name, &controls.window, None, max, None)?;
            highgui::set_trackbar_pos(name, &controls.window, value.clamp(0, max))?;
        }

        log::debug!("Controls window ready at {start:?}");
        Ok(controls)
    }
}

impl ParameterControls for HighguiControls {
    fn sample(&mut self) -> Result<ControlValues, Box<dyn std::error::Error>> {
        if !self.open {
            return Err("controls window is closed".into());
        }
        let values = ControlValues {
            scale: highgui::get_trackbar_pos(SCALE_CONTROL, &self.window)?,
            neighbors: highgui::get_trackbar_pos(NEIGHBORS_CONTROL, &self.window)?,
            min_size: highgui::get_trackbar_pos(MIN_SIZE_CONTROL, &self.window)?,
        };
        // highgui reports -1 once the user has closed the window.
        if values.is_detached() && !self.detached {
            self.detached = true;
            log::warn!("'{}' window closed; keeping current parameters", self.window);
        }
        Ok(values)
    }

    fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        if let Err(e) = highgui::destroy_window(&self.window) {
            log::warn!("Failed to close window '{}': {e}", self.window);
        }
    }
}

impl Drop for HighguiControls {
    fn drop(&mut self) {
        self.close();
    }
}
