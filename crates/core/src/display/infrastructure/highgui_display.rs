use opencv::highgui;

use crate::display::domain::frame_display::FrameDisplay;
use crate::shared::frame::Frame;
use crate::shared::mat_interop::frame_to_bgr_mat;

/// A single OpenCV highgui window.
pub struct HighguiDisplay {
    window: String,
    open: bool,
}

impl HighguiDisplay {
    pub fn open(window: &str) -> opencv::Result<Self> {
        highgui::named_window(window, highgui::WINDOW_AUTOSIZE)?;
        log::debug!("Opened window '{window}'");
        Ok(Self {
            window: window.to_string(),
            open: true,
        })
    }
}

/// Maps a highgui key code to a character; `-1` means no key.
pub(crate) fn key_from_code(code: i32) -> Option<char> {
    if code < 0 {
        return None;
    }
    Some(((code & 0xFF) as u8) as char)
}

impl FrameDisplay for HighguiDisplay {
    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if !self.open {
            return Err(format!("window '{}' is closed", self.window).into());
        }
        let bgr = frame_to_bgr_mat(frame)?;
        highgui::imshow(&self.window, &bgr)?;
        Ok(())
    }

    fn poll_key(&mut self) -> Result<Option<char>, Box<dyn std::error::Error>> {
        Ok(key_from_code(highgui::poll_key()?))
    }

    fn wait_for_key(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        highgui::wait_key(0)?;
        Ok(())
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

impl Drop for HighguiDisplay {
    fn drop(&mut self) {
        self.close();
    }
}
