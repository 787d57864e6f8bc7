use crate::shared::frame::Frame;

/// An on-screen surface presenting colour frames and reporting key presses.
///
/// `close` tears the surface down and must be idempotent; implementations
/// also close on drop.
pub trait FrameDisplay {
    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Non-blocking: returns the key pressed since the last poll, if any.
    fn poll_key(&mut self) -> Result<Option<char>, Box<dyn std::error::Error>>;

    /// Blocks until any key is pressed.
    fn wait_for_key(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    fn close(&mut self);
}
