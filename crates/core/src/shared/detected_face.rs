/// Axis-aligned bounding box of a detected face, in frame pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DetectedFace {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl DetectedFace {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Intersects the box with a `frame_width` x `frame_height` frame.
    ///
    /// Returns `None` when nothing of the box is visible.
    pub fn clamp_to(&self, frame_width: u32, frame_height: u32) -> Option<DetectedFace> {
        let x1 = self.x.max(0);
        let y1 = self.y.max(0);
        let x2 = self.right().min(frame_width as i32);
        let y2 = self.bottom().min(frame_height as i32);
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(DetectedFace::new(x1, y1, x2 - x1, y2 - y1))
    }
}
