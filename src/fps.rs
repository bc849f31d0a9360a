use std::time::Duration;

use crate::game_time::GameTime;

const SAMPLE_PERIOD: Duration = Duration::from_secs(1);

/// Frame rate averaged over one-second windows.
#[derive(Debug, Default)]
pub struct FpsCounter {
    frames: u32,
    window: Duration,
    fps: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a frame. Returns true when a new reading is available.
    pub fn update(&mut self, time: &GameTime) -> bool {
        self.frames += 1;
        self.window += time.elapsed;
        if self.window < SAMPLE_PERIOD {
            return false;
        }

        self.fps = (self.frames as f64 / self.window.as_secs_f64()).round() as u32;
        self.frames = 0;
        self.window = Duration::ZERO;
        true
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}
