use std::time::{Duration, Instant};

/// Timing snapshot handed to every component once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GameTime {
    pub total: Duration,
    pub elapsed: Duration,
}

impl GameTime {
    pub fn new(total: Duration, elapsed: Duration) -> Self {
        GameTime { total, elapsed }
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    pub fn total_seconds(&self) -> f32 {
        self.total.as_secs_f32()
    }
}

pub struct GameClock {
    start: Instant,
    last_tick: Instant,
}

impl GameClock {
    pub fn start() -> Self {
        let now = Instant::now();
        GameClock {
            start: now,
            last_tick: now,
        }
    }

    pub fn tick(&mut self) -> GameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> GameTime {
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        GameTime::new(now.saturating_duration_since(self.start), elapsed)
    }
}
