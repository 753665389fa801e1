use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

/// Variable-timestep frame clock. Each frame measures the wall-clock delta
/// since the previous frame and feeds a short sample ring for a smoothed
/// FPS estimate (cosmetic, shown in the window title).
pub struct FrameClock {
    last_instant: Instant,
    /// Clamp applied to a single frame's delta. A long stall (window drag,
    /// debugger pause) otherwise teleports the flail on resume.
    pub max_dt: f64,
    pub dt: f64,
    pub total_time: f64,
    pub frame_count: u64,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_instant: Instant::now(),
            max_dt: 0.25,
            dt: 0.0,
            total_time: 0.0,
            frame_count: 0,
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    /// Measure the frame delta. Returns `dt` in seconds.
    pub fn begin_frame(&mut self) -> f64 {
        let now = Instant::now();
        self.dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;

        if self.dt > self.max_dt {
            log::warn!(
                "Frame took {:.1}ms, clamping delta to {}ms",
                self.dt * 1000.0,
                self.max_dt * 1000.0
            );
            self.dt = self.max_dt;
        }

        self.total_time += self.dt;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        self.dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
