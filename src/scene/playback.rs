//! Wall-clock driven playback.

use super::session::Session;
use crate::config::Settings;
use crate::util::Chrono;

/// Map an elapsed time onto `[0, max_time]`.
///
/// Looping wraps with a floating-point remainder; otherwise the time holds
/// at `max_time`. Static archives (`max_time <= 0`) always map to zero.
pub fn wrap_time(elapsed: Chrono, max_time: Chrono, looping: bool) -> Chrono {
    if max_time.is_nan() || max_time <= 0.0 || !elapsed.is_finite() {
        return 0.0;
    }
    if looping {
        elapsed.rem_euclid(max_time)
    } else {
        elapsed.clamp(0.0, max_time)
    }
}

/// Playback clock feeding a session once per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Playback {
    elapsed: Chrono,
    speed: f64,
    looping: bool,
    paused: bool,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(1.0, true)
    }
}

impl Playback {
    pub fn new(speed: f64, looping: bool) -> Self {
        Self {
            elapsed: 0.0,
            speed,
            looping,
            paused: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.playback_speed, settings.loop_playback)
    }

    pub fn elapsed(&self) -> Chrono {
        self.elapsed
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Advance by a frame delta and return the wrapped scene time.
    pub fn advance(&mut self, dt: f64, max_time: Chrono) -> Chrono {
        if !self.paused {
            self.elapsed += dt * self.speed;
        }
        wrap_time(self.elapsed, max_time, self.looping)
    }

    /// Advance and evaluate `session` at the resulting time.
    pub fn tick(&mut self, session: &mut Session, dt: f64) -> Chrono {
        let time = self.advance(dt, session.max_time());
        session.set_time(time);
        time
    }
}
