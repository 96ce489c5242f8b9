use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_seek_timeout_ms() -> u64 {
    500
}

fn default_toggle_throttle_ms() -> u64 {
    100
}

fn default_autoplay() -> bool {
    true
}

fn default_min_rate() -> f64 {
    0.25
}

fn default_max_rate() -> f64 {
    4.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Upper bound on waiting for a seek acknowledgment before the seeking
    /// flag is cleared anyway.
    #[serde(default = "default_seek_timeout_ms")]
    pub seek_timeout_ms: u64,
    /// Minimum spacing between two visible `isPlaying` changes.
    #[serde(default = "default_toggle_throttle_ms")]
    pub toggle_throttle_ms: u64,
    #[serde(default = "default_autoplay")]
    pub autoplay: bool,
    #[serde(default = "default_min_rate")]
    pub min_rate: f64,
    #[serde(default = "default_max_rate")]
    pub max_rate: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            seek_timeout_ms: default_seek_timeout_ms(),
            toggle_throttle_ms: default_toggle_throttle_ms(),
            autoplay: default_autoplay(),
            min_rate: default_min_rate(),
            max_rate: default_max_rate(),
        }
    }
}

impl PlaybackConfig {
    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    pub fn seek_timeout(&self) -> Duration {
        Duration::from_millis(self.seek_timeout_ms)
    }

    pub fn toggle_throttle(&self) -> Duration {
        Duration::from_millis(self.toggle_throttle_ms)
    }

    /// `None` for rates that are not finite and positive; otherwise the rate
    /// clamped into the configured range.
    pub fn clamp_rate(&self, rate: f64) -> Option<f64> {
        if !rate.is_finite() || rate <= 0.0 {
            return None;
        }
        let (lo, hi) = if self.min_rate <= self.max_rate {
            (self.min_rate, self.max_rate)
        } else {
            (self.max_rate, self.min_rate)
        };
        Some(rate.clamp(lo, hi))
    }
}
