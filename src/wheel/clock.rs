//! The playback clock a spin is bound to.

use super::spin::DEFAULT_FALLBACK_TRACK_MS;

/// Read-only view of the audio track driving a spin. The wheel never
/// controls playback; it only watches it.
pub trait TrackClock {
    fn is_playing(&self) -> bool;

    /// Track length, if the source knows it yet.
    fn duration_ms(&self) -> Option<f64>;
}

/// A track timeline replayed from a start instant and a known (or assumed)
/// length. Stands in for an audio element when the wheel runs server side.
#[derive(Debug, Clone, Default)]
pub struct PlaybackClock {
    started_at: Option<f64>,
    duration_ms: Option<f64>,
    fallback_ms: f64,
    now: f64,
}

impl PlaybackClock {
    pub fn new(fallback_ms: f64) -> Self {
        let fallback_ms = if fallback_ms.is_finite() && fallback_ms > 0.0 {
            fallback_ms
        } else {
            DEFAULT_FALLBACK_TRACK_MS
        };
        Self { fallback_ms, ..Self::default() }
    }

    pub fn start(&mut self, now: f64, duration_ms: Option<f64>) {
        self.started_at = Some(now);
        self.duration_ms = duration_ms.filter(|d| d.is_finite() && *d > 0.0);
        self.now = now;
    }

    pub fn stop(&mut self) {
        self.started_at = None;
    }

    /// Moves the timeline forward; earlier timestamps are ignored.
    pub fn set_now(&mut self, now: f64) {
        if now > self.now {
            self.now = now;
        }
    }

    pub fn position_ms(&self) -> Option<f64> {
        self.started_at.map(|start| self.now - start)
    }
}

impl TrackClock for PlaybackClock {
    fn is_playing(&self) -> bool {
        match self.position_ms() {
            Some(pos) => pos < self.duration_ms.unwrap_or(self.fallback_ms),
            None => false,
        }
    }

    fn duration_ms(&self) -> Option<f64> {
        self.duration_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plays_until_duration_elapses() {
        let mut clock = PlaybackClock::new(10_000.0);
        assert!(!clock.is_playing());
        clock.start(500.0, Some(2_000.0));
        assert!(clock.is_playing());
        clock.set_now(2_499.0);
        assert!(clock.is_playing());
        clock.set_now(2_500.0);
        assert!(!clock.is_playing());
        assert_eq!(clock.position_ms(), Some(2_000.0));
    }

    #[test]
    fn unknown_duration_uses_fallback() {
        let mut clock = PlaybackClock::new(10_000.0);
        clock.start(0.0, Some(f64::NAN));
        assert_eq!(clock.duration_ms(), None);
        clock.set_now(9_999.0);
        assert!(clock.is_playing());
        clock.set_now(10_000.0);
        assert!(!clock.is_playing());
    }

    #[test]
    fn unusable_fallback_is_replaced() {
        let mut clock = PlaybackClock::new(f64::NAN);
        clock.start(0.0, None);
        clock.set_now(9_000.0);
        assert!(clock.is_playing());
        clock.set_now(DEFAULT_FALLBACK_TRACK_MS);
        assert!(!clock.is_playing());
    }

    #[test]
    fn time_does_not_run_backwards() {
        let mut clock = PlaybackClock::new(1_000.0);
        clock.start(100.0, None);
        clock.set_now(600.0);
        clock.set_now(200.0);
        assert_eq!(clock.position_ms(), Some(500.0));
        clock.stop();
        assert!(!clock.is_playing());
    }
}
