//! Spin controller: a phased velocity profile bound to a track, ticked by the
//! caller, that resolves and snaps onto the occupant nearest the pointer once
//! the track stops.

use serde::{Deserialize, Serialize};

use super::clock::TrackClock;
use super::ring::SeatRing;
use super::{normalize_degrees, WheelError};

/// Track length assumed when nobody can say how long the music runs.
pub const DEFAULT_FALLBACK_TRACK_MS: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    pub accel_ms: f64,
    pub decel_ms: f64,
    /// Degrees per millisecond.
    pub min_speed: f64,
    pub max_speed: f64,
    /// Used when neither the caller nor the clock knows the track length.
    pub fallback_track_ms: f64,
    pub pointer_angle: f64,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            accel_ms: 3000.0,
            decel_ms: 3000.0,
            min_speed: 0.02,
            max_speed: 0.2,
            fallback_track_ms: DEFAULT_FALLBACK_TRACK_MS,
            pointer_angle: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Accelerating,
    Cruising,
    Decelerating,
    /// Landed on a winner that has not been dealt with yet. The controller
    /// itself is idle again by then; the owner of the selection reports this.
    Stopped,
}

/// Speed as a function of time since the spin started, for one track length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityProfile {
    accel_ms: f64,
    decel_ms: f64,
    track_ms: f64,
    min_speed: f64,
    max_speed: f64,
}

impl VelocityProfile {
    /// Accel and decel windows are clamped to half the track each so the
    /// cruise window can shrink to zero but never go negative. A track length
    /// that is not a positive number is replaced by the default fallback.
    pub fn new(config: &SpinConfig, track_ms: f64) -> Self {
        let track_ms = if valid_duration(track_ms) { track_ms } else { DEFAULT_FALLBACK_TRACK_MS };
        let half = track_ms / 2.0;
        Self {
            accel_ms: config.accel_ms.min(half).max(0.0),
            decel_ms: config.decel_ms.min(half).max(0.0),
            track_ms,
            min_speed: config.min_speed,
            max_speed: config.max_speed,
        }
    }

    pub fn track_ms(&self) -> f64 { self.track_ms }
    pub fn accel_ms(&self) -> f64 { self.accel_ms }
    pub fn decel_ms(&self) -> f64 { self.decel_ms }

    pub fn cruise_ms(&self) -> f64 {
        self.track_ms - self.accel_ms - self.decel_ms
    }

    pub fn at(&self, elapsed: f64) -> (Phase, f64) {
        let span = self.max_speed - self.min_speed;
        let decel_start = self.track_ms - self.decel_ms;
        if elapsed < self.accel_ms {
            // ease-out cubic
            let k = elapsed / self.accel_ms;
            (Phase::Accelerating, self.min_speed + span * (1.0 - (1.0 - k).powi(3)))
        } else if elapsed < decel_start {
            (Phase::Cruising, self.max_speed)
        } else if elapsed < self.track_ms {
            // ease-in cubic
            let k = (elapsed - decel_start) / self.decel_ms;
            (Phase::Decelerating, self.max_speed - span * k.powi(3))
        } else {
            // track overran its reported length: crawl until the clock stops
            (Phase::Decelerating, self.min_speed)
        }
    }
}

/// State of one spin, from `spin()` until it stops or is aborted.
#[derive(Debug, Clone)]
pub struct SpinSession {
    phase: Phase,
    started_at: Option<f64>,
    last_timestamp: Option<f64>,
    elapsed_ms: f64,
    speed: f64,
    track_hint: Option<f64>,
    profile: Option<VelocityProfile>,
}

impl SpinSession {
    fn new(track_hint: Option<f64>, min_speed: f64) -> Self {
        Self {
            phase: Phase::Accelerating,
            started_at: None,
            last_timestamp: None,
            elapsed_ms: 0.0,
            speed: min_speed,
            track_hint: track_hint.filter(|d| valid_duration(*d)),
            profile: None,
        }
    }

    pub fn phase(&self) -> Phase { self.phase }
    pub fn elapsed_ms(&self) -> f64 { self.elapsed_ms }
    pub fn speed(&self) -> f64 { self.speed }

    /// Resolved on the first tick.
    pub fn track_duration_ms(&self) -> Option<f64> {
        self.profile.map(|p| p.track_ms())
    }
}

fn valid_duration(ms: f64) -> bool {
    ms.is_finite() && ms > 0.0
}

/// The winner of a spin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection<O> {
    pub seat_index: usize,
    pub occupant: O,
    /// Wheel rotation after the snap.
    pub rotation: f64,
}

/// Outcome of one [`SpinController::advance`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick<O> {
    /// No spin running; nothing happened.
    Idle,
    /// Still turning.
    Continue,
    Selected(Selection<O>),
}

impl<O> Tick<O> {
    /// Whether the caller should schedule another frame.
    pub fn wants_next_frame(&self) -> bool {
        matches!(self, Tick::Continue)
    }
}

#[derive(Debug, Clone)]
pub struct SpinController {
    config: SpinConfig,
    rotation: f64,
    session: Option<SpinSession>,
    last_result: Option<usize>,
}

impl SpinController {
    pub fn new(config: SpinConfig) -> Self {
        Self { config, rotation: 0.0, session: None, last_result: None }
    }

    pub fn config(&self) -> &SpinConfig { &self.config }

    pub fn rotation(&self) -> f64 { self.rotation }

    pub fn session(&self) -> Option<&SpinSession> { self.session.as_ref() }

    pub fn last_result(&self) -> Option<usize> { self.last_result }

    pub fn phase(&self) -> Phase {
        self.session.as_ref().map(|s| s.phase).unwrap_or(Phase::Idle)
    }

    pub fn is_idle(&self) -> bool { self.session.is_none() }

    /// Starts a spin. The track length may be unknown here; the clock is
    /// asked again on the first tick before falling back to the default.
    pub fn spin<O>(&mut self, ring: &SeatRing<O>, track_hint_ms: Option<f64>) -> Result<(), WheelError> {
        if self.session.is_some() {
            return Err(WheelError::AlreadySpinning);
        }
        if ring.occupied_count() == 0 {
            return Err(WheelError::NoOccupiedSeats);
        }
        self.last_result = None;
        self.session = Some(SpinSession::new(track_hint_ms, self.config.min_speed));
        tracing::debug!(rotation = self.rotation, ?track_hint_ms, "spin started");
        Ok(())
    }

    /// Drops the running spin without a selection. Returns whether anything was running.
    pub fn abort(&mut self) -> bool {
        self.last_result = None;
        let aborted = self.session.take().is_some();
        if aborted {
            tracing::debug!(rotation = self.rotation, "spin aborted");
        }
        aborted
    }

    /// One scheduling frame. `timestamp` is a monotonic millisecond clock
    /// reading. Once the track stops, the nearest occupant is resolved and
    /// the controller returns to idle; later calls report [`Tick::Idle`].
    pub fn advance<O: Clone, C: TrackClock + ?Sized>(
        &mut self,
        timestamp: f64,
        clock: &C,
        ring: &SeatRing<O>,
    ) -> Result<Tick<O>, WheelError> {
        let Some(session) = self.session.as_mut() else { return Ok(Tick::Idle) };

        let start = *session.started_at.get_or_insert(timestamp);
        let last = session.last_timestamp.unwrap_or(timestamp);
        let profile = match session.profile {
            Some(p) => p,
            None => {
                let track_ms = session
                    .track_hint
                    .or_else(|| clock.duration_ms().filter(|d| valid_duration(*d)))
                    .unwrap_or(self.config.fallback_track_ms);
                let p = VelocityProfile::new(&self.config, track_ms);
                session.profile = Some(p);
                p
            }
        };

        session.elapsed_ms = (timestamp - start).max(0.0);
        let (phase, speed) = profile.at(session.elapsed_ms);
        session.phase = phase;
        session.speed = speed;

        if !clock.is_playing() {
            return self.resolve(ring);
        }

        let dt = (timestamp - last).max(0.0);
        session.last_timestamp = Some(timestamp);
        self.rotation = normalize_degrees(self.rotation + speed * dt);
        Ok(Tick::Continue)
    }

    fn resolve<O: Clone>(&mut self, ring: &SeatRing<O>) -> Result<Tick<O>, WheelError> {
        let pointer = self.config.pointer_angle;
        let found = ring
            .nearest_occupied_seat(pointer, self.rotation)
            .and_then(|i| ring.occupant(i).cloned().map(|o| (i, o)).ok_or(WheelError::NoOccupiedSeats));
        let (seat_index, occupant) = match found {
            Ok(found) => found,
            Err(err) => {
                self.session = None;
                return Err(err);
            }
        };

        let snap_delta = pointer - SeatRing::<O>::effective_angle(seat_index, self.rotation);
        self.rotation += snap_delta;
        self.last_result = Some(seat_index);
        self.session = None;
        tracing::debug!(seat = seat_index, rotation = self.rotation, snap_delta, "spin stopped");

        Ok(Tick::Selected(Selection { seat_index, occupant, rotation: self.rotation }))
    }
}

impl Default for SpinController {
    fn default() -> Self { Self::new(SpinConfig::default()) }
}
