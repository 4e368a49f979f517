//! The spinning wheel: seat geometry, the spin controller and its clock port.

pub mod clock;
pub mod ring;
pub mod spin;

pub use clock::{PlaybackClock, TrackClock};
pub use ring::{Seat, SeatRing, SEAT_COUNT};
pub use spin::{
    Phase, Selection, SpinConfig, SpinController, SpinSession, Tick, VelocityProfile, DEFAULT_FALLBACK_TRACK_MS,
};

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelError {
    #[error("expected {expected} seats, got {got}")]
    InvalidSeatCount { expected: usize, got: usize },
    #[error("seat {0} is already occupied")]
    SeatOccupied(usize),
    #[error("seat {0} does not exist")]
    SeatOutOfRange(usize),
    #[error("no occupied seats")]
    NoOccupiedSeats,
    #[error("a spin is already running")]
    AlreadySpinning,
}

/// Reduce an angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let a = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Shortest distance between two angles on the circle, in `[0, 180]`.
pub fn circular_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).abs() % 360.0;
    d.min(360.0 - d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_wraps_both_directions() {
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-30.0), 330.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
        assert_eq!(normalize_degrees(-1e-17), 0.0);
    }

    #[test]
    fn circular_distance_stays_within_half_turn() {
        assert_eq!(circular_distance(10.0, 350.0), 20.0);
        assert_eq!(circular_distance(0.0, 180.0), 180.0);
        assert_eq!(circular_distance(-90.0, 90.0), 180.0);
        assert_eq!(circular_distance(725.0, 5.0), 0.0);
        for step in 0..72 {
            let d = circular_distance(step as f64 * 13.7, -(step as f64) * 4.1);
            assert!((0.0..=180.0).contains(&d));
        }
    }
}
