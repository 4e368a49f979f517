//! Background tracks and how one gets picked for a spin.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub file: String,
    /// Unknown until the player has loaded the file.
    pub duration_ms: Option<f64>,
}

impl Track {
    /// Parses `file` or `file:duration_ms`.
    pub fn parse(entry: &str) -> Option<Self> {
        let entry = entry.trim();
        let (file, duration_ms) = match entry.split_once(':') {
            Some((file, ms)) => (file.trim(), Some(ms.trim().parse::<f64>().ok()?)),
            None => (entry, None),
        };
        if file.is_empty() {
            return None;
        }
        Some(Self { file: file.to_string(), duration_ms })
    }
}

pub trait TrackPicker: Send {
    fn pick<'a>(&mut self, tracks: &'a [Track]) -> Option<&'a Track>;
}

/// Plain uniform choice; nothing about it is meant to be fair in a
/// cryptographic sense.
#[derive(Debug)]
pub struct UniformPicker<R = StdRng> {
    rng: R,
}

impl UniformPicker<StdRng> {
    pub fn from_entropy() -> Self { Self { rng: StdRng::from_entropy() } }

    pub fn seeded(seed: u64) -> Self { Self { rng: StdRng::seed_from_u64(seed) } }
}

impl<R: Rng + Send> TrackPicker for UniformPicker<R> {
    fn pick<'a>(&mut self, tracks: &'a [Track]) -> Option<&'a Track> {
        tracks.choose(&mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_track_entries() {
        assert_eq!(Track::parse("m1.mp3"), Some(Track { file: "m1.mp3".into(), duration_ms: None }));
        assert_eq!(
            Track::parse(" m2.mp3 : 31500 "),
            Some(Track { file: "m2.mp3".into(), duration_ms: Some(31_500.0) })
        );
        assert_eq!(Track::parse("m3.mp3:long"), None);
        assert_eq!(Track::parse(":1000"), None);
    }

    #[test]
    fn uniform_picker_stays_in_bounds() {
        let tracks: Vec<Track> = ["a", "b", "c", "d"].iter().filter_map(|f| Track::parse(f)).collect();
        let mut picker = UniformPicker::seeded(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let picked = picker.pick(&tracks).unwrap();
            seen.insert(picked.file.clone());
        }
        assert_eq!(seen.len(), 4);
        assert!(picker.pick(&[]).is_none());
    }
}
