//! Configuration from environment variables.

use std::str::FromStr;
use std::time::Duration;
use std::{env, net::{Ipv4Addr, SocketAddr}};
use std::path::PathBuf;

use crate::party::Track;
use crate::store::{FsStore, MemoryStore, Store};
use crate::wheel::SpinConfig;

const DEFAULT_TRACKS: &str = "m1.mp3,m2.mp3,m3.mp3,m4.mp3";

/// Parse `name`, falling back to `default` when unset or malformed.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(var = name, value = %raw, "ignoring unparsable setting");
            default
        }),
        Err(_) => default,
    }
}

/// A millisecond setting. Must be finite and non-negative, or strictly
/// positive when `allow_zero` is false.
fn ms_or(name: &str, default: f64, allow_zero: bool) -> f64 {
    checked_ms(name, env_or(name, default), default, allow_zero)
}

fn checked_ms(name: &str, value: f64, default: f64, allow_zero: bool) -> f64 {
    let in_range = if allow_zero { value >= 0.0 } else { value > 0.0 };
    if value.is_finite() && in_range {
        value
    } else {
        tracing::warn!(var = name, value, "ignoring out-of-range duration");
        default
    }
}

/// Socket address to bind the server to.
///
/// Reads the `PORT` env var or defaults to 8080, binds to 0.0.0.0.
pub fn server_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, env_or("PORT", 8080u16)))
}

/// `STORE_DIR` selects a directory-backed store; otherwise photos live in memory.
pub fn store() -> Store {
    match env::var("STORE_DIR") {
        Ok(dir) if !dir.trim().is_empty() => Store::Fs(FsStore::new(PathBuf::from(dir))),
        _ => Store::Memory(MemoryStore::new()),
    }
}

/// Key prefix every party's partitions live under. Always ends in `/` unless empty.
pub fn store_prefix() -> String {
    let mut prefix = env::var("STORE_PREFIX").unwrap_or_else(|_| "parties/".to_string());
    if !prefix.is_empty() && !prefix.ends_with('/') {
        prefix.push('/');
    }
    prefix
}

/// `TRACKS`: comma separated `file[:duration_ms]` entries.
pub fn tracks() -> Vec<Track> {
    let raw = env::var("TRACKS").unwrap_or_else(|_| DEFAULT_TRACKS.to_string());
    parse_tracks(&raw)
}

fn parse_tracks(raw: &str) -> Vec<Track> {
    raw.split(',')
        .filter(|s| !s.trim().is_empty())
        .filter_map(|s| {
            let track = Track::parse(s);
            if track.is_none() {
                tracing::warn!(entry = s, "ignoring malformed track");
            }
            track
        })
        .collect()
}

/// How often a running spin is ticked.
pub fn tick_interval() -> Duration {
    Duration::from_millis(env_or("TICK_MS", 16u64).max(1))
}

pub fn spin_config() -> SpinConfig {
    let d = SpinConfig::default();
    SpinConfig {
        accel_ms: ms_or("SPIN_ACCEL_MS", d.accel_ms, true),
        decel_ms: ms_or("SPIN_DECEL_MS", d.decel_ms, true),
        min_speed: env_or("SPIN_MIN_SPEED", d.min_speed),
        max_speed: env_or("SPIN_MAX_SPEED", d.max_speed),
        fallback_track_ms: ms_or("SPIN_FALLBACK_MS", d.fallback_track_ms, false),
        pointer_angle: d.pointer_angle,
    }
}

/// Everything the server reads from the environment at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub store_prefix: String,
    pub tracks: Vec<Track>,
    pub tick: Duration,
    pub spin: SpinConfig,
}

impl Settings {
    pub fn from_env() -> Self {
        Self { store_prefix: store_prefix(), tracks: tracks(), tick: tick_interval(), spin: spin_config() }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_prefix: "parties/".to_string(),
            tracks: parse_tracks(DEFAULT_TRACKS),
            tick: Duration::from_millis(16),
            spin: SpinConfig::default(),
        }
    }
}
