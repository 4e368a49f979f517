//! One party's game state. Everything here is synchronous; storage I/O and
//! the tick timer live in the driver and the HTTP layer.

use std::collections::VecDeque;

use serde::Serialize;
use tokio::time::Instant;

use super::{Participant, PartyError, Track};
use crate::store::Partitions;
use crate::wheel::{
    Phase, PlaybackClock, SeatRing, Selection, SpinConfig, SpinController, Tick, WheelError,
};

pub struct Party {
    id: String,
    parts: Partitions,
    epoch: Instant,
    ring: SeatRing<Participant>,
    controller: SpinController,
    clock: PlaybackClock,
    queue: VecDeque<Participant>,
    winners: Vec<Participant>,
    pending: Option<Selection<Participant>>,
    track: Option<Track>,
    spin_id: u64,
}

/// Result of acknowledging a winner.
#[derive(Debug, Clone, Serialize)]
pub struct Acknowledged {
    pub winner: Participant,
    pub seat_index: usize,
    /// Who moved from the queue into the freed chair, if anyone.
    pub seated: Option<Participant>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatView {
    pub index: usize,
    pub angle: f64,
    pub occupant: Option<Participant>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartySnapshot {
    pub id: String,
    pub seats: Vec<SeatView>,
    pub rotation: f64,
    pub phase: Phase,
    pub elapsed_ms: Option<f64>,
    pub queue: Vec<Participant>,
    pub winners: Vec<Participant>,
    pub pending: Option<Selection<Participant>>,
    pub track: Option<Track>,
}

impl Party {
    pub fn new(id: impl Into<String>, parts: Partitions, config: SpinConfig) -> Self {
        Self {
            id: id.into(),
            parts,
            epoch: Instant::now(),
            ring: SeatRing::empty(),
            clock: PlaybackClock::new(config.fallback_track_ms),
            controller: SpinController::new(config),
            queue: VecDeque::new(),
            winners: Vec::new(),
            pending: None,
            track: None,
            spin_id: 0,
        }
    }

    pub fn id(&self) -> &str { &self.id }

    pub fn partitions(&self) -> &Partitions { &self.parts }

    pub fn ring(&self) -> &SeatRing<Participant> { &self.ring }

    pub fn controller(&self) -> &SpinController { &self.controller }

    pub fn queue(&self) -> impl Iterator<Item = &Participant> { self.queue.iter() }

    pub fn winners(&self) -> &[Participant] { &self.winners }

    pub fn pending(&self) -> Option<&Selection<Participant>> { self.pending.as_ref() }

    /// Increments every time a spin starts; lets a stale driver notice it was replaced.
    pub fn spin_id(&self) -> u64 { self.spin_id }

    pub fn is_spinning(&self) -> bool { !self.controller.is_idle() }

    /// Milliseconds since the party was created; the party's tick clock.
    pub fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    pub fn is_registered(&self, file_name: &str) -> bool {
        self.queue.iter().any(|p| p.file_name == file_name)
            || self.ring.seats().any(|s| s.occupant().is_some_and(|p| p.file_name == file_name))
    }

    pub fn enqueue(&mut self, participant: Participant) -> Result<(), PartyError> {
        if self.is_registered(&participant.file_name) {
            return Err(PartyError::AlreadyRegistered);
        }
        self.queue.push_back(participant);
        Ok(())
    }

    /// Moves the queued participant at `position` into the first empty chair.
    pub fn seat_from_queue(&mut self, position: usize) -> Result<usize, PartyError> {
        let seat = self.ring.first_vacant().ok_or(PartyError::RingFull)?;
        let participant = self.queue.remove(position).ok_or(PartyError::QueuePosition(position))?;
        tracing::debug!(party_id = %self.id, seat, file = %participant.file_name, "seated");
        self.ring.occupy(seat, participant)?;
        Ok(seat)
    }

    /// Takes someone off the wheel and puts them back at the head of the queue.
    pub fn unseat(&mut self, seat: usize) -> Result<Option<Participant>, PartyError> {
        if self.pending.as_ref().is_some_and(|p| p.seat_index == seat) {
            return Err(PartyError::AwaitingAcknowledgement);
        }
        let removed = self.ring.vacate(seat)?;
        if let Some(p) = &removed {
            self.queue.push_front(p.clone());
        }
        Ok(removed)
    }

    /// Drops a participant wherever they are, e.g. after their photo was deleted.
    pub fn withdraw(&mut self, file_name: &str) -> Option<Participant> {
        if let Some(pos) = self.queue.iter().position(|p| p.file_name == file_name) {
            return self.queue.remove(pos);
        }
        let seat = self
            .ring
            .seats()
            .find(|s| s.occupant().is_some_and(|p| p.file_name == file_name))
            .map(|s| s.index())?;
        if self.pending.as_ref().is_some_and(|p| p.seat_index == seat) {
            self.pending = None;
        }
        self.ring.vacate(seat).ok().flatten()
    }

    pub fn start_spin(&mut self, now: f64, track: Option<Track>) -> Result<u64, PartyError> {
        if self.pending.is_some() {
            return Err(PartyError::AwaitingAcknowledgement);
        }
        let duration = track.as_ref().and_then(|t| t.duration_ms);
        self.controller.spin(&self.ring, duration)?;
        self.clock.start(now, duration);
        self.track = track;
        self.spin_id += 1;
        tracing::info!(party_id = %self.id, spin = self.spin_id, track = ?self.track.as_ref().map(|t| &t.file), "spin started");
        Ok(self.spin_id)
    }

    pub fn tick(&mut self, now: f64) -> Result<Tick<Participant>, WheelError> {
        self.clock.set_now(now);
        let tick = self.controller.advance(now, &self.clock, &self.ring);
        match &tick {
            Ok(Tick::Selected(selection)) => {
                self.clock.stop();
                self.pending = Some(selection.clone());
            }
            Err(_) => self.clock.stop(),
            Ok(_) => {}
        }
        tick
    }

    pub fn abort(&mut self) -> bool {
        self.clock.stop();
        let aborted = self.controller.abort();
        if aborted {
            tracing::info!(party_id = %self.id, spin = self.spin_id, "spin aborted");
        }
        aborted
    }

    /// Clears the winner from the wheel, records them, and fills the first
    /// empty chair from the front of the queue.
    pub fn acknowledge(&mut self) -> Result<Acknowledged, PartyError> {
        let selection = self.pending.take().ok_or(PartyError::NothingPending)?;
        self.ring.vacate(selection.seat_index)?;
        self.winners.push(selection.occupant.clone());

        let mut seated = None;
        if let Some(seat) = self.ring.first_vacant() {
            if let Some(next) = self.queue.pop_front() {
                self.ring.occupy(seat, next.clone())?;
                seated = Some(next);
            }
        }
        Ok(Acknowledged { winner: selection.occupant, seat_index: selection.seat_index, seated })
    }

    pub fn snapshot(&self) -> PartySnapshot {
        PartySnapshot {
            id: self.id.clone(),
            seats: self
                .ring
                .seats()
                .map(|s| SeatView { index: s.index(), angle: s.angle(), occupant: s.occupant().cloned() })
                .collect(),
            rotation: self.controller.rotation(),
            phase: match (&self.pending, self.controller.phase()) {
                (Some(_), Phase::Idle) => Phase::Stopped,
                (_, phase) => phase,
            },
            elapsed_ms: self.controller.session().map(|s| s.elapsed_ms()),
            queue: self.queue.iter().cloned().collect(),
            winners: self.winners.clone(),
            pending: self.pending.clone(),
            track: self.track.clone(),
        }
    }
}
