//! A party: one wheel, the queue of people waiting for a chair, and the
//! record of who has already been picked.

pub mod driver;
pub mod manager;
pub mod session;
pub mod tracks;

use serde::{Deserialize, Serialize};

use crate::store::StoreError;
use crate::wheel::WheelError;

pub use manager::{PartyManager, SharedParty};
pub use session::{Acknowledged, Party, PartySnapshot, SeatView};
pub use tracks::{Track, TrackPicker, UniformPicker};

/// Someone who registered a photo. Identity is the photo's file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub file_name: String,
}

impl Participant {
    pub fn from_file(file_name: &str) -> Self {
        Self { name: crate::store::partition::display_name(file_name), file_name: file_name.to_string() }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum PartyError {
    #[error("party not found")]
    NotFound,
    #[error("participant already registered")]
    AlreadyRegistered,
    #[error("invalid participant name")]
    InvalidName,
    #[error("photo is empty")]
    EmptyPhoto,
    #[error("no queued participant at position {0}")]
    QueuePosition(usize),
    #[error("every chair is taken")]
    RingFull,
    #[error("the last winner has not been acknowledged")]
    AwaitingAcknowledgement,
    #[error("no winner to acknowledge")]
    NothingPending,
    #[error(transparent)]
    Wheel(#[from] WheelError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
