//! HTTP handlers: parties, participants, photos and the spin lifecycle.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::json;

use crate::config::Settings;
use crate::party::driver::spawn_spin;
use crate::party::{
    Acknowledged, Participant, PartyError, PartyManager, PartySnapshot, Track, TrackPicker, UniformPicker,
};
use crate::store::partition::{self, file_name_for};
use crate::store::{BlobStore, Store, StoreError};
use crate::wheel::WheelError;

#[derive(Clone)]
pub struct AppState {
    pub parties: PartyManager,
    pub store: Arc<Store>,
    pub settings: Arc<Settings>,
    pub picker: Arc<Mutex<dyn TrackPicker>>,
}

impl AppState {
    pub fn new(store: Store, settings: Settings) -> Self {
        Self::with_picker(store, settings, UniformPicker::from_entropy())
    }

    pub fn with_picker(store: Store, settings: Settings, picker: impl TrackPicker + 'static) -> Self {
        Self {
            parties: PartyManager::new(settings.store_prefix.clone(), settings.spin),
            store: Arc::new(store),
            settings: Arc::new(settings),
            picker: Arc::new(Mutex::new(picker)),
        }
    }
}

impl IntoResponse for PartyError {
    fn into_response(self) -> Response {
        let status = match &self {
            PartyError::NotFound => StatusCode::NOT_FOUND,
            PartyError::AlreadyRegistered
            | PartyError::RingFull
            | PartyError::AwaitingAcknowledgement
            | PartyError::NothingPending => StatusCode::CONFLICT,
            PartyError::InvalidName | PartyError::EmptyPhoto | PartyError::QueuePosition(_) => StatusCode::BAD_REQUEST,
            PartyError::Wheel(err) => match err {
                WheelError::AlreadySpinning | WheelError::SeatOccupied(_) | WheelError::NoOccupiedSeats => {
                    StatusCode::CONFLICT
                }
                WheelError::SeatOutOfRange(_) | WheelError::InvalidSeatCount { .. } => StatusCode::BAD_REQUEST,
            },
            PartyError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            PartyError::Store(StoreError::InvalidKey(_)) => StatusCode::BAD_REQUEST,
            PartyError::Store(StoreError::Io(err)) => {
                tracing::error!(%err, "storage failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub async fn healthz() -> &'static str { "ok" }

#[derive(Serialize)]
pub struct CreatedParty {
    pub id: String,
}

pub async fn create_party(State(state): State<AppState>) -> impl IntoResponse {
    let id = state.parties.create();
    (StatusCode::CREATED, Json(CreatedParty { id }))
}

pub async fn view_party(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<PartySnapshot>, PartyError> {
    let party = state.parties.get(&id)?;
    let snapshot = party.lock().snapshot();
    Ok(Json(snapshot))
}

pub async fn close_party(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, PartyError> {
    let party = state.parties.remove(&id).ok_or(PartyError::NotFound)?;
    party.lock().abort();
    tracing::info!(party_id = %id, "party closed");
    Ok(StatusCode::NO_CONTENT)
}

/// Uploads a photo into the incoming partition and queues its owner.
pub async fn register(
    Path((id, name)): Path<(String, String)>,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Participant>), PartyError> {
    let file_name = file_name_for(&name).ok_or(PartyError::InvalidName)?;
    if body.is_empty() {
        return Err(PartyError::EmptyPhoto);
    }
    let party = state.parties.get(&id)?;
    let participant = Participant::from_file(&file_name);
    // the name is claimed before storage is touched; a duplicate never writes
    let parts = {
        let mut p = party.lock();
        p.enqueue(participant.clone())?;
        p.partitions().clone()
    };
    if let Err(err) = state.store.put(&parts.incoming_key(&file_name), body).await {
        party.lock().withdraw(&file_name);
        return Err(err.into());
    }
    tracing::info!(party_id = %id, file = %file_name, "participant registered");
    Ok((StatusCode::CREATED, Json(participant)))
}

/// Photo bytes from whichever partition currently holds the file.
pub async fn photo(
    Path((id, file)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Response, PartyError> {
    let parts = state.parties.get(&id)?.lock().partitions().clone();
    let body = match state.store.get(&parts.incoming_key(&file)).await {
        Err(StoreError::NotFound(_)) => state.store.get(&parts.completed_key(&file)).await?,
        other => other?,
    };
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], body).into_response())
}

pub async fn delete_photo(
    Path((id, file)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<StatusCode, PartyError> {
    let party = state.parties.get(&id)?;
    let parts = party.lock().partitions().clone();
    state.store.delete(&parts.incoming_key(&file)).await?;
    if party.lock().withdraw(&file).is_some() {
        tracing::info!(party_id = %id, %file, "participant withdrawn");
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_incoming(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Participant>>, PartyError> {
    let parts = state.parties.get(&id)?.lock().partitions().clone();
    let keys = state.store.list(&parts.incoming_prefix()).await?;
    let participants = keys
        .iter()
        .filter(|k| parts.is_participant_key(k))
        .map(|k| Participant::from_file(partition::file_segment(k)))
        .collect();
    Ok(Json(participants))
}

/// Completed participants, in reverse key order.
pub async fn list_completed(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Participant>>, PartyError> {
    let parts = state.parties.get(&id)?.lock().partitions().clone();
    let keys = state.store.list(&parts.completed_prefix()).await?;
    let participants = keys
        .iter()
        .rev()
        .filter(|k| parts.is_completed_key(k))
        .map(|k| Participant::from_file(partition::file_segment(k)))
        .collect();
    Ok(Json(participants))
}

/// Moves a completed participant back to incoming and queues them again.
pub async fn restore(
    Path((id, file)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Json<Participant>, PartyError> {
    let party = state.parties.get(&id)?;
    let parts = party.lock().partitions().clone();
    let participant = Participant::from_file(&file);
    party.lock().enqueue(participant.clone())?;
    if let Err(err) = partition::restore(state.store.as_ref(), &parts, &file).await {
        party.lock().withdraw(&file);
        return Err(err.into());
    }
    Ok(Json(participant))
}

#[derive(Serialize)]
pub struct Seated {
    pub seat: usize,
}

pub async fn seat(
    Path((id, position)): Path<(String, usize)>,
    State(state): State<AppState>,
) -> Result<Json<Seated>, PartyError> {
    let seat = state.parties.get(&id)?.lock().seat_from_queue(position)?;
    Ok(Json(Seated { seat }))
}

pub async fn vacate(
    Path((id, index)): Path<(String, usize)>,
    State(state): State<AppState>,
) -> Result<Json<Option<Participant>>, PartyError> {
    let removed = state.parties.get(&id)?.lock().unseat(index)?;
    Ok(Json(removed))
}

#[derive(Serialize)]
pub struct SpinStarted {
    pub spin_id: u64,
    pub track: Option<Track>,
}

pub async fn spin(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SpinStarted>, PartyError> {
    let party = state.parties.get(&id)?;
    let track = state.picker.lock().pick(&state.settings.tracks).cloned();
    let spin_id = {
        let mut p = party.lock();
        let now = p.now_ms();
        p.start_spin(now, track.clone())?
    };
    spawn_spin(party, state.store.clone(), spin_id, state.settings.tick);
    Ok(Json(SpinStarted { spin_id, track }))
}

#[derive(Serialize)]
pub struct Aborted {
    pub aborted: bool,
}

pub async fn abort(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Aborted>, PartyError> {
    let aborted = state.parties.get(&id)?.lock().abort();
    Ok(Json(Aborted { aborted }))
}

pub async fn acknowledge(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Acknowledged>, PartyError> {
    let ack = state.parties.get(&id)?.lock().acknowledge()?;
    tracing::info!(party_id = %id, winner = %ack.winner.file_name, seat = ack.seat_index, "winner acknowledged");
    Ok(Json(ack))
}
