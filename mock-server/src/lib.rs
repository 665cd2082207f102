//! In-memory stand-in for the clinic REST service.
//!
//! Serves the same routes and JSON shapes as the real backend under `/api`,
//! so the client crate can be exercised end-to-end without it.

pub mod config;
pub mod logger;
pub mod store;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tokio::{net::TcpListener, sync::RwLock};

pub use store::{Animal, Appointment, Owner, Store};
use store::{AnimalInput, AppointmentInput, OwnerInput};

pub type Db = Arc<RwLock<Store>>;

#[derive(Deserialize)]
pub struct OwnerSearch {
    pub query: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalSearch {
    pub species: Option<String>,
    pub owner_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct AppointmentSearch {
    pub veterinarian: Option<String>,
    pub status: Option<String>,
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/owners", get(list_owners).post(create_owner))
        .route("/api/owners/search", get(search_owners))
        .route(
            "/api/owners/{id}",
            get(get_owner).put(update_owner).delete(delete_owner),
        )
        .route("/api/animals", get(list_animals).post(create_animal))
        .route("/api/animals/search", get(search_animals))
        .route("/api/animals/species/{species}", get(animals_by_species))
        .route(
            "/api/animals/{id}",
            get(get_animal).put(update_animal).delete(delete_animal),
        )
        .route(
            "/api/appointments",
            get(list_appointments).post(create_appointment),
        )
        .route("/api/appointments/search", get(search_appointments))
        .route(
            "/api/appointments/{id}",
            get(get_appointment)
                .put(update_appointment)
                .delete(delete_appointment),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        log::info!("clinic mock server listening on {addr}");
    }
    axum::serve(listener, app()).await
}

fn deleted(removed: bool) -> Result<StatusCode, StatusCode> {
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

// ---------------------------------------------------------------------------
// Owners
// ---------------------------------------------------------------------------

async fn list_owners(State(db): State<Db>) -> Json<Vec<Owner>> {
    let store = db.read().await;
    Json(store.list_owners())
}

async fn get_owner(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Owner>, StatusCode> {
    let store = db.read().await;
    store.get_owner(id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn create_owner(State(db): State<Db>, Json(input): Json<OwnerInput>) -> Json<Owner> {
    let mut store = db.write().await;
    let owner = store.create_owner(input);
    log::debug!("created owner {}", owner.id);
    Json(owner)
}

async fn update_owner(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<OwnerInput>,
) -> Result<Json<Owner>, StatusCode> {
    let mut store = db.write().await;
    store.update_owner(id, input).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn delete_owner(State(db): State<Db>, Path(id): Path<i64>) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    deleted(store.delete_owner(id))
}

async fn search_owners(
    State(db): State<Db>,
    Query(search): Query<OwnerSearch>,
) -> Json<Vec<Owner>> {
    let store = db.read().await;
    Json(store.search_owners(search.query.as_deref()))
}

// ---------------------------------------------------------------------------
// Animals
// ---------------------------------------------------------------------------

async fn list_animals(State(db): State<Db>) -> Json<Vec<Animal>> {
    let store = db.read().await;
    Json(store.list_animals())
}

async fn get_animal(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Animal>, StatusCode> {
    let store = db.read().await;
    store.get_animal(id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn create_animal(State(db): State<Db>, Json(input): Json<AnimalInput>) -> Json<Animal> {
    let mut store = db.write().await;
    let animal = store.create_animal(input);
    log::debug!("created animal {}", animal.id);
    Json(animal)
}

async fn update_animal(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<AnimalInput>,
) -> Result<Json<Animal>, StatusCode> {
    let mut store = db.write().await;
    store.update_animal(id, input).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn delete_animal(State(db): State<Db>, Path(id): Path<i64>) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    deleted(store.delete_animal(id))
}

async fn search_animals(
    State(db): State<Db>,
    Query(search): Query<AnimalSearch>,
) -> Json<Vec<Animal>> {
    let store = db.read().await;
    Json(store.search_animals(search.species.as_deref(), search.owner_id))
}

async fn animals_by_species(
    State(db): State<Db>,
    Path(species): Path<String>,
) -> Json<Vec<Animal>> {
    let store = db.read().await;
    Json(store.search_animals(Some(species.as_str()), None))
}

// ---------------------------------------------------------------------------
// Appointments
// ---------------------------------------------------------------------------

async fn list_appointments(State(db): State<Db>) -> Json<Vec<Appointment>> {
    let store = db.read().await;
    Json(store.list_appointments())
}

async fn get_appointment(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<Appointment>, StatusCode> {
    let store = db.read().await;
    store.get_appointment(id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn create_appointment(
    State(db): State<Db>,
    Json(input): Json<AppointmentInput>,
) -> Json<Appointment> {
    let mut store = db.write().await;
    let appointment = store.create_appointment(input);
    log::debug!("created appointment {}", appointment.id);
    Json(appointment)
}

async fn update_appointment(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<AppointmentInput>,
) -> Result<Json<Appointment>, StatusCode> {
    let mut store = db.write().await;
    store
        .update_appointment(id, input)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn delete_appointment(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    deleted(store.delete_appointment(id))
}

async fn search_appointments(
    State(db): State<Db>,
    Query(search): Query<AppointmentSearch>,
) -> Json<Vec<Appointment>> {
    let store = db.read().await;
    Json(store.search_appointments(
        search.veterinarian.as_deref(),
        search.status.as_deref(),
    ))
}
