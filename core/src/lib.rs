//! Data-access layer for the veterinary clinic REST service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values for the three
//! clinic resources (owners, pets, appointments), mapping between the
//! backend's wire shapes and one canonical record type per resource.
//!
//! # Design
//! - `Transport` attaches the JSON content type and normalizes every
//!   response into a `Payload` (`Json`, `Text` or `Empty`).
//! - `codec` holds the decode-from-wire / encode-to-wire functions; every
//!   lossy corner of the mapping is visible there.
//! - Resource clients are stateless and split into `build_*` / `parse_*`
//!   halves; `ClinicClient` runs them through an `Executor` (ureq by default).
//! - There is one error type, `ApiError`, and no retries.

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{AppointmentClient, ClinicClient, OwnerClient, PetClient};
pub use config::ClientConfig;
pub use error::ApiError;
pub use executor::{Executor, UreqExecutor};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Payload, RequestOptions, Transport};
pub use types::{
    Appointment, AppointmentPatch, AppointmentSearch, AppointmentStatus, NewAppointment, NewOwner,
    NewPet, Owner, OwnerPatch, Pet, PetPatch,
};
