//! Resource clients and the executor-backed facade.
//!
//! # Design
//! `OwnerClient`, `PetClient` and `AppointmentClient` are stateless: each
//! operation is a `build_*` method producing an `HttpRequest` and a `parse_*`
//! method consuming the `HttpResponse`. `ClinicClient` pairs them with an
//! `Executor` so a caller can run an operation in one call. Nothing is cached
//! between calls.

mod appointments;
mod owners;
mod pets;

pub use appointments::AppointmentClient;
pub use owners::OwnerClient;
pub use pets::PetClient;

use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::executor::{Executor, UreqExecutor};
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{
    Appointment, AppointmentPatch, AppointmentSearch, NewAppointment, NewOwner, NewPet, Owner,
    OwnerPatch, Pet, PetPatch,
};

fn to_body<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::Encode(e.to_string()))
}

/// One-call access to every resource operation through an `Executor`.
#[derive(Clone)]
pub struct ClinicClient<E = UreqExecutor> {
    owners: OwnerClient,
    pets: PetClient,
    appointments: AppointmentClient,
    executor: E,
}

impl ClinicClient<UreqExecutor> {
    pub fn new(base_url: &str) -> Self {
        Self::with_executor(base_url, UreqExecutor::new())
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url)
    }
}

impl<E: Executor> ClinicClient<E> {
    pub fn with_executor(base_url: &str, executor: E) -> Self {
        Self {
            owners: OwnerClient::new(base_url),
            pets: PetClient::new(base_url),
            appointments: AppointmentClient::new(base_url),
            executor,
        }
    }

    pub fn owners(&self) -> &OwnerClient {
        &self.owners
    }

    pub fn pets(&self) -> &PetClient {
        &self.pets
    }

    pub fn appointments(&self) -> &AppointmentClient {
        &self.appointments
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.executor.execute(request)
    }

    // -----------------------------------------------------------------------
    // Owners
    // -----------------------------------------------------------------------

    pub fn list_owners(&self) -> Result<Vec<Owner>, ApiError> {
        let response = self.send(self.owners.build_list())?;
        self.owners.parse_owners(response)
    }

    pub fn get_owner(&self, id: i64) -> Result<Owner, ApiError> {
        let response = self.send(self.owners.build_get(id))?;
        self.owners.parse_owner(response)
    }

    pub fn create_owner(&self, owner: &NewOwner) -> Result<Owner, ApiError> {
        let response = self.send(self.owners.build_create(owner)?)?;
        self.owners.parse_owner(response)
    }

    pub fn update_owner(&self, id: i64, owner: &OwnerPatch) -> Result<Owner, ApiError> {
        let response = self.send(self.owners.build_update(id, owner)?)?;
        self.owners.parse_owner(response)
    }

    pub fn delete_owner(&self, id: i64) -> Result<(), ApiError> {
        let response = self.send(self.owners.build_delete(id))?;
        self.owners.parse_delete(response)
    }

    /// Free-text search, evaluated by the backend.
    pub fn search_owners(&self, query: &str) -> Result<Vec<Owner>, ApiError> {
        let response = self.send(self.owners.build_search(query))?;
        self.owners.parse_owners(response)
    }

    // -----------------------------------------------------------------------
    // Pets
    // -----------------------------------------------------------------------

    pub fn list_pets(&self) -> Result<Vec<Pet>, ApiError> {
        let response = self.send(self.pets.build_list())?;
        self.pets.parse_pets(response)
    }

    pub fn get_pet(&self, id: i64) -> Result<Pet, ApiError> {
        let response = self.send(self.pets.build_get(id))?;
        self.pets.parse_pet(response)
    }

    pub fn pets_by_owner(&self, owner_id: i64) -> Result<Vec<Pet>, ApiError> {
        let response = self.send(self.pets.build_get_by_owner(owner_id))?;
        self.pets.parse_pets(response)
    }

    pub fn create_pet(&self, pet: &NewPet) -> Result<Pet, ApiError> {
        let response = self.send(self.pets.build_create(pet)?)?;
        self.pets.parse_pet(response)
    }

    pub fn update_pet(&self, id: i64, pet: &PetPatch) -> Result<Pet, ApiError> {
        let response = self.send(self.pets.build_update(id, pet)?)?;
        self.pets.parse_pet(response)
    }

    pub fn delete_pet(&self, id: i64) -> Result<(), ApiError> {
        let response = self.send(self.pets.build_delete(id))?;
        self.pets.parse_delete(response)
    }

    pub fn search_pets(&self, species: &str) -> Result<Vec<Pet>, ApiError> {
        let response = self.send(self.pets.build_search(species))?;
        self.pets.parse_pets(response)
    }

    pub fn pets_by_species(&self, species: &str) -> Result<Vec<Pet>, ApiError> {
        let response = self.send(self.pets.build_list_by_species(species))?;
        self.pets.parse_pets(response)
    }

    // -----------------------------------------------------------------------
    // Appointments
    // -----------------------------------------------------------------------

    pub fn list_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        let response = self.send(self.appointments.build_list())?;
        self.appointments.parse_appointments(response)
    }

    pub fn get_appointment(&self, id: i64) -> Result<Appointment, ApiError> {
        let response = self.send(self.appointments.build_get(id))?;
        self.appointments.parse_appointment(response)
    }

    /// Fetches every appointment and keeps those for `pet_id`.
    pub fn appointments_by_pet(&self, pet_id: i64) -> Result<Vec<Appointment>, ApiError> {
        let response = self.send(self.appointments.build_list())?;
        self.appointments.parse_by_pet(response, pet_id)
    }

    /// Fetches every appointment and keeps those whose date starts with
    /// `date` (e.g. `2024-03-15`).
    pub fn appointments_by_date(&self, date: &str) -> Result<Vec<Appointment>, ApiError> {
        let response = self.send(self.appointments.build_list())?;
        self.appointments.parse_by_date(response, date)
    }

    pub fn create_appointment(&self, appointment: &NewAppointment) -> Result<Appointment, ApiError> {
        let response = self.send(self.appointments.build_create(appointment)?)?;
        self.appointments.parse_appointment(response)
    }

    pub fn update_appointment(
        &self,
        id: i64,
        appointment: &AppointmentPatch,
    ) -> Result<Appointment, ApiError> {
        let response = self.send(self.appointments.build_update(id, appointment)?)?;
        self.appointments.parse_appointment(response)
    }

    pub fn delete_appointment(&self, id: i64) -> Result<(), ApiError> {
        let response = self.send(self.appointments.build_delete(id))?;
        self.appointments.parse_delete(response)
    }

    pub fn search_appointments(
        &self,
        search: &AppointmentSearch,
    ) -> Result<Vec<Appointment>, ApiError> {
        let response = self.send(self.appointments.build_search(search))?;
        self.appointments.parse_appointments(response)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::http::HttpMethod;

    /// Replays canned responses and records every request it was given.
    #[derive(Default)]
    struct Recorder {
        responses: RefCell<VecDeque<HttpResponse>>,
        requests: RefCell<Vec<HttpRequest>>,
    }

    impl Recorder {
        fn replying(responses: Vec<HttpResponse>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl Executor for Recorder {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.requests.borrow_mut().push(request);
            self.responses
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| ApiError::Network("no canned response".to_string()))
        }
    }

    fn json(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            status_text: "OK".to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: body.to_string(),
        }
    }

    fn no_content() -> HttpResponse {
        HttpResponse {
            status: 204,
            status_text: "No Content".to_string(),
            headers: Vec::new(),
            body: String::new(),
        }
    }

    #[test]
    fn one_request_per_operation() {
        let recorder = Recorder::replying(vec![
            json(200, r#"[{"id":1,"firstName":"Ana","lastName":"Ruiz"}]"#),
            no_content(),
        ]);
        let client = ClinicClient::with_executor("http://clinic/api", &recorder);

        let owners = client.list_owners().unwrap();
        assert_eq!(owners[0].first_name, "Ana");
        client.delete_owner(1).unwrap();

        let requests = recorder.requests.borrow();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].path, "http://clinic/api/owners");
        assert_eq!(requests[1].method, HttpMethod::Delete);
        assert_eq!(requests[1].path, "http://clinic/api/owners/1");
    }

    #[test]
    fn appointments_by_date_filters_full_listing() {
        let recorder = Recorder::replying(vec![json(
            200,
            r#"[
                {"id":1,"date":"2024-03-15T09:00","description":"a","veterinarianName":"v","status":"SCHEDULED"},
                {"id":2,"date":"2024-03-16T09:00","description":"b","veterinarianName":"v","status":"SCHEDULED"},
                {"id":3,"date":"2024-03-15T17:30","description":"c","veterinarianName":"v","status":"COMPLETED"}
            ]"#,
        )]);
        let client = ClinicClient::with_executor("http://clinic/api", &recorder);

        let ids: Vec<i64> = client
            .appointments_by_date("2024-03-15")
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(recorder.requests.borrow()[0].path, "http://clinic/api/appointments");
    }

    #[test]
    fn status_error_propagates() {
        let mut not_found = json(404, "");
        not_found.status_text = "Not Found".to_string();
        let recorder = Recorder::replying(vec![not_found]);
        let client = ClinicClient::with_executor("http://clinic/api", &recorder);

        let err = client.get_pet(42).unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "API Error: 404 Not Found");
    }

    #[test]
    fn network_error_propagates() {
        let recorder = Recorder::default();
        let client = ClinicClient::with_executor("http://clinic/api", &recorder);
        assert!(matches!(client.list_pets(), Err(ApiError::Network(_))));
    }

    #[test]
    fn update_pet_sends_mapped_body() {
        let recorder = Recorder::replying(vec![json(
            200,
            r#"{"id":3,"name":"Rex","species":"Dog","age":0,"gender":"","owner":{"id":8,"firstName":"Li","lastName":"Wu"}}"#,
        )]);
        let client = ClinicClient::with_executor("http://clinic/api", &recorder);

        let pet = client
            .update_pet(
                3,
                &PetPatch {
                    name: Some("Rex".to_string()),
                    owner_id: Some(8),
                    ..PetPatch::default()
                },
            )
            .unwrap();
        assert_eq!(pet.owner_id, 8);

        let requests = recorder.requests.borrow();
        assert_eq!(requests[0].method, HttpMethod::Put);
        let body: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"name": "Rex", "age": 0, "gender": "", "owner": {"id": 8}})
        );
    }
}
