use crate::codec::{decode_appointment, encode_appointment, WireAppointment};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{encode_component, RequestOptions, Transport};
use crate::types::{Appointment, AppointmentPatch, AppointmentSearch, NewAppointment};

use super::to_body;

/// Requests and responses for `/appointments`.
///
/// Filtering by pet or by day has no backend endpoint: `parse_by_pet` and
/// `parse_by_date` take the full listing from `build_list` and filter it
/// locally, which costs a full fetch per call.
#[derive(Debug, Clone)]
pub struct AppointmentClient {
    transport: Transport,
}

impl AppointmentClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            transport: Transport::new(base_url),
        }
    }

    pub fn build_list(&self) -> HttpRequest {
        self.transport.build("/appointments", RequestOptions::get())
    }

    pub fn build_get(&self, id: i64) -> HttpRequest {
        self.transport
            .build(&format!("/appointments/{id}"), RequestOptions::get())
    }

    pub fn build_create(&self, appointment: &NewAppointment) -> Result<HttpRequest, ApiError> {
        let body = to_body(&encode_appointment(
            &AppointmentPatch::from(appointment.clone()),
            Some(appointment.pet_id),
        ))?;
        Ok(self
            .transport
            .build("/appointments", RequestOptions::post(body)))
    }

    /// The animal reference is rebuilt from `appointment.pet_id`; leaving it
    /// unset sends the update without an animal.
    pub fn build_update(
        &self,
        id: i64,
        appointment: &AppointmentPatch,
    ) -> Result<HttpRequest, ApiError> {
        let body = to_body(&encode_appointment(appointment, appointment.pet_id))?;
        Ok(self
            .transport
            .build(&format!("/appointments/{id}"), RequestOptions::put(body)))
    }

    pub fn build_delete(&self, id: i64) -> HttpRequest {
        self.transport
            .build(&format!("/appointments/{id}"), RequestOptions::delete())
    }

    pub fn build_search(&self, search: &AppointmentSearch) -> HttpRequest {
        let mut params = Vec::new();
        if let Some(veterinarian) = &search.veterinarian {
            params.push(format!("veterinarian={}", encode_component(veterinarian)));
        }
        if let Some(status) = search.status {
            params.push(format!("status={}", status.as_str()));
        }
        let path = if params.is_empty() {
            "/appointments/search".to_string()
        } else {
            format!("/appointments/search?{}", params.join("&"))
        };
        self.transport.build(&path, RequestOptions::get())
    }

    pub fn parse_appointments(&self, response: HttpResponse) -> Result<Vec<Appointment>, ApiError> {
        self.parse_filtered(response, |_| true)
    }

    pub fn parse_appointment(&self, response: HttpResponse) -> Result<Appointment, ApiError> {
        let wire: WireAppointment = self.transport.normalize(response)?.decode()?;
        Ok(decode_appointment(wire))
    }

    /// Appointments whose embedded animal has id `pet_id`. Appointments
    /// without an animal never match.
    pub fn parse_by_pet(
        &self,
        response: HttpResponse,
        pet_id: i64,
    ) -> Result<Vec<Appointment>, ApiError> {
        self.parse_filtered(response, |wire| {
            wire.animal.as_ref().is_some_and(|animal| animal.id == pet_id)
        })
    }

    /// Appointments whose date string starts with `date`. The comparison is
    /// textual; no timezone normalization happens.
    pub fn parse_by_date(
        &self,
        response: HttpResponse,
        date: &str,
    ) -> Result<Vec<Appointment>, ApiError> {
        self.parse_filtered(response, |wire| wire.date.starts_with(date))
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        self.transport.normalize(response)?;
        Ok(())
    }

    fn parse_filtered<F>(&self, response: HttpResponse, keep: F) -> Result<Vec<Appointment>, ApiError>
    where
        F: Fn(&WireAppointment) -> bool,
    {
        let wire: Vec<WireAppointment> = self.transport.normalize(response)?.decode()?;
        Ok(wire
            .into_iter()
            .filter(|appointment| keep(appointment))
            .map(decode_appointment)
            .collect())
    }
}
