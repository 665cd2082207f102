//! Wire shapes of the backend and the codecs between them and the records.
//!
//! # Design
//! Every lossy corner of the mapping lives here:
//!
//! - an animal without an embedded owner decodes to `owner_id == 0`;
//! - an appointment without an embedded animal decodes to `pet_id == 0`;
//! - unknown appointment statuses decode to `Scheduled`;
//! - on encode, an owner or animal reference is written only for a non-zero
//!   id, so a zero or missing id cannot clear or set "id 0" through an
//!   update; the backend sees no reference at all.
//!
//! Nullable backend columns (`String`, `Long`, `int`) decode to their
//! defaults instead of failing the whole payload. The `id` is the exception:
//! a body without one is not a record, so decoding it fails.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{
    Appointment, AppointmentPatch, AppointmentStatus, Owner, Pet, PetPatch,
};

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A bare `{ "id": n }` reference to another entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdRef {
    pub id: i64,
}

impl IdRef {
    /// A reference for `id`, or `None` when `id` is missing or 0.
    pub fn non_zero(id: Option<i64>) -> Option<Self> {
        id.filter(|id| *id != 0).map(|id| IdRef { id })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WireOwner {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub first_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WireAnimal {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub species: String,
    #[serde(default, deserialize_with = "nullable")]
    pub age: i32,
    #[serde(default, deserialize_with = "nullable")]
    pub gender: String,
    #[serde(default)]
    pub owner: Option<WireOwner>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WireAppointment {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub date: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub veterinarian_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub status: String,
    #[serde(default)]
    pub animal: Option<WireAnimal>,
}

/// Body sent on animal create and update.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnimalPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    pub age: i32,
    pub gender: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<IdRef>,
}

/// Body sent on appointment create and update.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub veterinarian_name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animal: Option<IdRef>,
}

pub fn decode_owner(wire: WireOwner) -> Owner {
    Owner {
        id: wire.id,
        first_name: wire.first_name,
        last_name: wire.last_name,
        email: wire.email,
        phone: wire.phone,
        address: wire.address,
    }
}

#[cfg(test)]
fn encode_owner(owner: &Owner) -> WireOwner {
    WireOwner {
        id: owner.id,
        first_name: owner.first_name.clone(),
        last_name: owner.last_name.clone(),
        email: owner.email.clone(),
        phone: owner.phone.clone(),
        address: owner.address.clone(),
    }
}

pub fn decode_pet(wire: WireAnimal) -> Pet {
    Pet {
        id: wire.id,
        name: wire.name,
        species: wire.species,
        breed: None,
        age: wire.age,
        gender: wire.gender,
        owner_id: wire.owner.as_ref().map_or(0, |owner| owner.id),
        owner: wire.owner.map(decode_owner),
    }
}

/// Build the animal body for a create or update. `breed` is not sent.
pub fn encode_pet(pet: &PetPatch) -> AnimalPayload {
    AnimalPayload {
        name: pet.name.clone(),
        species: pet.species.clone(),
        age: pet.age.unwrap_or(0),
        gender: pet.gender.clone().unwrap_or_default(),
        owner: IdRef::non_zero(pet.owner_id),
    }
}

pub fn decode_appointment(wire: WireAppointment) -> Appointment {
    if !wire.status.is_empty() && AppointmentStatus::parse(&wire.status).is_none() {
        log::warn!(
            "appointment {} has unknown status {:?}, treating as SCHEDULED",
            wire.id,
            wire.status
        );
    }
    let status = AppointmentStatus::from_wire(&wire.status);
    Appointment {
        id: wire.id,
        pet_id: wire.animal.as_ref().map_or(0, |animal| animal.id),
        pet: wire.animal.map(decode_pet),
        date_time: wire.date,
        reason: wire.description,
        status,
        veterinarian_name: wire.veterinarian_name,
        notes: None,
    }
}

/// Build the appointment body for a create or update.
///
/// The animal reference comes from `animal_id`, not from the patch; `None`
/// or 0 leaves the `animal` key out of the body. `notes` is not sent.
pub fn encode_appointment(appointment: &AppointmentPatch, animal_id: Option<i64>) -> AppointmentPayload {
    AppointmentPayload {
        date: appointment.date_time.clone(),
        description: appointment.reason.clone(),
        veterinarian_name: appointment.veterinarian_name.clone().unwrap_or_default(),
        status: appointment.status.unwrap_or_default().as_str().to_string(),
        animal: IdRef::non_zero(animal_id),
    }
}
