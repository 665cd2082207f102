//! In-memory clinic state with the backend's update rules.
//!
//! Entities reference each other by id. Responses embed the referenced
//! entity as it currently exists, so renaming an owner is visible through
//! every animal that points at it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    pub id: i64,
    pub name: Option<String>,
    pub species: Option<String>,
    pub age: i32,
    pub gender: Option<String>,
    pub owner: Option<Owner>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub date: Option<String>,
    pub description: Option<String>,
    pub veterinarian_name: Option<String>,
    pub status: Option<String>,
    pub animal: Option<Animal>,
}

/// `{ "id": n }` as sent by clients; a null id is allowed.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Ref {
    pub id: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AnimalInput {
    pub name: Option<String>,
    pub species: Option<String>,
    #[serde(default)]
    pub age: i32,
    pub gender: Option<String>,
    pub owner: Option<Ref>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentInput {
    pub date: Option<String>,
    pub description: Option<String>,
    pub veterinarian_name: Option<String>,
    pub status: Option<String>,
    pub animal: Option<Ref>,
}

#[derive(Clone, Debug)]
struct AnimalRow {
    name: Option<String>,
    species: Option<String>,
    age: i32,
    gender: Option<String>,
    owner_id: Option<i64>,
}

#[derive(Clone, Debug)]
struct AppointmentRow {
    date: Option<String>,
    description: Option<String>,
    veterinarian_name: Option<String>,
    status: Option<String>,
    animal_id: Option<i64>,
}

/// Sequential ids per resource, starting at 1.
#[derive(Debug, Default)]
struct Sequence(i64);

impl Sequence {
    fn next(&mut self) -> i64 {
        self.0 += 1;
        self.0
    }
}

#[derive(Debug, Default)]
pub struct Store {
    owners: BTreeMap<i64, OwnerInput>,
    animals: BTreeMap<i64, AnimalRow>,
    appointments: BTreeMap<i64, AppointmentRow>,
    owner_ids: Sequence,
    animal_ids: Sequence,
    appointment_ids: Sequence,
}

fn contains_ignore_case(field: &Option<String>, needle: &str) -> bool {
    field
        .as_deref()
        .is_some_and(|value| value.to_lowercase().contains(needle))
}

impl Store {
    // -----------------------------------------------------------------------
    // Owners
    // -----------------------------------------------------------------------

    fn render_owner(id: i64, row: &OwnerInput) -> Owner {
        Owner {
            id,
            first_name: row.first_name.clone(),
            last_name: row.last_name.clone(),
            email: row.email.clone(),
            phone: row.phone.clone(),
            address: row.address.clone(),
        }
    }

    fn owner(&self, id: i64) -> Option<Owner> {
        self.owners.get(&id).map(|row| Self::render_owner(id, row))
    }

    pub fn get_owner(&self, id: i64) -> Option<Owner> {
        self.owner(id)
    }

    pub fn list_owners(&self) -> Vec<Owner> {
        self.owners.keys().filter_map(|id| self.owner(*id)).collect()
    }

    pub fn create_owner(&mut self, input: OwnerInput) -> Owner {
        let id = self.owner_ids.next();
        let owner = Self::render_owner(id, &input);
        self.owners.insert(id, input);
        owner
    }

    /// Replaces every field, including with nulls.
    pub fn update_owner(&mut self, id: i64, input: OwnerInput) -> Option<Owner> {
        let row = self.owners.get_mut(&id)?;
        *row = input;
        self.owner(id)
    }

    pub fn delete_owner(&mut self, id: i64) -> bool {
        self.owners.remove(&id).is_some()
    }

    /// Case-insensitive substring match on first name, last name or email.
    /// A blank query returns every owner.
    pub fn search_owners(&self, query: Option<&str>) -> Vec<Owner> {
        let needle = match query.map(str::trim) {
            Some(q) if !q.is_empty() => q.to_lowercase(),
            _ => return self.list_owners(),
        };
        self.owners
            .iter()
            .filter(|(_, row)| {
                contains_ignore_case(&row.first_name, &needle)
                    || contains_ignore_case(&row.last_name, &needle)
                    || contains_ignore_case(&row.email, &needle)
            })
            .filter_map(|(id, _)| self.owner(*id))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Animals
    // -----------------------------------------------------------------------

    fn render_animal(&self, id: i64, row: &AnimalRow) -> Animal {
        Animal {
            id,
            name: row.name.clone(),
            species: row.species.clone(),
            age: row.age,
            gender: row.gender.clone(),
            owner: row.owner_id.and_then(|owner_id| self.owner(owner_id)),
        }
    }

    fn animal(&self, id: i64) -> Option<Animal> {
        self.animals.get(&id).map(|row| self.render_animal(id, row))
    }

    /// Resolve an owner reference; unknown ids resolve to no owner.
    fn resolve_owner(&self, reference: &Ref) -> Option<i64> {
        reference.id.filter(|id| self.owners.contains_key(id))
    }

    pub fn get_animal(&self, id: i64) -> Option<Animal> {
        self.animal(id)
    }

    pub fn list_animals(&self) -> Vec<Animal> {
        self.animals.keys().filter_map(|id| self.animal(*id)).collect()
    }

    pub fn create_animal(&mut self, input: AnimalInput) -> Animal {
        let row = AnimalRow {
            owner_id: input.owner.as_ref().and_then(|r| self.resolve_owner(r)),
            name: input.name,
            species: input.species,
            age: input.age,
            gender: input.gender,
        };
        let id = self.animal_ids.next();
        let animal = self.render_animal(id, &row);
        self.animals.insert(id, row);
        animal
    }

    /// Replaces the scalar fields. An owner reference with an id re-points the
    /// animal, a missing owner clears it, and `{ "id": null }` leaves it.
    pub fn update_animal(&mut self, id: i64, input: AnimalInput) -> Option<Animal> {
        let current_owner = self.animals.get(&id)?.owner_id;
        let owner_id = match &input.owner {
            Some(reference) if reference.id.is_some() => self.resolve_owner(reference),
            Some(_) => current_owner,
            None => None,
        };
        let row = self.animals.get_mut(&id)?;
        *row = AnimalRow {
            name: input.name,
            species: input.species,
            age: input.age,
            gender: input.gender,
            owner_id,
        };
        self.animal(id)
    }

    pub fn delete_animal(&mut self, id: i64) -> bool {
        self.animals.remove(&id).is_some()
    }

    /// Exact species and/or owner id; no criteria returns every animal.
    pub fn search_animals(&self, species: Option<&str>, owner_id: Option<i64>) -> Vec<Animal> {
        self.animals
            .iter()
            .filter(|(_, row)| species.map_or(true, |s| row.species.as_deref() == Some(s)))
            .filter(|(_, row)| owner_id.map_or(true, |o| row.owner_id == Some(o)))
            .filter_map(|(id, _)| self.animal(*id))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Appointments
    // -----------------------------------------------------------------------

    fn render_appointment(&self, id: i64, row: &AppointmentRow) -> Appointment {
        Appointment {
            id,
            date: row.date.clone(),
            description: row.description.clone(),
            veterinarian_name: row.veterinarian_name.clone(),
            status: row.status.clone(),
            animal: row.animal_id.and_then(|animal_id| self.animal(animal_id)),
        }
    }

    fn appointment(&self, id: i64) -> Option<Appointment> {
        self.appointments
            .get(&id)
            .map(|row| self.render_appointment(id, row))
    }

    fn appointment_row(&self, input: AppointmentInput) -> AppointmentRow {
        let animal_id = input
            .animal
            .and_then(|r| r.id)
            .filter(|id| self.animals.contains_key(id));
        AppointmentRow {
            date: input.date,
            description: input.description,
            veterinarian_name: input.veterinarian_name,
            status: input.status,
            animal_id,
        }
    }

    pub fn get_appointment(&self, id: i64) -> Option<Appointment> {
        self.appointment(id)
    }

    pub fn list_appointments(&self) -> Vec<Appointment> {
        self.appointments
            .keys()
            .filter_map(|id| self.appointment(*id))
            .collect()
    }

    pub fn create_appointment(&mut self, input: AppointmentInput) -> Appointment {
        let row = self.appointment_row(input);
        let id = self.appointment_ids.next();
        let appointment = self.render_appointment(id, &row);
        self.appointments.insert(id, row);
        appointment
    }

    /// Replaces every field; a missing animal reference clears the animal.
    pub fn update_appointment(&mut self, id: i64, input: AppointmentInput) -> Option<Appointment> {
        if !self.appointments.contains_key(&id) {
            return None;
        }
        let row = self.appointment_row(input);
        self.appointments.insert(id, row);
        self.appointment(id)
    }

    pub fn delete_appointment(&mut self, id: i64) -> bool {
        self.appointments.remove(&id).is_some()
    }

    /// Exact veterinarian name and/or status; no criteria returns everything.
    pub fn search_appointments(
        &self,
        veterinarian: Option<&str>,
        status: Option<&str>,
    ) -> Vec<Appointment> {
        self.appointments
            .iter()
            .filter(|(_, row)| {
                veterinarian.map_or(true, |v| row.veterinarian_name.as_deref() == Some(v))
            })
            .filter(|(_, row)| status.map_or(true, |s| row.status.as_deref() == Some(s)))
            .filter_map(|(id, _)| self.appointment(*id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner_input(first: &str, last: &str, email: Option<&str>) -> OwnerInput {
        OwnerInput {
            first_name: Some(first.to_string()),
            last_name: Some(last.to_string()),
            email: email.map(str::to_string),
            ..OwnerInput::default()
        }
    }

    fn animal_input(name: &str, species: &str, owner: Option<i64>) -> AnimalInput {
        AnimalInput {
            name: Some(name.to_string()),
            species: Some(species.to_string()),
            age: 3,
            gender: Some("F".to_string()),
            owner: owner.map(|id| Ref { id: Some(id) }),
        }
    }

    #[test]
    fn ids_are_sequential_per_resource() {
        let mut store = Store::default();
        assert_eq!(store.create_owner(owner_input("Ana", "Ruiz", None)).id, 1);
        assert_eq!(store.create_owner(owner_input("Li", "Wu", None)).id, 2);
        assert_eq!(store.create_animal(animal_input("Rex", "Dog", None)).id, 1);
    }

    #[test]
    fn owner_search_is_case_insensitive_over_names_and_email() {
        let mut store = Store::default();
        store.create_owner(owner_input("Ana", "Ruiz", Some("ana@vet.io")));
        store.create_owner(owner_input("Li", "Wu", Some("li@mail.com")));
        store.create_owner(owner_input("Mara", "Anders", None));

        let ids = |owners: Vec<Owner>| owners.into_iter().map(|o| o.id).collect::<Vec<_>>();
        assert_eq!(ids(store.search_owners(Some("AN"))), vec![1, 3]);
        assert_eq!(ids(store.search_owners(Some("mail"))), vec![2]);
        assert_eq!(ids(store.search_owners(Some("   "))), vec![1, 2, 3]);
        assert_eq!(ids(store.search_owners(None)), vec![1, 2, 3]);
    }

    #[test]
    fn animal_owner_reference_is_resolved() {
        let mut store = Store::default();
        store.create_owner(owner_input("Ana", "Ruiz", None));
        let rex = store.create_animal(animal_input("Rex", "Dog", Some(1)));
        assert_eq!(rex.owner.unwrap().first_name.as_deref(), Some("Ana"));
        let ghost = store.create_animal(animal_input("Ghost", "Cat", Some(99)));
        assert!(ghost.owner.is_none());
    }

    #[test]
    fn animal_update_owner_rules() {
        let mut store = Store::default();
        store.create_owner(owner_input("Ana", "Ruiz", None));
        store.create_animal(animal_input("Rex", "Dog", Some(1)));

        let mut keep = animal_input("Rex", "Dog", None);
        keep.owner = Some(Ref { id: None });
        assert!(store.update_animal(1, keep).unwrap().owner.is_some());

        let cleared = store.update_animal(1, animal_input("Rex", "Dog", None)).unwrap();
        assert!(cleared.owner.is_none());

        assert!(store.update_animal(42, animal_input("X", "Y", None)).is_none());
    }

    #[test]
    fn animal_search_filters_combine() {
        let mut store = Store::default();
        store.create_owner(owner_input("Ana", "Ruiz", None));
        store.create_animal(animal_input("Rex", "Dog", Some(1)));
        store.create_animal(animal_input("Tom", "Cat", Some(1)));
        store.create_animal(animal_input("Max", "Dog", None));

        assert_eq!(store.search_animals(Some("Dog"), None).len(), 2);
        assert_eq!(store.search_animals(None, Some(1)).len(), 2);
        assert_eq!(store.search_animals(Some("Dog"), Some(1)).len(), 1);
        assert_eq!(store.search_animals(Some("dog"), None).len(), 0);
        assert_eq!(store.search_animals(None, None).len(), 3);
    }

    #[test]
    fn appointment_update_without_animal_clears_it() {
        let mut store = Store::default();
        store.create_animal(animal_input("Rex", "Dog", None));
        let created = store.create_appointment(AppointmentInput {
            date: Some("2024-03-15T09:00".to_string()),
            status: Some("SCHEDULED".to_string()),
            animal: Some(Ref { id: Some(1) }),
            ..AppointmentInput::default()
        });
        assert_eq!(created.animal.unwrap().id, 1);

        let updated = store
            .update_appointment(
                created.id,
                AppointmentInput {
                    status: Some("COMPLETED".to_string()),
                    ..AppointmentInput::default()
                },
            )
            .unwrap();
        assert!(updated.animal.is_none());
        assert!(updated.date.is_none());
    }

    #[test]
    fn deleting_owner_detaches_it_from_animals() {
        let mut store = Store::default();
        store.create_owner(owner_input("Ana", "Ruiz", None));
        store.create_animal(animal_input("Rex", "Dog", Some(1)));
        assert!(store.delete_owner(1));
        assert!(!store.delete_owner(1));
        assert!(store.get_animal(1).unwrap().owner.is_none());
    }
}
