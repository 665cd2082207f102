use crate::codec::{decode_pet, encode_pet, WireAnimal};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{encode_component, RequestOptions, Transport};
use crate::types::{NewPet, Pet, PetPatch};

use super::to_body;

/// Requests and responses for `/animals`, mapped to and from `Pet`.
#[derive(Debug, Clone)]
pub struct PetClient {
    transport: Transport,
}

impl PetClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            transport: Transport::new(base_url),
        }
    }

    pub fn build_list(&self) -> HttpRequest {
        self.transport.build("/animals", RequestOptions::get())
    }

    pub fn build_get(&self, id: i64) -> HttpRequest {
        self.transport.build(&format!("/animals/{id}"), RequestOptions::get())
    }

    pub fn build_get_by_owner(&self, owner_id: i64) -> HttpRequest {
        self.transport.build(
            &format!("/animals/search?ownerId={owner_id}"),
            RequestOptions::get(),
        )
    }

    pub fn build_create(&self, pet: &NewPet) -> Result<HttpRequest, ApiError> {
        let body = to_body(&encode_pet(&PetPatch::from(pet.clone())))?;
        Ok(self.transport.build("/animals", RequestOptions::post(body)))
    }

    pub fn build_update(&self, id: i64, pet: &PetPatch) -> Result<HttpRequest, ApiError> {
        let body = to_body(&encode_pet(pet))?;
        Ok(self
            .transport
            .build(&format!("/animals/{id}"), RequestOptions::put(body)))
    }

    pub fn build_delete(&self, id: i64) -> HttpRequest {
        self.transport
            .build(&format!("/animals/{id}"), RequestOptions::delete())
    }

    /// Species search evaluated by the backend.
    pub fn build_search(&self, species: &str) -> HttpRequest {
        let path = format!("/animals/search?species={}", encode_component(species));
        self.transport.build(&path, RequestOptions::get())
    }

    pub fn build_list_by_species(&self, species: &str) -> HttpRequest {
        let path = format!("/animals/species/{}", encode_component(species));
        self.transport.build(&path, RequestOptions::get())
    }

    pub fn parse_pets(&self, response: HttpResponse) -> Result<Vec<Pet>, ApiError> {
        let wire: Vec<WireAnimal> = self.transport.normalize(response)?.decode()?;
        Ok(wire.into_iter().map(decode_pet).collect())
    }

    pub fn parse_pet(&self, response: HttpResponse) -> Result<Pet, ApiError> {
        let wire: WireAnimal = self.transport.normalize(response)?.decode()?;
        Ok(decode_pet(wire))
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        self.transport.normalize(response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;

    fn client() -> PetClient {
        PetClient::new("http://localhost:8080/api")
    }

    fn body_of(req: &HttpRequest) -> serde_json::Value {
        serde_json::from_str(req.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn build_create_maps_owner_id_to_reference() {
        let pet = NewPet {
            name: "Luna".to_string(),
            species: "Dog".to_string(),
            breed: Some("Collie".to_string()),
            age: Some(4),
            gender: Some("F".to_string()),
            owner_id: Some(2),
        };
        let req = client().build_create(&pet).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8080/api/animals");
        assert_eq!(
            body_of(&req),
            serde_json::json!({
                "name": "Luna", "species": "Dog", "age": 4, "gender": "F", "owner": {"id": 2}
            })
        );
    }

    #[test]
    fn build_create_without_owner_omits_reference() {
        let pet = NewPet {
            name: "Tom".to_string(),
            species: "Cat".to_string(),
            breed: None,
            age: None,
            gender: None,
            owner_id: Some(0),
        };
        let body = body_of(&client().build_create(&pet).unwrap());
        assert_eq!(
            body,
            serde_json::json!({"name": "Tom", "species": "Cat", "age": 0, "gender": ""})
        );
    }

    #[test]
    fn search_paths() {
        assert_eq!(
            client().build_get_by_owner(3).path,
            "http://localhost:8080/api/animals/search?ownerId=3"
        );
        assert_eq!(
            client().build_search("Guinea pig").path,
            "http://localhost:8080/api/animals/search?species=Guinea%20pig"
        );
        assert_eq!(
            client().build_list_by_species("Cat").path,
            "http://localhost:8080/api/animals/species/Cat"
        );
    }

    #[test]
    fn parse_pet_flattens_owner() {
        let response = HttpResponse {
            status: 200,
            status_text: "OK".to_string(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: r#"{"id":4,"name":"Luna","species":"Dog","age":4,"gender":"F","owner":{"id":2,"firstName":"Ana","lastName":"Ruiz"}}"#.to_string(),
        };
        let pet = client().parse_pet(response).unwrap();
        assert_eq!(pet.owner_id, 2);
        assert_eq!(pet.owner.unwrap().first_name, "Ana");
        assert!(pet.breed.is_none());
    }

    #[test]
    fn parse_pet_rejects_empty_payload() {
        let err = client().parse_pet(HttpResponse {
            status: 200,
            status_text: "OK".to_string(),
            headers: Vec::new(),
            body: String::new(),
        }).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn parse_pets_error_status() {
        let response = HttpResponse {
            status: 500,
            status_text: "Internal Server Error".to_string(),
            headers: Vec::new(),
            body: "boom".to_string(),
        };
        let err = client().parse_pets(response).unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
    }
}
