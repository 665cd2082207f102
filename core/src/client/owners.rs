use crate::codec::{decode_owner, WireOwner};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{encode_component, RequestOptions, Transport};
use crate::types::{NewOwner, Owner, OwnerPatch};

use super::to_body;

/// Requests and responses for `/owners`.
///
/// Owner records travel unchanged in both directions, so create and update
/// serialize their input directly.
#[derive(Debug, Clone)]
pub struct OwnerClient {
    transport: Transport,
}

impl OwnerClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            transport: Transport::new(base_url),
        }
    }

    pub fn build_list(&self) -> HttpRequest {
        self.transport.build("/owners", RequestOptions::get())
    }

    pub fn build_get(&self, id: i64) -> HttpRequest {
        self.transport.build(&format!("/owners/{id}"), RequestOptions::get())
    }

    pub fn build_create(&self, owner: &NewOwner) -> Result<HttpRequest, ApiError> {
        let body = to_body(owner)?;
        Ok(self.transport.build("/owners", RequestOptions::post(body)))
    }

    pub fn build_update(&self, id: i64, owner: &OwnerPatch) -> Result<HttpRequest, ApiError> {
        let body = to_body(owner)?;
        Ok(self
            .transport
            .build(&format!("/owners/{id}"), RequestOptions::put(body)))
    }

    pub fn build_delete(&self, id: i64) -> HttpRequest {
        self.transport
            .build(&format!("/owners/{id}"), RequestOptions::delete())
    }

    pub fn build_search(&self, query: &str) -> HttpRequest {
        let path = format!("/owners/search?query={}", encode_component(query));
        self.transport.build(&path, RequestOptions::get())
    }

    pub fn parse_owners(&self, response: HttpResponse) -> Result<Vec<Owner>, ApiError> {
        let wire: Vec<WireOwner> = self.transport.normalize(response)?.decode()?;
        Ok(wire.into_iter().map(decode_owner).collect())
    }

    pub fn parse_owner(&self, response: HttpResponse) -> Result<Owner, ApiError> {
        let wire: WireOwner = self.transport.normalize(response)?.decode()?;
        Ok(decode_owner(wire))
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        self.transport.normalize(response)?;
        Ok(())
    }
}
