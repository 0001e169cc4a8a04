//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only the API root and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip. Any 2xx status is a
//! success; mutations ignore the response body.

use percent_encoding::utf8_percent_encode;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::{ListParams, QUERY_VALUE};
use crate::types::{BulkDelete, CreateTodo, PagedResult, Todo, TodoPayload};

#[derive(Debug, Clone)]
pub struct TodoClient {
    root: String,
}

impl TodoClient {
    /// `base_url` is the API origin; requests go to `{base_url}/todos/...`.
    pub fn new(base_url: &str) -> Self {
        Self {
            root: format!("{}/todos", base_url.trim_end_matches('/')),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.root)
    }

    fn url_with_id(&self, action: &str, id: &str) -> String {
        format!("{}/{action}/{}", self.root, utf8_percent_encode(id, QUERY_VALUE))
    }

    pub fn build_create(&self, payload: &TodoPayload) -> Result<HttpRequest, ApiError> {
        let input = CreateTodo::try_from(payload.clone())?;
        HttpRequest::new(HttpMethod::Post, self.url("create")).json(&input)
    }

    pub fn build_get_by_id(&self, id: &str) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.url_with_id("getById", id))
    }

    pub fn build_update(&self, id: &str, payload: &TodoPayload) -> Result<HttpRequest, ApiError> {
        HttpRequest::new(HttpMethod::Put, self.url_with_id("update", id)).json(payload)
    }

    pub fn build_delete(&self, id: &str) -> HttpRequest {
        HttpRequest::new(HttpMethod::Delete, self.url_with_id("delete", id))
    }

    pub fn build_bulk_delete(&self, ids: &[String]) -> Result<HttpRequest, ApiError> {
        let body = BulkDelete { ids: ids.to_vec() };
        HttpRequest::new(HttpMethod::Delete, self.url("bulk-delete")).json(&body)
    }

    pub fn build_list(&self, params: &ListParams) -> HttpRequest {
        let url = format!("{}?{}", self.url("list"), params.to_query_string());
        HttpRequest::new(HttpMethod::Get, url)
    }

    pub fn build_get_all(&self) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.url("getAll"))
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_get_by_id(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_bulk_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<PagedResult, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_all(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        parse_json(response)
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Status {
        status: response.status,
        body: response.body.clone(),
    })
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
