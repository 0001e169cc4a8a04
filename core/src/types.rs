//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates. Wire
//! names follow the API (`totalItems`), Rust names stay snake_case.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Server-assigned identifier of a todo.
pub type TodoId = i64;

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

/// Partial todo used for create and update bodies. Only the fields present
/// are serialized; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPayload {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }
}

/// Validated create payload: a title must be present and non-blank.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreateTodo {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
}

impl TryFrom<TodoPayload> for CreateTodo {
    type Error = ApiError;

    fn try_from(payload: TodoPayload) -> Result<Self, Self::Error> {
        let title = match payload.title {
            Some(title) if !title.trim().is_empty() => title,
            _ => return Err(ApiError::Validation("title is required".to_string())),
        };
        Ok(Self {
            title,
            // An empty description field in the form means "no description".
            description: payload.description.filter(|d| !d.is_empty()),
            completed: payload.completed.unwrap_or(false),
        })
    }
}

/// Body of the bulk-delete request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BulkDelete {
    pub ids: Vec<String>,
}

/// One page of todos plus the total count matching the active filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult {
    pub items: Vec<Todo>,
    pub total_items: u64,
}
