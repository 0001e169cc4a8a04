use std::{cmp::Ordering, collections::BTreeMap, collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Deserialize)]
pub struct BulkDelete {
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub items: Vec<Todo>,
    pub total_items: usize,
}

#[derive(Default)]
pub struct Store {
    next_id: i64,
    todos: BTreeMap<i64, Todo>,
}

impl Store {
    fn insert(&mut self, input: CreateTodo) -> Todo {
        self.next_id += 1;
        let todo = Todo {
            id: self.next_id,
            title: input.title,
            description: input.description,
            completed: input.completed,
        };
        self.todos.insert(todo.id, todo.clone());
        todo
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    router(Store::default())
}

/// Router pre-populated with the given items, in order. Ids are assigned
/// from 1.
pub fn seeded_app(items: Vec<(String, Option<String>, bool)>) -> Router {
    let mut store = Store::default();
    for (title, description, completed) in items {
        store.insert(CreateTodo {
            title,
            description,
            completed,
        });
    }
    router(store)
}

fn router(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/todos/create", post(create_todo))
        .route("/todos/getById/{id}", get(get_todo))
        .route("/todos/update/{id}", put(update_todo))
        .route("/todos/delete/{id}", delete(delete_todo))
        .route("/todos/bulk-delete", delete(bulk_delete_todos))
        .route("/todos/list", get(list_todos))
        .route("/todos/getAll", get(get_all_todos))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Ids arrive as strings; anything that is not a known integer id is simply
/// not found.
fn parse_id(raw: &str) -> Result<i64, StatusCode> {
    raw.parse().map_err(|_| StatusCode::NOT_FOUND)
}

async fn create_todo(State(db): State<Db>, Json(input): Json<CreateTodo>) -> StatusCode {
    if input.title.trim().is_empty() {
        return StatusCode::BAD_REQUEST;
    }
    let todo = db.write().await.insert(input);
    info!(id = todo.id, "todo created");
    StatusCode::CREATED
}

async fn get_todo(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Todo>, StatusCode> {
    let id = parse_id(&id)?;
    let store = db.read().await;
    store.todos.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<UpdateTodo>,
) -> Result<StatusCode, StatusCode> {
    let id = parse_id(&id)?;
    let mut store = db.write().await;
    let todo = store.todos.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = input.title {
        todo.title = title;
    }
    if let Some(description) = input.description {
        todo.description = Some(description);
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let id = parse_id(&id)?;
    let mut store = db.write().await;
    store.todos.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}

/// All-or-nothing: if any id is unknown, nothing is deleted.
async fn bulk_delete_todos(
    State(db): State<Db>,
    Json(input): Json<BulkDelete>,
) -> Result<StatusCode, StatusCode> {
    let ids = input
        .ids
        .iter()
        .map(|raw| parse_id(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let mut store = db.write().await;
    if !ids.iter().all(|id| store.todos.contains_key(id)) {
        return Err(StatusCode::NOT_FOUND);
    }
    for id in &ids {
        store.todos.remove(id);
    }
    info!(count = ids.len(), "todos bulk deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn get_all_todos(State(db): State<Db>) -> Json<Vec<Todo>> {
    let store = db.read().await;
    Json(store.todos.values().cloned().collect())
}

async fn list_todos(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResponse>, StatusCode> {
    let skip = numeric_param(&params, "skip")?.unwrap_or(0);
    let take = numeric_param(&params, "take")?;
    debug!(?params, "list request");

    let store = db.read().await;
    let mut items: Vec<Todo> = store
        .todos
        .values()
        .filter(|todo| matches_filters(todo, &params))
        .cloned()
        .collect();

    if let Some(field) = params.get("sortBy") {
        let descending = params.get("sortDirection").map(String::as_str) == Some("desc");
        items.sort_by(|a, b| {
            let ord = compare_by(a, b, field);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        });
    }

    let total_items = items.len();
    let items = items
        .into_iter()
        .skip(skip)
        .take(take.unwrap_or(usize::MAX))
        .collect();
    Ok(Json(ListResponse { items, total_items }))
}

fn numeric_param(params: &HashMap<String, String>, key: &str) -> Result<Option<usize>, StatusCode> {
    params
        .get(key)
        .map(|v| v.parse().map_err(|_| StatusCode::BAD_REQUEST))
        .transpose()
}

/// Text columns match case-insensitive substrings; `id` and `completed`
/// match exactly. Keys that are not columns are ignored.
fn matches_filters(todo: &Todo, params: &HashMap<String, String>) -> bool {
    params.iter().all(|(key, value)| match key.as_str() {
        "id" => value.parse::<i64>().map(|id| id == todo.id).unwrap_or(false),
        "title" => contains_ci(&todo.title, value),
        "description" => todo
            .description
            .as_deref()
            .map(|d| contains_ci(d, value))
            .unwrap_or(false),
        "completed" => value.parse::<bool>().map(|c| c == todo.completed).unwrap_or(false),
        _ => true,
    })
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn compare_by(a: &Todo, b: &Todo, field: &str) -> Ordering {
    match field {
        "title" => a.title.cmp(&b.title),
        "description" => a.description.cmp(&b.description),
        "completed" => a.completed.cmp(&b.completed),
        _ => a.id.cmp(&b.id),
    }
}
