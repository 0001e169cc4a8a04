//! Controller behind the per-item description page.

use tracing::warn;

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, Outcome};
use crate::route::Route;
use crate::types::Todo;
use crate::view_state::{ViewState, ViewStateStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Found(Todo),
    NotFound,
    Failed(String),
}

#[derive(Debug)]
pub struct DetailView {
    client: TodoClient,
    id: String,
    state: DetailState,
}

impl DetailView {
    pub fn new(client: TodoClient, id: impl Into<String>) -> Self {
        Self {
            client,
            id: id.into(),
            state: DetailState::Loading,
        }
    }

    /// Build a view for a route. Returns `None` for the list route.
    pub fn for_route(client: TodoClient, route: &Route) -> Option<Self> {
        match route {
            Route::Detail { id } => Some(Self::new(client, id.clone())),
            Route::List => None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn request(&mut self) -> HttpRequest {
        self.state = DetailState::Loading;
        self.client.build_get_by_id(&self.id)
    }

    pub fn resolve(&mut self, outcome: Outcome) -> &DetailState {
        let result = outcome.and_then(|response| self.client.parse_get_by_id(response));
        self.state = match result {
            Ok(todo) => DetailState::Found(todo),
            Err(ApiError::NotFound) => DetailState::NotFound,
            Err(err) => {
                warn!(id = %self.id, error = %err, "error fetching todo");
                DetailState::Failed(err.to_string())
            }
        };
        &self.state
    }

    /// Leave the detail view. The list resumes from the state kept in the
    /// shared store, i.e. the page the user came from.
    pub fn back(&self, store: &ViewStateStore) -> (Route, ViewState) {
        (Route::List, store.get_state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;

    fn view(id: &str) -> DetailView {
        DetailView::new(TodoClient::new("http://api"), id)
    }

    #[test]
    fn found() {
        let mut view = view("3");
        let req = view.request();
        assert_eq!(req.url, "http://api/todos/getById/3");
        let body = r#"{"id":3,"title":"t","description":"long text","completed":false}"#;
        match view.resolve(Ok(HttpResponse::new(200, body))) {
            DetailState::Found(todo) => assert_eq!(todo.description.as_deref(), Some("long text")),
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[test]
    fn missing_id_is_not_found_state() {
        let mut view = view("999");
        view.request();
        assert_eq!(view.resolve(Ok(HttpResponse::new(404, ""))), &DetailState::NotFound);
    }

    #[test]
    fn transport_failure_is_failed_state() {
        let mut view = view("1");
        view.request();
        let state = view.resolve(Err(ApiError::Network("timeout".into())));
        assert_eq!(state, &DetailState::Failed("network error: timeout".into()));
    }

    #[test]
    fn for_route() {
        let client = TodoClient::new("http://api");
        assert!(DetailView::for_route(client.clone(), &Route::List).is_none());
        let view = DetailView::for_route(client, &Route::detail(8)).unwrap();
        assert_eq!(view.id(), "8");
    }

    #[test]
    fn back_restores_list_state() {
        let store = ViewStateStore::default();
        store.set_page(4);
        store.set_page_size(10).unwrap();
        let (route, state) = view("1").back(&store);
        assert_eq!(route, Route::List);
        assert_eq!(state.page, 4);
        assert_eq!(state.page_size, 10);
    }
}
