//! Drives the core controllers for each CLI subcommand.

use anyhow::{anyhow, bail, Context, Result};
use todo_grid_core::{
    DetailState, DetailView, ListView, Route, TodoClient, TodoPayload, ViewStateStore,
};
use tracing::info;

use crate::render;
use crate::transport::Transport;

/// Grid interactions to replay before fetching, in this order: page size,
/// page, sort clicks, filter edits.
#[derive(Debug, Clone, Default)]
pub struct ListRequest {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_clicks: Vec<String>,
    pub filters: Vec<(String, String)>,
}

pub struct App<T> {
    transport: T,
    client: TodoClient,
    store: ViewStateStore,
}

impl<T: Transport> App<T> {
    pub fn new(transport: T, client: TodoClient, store: ViewStateStore) -> Self {
        Self {
            transport,
            client,
            store,
        }
    }

    pub fn store(&self) -> &ViewStateStore {
        &self.store
    }

    pub fn list(&self, request: &ListRequest) -> Result<String> {
        let mut view = ListView::new(self.client.clone(), self.store.clone());
        if let Some(size) = request.page_size {
            view.change_page_size(size)?;
        }
        if let Some(page) = request.page {
            view.change_page(page);
        }
        for field in &request.sort_clicks {
            view.click_sort(field)?;
        }
        for (field, value) in &request.filters {
            view.edit_filter(field, value)?;
        }
        self.fetch_page(&mut view)
    }

    fn fetch_page(&self, view: &mut ListView) -> Result<String> {
        while let Some(pending) = view.poll() {
            let outcome = self.transport.execute(pending.request);
            view.resolve_list(pending.generation, outcome);
        }
        Ok(render::list(&view.model(), &self.store.get_state().column_filters))
    }

    /// Show one todo. A missing id renders the not-found message rather than
    /// failing.
    pub fn show(&self, id: &str) -> Result<String> {
        let route = Route::detail(id);
        let mut view = DetailView::for_route(self.client.clone(), &route)
            .ok_or_else(|| anyhow!("not a detail route: {route}"))?;
        let outcome = self.transport.execute(view.request());
        let state = view.resolve(outcome).clone();
        let mut out = render::detail(id, &state);
        if let DetailState::Failed(message) = &state {
            out.push_str(message);
            out.push('\n');
        }
        let (back, _) = view.back(&self.store);
        out.push_str(&format!("Back: {back}\n"));
        Ok(out)
    }

    /// Create a todo and return the refreshed first page.
    pub fn create(&self, payload: &TodoPayload) -> Result<String> {
        let mut view = ListView::new(self.client.clone(), self.store.clone());
        view.open_create_form();
        let request = view.submit_create(payload)?;
        let outcome = self.transport.execute(request);
        match view.resolve_create(outcome) {
            Some(pending) => {
                let outcome = self.transport.execute(pending.request);
                view.resolve_list(pending.generation, outcome);
                Ok(render::list(&view.model(), &self.store.get_state().column_filters))
            }
            None => {
                let message = view
                    .form()
                    .error
                    .clone()
                    .unwrap_or_else(|| "Could not create todo".to_string());
                bail!(message)
            }
        }
    }

    pub fn update(&self, id: &str, payload: &TodoPayload) -> Result<String> {
        let request = self.client.build_update(id, payload)?;
        let response = self.transport.execute(request)?;
        self.client
            .parse_update(response)
            .with_context(|| format!("updating todo {id}"))?;
        info!(id, "todo updated");
        Ok(format!("Updated todo {id}\n"))
    }

    pub fn delete(&self, id: &str) -> Result<String> {
        let response = self.transport.execute(self.client.build_delete(id))?;
        self.client
            .parse_delete(response)
            .with_context(|| format!("deleting todo {id}"))?;
        info!(id, "todo deleted");
        Ok(format!("Deleted todo {id}\n"))
    }

    pub fn bulk_delete(&self, ids: &[String]) -> Result<String> {
        let request = self.client.build_bulk_delete(ids)?;
        let response = self.transport.execute(request)?;
        self.client
            .parse_bulk_delete(response)
            .context("bulk delete")?;
        info!(count = ids.len(), "todos deleted");
        Ok(format!("Deleted {} todos\n", ids.len()))
    }

    pub fn all(&self) -> Result<String> {
        let response = self.transport.execute(self.client.build_get_all())?;
        let todos = self.client.parse_get_all(response)?;
        Ok(serde_json::to_string_pretty(&todos)? + "\n")
    }
}
