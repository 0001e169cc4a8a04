//! Controller behind the todo grid.
//!
//! `ListView` turns grid interactions into store updates, forwards list
//! requests from its `ListSync`, and owns the create form. It never renders
//! anything itself; hosts read a `ListModel` snapshot and draw it however
//! they like.

use tracing::{debug, info, warn};

use crate::client::TodoClient;
use crate::columns;
use crate::error::{ApiError, StateError};
use crate::http::{HttpRequest, Outcome};
use crate::route::Route;
use crate::status::OperationStatus;
use crate::sync::{Applied, ListSync, PendingList};
use crate::types::{Todo, TodoId, TodoPayload};
use crate::view_state::{SortSpec, ViewStateStore};

/// Label shown in place of rows when a page comes back empty.
pub const NO_ROWS_LABEL: &str = "There is no data :(";

/// Create dialog state. `error` holds the message shown to the user when a
/// submission fails; the dialog stays open in that case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateForm {
    pub open: bool,
    pub error: Option<String>,
}

/// Snapshot of everything the grid needs to draw itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListModel {
    pub rows: Vec<Todo>,
    pub total_items: u64,
    pub page: u32,
    pub page_size: u32,
    pub page_count: u64,
    pub sorting: Option<SortSpec>,
    pub loading: bool,
    pub error: Option<String>,
    pub empty_label: Option<&'static str>,
}

#[derive(Debug)]
pub struct ListView {
    store: ViewStateStore,
    sync: ListSync,
    form: CreateForm,
    create: OperationStatus<()>,
}

impl ListView {
    pub fn new(client: TodoClient, store: ViewStateStore) -> Self {
        let sync = ListSync::new(client, &store);
        Self {
            store,
            sync,
            form: CreateForm::default(),
            create: OperationStatus::Idle,
        }
    }

    pub fn store(&self) -> &ViewStateStore {
        &self.store
    }

    pub fn sync(&self) -> &ListSync {
        &self.sync
    }

    /// Next list request to execute, if the view state moved.
    pub fn poll(&mut self) -> Option<PendingList> {
        self.sync.poll()
    }

    pub fn resolve_list(&mut self, generation: u64, outcome: Outcome) -> Applied {
        self.sync.resolve(generation, outcome)
    }

    pub fn change_page(&self, page: u32) {
        self.store.set_page(page);
    }

    pub fn change_page_size(&self, page_size: u32) -> Result<(), StateError> {
        self.store.set_page_size(page_size)
    }

    pub fn click_sort(&self, field: &str) -> Result<(), StateError> {
        self.store.set_sorting(field)
    }

    /// Apply raw filter input for `field`. Empty input clears the filter.
    pub fn edit_filter(&self, field: &str, raw: &str) -> Result<(), StateError> {
        let column =
            columns::find(field).ok_or_else(|| StateError::UnknownColumn(field.to_string()))?;
        if raw.is_empty() {
            self.store.clear_column_filter(field);
            return Ok(());
        }
        self.store.set_column_filter(field, column.parse_filter(raw))
    }

    pub fn form(&self) -> &CreateForm {
        &self.form
    }

    pub fn create_status(&self) -> &OperationStatus<()> {
        &self.create
    }

    pub fn open_create_form(&mut self) {
        self.form = CreateForm {
            open: true,
            error: None,
        };
    }

    pub fn close_create_form(&mut self) {
        self.form.open = false;
    }

    /// Build the create request for the submitted form. Validation failures
    /// are recorded on the form and returned.
    pub fn submit_create(&mut self, payload: &TodoPayload) -> Result<HttpRequest, ApiError> {
        match self.sync.client().build_create(payload) {
            Ok(request) => {
                self.form.error = None;
                self.create.start();
                Ok(request)
            }
            Err(err) => {
                self.form.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Apply the create response. On success the form closes and a refresh
    /// request is returned; on failure the form stays open with the error.
    pub fn resolve_create(&mut self, outcome: Outcome) -> Option<PendingList> {
        let result = outcome.and_then(|response| self.sync.client().parse_create(response));
        match result {
            Ok(()) => {
                info!("todo created");
                self.create.finish(Ok(()));
                self.close_create_form();
                Some(self.sync.refresh())
            }
            Err(err) => {
                warn!(error = %err, "error creating todo");
                self.form.error = Some(format!("Could not create todo: {err}"));
                self.create.finish(Err(err));
                None
            }
        }
    }

    /// Navigate to the detail view of `id`. The view state stays in the
    /// shared store so the detail view can bring the user back to this page.
    pub fn show_description(&self, id: TodoId) -> Route {
        let state = self.store.get_state();
        debug!(id, page = state.page, page_size = state.page_size, "opening description");
        Route::detail(id)
    }

    pub fn model(&self) -> ListModel {
        let state = self.sync.requested_state();
        let (rows, total_items) = match self.sync.page() {
            Some(page) => (page.items.clone(), page.total_items),
            None => (Vec::new(), 0),
        };
        let page_size = u64::from(state.page_size);
        let error = self
            .sync
            .error()
            .map(|err| format!("Error fetching todos: {err}"));
        let empty_label =
            (self.sync.page().is_some() && rows.is_empty()).then_some(NO_ROWS_LABEL);
        ListModel {
            page_count: total_items.div_ceil(page_size),
            rows,
            total_items,
            page: state.page,
            page_size: state.page_size,
            sorting: state.sorting.clone(),
            loading: self.sync.status().is_loading(),
            error,
            empty_label,
        }
    }
}
