//! Pagination, sorting and filtering state shared by the list and detail views.
//!
//! # Design
//! `ViewStateStore` is a cheap, cloneable handle passed to every view that
//! needs it; there is no global instance. The state lives in a
//! `tokio::sync::watch` channel, so the update methods below are the only
//! mutation surface and subscribers only ever observe the latest value.
//! Updates that leave the state unchanged do not notify.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use crate::columns;
use crate::error::StateError;

pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Prefix marking a descending sort in the encoded sort field.
pub const DESCENDING_MARKER: char = '-';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Active sort: a column plus a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Decode `"title"` / `"-title"`.
    pub fn parse(encoded: &str) -> Option<Self> {
        match encoded.strip_prefix(DESCENDING_MARKER) {
            Some("") => None,
            Some(field) => Some(Self::desc(field)),
            None if encoded.is_empty() => None,
            None => Some(Self::asc(encoded)),
        }
    }

    pub fn encode(&self) -> String {
        match self.direction {
            SortDirection::Asc => self.field.clone(),
            SortDirection::Desc => format!("{DESCENDING_MARKER}{}", self.field),
        }
    }
}

/// A column filter value as entered in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Text(String),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Bool(b) => write!(f, "{b}"),
            FilterValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

/// Client-held pagination/sort/filter configuration driving the list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub page: u32,
    pub page_size: u32,
    pub sorting: Option<SortSpec>,
    pub column_filters: BTreeMap<String, FilterValue>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sorting: None,
            column_filters: BTreeMap::new(),
        }
    }
}

impl ViewState {
    /// Offset of the first row on the current page.
    pub fn skip(&self) -> u64 {
        u64::from(self.page) * u64::from(self.page_size)
    }
}

/// Whether page-affecting updates send the user back to the first page.
///
/// Both default to `false`: changing a filter or the page size keeps the
/// current page, even if that page is now past the end of the results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    pub reset_page_on_filter_change: bool,
    pub reset_page_on_page_size_change: bool,
}

struct Inner {
    tx: watch::Sender<ViewState>,
    options: StoreOptions,
}

/// Handle to the shared view state.
#[derive(Clone)]
pub struct ViewStateStore {
    inner: Arc<Inner>,
}

impl fmt::Debug for ViewStateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewStateStore")
            .field("state", &*self.inner.tx.borrow())
            .field("options", &self.inner.options)
            .finish()
    }
}

impl Default for ViewStateStore {
    fn default() -> Self {
        Self::new(StoreOptions::default())
    }
}

impl ViewStateStore {
    pub fn new(options: StoreOptions) -> Self {
        Self::from_valid(ViewState::default(), options)
    }

    /// Start from a caller-supplied state, checked like any other update.
    pub fn with_state(state: ViewState, options: StoreOptions) -> Result<Self, StateError> {
        validate(&state)?;
        Ok(Self::from_valid(state, options))
    }

    fn from_valid(state: ViewState, options: StoreOptions) -> Self {
        let (tx, _rx) = watch::channel(state);
        Self {
            inner: Arc::new(Inner { tx, options }),
        }
    }

    pub fn options(&self) -> StoreOptions {
        self.inner.options
    }

    pub fn get_state(&self) -> ViewState {
        self.inner.tx.borrow().clone()
    }

    /// Subscribe to state changes. The watcher starts out "unseen" so its
    /// first `take_change` yields the current state.
    pub fn subscribe(&self) -> ViewStateWatcher {
        let mut rx = self.inner.tx.subscribe();
        rx.mark_changed();
        ViewStateWatcher { rx }
    }

    pub fn set_page(&self, page: u32) {
        self.update("set_page", |state| {
            state.page = page;
        });
    }

    pub fn set_page_size(&self, page_size: u32) -> Result<(), StateError> {
        if page_size == 0 {
            return Err(StateError::InvalidPageSize);
        }
        let reset = self.inner.options.reset_page_on_page_size_change;
        self.update("set_page_size", |state| {
            if reset && state.page_size != page_size {
                state.page = 0;
            }
            state.page_size = page_size;
        });
        Ok(())
    }

    pub fn set_column_filter(
        &self,
        field: &str,
        value: impl Into<FilterValue>,
    ) -> Result<(), StateError> {
        ensure_column(field)?;
        let value = value.into();
        let reset = self.inner.options.reset_page_on_filter_change;
        self.update("set_column_filter", |state| {
            let previous = state.column_filters.insert(field.to_string(), value.clone());
            if reset && previous.as_ref() != Some(&value) {
                state.page = 0;
            }
        });
        Ok(())
    }

    pub fn clear_column_filter(&self, field: &str) {
        let reset = self.inner.options.reset_page_on_filter_change;
        self.update("clear_column_filter", |state| {
            if state.column_filters.remove(field).is_some() && reset {
                state.page = 0;
            }
        });
    }

    /// Toggle sorting on `field`: ascending becomes descending, anything else
    /// becomes ascending.
    pub fn set_sorting(&self, field: &str) -> Result<(), StateError> {
        ensure_column(field)?;
        self.update("set_sorting", |state| {
            let next = match &state.sorting {
                Some(active) if active.field == field && active.direction == SortDirection::Asc => {
                    SortSpec::desc(field)
                }
                _ => SortSpec::asc(field),
            };
            state.sorting = Some(next);
        });
        Ok(())
    }

    /// Replace the whole state, e.g. when returning from the detail view.
    pub fn restore(&self, state: ViewState) -> Result<(), StateError> {
        validate(&state)?;
        self.update("restore", move |current| {
            *current = state;
        });
        Ok(())
    }

    fn update(&self, op: &'static str, apply: impl FnOnce(&mut ViewState)) {
        let changed = self.inner.tx.send_if_modified(|state| {
            let before = state.clone();
            apply(state);
            *state != before
        });
        if changed {
            let state = self.inner.tx.borrow();
            debug!(
                op,
                page = state.page,
                page_size = state.page_size,
                sorting = ?state.sorting.as_ref().map(SortSpec::encode),
                filters = state.column_filters.len(),
                "view state updated"
            );
        }
    }
}

fn ensure_column(field: &str) -> Result<(), StateError> {
    match columns::find(field) {
        Some(_) => Ok(()),
        None => Err(StateError::UnknownColumn(field.to_string())),
    }
}

/// Checks a whole state against the same rules the single-field setters use.
fn validate(state: &ViewState) -> Result<(), StateError> {
    if state.page_size == 0 {
        return Err(StateError::InvalidPageSize);
    }
    if let Some(sort) = &state.sorting {
        ensure_column(&sort.field)?;
    }
    state.column_filters.keys().try_for_each(|field| ensure_column(field))
}

/// Receives the latest view state after each change. Intermediate states
/// that were superseded before being observed are skipped.
#[derive(Debug)]
pub struct ViewStateWatcher {
    rx: watch::Receiver<ViewState>,
}

impl ViewStateWatcher {
    /// Return the latest state if it changed since the last call.
    pub fn take_change(&mut self) -> Option<ViewState> {
        match self.rx.has_changed() {
            Ok(true) => Some(self.rx.borrow_and_update().clone()),
            _ => None,
        }
    }

    /// Wait for the next change. Returns `None` once every store handle has
    /// been dropped.
    pub async fn changed(&mut self) -> Option<ViewState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}
