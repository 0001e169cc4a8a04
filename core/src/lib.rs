//! Client core for the paginated todo grid.
//!
//! # Overview
//! Holds the grid's view state (page, page size, sorting, column filters),
//! derives list queries from it, and builds/parses requests for every todo
//! API operation without touching the network (host-does-IO pattern). The
//! host executes each `HttpRequest` and hands back the `HttpResponse`.
//!
//! # Design
//! - `ViewStateStore` is an injectable handle; its update methods are the
//!   only way to change the state.
//! - `ListSync` watches the store and issues one list request per observed
//!   change. Requests carry a generation number and only the latest
//!   generation's response is applied.
//! - `TodoClient` is stateless: each operation is a `build_*` / `parse_*`
//!   pair.
//! - `ListView` and `DetailView` are render-agnostic controllers producing
//!   plain data for the host to draw.

pub mod client;
pub mod columns;
pub mod detail_view;
pub mod error;
pub mod http;
pub mod list_view;
pub mod query;
pub mod route;
pub mod status;
pub mod sync;
pub mod types;
pub mod view_state;

pub use client::TodoClient;
pub use detail_view::{DetailState, DetailView};
pub use error::{ApiError, StateError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Outcome};
pub use list_view::{CreateForm, ListModel, ListView};
pub use query::{build_list_params, ListParams};
pub use route::Route;
pub use status::OperationStatus;
pub use sync::{Applied, ListSync, PendingList};
pub use types::{CreateTodo, PagedResult, Todo, TodoId, TodoPayload};
pub use view_state::{
    FilterValue, SortDirection, SortSpec, StoreOptions, ViewState, ViewStateStore,
    ViewStateWatcher,
};
