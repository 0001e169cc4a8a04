//! Keeps the displayed page in step with the view state.
//!
//! # Design
//! `ListSync` subscribes to the store and turns each observed change into a
//! `PendingList` request tagged with a monotonically increasing generation.
//! The host executes the request and hands the outcome back to `resolve`
//! together with that generation. Only the outcome of the latest generation
//! is applied; responses to superseded requests are dropped, so an old
//! response arriving late can never overwrite fresher data.
//!
//! Changes are coalesced: if the state changes several times between two
//! polls, only one request is issued, built from the latest state.

use tracing::{debug, warn};

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, Outcome};
use crate::query::{build_list_params, ListParams};
use crate::status::OperationStatus;
use crate::types::PagedResult;
use crate::view_state::{ViewState, ViewStateStore, ViewStateWatcher};

/// A list request the host should execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingList {
    pub generation: u64,
    pub params: ListParams,
    pub request: HttpRequest,
}

/// What `resolve` did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    Stale,
}

#[derive(Debug)]
pub struct ListSync {
    client: TodoClient,
    watcher: ViewStateWatcher,
    requested: ViewState,
    generation: u64,
    status: OperationStatus<PagedResult>,
}

impl ListSync {
    pub fn new(client: TodoClient, store: &ViewStateStore) -> Self {
        Self {
            client,
            watcher: store.subscribe(),
            requested: store.get_state(),
            generation: 0,
            status: OperationStatus::Idle,
        }
    }

    /// Issue a request if the view state changed since the last one.
    /// The first poll after construction always issues.
    pub fn poll(&mut self) -> Option<PendingList> {
        let state = self.watcher.take_change()?;
        Some(self.issue(state))
    }

    /// Wait for the next view state change and issue a request for it.
    /// Returns `None` once the store is gone.
    pub async fn next(&mut self) -> Option<PendingList> {
        let state = self.watcher.changed().await?;
        Some(self.issue(state))
    }

    /// Refetch with the latest state even if nothing changed, e.g. after a
    /// successful create.
    pub fn refresh(&mut self) -> PendingList {
        let state = self
            .watcher
            .take_change()
            .unwrap_or_else(|| self.requested.clone());
        self.issue(state)
    }

    fn issue(&mut self, state: ViewState) -> PendingList {
        self.generation += 1;
        let params = build_list_params(&state);
        let request = self.client.build_list(&params);
        debug!(generation = self.generation, url = %request.url, "issuing list request");
        self.requested = state;
        self.status.start();
        PendingList {
            generation: self.generation,
            params,
            request,
        }
    }

    /// Apply the outcome of the request tagged `generation`, unless a newer
    /// request has been issued since. Generation 0 is never issued.
    pub fn resolve(&mut self, generation: u64, outcome: Outcome) -> Applied {
        if generation == 0 || generation != self.generation {
            debug!(
                generation,
                latest = self.generation,
                "discarding stale list response"
            );
            return Applied::Stale;
        }
        let result = outcome.and_then(|response| self.client.parse_list(response));
        if let Err(err) = &result {
            warn!(generation, error = %err, "list request failed");
        }
        self.status.finish(result);
        Applied::Current
    }

    pub fn status(&self) -> &OperationStatus<PagedResult> {
        &self.status
    }

    pub fn page(&self) -> Option<&PagedResult> {
        self.status.value()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.status.error()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The view state the latest request was built from.
    pub fn requested_state(&self) -> &ViewState {
        &self.requested
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;

    fn page_body(titles: &[&str], total: u64) -> String {
        let items: Vec<_> = titles
            .iter()
            .enumerate()
            .map(|(i, t)| serde_json::json!({ "id": i + 1, "title": t, "completed": false }))
            .collect();
        serde_json::json!({ "items": items, "totalItems": total }).to_string()
    }

    fn setup() -> (ViewStateStore, ListSync) {
        let store = ViewStateStore::default();
        let sync = ListSync::new(TodoClient::new("http://api"), &store);
        (store, sync)
    }

    #[test]
    fn first_poll_issues_initial_request() {
        let (_store, mut sync) = setup();
        let pending = sync.poll().unwrap();
        assert_eq!(pending.generation, 1);
        assert_eq!(
            pending.request.url,
            "http://api/todos/list?skip=0&take=5&pageSize=5"
        );
        assert!(sync.status().is_loading());
        assert!(sync.poll().is_none());
    }

    #[test]
    fn state_change_triggers_new_request() {
        let (store, mut sync) = setup();
        sync.poll().unwrap();
        store.set_page(2);
        let pending = sync.poll().unwrap();
        assert_eq!(pending.generation, 2);
        assert_eq!(pending.params.skip, 10);
    }

    #[test]
    fn burst_of_changes_is_coalesced() {
        let (store, mut sync) = setup();
        sync.poll().unwrap();
        store.set_page(1);
        store.set_page(2);
        store.set_column_filter("title", "abc").unwrap();
        let pending = sync.poll().unwrap();
        assert_eq!(pending.generation, 2);
        assert_eq!(pending.params.skip, 10);
        assert!(pending.request.url.ends_with("&title=abc"));
        assert!(sync.poll().is_none());
    }

    #[test]
    fn current_response_is_applied() {
        let (_store, mut sync) = setup();
        let pending = sync.poll().unwrap();
        let applied = sync.resolve(
            pending.generation,
            Ok(HttpResponse::new(200, page_body(&["a", "b"], 2))),
        );
        assert_eq!(applied, Applied::Current);
        let page = sync.page().unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_items, 2);
    }

    #[test]
    fn stale_response_is_discarded() {
        let (store, mut sync) = setup();
        let first = sync.poll().unwrap();
        store.set_page(1);
        let second = sync.poll().unwrap();

        // Second response arrives first.
        let applied = sync.resolve(
            second.generation,
            Ok(HttpResponse::new(200, page_body(&["fresh"], 6))),
        );
        assert_eq!(applied, Applied::Current);

        let applied = sync.resolve(
            first.generation,
            Ok(HttpResponse::new(200, page_body(&["stale"], 6))),
        );
        assert_eq!(applied, Applied::Stale);
        assert_eq!(sync.page().unwrap().items[0].title, "fresh");
    }

    #[test]
    fn response_before_any_request_is_stale() {
        let (_store, mut sync) = setup();
        let outcome = Ok(HttpResponse::new(200, page_body(&["ghost"], 1)));
        assert_eq!(sync.resolve(0, outcome), Applied::Stale);
        assert!(sync.page().is_none());
        assert!(!sync.status().is_loading());

        let pending = sync.poll().unwrap();
        assert_eq!(pending.generation, 1);
    }

    #[test]
    fn stale_response_does_not_end_loading() {
        let (store, mut sync) = setup();
        let first = sync.poll().unwrap();
        store.set_page(1);
        sync.poll().unwrap();
        sync.resolve(first.generation, Ok(HttpResponse::new(200, page_body(&[], 0))));
        assert!(sync.status().is_loading());
    }

    #[test]
    fn error_replaces_rows() {
        let (store, mut sync) = setup();
        let pending = sync.poll().unwrap();
        sync.resolve(
            pending.generation,
            Ok(HttpResponse::new(200, page_body(&["a"], 1))),
        );
        store.set_page(1);
        let pending = sync.poll().unwrap();
        sync.resolve(pending.generation, Err(ApiError::Network("refused".into())));
        assert!(sync.page().is_none());
        assert_eq!(sync.error(), Some(&ApiError::Network("refused".into())));
    }

    #[test]
    fn refresh_reissues_with_same_state() {
        let (store, mut sync) = setup();
        store.set_page(1);
        let first = sync.poll().unwrap();
        let again = sync.refresh();
        assert_eq!(again.generation, first.generation + 1);
        assert_eq!(again.params, first.params);
    }

    #[test]
    fn refresh_folds_in_pending_change() {
        let (store, mut sync) = setup();
        sync.poll().unwrap();
        store.set_page(4);
        let pending = sync.refresh();
        assert_eq!(pending.params.skip, 20);
        assert!(sync.poll().is_none());
    }

    #[tokio::test]
    async fn next_waits_for_change() {
        let (store, mut sync) = setup();
        sync.poll().unwrap();
        let writer = store.clone();
        tokio::spawn(async move {
            writer.set_sorting("title").unwrap();
        });
        let pending = sync.next().await.unwrap();
        assert_eq!(pending.params.sort_by.as_deref(), Some("title"));
    }
}
