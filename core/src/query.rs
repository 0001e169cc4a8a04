//! Derives list request parameters from the current view state.
//!
//! `build_list_params` is a pure function of its input: the same `ViewState`
//! always yields the same `ListParams`, and `to_query_string` renders keys in
//! a fixed order (filters sorted by field name).

use std::collections::BTreeMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::view_state::{FilterValue, SortDirection, ViewState};

/// Characters left unescaped in query values (RFC 3986 unreserved set).
pub(crate) const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Parameters of a `GET /todos/list` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub skip: u64,
    pub take: u32,
    pub page_size: u32,
    pub sort_by: Option<String>,
    pub sort_direction: Option<SortDirection>,
    pub filters: BTreeMap<String, FilterValue>,
}

pub fn build_list_params(state: &ViewState) -> ListParams {
    let (sort_by, sort_direction) = match &state.sorting {
        Some(sort) => (Some(sort.field.clone()), Some(sort.direction)),
        None => (None, None),
    };
    ListParams {
        skip: state.skip(),
        take: state.page_size,
        page_size: state.page_size,
        sort_by,
        sort_direction,
        filters: state.column_filters.clone(),
    }
}

impl ListParams {
    /// Ordered key/value pairs as sent on the wire, before encoding.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("skip".to_string(), self.skip.to_string()),
            ("take".to_string(), self.take.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ];
        if let Some(sort_by) = &self.sort_by {
            let direction = self.sort_direction.unwrap_or(SortDirection::Asc);
            pairs.push(("sortBy".to_string(), sort_by.clone()));
            pairs.push(("sortDirection".to_string(), direction.as_str().to_string()));
        }
        for (field, value) in &self.filters {
            pairs.push((field.clone(), value.to_string()));
        }
        pairs
    }

    pub fn to_query_string(&self) -> String {
        self.pairs()
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(k, QUERY_VALUE),
                    utf8_percent_encode(v, QUERY_VALUE)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view_state::{SortSpec, ViewStateStore};

    #[test]
    fn initial_state_requests_first_page_of_five() {
        let params = build_list_params(&ViewState::default());
        assert_eq!(params.to_query_string(), "skip=0&take=5&pageSize=5");
    }

    #[test]
    fn page_size_change_keeps_page() {
        let store = ViewStateStore::default();
        store.set_page(3);
        store.set_page_size(10).unwrap();
        let params = build_list_params(&store.get_state());
        assert_eq!(params.skip, 30);
        assert_eq!(params.to_query_string(), "skip=30&take=10&pageSize=10");
    }

    #[test]
    fn descending_marker_is_stripped() {
        let state = ViewState {
            sorting: Some(SortSpec::desc("title")),
            ..ViewState::default()
        };
        let params = build_list_params(&state);
        assert_eq!(params.sort_by.as_deref(), Some("title"));
        assert_eq!(params.sort_direction, Some(SortDirection::Desc));
        assert_eq!(
            params.to_query_string(),
            "skip=0&take=5&pageSize=5&sortBy=title&sortDirection=desc"
        );
    }

    #[test]
    fn no_sort_omits_sort_keys() {
        let params = build_list_params(&ViewState::default());
        assert!(params.sort_by.is_none());
        assert!(params.sort_direction.is_none());
        assert!(!params.to_query_string().contains("sort"));
    }

    #[test]
    fn filters_pass_through() {
        let store = ViewStateStore::default();
        store.set_column_filter("title", "abc").unwrap();
        let params = build_list_params(&store.get_state());
        assert!(params.to_query_string().ends_with("&title=abc"));

        store.set_column_filter("completed", true).unwrap();
        let params = build_list_params(&store.get_state());
        assert_eq!(
            params.to_query_string(),
            "skip=0&take=5&pageSize=5&completed=true&title=abc"
        );
    }

    #[test]
    fn filter_values_are_percent_encoded() {
        let store = ViewStateStore::default();
        store.set_column_filter("title", "milk & eggs?").unwrap();
        let query = build_list_params(&store.get_state()).to_query_string();
        assert!(query.ends_with("title=milk%20%26%20eggs%3F"), "{query}");
    }

    #[test]
    fn builder_is_pure() {
        let store = ViewStateStore::default();
        store.set_page(2);
        store.set_sorting("id").unwrap();
        store.set_column_filter("description", "x").unwrap();
        let state = store.get_state();

        let first = build_list_params(&state);
        let second = build_list_params(&state);
        assert_eq!(first, second);
        assert_eq!(first.to_query_string(), second.to_query_string());
    }
}
