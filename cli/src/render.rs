//! Plain-text rendering of the list and detail models.

use std::collections::BTreeMap;

use todo_grid_core::columns::{Column, COLUMNS, PAGE_SIZE_OPTIONS};
use todo_grid_core::{DetailState, FilterValue, ListModel, SortDirection, Todo};

pub fn list(model: &ListModel, filters: &BTreeMap<String, FilterValue>) -> String {
    let mut out = String::new();
    if model.loading {
        out.push_str("Loading...\n");
        return out;
    }
    if let Some(error) = &model.error {
        line(&mut out, error);
        return out;
    }

    let header: Vec<String> = COLUMNS
        .iter()
        .map(|column| {
            let marker = match &model.sorting {
                Some(sort) if sort.field == column.field => match sort.direction {
                    SortDirection::Asc => " ^",
                    SortDirection::Desc => " v",
                },
                _ => "",
            };
            cell(column, &format!("{}{marker}", column.header))
        })
        .collect();
    line(&mut out, header.join(" | ").trim_end());

    if let Some(label) = model.empty_label {
        line(&mut out, label);
    }
    for todo in &model.rows {
        line(&mut out, row(todo).trim_end());
    }

    if !filters.is_empty() {
        let active: Vec<String> = filters.iter().map(|(k, v)| format!("{k}={v}")).collect();
        line(&mut out, format!("Filters: {}", active.join(", ")));
    }
    line(
        &mut out,
        format!(
            "Page {} of {} ({} items), page size {} {:?}",
            model.page + 1,
            model.page_count.max(1),
            model.total_items,
            model.page_size,
            PAGE_SIZE_OPTIONS
        ),
    );
    out
}

fn line(out: &mut String, text: impl AsRef<str>) {
    out.push_str(text.as_ref());
    out.push('\n');
}

fn row(todo: &Todo) -> String {
    let values = [
        todo.id.to_string(),
        todo.title.clone(),
        if todo.completed { "yes" } else { "no" }.to_string(),
        todo.description.clone().unwrap_or_default(),
    ];
    COLUMNS
        .iter()
        .zip(values.iter())
        .map(|(column, value)| cell(column, value))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Pad or truncate `value` to the column width, on char boundaries.
fn cell(column: &Column, value: &str) -> String {
    let count = value.chars().count();
    if count > column.width {
        let kept: String = value.chars().take(column.width.saturating_sub(1)).collect();
        format!("{kept}~")
    } else {
        format!("{value:<width$}", width = column.width)
    }
}

pub fn detail(id: &str, state: &DetailState) -> String {
    match state {
        DetailState::Loading => "Loading...\n".to_string(),
        DetailState::NotFound => "Todo not found.\n".to_string(),
        DetailState::Failed(_) => "Error fetching todo.\n".to_string(),
        DetailState::Found(todo) => {
            let mut out = String::new();
            line(&mut out, format!("Here is full Description fetched by id {id}:"));
            line(&mut out, &todo.title);
            line(&mut out, todo.description.as_deref().unwrap_or(""));
            line(&mut out, format!("Completed: {}", if todo.completed { "yes" } else { "no" }));
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_grid_core::SortSpec;

    fn model(rows: Vec<Todo>, total_items: u64) -> ListModel {
        ListModel {
            rows,
            total_items,
            page: 0,
            page_size: 5,
            page_count: total_items.div_ceil(5),
            sorting: Some(SortSpec::desc("title")),
            loading: false,
            error: None,
            empty_label: None,
        }
    }

    fn todo(id: i64, title: &str) -> Todo {
        Todo {
            id,
            title: title.to_string(),
            description: None,
            completed: false,
        }
    }

    #[test]
    fn list_shows_rows_sort_marker_and_footer() {
        let out = list(&model(vec![todo(1, "Buy milk")], 6), &BTreeMap::new());
        let lines: Vec<_> = out.lines().collect();
        assert!(lines[0].contains("Title v"));
        assert!(lines[1].starts_with("1 "));
        assert!(lines[1].contains("Buy milk"));
        assert_eq!(lines[2], "Page 1 of 2 (6 items), page size 5 [5, 10]");
    }

    #[test]
    fn list_shows_active_filters() {
        let mut filters = BTreeMap::new();
        filters.insert("completed".to_string(), FilterValue::Bool(true));
        let out = list(&model(Vec::new(), 0), &filters);
        assert!(out.contains("Filters: completed=true"));
        assert!(out.contains("Page 1 of 1 (0 items)"));
    }

    #[test]
    fn list_error_replaces_grid() {
        let mut m = model(Vec::new(), 0);
        m.error = Some("Error fetching todos: HTTP 500: boom".to_string());
        assert_eq!(list(&m, &BTreeMap::new()), "Error fetching todos: HTTP 500: boom\n");
    }

    #[test]
    fn long_cells_are_truncated() {
        let column = &COLUMNS[0];
        assert_eq!(cell(column, "12345678"), "12345~");
        assert_eq!(cell(column, "12"), "12    ");
    }

    #[test]
    fn detail_states() {
        assert_eq!(detail("4", &DetailState::NotFound), "Todo not found.\n");
        let mut found = todo(4, "Call mom");
        found.description = Some("on sunday".to_string());
        let out = detail("4", &DetailState::Found(found));
        assert!(out.starts_with("Here is full Description fetched by id 4:"));
        assert!(out.contains("on sunday"));
    }

    #[test]
    fn detail_prints_one_field_per_line() {
        let mut found = todo(7, "Pay rent");
        found.completed = true;
        assert_eq!(
            detail("7", &DetailState::Found(found)),
            "Here is full Description fetched by id 7:\nPay rent\n\nCompleted: yes\n"
        );
    }
}
