//! Grid columns known to the list view.

use crate::view_state::FilterValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Number,
    Text,
    Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub field: &'static str,
    pub header: &'static str,
    pub width: usize,
    pub kind: ColumnKind,
}

pub const COLUMNS: &[Column] = &[
    Column {
        field: "id",
        header: "ID",
        width: 6,
        kind: ColumnKind::Number,
    },
    Column {
        field: "title",
        header: "Title",
        width: 24,
        kind: ColumnKind::Text,
    },
    Column {
        field: "completed",
        header: "Completed",
        width: 10,
        kind: ColumnKind::Boolean,
    },
    Column {
        field: "description",
        header: "Description",
        width: 32,
        kind: ColumnKind::Text,
    },
];

/// Page sizes offered by the pagination control.
pub const PAGE_SIZE_OPTIONS: &[u32] = &[5, 10];

pub fn find(field: &str) -> Option<&'static Column> {
    COLUMNS.iter().find(|c| c.field == field)
}

impl Column {
    /// Interpret raw filter input for this column. Boolean columns accept
    /// `true`/`false`; anything else is passed through as text.
    pub fn parse_filter(&self, raw: &str) -> FilterValue {
        match (self.kind, raw) {
            (ColumnKind::Boolean, "true") => FilterValue::Bool(true),
            (ColumnKind::Boolean, "false") => FilterValue::Bool(false),
            _ => FilterValue::Text(raw.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_column_parses_flags() {
        let completed = find("completed").unwrap();
        assert_eq!(completed.parse_filter("true"), FilterValue::Bool(true));
        assert_eq!(completed.parse_filter("yes"), FilterValue::Text("yes".into()));
    }

    #[test]
    fn text_column_keeps_literal() {
        let title = find("title").unwrap();
        assert_eq!(title.parse_filter("true"), FilterValue::Text("true".into()));
        assert!(find("owner").is_none());
    }
}
