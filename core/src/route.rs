//! Navigation between the list and the per-item detail view.

use std::fmt;

const DETAIL_PREFIX: &str = "/description/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    Detail { id: String },
}

impl Route {
    pub fn detail(id: impl fmt::Display) -> Self {
        Route::Detail { id: id.to_string() }
    }

    /// Parse `/` or `/description/{id}[/...]`. Extra trailing segments are
    /// ignored; only the first one carries the id.
    pub fn parse(path: &str) -> Option<Self> {
        if path.is_empty() || path == "/" {
            return Some(Route::List);
        }
        let rest = path.strip_prefix(DETAIL_PREFIX)?;
        let id = rest.split('/').next().filter(|id| !id.is_empty())?;
        Some(Route::Detail { id: id.to_string() })
    }

    pub fn to_path(&self) -> String {
        match self {
            Route::List => "/".to_string(),
            Route::Detail { id } => format!("{DETAIL_PREFIX}{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_paths() {
        assert_eq!(Route::parse("/"), Some(Route::List));
        assert_eq!(Route::parse("/description/12"), Some(Route::detail(12)));
        assert_eq!(Route::parse("/description/12/extra"), Some(Route::detail(12)));
        assert_eq!(Route::parse("/description/"), None);
        assert_eq!(Route::parse("/elsewhere"), None);
    }

    #[test]
    fn detail_path() {
        assert_eq!(Route::detail(5).to_path(), "/description/5");
        assert_eq!(Route::List.to_string(), "/");
    }
}
