//! Process configuration, read once at start.

use anyhow::{Context, Result};
use todo_grid_core::view_state::DEFAULT_PAGE_SIZE;
use todo_grid_core::StoreOptions;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub page_size: u32,
    pub reset_page_on_filter_change: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            reset_page_on_filter_change: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unset variables keep their
    /// defaults; set but unparsable ones are an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(url) = lookup("API_URL") {
            config.api_url = url;
        }
        if let Some(raw) = lookup("TODO_PAGE_SIZE") {
            config.page_size = raw
                .parse()
                .ok()
                .filter(|size| *size > 0)
                .with_context(|| {
                    format!("TODO_PAGE_SIZE must be a positive integer, got {raw:?}")
                })?;
        }
        if let Some(raw) = lookup("TODO_RESET_PAGE_ON_FILTER") {
            config.reset_page_on_filter_change = parse_flag(&raw).with_context(|| {
                format!("TODO_RESET_PAGE_ON_FILTER must be a boolean, got {raw:?}")
            })?;
        }
        Ok(config)
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            reset_page_on_filter_change: self.reset_page_on_filter_change,
            ..StoreOptions::default()
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.page_size, 5);
    }

    #[test]
    fn reads_variables() {
        let config = Config::from_lookup(lookup(&[
            ("API_URL", "http://api.example"),
            ("TODO_PAGE_SIZE", "10"),
            ("TODO_RESET_PAGE_ON_FILTER", "yes"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "http://api.example");
        assert_eq!(config.page_size, 10);
        assert!(config.store_options().reset_page_on_filter_change);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Config::from_lookup(lookup(&[("TODO_PAGE_SIZE", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("TODO_PAGE_SIZE", "five")])).is_err());
        assert!(Config::from_lookup(lookup(&[("TODO_RESET_PAGE_ON_FILTER", "maybe")])).is_err());
    }
}
