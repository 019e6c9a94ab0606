use super::api_utils::api_base;
use super::query::QueryOptions;
use contracts::dashboards::d404_lakehouse_viewer::DEFAULT_SALES_LIMIT;
use leptos::prelude::*;

/// Rows per grid page
pub const DEFAULT_GRID_PAGE_SIZE: usize = 20;

/// Application settings, provided once at the root via context
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Backend origin, e.g. "http://localhost:8000"
    pub api_origin: String,
    /// `limit` sent with every `/api/sales` request
    pub sales_limit: u32,
    pub grid_page_size: usize,
    pub query: QueryOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_origin: api_base(),
            sales_limit: DEFAULT_SALES_LIMIT,
            grid_page_size: DEFAULT_GRID_PAGE_SIZE,
            query: QueryOptions::default(),
        }
    }
}

/// Config from context, or defaults when rendered outside of `App`
pub fn use_app_config() -> AppConfig {
    use_context::<AppConfig>().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.sales_limit, 1000);
        assert_eq!(config.grid_page_size, 20);
        assert_eq!(config.query.retry, 3);
        assert_eq!(config.query.stale_time_ms, 0.0);
    }
}
