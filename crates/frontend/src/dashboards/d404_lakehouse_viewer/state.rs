use super::keys::LakehouseQuery;
use leptos::prelude::*;

/// Category selected by clicking the chart; the only cross-view state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    Unfiltered,
    Filtered(String),
}

impl CategoryFilter {
    /// Bar click: selects `category`, or clears it when already selected
    pub fn click(&self, category: &str) -> Self {
        match self {
            CategoryFilter::Filtered(current) if current == category => CategoryFilter::Unfiltered,
            _ => CategoryFilter::Filtered(category.to_string()),
        }
    }

    pub fn clear(&self) -> Self {
        CategoryFilter::Unfiltered
    }

    pub fn selected(&self) -> Option<&str> {
        match self {
            CategoryFilter::Unfiltered => None,
            CategoryFilter::Filtered(category) => Some(category),
        }
    }

    /// Key of the sales query for this filter
    pub fn sales_key(&self) -> LakehouseQuery {
        LakehouseQuery::sales(self.selected().map(str::to_string))
    }
}

// Create state within component scope instead of thread-local
// This ensures state is properly disposed when component unmounts
pub fn create_state() -> RwSignal<CategoryFilter> {
    RwSignal::new(CategoryFilter::default())
}
