use crate::shared::components::pagination_controls::page_count;
use crate::shared::list_utils::{compare_f64, sort_list, Searchable, SortDirection, Sortable};
use contracts::dashboards::d404_lakehouse_viewer::{SaleRecord, SaleStatus};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Columns of the raw data grid, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SalesColumn {
    Id,
    ProductName,
    Category,
    Region,
    Status,
    Amount,
    Date,
}

impl SalesColumn {
    pub const ALL: [SalesColumn; 7] = [
        SalesColumn::Id,
        SalesColumn::ProductName,
        SalesColumn::Category,
        SalesColumn::Region,
        SalesColumn::Status,
        SalesColumn::Amount,
        SalesColumn::Date,
    ];

    /// Backend field name, also used as sort key
    pub fn field(self) -> &'static str {
        match self {
            SalesColumn::Id => "id",
            SalesColumn::ProductName => "product_name",
            SalesColumn::Category => "category",
            SalesColumn::Region => "region",
            SalesColumn::Status => "status",
            SalesColumn::Amount => "amount",
            SalesColumn::Date => "date",
        }
    }

    pub fn from_field(field: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|column| column.field() == field)
    }

    pub fn header(self) -> &'static str {
        match self {
            SalesColumn::Id => "Id",
            SalesColumn::ProductName => "Product",
            SalesColumn::Category => "Category",
            SalesColumn::Region => "Region",
            SalesColumn::Status => "Status",
            SalesColumn::Amount => "Amount",
            SalesColumn::Date => "Date",
        }
    }

    pub fn min_width(self) -> f64 {
        match self {
            SalesColumn::Id => 90.0,
            SalesColumn::ProductName => 220.0,
            SalesColumn::Category => 150.0,
            SalesColumn::Region | SalesColumn::Status | SalesColumn::Amount => 120.0,
            SalesColumn::Date => 150.0,
        }
    }

    /// Amount and date have no filter input
    pub fn is_filterable(self) -> bool {
        !matches!(self, SalesColumn::Amount | SalesColumn::Date)
    }
}

impl Searchable for SaleRecord {
    fn get_field_value(&self, field: &str) -> Option<String> {
        match SalesColumn::from_field(field)? {
            SalesColumn::Id => Some(self.id.to_string()),
            SalesColumn::ProductName => Some(self.product_name.clone()),
            SalesColumn::Category => Some(self.category.clone()),
            SalesColumn::Region => Some(self.region.clone()),
            SalesColumn::Status => Some(self.status.to_string()),
            SalesColumn::Amount => Some(self.amount.to_string()),
            SalesColumn::Date => Some(self.date.clone()),
        }
    }
}

impl Sortable for SaleRecord {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match SalesColumn::from_field(field) {
            Some(SalesColumn::Id) => self.id.cmp(&other.id),
            Some(SalesColumn::ProductName) => self
                .product_name
                .to_lowercase()
                .cmp(&other.product_name.to_lowercase()),
            Some(SalesColumn::Category) => self.category.cmp(&other.category),
            Some(SalesColumn::Region) => self.region.cmp(&other.region),
            Some(SalesColumn::Status) => self.status.as_str().cmp(other.status.as_str()),
            Some(SalesColumn::Amount) => compare_f64(self.amount, other.amount),
            Some(SalesColumn::Date) => match (self.sale_date(), other.sale_date()) {
                (Some(a), Some(b)) => a.cmp(&b),
                _ => self.date.cmp(&other.date),
            },
            None => Ordering::Equal,
        }
    }
}

/// Whether `record` passes the filter typed into `column`'s header
///
/// Id is matched exactly when the filter is a number, every other column
/// by case-insensitive substring.
pub fn matches_column_filter(record: &SaleRecord, column: SalesColumn, filter: &str) -> bool {
    let filter = filter.trim();
    if filter.is_empty() {
        return true;
    }
    if column == SalesColumn::Id {
        if let Ok(id) = filter.parse::<i64>() {
            return record.id == id;
        }
    }
    record.field_contains(column.field(), filter)
}

/// Colour class of the status cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Failure,
    Success,
    Neutral,
}

impl StatusTone {
    pub fn of(status: &SaleStatus) -> Self {
        match status {
            SaleStatus::Failed => StatusTone::Failure,
            SaleStatus::Completed => StatusTone::Success,
            _ => StatusTone::Neutral,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            StatusTone::Failure => "red",
            StatusTone::Success => "green",
            StatusTone::Neutral => "orange",
        }
    }
}

/// Rows of the current page plus totals for the pager
#[derive(Debug, Clone, PartialEq)]
pub struct GridPage {
    pub rows: Vec<SaleRecord>,
    pub page: usize,
    pub total_pages: usize,
    /// Rows left after filtering
    pub total_rows: usize,
}

/// Sort, filters and page of the grid; rows themselves come from outside
#[derive(Debug, Clone, PartialEq)]
pub struct GridState {
    sort: Option<(SalesColumn, SortDirection)>,
    filters: HashMap<SalesColumn, String>,
    page: usize,
    page_size: usize,
}

impl GridState {
    pub fn new(page_size: usize) -> Self {
        Self {
            sort: None,
            filters: HashMap::new(),
            page: 0,
            page_size: page_size.max(1),
        }
    }

    /// Header click: ascending, then descending, then unsorted
    pub fn toggle_sort(&mut self, column: SalesColumn) {
        let current = match self.sort {
            Some((sorted, direction)) if sorted == column => Some(direction),
            _ => None,
        };
        self.sort = SortDirection::cycle(current).map(|direction| (column, direction));
    }

    pub fn sort(&self) -> Option<(SalesColumn, SortDirection)> {
        self.sort
    }

    /// Sort field name for header indicators, empty when unsorted
    pub fn sort_field_name(&self) -> String {
        self.sort
            .map(|(column, _)| column.field().to_string())
            .unwrap_or_default()
    }

    pub fn sort_ascending(&self) -> bool {
        self.sort
            .map(|(_, direction)| direction.is_ascending())
            .unwrap_or(true)
    }

    pub fn set_filter(&mut self, column: SalesColumn, value: String) {
        if value.trim().is_empty() {
            self.filters.remove(&column);
        } else {
            self.filters.insert(column, value);
        }
        self.page = 0;
    }

    pub fn filter_value(&self, column: SalesColumn) -> String {
        self.filters.get(&column).cloned().unwrap_or_default()
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    pub fn reset_page(&mut self) {
        self.page = 0;
    }

    /// Filter, sort and slice `rows`; the page is clamped to the last one
    pub fn apply(&self, rows: &[SaleRecord]) -> GridPage {
        let mut visible: Vec<SaleRecord> = rows
            .iter()
            .filter(|record| {
                self.filters
                    .iter()
                    .all(|(column, filter)| matches_column_filter(record, *column, filter))
            })
            .cloned()
            .collect();

        if let Some((column, direction)) = self.sort {
            sort_list(&mut visible, column.field(), direction.is_ascending());
        }

        let total_rows = visible.len();
        let total_pages = page_count(total_rows, self.page_size);
        let page = self.page.min(total_pages - 1);
        let rows = visible
            .into_iter()
            .skip(page * self.page_size)
            .take(self.page_size)
            .collect();

        GridPage {
            rows,
            page,
            total_pages,
            total_rows,
        }
    }
}
