use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of rows requested from `/api/sales`
pub const DEFAULT_SALES_LIMIT: u32 = 1000;

/// Aggregated revenue for a single category (`GET /api/stats`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRow {
    pub category: String,
    pub total: f64,
}

/// Query parameters of `GET /api/sales`
///
/// `category` is skipped entirely when absent, the backend treats an empty
/// string as a real category value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRequest {
    pub limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl SalesRequest {
    pub fn new(category: Option<String>) -> Self {
        Self {
            limit: DEFAULT_SALES_LIMIT,
            category,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

/// Envelope of `GET /api/sales`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesResponse {
    pub data: Vec<SaleRecord>,
    /// Number of rows in `data`, reported by the backend
    #[serde(default)]
    pub count: Option<u64>,
}

/// Single raw sales row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: i64,
    pub product_name: String,
    pub category: String,
    pub region: String,
    pub status: SaleStatus,
    pub amount: f64,
    /// Date as sent by the backend, usually "YYYY-MM-DD"
    pub date: String,
}

impl SaleRecord {
    /// Calendar date of the sale, if the backend string starts with an ISO date
    pub fn sale_date(&self) -> Option<NaiveDate> {
        let date_part = self.date.get(..10).unwrap_or(&self.date);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }
}

/// Order status. Unknown values are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SaleStatus {
    Pending,
    Completed,
    Failed,
    Other(String),
}

impl SaleStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SaleStatus::Pending => "Pending",
            SaleStatus::Completed => "Completed",
            SaleStatus::Failed => "Failed",
            SaleStatus::Other(value) => value,
        }
    }
}

impl From<String> for SaleStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Pending" => SaleStatus::Pending,
            "Completed" => SaleStatus::Completed,
            "Failed" => SaleStatus::Failed,
            _ => SaleStatus::Other(value),
        }
    }
}

impl From<SaleStatus> for String {
    fn from(status: SaleStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_deserialize_keeps_order() {
        let json = r#"[{"category":"Enterprise","total":1200.5},{"category":"SaaS","total":300}]"#;
        let rows: Vec<StatRow> = serde_json::from_str(json).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, "Enterprise");
        assert_eq!(rows[1].total, 300.0);
    }

    #[test]
    fn test_sales_response_deserialize() {
        let json = r#"{
            "data": [{
                "id": 1, "product_name": "Widget", "category": "A", "region": "West",
                "status": "Failed", "amount": 20, "date": "2024-01-01"
            }],
            "count": 1
        }"#;
        let response: SalesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.count, Some(1));
        let record = &response.data[0];
        assert_eq!(record.status, SaleStatus::Failed);
        assert_eq!(record.amount, 20.0);
        assert_eq!(record.sale_date(), NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn test_sales_response_without_count() {
        let response: SalesResponse = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(response.data.is_empty());
        assert_eq!(response.count, None);
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let status: SaleStatus = serde_json::from_str(r#""Refunded""#).unwrap();
        assert_eq!(status, SaleStatus::Other("Refunded".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), r#""Refunded""#);
    }

    #[test]
    fn test_sale_date_with_time_suffix() {
        let record = SaleRecord {
            id: 7,
            product_name: "Generic Product SKU-7".to_string(),
            category: "SaaS".to_string(),
            region: "EMEA".to_string(),
            status: SaleStatus::Pending,
            amount: 100.0,
            date: "2023-06-30 00:00:00".to_string(),
        };
        assert_eq!(record.sale_date(), NaiveDate::from_ymd_opt(2023, 6, 30));
    }

    #[test]
    fn test_sales_request_skips_missing_category() {
        let value = serde_json::to_value(SalesRequest::new(None)).unwrap();
        assert_eq!(value, serde_json::json!({ "limit": 1000 }));
    }
}
