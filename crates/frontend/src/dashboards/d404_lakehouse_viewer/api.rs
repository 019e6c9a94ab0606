use crate::shared::api_utils::{api_url, get_json, ApiError};
use contracts::dashboards::d404_lakehouse_viewer::{SaleRecord, SalesRequest, SalesResponse, StatRow};

const STATS_PATH: &str = "/api/stats";
const SALES_PATH: &str = "/api/sales";

/// URL агрегированной статистики
pub fn stats_url(origin: &str) -> String {
    api_url(origin, STATS_PATH)
}

/// URL выборки продаж; `category` попадает в запрос только если задана
pub fn sales_url(origin: &str, request: &SalesRequest) -> Result<String, ApiError> {
    let query = serde_qs::to_string(request).map_err(|e| ApiError::Query(e.to_string()))?;
    Ok(format!("{}?{}", api_url(origin, SALES_PATH), query))
}

/// Получить выручку по категориям (порядок как у бэкенда)
pub async fn fetch_stats(origin: &str) -> Result<Vec<StatRow>, ApiError> {
    get_json::<Vec<StatRow>>(&stats_url(origin)).await
}

/// Получить строки продаж, опционально только одной категории
pub async fn fetch_sales(
    origin: &str,
    limit: u32,
    category: Option<String>,
) -> Result<Vec<SaleRecord>, ApiError> {
    let request = SalesRequest::new(category).with_limit(limit);
    let url = sales_url(origin, &request)?;
    let response: SalesResponse = get_json(&url).await?;
    log::debug!("Fetched {} sales rows", response.data.len());
    Ok(response.data)
}
