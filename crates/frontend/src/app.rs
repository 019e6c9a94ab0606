use crate::dashboards::d404_lakehouse_viewer::ui::{SalesClient, StatsClient};
use crate::dashboards::LakehouseDashboard;
use crate::shared::config::AppConfig;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::default();
    log::info!("Lakehouse API origin: {}", config.api_origin);

    // Кэши запросов живут всё время работы приложения
    provide_context(StatsClient::new(config.query.clone()));
    provide_context(SalesClient::new(config.query.clone()));
    provide_context(config);

    view! {
        <LakehouseDashboard />
    }
}
