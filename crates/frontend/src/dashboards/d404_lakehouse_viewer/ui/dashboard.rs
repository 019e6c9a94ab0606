use super::chart::AnalyticsChart;
use super::grid::SalesGrid;
use crate::dashboards::d404_lakehouse_viewer::api;
use crate::dashboards::d404_lakehouse_viewer::keys::LakehouseQuery;
use crate::dashboards::d404_lakehouse_viewer::state::create_state;
use crate::shared::components::{Skeleton, SkeletonRows};
use crate::shared::config::use_app_config;
use crate::shared::icons::icon;
use crate::shared::query::{use_query, QueryClient};
use contracts::dashboards::d404_lakehouse_viewer::{SaleRecord, StatRow};
use leptos::prelude::*;
use std::sync::Arc;
use thaw::*;

pub type StatsClient = QueryClient<LakehouseQuery, Vec<StatRow>>;
pub type SalesClient = QueryClient<LakehouseQuery, Vec<SaleRecord>>;

/// Lakehouse Viewer: revenue chart on top, raw rows below
///
/// Owns the selected category. Chart clicks toggle it, the sales query key
/// follows it.
#[component]
pub fn LakehouseDashboard() -> impl IntoView {
    let config = use_app_config();
    let filter = create_state();

    let stats_client = use_context::<StatsClient>().expect("StatsClient context not found");
    let sales_client = use_context::<SalesClient>().expect("SalesClient context not found");

    let stats_origin = config.api_origin.clone();
    let stats = use_query(
        stats_client,
        Signal::derive(|| LakehouseQuery::Stats),
        move |_key: LakehouseQuery| {
            let origin = stats_origin.clone();
            async move { api::fetch_stats(&origin).await }
        },
    );

    let sales_origin = config.api_origin.clone();
    let sales_limit = config.sales_limit;
    let page_size = config.grid_page_size;
    let sales_key = Signal::derive(move || filter.with(|f| f.sales_key()));
    let sales = use_query(sales_client, sales_key, move |key: LakehouseQuery| {
        let origin = sales_origin.clone();
        async move {
            let category = match key {
                LakehouseQuery::Sales { category } => category,
                LakehouseQuery::Stats => None,
            };
            api::fetch_sales(&origin, sales_limit, category).await
        }
    });

    let selected = Signal::derive(move || filter.with(|f| f.selected().map(str::to_string)));

    let on_bar_click = Callback::new(move |category: String| {
        filter.update(|f| *f = f.click(&category));
        log::debug!("Category filter: {:?}", filter.get_untracked());
    });

    let clear_filter = move |_| filter.update(|f| *f = f.clear());

    let refresh = move |_| {
        stats_client.invalidate_all();
        sales_client.invalidate_all();
        stats.refetch();
        sales.refetch();
    };

    let stats_rows = Signal::derive(move || {
        stats
            .snapshot
            .with(|s| s.data.as_deref().cloned().unwrap_or_default())
    });
    let sales_rows = Signal::derive(move || {
        sales
            .snapshot
            .with(|s| s.data.clone().unwrap_or_else(|| Arc::new(Vec::new())))
    });

    // Ветки ниже перестраиваются только при смене флага загрузки,
    // таблица сохраняет сортировку и фильтры
    let stats_loading = Memo::new(move |_| stats.snapshot.with(|s| s.is_loading));
    let sales_loading = Memo::new(move |_| sales.snapshot.with(|s| s.is_loading));

    let is_fetching = move || {
        stats.snapshot.with(|s| s.is_fetching) || sales.snapshot.with(|s| s.is_fetching)
    };

    let error_notice = move || {
        let message = sales
            .snapshot
            .with(|s| s.error.clone())
            .or_else(|| stats.snapshot.with(|s| s.error.clone()))?;
        Some(view! {
            <div class="lakehouse-error">
                <strong>"⚠ Could not refresh data: "</strong>
                {message}
            </div>
        })
    };

    view! {
        <div id="d404_lakehouse_viewer--dashboard" class="lakehouse-page">
            <header class="lakehouse-header">
                <div>
                    <h1 class="lakehouse-header__title">"Lakehouse Viewer"</h1>
                    <p class="lakehouse-header__subtitle">
                        "Powered by "
                        <span class="lakehouse-mono">"DuckDB (Parquet)"</span>
                        " & "
                        <span class="lakehouse-mono">"Leptos"</span>
                    </p>
                </div>
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=refresh
                    disabled=Signal::derive(is_fetching)
                >
                    {icon("refresh")}
                    " Refresh"
                </Button>
            </header>

            {error_notice}

            <section class="lakehouse-section">
                <div class="lakehouse-section__head">
                    <h2 class="lakehouse-section__title">"Revenue Aggregation"</h2>
                    {move || selected.get().map(|category| view! {
                        <button class="lakehouse-clear-filter" on:click=clear_filter>
                            {icon("x")}
                            {format!(" Clear Filter: {}", category)}
                        </button>
                    })}
                </div>

                {move || {
                    if stats_loading.get() {
                        view! { <Skeleton class="skeleton--chart" /> }.into_any()
                    } else {
                        view! {
                            <AnalyticsChart
                                rows=stats_rows
                                selected=selected
                                on_bar_click=on_bar_click
                            />
                        }.into_any()
                    }
                }}
            </section>

            <section class="lakehouse-section">
                <h2 class="lakehouse-section__title">
                    "Raw Data Lake"
                    {move || sales.snapshot.with(|s| s.data.as_ref().map(|rows| rows.len())).map(|count| view! {
                        <span class="lakehouse-section__count">
                            {format!("({} records fetched)", count)}
                        </span>
                    })}
                </h2>

                <div class="lakehouse-grid-card">
                    {move || {
                        if sales_loading.get() {
                            view! { <SkeletonRows rows=5 /> }.into_any()
                        } else {
                            view! {
                                <SalesGrid rows=sales_rows page_size=page_size />
                            }.into_any()
                        }
                    }}
                </div>
            </section>
        </div>
    }
}
