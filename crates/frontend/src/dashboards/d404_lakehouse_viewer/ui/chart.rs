//! Revenue by category bar chart (inline SVG)
//!
//! Geometry is computed by [`layout_chart`] in viewBox units; the component
//! only maps it to elements and forwards bar clicks.

use crate::shared::components::table::{format_currency_compact, format_number_int};
use contracts::dashboards::d404_lakehouse_viewer::StatRow;
use leptos::prelude::*;

const VIEW_WIDTH: f64 = 800.0;
const VIEW_HEIGHT: f64 = 288.0;
const MARGIN_LEFT: f64 = 72.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 16.0;
const MARGIN_BOTTOM: f64 = 32.0;
/// Share of a band taken by the bar
const BAR_FILL_RATIO: f64 = 0.8;
const TICK_COUNT: usize = 5;

const BAR_COLOR: &str = "#4F46E5";

/// Plot rectangle inside the viewBox
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

impl Default for PlotArea {
    fn default() -> Self {
        Self {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: VIEW_WIDTH - MARGIN_LEFT - MARGIN_RIGHT,
            height: VIEW_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarGeometry {
    pub category: String,
    pub total: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Center of the band, for the x-axis label and tooltip
    pub center_x: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub value: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub area: PlotArea,
    pub bars: Vec<BarGeometry>,
    pub ticks: Vec<AxisTick>,
    /// Value at the top of the y axis
    pub axis_max: f64,
}

/// Step of roughly `max / count` rounded to 1, 2, 5 or 10 times a power of ten
pub fn nice_step(max: f64, count: usize) -> f64 {
    if max <= 0.0 || !max.is_finite() || count == 0 {
        return 1.0;
    }
    let raw = max / count as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let nice = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Tick values from 0 up to the first multiple of the step covering `max`
pub fn nice_ticks(max: f64, count: usize) -> Vec<f64> {
    let step = nice_step(max, count);
    let mut ticks = vec![0.0];
    let mut value = 0.0;
    while value < max {
        value += step;
        ticks.push(value);
    }
    if ticks.len() == 1 {
        ticks.push(step);
    }
    ticks
}

/// One bar per row in input order, height proportional to `total`
///
/// Negative totals are drawn as empty bars.
pub fn layout_chart(rows: &[StatRow], area: PlotArea) -> ChartLayout {
    let max_total = rows.iter().map(|r| r.total).fold(0.0_f64, f64::max);
    let tick_values = nice_ticks(max_total, TICK_COUNT);
    let axis_max = tick_values.last().copied().unwrap_or(1.0);

    let scale_y = |value: f64| area.bottom() - value / axis_max * area.height;

    let ticks = tick_values
        .into_iter()
        .map(|value| AxisTick {
            value,
            y: scale_y(value),
        })
        .collect();

    let band = if rows.is_empty() {
        0.0
    } else {
        area.width / rows.len() as f64
    };
    let bar_width = band * BAR_FILL_RATIO;

    let bars = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let value = row.total.max(0.0);
            let height = value / axis_max * area.height;
            let band_start = area.left + band * index as f64;
            BarGeometry {
                category: row.category.clone(),
                total: row.total,
                x: band_start + (band - bar_width) / 2.0,
                y: area.bottom() - height,
                width: bar_width,
                height,
                center_x: band_start + band / 2.0,
            }
        })
        .collect();

    ChartLayout {
        area,
        bars,
        ticks,
        axis_max,
    }
}

/// Tooltip text for a bar: ("$1,234.5", "Revenue")
pub fn tooltip_lines(total: f64) -> (String, &'static str) {
    (format_currency_compact(total), "Revenue")
}

/// Whether there is anything to draw; the SVG subtree is kept while this holds
pub fn has_bars(rows: &[StatRow]) -> bool {
    !rows.is_empty()
}

/// SVG attribute value in viewBox units
fn coord(value: f64) -> String {
    format!("{:.2}", value)
}

/// Fill opacity: the selected bar stays solid, the rest fade while a filter is active
fn bar_opacity(category: &str, selected: Option<&str>) -> &'static str {
    match selected {
        Some(current) if current != category => "0.35",
        _ => "1",
    }
}

#[component]
pub fn AnalyticsChart(
    #[prop(into)] rows: Signal<Vec<StatRow>>,
    /// Category of the active filter, for highlighting
    #[prop(into)]
    selected: Signal<Option<String>>,
    /// Emits the category of the clicked bar
    on_bar_click: Callback<String>,
) -> impl IntoView {
    let hovered = RwSignal::new(None::<usize>);
    let layout = Memo::new(move |_| rows.with(|rows| layout_chart(rows, PlotArea::default())));
    let show_bars = Memo::new(move |_| rows.with(|r| has_bars(r)));

    let tooltip = move || {
        let index = hovered.get()?;
        let bar = layout.with(|l| l.bars.get(index).cloned())?;
        let (value, label) = tooltip_lines(bar.total);
        let left = bar.center_x / VIEW_WIDTH * 100.0;
        let top = bar.y / VIEW_HEIGHT * 100.0;
        Some(view! {
            <div
                class="chart-tooltip"
                style=format!("left: {:.2}%; top: {:.2}%;", left, top)
            >
                <div class="chart-tooltip__title">{bar.category}</div>
                <div class="chart-tooltip__value">{format!("{} : {}", label, value)}</div>
            </div>
        })
    };

    view! {
        <div class="chart-card">
            <h3 class="chart-card__title">"Revenue by Category (Click to Filter)"</h3>
            {move || {
                if !show_bars.get() {
                    view! { <div class="chart-empty">"No statistics available"</div> }.into_any()
                } else {
                    view! {
                        <div class="chart-container" on:mouseleave=move |_| hovered.set(None)>
                            <svg
                                class="chart-svg"
                                viewBox=format!("0 0 {} {}", VIEW_WIDTH, VIEW_HEIGHT)
                                preserveAspectRatio="none"
                            >
                                // Grid lines and y axis labels
                                {move || layout.with(|l| l.ticks.iter().map(|tick| {
                                    view! {
                                        <line
                                            x1=coord(l.area.left)
                                            x2=coord(l.area.left + l.area.width)
                                            y1=coord(tick.y)
                                            y2=coord(tick.y)
                                            class="chart-grid-line"
                                            stroke-dasharray="3 3"
                                        />
                                        <text
                                            x=coord(l.area.left - 8.0)
                                            y=coord(tick.y + 4.0)
                                            text-anchor="end"
                                            class="chart-axis-label"
                                        >
                                            {format_number_int(tick.value)}
                                        </text>
                                    }
                                }).collect_view())}

                                // Bars
                                {move || {
                                    let current = selected.get();
                                    layout.with(|l| l.bars.iter().enumerate().map(|(index, bar)| {
                                        let category = bar.category.clone();
                                        let opacity = bar_opacity(&bar.category, current.as_deref());
                                        view! {
                                            <rect
                                                x=coord(bar.x)
                                                y=coord(bar.y)
                                                width=coord(bar.width)
                                                height=coord(bar.height)
                                                fill=BAR_COLOR
                                                fill-opacity=opacity
                                                class="chart-bar"
                                                on:mouseenter=move |_| hovered.set(Some(index))
                                                on:click=move |_| on_bar_click.run(category.clone())
                                            />
                                            <text
                                                x=coord(bar.center_x)
                                                y=coord(l.area.bottom() + 20.0)
                                                text-anchor="middle"
                                                class="chart-axis-label"
                                            >
                                                {bar.category.clone()}
                                            </text>
                                        }
                                    }).collect_view())
                                }}
                            </svg>
                            {tooltip}
                        </div>
                    }.into_any()
                }
            }}
        </div>
    }
}
