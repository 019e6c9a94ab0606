use super::grid_state::{GridState, SalesColumn, StatusTone};
use crate::shared::components::table::{SortableHeaderCell, TableCellMoney};
use crate::shared::components::PaginationControls;
use crate::shared::list_utils::ColumnFilterInput;
use contracts::dashboards::d404_lakehouse_viewer::SaleRecord;
use leptos::prelude::*;
use std::sync::Arc;
use thaw::*;

/// Raw sales table: per-column filters, sorting and client-side paging
///
/// Rows are taken as given; paging never triggers a request.
#[component]
pub fn SalesGrid(
    #[prop(into)] rows: Signal<Arc<Vec<SaleRecord>>>,
    #[prop(optional, default = 20)] page_size: usize,
) -> impl IntoView {
    let state = RwSignal::new(GridState::new(page_size));

    // Новый набор строк — снова с первой страницы
    Effect::new(move |_| {
        rows.track();
        state.update(|s| s.reset_page());
    });

    let page = Memo::new(move |_| {
        let rows = rows.get();
        state.with(|s| s.apply(&rows))
    });

    let current_sort_field = Signal::derive(move || state.with(|s| s.sort_field_name()));
    let sort_ascending = Signal::derive(move || state.with(|s| s.sort_ascending()));
    let on_sort = Callback::new(move |field: String| {
        if let Some(column) = SalesColumn::from_field(&field) {
            state.update(|s| s.toggle_sort(column));
        }
    });

    view! {
        <div class="sales-grid">
            <div class="sales-grid__scroll">
                <Table>
                    <TableHeader>
                        <TableRow>
                            {SalesColumn::ALL.into_iter().map(|column| {
                                let align = if column == SalesColumn::Amount { "right" } else { "left" };
                                view! {
                                    <SortableHeaderCell
                                        label=column.header()
                                        sort_field=column.field()
                                        current_sort_field=current_sort_field
                                        sort_ascending=sort_ascending
                                        on_sort=on_sort
                                        min_width=column.min_width()
                                        align=align
                                    />
                                }
                            }).collect_view()}
                        </TableRow>
                        <TableRow>
                            {SalesColumn::ALL.into_iter().map(|column| {
                                if column.is_filterable() {
                                    view! {
                                        <TableHeaderCell>
                                            <ColumnFilterInput
                                                value=Signal::derive(move || state.with(|s| s.filter_value(column)))
                                                on_change=Callback::new(move |value: String| {
                                                    state.update(|s| s.set_filter(column, value));
                                                })
                                            />
                                        </TableHeaderCell>
                                    }.into_any()
                                } else {
                                    view! { <TableHeaderCell>""</TableHeaderCell> }.into_any()
                                }
                            }).collect_view()}
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        {move || page.with(|p| p.rows.clone()).into_iter().map(|record| {
                            view! { <SalesGridRow record=record /> }
                        }).collect_view()}
                    </TableBody>
                </Table>
            </div>
            <PaginationControls
                current_page=Signal::derive(move || page.with(|p| p.page))
                total_pages=Signal::derive(move || page.with(|p| p.total_pages))
                total_count=Signal::derive(move || page.with(|p| p.total_rows))
                on_page_change=Callback::new(move |next: usize| state.update(|s| s.set_page(next)))
            />
        </div>
    }
}

#[component]
fn SalesGridRow(record: SaleRecord) -> impl IntoView {
    let status_style = format!("color: {};", StatusTone::of(&record.status).color());

    view! {
        <TableRow>
            <TableCell>{record.id}</TableCell>
            <TableCell>{record.product_name}</TableCell>
            <TableCell>{record.category}</TableCell>
            <TableCell>{record.region}</TableCell>
            <TableCell>
                <span class="sales-grid__status" style=status_style>
                    {record.status.to_string()}
                </span>
            </TableCell>
            <TableCellMoney value=Some(record.amount) />
            <TableCell>{record.date}</TableCell>
        </TableRow>
    }
}
