//! Компонент ячейки таблицы для денежных значений
//!
//! # Примеры
//!
//! ```rust,ignore
//! // "$1,234.50"
//! <TableCellMoney value=Some(amount) />
//! ```

use super::number_format::format_currency;
use leptos::prelude::*;
use thaw::*;

/// Текст ячейки: сумма в долларах или прочерк, если значения нет
pub fn money_cell_text(value: Option<f64>) -> String {
    match value {
        Some(v) => format_currency(v),
        None => "—".to_string(),
    }
}

/// Ячейка таблицы с суммой в долларах
///
/// Форматирует число с 2 знаками и разделителем тысяч, выравнивает по правому краю.
#[component]
pub fn TableCellMoney(
    /// Значение для отображения
    #[prop(into)]
    value: Signal<Option<f64>>,
) -> impl IntoView {
    view! {
        <TableCell class="text-right">
            {move || money_cell_text(value.get())}
        </TableCell>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_cell_text() {
        assert_eq!(money_cell_text(Some(1234.5)), "$1,234.50");
        assert_eq!(money_cell_text(Some(-15.5)), "-$15.50");
        assert_eq!(money_cell_text(None), "—");
    }
}
