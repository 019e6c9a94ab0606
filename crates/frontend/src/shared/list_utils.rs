/// Универсальные утилиты для работы со списками (фильтры по колонкам, сортировка, UI компоненты)
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use std::cmp::Ordering;

/// Задержка перед применением фильтра колонки, мс
const FILTER_DEBOUNCE_MS: u32 = 300;

/// Trait для типов данных, поддерживающих фильтрацию по колонкам
pub trait Searchable {
    /// Возвращает текстовое значение указанного поля
    fn get_field_value(&self, field: &str) -> Option<String>;

    /// Проверяет значение поля на вхождение подстроки (без учета регистра)
    fn field_contains(&self, field: &str, filter: &str) -> bool {
        let needle = filter.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.get_field_value(field)
            .map(|value| value.to_lowercase().contains(&needle))
            .unwrap_or(false)
    }
}

/// Trait для типов данных, поддерживающих сортировку
pub trait Sortable {
    /// Сравнивает два объекта по указанному полю
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering;
}

/// Направление сортировки колонки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn is_ascending(self) -> bool {
        self == SortDirection::Asc
    }

    /// Следующее состояние при повторном клике: ▲ → ▼ → без сортировки
    pub fn cycle(current: Option<SortDirection>) -> Option<SortDirection> {
        match current {
            None => Some(SortDirection::Asc),
            Some(SortDirection::Asc) => Some(SortDirection::Desc),
            Some(SortDirection::Desc) => None,
        }
    }
}

/// Сортирует список по указанному полю (стабильная сортировка)
pub fn sort_list<T: Sortable>(items: &mut [T], field: &str, ascending: bool) {
    items.sort_by(|a, b| {
        let cmp = a.compare_by_field(b, field);
        if ascending {
            cmp
        } else {
            cmp.reverse()
        }
    });
}

/// Сравнение f64 без паники на NaN
pub fn compare_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Получить индикатор сортировки для заголовка
pub fn get_sort_indicator(current_field: &str, field: &str, ascending: bool) -> &'static str {
    if current_field == field {
        if ascending {
            " ▲"
        } else {
            " ▼"
        }
    } else {
        " ⇅"
    }
}

/// CSS класс индикатора сортировки
pub fn get_sort_class(current_field: &str, field: &str) -> &'static str {
    if current_field == field {
        "sort-icon active"
    } else {
        "sort-icon"
    }
}

/// Поле ввода фильтра колонки с debounce
#[component]
pub fn ColumnFilterInput(
    /// Текущее значение фильтра
    #[prop(into)]
    value: Signal<String>,
    /// Callback для обновления значения фильтра
    #[prop(into)]
    on_change: Callback<String>,
    #[prop(optional, into)]
    placeholder: String,
) -> impl IntoView {
    let placeholder = if placeholder.is_empty() {
        "Filter...".to_string()
    } else {
        placeholder
    };

    // Локальное значение до срабатывания debounce
    let input_value = RwSignal::new(value.get_untracked());
    let pending = StoredValue::new_local(None::<Timeout>);

    let handle_input = move |new_value: String| {
        input_value.set(new_value.clone());
        // Drop отменяет предыдущий таймер
        let timeout = Timeout::new(FILTER_DEBOUNCE_MS, move || {
            on_change.run(new_value);
        });
        pending.set_value(Some(timeout));
    };

    let is_active = move || !value.get().trim().is_empty();

    view! {
        <input
            type="text"
            class=move || {
                if is_active() { "column-filter column-filter--active" } else { "column-filter" }
            }
            placeholder=placeholder
            prop:value=move || input_value.get()
            on:input=move |ev| handle_input(event_target_value(&ev))
        />
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: &'static str,
        qty: f64,
    }

    impl Searchable for Row {
        fn get_field_value(&self, field: &str) -> Option<String> {
            match field {
                "name" => Some(self.name.to_string()),
                _ => None,
            }
        }
    }

    impl Sortable for Row {
        fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
            match field {
                "name" => self.name.cmp(other.name),
                "qty" => compare_f64(self.qty, other.qty),
                _ => Ordering::Equal,
            }
        }
    }

    #[test]
    fn test_field_contains_is_case_insensitive() {
        let row = Row { name: "Healthcare", qty: 1.0 };
        assert!(row.field_contains("name", "CARE"));
        assert!(row.field_contains("name", "  "));
        assert!(!row.field_contains("name", "fin"));
        assert!(!row.field_contains("missing", "x"));
    }

    #[test]
    fn test_sort_list_both_directions() {
        let mut rows = vec![
            Row { name: "b", qty: 2.0 },
            Row { name: "a", qty: 3.0 },
            Row { name: "c", qty: 1.0 },
        ];
        sort_list(&mut rows, "qty", true);
        assert_eq!(rows.iter().map(|r| r.name).collect::<Vec<_>>(), ["c", "b", "a"]);
        sort_list(&mut rows, "name", false);
        assert_eq!(rows.iter().map(|r| r.name).collect::<Vec<_>>(), ["c", "b", "a"]);
    }

    #[test]
    fn test_sort_direction_cycle() {
        assert_eq!(SortDirection::cycle(None), Some(SortDirection::Asc));
        assert_eq!(
            SortDirection::cycle(Some(SortDirection::Asc)),
            Some(SortDirection::Desc)
        );
        assert_eq!(SortDirection::cycle(Some(SortDirection::Desc)), None);
    }

    #[test]
    fn test_sort_indicator() {
        assert_eq!(get_sort_indicator("amount", "amount", true), " ▲");
        assert_eq!(get_sort_indicator("amount", "amount", false), " ▼");
        assert_eq!(get_sort_indicator("", "amount", true), " ⇅");
        assert_eq!(get_sort_class("date", "date"), "sort-icon active");
    }
}
