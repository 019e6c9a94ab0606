use leptos::prelude::*;

/// Pulsing grey block shown while data is loading
#[component]
pub fn Skeleton(
    /// Extra classes for sizing, e.g. "skeleton--chart"
    #[prop(optional, into)]
    class: String,
) -> impl IntoView {
    let class = if class.is_empty() {
        "skeleton".to_string()
    } else {
        format!("skeleton {}", class)
    };

    view! { <div class=class aria-busy="true"></div> }
}

/// Stack of skeleton rows standing in for a table
#[component]
pub fn SkeletonRows(
    #[prop(optional, default = 5)]
    rows: usize,
) -> impl IntoView {
    view! {
        <div class="skeleton-rows">
            {(0..rows).map(|_| view! { <Skeleton class="skeleton--row" /> }).collect_view()}
        </div>
    }
}
