use leptos::prelude::*;

/// Иконки панели таблицы (stroke SVG, 16px)
pub fn icon(name: &str) -> AnyView {
    let shape = match name {
        "chevron-left" => view! { <polyline points="15 18 9 12 15 6"/> }.into_any(),
        "chevron-right" => view! { <polyline points="9 18 15 12 9 6"/> }.into_any(),
        "chevrons-left" => view! {
            <polyline points="11 17 6 12 11 7"/>
            <polyline points="18 17 13 12 18 7"/>
        }
        .into_any(),
        "chevrons-right" => view! {
            <polyline points="13 17 18 12 13 7"/>
            <polyline points="6 17 11 12 6 7"/>
        }
        .into_any(),
        "refresh" => view! {
            <polyline points="23 4 23 10 17 10"/>
            <path d="M20.49 15a9 9 0 1 1-2.12-9.36L23 10"/>
        }
        .into_any(),
        "download" => view! {
            <path d="M21 15v4a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2v-4"/>
            <polyline points="7 10 12 15 17 10"/>
            <line x1="12" y1="15" x2="12" y2="3"/>
        }
        .into_any(),
        "filter" => view! { <polygon points="22 3 2 3 10 12.46 10 19 14 21 14 12.46 22 3"/> }
            .into_any(),
        "plus" => view! {
            <line x1="12" y1="5" x2="12" y2="19"/>
            <line x1="5" y1="12" x2="19" y2="12"/>
        }
        .into_any(),
        "x" => view! {
            <line x1="18" y1="6" x2="6" y2="18"/>
            <line x1="6" y1="6" x2="18" y2="18"/>
        }
        .into_any(),
        "columns" => view! {
            <rect x="3" y="3" width="18" height="18" rx="2" ry="2"/>
            <path d="M9 3v18"/>
            <path d="M15 3v18"/>
        }
        .into_any(),
        _ => view! {
            <circle cx="12" cy="12" r="10"/>
            <path d="M12 8v4l3 3"/>
        }
        .into_any(),
    };

    view! {
        <svg width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" aria-hidden="true">
            {shape}
        </svg>
    }
    .into_any()
}
