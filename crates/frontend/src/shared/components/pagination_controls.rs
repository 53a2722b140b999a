use crate::shared::icons::icon;
use leptos::prelude::*;

/// One-based `(first, last)` row numbers shown on `page`, or `None` when the
/// page is past the end of the result set.
pub fn visible_range(page: usize, page_size: usize, total: u64) -> Option<(u64, u64)> {
    let size = page_size.max(1) as u64;
    let first = page as u64 * size;
    if first >= total {
        return None;
    }
    Some((first + 1, (first + size).min(total)))
}

/// Target of a navigation step, kept inside `0..page_count`.
pub fn step_page(current: usize, delta: isize, page_count: usize) -> usize {
    let last = page_count.saturating_sub(1);
    current.saturating_add_signed(delta).min(last)
}

/// Pagination bar for server-paged grids.
///
/// `total_count` is the server-reported total; the page count is derived from
/// it, never from the number of rows currently shown.
#[component]
pub fn PaginationControls(
    /// Current page (0-indexed)
    #[prop(into)]
    current_page: Signal<usize>,

    /// Number of pages for the current total and page size
    #[prop(into)]
    total_pages: Signal<usize>,

    /// Rows matching the query on the server
    #[prop(into)]
    total_count: Signal<u64>,

    /// Rows per page
    #[prop(into)]
    page_size: Signal<usize>,

    /// Called with the requested page (0-indexed)
    on_page_change: Callback<usize>,

    /// Called with the new page size
    on_page_size_change: Callback<usize>,

    /// Sizes offered in the selector
    page_size_options: Vec<usize>,
) -> impl IntoView {
    let is_first = move || current_page.get() == 0;
    let is_last = move || current_page.get() + 1 >= total_pages.get();
    let fallback_size = page_size_options.first().copied().unwrap_or(25);

    let go = move |delta: isize| {
        let target = step_page(current_page.get_untracked(), delta, total_pages.get_untracked());
        if target != current_page.get_untracked() {
            on_page_change.run(target);
        }
    };

    let range_text = move || {
        let total = total_count.get();
        match visible_range(current_page.get(), page_size.get(), total) {
            Some((first, last)) => format!("{}–{} из {}", first, last, total),
            None => format!("0 из {}", total),
        }
    };

    view! {
        <div class="pagination-controls">
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(0)
                disabled=is_first
                title="Первая страница"
            >
                {icon("chevrons-left")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| go(-1)
                disabled=is_first
                title="Предыдущая страница"
            >
                {icon("chevron-left")}
            </button>
            <span class="pagination-info">
                {move || format!("{} / {}", current_page.get() + 1, total_pages.get().max(1))}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| go(1)
                disabled=is_last
                title="Следующая страница"
            >
                {icon("chevron-right")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| {
                    let pages = total_pages.get_untracked();
                    if pages > 0 {
                        on_page_change.run(pages - 1);
                    }
                }
                disabled=is_last
                title="Последняя страница"
            >
                {icon("chevrons-right")}
            </button>
            <span class="pagination-range">{range_text}</span>
            <select
                class="page-size-select"
                on:change=move |ev| {
                    let val = event_target_value(&ev).parse().unwrap_or(fallback_size);
                    on_page_size_change.run(val);
                }
                prop:value=move || page_size.get().to_string()
            >
                {page_size_options
                    .into_iter()
                    .map(|size| {
                        view! {
                            <option value=size.to_string() selected=move || page_size.get() == size>
                                {size.to_string()}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_range() {
        assert_eq!(visible_range(0, 25, 0), None);
        assert_eq!(visible_range(0, 25, 10), Some((1, 10)));
        assert_eq!(visible_range(1, 25, 60), Some((26, 50)));
        assert_eq!(visible_range(2, 25, 60), Some((51, 60)));
        assert_eq!(visible_range(3, 25, 60), None);
    }

    #[test]
    fn test_step_page_stays_in_bounds() {
        assert_eq!(step_page(0, -1, 5), 0);
        assert_eq!(step_page(2, 1, 5), 3);
        assert_eq!(step_page(4, 1, 5), 4);
        assert_eq!(step_page(0, 1, 0), 0);
    }
}
