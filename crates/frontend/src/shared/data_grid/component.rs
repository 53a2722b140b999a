//! `RemoteDataGrid`: the synchronizer bound to a thaw table.

use super::api::fetch_grid;
use super::config::load_settings;
use super::download::download_paths;
use super::error::GridError;
use super::filter_editor::FilterEditor;
use super::persistence::{BrowserStorage, ColumnLayout};
use super::query_state::QueryState;
use super::synchronizer::{
    FetchKind, FetchOutcome, GridOptions, GridStatus, GridSynchronizer, PendingFetch,
};
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::icons::icon;
use contracts::shared::data_grid::{
    FilterClause, GridRow, LogicOperator, RowId, SortDirection, SortSpec,
};
use gloo_timers::callback::{Interval, Timeout};
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thaw::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Column of a remote grid. `render` formats the cell from the row payload.
pub struct GridColumn<T> {
    pub field: &'static str,
    pub title: &'static str,
    pub sortable: bool,
    pub render: fn(&T) -> String,
}

impl<T> Clone for GridColumn<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for GridColumn<T> {}

impl<T> GridColumn<T> {
    pub fn new(field: &'static str, title: &'static str, render: fn(&T) -> String) -> Self {
        Self {
            field,
            title,
            sortable: true,
            render,
        }
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }
}

/// Sort after a header click: asc, then desc, then none.
pub fn next_sort(current: Option<&SortSpec>, field: &str) -> Vec<SortSpec> {
    match current {
        Some(sort) if sort.field == field => match sort.direction {
            SortDirection::Asc => vec![SortSpec::new(field, SortDirection::Desc)],
            SortDirection::Desc => Vec::new(),
        },
        _ => vec![SortSpec::new(field, SortDirection::Asc)],
    }
}

fn sort_indicator(current: Option<&SortSpec>, field: &str) -> &'static str {
    match current {
        Some(sort) if sort.field == field => match sort.direction {
            SortDirection::Asc => " ▲",
            SortDirection::Desc => " ▼",
        },
        _ => " ⇅",
    }
}

fn sort_class(current: Option<&SortSpec>, field: &str) -> &'static str {
    match current {
        Some(sort) if sort.field == field => "table__sort-indicator table__sort-indicator--active",
        _ => "table__sort-indicator",
    }
}

type Grid<T> = GridSynchronizer<T, BrowserStorage>;

#[component]
pub fn RemoteDataGrid<T>(
    /// Persistence key (`{entity_name}-dataGridState`)
    #[prop(into)]
    entity_name: String,

    /// Backend endpoint, e.g. `/api/partners/grid`
    #[prop(into)]
    endpoint: String,

    columns: Vec<GridColumn<T>>,

    #[prop(optional, into)]
    title: String,

    /// User-editable filters applied on the first visit
    #[prop(optional)]
    default_filters: Option<Vec<FilterClause>>,

    /// Always sent, never shown or persisted
    #[prop(optional)]
    fixed_filters: Vec<FilterClause>,

    /// Merged into every request
    #[prop(optional)]
    extra_params: Map<String, Value>,

    #[prop(default = true)]
    persist: bool,

    /// Rows sharing this field are highlighted and listed first
    #[prop(optional, into)]
    duplicate_key: Option<String>,

    /// Rows already picked elsewhere; shown but not selectable
    #[prop(optional)]
    disabled_selected: Vec<RowId>,

    #[prop(optional)]
    selectable: bool,

    #[prop(optional)]
    refetch_interval_ms: Option<u32>,

    #[prop(optional)]
    on_state_change: Option<Callback<QueryState>>,

    #[prop(optional)]
    on_selection_change: Option<Callback<Vec<RowId>>>,
) -> impl IntoView
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    let settings = load_settings();
    let notification_ttl = settings.notification_ttl_ms;
    let page_size_options = settings.page_size_options.clone();

    let grid = StoredValue::new_local(Grid::<T>::new(
        GridOptions {
            entity_name,
            default_filters,
            fixed_filters,
            extra_params,
            persist,
            duplicate_key,
            disabled_selected,
            settings,
        },
        BrowserStorage,
    ));

    let declared: Vec<&'static str> = columns.iter().map(|c| c.field).collect();
    let filter_fields: Vec<(&'static str, &'static str)> =
        columns.iter().map(|c| (c.field, c.title)).collect();
    let columns = StoredValue::new_local(columns);
    let declared = StoredValue::new(declared);
    let endpoint = StoredValue::new(endpoint);

    // reactive mirror of the synchronizer
    let query = RwSignal::new(grid.with_value(|g| g.state().clone()));
    let layout = RwSignal::new(grid.with_value(|g| g.columns().clone()));
    let rows = RwSignal::new(Vec::<GridRow<T>>::new());
    let total = RwSignal::new(0u64);
    let page_count = RwSignal::new(0usize);
    let status = RwSignal::new(GridStatus::Uninitialized);
    let checked = RwSignal::new(Vec::<RowId>::new());
    let exporting = RwSignal::new(false);
    let notice = RwSignal::new(None::<String>);
    let notice_seq = StoredValue::new(0u64);

    let is_loading = Signal::derive(move || {
        matches!(
            status.get(),
            GridStatus::Loading | GridStatus::Uninitialized
        )
    });

    let visible_fields = Memo::new(move |_| {
        let current: ColumnLayout = layout.get();
        declared
            .with_value(|d| current.arrange(d))
            .into_iter()
            .filter(|f| current.is_visible(f))
            .collect::<Vec<String>>()
    });

    let publish = move || {
        let snapshot = grid.try_with_value(|g| {
            (
                g.state().clone(),
                g.rows().to_vec(),
                g.total(),
                g.page_count(),
                g.status(),
            )
        });
        let Some((state, data, count, pages, current)) = snapshot else {
            return;
        };
        query.set(state);
        rows.set(data);
        total.set(count);
        page_count.set(pages);
        status.set(current);
    };

    // one message per failure, hidden after the configured delay
    let notify = move |error: GridError| {
        let seq = notice_seq.get_value() + 1;
        notice_seq.set_value(seq);
        notice.set(Some(error.to_string()));
        Timeout::new(notification_ttl, move || {
            if notice_seq.try_get_value() == Some(seq) {
                let _ = notice.try_set(None);
            }
        })
        .forget();
    };

    let dispatch = move |pending: PendingFetch| {
        let kind = pending.ticket.kind;
        match kind {
            FetchKind::Data => {
                publish();
                if let Some(cb) = on_state_change {
                    cb.run(query.get_untracked());
                }
            }
            FetchKind::Export => exporting.set(true),
        }

        let url = endpoint.get_value();
        spawn_local(async move {
            let result = fetch_grid::<GridRow<T>>(&url, &pending.request).await;
            let Some(outcome) = grid.try_update_value(|g| g.complete(pending.ticket, result))
            else {
                return;
            };
            if kind == FetchKind::Export {
                exporting.set(false);
            }
            match outcome {
                FetchOutcome::Applied => publish(),
                FetchOutcome::Failed(e) => {
                    publish();
                    notify(e);
                }
                FetchOutcome::Exported(paths) => {
                    if let Err(e) = download_paths(&paths) {
                        notify(e);
                    }
                }
                FetchOutcome::Stale | FetchOutcome::Detached => {}
            }
        });
    };

    let go_to_page = move |page: usize| {
        let pending = grid.try_update_value(|g| {
            let size = g.state().page_size;
            g.set_page(page, size)
        });
        if let Some(pending) = pending {
            dispatch(pending);
        }
    };

    let change_page_size = move |size: usize| {
        if let Some(pending) = grid.try_update_value(|g| g.set_page(0, size)) {
            dispatch(pending);
        }
    };

    let toggle_sort = move |field: &'static str| {
        let pending = grid.try_update_value(|g| {
            let next = next_sort(g.state().sort.as_ref(), field);
            g.set_sort(next)
        });
        if let Some(pending) = pending {
            dispatch(pending);
        }
    };

    let apply_filters = Callback::new(
        move |(clauses, operator): (Vec<FilterClause>, LogicOperator)| {
            if let Some(pending) = grid.try_update_value(|g| g.set_filters(clauses, operator)) {
                dispatch(pending);
            }
        },
    );

    let refresh = move || {
        if let Some(pending) = grid.try_update_value(|g| g.refresh()) {
            dispatch(pending);
        }
    };

    let export = move || {
        let fields = visible_fields.get_untracked();
        if let Some(pending) = grid.try_update_value(|g| g.request_export(fields)) {
            dispatch(pending);
        }
    };

    let move_left = move |field: &'static str| {
        let next = grid.try_update_value(|g| {
            let order = declared.with_value(|d| g.columns().moved_left(d, field));
            g.set_column_order(order);
            g.columns().clone()
        });
        if let Some(next) = next {
            layout.set(next);
        }
    };

    let toggle_visibility = move |field: &'static str| {
        let next = grid.try_update_value(|g| {
            let mut visibility = g.columns().visibility.clone();
            visibility.insert(field.to_string(), !g.columns().is_visible(field));
            g.set_column_visibility(visibility);
            g.columns().clone()
        });
        if let Some(next) = next {
            layout.set(next);
        }
    };

    let toggle_row = move |id: RowId| {
        let ids = grid.try_update_value(|g| {
            g.selection_mut().toggle(id);
            g.selection().checked()
        });
        if let Some(ids) = ids {
            checked.set(ids.clone());
            if let Some(cb) = on_selection_change {
                cb.run(ids);
            }
        }
    };

    // Initial load (once)
    Effect::new(move |_| {
        if let Some(pending) = grid.try_update_value(|g| g.start()) {
            dispatch(pending);
        }
    });

    // flush view state when the tab is closed or reloaded
    let unload_listener = StoredValue::new_local(None::<Closure<dyn FnMut(web_sys::Event)>>);
    if let Some(window) = web_sys::window() {
        let listener = Closure::wrap(Box::new(move |_: web_sys::Event| {
            let _ = grid.try_with_value(|g| g.persist_or_warn());
        }) as Box<dyn FnMut(web_sys::Event)>);
        match window
            .add_event_listener_with_callback("beforeunload", listener.as_ref().unchecked_ref())
        {
            Ok(()) => unload_listener.set_value(Some(listener)),
            Err(e) => log::warn!("beforeunload listener not registered: {:?}", e),
        }
    }

    let poller = StoredValue::new_local(None::<Interval>);
    if let Some(ms) = refetch_interval_ms.filter(|ms| *ms > 0) {
        let interval = Interval::new(ms, move || {
            if let Some(Some(pending)) = grid.try_update_value(|g| g.poll()) {
                dispatch(pending);
            }
        });
        poller.set_value(Some(interval));
    }

    on_cleanup(move || {
        let listener = unload_listener.try_update_value(|l| l.take()).flatten();
        if let (Some(listener), Some(window)) = (listener, web_sys::window()) {
            let _ = window.remove_event_listener_with_callback(
                "beforeunload",
                listener.as_ref().unchecked_ref(),
            );
        }
        let _ = poller.try_update_value(|p| p.take());
        let _ = grid.try_update_value(|g| g.teardown());
    });

    let column_by_field = move |field: &str| {
        columns.with_value(|cols| cols.iter().find(|c| c.field == field).copied())
    };

    // `query` is republished on every fetch; the editor only cares about real changes.
    let applied_filters = Memo::new(move |_| query.get().filters);
    let applied_operator = Memo::new(move |_| query.get().filters_operator);

    view! {
        <div class="remote-grid">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">{title}</h1>
                    <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Brand>
                        <span>{move || total.get().to_string()}</span>
                    </Badge>
                </div>

                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| export()
                        disabled=exporting
                    >
                        {icon("download")}
                        {move || if exporting.get() { " Экспорт..." } else { " Экспорт" }}
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| refresh()
                        disabled=is_loading
                    >
                        {icon("refresh")}
                        {move || if is_loading.get() { " Загрузка..." } else { " Обновить" }}
                    </Button>
                </div>
            </div>

            {move || {
                notice.get().map(|message| view! {
                    <div class="warning-box warning-box--error">
                        <span class="warning-box__icon">"⚠"</span>
                        <span class="warning-box__text">{message}</span>
                    </div>
                })
            }}

            <FilterEditor
                fields=filter_fields
                applied=applied_filters
                applied_operator=applied_operator
                on_apply=apply_filters
            >
                <PaginationControls
                    current_page=Signal::derive(move || query.get().page)
                    total_pages=page_count
                    total_count=total
                    page_size=Signal::derive(move || query.get().page_size)
                    on_page_change=Callback::new(go_to_page)
                    on_page_size_change=Callback::new(change_page_size)
                    page_size_options=page_size_options.clone()
                />
            </FilterEditor>

            <div class="remote-grid__columns">
                {icon("columns")}
                {move || {
                    let current = layout.get();
                    declared
                        .get_value()
                        .into_iter()
                        .filter_map(|field| column_by_field(field))
                        .map(|col| {
                            let field = col.field;
                            view! {
                                <label class="remote-grid__column-toggle">
                                    <input
                                        type="checkbox"
                                        prop:checked=current.is_visible(field)
                                        on:change=move |_| toggle_visibility(field)
                                    />
                                    {col.title}
                                </label>
                            }
                        })
                        .collect_view()
                }}
            </div>

            <div class="page-content">
                <div style="width: 100%; overflow-x: auto;">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                {selectable.then(|| view! { <TableHeaderCell>""</TableHeaderCell> })}
                                {move || {
                                    visible_fields
                                        .get()
                                        .into_iter()
                                        .filter_map(|field| column_by_field(field.as_str()))
                                        .map(|col| {
                                            let field = col.field;
                                            view! {
                                                <TableHeaderCell resizable=true min_width=100.0>
                                                    {col.title}
                                                    {col.sortable.then(|| view! {
                                                        <span
                                                            class=move || sort_class(query.get().sort.as_ref(), field)
                                                            style="cursor: pointer; margin-left: 4px;"
                                                            on:click=move |e| {
                                                                e.stop_propagation();
                                                                toggle_sort(field);
                                                            }
                                                        >
                                                            {move || sort_indicator(query.get().sort.as_ref(), field)}
                                                        </span>
                                                    })}
                                                    <span
                                                        class="table__column-move"
                                                        title="Сдвинуть влево"
                                                        style="cursor: pointer; margin-left: 4px;"
                                                        on:click=move |e| {
                                                            e.stop_propagation();
                                                            move_left(field);
                                                        }
                                                    >
                                                        "◂"
                                                    </span>
                                                </TableHeaderCell>
                                            }
                                        })
                                        .collect_view()
                                }}
                            </TableRow>
                        </TableHeader>

                        <TableBody>
                            {move || {
                                let data = rows.get();
                                let cols: Vec<GridColumn<T>> = visible_fields
                                    .get()
                                    .iter()
                                    .filter_map(|field| column_by_field(field.as_str()))
                                    .collect();

                                if data.is_empty() {
                                    let span = (cols.len() + usize::from(selectable)).to_string();
                                    let text = if is_loading.get() { "Загрузка…" } else { "Нет данных" };
                                    return view! {
                                        <TableRow>
                                            <TableCell attr:colspan=span>
                                                <TableCellLayout>
                                                    <span class="text-muted">{text}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                        </TableRow>
                                    }
                                    .into_any();
                                }

                                data.into_iter()
                                    .map(|row| {
                                        let check = selectable.then(|| {
                                            let can_select = grid
                                                .try_with_value(|g| g.selection().is_selectable(&row.id))
                                                .unwrap_or(false);
                                            let id_for_state = row.id.clone();
                                            let id_for_toggle = row.id.clone();
                                            view! {
                                                <TableCell>
                                                    <input
                                                        type="checkbox"
                                                        prop:checked=move || checked.get().contains(&id_for_state)
                                                        disabled=!can_select
                                                        on:change=move |_| toggle_row(id_for_toggle.clone())
                                                    />
                                                </TableCell>
                                            }
                                        });
                                        let cells = cols
                                            .iter()
                                            .map(|col| {
                                                let text = (col.render)(&row.fields);
                                                view! {
                                                    <TableCell>
                                                        <TableCellLayout truncate=true>{text}</TableCellLayout>
                                                    </TableCell>
                                                }
                                            })
                                            .collect_view();
                                        view! {
                                            <TableRow class:table__row--duplicated=row.duplicated>
                                                {check}
                                                {cells}
                                            </TableRow>
                                        }
                                    })
                                    .collect_view()
                                    .into_any()
                            }}
                        </TableBody>
                    </Table>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_click_cycles_sort() {
        let asc = next_sort(None, "name");
        assert_eq!(asc, vec![SortSpec::new("name", SortDirection::Asc)]);

        let desc = next_sort(asc.first(), "name");
        assert_eq!(desc, vec![SortSpec::new("name", SortDirection::Desc)]);

        assert!(next_sort(desc.first(), "name").is_empty());

        let other = next_sort(desc.first(), "city");
        assert_eq!(other, vec![SortSpec::new("city", SortDirection::Asc)]);
    }

    #[test]
    fn test_sort_indicator() {
        let sort = SortSpec::new("name", SortDirection::Desc);
        assert_eq!(sort_indicator(Some(&sort), "name"), " ▼");
        assert_eq!(sort_indicator(Some(&sort), "city"), " ⇅");
        assert_eq!(sort_indicator(None, "city"), " ⇅");
    }
}
