use crate::shared::data_grid::{GridColumn, QueryState, RemoteDataGrid};
use contracts::domain::partners::PartnerRow;
use contracts::shared::data_grid::{FilterClause, RowId};
use leptos::prelude::*;
use serde_json::json;

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn partner_columns() -> Vec<GridColumn<PartnerRow>> {
    vec![
        GridColumn::new("name", "Наименование", |p: &PartnerRow| p.name.clone()),
        GridColumn::new("tax_number", "ИНН", |p: &PartnerRow| text(&p.tax_number)),
        GridColumn::new("city", "Город", |p: &PartnerRow| text(&p.city)),
        GridColumn::new("email", "Email", |p: &PartnerRow| text(&p.email)).unsortable(),
        GridColumn::new("status", "Статус", |p: &PartnerRow| text(&p.status)),
    ]
}

/// Список партнёров; партнёры с одинаковым ИНН подсвечиваются
#[component]
pub fn PartnersList() -> impl IntoView {
    let (selected, set_selected) = signal(Vec::<RowId>::new());

    view! {
        <div class="page page--wide">
            <RemoteDataGrid
                entity_name="partners"
                endpoint="/api/partners/grid"
                title="Партнёры"
                columns=partner_columns()
                default_filters=vec![FilterClause::new("status", "equals", json!("active"))]
                duplicate_key="tax_number"
                selectable=true
                on_state_change=Callback::new(|state: QueryState| {
                    log::debug!("partners grid: page {} / size {}", state.page, state.page_size);
                })
                on_selection_change=Callback::new(move |ids: Vec<RowId>| set_selected.set(ids))
            />
            <div class="text-muted">
                {move || format!("Выбрано: {}", selected.get().len())}
            </div>
        </div>
    }
}
