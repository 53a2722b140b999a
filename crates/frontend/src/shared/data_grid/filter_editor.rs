use crate::shared::icons::icon;
use contracts::shared::data_grid::{FilterClause, LogicOperator};
use leptos::prelude::*;
use serde_json::Value;

/// Operators offered in the editor: (wire name, label).
pub const OPERATORS: &[(&str, &str)] = &[
    ("contains", "содержит"),
    ("equals", "равно"),
    ("startsWith", "начинается с"),
    ("endsWith", "заканчивается на"),
    ("isEmpty", "пусто"),
    ("isNotEmpty", "не пусто"),
];

fn takes_value(operator: &str) -> bool {
    !matches!(operator, "isEmpty" | "isNotEmpty")
}

/// Build a clause from the editor inputs; `None` while the input is incomplete.
pub fn clause_from_input(field: &str, operator: &str, raw: &str) -> Option<FilterClause> {
    if field.is_empty() || !OPERATORS.iter().any(|(op, _)| *op == operator) {
        return None;
    }
    if !takes_value(operator) {
        return Some(FilterClause::new(field, operator, Value::Null));
    }
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Some(FilterClause::new(field, operator, Value::String(raw.to_string())))
}

/// Human readable chip text, e.g. `Город содержит «Рига»`.
pub fn describe_clause(clause: &FilterClause, fields: &[(&str, &str)]) -> String {
    let field = fields
        .iter()
        .find(|(f, _)| *f == clause.field)
        .map(|(_, title)| *title)
        .unwrap_or(clause.field.as_str());
    let operator = OPERATORS
        .iter()
        .find(|(op, _)| *op == clause.operator)
        .map(|(_, label)| *label)
        .unwrap_or(clause.operator.as_str());
    match &clause.value {
        Value::Null => format!("{} {}", field, operator),
        Value::String(s) => format!("{} {} «{}»", field, operator, s),
        other => format!("{} {} {}", field, operator, other),
    }
}

/// Applied filters and combinator as last seen by the editor.
pub type AppliedFilters = (Option<Vec<FilterClause>>, LogicOperator);

/// The draft is overwritten only when the applied filters actually changed,
/// so refetches of the same query keep unapplied clauses.
pub fn needs_reseed(previous: Option<&AppliedFilters>, current: &AppliedFilters) -> bool {
    previous != Some(current)
}

/// Collapsible editor of user filter clauses.
///
/// Changes are kept in a draft until "Применить"; the grid only sees the
/// applied list.
#[component]
pub fn FilterEditor(
    /// (field, title) of filterable columns
    fields: Vec<(&'static str, &'static str)>,

    #[prop(into)]
    applied: Signal<Option<Vec<FilterClause>>>,

    #[prop(into)]
    applied_operator: Signal<LogicOperator>,

    on_apply: Callback<(Vec<FilterClause>, LogicOperator)>,

    /// Rendered in the panel header (pagination)
    children: ChildrenFn,
) -> impl IntoView {
    let fields = StoredValue::new(fields);
    let is_expanded = RwSignal::new(false);

    let draft = RwSignal::new(Vec::<FilterClause>::new());
    let draft_operator = RwSignal::new(LogicOperator::And);

    let first_field =
        fields.with_value(|f| f.first().map(|(f, _)| f.to_string()).unwrap_or_default());
    let new_field = RwSignal::new(first_field);
    let new_operator = RwSignal::new(OPERATORS[0].0.to_string());
    let new_value = RwSignal::new(String::new());

    // applied -> draft (initial restore and external changes)
    Effect::new(move |previous: Option<AppliedFilters>| {
        let current = (applied.get(), applied_operator.get());
        if needs_reseed(previous.as_ref(), &current) {
            draft.set(current.0.clone().unwrap_or_default());
            draft_operator.set(current.1);
        }
        current
    });

    let add_clause = move |_| {
        let clause = clause_from_input(
            &new_field.get_untracked(),
            &new_operator.get_untracked(),
            &new_value.get_untracked(),
        );
        if let Some(clause) = clause {
            draft.update(|d| d.push(clause));
            new_value.set(String::new());
        }
    };

    let apply = move |_| on_apply.run((draft.get_untracked(), draft_operator.get_untracked()));
    let reset = move |_| {
        draft.set(Vec::new());
        on_apply.run((Vec::new(), LogicOperator::And));
    };

    let active_count = move || applied.get().map(|f| f.len()).unwrap_or(0);

    view! {
        <div class="filter-panel">
            <div class="filter-panel-header">
                <div
                    class="filter-panel-header__left"
                    on:click=move |_| is_expanded.update(|e| *e = !*e)
                >
                    {icon("filter")}
                    <span class="filter-panel__title">"Фильтры"</span>
                    {move || {
                        let count = active_count();
                        (count > 0).then(|| view! { <span class="badge badge--primary">{count}</span> })
                    }}
                </div>
                <div class="filter-panel-header__center">{children()}</div>
            </div>

            <div class=move || {
                if is_expanded.get() {
                    "filter-panel__collapsible filter-panel__collapsible--expanded"
                } else {
                    "filter-panel__collapsible filter-panel__collapsible--collapsed"
                }
            }>
                <div class="filter-panel-content">
                    <div class="filter-editor__tags">
                        {move || {
                            draft
                                .get()
                                .into_iter()
                                .enumerate()
                                .map(|(index, clause)| {
                                    let label = fields.with_value(|f| describe_clause(&clause, f));
                                    view! {
                                        <div class="filter-tag">
                                            <span>{label}</span>
                                            <span
                                                class="filter-tag__remove"
                                                on:click=move |e| {
                                                    e.stop_propagation();
                                                    draft.update(|d| {
                                                        if index < d.len() {
                                                            d.remove(index);
                                                        }
                                                    });
                                                }
                                            >
                                                {icon("x")}
                                            </span>
                                        </div>
                                    }
                                })
                                .collect_view()
                        }}
                    </div>

                    <div class="filter-editor__row">
                        <select
                            on:change=move |ev| new_field.set(event_target_value(&ev))
                            prop:value=move || new_field.get()
                        >
                            {fields
                                .get_value()
                                .into_iter()
                                .map(|(field, title)| view! { <option value=field>{title}</option> })
                                .collect_view()}
                        </select>
                        <select
                            on:change=move |ev| new_operator.set(event_target_value(&ev))
                            prop:value=move || new_operator.get()
                        >
                            {OPERATORS
                                .iter()
                                .map(|&(op, label)| view! { <option value=op>{label}</option> })
                                .collect_view()}
                        </select>
                        <input
                            type="text"
                            placeholder="Значение"
                            prop:value=move || new_value.get()
                            disabled=move || !takes_value(&new_operator.get())
                            on:input=move |ev| new_value.set(event_target_value(&ev))
                        />
                        <button class="button button--secondary" on:click=add_clause title="Добавить условие">
                            {icon("plus")}
                        </button>

                        <select
                            on:change=move |ev| {
                                let op = if event_target_value(&ev) == "or" {
                                    LogicOperator::Or
                                } else {
                                    LogicOperator::And
                                };
                                draft_operator.set(op);
                            }
                            prop:value=move || draft_operator.get().as_str()
                            disabled=move || draft.get().len() < 2
                        >
                            <option value="and">"И"</option>
                            <option value="or">"ИЛИ"</option>
                        </select>

                        <button class="button button--primary" on:click=apply>"Применить"</button>
                        <button class="button button--secondary" on:click=reset>"Сбросить"</button>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reseed_only_on_real_change() {
        let city = FilterClause::new("city", "contains", json!("Rīga"));
        let applied: AppliedFilters = (Some(vec![city.clone()]), LogicOperator::And);

        assert!(needs_reseed(None, &applied));
        assert!(!needs_reseed(Some(&applied), &applied));

        let cleared: AppliedFilters = (None, LogicOperator::And);
        assert!(needs_reseed(Some(&applied), &cleared));

        let two = (
            Some(vec![city.clone(), FilterClause::new("name", "equals", json!("A"))]),
            LogicOperator::Or,
        );
        assert!(needs_reseed(Some(&applied), &two));
        let same_clauses_other_operator = (Some(vec![city]), LogicOperator::Or);
        assert!(needs_reseed(Some(&applied), &same_clauses_other_operator));
    }

    #[test]
    fn test_clause_from_input() {
        assert_eq!(
            clause_from_input("city", "contains", "  Rīga "),
            Some(FilterClause::new("city", "contains", json!("Rīga")))
        );
        assert_eq!(clause_from_input("city", "contains", "   "), None);
        assert_eq!(
            clause_from_input("email", "isEmpty", ""),
            Some(FilterClause::new("email", "isEmpty", Value::Null))
        );
        assert_eq!(clause_from_input("city", "between", "1"), None);
        assert_eq!(clause_from_input("", "equals", "1"), None);
    }

    #[test]
    fn test_describe_clause() {
        let fields = [("city", "Город")];
        let clause = FilterClause::new("city", "contains", json!("Рига"));
        assert_eq!(describe_clause(&clause, &fields), "Город содержит «Рига»");

        let clause = FilterClause::new("email", "isEmpty", Value::Null);
        assert_eq!(describe_clause(&clause, &fields), "email пусто");

        let clause = FilterClause::new("fleet", "gt", json!(3));
        assert_eq!(describe_clause(&clause, &fields), "fleet gt 3");
    }
}
