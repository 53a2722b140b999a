use super::query_state::QueryState;
use contracts::shared::data_grid::GridFetchRequest;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Column layout sent along with an export request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExportColumns {
    pub fields: Vec<String>,
    pub visibility: BTreeMap<String, bool>,
}

/// Translate the query state into the backend request.
///
/// The backend counts pages from one. `export` switches the same parameters
/// to the file-export response shape.
pub fn build_request(
    state: &QueryState,
    extra_params: &Map<String, Value>,
    export: Option<&ExportColumns>,
) -> GridFetchRequest {
    GridFetchRequest {
        page: state.page + 1,
        per_page: state.page_size,
        order: state.sort.as_ref().map(|s| s.order_param()),
        filters: state.filters.clone(),
        filters_operator: state.filters_operator,
        hard_coded_filters: state.fixed_filters.clone(),
        export: export.map(|_| true),
        columns: export.map(|c| c.fields.clone()),
        column_visibility_model: export.map(|c| c.visibility.clone()),
        extra: extra_params.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::data_grid::{FilterClause, LogicOperator, SortDirection, SortSpec};
    use serde_json::json;

    #[test]
    fn test_page_is_one_based() {
        let mut st = QueryState::with_defaults(None, vec![], 25);
        for p in [0usize, 1, 9, 41] {
            st.apply_page(p, 25);
            assert_eq!(build_request(&st, &Map::new(), None).page, p + 1);
        }
    }

    #[test]
    fn test_fixed_filters_and_extra_params_are_merged() {
        let fixed = vec![FilterClause::new("workplace_id", "equals", json!(3))];
        let mut st = QueryState::with_defaults(None, fixed.clone(), 50);
        st.apply_filters(
            vec![FilterClause::new("name", "contains", json!("ab"))],
            LogicOperator::Or,
        );
        st.apply_sort(vec![SortSpec::new("name", SortDirection::Asc)]);

        let mut extra = Map::new();
        extra.insert("clientId".to_string(), json!("c-9"));

        let req = build_request(&st, &extra, None);
        assert_eq!(req.per_page, 50);
        assert_eq!(req.order.as_deref(), Some("name: asc"));
        assert_eq!(req.hard_coded_filters, fixed);
        assert_eq!(req.filters_operator, LogicOperator::And);
        assert_eq!(req.extra.get("clientId"), Some(&json!("c-9")));
        assert_eq!(req.export, None);
        assert_eq!(req.columns, None);
    }

    #[test]
    fn test_export_carries_columns() {
        let st = QueryState::with_defaults(None, vec![], 25);
        let columns = ExportColumns {
            fields: vec!["name".into(), "city".into()],
            visibility: BTreeMap::from([("city".to_string(), false)]),
        };
        let req = build_request(&st, &Map::new(), Some(&columns));
        assert_eq!(req.export, Some(true));
        assert_eq!(req.columns, Some(columns.fields.clone()));
        assert_eq!(req.column_visibility_model, Some(columns.visibility));
    }
}
