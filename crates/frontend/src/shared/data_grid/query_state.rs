//! What the user currently wants to see: page, sort and filters.

use contracts::shared::data_grid::{FilterClause, LogicOperator, SortSpec};

#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    /// Zero-based page index.
    pub page: usize,
    pub page_size: usize,
    /// At most one active sort field.
    pub sort: Option<SortSpec>,
    /// `None` means "no filtering", which is distinct from the default filters.
    pub filters: Option<Vec<FilterClause>>,
    pub filters_operator: LogicOperator,
    /// Caller-injected clauses, always sent and never persisted.
    pub fixed_filters: Vec<FilterClause>,
}

impl QueryState {
    pub fn with_defaults(
        default_filters: Option<Vec<FilterClause>>,
        fixed_filters: Vec<FilterClause>,
        page_size: usize,
    ) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
            sort: None,
            filters: default_filters.filter(|f| !f.is_empty()),
            filters_operator: LogicOperator::And,
            fixed_filters,
        }
    }

    /// Replace user filters. Always returns to the first page.
    pub fn apply_filters(&mut self, clauses: Vec<FilterClause>, combinator: LogicOperator) {
        self.replace_filters(clauses, combinator);
        self.page = 0;
    }

    /// Set filters and combinator without touching the page.
    /// Empty input means no filtering; a lone OR clause is sent as AND.
    pub fn replace_filters(&mut self, clauses: Vec<FilterClause>, combinator: LogicOperator) {
        self.filters = if clauses.is_empty() {
            None
        } else {
            Some(clauses)
        };
        self.filters_operator = combinator;
        self.normalize_operator();
    }

    pub fn normalize_operator(&mut self) {
        let single = self.filters.as_ref().is_some_and(|f| f.len() == 1);
        if single && self.filters_operator == LogicOperator::Or {
            self.filters_operator = LogicOperator::And;
        }
    }

    /// Replace the sort. Only the first entry is kept; empty input clears it.
    pub fn apply_sort(&mut self, sort: Vec<SortSpec>) {
        self.sort = sort.into_iter().next();
        self.page = 0;
    }

    pub fn apply_page(&mut self, page: usize, page_size: usize) {
        self.page = page;
        self.page_size = page_size.max(1);
    }

    pub fn page_count(&self, total: u64) -> usize {
        let total = total as usize;
        total.div_ceil(self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::data_grid::SortDirection;
    use serde_json::json;

    fn clause(field: &str) -> FilterClause {
        FilterClause::new(field, "contains", json!("x"))
    }

    fn state_on_page(page: usize) -> QueryState {
        let mut st = QueryState::with_defaults(None, vec![], 25);
        st.apply_page(page, 25);
        st
    }

    #[test]
    fn test_defaults() {
        let st = QueryState::with_defaults(Some(vec![clause("city")]), vec![], 25);
        assert_eq!(st.page, 0);
        assert_eq!(st.page_size, 25);
        assert_eq!(st.sort, None);
        assert_eq!(st.filters, Some(vec![clause("city")]));
        assert_eq!(st.filters_operator, LogicOperator::And);
    }

    #[test]
    fn test_filter_and_sort_changes_reset_page() {
        let mut st = state_on_page(7);
        st.apply_filters(vec![clause("name"), clause("city")], LogicOperator::Or);
        assert_eq!(st.page, 0);

        st.apply_page(3, 25);
        st.apply_sort(vec![SortSpec::new("name", SortDirection::Asc)]);
        assert_eq!(st.page, 0);

        st.apply_page(4, 25);
        st.apply_sort(vec![]);
        assert_eq!(st.page, 0);

        st.apply_page(2, 25);
        st.apply_filters(vec![], LogicOperator::And);
        assert_eq!(st.page, 0);
    }

    #[test]
    fn test_single_clause_or_becomes_and() {
        let mut st = state_on_page(0);
        st.apply_filters(vec![clause("name")], LogicOperator::Or);
        assert_eq!(st.filters_operator, LogicOperator::And);

        st.apply_filters(vec![clause("name"), clause("city")], LogicOperator::Or);
        assert_eq!(st.filters_operator, LogicOperator::Or);
    }

    #[test]
    fn test_replace_filters_keeps_page() {
        let mut st = state_on_page(4);
        st.replace_filters(vec![clause("name")], LogicOperator::Or);
        assert_eq!(st.page, 4);
        assert_eq!(st.filters_operator, LogicOperator::And);

        st.replace_filters(vec![], LogicOperator::Or);
        assert_eq!(st.filters, None);
        assert_eq!(st.filters_operator, LogicOperator::Or);
    }

    #[test]
    fn test_empty_filters_is_none() {
        let mut st = QueryState::with_defaults(Some(vec![clause("city")]), vec![], 25);
        st.apply_filters(vec![], LogicOperator::And);
        assert_eq!(st.filters, None);
    }

    #[test]
    fn test_multi_sort_keeps_first() {
        let mut st = state_on_page(0);
        st.apply_sort(vec![
            SortSpec::new("name", SortDirection::Desc),
            SortSpec::new("city", SortDirection::Asc),
        ]);
        assert_eq!(st.sort, Some(SortSpec::new("name", SortDirection::Desc)));
    }

    #[test]
    fn test_page_change_keeps_filters_and_sort() {
        let mut st = state_on_page(0);
        st.apply_filters(vec![clause("name")], LogicOperator::And);
        st.apply_sort(vec![SortSpec::new("name", SortDirection::Asc)]);
        st.apply_page(5, 50);
        assert_eq!(st.page, 5);
        assert_eq!(st.page_size, 50);
        assert!(st.filters.is_some());
        assert!(st.sort.is_some());

        st.apply_page(1, 0);
        assert_eq!(st.page_size, 1);
    }

    #[test]
    fn test_page_count() {
        let st = state_on_page(0);
        assert_eq!(st.page_count(0), 0);
        assert_eq!(st.page_count(25), 1);
        assert_eq!(st.page_count(26), 2);
    }
}
