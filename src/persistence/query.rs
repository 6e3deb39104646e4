use std::sync::Mutex;

use crate::persistence::criteria::{FilterValue, SearchCriteria};

/// Builds a parameterized SQL statement from a base query, a
/// [`SearchCriteria`], and ordering/pagination parameters.
///
/// Placeholders are 1-based and allocated monotonically across all filters of
/// a call; the builder must be [`reset`](QueryBuilder::reset) before reuse so
/// counters never leak between queries.
#[derive(Debug, Default)]
pub struct QueryBuilder {
    base_query: String,
    conditions: Vec<String>,
    args: Vec<FilterValue>,
    order_by: String,
    limit: i64,
    offset: i64,
}

impl QueryBuilder {
    pub fn new(base_query: impl Into<String>) -> Self {
        Self {
            base_query: base_query.into(),
            ..Self::default()
        }
    }

    pub fn set_base_query(&mut self, base_query: impl Into<String>) {
        self.base_query = base_query.into();
    }

    /// Appends one `field operator $n` condition per filter, in list order,
    /// collecting the filter values as positional arguments.
    pub fn apply_search_criteria(&mut self, criteria: &SearchCriteria) {
        for filter in &criteria.filters {
            let placeholder = format!("${}", self.args.len() + 1);
            self.conditions
                .push(format!("{} {} {}", filter.field, filter.operator, placeholder));
            self.args.push(filter.value.clone());
        }
    }

    pub fn set_order_by(&mut self, field: &str, order: &str) {
        self.order_by = format!("ORDER BY {} {}", field, order);
    }

    /// Configures LIMIT/OFFSET. Pages are 1-based; page 1 contributes no
    /// OFFSET clause.
    pub fn set_pagination(&mut self, page: i64, page_size: i64) {
        self.limit = page_size;
        self.offset = (page - 1) * page_size;
    }

    /// Assembles the final statement. The base query is emitted verbatim,
    /// `WHERE` appears only when at least one condition exists, and the same
    /// inputs always produce a byte-identical statement and argument list.
    pub fn build(&self, criteria: &SearchCriteria) -> (String, Vec<FilterValue>) {
        let mut query = self.base_query.clone();

        if !self.conditions.is_empty() {
            let joined = self
                .conditions
                .join(&format!(" {} ", criteria.logical_operator.as_str()));
            query.push_str(" WHERE ");
            query.push_str(&joined);
        }

        if !self.order_by.is_empty() {
            query.push(' ');
            query.push_str(&self.order_by);
        }
        if self.limit > 0 {
            query.push_str(&format!(" LIMIT {}", self.limit));
        }
        if self.offset > 0 {
            query.push_str(&format!(" OFFSET {}", self.offset));
        }

        (query, self.args.clone())
    }

    /// Clears all accumulated state except the base query.
    pub fn reset(&mut self) -> &mut Self {
        self.conditions.clear();
        self.args.clear();
        self.order_by.clear();
        self.limit = 0;
        self.offset = 0;
        self
    }
}

/// Explicitly owned free list of [`QueryBuilder`] instances.
///
/// Purely an allocation optimization: every builder is reset both when handed
/// out and when parked, so correctness never depends on the pool. Constructed
/// once and injected into the repository, not a process-wide singleton.
#[derive(Debug, Default)]
pub struct QueryBuilderPool {
    idle: Mutex<Vec<QueryBuilder>>,
}

impl QueryBuilderPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out a recycled builder (or a fresh one), reset and primed with
    /// the given base query.
    pub fn acquire(&self, base_query: &str) -> QueryBuilder {
        let mut builder = self.lock_idle().pop().unwrap_or_default();
        builder.reset();
        builder.set_base_query(base_query);
        builder
    }

    /// Parks a builder for reuse. The caller must not touch the instance
    /// after releasing it.
    pub fn release(&self, mut builder: QueryBuilder) {
        builder.reset();
        builder.set_base_query("");
        self.lock_idle().push(builder);
    }

    fn lock_idle(&self) -> std::sync::MutexGuard<'_, Vec<QueryBuilder>> {
        match self.idle.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::criteria::{LogicalOperator, SearchCriteriaBuilder};

    const BASE: &str = "SELECT id, title, company, description, posted_at, location, version FROM job_vacancies";

    #[test]
    fn empty_criteria_emits_no_where_clause() {
        let criteria = SearchCriteriaBuilder::new().build();
        let mut builder = QueryBuilder::new(BASE);
        builder.apply_search_criteria(&criteria);
        builder.set_order_by("title", "ASC");
        builder.set_pagination(1, 10);

        let (query, args) = builder.build(&criteria);
        assert_eq!(query, format!("{} ORDER BY title ASC LIMIT 10", BASE));
        assert!(args.is_empty());
    }

    #[test]
    fn filters_get_monotonic_positional_placeholders() {
        let criteria = SearchCriteriaBuilder::new()
            .add_filter("title", "ILIKE", "%Software%")
            .add_filter("company", "ILIKE", "%Tech%")
            .build();
        let mut builder = QueryBuilder::new(BASE);
        builder.apply_search_criteria(&criteria);

        let (query, args) = builder.build(&criteria);
        assert_eq!(
            query,
            format!("{} WHERE title ILIKE $1 AND company ILIKE $2", BASE)
        );
        assert_eq!(
            args,
            vec![
                FilterValue::Text("%Software%".to_string()),
                FilterValue::Text("%Tech%".to_string()),
            ]
        );
    }

    #[test]
    fn or_operator_joins_conditions() {
        let criteria = SearchCriteriaBuilder::new()
            .add_filter("title", "ILIKE", "%a%")
            .add_filter("location", "=", "Berlin")
            .logical_operator(LogicalOperator::Or)
            .build();
        let mut builder = QueryBuilder::new(BASE);
        builder.apply_search_criteria(&criteria);

        let (query, _) = builder.build(&criteria);
        assert!(query.ends_with("WHERE title ILIKE $1 OR location = $2"));
    }

    #[test]
    fn page_one_contributes_no_offset() {
        let criteria = SearchCriteriaBuilder::new().build();
        let mut builder = QueryBuilder::new(BASE);
        builder.set_pagination(1, 5);
        let (query, _) = builder.build(&criteria);
        assert!(query.ends_with("LIMIT 5"));
        assert!(!query.contains("OFFSET"));
    }

    #[test]
    fn later_pages_compute_offset() {
        let criteria = SearchCriteriaBuilder::new().build();
        let mut builder = QueryBuilder::new(BASE);
        builder.set_pagination(3, 5);
        let (query, _) = builder.build(&criteria);
        assert!(query.ends_with("LIMIT 5 OFFSET 10"));
    }

    #[test]
    fn zero_page_size_skips_limit_and_offset() {
        let criteria = SearchCriteriaBuilder::new().build();
        let mut builder = QueryBuilder::new(BASE);
        builder.set_pagination(1, 0);
        let (query, _) = builder.build(&criteria);
        assert_eq!(query, BASE);
    }

    #[test]
    fn build_is_idempotent() {
        let criteria = SearchCriteriaBuilder::new()
            .add_filter("title", "ILIKE", "%rust%")
            .build();
        let mut builder = QueryBuilder::new(BASE);
        builder.apply_search_criteria(&criteria);
        builder.set_order_by("title", "ASC");
        builder.set_pagination(2, 10);

        let first = builder.build(&criteria);
        let second = builder.build(&criteria);
        assert_eq!(first, second);
    }

    #[test]
    fn reset_clears_counters_between_uses() {
        let criteria = SearchCriteriaBuilder::new()
            .add_filter("title", "ILIKE", "%x%")
            .build();
        let mut builder = QueryBuilder::new(BASE);
        builder.apply_search_criteria(&criteria);
        builder.set_pagination(2, 10);
        builder.reset();

        builder.apply_search_criteria(&criteria);
        let (query, args) = builder.build(&criteria);
        // Placeholders restart at $1 after a reset.
        assert_eq!(query, format!("{} WHERE title ILIKE $1", BASE));
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn pool_recycles_without_leaking_state() {
        let pool = QueryBuilderPool::new();
        let criteria = SearchCriteriaBuilder::new()
            .add_filter("company", "ILIKE", "%Corp%")
            .build();

        let mut builder = pool.acquire(BASE);
        builder.apply_search_criteria(&criteria);
        builder.set_pagination(4, 25);
        pool.release(builder);

        let recycled = pool.acquire(BASE);
        let (query, args) = recycled.build(&SearchCriteriaBuilder::new().build());
        assert_eq!(query, BASE);
        assert!(args.is_empty());
    }
}
