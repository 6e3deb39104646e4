/// A scalar value carried by a filter and bound as a positional statement
/// argument. Values are always bound, never interpolated as literals.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Int(i64),
    Bool(bool),
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

/// A single filtering condition: column, comparison operator (e.g. "=",
/// "ILIKE", ">", "<") and the value to compare against. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub operator: String,
    pub value: FilterValue,
}

/// How the filters of a [`SearchCriteria`] are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
        }
    }
}

/// An ordered list of filters plus the operator combining them. An empty
/// filter list produces no WHERE clause. Built per query and discarded after
/// the statement executes; it has no persistent identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    pub filters: Vec<Filter>,
    pub logical_operator: LogicalOperator,
}

/// Fluent accumulator for [`SearchCriteria`]. Purely structural: field and
/// operator values are not validated here, that is the caller's concern.
#[derive(Debug, Default)]
pub struct SearchCriteriaBuilder {
    criteria: SearchCriteria,
}

impl SearchCriteriaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a filter, preserving insertion order.
    pub fn add_filter(
        mut self,
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Self {
        self.criteria.filters.push(Filter {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        });
        self
    }

    pub fn logical_operator(mut self, operator: LogicalOperator) -> Self {
        self.criteria.logical_operator = operator;
        self
    }

    /// Returns a snapshot of the accumulated criteria. The builder keeps its
    /// state, so building twice without changes yields equal criteria.
    pub fn build(&self) -> SearchCriteria {
        self.criteria.clone()
    }

    /// Clears accumulated filters and restores the default operator.
    pub fn reset(&mut self) -> &mut Self {
        self.criteria.filters.clear();
        self.criteria.logical_operator = LogicalOperator::default();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_and_with_no_filters() {
        let criteria = SearchCriteriaBuilder::new().build();
        assert!(criteria.filters.is_empty());
        assert_eq!(criteria.logical_operator, LogicalOperator::And);
    }

    #[test]
    fn filters_keep_insertion_order() {
        let criteria = SearchCriteriaBuilder::new()
            .add_filter("title", "ILIKE", "%rust%")
            .add_filter("company", "=", "Tech Innovations")
            .build();
        assert_eq!(criteria.filters.len(), 2);
        assert_eq!(criteria.filters[0].field, "title");
        assert_eq!(criteria.filters[1].field, "company");
        assert_eq!(
            criteria.filters[1].value,
            FilterValue::Text("Tech Innovations".to_string())
        );
    }

    #[test]
    fn building_twice_yields_equal_criteria() {
        let builder = SearchCriteriaBuilder::new()
            .add_filter("title", "ILIKE", "%engineer%")
            .logical_operator(LogicalOperator::Or);
        assert_eq!(builder.build(), builder.build());
    }

    #[test]
    fn reset_clears_filters_and_operator() {
        let mut builder = SearchCriteriaBuilder::new()
            .add_filter("id", ">", 5_i64)
            .logical_operator(LogicalOperator::Or);
        builder.reset();
        let criteria = builder.build();
        assert!(criteria.filters.is_empty());
        assert_eq!(criteria.logical_operator, LogicalOperator::And);
    }
}
