use serde::Deserialize;

/// SQL query builder for constructing parameterized catalog queries
/// Builds a single SQL query with filters, sorting, and pagination
pub struct SQLQueryBuilder {
    base_query: String,
    where_clauses: Vec<String>,
    params: Vec<String>,
    order_clause: Option<String>,
    limit: u32,
    offset: u32,
}

impl SQLQueryBuilder {
    /// Creates a new SQLQueryBuilder with default values
    pub fn new() -> Self {
        Self {
            base_query: "SELECT id, name, category, unit_rate, labor_rate, created_at, \
                         updated_at FROM catalog_items"
                .to_string(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            order_clause: None,
            limit: 10,
            offset: 0,
        }
    }

    /// Adds a search filter for partial name matching (case-insensitive)
    pub fn add_search_filter(&mut self, search: &str) {
        let param_index = self.params.len() + 1;
        self.where_clauses.push(format!("name ILIKE ${}", param_index));
        self.params.push(format!("%{}%", search));
    }

    /// Adds a category filter (exact match)
    pub fn add_category_filter(&mut self, category: &str) {
        let param_index = self.params.len() + 1;
        self.where_clauses.push(format!("category = ${}", param_index));
        self.params.push(category.to_string());
    }

    /// Adds unit-rate range filters (min and/or max, inclusive)
    ///
    /// Parameters travel as text and are cast in SQL so the whole builder
    /// can keep a single string parameter list.
    pub fn add_rate_range(&mut self, min: Option<f64>, max: Option<f64>) {
        if let Some(min_rate) = min {
            let param_index = self.params.len() + 1;
            self.where_clauses
                .push(format!("unit_rate >= ${}::numeric", param_index));
            self.params.push(min_rate.to_string());
        }

        if let Some(max_rate) = max {
            let param_index = self.params.len() + 1;
            self.where_clauses
                .push(format!("unit_rate <= ${}::numeric", param_index));
            self.params.push(max_rate.to_string());
        }
    }

    /// Sets the sort order for the query
    pub fn set_sort(&mut self, field: SortField, order: SortOrder) {
        let field_name = match field {
            SortField::UnitRate => "unit_rate",
            SortField::Name => "name",
        };

        let order_str = match order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };

        self.order_clause = Some(format!("{} {}", field_name, order_str));
    }

    /// Sets pagination parameters
    pub fn set_pagination(&mut self, page: u32, limit: u32) {
        self.limit = limit;
        self.offset = (page - 1) * limit;
    }

    /// Builds the final SQL query string with all parameters
    /// Returns a tuple of (query_string, parameters)
    pub fn build(&self) -> (String, Vec<String>) {
        let mut query = self.base_query.clone();

        if !self.where_clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&self.where_clauses.join(" AND "));
        }

        if let Some(ref order) = self.order_clause {
            query.push_str(" ORDER BY ");
            query.push_str(order);
        }

        // LIMIT and OFFSET go into the query string directly; PostgreSQL
        // requires integers here, not text parameters
        query.push_str(&format!(" LIMIT {}", self.limit));
        query.push_str(&format!(" OFFSET {}", self.offset));

        (query, self.params.clone())
    }
}

impl Default for SQLQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Query parameters extracted from HTTP request
/// All fields are optional to support flexible querying
#[derive(Debug, Deserialize)]
pub struct QueryParams {
    /// Search term for partial name matching (case-insensitive)
    pub search: Option<String>,
    /// Filter by item category (exact match)
    pub category: Option<String>,
    /// Minimum unit rate (inclusive)
    pub min_rate: Option<f64>,
    /// Maximum unit rate (inclusive)
    pub max_rate: Option<f64>,
    /// Sort field: "unit_rate" or "name"
    pub sort: Option<String>,
    /// Sort order: "asc" or "desc"
    pub order: Option<String>,
    /// Page number (1-indexed, defaults to 1)
    pub page: Option<u32>,
    /// Items per page (defaults to 10)
    pub limit: Option<u32>,
}

/// Sort field options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    UnitRate,
    Name,
}

/// Sort order options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Validated and normalized query parameters
#[derive(Debug)]
pub struct ValidatedQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_rate: Option<f64>,
    pub max_rate: Option<f64>,
    pub sort_field: Option<SortField>,
    pub sort_order: SortOrder,
    pub page: u32,
    pub limit: u32,
}

/// Validation error type
#[derive(Debug)]
pub struct ValidationError {
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Query parameter validator
pub struct QueryValidator;

impl QueryValidator {
    /// Validates and normalizes query parameters
    pub fn validate(params: QueryParams) -> Result<ValidatedQuery, ValidationError> {
        let search = Self::normalize_string(params.search);
        let category = Self::normalize_string(params.category);

        if let Some(ref category) = category {
            category
                .parse::<crate::models::ItemCategory>()
                .map_err(|message| ValidationError { message })?;
        }

        let min_rate = if let Some(rate) = params.min_rate {
            Self::validate_rate(rate, "min_rate")?;
            Some(rate)
        } else {
            None
        };

        let max_rate = if let Some(rate) = params.max_rate {
            Self::validate_rate(rate, "max_rate")?;
            Some(rate)
        } else {
            None
        };

        if let (Some(min), Some(max)) = (min_rate, max_rate) {
            if min > max {
                return Err(ValidationError {
                    message: "min_rate cannot be greater than max_rate".to_string(),
                });
            }
        }

        let sort_field = if let Some(sort_str) = params.sort {
            Some(Self::parse_sort_field(&sort_str)?)
        } else {
            None
        };

        let sort_order = if let Some(order_str) = params.order {
            Self::parse_sort_order(&order_str)?
        } else {
            SortOrder::Asc
        };

        let page = if let Some(p) = params.page {
            Self::validate_pagination_param(p, "page")?;
            p
        } else {
            1
        };

        let limit = if let Some(l) = params.limit {
            Self::validate_pagination_param(l, "limit")?;
            l
        } else {
            10
        };

        Ok(ValidatedQuery {
            search,
            category,
            min_rate,
            max_rate,
            sort_field,
            sort_order,
            page,
            limit,
        })
    }

    /// Normalizes string parameters by trimming whitespace
    fn normalize_string(s: Option<String>) -> Option<String> {
        s.and_then(|s| {
            let trimmed = s.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        })
    }

    /// Validates that a rate bound is a positive, finite number
    fn validate_rate(rate: f64, param_name: &str) -> Result<(), ValidationError> {
        if rate <= 0.0 {
            return Err(ValidationError {
                message: format!("{} must be a positive number", param_name),
            });
        }
        if rate.is_nan() || rate.is_infinite() {
            return Err(ValidationError {
                message: format!("{} must be a valid number", param_name),
            });
        }
        Ok(())
    }

    fn parse_sort_field(s: &str) -> Result<SortField, ValidationError> {
        match s.to_lowercase().as_str() {
            "unit_rate" => Ok(SortField::UnitRate),
            "name" => Ok(SortField::Name),
            _ => Err(ValidationError {
                message: format!("Invalid sort field '{}'. Must be 'unit_rate' or 'name'", s),
            }),
        }
    }

    fn parse_sort_order(s: &str) -> Result<SortOrder, ValidationError> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(ValidationError {
                message: format!("Invalid sort order '{}'. Must be 'asc' or 'desc'", s),
            }),
        }
    }

    fn validate_pagination_param(value: u32, param_name: &str) -> Result<(), ValidationError> {
        if value == 0 {
            return Err(ValidationError {
                message: format!("{} must be a positive number (greater than 0)", param_name),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_params() -> QueryParams {
        QueryParams {
            search: None,
            category: None,
            min_rate: None,
            max_rate: None,
            sort: None,
            order: None,
            page: None,
            limit: None,
        }
    }

    #[test]
    fn test_sql_builder_basic_query() {
        let builder = SQLQueryBuilder::new();
        let (query, params) = builder.build();

        assert!(query.contains("FROM catalog_items"));
        assert!(query.contains("LIMIT"));
        assert!(query.contains("OFFSET"));
        assert_eq!(params.len(), 0);
    }

    #[test]
    fn test_sql_builder_with_search() {
        let mut builder = SQLQueryBuilder::new();
        builder.add_search_filter("elevator");
        let (query, params) = builder.build();

        assert!(query.contains("WHERE"));
        assert!(query.contains("name ILIKE $1"));
        assert_eq!(params[0], "%elevator%");
    }

    #[test]
    fn test_sql_builder_with_category_filter() {
        let mut builder = SQLQueryBuilder::new();
        builder.add_category_filter("pump");
        let (query, params) = builder.build();

        assert!(query.contains("category = $1"));
        assert_eq!(params[0], "pump");
    }

    #[test]
    fn test_sql_builder_with_rate_range() {
        let mut builder = SQLQueryBuilder::new();
        builder.add_rate_range(Some(100.0), Some(500.0));
        let (query, params) = builder.build();

        assert!(query.contains("unit_rate >= $1::numeric"));
        assert!(query.contains("unit_rate <= $2::numeric"));
        assert_eq!(params[0], "100");
        assert_eq!(params[1], "500");
    }

    #[test]
    fn test_sql_builder_with_sorting() {
        let mut builder = SQLQueryBuilder::new();
        builder.set_sort(SortField::UnitRate, SortOrder::Desc);
        let (query, _) = builder.build();

        assert!(query.contains("ORDER BY unit_rate DESC"));
    }

    #[test]
    fn test_sql_builder_with_pagination() {
        let mut builder = SQLQueryBuilder::new();
        builder.set_pagination(3, 20);
        let (query, _params) = builder.build();

        assert!(query.contains("LIMIT 20"));
        assert!(query.contains("OFFSET 40"));
    }

    #[test]
    fn test_sql_builder_combined_filters() {
        let mut builder = SQLQueryBuilder::new();
        builder.add_search_filter("pump");
        builder.add_category_filter("pump");
        builder.add_rate_range(Some(50.0), None);
        builder.set_sort(SortField::Name, SortOrder::Asc);

        let (query, params) = builder.build();

        assert!(query.contains("name ILIKE $1"));
        assert!(query.contains("AND"));
        assert!(query.contains("category = $2"));
        assert!(query.contains("unit_rate >= $3::numeric"));
        assert!(query.contains("ORDER BY name ASC"));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_normalize_string() {
        assert_eq!(
            QueryValidator::normalize_string(Some("  pump  ".to_string())),
            Some("pump".to_string())
        );
        assert_eq!(QueryValidator::normalize_string(Some("   ".to_string())), None);
        assert_eq!(QueryValidator::normalize_string(None), None);
    }

    #[test]
    fn test_validate_rate_bounds() {
        assert!(QueryValidator::validate_rate(10.0, "min_rate").is_ok());
        assert!(QueryValidator::validate_rate(0.0, "min_rate").is_err());
        assert!(QueryValidator::validate_rate(-5.0, "min_rate").is_err());
        assert!(QueryValidator::validate_rate(f64::NAN, "min_rate").is_err());
    }

    #[test]
    fn test_parse_sort_field() {
        assert_eq!(
            QueryValidator::parse_sort_field("unit_rate").unwrap(),
            SortField::UnitRate
        );
        assert_eq!(QueryValidator::parse_sort_field("NAME").unwrap(), SortField::Name);
        assert!(QueryValidator::parse_sort_field("rating").is_err());
    }

    #[test]
    fn test_validate_with_defaults() {
        let validated = QueryValidator::validate(empty_params()).unwrap();
        assert_eq!(validated.page, 1);
        assert_eq!(validated.limit, 10);
        assert_eq!(validated.sort_order, SortOrder::Asc);
    }

    #[test]
    fn test_validate_rejects_unknown_category() {
        let mut params = empty_params();
        params.category = Some("spaceship".to_string());
        assert!(QueryValidator::validate(params).is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_rate_range() {
        let mut params = empty_params();
        params.min_rate = Some(500.0);
        params.max_rate = Some(100.0);
        assert!(QueryValidator::validate(params).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_page() {
        let mut params = empty_params();
        params.page = Some(0);
        assert!(QueryValidator::validate(params).is_err());
    }
}
