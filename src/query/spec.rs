// ABOUTME: Normalized query construction from helper parameters
// ABOUTME: Parses membership filters, validates sort columns, and defaults pagination

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_LIMIT: u64 = 10;
pub const DEFAULT_OFFSET: u64 = 0;

/// Entity kinds the external store can be queried for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Post,
    Author,
    Tag,
}

impl Entity {
    /// Columns the store may be asked to sort by; anything else falls back
    /// to the default column.
    pub fn sortable_columns(&self) -> &'static [&'static str] {
        match self {
            Entity::Post => &[
                "title",
                "slug",
                "published_at",
                "created_at",
                "updated_at",
                "featured",
            ],
            Entity::Author => &["name", "slug", "created_at", "updated_at"],
            Entity::Tag => &["name", "slug", "created_at", "updated_at"],
        }
    }

    pub fn default_sort_column(&self) -> &'static str {
        match self {
            Entity::Post => "title",
            Entity::Author | Entity::Tag => "name",
        }
    }

    /// Scope key the result collection is bound under for block rendering.
    pub fn collection_key(&self) -> &'static str {
        match self {
            Entity::Post => "posts",
            Entity::Author => "authors",
            Entity::Tag => "tags",
        }
    }

    /// Identity parameters accepted as membership filters for this entity.
    pub fn filterable_fields(&self) -> &'static [&'static str] {
        match self {
            Entity::Post => &["id", "slug"],
            Entity::Author => &["id", "slug", "email", "username"],
            Entity::Tag => &["id", "slug"],
        }
    }
}

/// A "value in set" predicate handed to the external store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Normalize a raw parameter; anything other than a descending marker
    /// defaults to ascending.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.eq_ignore_ascii_case("desc") => SortOrder::Descending,
            Some(value) if value.eq_ignore_ascii_case("descending") => SortOrder::Descending,
            _ => SortOrder::Ascending,
        }
    }
}

/// One normalized request to the external store, constructed once per data
/// helper invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub filters: Vec<Filter>,
    pub sort_by: String,
    pub sort_order: SortOrder,
    pub limit: u64,
    pub offset: u64,
    pub include: Vec<String>,
}

impl QuerySpec {
    /// Build a query from resolved helper parameters.
    ///
    /// Comma-separated identity parameters become membership filters when
    /// present. `sortBy` is validated against the entity whitelist, `sortOrder`
    /// normalizes to ascending/descending, and `limit`/`offset` default to
    /// 10/0 when absent or non-numeric.
    pub fn from_params(entity: Entity, params: &HashMap<String, Value>) -> Self {
        let mut filters = Vec::new();
        for field in entity.filterable_fields() {
            let values = csv_list(params.get(*field));
            if !values.is_empty() {
                filters.push(Filter {
                    field: (*field).to_string(),
                    values,
                });
            }
        }

        let sort_by = validated_sort(entity, param_str(params, "sortBy").as_deref());
        let sort_order = SortOrder::from_param(param_str(params, "sortOrder").as_deref());
        let limit = param_u64(params, "limit", DEFAULT_LIMIT);
        let offset = param_u64(params, "offset", DEFAULT_OFFSET);
        let include = csv_list(params.get("include"));

        Self {
            filters,
            sort_by,
            sort_order,
            limit,
            offset,
            include,
        }
    }
}

fn validated_sort(entity: Entity, raw: Option<&str>) -> String {
    match raw {
        Some(column) if entity.sortable_columns().contains(&column) => column.to_string(),
        Some(other) => {
            debug!(
                entity = ?entity,
                column = other,
                "sort column not whitelisted, falling back to default"
            );
            entity.default_sort_column().to_string()
        }
        None => entity.default_sort_column().to_string(),
    }
}

/// Parse a comma-separated parameter into a trimmed list, dropping empties.
pub fn csv_list(value: Option<&Value>) -> Vec<String> {
    let Some(raw) = value.map(value_to_string) else {
        return Vec::new();
    };
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a parameter as a string, accepting bare numbers and booleans.
pub fn param_str(params: &HashMap<String, Value>, key: &str) -> Option<String> {
    params.get(key).map(value_to_string).filter(|s| !s.is_empty())
}

/// Read a numeric parameter, falling back to `default` when absent or
/// non-numeric.
pub fn param_u64(params: &HashMap<String, Value>, key: &str, default: u64) -> u64 {
    match params.get(key) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

/// Read a numeric parameter only when present and numeric.
pub fn param_opt_u64(params: &HashMap<String, Value>, key: &str) -> Option<u64> {
    match params.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_defaults_with_no_parameters() {
        let spec = QuerySpec::from_params(Entity::Post, &HashMap::new());
        assert!(spec.filters.is_empty());
        assert_eq!(spec.sort_by, "title");
        assert_eq!(spec.sort_order, SortOrder::Ascending);
        assert_eq!(spec.limit, 10);
        assert_eq!(spec.offset, 0);
        assert!(spec.include.is_empty());
    }

    #[test]
    fn test_csv_parameters_become_membership_filters() {
        let spec = QuerySpec::from_params(
            Entity::Post,
            &params(&[("slug", json!(" first , second ,,third "))]),
        );
        assert_eq!(
            spec.filters,
            vec![Filter {
                field: "slug".to_string(),
                values: vec!["first".into(), "second".into(), "third".into()],
            }]
        );
    }

    #[test]
    fn test_author_accepts_email_and_username_filters() {
        let spec = QuerySpec::from_params(
            Entity::Author,
            &params(&[
                ("email", json!("a@example.com")),
                ("username", json!("alice,bob")),
            ]),
        );
        let fields: Vec<&str> = spec.filters.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "username"]);
    }

    #[test]
    fn test_unlisted_sort_column_falls_back() {
        let spec = QuerySpec::from_params(
            Entity::Post,
            &params(&[("sortBy", json!("nonexistent_column"))]),
        );
        assert_eq!(spec.sort_by, "title");

        let authors =
            QuerySpec::from_params(Entity::Author, &params(&[("sortBy", json!("password"))]));
        assert_eq!(authors.sort_by, "name");
    }

    #[test]
    fn test_whitelisted_sort_column_accepted() {
        let spec = QuerySpec::from_params(
            Entity::Post,
            &params(&[("sortBy", json!("published_at")), ("sortOrder", json!("DESC"))]),
        );
        assert_eq!(spec.sort_by, "published_at");
        assert_eq!(spec.sort_order, SortOrder::Descending);
    }

    #[test]
    fn test_sideways_sort_order_defaults_to_ascending() {
        let spec = QuerySpec::from_params(
            Entity::Post,
            &params(&[("sortOrder", json!("sideways"))]),
        );
        assert_eq!(spec.sort_order, SortOrder::Ascending);
    }

    #[test]
    fn test_non_numeric_pagination_defaults() {
        let spec = QuerySpec::from_params(
            Entity::Tag,
            &params(&[("limit", json!("lots")), ("offset", json!(true))]),
        );
        assert_eq!(spec.limit, 10);
        assert_eq!(spec.offset, 0);
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let spec = QuerySpec::from_params(
            Entity::Post,
            &params(&[("limit", json!("25")), ("offset", json!(5))]),
        );
        assert_eq!(spec.limit, 25);
        assert_eq!(spec.offset, 5);
    }

    #[test]
    fn test_include_parameter_parsed() {
        let spec = QuerySpec::from_params(
            Entity::Post,
            &params(&[("include", json!("author,tags"))]),
        );
        assert_eq!(spec.include, vec!["author".to_string(), "tags".to_string()]);
    }
}
