//! Raw SQL fragments that can't be expressed in Diesel's type-safe DSL.
//!
//! # Safety
//!
//! User input is ALWAYS passed via `.bind()` parameters. The only strings
//! spliced into SQL text are the constants defined here.

/// Text-search document for a dish: name, ingredients, region and state.
///
/// Computed inline instead of as a generated column because
/// `array_to_string` is not immutable.
pub const SEARCH_DOCUMENT: &str = "to_tsvector('english', \
    dishes.name || ' ' || \
    array_to_string(dishes.ingredients, ' ') || ' ' || \
    coalesce(dishes.region, '') || ' ' || \
    coalesce(dishes.state, ''))";

/// Filter expression: the dish's search document matches `$query`.
///
/// # Safety
/// The query is passed via `.bind()`, not interpolated.
macro_rules! text_search_matches {
    ($query:expr) => {
        diesel::dsl::sql::<diesel::sql_types::Bool>(&format!(
            "({} @@ plainto_tsquery('english', ",
            $crate::raw_sql::SEARCH_DOCUMENT
        ))
        .bind::<diesel::sql_types::Text, _>($query)
        .sql("))")
    };
}
pub(crate) use text_search_matches;

/// Order expression: `ts_rank` of the document against `$query`, best first.
///
/// # Safety
/// The query is passed via `.bind()`, not interpolated.
macro_rules! text_search_rank_desc {
    ($query:expr) => {
        diesel::dsl::sql::<diesel::sql_types::Float>(&format!(
            "ts_rank({}, plainto_tsquery('english', ",
            $crate::raw_sql::SEARCH_DOCUMENT
        ))
        .bind::<diesel::sql_types::Text, _>($query)
        .sql(")) DESC")
    };
}
pub(crate) use text_search_rank_desc;

/// Filter expression: some ingredient of the dish matches the ILIKE
/// `$pattern`. Build the pattern with [`contains_pattern`].
///
/// # Why raw SQL?
/// Diesel has no DSL for `unnest()` inside `EXISTS`.
macro_rules! ingredient_ilike {
    ($pattern:expr) => {
        diesel::dsl::sql::<diesel::sql_types::Bool>(
            "EXISTS (SELECT 1 FROM unnest(dishes.ingredients) AS ingredient \
             WHERE ingredient ILIKE ",
        )
        .bind::<diesel::sql_types::Text, _>($pattern)
        .sql(")")
    };
}
pub(crate) use ingredient_ilike;

/// Every ingredient across the catalog, as stored.
///
/// # Safety
/// Static SQL string with no user input.
pub const DISTINCT_INGREDIENTS_QUERY: &str =
    "SELECT DISTINCT unnest(ingredients) AS ingredient FROM dishes";

/// Wrap `needle` for a substring ILIKE, escaping LIKE metacharacters so they
/// match literally.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("dal"), "%dal%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_search_document_covers_all_text_columns() {
        for column in ["name", "ingredients", "region", "state"] {
            assert!(SEARCH_DOCUMENT.contains(&format!("dishes.{column}")));
        }
    }
}
