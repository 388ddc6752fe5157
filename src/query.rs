//! Search query construction
//!
//! This module classifies raw search input and builds the SQL clauses
//! executed by the stores.

use serde_json::{Value, json};

/// Classified search input.
///
/// Raw input is trimmed first. An empty result matches everything, an
/// integer result probes the identifier column only, and anything else is
/// matched case-insensitively against the entity's text columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SearchTerm {
    All,
    Id(i64),
    Text(String),
}

impl SearchTerm {
    /// Classify raw user input
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return SearchTerm::All;
        }
        match trimmed.parse::<i64>() {
            Ok(id) => SearchTerm::Id(id),
            Err(_) => SearchTerm::Text(trimmed.to_lowercase()),
        }
    }
}

/// Wrap a term in `%` wildcards, escaping the characters LIKE treats
/// specially so they match literally
pub fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Sort key restricted to an entity's sortable columns.
///
/// Implementors are small enums, so ORDER BY text never contains user
/// input. `Default` names the column used when the caller has no
/// preference.
pub trait SortKey: Copy + Default {
    fn column(&self) -> &'static str;
}

/// Build WHERE clause for a classified term.
///
/// Returns the clause and its bind parameters. `Id` probes the identifier
/// column for equality; `Text` matches each search column with a
/// case-insensitive LIKE, combined with OR.
pub fn build_where_clause(
    term: &SearchTerm,
    id_column: &str,
    search_columns: &[&str],
) -> (String, Vec<Value>) {
    match term {
        SearchTerm::All => (String::new(), Vec::new()),
        SearchTerm::Id(id) => (format!("WHERE {} = ?", id_column), vec![json!(id)]),
        SearchTerm::Text(text) => {
            if search_columns.is_empty() {
                return ("WHERE 1=0".to_string(), Vec::new());
            }

            let pattern = like_pattern(text);
            let conditions = search_columns
                .iter()
                .map(|column| format!("LOWER({}) LIKE ?", column))
                .collect::<Vec<_>>()
                .join(" OR ");
            let params = search_columns.iter().map(|_| json!(pattern)).collect();

            (format!("WHERE ({})", conditions), params)
        }
    }
}

/// Build ORDER BY clause
pub fn build_order_clause(column: &str, order: SortOrder) -> String {
    format!("ORDER BY {} {}", column, order.to_sql())
}

/// Build LIMIT/OFFSET clause
pub fn build_limit_clause(limit: u32, offset: u64) -> String {
    format!("LIMIT {} OFFSET {}", limit, offset)
}

/// Everything that distinguishes one cached query from another.
///
/// The hash of this value is the cache key suffix, so two calls with the
/// same classified term, sort, and page share a cache entry.
#[derive(Debug, Hash)]
pub struct QueryFingerprint<'a> {
    pub op: &'static str,
    pub term: &'a SearchTerm,
    pub sort: &'static str,
    pub order: &'static str,
    pub limit: u32,
    pub offset: u64,
}

impl<'a> QueryFingerprint<'a> {
    pub fn search(
        term: &'a SearchTerm,
        sort: &'static str,
        order: SortOrder,
        limit: u32,
        offset: u64,
    ) -> Self {
        Self {
            op: "search",
            term,
            sort,
            order: order.to_sql(),
            limit,
            offset,
        }
    }

    pub fn count(term: &'a SearchTerm) -> Self {
        Self {
            op: "count",
            term,
            sort: "",
            order: "",
            limit: 0,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    // ========================================
    // Term Classification
    // ========================================

    #[test]
    fn blank_input_matches_everything() {
        assert_eq!(SearchTerm::parse(""), SearchTerm::All);
        assert_eq!(SearchTerm::parse("   "), SearchTerm::All);
        assert_eq!(SearchTerm::parse("\t\n"), SearchTerm::All);
    }

    #[test]
    fn integer_input_becomes_an_id_probe() {
        assert_eq!(SearchTerm::parse("42"), SearchTerm::Id(42));
        assert_eq!(SearchTerm::parse("  42  "), SearchTerm::Id(42));
        assert_eq!(SearchTerm::parse("-7"), SearchTerm::Id(-7));
    }

    #[test]
    fn everything_else_is_lowercased_text() {
        assert_eq!(
            SearchTerm::parse("Smith"),
            SearchTerm::Text("smith".to_string())
        );
        assert_eq!(
            SearchTerm::parse("12b"),
            SearchTerm::Text("12b".to_string())
        );
        // Too large for an id, so it falls back to a text match
        assert_eq!(
            SearchTerm::parse("99999999999999999999"),
            SearchTerm::Text("99999999999999999999".to_string())
        );
    }

    // ========================================
    // LIKE Escaping
    // ========================================

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("smith"), "%smith%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    // ========================================
    // Clause Building
    // ========================================

    #[test]
    fn all_term_builds_no_where_clause() {
        let (sql, params) = build_where_clause(&SearchTerm::All, "doctor_id", &["first_name"]);
        assert_eq!(sql, "");
        assert!(params.is_empty());
    }

    #[test]
    fn id_term_probes_the_identifier_column_only() {
        let (sql, params) = build_where_clause(
            &SearchTerm::Id(42),
            "doctor_id",
            &["first_name", "last_name"],
        );
        assert_eq!(sql, "WHERE doctor_id = ?");
        assert_eq!(params, vec![serde_json::json!(42)]);
    }

    #[test]
    fn text_term_matches_every_search_column() {
        let term = SearchTerm::parse("Smith");
        let (sql, params) = build_where_clause(&term, "doctor_id", &["first_name", "last_name"]);
        assert_eq!(
            sql,
            "WHERE (LOWER(first_name) LIKE ? OR LOWER(last_name) LIKE ?)"
        );
        assert_eq!(params.len(), 2);
        assert_eq!(params[0], serde_json::json!("%smith%"));
    }

    #[test]
    fn text_term_with_no_columns_matches_nothing() {
        let term = SearchTerm::Text("smith".to_string());
        let (sql, params) = build_where_clause(&term, "doctor_id", &[]);
        assert_eq!(sql, "WHERE 1=0");
        assert!(params.is_empty());
    }

    #[test]
    fn order_and_limit_clauses() {
        assert_eq!(
            build_order_clause("last_name", SortOrder::Desc),
            "ORDER BY last_name DESC"
        );
        assert_eq!(build_limit_clause(25, 50), "LIMIT 25 OFFSET 50");
    }

    // ========================================
    // Fingerprints
    // ========================================

    #[test]
    fn identical_queries_share_a_fingerprint() {
        let term = SearchTerm::parse("smith");
        let a = QueryFingerprint::search(&term, "last_name", SortOrder::Asc, 25, 0);
        let b = QueryFingerprint::search(&term, "last_name", SortOrder::Asc, 25, 0);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn count_and_search_fingerprints_differ() {
        let term = SearchTerm::All;
        let search = QueryFingerprint::search(&term, "doctor_id", SortOrder::Asc, 25, 0);
        let count = QueryFingerprint::count(&term);
        assert_ne!(hash_of(&search), hash_of(&count));
    }

    #[test]
    fn page_changes_the_fingerprint() {
        let term = SearchTerm::All;
        let first = QueryFingerprint::search(&term, "doctor_id", SortOrder::Asc, 25, 0);
        let second = QueryFingerprint::search(&term, "doctor_id", SortOrder::Asc, 25, 25);
        assert_ne!(hash_of(&first), hash_of(&second));
    }
}
