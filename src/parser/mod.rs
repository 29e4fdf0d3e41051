//! Statement classification and parsing.

mod common;
mod dml;
mod naming;
mod params;
mod queries;
mod statement;

pub use naming::{to_sql_column, to_storage_key};
pub use params::ParamBinder;
pub use statement::{Anchor, Assignment, CompareOp, Condition, SelectColumn, Statement};

use crate::core::EngineError;
use common::contains_keyword;

/// Classifies one statement and parses it into a typed [`Statement`].
///
/// Case-insensitive keyword scan in fixed priority; the first matching
/// keyword, found anywhere in the text, governs dispatch. CREATE TABLE is
/// accepted and ignored so schema-bootstrap scripts can run against the
/// engine unchanged, and text matching no keyword at all parses to
/// [`Statement::Ignored`] — the engine boundary turns both (and any parse
/// failure) into an empty result rather than an error.
pub fn parse_statement(text: &str) -> Result<Statement, EngineError> {
    let text = text.trim().trim_end_matches(';');

    if contains_keyword(text, "INSERT INTO") {
        dml::insert(text)
    } else if contains_keyword(text, "SELECT") {
        queries::select(text)
    } else if contains_keyword(text, "UPDATE") {
        dml::update(text)
    } else if contains_keyword(text, "DELETE") {
        dml::delete(text)
    } else {
        // Covers CREATE TABLE and anything unrecognized
        Ok(Statement::Ignored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_insert() {
        let stmt = parse_statement("INSERT INTO users (id) VALUES ($1)").unwrap();
        assert!(matches!(stmt, Statement::Insert { .. }));
    }

    #[test]
    fn test_classify_select_case_insensitive() {
        let stmt = parse_statement("select * from users").unwrap();
        assert!(matches!(stmt, Statement::Select { .. }));
    }

    #[test]
    fn test_classify_update_and_delete() {
        assert!(matches!(
            parse_statement("UPDATE users SET name = $1 WHERE id = $2").unwrap(),
            Statement::Update { .. }
        ));
        assert!(matches!(
            parse_statement("DELETE FROM users WHERE id = $1").unwrap(),
            Statement::Delete { .. }
        ));
    }

    #[test]
    fn test_insert_returning_does_not_classify_as_select() {
        // INSERT wins over any later keyword in the same text
        let stmt = parse_statement(
            "INSERT INTO users (email) VALUES ($1) RETURNING email AS selected_email",
        )
        .unwrap();
        assert!(matches!(stmt, Statement::Insert { .. }));
    }

    #[test]
    fn test_trailing_semicolon_is_trimmed() {
        let stmt = parse_statement("DELETE FROM users WHERE id = $1;").unwrap();
        assert!(matches!(
            stmt,
            Statement::Delete {
                id_param: Some(1),
                ..
            }
        ));
    }

    #[test]
    fn test_create_table_is_ignored() {
        let stmt = parse_statement("CREATE TABLE users (id TEXT PRIMARY KEY)").unwrap();
        assert!(matches!(stmt, Statement::Ignored));
    }

    #[test]
    fn test_unrecognized_is_ignored() {
        let stmt = parse_statement("VACUUM ANALYZE").unwrap();
        assert!(matches!(stmt, Statement::Ignored));
    }
}
