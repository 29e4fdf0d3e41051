//! INSERT, UPDATE and DELETE statement parsing.

use nom::Parser;
use nom::character::complete::char;
use nom::combinator::all_consuming;
use nom::multi::separated_list1;
use nom::sequence::{delimited, tuple};

use super::common::{
    clause_after, column_ref, find_keyword, identifier, placeholder, split_commas, ws,
};
use super::naming::to_storage_key;
use super::statement::{Anchor, Assignment, Statement};
use crate::core::EngineError;

pub fn insert(text: &str) -> Result<Statement, EngineError> {
    let (_, after) = find_keyword(text, "INSERT INTO")
        .ok_or_else(|| EngineError::ParseError("expected INSERT INTO".to_string()))?;

    let (rest, table) = ws(identifier)(&text[after..])
        .map_err(|e| EngineError::ParseError(format!("{e:?}")))?;

    // Explicit column list immediately after the table name. VALUES content
    // is never inspected: parameters bind to columns in list order.
    let (_, columns) = delimited(
        ws(char('(')),
        separated_list1(ws(char(',')), column_ref),
        ws(char(')')),
    )
    .parse(rest)
    .map_err(|e| EngineError::ParseError(format!("{e:?}")))?;

    let returning = clause_after(text, "RETURNING", &[])
        .map(parse_column_list)
        .filter(|cols| !cols.is_empty())
        .unwrap_or_else(|| columns.clone());

    Ok(Statement::Insert {
        table,
        columns,
        returning,
    })
}

pub fn update(text: &str) -> Result<Statement, EngineError> {
    let (_, after) = find_keyword(text, "UPDATE")
        .ok_or_else(|| EngineError::ParseError("expected UPDATE".to_string()))?;

    let (_, table) = ws(identifier)(&text[after..])
        .map_err(|e| EngineError::ParseError(format!("{e:?}")))?;

    let set_text = clause_after(text, "SET", &["WHERE"])
        .ok_or_else(|| EngineError::ParseError("UPDATE without SET".to_string()))?;

    // `col = $N` per assignment; anything else in the list is dropped.
    let assignments: Vec<Assignment> = split_commas(set_text)
        .into_iter()
        .filter_map(|fragment| {
            all_consuming(tuple((ws(column_ref), ws(char('=')), ws(placeholder))))
                .parse(fragment)
                .ok()
                .map(|(_, (column, _, param))| Assignment {
                    field: to_storage_key(&column),
                    param,
                })
        })
        .collect();

    let anchor = clause_after(text, "WHERE", &[]).and_then(parse_anchor);

    Ok(Statement::Update {
        table,
        anchor,
        assignments,
    })
}

pub fn delete(text: &str) -> Result<Statement, EngineError> {
    let (_, after) = find_keyword(text, "DELETE FROM")
        .ok_or_else(|| EngineError::ParseError("expected DELETE FROM".to_string()))?;

    let (_, table) = ws(identifier)(&text[after..])
        .map_err(|e| EngineError::ParseError(format!("{e:?}")))?;

    // Delete anchors on `id = $N` only; no anchor means no rows are touched.
    let id_param = clause_after(text, "WHERE", &[])
        .and_then(parse_anchor)
        .filter(|anchor| anchor.field == "id")
        .map(|anchor| anchor.param);

    Ok(Statement::Delete { table, id_param })
}

/// The UPDATE/DELETE row selector: exactly `id = $N` or `user_id = $N`.
/// Compound or differently-shaped WHERE clauses yield no anchor.
fn parse_anchor(where_text: &str) -> Option<Anchor> {
    let (_, (column, _, param)) =
        all_consuming(tuple((ws(identifier), ws(char('=')), ws(placeholder))))
            .parse(where_text)
            .ok()?;
    if column == "id" || column == "user_id" {
        Some(Anchor {
            field: to_storage_key(&column),
            param,
        })
    } else {
        None
    }
}

fn parse_column_list(text: &str) -> Vec<String> {
    split_commas(text)
        .into_iter()
        .filter_map(|part| {
            ws(column_ref)(part)
                .ok()
                .map(|(_, column)| column)
        })
        .collect()
}
