//! Statement execution. One executor per statement kind; the dispatcher
//! routes a parsed [`Statement`] to it with the call's parameter binder.

pub mod conditions;
pub mod dml;
pub mod queries;

use serde::Serialize;

use crate::core::{Row, TableStore};
use crate::parser::{ParamBinder, Statement};

pub use conditions::ConditionEvaluator;
pub use dml::DmlExecutor;
pub use queries::QueryExecutor;

/// What every statement returns: the projected rows and how many rows the
/// statement touched or produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    pub rows: Vec<Row>,
    #[serde(rename = "rowCount")]
    pub row_count: usize,
}

impl QueryResult {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            rows: Vec::new(),
            row_count: 0,
        }
    }
}

pub fn execute(store: &mut TableStore, statement: &Statement, binder: &ParamBinder) -> QueryResult {
    match statement {
        Statement::Insert {
            table,
            columns,
            returning,
        } => DmlExecutor::insert(store, table, columns, returning, binder),
        Statement::Select {
            table,
            columns,
            conditions,
            limit,
            offset,
        } => QueryExecutor::select(store, table, columns, conditions, *limit, *offset, binder),
        Statement::Update {
            table,
            anchor,
            assignments,
        } => DmlExecutor::update(store, table, anchor.as_ref(), assignments, binder),
        Statement::Delete { table, id_param } => {
            DmlExecutor::delete(store, table, *id_param, binder)
        }
        Statement::Ignored => QueryResult::empty(),
    }
}
