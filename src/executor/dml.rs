//! INSERT, UPDATE and DELETE execution.

use chrono::Utc;

use super::QueryResult;
use super::conditions::ConditionEvaluator;
use crate::core::{Row, TableStore, Value};
use crate::parser::{Anchor, Assignment, ParamBinder, to_storage_key};

pub struct DmlExecutor;

impl DmlExecutor {
    /// Appends exactly one row. The table is created on first reference.
    ///
    /// Columns bind to parameters in list order. A row that ends up with no
    /// id (column absent, or its parameter unbound) gets one synthesized
    /// from the table counter; explicit ids advance the counter instead so
    /// later synthesized ids stay unique.
    pub fn insert(
        store: &mut TableStore,
        table_name: &str,
        columns: &[String],
        returning: &[String],
        binder: &ParamBinder,
    ) -> QueryResult {
        let table = store.get_or_create(table_name);

        let mut row = Row::new();
        for (position, column) in columns.iter().enumerate() {
            row.set(to_storage_key(column), binder.value(position + 1));
        }

        match row.get("id").cloned() {
            None | Some(Value::Null) => {
                let id = table.synthesize_id();
                row.set("id", Value::Int(id));
            }
            Some(explicit) => table.observe_id(&explicit),
        }

        let projected = Self::project_returning(&row, returning);
        table.push(row);

        QueryResult {
            rows: vec![projected],
            row_count: 1,
        }
    }

    /// Applies the SET assignments to every row whose anchor field equals
    /// the anchor parameter, stamping `updatedAt` on each. More than one row
    /// can match: the engine does not enforce id uniqueness, callers do.
    pub fn update(
        store: &mut TableStore,
        table_name: &str,
        anchor: Option<&Anchor>,
        assignments: &[Assignment],
        binder: &ParamBinder,
    ) -> QueryResult {
        let Some(anchor) = anchor else {
            return QueryResult::empty();
        };
        let Some(table) = store.get_mut(table_name) else {
            return QueryResult::empty();
        };

        let target = binder.value(anchor.param);
        let stamp = Value::Timestamp(Utc::now().naive_utc());

        let mut mutated = Vec::new();
        for row in &mut table.rows {
            let current = row.get(&anchor.field).cloned().unwrap_or(Value::Null);
            if ConditionEvaluator::loose_eq(&current, &target) {
                for assignment in assignments {
                    row.set(assignment.field.clone(), binder.value(assignment.param));
                }
                row.set("updatedAt", stamp.clone());
                mutated.push(row.clone());
            }
        }

        QueryResult {
            row_count: mutated.len(),
            rows: mutated,
        }
    }

    /// Removes every row whose id equals the bound parameter. Returns no
    /// rows, only the removal count.
    pub fn delete(
        store: &mut TableStore,
        table_name: &str,
        id_param: Option<usize>,
        binder: &ParamBinder,
    ) -> QueryResult {
        let Some(id_param) = id_param else {
            return QueryResult::empty();
        };
        let Some(table) = store.get_mut(table_name) else {
            return QueryResult::empty();
        };

        let target = binder.value(id_param);
        let before = table.len();
        table.rows.retain(|row| {
            let id = row.get("id").cloned().unwrap_or(Value::Null);
            !ConditionEvaluator::loose_eq(&id, &target)
        });

        QueryResult {
            rows: Vec::new(),
            row_count: before - table.len(),
        }
    }

    fn project_returning(row: &Row, returning: &[String]) -> Row {
        let mut projected = Row::new();
        for column in returning {
            let field = to_storage_key(column);
            let value = row.get(&field).cloned().unwrap_or(Value::Null);
            projected.set(field, value);
        }
        projected
    }
}
