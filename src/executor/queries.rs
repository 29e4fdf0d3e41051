//! SELECT execution: filter, aggregate short-circuit, projection,
//! pagination.

use super::QueryResult;
use super::conditions::ConditionEvaluator;
use crate::core::{Row, TableStore, Value};
use crate::parser::{Condition, ParamBinder, SelectColumn};

pub struct QueryExecutor;

impl QueryExecutor {
    /// Runs one SELECT over a snapshot of the table. Never mutates state;
    /// an unknown table yields zero rows.
    pub fn select(
        store: &TableStore,
        table_name: &str,
        columns: &[SelectColumn],
        conditions: &[Condition],
        limit: Option<usize>,
        offset: Option<usize>,
        binder: &ParamBinder,
    ) -> QueryResult {
        let snapshot: Vec<Row> = store
            .get(table_name)
            .map(|table| table.rows.clone())
            .unwrap_or_default();

        let matched: Vec<Row> = snapshot
            .into_iter()
            .filter(|row| ConditionEvaluator::matches_all(row, conditions, binder))
            .collect();

        // A COUNT projection collapses the whole query into one synthesized
        // row; aggregate and regular projection never mix.
        if let Some(alias) = columns.iter().find_map(|column| match column {
            SelectColumn::Count { alias } => Some(alias.clone()),
            _ => None,
        }) {
            let mut row = Row::new();
            row.set(alias, Value::Int(matched.len() as i64));
            return QueryResult {
                rows: vec![row],
                row_count: 1,
            };
        }

        let projected: Vec<Row> = matched
            .into_iter()
            .map(|row| Self::project(&row, columns))
            .collect();

        let paged = Self::paginate(projected, limit, offset, binder);
        QueryResult {
            row_count: paged.len(),
            rows: paged,
        }
    }

    fn project(row: &Row, columns: &[SelectColumn]) -> Row {
        if columns
            .iter()
            .any(|column| matches!(column, SelectColumn::All))
        {
            return row.clone();
        }

        let mut projected = Row::new();
        for column in columns {
            match column {
                SelectColumn::Field { field, alias } => {
                    let key = alias.clone().unwrap_or_else(|| field.clone());
                    let value = row.get(field).cloned().unwrap_or(Value::Null);
                    projected.set(key, value);
                }
                // Count is handled before projection; Computed columns
                // produce no output field
                SelectColumn::All | SelectColumn::Count { .. } | SelectColumn::Computed => {}
            }
        }
        projected
    }

    /// Offset before limit, both bound through the statement's parameters.
    /// An unusable offset means 0; an unusable limit means no truncation.
    fn paginate(
        rows: Vec<Row>,
        limit: Option<usize>,
        offset: Option<usize>,
        binder: &ParamBinder,
    ) -> Vec<Row> {
        let start = offset
            .and_then(|param| binder.integer(param))
            .map_or(0, |n| usize::try_from(n).unwrap_or(0))
            .min(rows.len());

        let take = limit
            .and_then(|param| binder.integer(param))
            .map_or(rows.len(), |n| usize::try_from(n).unwrap_or(0));

        rows.into_iter().skip(start).take(take).collect()
    }
}
