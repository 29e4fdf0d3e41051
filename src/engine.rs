//! The public entry point: an in-process stand-in for a database
//! connection pool's `query(text, params)` call.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use crate::core::{EngineError, Row, TableStore, Value};
use crate::executor::{self, QueryResult};
use crate::parser::{self, ParamBinder, Statement};

/// An in-memory SQL-subset engine.
///
/// One mutex guards the whole store and is held for the full execution of a
/// statement, so a caller never observes a table mid-mutation. Statement
/// parsing is pure and happens outside the lock. Executors never re-enter
/// the store, so the single lock cannot deadlock.
pub struct Engine {
    store: Mutex<TableStore>,
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Mutex::new(TableStore::new()),
        }
    }

    /// Executes one statement. Never fails: unrecognized or malformed text
    /// degrades to an empty result, out-of-range parameters bind as NULL,
    /// unknown predicate shapes pass. The engine exists to unblock local
    /// development, so it prefers a permissive answer over an error.
    pub fn query(&self, text: &str, params: &[Value]) -> QueryResult {
        let statement = parser::parse_statement(text).unwrap_or(Statement::Ignored);
        let binder = ParamBinder::new(params);
        // A panicking caller cannot poison the store for everyone else;
        // statements apply their mutations in one step per row.
        let mut store = self
            .store
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        executor::execute(&mut store, &statement, &binder)
    }

    /// Populates tables from a JSON object of the shape
    /// `{ "table": [ {row}, ... ] }`. Row keys are taken verbatim, so seeds
    /// are authored in camelCase like the stored rows they become. Numeric
    /// ids advance the per-table counter so later inserts never collide.
    /// Returns the number of rows loaded.
    pub fn load_seed(&self, seed: &serde_json::Value) -> Result<usize, EngineError> {
        let Some(tables) = seed.as_object() else {
            return Err(EngineError::InvalidSeed("<root>".to_string()));
        };

        let mut store = self
            .store
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut loaded = 0;
        for (table_name, rows) in tables {
            let Some(rows) = rows.as_array() else {
                return Err(EngineError::InvalidSeed(table_name.clone()));
            };
            let table = store.get_or_create(table_name);
            for row_json in rows {
                let Some(fields) = row_json.as_object() else {
                    return Err(EngineError::InvalidSeed(table_name.clone()));
                };
                let mut row = Row::new();
                for (field, value) in fields {
                    row.set(field.clone(), Value::from_json(value.clone()));
                }
                if let Some(id) = row.get("id") {
                    table.observe_id(id);
                }
                table.push(row);
                loaded += 1;
            }
        }
        Ok(loaded)
    }

    /// Reads and loads a JSON seed file.
    pub fn load_seed_file(&self, path: &Path) -> Result<usize, EngineError> {
        let text = std::fs::read_to_string(path)?;
        let seed: serde_json::Value = serde_json::from_str(&text)?;
        self.load_seed(&seed)
    }

    /// Names of every table created so far, sorted for stable output.
    #[must_use]
    pub fn table_names(&self) -> Vec<String> {
        let store = self
            .store
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = store.table_names().map(str::to_string).collect();
        names.sort();
        names
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
