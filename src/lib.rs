// stubgres - in-memory SQL-subset engine
// Stands in for a PostgreSQL connection during development and testing

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::must_use_candidate)]

// Value/Row/Table data model and the table store
pub mod core;

// Statement classification and parsing (name translation, parameter
// binding, per-kind statement grammars)
pub mod parser;

// Statement execution (per-kind executors, WHERE evaluation)
pub mod executor;

// Public engine: the query(text, params) entry point
mod engine;

// Re-export commonly used types for convenience
pub use self::core::{EngineError, Row, Table, TableStore, Value};
pub use engine::Engine;
pub use executor::QueryResult;
pub use parser::{ParamBinder, Statement, parse_statement, to_sql_column, to_storage_key};
