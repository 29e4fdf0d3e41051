use std::path::{Path, PathBuf};

use clap::Parser;
use comfy_table::{Cell, Table as ComfyTable, presets::UTF8_FULL};
use config::{Config, Environment, File};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use serde::Deserialize;

use stubgres::{Engine, QueryResult, Value};

/// stubgres interactive shell
#[derive(Parser, Debug)]
#[command(name = "stubgres")]
#[command(about = "In-memory SQL-subset engine shell", long_about = None)]
struct Args {
    /// JSON seed file loaded into the engine at startup
    #[arg(short, long)]
    seed: Option<PathBuf>,

    /// History file location
    #[arg(long)]
    history: Option<PathBuf>,
}

/// Shell configuration
#[derive(Debug, Default, Deserialize)]
struct ShellConfig {
    seed: Option<PathBuf>,
    history: Option<PathBuf>,
}

impl ShellConfig {
    /// Load configuration with priority: CLI args > ENV > config file > defaults
    fn load(args: &Args) -> Self {
        let config_paths = ["/etc/stubgres/stubgres.toml", "./stubgres.toml"];

        let mut builder = Config::builder();
        for path in &config_paths {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
                eprintln!("Loaded config from: {path}");
                break;
            }
        }

        builder = builder.add_source(Environment::with_prefix("STUBGRES"));

        let base = builder
            .build()
            .ok()
            .and_then(|c| c.try_deserialize::<Self>().ok())
            .unwrap_or_default();

        Self {
            seed: args.seed.clone().or(base.seed),
            history: args.history.clone().or(base.history),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let cfg = ShellConfig::load(&args);

    println!("stubgres — in-memory SQL-subset engine");
    println!("Statements run against process-local tables; nothing persists.");
    println!("Append parameters as a JSON array after '|':");
    println!("  SELECT * FROM animals WHERE id = $1 | [1]");
    println!("Meta-commands: \\tables, \\seed <path>, \\q\n");

    let engine = Engine::new();

    if let Some(path) = &cfg.seed {
        match engine.load_seed_file(path) {
            Ok(count) => println!("Seeded {count} row(s) from {}", path.display()),
            Err(e) => eprintln!("Seed load failed: {e}"),
        }
    }

    let mut rl = DefaultEditor::new()?;
    let history_file = cfg.history.clone().or_else(|| {
        dirs::home_dir().map(|mut p| {
            p.push(".stubgres_history");
            p
        })
    });
    if let Some(path) = &history_file {
        let _ = rl.load_history(path); // Ignore error if file doesn't exist
    }

    loop {
        match rl.readline("stubgres> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                if let Some(meta) = line.strip_prefix('\\') {
                    match meta.split_whitespace().next() {
                        Some("q" | "quit") => break,
                        Some("tables") => {
                            let names = engine.table_names();
                            if names.is_empty() {
                                println!("(no tables)");
                            } else {
                                for name in names {
                                    println!("{name}");
                                }
                            }
                        }
                        Some("seed") => {
                            let path = meta.split_whitespace().nth(1);
                            match path {
                                Some(path) => match engine.load_seed_file(Path::new(path)) {
                                    Ok(count) => println!("Seeded {count} row(s)"),
                                    Err(e) => eprintln!("Seed load failed: {e}"),
                                },
                                None => eprintln!("Usage: \\seed <path>"),
                            }
                        }
                        _ => eprintln!("Unknown meta-command: {line}"),
                    }
                    continue;
                }

                let (statement, params) = match split_params(line) {
                    Ok(parts) => parts,
                    Err(e) => {
                        eprintln!("Bad parameter list: {e}");
                        continue;
                    }
                };

                let result = engine.query(statement, &params);
                render(&result);
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Read error: {e}");
                break;
            }
        }
    }

    if let Some(path) = &history_file {
        let _ = rl.save_history(path);
    }
    println!("Bye.");
    Ok(())
}

/// Splits `statement | [params]` into the statement text and bound values.
fn split_params(line: &str) -> Result<(&str, Vec<Value>), serde_json::Error> {
    match line.rsplit_once('|') {
        Some((statement, json)) if json.trim_start().starts_with('[') => {
            let raw: Vec<serde_json::Value> = serde_json::from_str(json.trim())?;
            Ok((
                statement.trim(),
                raw.into_iter().map(Value::from_json).collect(),
            ))
        }
        _ => Ok((line, Vec::new())),
    }
}

fn render(result: &QueryResult) {
    if result.rows.is_empty() {
        println!("({} row(s))", result.row_count);
        return;
    }

    // Header: union of field names across all rows, in first-seen order
    let mut columns: Vec<String> = Vec::new();
    for row in &result.rows {
        for (name, _) in row.fields() {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.to_string());
            }
        }
    }

    let mut table = ComfyTable::new();
    table.load_preset(UTF8_FULL);
    table.set_header(columns.iter().map(Cell::new));
    for row in &result.rows {
        table.add_row(columns.iter().map(|column| {
            Cell::new(row.get(column).map_or_else(String::new, ToString::to_string))
        }));
    }
    println!("{table}");
    println!("({} row(s))", result.row_count);
}
