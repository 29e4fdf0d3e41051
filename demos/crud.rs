// Walks the engine through the statement shapes the domain services issue.
use stubgres::{Engine, Value};

fn main() {
    let engine = Engine::new();

    engine.query(
        "CREATE TABLE IF NOT EXISTS animals (id SERIAL PRIMARY KEY, name TEXT, status TEXT)",
        &[],
    );

    for (name, status) in [("Buddy", "active"), ("Max", "sold"), ("Bella", "active")] {
        let result = engine.query(
            "INSERT INTO animals (name, status) VALUES ($1, $2) RETURNING id, name",
            &[Value::from(name), Value::from(status)],
        );
        println!("inserted: {}", serde_json::to_string(&result.rows[0]).unwrap());
    }

    let active = engine.query(
        "SELECT id, name FROM animals WHERE status IN ('active') ORDER BY name LIMIT $1 OFFSET $2",
        &[Value::Int(10), Value::Int(0)],
    );
    println!("active animals: {}", serde_json::to_string(&active.rows).unwrap());

    let updated = engine.query(
        "UPDATE animals SET status = $2 WHERE id = $1",
        &[Value::Int(1), Value::from("quarantine")],
    );
    println!("updated {} row(s)", updated.row_count);

    let deleted = engine.query("DELETE FROM animals WHERE id = $1", &[Value::Int(2)]);
    println!("deleted {} row(s)", deleted.row_count);

    let count = engine.query("SELECT COUNT(*) AS remaining FROM animals", &[]);
    println!("remaining: {}", serde_json::to_string(&count.rows[0]).unwrap());
}
