use crate::error::Result;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Execute each `;`-separated statement in a SQL file against the loaded
/// store and print result rows. A failing statement is reported and does not
/// stop the ones after it.
pub fn run_query_file<P: AsRef<Path>, Q: AsRef<Path>>(db_path: P, queries_path: Q) -> Result<()> {
    let conn = Connection::open(db_path)?;
    let sql = fs::read_to_string(queries_path)?;

    for statement in sql.split(';') {
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        println!("Running query:\n{statement}\n");
        match run_statement(&conn, statement) {
            Ok(rows) => {
                for row in rows {
                    println!("{row}");
                }
            }
            Err(e) => {
                warn!("Query failed: {}", e);
                println!("Error: {e}");
            }
        }
        println!("{}", "-".repeat(40));
    }
    Ok(())
}

fn run_statement(conn: &Connection, sql: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(sql)?;
    let column_count = stmt.column_count();
    let mut rows = stmt.query([])?;

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut fields = Vec::with_capacity(column_count);
        for i in 0..column_count {
            fields.push(format_value(row.get_ref(i)?));
        }
        out.push(fields.join(" | "));
    }
    Ok(out)
}

fn format_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => format!("<{} bytes>", b.len()),
    }
}
