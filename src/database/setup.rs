use anyhow::{Context, Result};
use rusqlite::Connection;

const SCHEMA_SQL: &str = include_str!("schema.sql");
const DROP_SQL: &str = "DROP TABLE IF EXISTS reviews; DROP TABLE IF EXISTS movies; DROP TABLE IF EXISTS people;";

/// Creates any missing tables. Safe to run against an existing database.
pub fn init_database(conn: &Connection) -> Result<()> {
    apply_statements(conn, SCHEMA_SQL)?;
    log::info!("Database schema ready");
    Ok(())
}

/// Drops every table and recreates the schema.
pub fn reset_database(conn: &Connection) -> Result<()> {
    apply_statements(conn, DROP_SQL)?;
    apply_statements(conn, SCHEMA_SQL)?;
    log::info!("Database schema reset successfully");
    Ok(())
}

fn apply_statements(conn: &Connection, sql: &str) -> Result<()> {
    let statements = split_sql_statements(sql);

    for (idx, statement) in statements.iter().enumerate() {
        execute_sql(conn, statement)
            .with_context(|| format!("Failed to execute statement {}", idx + 1))?;
    }

    Ok(())
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn execute_sql(conn: &Connection, sql: &str) -> Result<()> {
    conn.execute(sql, [])
        .context("Failed to execute SQL statement")
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sql_statements_drops_empty_chunks() {
        let statements = split_sql_statements("CREATE TABLE a (x);\n\n;CREATE TABLE b (y);  ");
        assert_eq!(statements, vec!["CREATE TABLE a (x)", "CREATE TABLE b (y)"]);
    }

    #[test]
    fn test_init_database_is_repeatable() {
        let conn = Connection::open_in_memory().unwrap();
        init_database(&conn).unwrap();
        init_database(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('movies', 'people', 'reviews')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 3);
    }

    #[test]
    fn test_reset_database_clears_rows() {
        let conn = Connection::open_in_memory().unwrap();
        init_database(&conn).unwrap();
        conn.execute("INSERT INTO movies (title) VALUES ('Solaris')", []).unwrap();

        reset_database(&conn).unwrap();

        let movies: i64 = conn.query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0)).unwrap();
        assert_eq!(movies, 0);
    }
}
