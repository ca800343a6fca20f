/// Students Schema Module
///
/// This module owns the definition of the single `alunos` table and the small
/// amount of introspection the registry needs to check it. Repository
/// operations never create the table; only the explicit `init` bootstrap does.

use crate::config::DatabaseConfig;
use crate::core::Result;
use rusqlite::Connection;
use tracing::info;

use super::connection;

/// Name of the table holding student records
pub const STUDENTS_TABLE: &str = "alunos";

const STUDENTS_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS alunos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nome TEXT NOT NULL,
    sobrenome TEXT NOT NULL,
    telefone TEXT,
    email TEXT UNIQUE COLLATE NOCASE,
    cpf TEXT UNIQUE,
    data_nascimento DATE,
    cidade TEXT,
    uf TEXT,
    curso TEXT NOT NULL
)"#;

/// Creates the students table on an open connection if it does not exist yet.
pub fn create_students_table(conn: &Connection) -> Result<()> {
    conn.execute(STUDENTS_TABLE_SQL, [])?;
    Ok(())
}

/// Checks whether the students table exists.
pub fn students_table_exists(conn: &Connection) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [STUDENTS_TABLE],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Creates the database file (if needed) and the students table.
///
/// This is the one-shot bootstrap behind the `init` subcommand.
pub fn initialize(config: &DatabaseConfig) -> Result<()> {
    let conn = connection::create_database(config)?;
    create_students_table(&conn)?;
    info!("Students table ready in {:?}", config.path);
    Ok(())
}
