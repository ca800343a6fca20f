//! Student persistence.
//!
//! Each operation validates first, then opens its own connection, runs one
//! statement and drops the connection before returning. Failures never leave
//! this module as errors: they are converted into an [`Outcome`] or
//! [`SearchOutcome`] carrying the message to show the user.

use crate::config::{AppConfig, DatabaseConfig};
use crate::core::db::{self, ScopedConnection, STUDENTS_TABLE};
use crate::core::{Result, StudentError};
use crate::model::{StudentRecord, StudentRow};
use crate::search::{SearchQuery, SELECT_COLUMNS};
use crate::validation::Validator;
use rusqlite::{params, params_from_iter, Row};
use tracing::{debug, error, info, warn};

/// Result of a mutating operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
}

impl Outcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Outcome {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Outcome {
            success: false,
            message: message.into(),
        }
    }
}

/// Result of a search: rows on success, `None` on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub rows: Option<Vec<StudentRow>>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Create,
    Update,
    Delete,
    Search,
}

impl Operation {
    fn success_message(&self) -> &'static str {
        match self {
            Operation::Create => "Student created successfully.",
            Operation::Update => "Student updated successfully.",
            Operation::Delete => "Student deleted successfully.",
            Operation::Search => "",
        }
    }

    /// Phrases a failure for the user and logs it at a level matching its kind.
    fn failure_message(&self, err: &StudentError) -> String {
        match err {
            StudentError::Validation(e) => {
                debug!("{:?} rejected by validation: {}", self, e);
                e.to_string()
            }
            StudentError::DuplicateCpf | StudentError::DuplicateEmail
                if *self == Operation::Update =>
            {
                warn!("{:?} hit a unique constraint: {}", self, err);
                format!("{} to another student.", err.to_string().trim_end_matches('.'))
            }
            StudentError::Database(e) => {
                error!("{:?} failed: {}", self, e);
                let action = match self {
                    Operation::Create => "create student",
                    Operation::Update => "update student",
                    Operation::Delete => "delete student",
                    Operation::Search => "list students",
                };
                format!("Failed to {}: {}", action, e)
            }
            StudentError::NotFound => {
                info!("{:?} matched no student", self);
                err.to_string()
            }
            StudentError::Connection => err.to_string(),
            other => {
                warn!("{:?} failed: {}", self, other);
                other.to_string()
            }
        }
    }

    fn outcome(&self, result: Result<()>) -> Outcome {
        match result {
            Ok(()) => Outcome::ok(self.success_message()),
            Err(e) => Outcome::failed(self.failure_message(&e)),
        }
    }
}

const INSERT_SQL: &str = "INSERT INTO alunos \
     (nome, sobrenome, telefone, email, cpf, data_nascimento, cidade, uf, curso) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

const UPDATE_SQL: &str = "UPDATE alunos \
     SET nome = ?1, sobrenome = ?2, telefone = ?3, email = ?4, cpf = ?5, \
         data_nascimento = ?6, cidade = ?7, uf = ?8, curso = ?9 \
     WHERE id = ?10";

const DELETE_SQL: &str = "DELETE FROM alunos WHERE id = ?1";

/// CRUD over the `alunos` table.
#[derive(Debug, Clone)]
pub struct StudentRepository {
    database: DatabaseConfig,
    validator: Validator,
}

impl StudentRepository {
    pub fn new(database: DatabaseConfig, validator: Validator) -> Self {
        StudentRepository { database, validator }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        StudentRepository::new(config.database.clone(), Validator::new(config.validation))
    }

    /// Opens a connection, or `None` when storage is unavailable.
    pub fn connect(&self) -> Option<ScopedConnection> {
        db::connect(&self.database)
    }

    /// Startup check: opens and immediately releases a connection.
    pub fn ping(&self) -> bool {
        match self.connect() {
            Some(conn) => {
                drop(conn);
                info!("Initial database connection check succeeded");
                true
            }
            None => {
                error!("Initial database connection check failed for {:?}", self.database.path);
                false
            }
        }
    }

    /// Validates and inserts a new student.
    pub fn create(&self, record: &StudentRecord) -> Outcome {
        Operation::Create.outcome(self.try_create(record).map(|_| ()))
    }

    /// Validates and overwrites the student with the given id.
    pub fn update(&self, id: i64, record: &StudentRecord) -> Outcome {
        Operation::Update.outcome(self.try_update(id, record))
    }

    /// Removes the student with the given id.
    pub fn delete(&self, id: i64) -> Outcome {
        Operation::Delete.outcome(self.try_delete(id))
    }

    /// Lists students matching the query.
    pub fn search(&self, query: &SearchQuery) -> SearchOutcome {
        match self.try_search(query) {
            Ok(rows) => SearchOutcome {
                message: format!("{} students found.", rows.len()),
                rows: Some(rows),
            },
            Err(e) => SearchOutcome {
                rows: None,
                message: Operation::Search.failure_message(&e),
            },
        }
    }

    /// Loads a single student by id.
    pub fn find_by_id(&self, id: i64) -> Result<Option<StudentRow>> {
        let conn = self.connect().ok_or(StudentError::Connection)?;
        let sql = format!("SELECT {} FROM {} WHERE id = ?1", SELECT_COLUMNS, STUDENTS_TABLE);
        let mut stmt = conn.prepare(&sql).map_err(StudentError::from_storage)?;
        let mut rows = stmt
            .query_map([id], row_to_student)
            .map_err(StudentError::from_storage)?;
        let row = rows.next().transpose().map_err(StudentError::from_storage)?;
        Ok(row)
    }

    fn try_create(&self, record: &StudentRecord) -> Result<i64> {
        let record = record.normalized();
        self.validator.validate_record(&record)?;

        let conn = self.connect().ok_or(StudentError::Connection)?;
        conn.execute(
            INSERT_SQL,
            params![
                record.nome,
                record.sobrenome,
                record.telefone,
                record.email,
                record.cpf,
                record.data_nascimento,
                record.cidade,
                record.uf,
                record.curso.code(),
            ],
        )
        .map_err(StudentError::from_storage)?;

        let id = conn.last_insert_rowid();
        info!("Created student {} ({} {})", id, record.nome, record.sobrenome);
        Ok(id)
    }

    fn try_update(&self, id: i64, record: &StudentRecord) -> Result<()> {
        let record = record.normalized();
        self.validator.validate_record(&record)?;

        let conn = self.connect().ok_or(StudentError::Connection)?;
        let changed = conn
            .execute(
                UPDATE_SQL,
                params![
                    record.nome,
                    record.sobrenome,
                    record.telefone,
                    record.email,
                    record.cpf,
                    record.data_nascimento,
                    record.cidade,
                    record.uf,
                    record.curso.code(),
                    id,
                ],
            )
            .map_err(StudentError::from_storage)?;

        if changed == 0 {
            return Err(StudentError::NotFound);
        }
        info!("Updated student {}", id);
        Ok(())
    }

    fn try_delete(&self, id: i64) -> Result<()> {
        let conn = self.connect().ok_or(StudentError::Connection)?;
        let changed = conn
            .execute(DELETE_SQL, [id])
            .map_err(StudentError::from_storage)?;

        if changed == 0 {
            return Err(StudentError::NotFound);
        }
        info!("Deleted student {}", id);
        Ok(())
    }

    fn try_search(&self, query: &SearchQuery) -> Result<Vec<StudentRow>> {
        let conn = self.connect().ok_or(StudentError::Connection)?;
        let (sql, params) = query.to_sql();
        debug!("Search: {} {:?}", sql, params);

        let mut stmt = conn.prepare(&sql).map_err(StudentError::from_storage)?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), row_to_student)
            .map_err(StudentError::from_storage)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(StudentError::from_storage)?;
        Ok(rows)
    }
}

fn row_to_student(row: &Row) -> rusqlite::Result<StudentRow> {
    Ok(StudentRow {
        id: row.get(0)?,
        nome: row.get(1)?,
        sobrenome: row.get(2)?,
        telefone: row.get(3)?,
        email: row.get(4)?,
        cpf: row.get(5)?,
        data_nascimento: row.get(6)?,
        cidade: row.get(7)?,
        uf: row.get(8)?,
        curso: row.get(9)?,
    })
}
