/// # Test Utilities Module
///
/// Shared fixtures for the registry's unit and integration tests:
/// - Isolated database files in temporary directories
/// - Databases in each failure state (no table, no file)
/// - Sample student records
/// - Outcome assertion helpers

use crate::config::DatabaseConfig;
use crate::core::db::schema;
use crate::core::db::connection;
use crate::repository::StudentRepository;
use crate::validation::{ValidationConfig, Validator};
use chrono::NaiveDate;
use rusqlite::Connection;
use tempfile::TempDir;

/// Day the fixtures' validators treat as "today"
pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

/// Isolated database test fixture
///
/// The temporary directory, and every file in it, is removed when the
/// fixture is dropped.
pub struct DatabaseFixture {
    _dir: TempDir,
    pub config: DatabaseConfig,
}

impl DatabaseFixture {
    fn in_temp_dir() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = DatabaseConfig::new(dir.path().join("alunos.db"));
        DatabaseFixture { _dir: dir, config }
    }

    /// A database file with the students table
    pub fn new() -> Self {
        let fixture = Self::in_temp_dir();
        schema::initialize(&fixture.config).expect("Failed to initialize schema");
        fixture
    }

    /// A database with three valid students
    pub fn with_sample_students() -> Self {
        let fixture = Self::new();
        let repo = fixture.repository();
        for record in [samples::carla(), samples::ana(), samples::bruno()] {
            let outcome = repo.create(&record);
            assert!(outcome.success, "sample insert failed: {}", outcome.message);
        }
        fixture
    }

    /// A database file that exists but has no students table
    pub fn without_schema() -> Self {
        let fixture = Self::in_temp_dir();
        connection::create_database(&fixture.config).expect("Failed to create database");
        fixture
    }

    /// A database whose `alunos` table is created from the given DDL
    pub fn with_table(ddl: &str) -> Self {
        let fixture = Self::without_schema();
        fixture
            .raw_connection()
            .execute_batch(ddl)
            .expect("Failed to create custom table");
        fixture
    }

    /// A configuration pointing at a file that does not exist
    pub fn missing_database() -> Self {
        Self::in_temp_dir()
    }

    /// Strict-CPF repository pinned to [`fixed_today`]
    pub fn repository(&self) -> StudentRepository {
        self.repository_with(ValidationConfig { strict_cpf: true })
    }

    /// Repository that only checks the CPF mask
    pub fn relaxed_repository(&self) -> StudentRepository {
        self.repository_with(ValidationConfig { strict_cpf: false })
    }

    fn repository_with(&self, config: ValidationConfig) -> StudentRepository {
        StudentRepository::new(
            self.config.clone(),
            Validator::new(config).with_today(fixed_today()),
        )
    }

    fn raw_connection(&self) -> Connection {
        Connection::open(&self.config.path).expect("Failed to open fixture database")
    }

    pub fn row_count(&self) -> i64 {
        self.raw_connection()
            .query_row("SELECT COUNT(*) FROM alunos", [], |row| row.get(0))
            .expect("Failed to count students")
    }

    pub fn count_where_cpf(&self, cpf: &str) -> i64 {
        self.raw_connection()
            .query_row("SELECT COUNT(*) FROM alunos WHERE cpf = ?1", [cpf], |row| row.get(0))
            .expect("Failed to count students by CPF")
    }

    /// Birth date exactly as stored, without display formatting
    pub fn stored_birth_date(&self, id: i64) -> Option<String> {
        self.raw_connection()
            .query_row("SELECT data_nascimento FROM alunos WHERE id = ?1", [id], |row| row.get(0))
            .expect("No student with that id")
    }

    pub fn id_of_cpf(&self, cpf: &str) -> i64 {
        self.raw_connection()
            .query_row("SELECT id FROM alunos WHERE cpf = ?1", [cpf], |row| row.get(0))
            .expect("No student with that CPF")
    }
}

/// Sample students, all valid at [`fixed_today`] under strict mode
pub mod samples {
    use crate::model::{Course, StudentRecord};

    pub fn ana() -> StudentRecord {
        StudentRecord::new("Ana", "Souza", Course::Ads)
            .with_cpf("111.444.777-35")
            .with_email("ana.souza@example.com")
            .with_phone("(61) 99999-8888")
            .with_birth_date("2000-08-15")
    }

    pub fn bruno() -> StudentRecord {
        StudentRecord::new("Bruno", "Costa", Course::Gti)
            .with_cpf("529.982.247-25")
            .with_email("bruno.costa@example.com")
            .with_phone("(61) 3333-4444")
            .with_birth_date("1998-02-10")
            .with_city("Taguatinga", "DF")
    }

    pub fn carla() -> StudentRecord {
        StudentRecord::new("Carla", "Mendes", Course::Cd)
            .with_cpf("123.456.789-09")
            .with_birth_date("2005-01-20")
            .with_city("Goiânia", "GO")
    }
}

/// Assertions on the `Outcome` contract
pub mod outcome_testing {
    use crate::repository::Outcome;

    /// Asserts a failed outcome whose message contains `fragment`
    pub fn assert_failure_contains(outcome: &Outcome, fragment: &str, context: &str) {
        assert!(!outcome.success, "Expected failure but got success in {}", context);
        assert!(
            outcome.message.contains(fragment),
            "Expected '{}' in message '{}' in {}",
            fragment,
            outcome.message,
            context
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_states() {
        let fixture = DatabaseFixture::new();
        assert_eq!(fixture.row_count(), 0);

        let bare = DatabaseFixture::without_schema();
        assert!(bare.config.path.exists());
        let conn = Connection::open(&bare.config.path).unwrap();
        assert!(!schema::students_table_exists(&conn).unwrap());

        let missing = DatabaseFixture::missing_database();
        assert!(!missing.config.path.exists());
    }

    #[test]
    fn test_sample_data_fixture() {
        let fixture = DatabaseFixture::with_sample_students();
        assert_eq!(fixture.row_count(), 3);
        assert_eq!(fixture.count_where_cpf("529.982.247-25"), 1);
    }
}
