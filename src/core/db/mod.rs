/// Database Module
///
/// The database layer is split into two concerns:
/// - **Connection Management** (`connection.rs`): opening and releasing per-operation connections
/// - **Schema** (`schema.rs`): the `alunos` table definition and its introspection
///
/// All database operations use the standardized `StudentError` type for
/// consistent error propagation.
pub mod connection;
pub mod schema;

pub use connection::{connect, open, ScopedConnection};
pub use schema::STUDENTS_TABLE;
