/// Connection Management Module
///
/// Every registry operation opens its own connection, runs one statement and
/// releases the connection before returning. There is no pooling and no
/// shared connection state.

use crate::config::DatabaseConfig;
use crate::core::{Result, StudentError};
use rusqlite::{Connection, OpenFlags};
use std::ops::Deref;
use std::path::PathBuf;
use tracing::{debug, error};

/// An open connection that logs its release when dropped.
///
/// Dropping the value closes the underlying SQLite handle, so the connection
/// is released on every exit path of the operation that owns it.
#[derive(Debug)]
pub struct ScopedConnection {
    conn: Connection,
    path: PathBuf,
}

impl Deref for ScopedConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl Drop for ScopedConnection {
    fn drop(&mut self) {
        debug!("Releasing connection to {:?}", self.path);
    }
}

/// Opens an existing database read-write.
///
/// The file is never created here: a missing database is reported as
/// `StudentError::Connection` just like an unreachable one.
pub fn open(config: &DatabaseConfig) -> Result<ScopedConnection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;

    let conn = Connection::open_with_flags(&config.path, flags).map_err(|e| {
        error!("Failed to open database {:?}: {}", config.path, e);
        StudentError::Connection
    })?;
    conn.busy_timeout(config.busy_timeout).map_err(|e| {
        error!("Failed to configure database {:?}: {}", config.path, e);
        StudentError::Connection
    })?;

    debug!("Opened connection to {:?}", config.path);
    Ok(ScopedConnection {
        conn,
        path: config.path.clone(),
    })
}

/// Opens a connection, returning `None` when storage is unavailable.
///
/// Callers treat `None` as "storage unavailable"; the cause has already been
/// logged.
pub fn connect(config: &DatabaseConfig) -> Option<ScopedConnection> {
    open(config).ok()
}

/// Opens the database, creating the file if it does not exist yet.
pub fn create_database(config: &DatabaseConfig) -> Result<Connection> {
    if let Some(parent) = config.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(&config.path)?;
    Ok(conn)
}
