// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Adapter initialization failed.
    InitializationError(String),
    /// Query execution failed.
    QueryFailed(String),
    /// The requested property was not found.
    PropertyNotFound(i64),
    /// The requested reservation was not found.
    ReservationNotFound(i64),
    /// A conditional status update matched no row.
    ConcurrentModification(i64),
    /// A stored row could not be mapped back to a domain value.
    InvalidRow(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested resource was not found.
    NotFound(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::PropertyNotFound(id) => write!(f, "Property not found: {id}"),
            Self::ReservationNotFound(id) => write!(f, "Reservation not found: {id}"),
            Self::ConcurrentModification(id) => {
                write!(f, "Concurrent modification of reservation {id}")
            }
            Self::InvalidRow(msg) => write!(f, "Invalid stored row: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<PersistenceError> for stayward::EngineError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::PropertyNotFound(id) => Self::PropertyNotFound(id),
            PersistenceError::ReservationNotFound(id) => Self::ReservationNotFound(id),
            PersistenceError::ConcurrentModification(id) => Self::ConcurrentModification(id),
            other => Self::Store(other.to_string()),
        }
    }
}
