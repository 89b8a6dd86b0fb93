use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request is malformed or not allowed for this actor
    #[error("{0}")]
    Validation(String),

    /// Missing, or outside the actor's scope
    #[error("Not found")]
    NotFound,

    /// A uniqueness, reference or check constraint was violated
    #[error("{0}")]
    Constraint(String),

    #[error("Database error: {0}")]
    Database(DbErr),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                Self::Constraint(format!("Duplicate entry: {detail}"))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                Self::Constraint(format!("Invalid or protected reference: {detail}"))
            }
            _ if is_check_violation(&err) => {
                Self::Constraint(format!("Check constraint violated: {err}"))
            }
            _ if matches!(err, DbErr::RecordNotFound(_)) => Self::NotFound,
            _ => Self::Database(err),
        }
    }
}

/// Whether the store rejected a row through a CHECK constraint
///
/// Neither driver reports these through [`DbErr::sql_err`].
pub fn is_check_violation(err: &DbErr) -> bool {
    let msg = err.to_string();
    msg.contains("CHECK constraint failed") || msg.contains("violates check constraint")
}

/// Whether an insert failed because the row already exists
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_check_violation_detection() {
        let sqlite = DbErr::Custom("CHECK constraint failed: start_time < end_time".to_string());
        let postgres = DbErr::Custom(
            "new row for relation \"groups\" violates check constraint \"groups_check\""
                .to_string(),
        );

        assert!(is_check_violation(&sqlite));
        assert!(is_check_violation(&postgres));
        assert!(!is_check_violation(&DbErr::Custom("timeout".to_string())));
    }

    #[test]
    fn test_classification() {
        let err = ServiceError::from(DbErr::Custom("CHECK constraint failed: x".to_string()));
        assert!(matches!(err, ServiceError::Constraint(_)));

        let err = ServiceError::from(DbErr::RecordNotFound("sessions".to_string()));
        assert!(matches!(err, ServiceError::NotFound));

        let err = ServiceError::from(DbErr::Custom("connection reset".to_string()));
        assert!(matches!(err, ServiceError::Database(_)));
    }
}
