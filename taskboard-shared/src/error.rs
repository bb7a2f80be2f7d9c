/// Persistence error types
///
/// Every `Store` operation returns a [`StoreError`] on failure. The variants
/// separate the failure modes callers may want to react to differently
/// (missing rows, constraint violations) from plain database failures.
///
/// PostgreSQL errors are classified by SQLSTATE:
///
/// | SQLSTATE | Variant |
/// |----------|---------|
/// | `23505`  | `UniqueViolation` |
/// | `23503`  | `ForeignKeyViolation` |
/// | other    | `Database` |

use thiserror::Error;

/// PostgreSQL SQLSTATE for `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL SQLSTATE for `foreign_key_violation`
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence gateway errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// The addressed row does not exist
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// A unique constraint rejected the write (e.g. duplicate email)
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A foreign key rejected the write (unknown owner, or owner still referenced)
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// Any other database failure (connectivity, protocol, decoding)
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    /// Shorthand for a missing user
    pub fn user_not_found(id: i32) -> Self {
        StoreError::NotFound { entity: "user", id }
    }

    /// Shorthand for a missing task
    pub fn task_not_found(id: i32) -> Self {
        StoreError::NotFound { entity: "task", id }
    }

    /// Whether the error is a constraint violation of either kind
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            StoreError::UniqueViolation(_) | StoreError::ForeignKeyViolation(_)
        )
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err
                .constraint()
                .map(str::to_string)
                .unwrap_or_else(|| db_err.message().to_string());

            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => return StoreError::UniqueViolation(constraint),
                Some(FOREIGN_KEY_VIOLATION) => return StoreError::ForeignKeyViolation(constraint),
                _ => {}
            }
        }

        StoreError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        assert_eq!(StoreError::task_not_found(7).to_string(), "task 7 not found");
        assert_eq!(StoreError::user_not_found(3).to_string(), "user 3 not found");
    }

    #[test]
    fn test_constraint_classification() {
        assert!(StoreError::UniqueViolation("users_email_key".into()).is_constraint_violation());
        assert!(StoreError::ForeignKeyViolation("tasks_user_id_fkey".into()).is_constraint_violation());
        assert!(!StoreError::task_not_found(1).is_constraint_violation());
    }

    #[test]
    fn test_non_database_sqlx_error_is_passed_through() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database(sqlx::Error::RowNotFound)));
    }
}
