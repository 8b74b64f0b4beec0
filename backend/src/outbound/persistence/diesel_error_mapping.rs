//! Shared Diesel error mapping for the snippet, history and settings stores.
//!
//! Each repository error exposes `connection` and `query` constructors; these
//! helpers take them as closures so the mapping lives in one place.

use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure into a repository connection error.
pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map a Diesel failure into query or connection errors.
///
/// Driver messages are logged at debug level only; callers receive a fixed
/// description.
pub(crate) fn map_diesel_error<E>(
    error: diesel::result::Error,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::SnippetRepositoryError;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    fn map(error: DieselError) -> SnippetRepositoryError {
        map_diesel_error(
            error,
            SnippetRepositoryError::query,
            SnippetRepositoryError::connection,
        )
    }

    #[test]
    fn closed_connections_are_connection_errors() {
        let error = map(DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("gone".to_owned()),
        ));
        assert_eq!(
            error,
            SnippetRepositoryError::connection("database connection error")
        );
    }

    #[test]
    fn missing_rows_are_query_errors() {
        assert_eq!(
            map(DieselError::NotFound),
            SnippetRepositoryError::query("record not found")
        );
    }

    #[test]
    fn pool_errors_keep_their_message() {
        let error = map_pool_error(
            PoolError::checkout("timed out"),
            SnippetRepositoryError::connection,
        );
        assert_eq!(error, SnippetRepositoryError::connection("timed out"));
    }
}
