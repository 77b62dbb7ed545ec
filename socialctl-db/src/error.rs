//! Mapping from sqlx failures to [`SocialError`]
//!
//! Constraint violations carry a SQLSTATE code; those become typed errors so
//! the service can rely on DB constraints instead of check-then-insert.
//! Everything else is a storage failure.

use socialctl_core::{ErrorKind, SocialError};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const NOT_NULL_VIOLATION: &str = "23502";
const CHECK_VIOLATION: &str = "23514";

/// Classify a SQLSTATE code. `None` means a plain storage failure.
pub fn classify(code: Option<&str>) -> Option<ErrorKind> {
    match code? {
        UNIQUE_VIOLATION => Some(ErrorKind::Conflict),
        FOREIGN_KEY_VIOLATION => Some(ErrorKind::NotFound),
        NOT_NULL_VIOLATION | CHECK_VIOLATION => Some(ErrorKind::InvalidArgument),
        _ => None,
    }
}

/// Convert a sqlx error raised while doing `context`.
pub fn map_sqlx(context: &str, err: sqlx::Error) -> SocialError {
    let (kind, detail) = match &err {
        sqlx::Error::Database(db) => (
            classify(db.code().as_deref()),
            db.constraint()
                .map(|c| format!("{} ({})", db.message(), c))
                .unwrap_or_else(|| db.message().to_string()),
        ),
        _ => (None, String::new()),
    };

    match kind {
        Some(ErrorKind::Conflict) => SocialError::conflict(format!("{}: {}", context, detail)),
        Some(ErrorKind::NotFound) => SocialError::NotFound {
            resource: "referenced person",
            key: detail,
        },
        Some(ErrorKind::InvalidArgument) => {
            SocialError::invalid(format!("{}: {}", context, detail))
        }
        _ => SocialError::storage(context, err),
    }
}

/// `.ctx("doing x")` on sqlx results
pub trait SqlxResultExt<T> {
    fn ctx(self, context: &str) -> Result<T, SocialError>;
}

impl<T> SqlxResultExt<T> for Result<T, sqlx::Error> {
    fn ctx(self, context: &str) -> Result<T, SocialError> {
        self.map_err(|e| map_sqlx(context, e))
    }
}
