pub mod access_key;
pub mod bookmark;
pub mod comic;
pub mod comment;
pub mod reading;
pub mod stats;
pub mod user;

use sea_orm::{DbErr, SqlErr};

/// True when an insert lost against a unique index.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
