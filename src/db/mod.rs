//! Persistence module split across logical submodules. Each helper runs one
//! statement against a borrowed connection; callers decide the connection
//! and transaction scope.

mod books;
mod borrowers;
mod connection;
mod loans;
mod users;

use rusqlite::{Error as SqlError, ErrorCode};

use crate::error::LibraryError;

pub use books::{create_book, fetch_books, set_book_status};
pub use borrowers::{create_borrower, fetch_borrowers};
pub use connection::{ensure_schema, open_connection};
pub use loans::{create_loan, delete_loans_for_book, fetch_loans, has_active_loan};
pub use users::{create_user, credentials_match};

#[cfg(test)]
pub(crate) use books::find_book;
#[cfg(test)]
pub(crate) use borrowers::find_borrower;
#[cfg(test)]
pub(crate) use connection::open_in_memory;

/// Swap a SQLite constraint failure for the domain error built by `on_violation`
/// and pass every other failure through as a storage error.
fn map_constraint(err: SqlError, on_violation: impl FnOnce() -> LibraryError) -> LibraryError {
    if matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::ConstraintViolation)
    ) {
        on_violation()
    } else {
        err.into()
    }
}
