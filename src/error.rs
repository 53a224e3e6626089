//! Error type shared by the persistence layer and the repository. Each variant
//! maps to one kind of notice the UI shows, so the UI can pick a title and a
//! color without inspecting message text.

use thiserror::Error;

/// Result alias used by every fallible library operation.
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Message shown for every rejected borrow. The cause (duplicate loan, book
/// already out, unknown id) is deliberately not distinguished.
pub const CONFLICT_MESSAGE: &str = "This book is already borrowed or invalid Book/Borrower ID";

#[derive(Error, Debug)]
pub enum LibraryError {
    /// A required field was empty. Nothing was written.
    #[error("{0}")]
    Validation(String),

    /// Primary-key collision while adding a record.
    #[error("{0}")]
    Duplicate(String),

    /// The store rejected a loan.
    #[error("{}", CONFLICT_MESSAGE)]
    Conflict,

    /// No user row matched both username and password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LibraryError {
    /// Whether the failure came from user input rather than from the store.
    pub fn is_input_error(&self) -> bool {
        matches!(self, LibraryError::Validation(_))
    }
}
