//! Core library surface for the Library Desk TUI application.
//!
//! The persistence helpers, the repository, and the UI are exposed so the
//! `bin` target and the integration tests drive the same pieces.
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod ui;

pub use config::AppConfig;
pub use error::{LibraryError, Result};

/// Domain records and the request structs the repository accepts.
pub use models::{
    Book, BookStatus, Borrower, BorrowRequest, Credentials, Loan, NewBook, NewBorrower,
    ReturnRequest, User,
};

pub use repository::{LibraryRepository, SqliteRepository};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
