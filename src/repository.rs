//! The narrow interface the UI talks to: one method per desk operation. The
//! SQLite implementation opens a fresh connection per call and drops it
//! before returning, so no connection outlives a single request.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::db::{
    create_book, create_borrower, create_loan, create_user, credentials_match,
    delete_loans_for_book, ensure_schema, fetch_books, fetch_borrowers, fetch_loans,
    has_active_loan, open_connection, set_book_status,
};
use crate::error::{LibraryError, Result};
use crate::models::{
    Book, BookStatus, Borrower, BorrowRequest, Credentials, Loan, NewBook, NewBorrower,
    ReturnRequest, User,
};

/// Every operation the desk supports. Implementations validate the request
/// before touching storage, so a rejected request never writes anything.
pub trait LibraryRepository {
    fn register(&self, credentials: &Credentials) -> Result<()>;
    fn login(&self, credentials: &Credentials) -> Result<User>;
    fn add_book(&self, book: &NewBook) -> Result<Book>;
    fn list_books(&self) -> Result<Vec<Book>>;
    fn add_borrower(&self, borrower: &NewBorrower) -> Result<Borrower>;
    fn list_borrowers(&self) -> Result<Vec<Borrower>>;
    fn borrow_book(&self, request: &BorrowRequest) -> Result<()>;
    fn return_book(&self, request: &ReturnRequest) -> Result<()>;
    fn list_loans(&self) -> Result<Vec<Loan>>;
}

/// Repository backed by a single SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    path: PathBuf,
}

impl SqliteRepository {
    /// Prepare the database file and schema, then hand back a repository for
    /// it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        ensure_schema(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        open_connection(&self.path)
    }
}

impl LibraryRepository for SqliteRepository {
    fn register(&self, credentials: &Credentials) -> Result<()> {
        let credentials = credentials.validate()?;
        let conn = self.connect()?;
        if let Err(err) = create_user(&conn, &credentials) {
            warn!(username = %credentials.username, error = %err, "registration rejected");
            return Err(err);
        }
        info!(username = %credentials.username, "user registered");
        Ok(())
    }

    fn login(&self, credentials: &Credentials) -> Result<User> {
        let credentials = credentials.validate()?;
        let conn = self.connect()?;
        if credentials_match(&conn, &credentials)? {
            info!(username = %credentials.username, "login accepted");
            Ok(User {
                username: credentials.username,
            })
        } else {
            warn!(username = %credentials.username, "login rejected");
            Err(LibraryError::InvalidCredentials)
        }
    }

    fn add_book(&self, book: &NewBook) -> Result<Book> {
        let book = book.validate()?;
        let conn = self.connect()?;
        let created = create_book(&conn, &book).inspect_err(|err| {
            warn!(book_id = %book.id, error = %err, "book rejected");
        })?;
        info!(book_id = %created.id, "book added");
        Ok(created)
    }

    fn list_books(&self) -> Result<Vec<Book>> {
        let books = fetch_books(&self.connect()?)?;
        debug!(count = books.len(), "books listed");
        Ok(books)
    }

    fn add_borrower(&self, borrower: &NewBorrower) -> Result<Borrower> {
        let borrower = borrower.validate()?;
        let conn = self.connect()?;
        create_borrower(&conn, &borrower).inspect_err(|err| {
            warn!(borrower_id = %borrower.id, error = %err, "borrower rejected");
        })?;
        info!(borrower_id = %borrower.id, "borrower added");
        Ok(borrower)
    }

    fn list_borrowers(&self) -> Result<Vec<Borrower>> {
        let borrowers = fetch_borrowers(&self.connect()?)?;
        debug!(count = borrowers.len(), "borrowers listed");
        Ok(borrowers)
    }

    /// Record a loan and flip the book to `Borrowed` in one transaction. A
    /// book that is already out is refused even for a different borrower.
    fn borrow_book(&self, request: &BorrowRequest) -> Result<()> {
        let request = request.validate()?;
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        if has_active_loan(&tx, &request.book_id)? {
            warn!(book_id = %request.book_id, "book already out");
            return Err(LibraryError::Conflict);
        }
        if let Err(err) = create_loan(&tx, &request.book_id, &request.borrower_id) {
            warn!(
                book_id = %request.book_id,
                borrower_id = %request.borrower_id,
                error = %err,
                "loan rejected"
            );
            return Err(err);
        }
        set_book_status(&tx, &request.book_id, BookStatus::Borrowed)?;
        tx.commit()?;

        info!(
            book_id = %request.book_id,
            borrower_id = %request.borrower_id,
            "book borrowed"
        );
        Ok(())
    }

    /// Clear every loan on the book and mark it `Available`. Succeeds even
    /// when the book was not out or does not exist.
    fn return_book(&self, request: &ReturnRequest) -> Result<()> {
        let request = request.validate()?;
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let cleared = delete_loans_for_book(&tx, &request.book_id)?;
        set_book_status(&tx, &request.book_id, BookStatus::Available)?;
        tx.commit()?;

        info!(book_id = %request.book_id, loans_cleared = cleared, "book returned");
        Ok(())
    }

    fn list_loans(&self) -> Result<Vec<Loan>> {
        let loans = fetch_loans(&self.connect()?)?;
        debug!(count = loans.len(), "loans listed");
        Ok(loans)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::db::{find_book, find_borrower};

    fn repository() -> (TempDir, SqliteRepository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = SqliteRepository::open(dir.path().join("library.db")).unwrap();
        (dir, repo)
    }

    fn jane(id: &str) -> NewBorrower {
        NewBorrower {
            id: id.into(),
            last_name: "Doe".into(),
            first_name: "Jane".into(),
            middle_name: String::new(),
            course: "CS".into(),
            contact_number: "555-1111".into(),
        }
    }

    fn status_of(repo: &SqliteRepository, id: &str) -> BookStatus {
        let conn = open_connection(repo.path()).unwrap();
        find_book(&conn, id).unwrap().unwrap().status
    }

    fn stocked() -> (TempDir, SqliteRepository) {
        let (dir, repo) = repository();
        repo.add_book(&NewBook::new("B1", "Dune", "Herbert")).unwrap();
        repo.add_borrower(&jane("R1")).unwrap();
        repo.add_borrower(&jane("R2")).unwrap();
        (dir, repo)
    }

    #[test]
    fn added_book_is_listed_as_available() {
        let (_dir, repo) = repository();
        repo.add_book(&NewBook::new("B1", "Dune", "Herbert")).unwrap();

        let books = repo.list_books().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, "B1");
        assert_eq!(books[0].status, BookStatus::Available);
    }

    #[test]
    fn duplicate_book_leaves_the_existing_row_alone() {
        let (_dir, repo) = repository();
        repo.add_book(&NewBook::new("B1", "Dune", "Herbert")).unwrap();

        let err = repo.add_book(&NewBook::new("B1", "Emma", "Austen")).unwrap_err();

        assert!(matches!(err, LibraryError::Duplicate(_)));
        let books = repo.list_books().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Dune");
    }

    #[test]
    fn padded_id_collides_with_the_trimmed_one() {
        let (_dir, repo) = repository();
        repo.add_book(&NewBook::new("B1", "Dune", "Herbert")).unwrap();

        let err = repo.add_book(&NewBook::new(" B1 ", "Emma", "Austen")).unwrap_err();

        assert_eq!(err.to_string(), "Book ID already exists");
        assert_eq!(repo.list_books().unwrap().len(), 1);
        repo.add_borrower(&jane("R1")).unwrap();
        assert!(matches!(
            repo.add_borrower(&jane("  R1")),
            Err(LibraryError::Duplicate(_))
        ));
    }

    #[test]
    fn blank_fields_write_nothing() {
        let (_dir, repo) = repository();

        let err = repo.add_book(&NewBook::new("B1", "", "Herbert")).unwrap_err();
        assert!(matches!(err, LibraryError::Validation(_)));

        let mut borrower = jane("R1");
        borrower.course = "  ".into();
        let err = repo.add_borrower(&borrower).unwrap_err();
        assert!(matches!(err, LibraryError::Validation(_)));

        assert!(repo.list_books().unwrap().is_empty());
        assert!(repo.list_borrowers().unwrap().is_empty());
    }

    #[test]
    fn borrower_without_middle_name_is_stored() {
        let (_dir, repo) = repository();
        repo.add_borrower(&jane("R1")).unwrap();

        let conn = open_connection(repo.path()).unwrap();
        let stored = find_borrower(&conn, "R1").unwrap().unwrap();
        assert_eq!(stored.middle_name, None);
        assert!(matches!(
            repo.add_borrower(&jane("R1")),
            Err(LibraryError::Duplicate(_))
        ));
    }

    #[test]
    fn borrowing_marks_the_book_and_repeat_pair_conflicts() {
        let (_dir, repo) = stocked();

        repo.borrow_book(&BorrowRequest::new("B1", "R1")).unwrap();
        assert_eq!(status_of(&repo, "B1"), BookStatus::Borrowed);

        let err = repo.borrow_book(&BorrowRequest::new("B1", "R1")).unwrap_err();
        assert!(matches!(err, LibraryError::Conflict));
        assert_eq!(repo.list_loans().unwrap().len(), 1);
    }

    #[test]
    fn a_book_out_to_one_borrower_cannot_go_to_another() {
        let (_dir, repo) = stocked();
        repo.borrow_book(&BorrowRequest::new("B1", "R1")).unwrap();

        let err = repo.borrow_book(&BorrowRequest::new("B1", "R2")).unwrap_err();

        assert!(matches!(err, LibraryError::Conflict));
        let loans = repo.list_loans().unwrap();
        assert_eq!(loans.len(), 1);
        assert_eq!(loans[0].borrower_id, "R1");
    }

    #[test]
    fn unknown_ids_roll_back_without_touching_status() {
        let (_dir, repo) = stocked();

        for request in [
            BorrowRequest::new("B9", "R1"),
            BorrowRequest::new("B1", "R9"),
        ] {
            let err = repo.borrow_book(&request).unwrap_err();
            assert!(matches!(err, LibraryError::Conflict));
        }

        assert!(repo.list_loans().unwrap().is_empty());
        assert_eq!(status_of(&repo, "B1"), BookStatus::Available);
    }

    #[test]
    fn returning_clears_the_loan_and_is_idempotent() {
        let (_dir, repo) = stocked();
        repo.borrow_book(&BorrowRequest::new("B1", "R1")).unwrap();

        repo.return_book(&ReturnRequest::new("B1")).unwrap();
        assert_eq!(status_of(&repo, "B1"), BookStatus::Available);
        assert!(repo.list_loans().unwrap().is_empty());

        repo.return_book(&ReturnRequest::new("B1")).unwrap();
        assert_eq!(status_of(&repo, "B1"), BookStatus::Available);

        repo.return_book(&ReturnRequest::new("never-stocked")).unwrap();
    }

    #[test]
    fn returned_book_can_be_borrowed_again() {
        let (_dir, repo) = stocked();
        repo.borrow_book(&BorrowRequest::new("B1", "R1")).unwrap();
        repo.return_book(&ReturnRequest::new("B1")).unwrap();

        repo.borrow_book(&BorrowRequest::new("B1", "R2")).unwrap();
        assert_eq!(status_of(&repo, "B1"), BookStatus::Borrowed);
    }

    #[test]
    fn blank_transition_ids_are_validation_errors() {
        let (_dir, repo) = stocked();

        assert!(matches!(
            repo.borrow_book(&BorrowRequest::new("", "R1")),
            Err(LibraryError::Validation(_))
        ));
        assert!(matches!(
            repo.return_book(&ReturnRequest::new("")),
            Err(LibraryError::Validation(_))
        ));
    }

    #[test]
    fn registration_and_login() {
        let (_dir, repo) = repository();
        repo.register(&Credentials::new("alice", "pw1")).unwrap();

        let user = repo.login(&Credentials::new("alice", "pw1")).unwrap();
        assert_eq!(user.username, "alice");

        assert!(matches!(
            repo.login(&Credentials::new("alice", "wrong")),
            Err(LibraryError::InvalidCredentials)
        ));
        assert!(matches!(
            repo.login(&Credentials::new("bob", "pw1")),
            Err(LibraryError::InvalidCredentials)
        ));
        assert!(matches!(
            repo.register(&Credentials::new("alice", "pw2")),
            Err(LibraryError::Duplicate(_))
        ));
        assert!(matches!(
            repo.login(&Credentials::new("", "pw1")),
            Err(LibraryError::Validation(_))
        ));
    }
}
