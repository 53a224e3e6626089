//! Domain models that mirror the SQLite schema plus the request structs the UI
//! hands to the repository. Records stay plain data holders; the requests own
//! their validation so every entry point rejects blank input the same way
//! before a connection is opened.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::error::{LibraryError, Result};

/// Lending state of a book. Stored as the text of [`BookStatus::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookStatus {
    Available,
    Borrowed,
}

impl BookStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookStatus::Available => "Available",
            BookStatus::Borrowed => "Borrowed",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown book status `{0}`")]
pub struct ParseStatusError(String);

impl FromStr for BookStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Available" => Ok(BookStatus::Available),
            "Borrowed" => Ok(BookStatus::Borrowed),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A row of the `Books` table.
pub struct Book {
    /// Library-assigned identifier, typed in by the operator.
    pub id: String,
    pub title: String,
    pub author: String,
    /// Kept in step with the `Borrow` table by the borrow and return
    /// transitions; never edited directly.
    pub status: BookStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A registered borrower. Only the middle name may be absent.
pub struct Borrower {
    pub id: String,
    pub last_name: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub course: String,
    pub contact_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// An active loan. The row exists exactly while the book is out.
pub struct Loan {
    pub book_id: String,
    pub borrower_id: String,
    /// Filled in by SQLite (`CURRENT_TIMESTAMP`, UTC) when the row is created.
    pub borrowed_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// The account that passed the login check. The password never leaves the
/// persistence layer.
pub struct User {
    pub username: String,
}

/// Username/password pair used by both registration and login.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Trim the username and require both fields. The password is compared
    /// byte-for-byte later, so it is checked but left untouched.
    pub fn validate(&self) -> Result<Self> {
        let username = self.username.trim();
        if username.is_empty() || self.password.is_empty() {
            return Err(LibraryError::Validation(
                "Both fields are required".to_string(),
            ));
        }
        Ok(Self {
            username: username.to_string(),
            password: self.password.clone(),
        })
    }
}

/// Fields collected by the book form.
#[derive(Debug, Clone, Default)]
pub struct NewBook {
    pub id: String,
    pub title: String,
    pub author: String,
}

impl NewBook {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
        }
    }

    pub fn validate(&self) -> Result<Self> {
        let book = Self {
            id: self.id.trim().to_string(),
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
        };
        if book.id.is_empty() || book.title.is_empty() || book.author.is_empty() {
            return Err(LibraryError::Validation(
                "All fields are required".to_string(),
            ));
        }
        Ok(book)
    }
}

/// Fields collected by the borrower form. A blank middle name is allowed and
/// normalizes to `None`.
#[derive(Debug, Clone, Default)]
pub struct NewBorrower {
    pub id: String,
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
    pub course: String,
    pub contact_number: String,
}

impl NewBorrower {
    pub fn validate(&self) -> Result<Borrower> {
        let borrower = Borrower {
            id: self.id.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            middle_name: Some(self.middle_name.trim())
                .filter(|middle| !middle.is_empty())
                .map(str::to_string),
            course: self.course.trim().to_string(),
            contact_number: self.contact_number.trim().to_string(),
        };

        let required = [
            &borrower.id,
            &borrower.last_name,
            &borrower.first_name,
            &borrower.course,
            &borrower.contact_number,
        ];
        if required.iter().any(|value| value.is_empty()) {
            return Err(LibraryError::Validation(
                "All fields are required".to_string(),
            ));
        }
        Ok(borrower)
    }
}

/// Book/borrower pair for the borrow transition.
#[derive(Debug, Clone, Default)]
pub struct BorrowRequest {
    pub book_id: String,
    pub borrower_id: String,
}

impl BorrowRequest {
    pub fn new(book_id: impl Into<String>, borrower_id: impl Into<String>) -> Self {
        Self {
            book_id: book_id.into(),
            borrower_id: borrower_id.into(),
        }
    }

    pub fn validate(&self) -> Result<Self> {
        let request = Self {
            book_id: self.book_id.trim().to_string(),
            borrower_id: self.borrower_id.trim().to_string(),
        };
        if request.book_id.is_empty() || request.borrower_id.is_empty() {
            return Err(LibraryError::Validation(
                "Both fields are required".to_string(),
            ));
        }
        Ok(request)
    }
}

/// Book id for the return transition.
#[derive(Debug, Clone, Default)]
pub struct ReturnRequest {
    pub book_id: String,
}

impl ReturnRequest {
    pub fn new(book_id: impl Into<String>) -> Self {
        Self {
            book_id: book_id.into(),
        }
    }

    pub fn validate(&self) -> Result<Self> {
        let book_id = self.book_id.trim();
        if book_id.is_empty() {
            return Err(LibraryError::Validation("Book ID is required".to_string()));
        }
        Ok(Self {
            book_id: book_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn borrower_form() -> NewBorrower {
        NewBorrower {
            id: "R1".into(),
            last_name: "Doe".into(),
            first_name: "Jane".into(),
            middle_name: String::new(),
            course: "CS".into(),
            contact_number: "555-1111".into(),
        }
    }

    #[test]
    fn status_text_matches_stored_values() {
        for status in [BookStatus::Available, BookStatus::Borrowed] {
            assert_eq!(status.as_str().parse::<BookStatus>().unwrap(), status);
        }
        assert!("available".parse::<BookStatus>().is_err());
    }

    #[test]
    fn new_book_trims_and_requires_every_field() {
        let book = NewBook::new("  B1 ", "Dune", " Herbert").validate().unwrap();
        assert_eq!(book.id, "B1");
        assert_eq!(book.author, "Herbert");

        for (id, title, author) in [("", "Dune", "Herbert"), ("B1", "   ", "Herbert"), ("B1", "Dune", "")] {
            let err = NewBook::new(id, title, author).validate().unwrap_err();
            assert!(matches!(err, LibraryError::Validation(_)));
        }
    }

    #[test]
    fn middle_name_is_the_only_optional_borrower_field() {
        let borrower = borrower_form().validate().unwrap();
        assert_eq!(borrower.middle_name, None);

        let mut with_middle = borrower_form();
        with_middle.middle_name = " Q ".into();
        assert_eq!(with_middle.validate().unwrap().middle_name.as_deref(), Some("Q"));

        let blankers: [fn(&mut NewBorrower); 5] = [
            |b| b.id.clear(),
            |b| b.last_name.clear(),
            |b| b.first_name.clear(),
            |b| b.course.clear(),
            |b| b.contact_number.clear(),
        ];
        for blank in blankers {
            let mut form = borrower_form();
            blank(&mut form);
            let err = form.validate().unwrap_err();
            assert!(matches!(err, LibraryError::Validation(_)));
            assert_eq!(err.to_string(), "All fields are required");
        }
    }

    #[test]
    fn password_is_required_but_not_trimmed() {
        let creds = Credentials::new(" alice ", " pw ").validate().unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password, " pw ");

        assert!(Credentials::new("alice", "").validate().is_err());
        assert!(Credentials::new("  ", "pw").validate().is_err());
    }

    #[test]
    fn transition_requests_require_ids() {
        assert!(BorrowRequest::new("B1", "").validate().is_err());
        assert!(BorrowRequest::new("", "R1").validate().is_err());
        assert_eq!(BorrowRequest::new(" B1", "R1 ").validate().unwrap().book_id, "B1");
        assert!(ReturnRequest::new(" ").validate().is_err());
    }
}
