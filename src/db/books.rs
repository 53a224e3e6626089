use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, Row};

use crate::error::{LibraryError, Result};
use crate::models::{Book, BookStatus, NewBook};

use super::map_constraint;

impl ToSql for BookStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for BookStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        status: row.get(3)?,
    })
}

/// Every book in the order SQLite hands them back. The listing mirrors the
/// table as-is, so there is no `ORDER BY`.
pub fn fetch_books(conn: &Connection) -> Result<Vec<Book>> {
    let mut stmt = conn.prepare("SELECT BookID, Title, Author, Status FROM Books")?;
    let books = stmt
        .query_map([], book_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(books)
}

#[cfg(test)]
pub(crate) fn find_book(conn: &Connection, id: &str) -> Result<Option<Book>> {
    use rusqlite::OptionalExtension;

    let book = conn
        .query_row(
            "SELECT BookID, Title, Author, Status FROM Books WHERE BookID = ?1",
            params![id],
            book_from_row,
        )
        .optional()?;
    Ok(book)
}

/// Insert a new book as `Available`, returning the stored record.
pub fn create_book(conn: &Connection, book: &NewBook) -> Result<Book> {
    conn.execute(
        "INSERT INTO Books (BookID, Title, Author, Status) VALUES (?1, ?2, ?3, ?4)",
        params![book.id, book.title, book.author, BookStatus::Available],
    )
    .map_err(|err| {
        map_constraint(err, || {
            LibraryError::Duplicate("Book ID already exists".to_string())
        })
    })?;

    Ok(Book {
        id: book.id.clone(),
        title: book.title.clone(),
        author: book.author.clone(),
        status: BookStatus::Available,
    })
}

/// Overwrite a book's status. Returns the number of rows touched, which is
/// zero when the id is unknown; callers decide whether that matters.
pub fn set_book_status(conn: &Connection, id: &str, status: BookStatus) -> Result<usize> {
    let updated = conn.execute(
        "UPDATE Books SET Status = ?1 WHERE BookID = ?2",
        params![status, id],
    )?;
    Ok(updated)
}
