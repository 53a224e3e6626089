use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{LibraryError, Result};
use crate::models::Loan;

use super::map_constraint;

/// Active loans in storage order.
pub fn fetch_loans(conn: &Connection) -> Result<Vec<Loan>> {
    let mut stmt = conn.prepare("SELECT BookID, BorrowerID, BorrowDate FROM Borrow")?;
    let loans = stmt
        .query_map([], |row| {
            Ok(Loan {
                book_id: row.get(0)?,
                borrower_id: row.get(1)?,
                borrowed_at: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(loans)
}

/// Whether any borrower currently holds the book.
pub fn has_active_loan(conn: &Connection, book_id: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM Borrow WHERE BookID = ?1 LIMIT 1",
            params![book_id],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Insert a loan row. The composite key and the foreign keys reject repeat
/// pairs and unknown ids; both surface as the same conflict.
pub fn create_loan(conn: &Connection, book_id: &str, borrower_id: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO Borrow (BookID, BorrowerID) VALUES (?1, ?2)",
        params![book_id, borrower_id],
    )
    .map_err(|err| map_constraint(err, || LibraryError::Conflict))?;
    Ok(())
}

/// Remove every loan for the book regardless of borrower. Returns how many
/// rows went away, zero when the book was not out.
pub fn delete_loans_for_book(conn: &Connection, book_id: &str) -> Result<usize> {
    let deleted = conn.execute("DELETE FROM Borrow WHERE BookID = ?1", params![book_id])?;
    Ok(deleted)
}
