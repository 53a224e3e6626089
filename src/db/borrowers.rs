use rusqlite::{params, Connection, Row};

use crate::error::{LibraryError, Result};
use crate::models::Borrower;

use super::map_constraint;

fn borrower_from_row(row: &Row<'_>) -> rusqlite::Result<Borrower> {
    Ok(Borrower {
        id: row.get(0)?,
        last_name: row.get(1)?,
        first_name: row.get(2)?,
        middle_name: row.get(3)?,
        course: row.get(4)?,
        contact_number: row.get(5)?,
    })
}

/// All borrowers, unsorted.
pub fn fetch_borrowers(conn: &Connection) -> Result<Vec<Borrower>> {
    let mut stmt = conn.prepare(
        "SELECT BorrowerID, LastName, FirstName, MiddleName, Course, ContactNumber
         FROM Borrowers",
    )?;
    let borrowers = stmt
        .query_map([], borrower_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(borrowers)
}

#[cfg(test)]
pub(crate) fn find_borrower(conn: &Connection, id: &str) -> Result<Option<Borrower>> {
    use rusqlite::OptionalExtension;

    let borrower = conn
        .query_row(
            "SELECT BorrowerID, LastName, FirstName, MiddleName, Course, ContactNumber
             FROM Borrowers WHERE BorrowerID = ?1",
            params![id],
            borrower_from_row,
        )
        .optional()?;
    Ok(borrower)
}

/// Insert an already validated borrower. A missing middle name is written as
/// `NULL`.
pub fn create_borrower(conn: &Connection, borrower: &Borrower) -> Result<()> {
    conn.execute(
        "INSERT INTO Borrowers (BorrowerID, LastName, FirstName, MiddleName, Course, ContactNumber)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            borrower.id,
            borrower.last_name,
            borrower.first_name,
            borrower.middle_name,
            borrower.course,
            borrower.contact_number,
        ],
    )
    .map_err(|err| {
        map_constraint(err, || {
            LibraryError::Duplicate("Borrower ID already exists".to_string())
        })
    })?;
    Ok(())
}
