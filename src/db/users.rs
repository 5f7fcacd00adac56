use rusqlite::{params, Connection, OptionalExtension, Row};

use super::models::{PublicUser, User};

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        contact: row.get(1)?,
        username: row.get(2)?,
        password: row.get(3)?,
        fullname: row.get(4)?,
    })
}

/// Inserts a user and returns the generated id. Duplicate contact or
/// username surfaces as the driver's UNIQUE constraint error.
pub fn insert_user(
    conn: &Connection,
    contact: Option<&str>,
    username: Option<&str>,
    password: Option<&str>,
    fullname: Option<&str>,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO users (contact, username, password, fullname) VALUES (?1, ?2, ?3, ?4)",
        params![contact, username, password, fullname],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Exact contact + password match, as stored.
pub fn find_by_credentials(
    conn: &Connection,
    contact: &str,
    password: &str,
) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        "SELECT id, contact, username, password, fullname FROM users
         WHERE contact = ?1 AND password = ?2",
        params![contact, password],
        user_from_row,
    )
    .optional()
}

pub fn find_by_contact(conn: &Connection, contact: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        "SELECT id, contact, username, password, fullname FROM users WHERE contact = ?1",
        params![contact],
        user_from_row,
    )
    .optional()
}

pub fn find_public(conn: &Connection, id: i64) -> rusqlite::Result<Option<PublicUser>> {
    conn.query_row(
        "SELECT id, username, contact, fullname FROM users WHERE id = ?1",
        params![id],
        |row| {
            Ok(PublicUser {
                id: row.get(0)?,
                username: row.get(1)?,
                contact: row.get(2)?,
                fullname: row.get(3)?,
            })
        },
    )
    .optional()
}
