//! Comments and friend requests.
//!
//! The schema bootstrap never creates `comments` or `friend_requests`, so
//! these statements fail with "no such table" until a migration adds them.

use rusqlite::{params, Connection};

pub fn insert_comment(
    conn: &Connection,
    post_id: i64,
    user_id: Option<i64>,
    comment: Option<&str>,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO comments (post_id, user_id, comment) VALUES (?1, ?2, ?3)",
        params![post_id, user_id, comment],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_friend_request(
    conn: &Connection,
    sender_id: Option<i64>,
    receiver_id: Option<i64>,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO friend_requests (sender_id, receiver_id) VALUES (?1, ?2)",
        params![sender_id, receiver_id],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn accept_friend_request(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE friend_requests SET status = 'accepted' WHERE id = ?1",
        params![id],
    )
}
