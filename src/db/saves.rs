use rusqlite::{params, Connection};

use super::models::Post;
use super::posts::{post_from_row, POST_COLUMNS};

/// Bookmarks a post for a user. Saving an already-saved post is a no-op.
/// A missing user id reaches SQLite as NULL and fails the NOT NULL constraint.
pub fn save_post(conn: &Connection, user_id: Option<i64>, post_id: i64) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO saves (user_id, post_id) VALUES (?1, ?2)
         ON CONFLICT (user_id, post_id) DO NOTHING",
        params![user_id, post_id],
    )?;
    Ok(())
}

/// Returns the number of saves removed: 0 when the pair was never saved.
pub fn unsave_post(conn: &Connection, user_id: i64, post_id: i64) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM saves WHERE post_id = ?1 AND user_id = ?2",
        params![post_id, user_id],
    )
}

/// Posts saved by a user, most recently saved first.
pub fn saved_posts(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<Post>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {POST_COLUMNS}
         FROM posts p
         JOIN saves s ON p.id = s.post_id
         WHERE s.user_id = ?1
         ORDER BY s.created_at DESC, s.id DESC"
    ))?;
    let posts = stmt
        .query_map(params![user_id], post_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(posts)
}
