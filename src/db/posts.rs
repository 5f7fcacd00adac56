use rusqlite::{params, Connection, OptionalExtension, Row};

use super::models::{NewPost, Post};

pub const FEED_LIMIT: i64 = 10;
pub const SEARCH_LIMIT: i64 = 10;

pub(crate) const POST_COLUMNS: &str = "p.id, p.user_id, p.title, p.description, p.imageUrl, p.likes, p.created_at";

pub(crate) fn post_from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        image_url: row.get(4)?,
        likes: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn collect_posts(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> rusqlite::Result<Vec<Post>> {
    let mut stmt = conn.prepare(sql)?;
    let posts = stmt
        .query_map(params, post_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(posts)
}

pub fn insert_post(conn: &Connection, post: &NewPost) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO posts (user_id, title, description, imageUrl) VALUES (?1, ?2, ?3, ?4)",
        params![post.user_id, post.title, post.description, post.image_url],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_post(conn: &Connection, id: i64) -> rusqlite::Result<Option<Post>> {
    conn.query_row(
        &format!("SELECT {POST_COLUMNS} FROM posts p WHERE p.id = ?1"),
        params![id],
        post_from_row,
    )
    .optional()
}

/// Newest posts first. Rows created in the same second keep insertion order.
pub fn latest_posts(conn: &Connection, limit: i64) -> rusqlite::Result<Vec<Post>> {
    collect_posts(
        conn,
        &format!("SELECT {POST_COLUMNS} FROM posts p ORDER BY p.created_at DESC, p.id DESC LIMIT ?1"),
        params![limit],
    )
}

/// Case-insensitive substring match on title or description. Folding goes
/// through `fold_case` so non-ASCII letters match too.
pub fn search_posts(conn: &Connection, term: &str) -> rusqlite::Result<Vec<Post>> {
    let pattern = format!("%{term}%");
    collect_posts(
        conn,
        &format!(
            "SELECT {POST_COLUMNS} FROM posts p
             WHERE fold_case(p.title) LIKE fold_case(?1)
                OR fold_case(p.description) LIKE fold_case(?1)
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT ?2"
        ),
        params![pattern, SEARCH_LIMIT],
    )
}

pub fn posts_by_user(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<Post>> {
    collect_posts(
        conn,
        &format!(
            "SELECT {POST_COLUMNS} FROM posts p
             WHERE p.user_id = ?1
             ORDER BY p.created_at DESC, p.id DESC"
        ),
        params![user_id],
    )
}

/// Every post, in storage order.
pub fn all_posts(conn: &Connection) -> rusqlite::Result<Vec<Post>> {
    collect_posts(conn, &format!("SELECT {POST_COLUMNS} FROM posts p"), [])
}

pub fn all_posts_newest_first(conn: &Connection) -> rusqlite::Result<Vec<Post>> {
    collect_posts(
        conn,
        &format!("SELECT {POST_COLUMNS} FROM posts p ORDER BY p.created_at DESC, p.id DESC"),
        [],
    )
}

/// Returns the number of rows touched (0 when the post does not exist).
pub fn increment_likes(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("UPDATE posts SET likes = likes + 1 WHERE id = ?1", params![id])
}

pub fn owner_of(conn: &Connection, id: i64) -> rusqlite::Result<Option<Option<i64>>> {
    conn.query_row(
        "SELECT user_id FROM posts WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )
    .optional()
}

/// Removes a post together with every save that references it, atomically.
/// Returns how many saves went with it.
pub fn delete_post_with_saves(conn: &mut Connection, id: i64) -> rusqlite::Result<usize> {
    let tx = conn.transaction()?;
    let saves = tx.execute("DELETE FROM saves WHERE post_id = ?1", params![id])?;
    tx.execute("DELETE FROM posts WHERE id = ?1", params![id])?;
    tx.commit()?;
    Ok(saves)
}

pub fn clear_posts(conn: &Connection) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM posts", [])
}
