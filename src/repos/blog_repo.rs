/*
 * Responsibility
 * - blogs CRUD (SQLx)
 * - every read joins the owner (users.username / users.name)
 * - "userId" is a FK without CASCADE: the owner must be unlinked before delete
 */
use sqlx::PgPool;
use uuid::Uuid;

use crate::repos::error::{StoreError, StoreResult};
use crate::repos::store::{BlogPatch, BlogRecord, NewBlog, Owner};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BlogRow {
    #[sqlx(rename = "blogId")]
    pub blog_id: i64,

    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: i64,

    #[sqlx(rename = "userId")]
    pub user_id: Uuid,

    pub comments: Vec<String>,

    #[sqlx(rename = "ownerUsername")]
    pub owner_username: Option<String>,

    #[sqlx(rename = "ownerName")]
    pub owner_name: Option<String>,
}

impl From<BlogRow> for BlogRecord {
    fn from(row: BlogRow) -> Self {
        // LEFT JOIN: username is NOT NULL in users, so it tells us whether the owner row exists
        let owner = row.owner_username.map(|username| Owner {
            id: row.user_id,
            username,
            name: row.owner_name,
        });

        BlogRecord {
            id: row.blog_id,
            title: row.title,
            author: row.author,
            url: row.url,
            likes: row.likes,
            user_id: row.user_id,
            owner,
            comments: row.comments,
        }
    }
}

pub async fn list(pool: &PgPool) -> StoreResult<Vec<BlogRecord>> {
    let rows = sqlx::query_as::<_, BlogRow>(
        r#"
        SELECT
            b."blogId", b.title, b.author, b.url, b.likes, b."userId", b.comments,
            u.username AS "ownerUsername", u.name AS "ownerName"
        FROM blogs b
        LEFT JOIN users u ON u."userId" = b."userId"
        ORDER BY b."blogId" ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(BlogRecord::from).collect())
}

pub async fn get(pool: &PgPool, blog_id: i64) -> StoreResult<Option<BlogRecord>> {
    let row = sqlx::query_as::<_, BlogRow>(
        r#"
        SELECT
            b."blogId", b.title, b.author, b.url, b.likes, b."userId", b.comments,
            u.username AS "ownerUsername", u.name AS "ownerName"
        FROM blogs b
        LEFT JOIN users u ON u."userId" = b."userId"
        WHERE b."blogId" = $1
        "#,
    )
    .bind(blog_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(BlogRecord::from))
}

pub async fn create(pool: &PgPool, blog: &NewBlog) -> StoreResult<BlogRecord> {
    let row = sqlx::query_as::<_, BlogRow>(
        r#"
        WITH b AS (
            INSERT INTO blogs (title, author, url, likes, "userId")
            VALUES ($1, $2, $3, $4, $5)
            RETURNING "blogId", title, author, url, likes, "userId", comments
        )
        SELECT
            b."blogId", b.title, b.author, b.url, b.likes, b."userId", b.comments,
            u.username AS "ownerUsername", u.name AS "ownerName"
        FROM b
        LEFT JOIN users u ON u."userId" = b."userId"
        "#,
    )
    .bind(blog.title.as_deref())
    .bind(blog.author.as_deref())
    .bind(blog.url.as_deref())
    .bind(blog.likes)
    .bind(blog.user_id)
    .fetch_one(pool)
    .await
    .map_err(StoreError::from_sqlx)?;

    Ok(row.into())
}

pub async fn update(
    pool: &PgPool,
    blog_id: i64,
    patch: &BlogPatch,
) -> StoreResult<Option<BlogRecord>> {
    let row = sqlx::query_as::<_, BlogRow>(
        r#"
        WITH b AS (
            UPDATE blogs
            SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                url = COALESCE($4, url),
                likes = COALESCE($5, likes)
            WHERE "blogId" = $1
            RETURNING "blogId", title, author, url, likes, "userId", comments
        )
        SELECT
            b."blogId", b.title, b.author, b.url, b.likes, b."userId", b.comments,
            u.username AS "ownerUsername", u.name AS "ownerName"
        FROM b
        LEFT JOIN users u ON u."userId" = b."userId"
        "#,
    )
    .bind(blog_id)
    .bind(patch.title.as_deref())
    .bind(patch.author.as_deref())
    .bind(patch.url.as_deref())
    .bind(patch.likes)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(BlogRecord::from))
}

pub async fn push_comment(
    pool: &PgPool,
    blog_id: i64,
    comment: &str,
) -> StoreResult<Option<BlogRecord>> {
    let row = sqlx::query_as::<_, BlogRow>(
        r#"
        WITH b AS (
            UPDATE blogs
            SET comments = array_append(comments, $2)
            WHERE "blogId" = $1
            RETURNING "blogId", title, author, url, likes, "userId", comments
        )
        SELECT
            b."blogId", b.title, b.author, b.url, b.likes, b."userId", b.comments,
            u.username AS "ownerUsername", u.name AS "ownerName"
        FROM b
        LEFT JOIN users u ON u."userId" = b."userId"
        "#,
    )
    .bind(blog_id)
    .bind(comment)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(BlogRecord::from))
}

pub async fn delete(pool: &PgPool, blog_id: i64) -> StoreResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM blogs
        WHERE "blogId" = $1
        "#,
    )
    .bind(blog_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
