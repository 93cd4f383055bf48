/*
 * Responsibility
 * - SQLx operations on the users table
 * - "passwordHash" is read here but never leaves the service layer
 * - unique violations on username become StoreError::Conflict
 */
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::{StoreError, StoreResult};
use crate::repos::store::{NewUser, UserRecord};

#[derive(Debug, FromRow)]
pub struct UserRow {
    #[sqlx(rename = "userId")]
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    #[sqlx(rename = "passwordHash")]
    pub password_hash: String,
    pub blogs: Vec<i64>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        UserRecord {
            id: row.id,
            username: row.username,
            name: row.name,
            password_hash: row.password_hash,
            blogs: row.blogs,
        }
    }
}

pub async fn list(db: &PgPool) -> StoreResult<Vec<UserRecord>> {
    let rows = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT "userId", username, name, "passwordHash", blogs
        FROM users
        ORDER BY "createdAt" ASC
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(UserRecord::from).collect())
}

pub async fn create(db: &PgPool, user: &NewUser) -> StoreResult<UserRecord> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users ("userId", username, name, "passwordHash")
        VALUES ($1, $2, $3, $4)
        RETURNING "userId", username, name, "passwordHash", blogs
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&user.username)
    .bind(user.name.as_deref())
    .bind(&user.password_hash)
    .fetch_one(db)
    .await
    .map_err(StoreError::from_sqlx)?;

    Ok(row.into())
}

pub async fn get(db: &PgPool, user_id: Uuid) -> StoreResult<Option<UserRecord>> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT "userId", username, name, "passwordHash", blogs
        FROM users
        WHERE "userId" = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(row.map(UserRecord::from))
}

pub async fn get_by_username(db: &PgPool, username: &str) -> StoreResult<Option<UserRecord>> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT "userId", username, name, "passwordHash", blogs
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(db)
    .await?;

    Ok(row.map(UserRecord::from))
}

// The array is edited server-side; never read-modify-write it from here.
pub async fn link_blog(db: &PgPool, user_id: Uuid, blog_id: i64) -> StoreResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET blogs = array_append(blogs, $2)
        WHERE "userId" = $1
        "#,
    )
    .bind(user_id)
    .bind(blog_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn unlink_blog(db: &PgPool, user_id: Uuid, blog_id: i64) -> StoreResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET blogs = array_remove(blogs, $2)
        WHERE "userId" = $1
        "#,
    )
    .bind(user_id)
    .bind(blog_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
