/*
 * Responsibility
 * - SQLx operations on the users table
 * - `role` is the discriminator column; `profile` holds the role-specific JSONB payload
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, types::Json};
use uuid::Uuid;

use crate::models::{NewUser, Profile, Role, User};
use crate::repos::{RepoError, RepoResult, UserPatch};

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub profile: Json<Profile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepoError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|_| RepoError::Corrupt(format!("user {}: role '{}'", row.id, row.role)))?;
        let profile = row.profile.0;
        if profile.role() != role {
            return Err(RepoError::Corrupt(format!(
                "user {}: profile does not match role '{}'",
                row.id, role
            )));
        }

        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            profile,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const COLUMNS: &str = "id, name, email, password_hash, role, profile, created_at, updated_at";

pub async fn create(db: &PgPool, new: NewUser) -> RepoResult<User> {
    let role = new.profile.role();
    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        INSERT INTO users (id, name, email, password_hash, role, profile)
        VALUES ($1, $2, lower($3), $4, $5, $6)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&new.name)
    .bind(&new.email)
    .bind(&new.password_hash)
    .bind(role.as_str())
    .bind(Json(&new.profile))
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    row.try_into()
}

pub async fn get(db: &PgPool, id: Uuid) -> RepoResult<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM users
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;

    row.map(User::try_from).transpose()
}

pub async fn get_by_email(db: &PgPool, email: &str) -> RepoResult<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM users
        WHERE lower(email) = lower($1)
        "#
    ))
    .bind(email)
    .fetch_optional(db)
    .await?;

    row.map(User::try_from).transpose()
}

pub async fn list_by_role(db: &PgPool, role: Role) -> RepoResult<Vec<User>> {
    let rows = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM users
        WHERE role = $1
        ORDER BY created_at DESC
        "#
    ))
    .bind(role.as_str())
    .fetch_all(db)
    .await?;

    rows.into_iter().map(User::try_from).collect()
}

pub async fn update(db: &PgPool, id: Uuid, patch: UserPatch) -> RepoResult<Option<User>> {
    // profile: None -> keep, Some(p) -> replace (only within the stored role)
    let profile_role = patch.profile.as_ref().map(|p| p.role().as_str());
    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        UPDATE users
        SET
            name = COALESCE($2, name),
            profile = COALESCE($3, profile),
            updated_at = now()
        WHERE id = $1
          AND ($4::text IS NULL OR role = $4)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(patch.name.as_deref())
    .bind(patch.profile.as_ref().map(Json))
    .bind(profile_role)
    .fetch_optional(db)
    .await?;

    row.map(User::try_from).transpose()
}
