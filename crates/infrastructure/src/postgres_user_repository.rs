//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use dishpicker_application::{NewUser, UserChanges, UserRecord, UserRepository};
use dishpicker_core::{AppError, AppResult};
use dishpicker_domain::{EmailAddress, Role, User, UserId, Username};


/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    profile_image_path: Option<String>,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_record(self) -> AppResult<UserRecord> {
        let user = User::new(
            UserId::new(self.id),
            Username::new(self.username)?,
            EmailAddress::new(self.email)?,
            self.role.parse::<Role>()?,
            self.profile_image_path,
            self.created_at,
        );

        Ok(UserRecord {
            user,
            password_hash: self.password_hash,
        })
    }

    fn into_user(self) -> AppResult<User> {
        self.into_record().map(|record| record.user)
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, role, profile_image_path, created_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            LIMIT 1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by email: {error}")))?;

        row.map(UserRow::into_record).transpose()
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, role, profile_image_path, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by id: {error}")))?;

        row.map(UserRow::into_user).transpose()
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, role, profile_image_path, created_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list users: {error}")))?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, role, profile_image_path, created_at
            "#,
        )
        .bind(new_user.username.as_str())
        .bind(new_user.email.as_str())
        .bind(new_user.password_hash.as_str())
        .bind(new_user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| email_conflict_or_internal(error, "create user"))?;

        row.into_user()
    }

    async fn update(&self, user_id: UserId, changes: UserChanges) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash)
            WHERE id = $1
            RETURNING id, username, email, password_hash, role, profile_image_path, created_at
            "#,
        )
        .bind(user_id.as_i64())
        .bind(changes.username.as_ref().map(Username::as_str))
        .bind(changes.email.as_ref().map(EmailAddress::as_str))
        .bind(changes.password_hash.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| email_conflict_or_internal(error, "update user"))?
        .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' not found")))?;

        row.into_user()
    }

    async fn set_profile_image(&self, user_id: UserId, path: Option<&str>) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET profile_image_path = $2
            WHERE id = $1
            RETURNING id, username, email, password_hash, role, profile_image_path, created_at
            "#,
        )
        .bind(user_id.as_i64())
        .bind(path)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to update user profile image: {error}"))
        })?
        .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' not found")))?;

        row.into_user()
    }

    async fn delete(&self, user_id: UserId) -> AppResult<()> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start user delete transaction: {error}"))
        })?;

        // Games that offered one of the user's dishes lose decisions with the
        // dishes, so they go first.
        sqlx::query(
            r#"
            DELETE FROM decision_trees
            WHERE id IN (
                SELECT decisions.tree_id
                FROM decisions
                JOIN dishes ON dishes.id IN (decisions.option_one, decisions.option_two)
                WHERE dishes.user_id = $1
            )
            "#,
        )
        .bind(user_id.as_i64())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to delete decision trees of user: {error}"))
        })?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.as_i64())
            .execute(&mut *transaction)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete user: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("user '{user_id}' not found")));
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit user delete transaction: {error}"))
        })
    }
}

fn email_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict("an account with this email address already exists".to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
