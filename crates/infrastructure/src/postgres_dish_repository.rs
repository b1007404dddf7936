//! PostgreSQL-backed dish repository.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use dishpicker_application::{DishChanges, DishRepository, NewDish};
use dishpicker_core::{AppError, AppResult};
use dishpicker_domain::{
    Dish, DishCandidateFilter, DishId, DishInput, DishName, DishType, DishTypeId, EmailAddress,
    Label, LabelId, Role, User, UserId, Username,
};

#[cfg(test)]
mod tests;

const DISH_SELECT: &str = r#"
    SELECT dishes.id, dishes.name, dishes.image_path, dishes.created_at, dishes.last_update_at,
           users.id AS owner_id, users.username AS owner_username, users.email AS owner_email,
           users.role AS owner_role, users.profile_image_path AS owner_profile_image_path,
           users.created_at AS owner_created_at
    FROM dishes
    JOIN users ON users.id = dishes.user_id
"#;

/// PostgreSQL implementation of the dish repository port.
#[derive(Clone)]
pub struct PostgresDishRepository {
    pool: PgPool,
}

impl PostgresDishRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn hydrate(&self, rows: Vec<DishRow>) -> AppResult<Vec<Dish>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let dish_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();

        let label_rows = sqlx::query_as::<_, AttachedRow>(
            r#"
            SELECT dish_labels.dish_id, labels.id, labels.name
            FROM dish_labels
            JOIN labels ON labels.id = dish_labels.label_id
            WHERE dish_labels.dish_id = ANY($1)
            "#,
        )
        .bind(dish_ids.clone())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load dish labels: {error}")))?;

        let dish_type_rows = sqlx::query_as::<_, AttachedRow>(
            r#"
            SELECT dish_dish_types.dish_id, dish_types.id, dish_types.name
            FROM dish_dish_types
            JOIN dish_types ON dish_types.id = dish_dish_types.dish_type_id
            WHERE dish_dish_types.dish_id = ANY($1)
            "#,
        )
        .bind(dish_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load dish types: {error}")))?;

        let mut labels: HashMap<i64, Vec<Label>> = HashMap::new();
        for row in label_rows {
            labels
                .entry(row.dish_id)
                .or_default()
                .push(Label::new(LabelId::new(row.id), row.name)?);
        }

        let mut dish_types: HashMap<i64, Vec<DishType>> = HashMap::new();
        for row in dish_type_rows {
            dish_types
                .entry(row.dish_id)
                .or_default()
                .push(DishType::new(DishTypeId::new(row.id), row.name)?);
        }

        rows.into_iter()
            .map(|row| {
                let dish_labels = labels.remove(&row.id).unwrap_or_default();
                let types = dish_types.remove(&row.id).unwrap_or_default();
                row.into_dish(dish_labels, types)
            })
            .collect()
    }

    async fn find_row(&self, dish_id: DishId) -> AppResult<Option<Dish>> {
        let row = sqlx::query_as::<_, DishRow>(&format!("{DISH_SELECT} WHERE dishes.id = $1"))
            .bind(dish_id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find dish: {error}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(self.hydrate(vec![row]).await?.into_iter().next())
    }

    async fn load_required(&self, dish_id: DishId) -> AppResult<Dish> {
        self.find_row(dish_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("dish '{dish_id}' not found")))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DishRow {
    id: i64,
    name: String,
    image_path: Option<String>,
    created_at: DateTime<Utc>,
    last_update_at: DateTime<Utc>,
    owner_id: i64,
    owner_username: String,
    owner_email: String,
    owner_role: String,
    owner_profile_image_path: Option<String>,
    owner_created_at: DateTime<Utc>,
}

impl DishRow {
    fn into_dish(self, labels: Vec<Label>, dish_types: Vec<DishType>) -> AppResult<Dish> {
        let owner = User::new(
            UserId::new(self.owner_id),
            Username::new(self.owner_username)?,
            EmailAddress::new(self.owner_email)?,
            self.owner_role.parse::<Role>()?,
            self.owner_profile_image_path,
            self.owner_created_at,
        );

        Ok(Dish::new(DishInput {
            id: DishId::new(self.id),
            name: DishName::new(self.name)?,
            image_path: self.image_path,
            owner,
            labels,
            dish_types,
            created_at: self.created_at,
            last_update_at: self.last_update_at,
        }))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AttachedRow {
    dish_id: i64,
    id: i64,
    name: String,
}

#[async_trait]
impl DishRepository for PostgresDishRepository {
    async fn list(&self, owner_id: Option<UserId>) -> AppResult<Vec<Dish>> {
        let rows = sqlx::query_as::<_, DishRow>(&format!(
            "{DISH_SELECT}
            WHERE $1::BIGINT IS NULL OR dishes.user_id = $1
            ORDER BY dishes.last_update_at DESC, dishes.id DESC"
        ))
        .bind(owner_id.map(|owner_id| owner_id.as_i64()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list dishes: {error}")))?;

        self.hydrate(rows).await
    }

    async fn find_by_id(&self, dish_id: DishId) -> AppResult<Option<Dish>> {
        self.find_row(dish_id).await
    }

    async fn find_by_name(&self, name: &DishName) -> AppResult<Option<Dish>> {
        let row = sqlx::query_as::<_, DishRow>(&format!("{DISH_SELECT} WHERE dishes.name = $1"))
            .bind(name.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find dish by name: {error}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(self.hydrate(vec![row]).await?.into_iter().next())
    }

    async fn find_by_ids(&self, ids: &[DishId]) -> AppResult<Vec<Dish>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = ids.iter().map(DishId::as_i64).collect();
        let rows = sqlx::query_as::<_, DishRow>(&format!(
            "{DISH_SELECT} WHERE dishes.id = ANY($1) ORDER BY dishes.id"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find dishes by ids: {error}")))?;

        self.hydrate(rows).await
    }

    async fn candidate_ids(&self, filter: &DishCandidateFilter) -> AppResult<Vec<DishId>> {
        let label_ids: Vec<i64> = filter.labels().iter().map(LabelId::as_i64).collect();
        let required_labels = i64::try_from(label_ids.len())
            .map_err(|error| AppError::Validation(format!("too many labels: {error}")))?;

        // A dish qualifies when it carries every requested label.
        let ids: Vec<(i64,)> = sqlx::query_as(
            r#"
            SELECT dishes.id
            FROM dishes
            JOIN dish_dish_types
              ON dish_dish_types.dish_id = dishes.id
             AND dish_dish_types.dish_type_id = $1
            LEFT JOIN dish_labels
              ON dish_labels.dish_id = dishes.id
             AND dish_labels.label_id = ANY($2)
            GROUP BY dishes.id
            HAVING COUNT(DISTINCT dish_labels.label_id) = $3
            ORDER BY dishes.id
            "#,
        )
        .bind(filter.dish_type().as_i64())
        .bind(label_ids)
        .bind(required_labels)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to query random dish candidates: {error}"))
        })?;

        Ok(ids.into_iter().map(|(id,)| DishId::new(id)).collect())
    }

    async fn create(&self, new_dish: NewDish) -> AppResult<Dish> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start dish create transaction: {error}"))
        })?;

        let (dish_id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO dishes (name, image_path, user_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(new_dish.name.as_str())
        .bind(new_dish.image_path.as_deref())
        .bind(new_dish.owner_id.as_i64())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| dish_write_error(error, "create dish"))?;

        replace_labels(&mut transaction, dish_id, &new_dish.label_ids).await?;
        replace_dish_types(&mut transaction, dish_id, &new_dish.dish_type_ids).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit dish create transaction: {error}"))
        })?;

        self.load_required(DishId::new(dish_id)).await
    }

    async fn update(&self, dish_id: DishId, changes: DishChanges) -> AppResult<Dish> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start dish update transaction: {error}"))
        })?;

        let result = sqlx::query(
            r#"
            UPDATE dishes
            SET name = COALESCE($2, name),
                image_path = COALESCE($3, image_path),
                last_update_at = now()
            WHERE id = $1
            "#,
        )
        .bind(dish_id.as_i64())
        .bind(changes.name.as_ref().map(DishName::as_str))
        .bind(changes.image_path.as_deref())
        .execute(&mut *transaction)
        .await
        .map_err(|error| dish_write_error(error, "update dish"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("dish '{dish_id}' not found")));
        }

        if let Some(label_ids) = &changes.label_ids {
            replace_labels(&mut transaction, dish_id.as_i64(), label_ids).await?;
        }

        if let Some(dish_type_ids) = &changes.dish_type_ids {
            replace_dish_types(&mut transaction, dish_id.as_i64(), dish_type_ids).await?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit dish update transaction: {error}"))
        })?;

        self.load_required(dish_id).await
    }

    async fn delete(&self, dish_id: DishId) -> AppResult<()> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start dish delete transaction: {error}"))
        })?;

        sqlx::query(
            r#"
            DELETE FROM decision_trees
            WHERE id IN (
                SELECT tree_id
                FROM decisions
                WHERE option_one = $1 OR option_two = $1
            )
            "#,
        )
        .bind(dish_id.as_i64())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to delete decision trees of dish: {error}"))
        })?;

        let result = sqlx::query("DELETE FROM dishes WHERE id = $1")
            .bind(dish_id.as_i64())
            .execute(&mut *transaction)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete dish: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("dish '{dish_id}' not found")));
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit dish delete transaction: {error}"))
        })
    }
}

async fn replace_labels(
    transaction: &mut Transaction<'_, Postgres>,
    dish_id: i64,
    label_ids: &[LabelId],
) -> AppResult<()> {
    sqlx::query("DELETE FROM dish_labels WHERE dish_id = $1")
        .bind(dish_id)
        .execute(&mut **transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to clear dish labels: {error}")))?;

    let label_ids: Vec<i64> = label_ids.iter().map(LabelId::as_i64).collect();
    sqlx::query(
        r#"
        INSERT INTO dish_labels (dish_id, label_id)
        SELECT $1, label_id
        FROM UNNEST($2::BIGINT[]) AS label_id
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(dish_id)
    .bind(label_ids)
    .execute(&mut **transaction)
    .await
    .map_err(|error| dish_write_error(error, "attach dish labels"))?;

    Ok(())
}

async fn replace_dish_types(
    transaction: &mut Transaction<'_, Postgres>,
    dish_id: i64,
    dish_type_ids: &[DishTypeId],
) -> AppResult<()> {
    sqlx::query("DELETE FROM dish_dish_types WHERE dish_id = $1")
        .bind(dish_id)
        .execute(&mut **transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to clear dish types: {error}")))?;

    let dish_type_ids: Vec<i64> = dish_type_ids.iter().map(DishTypeId::as_i64).collect();
    sqlx::query(
        r#"
        INSERT INTO dish_dish_types (dish_id, dish_type_id)
        SELECT $1, dish_type_id
        FROM UNNEST($2::BIGINT[]) AS dish_type_id
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(dish_id)
    .bind(dish_type_ids)
    .execute(&mut **transaction)
    .await
    .map_err(|error| dish_write_error(error, "attach dish types"))?;

    Ok(())
}

fn dish_write_error(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error {
        match database_error.code().as_deref() {
            Some("23505") => {
                return AppError::Conflict("a dish with this name already exists".to_owned());
            }
            Some("23503") => {
                return AppError::NotFound(
                    "referenced owner, label or dish type does not exist".to_owned(),
                );
            }
            _ => {}
        }
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
