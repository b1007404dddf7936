//! PostgreSQL-backed label and dish type catalog.

use async_trait::async_trait;
use sqlx::PgPool;

use dishpicker_application::CatalogRepository;
use dishpicker_core::{AppError, AppResult};
use dishpicker_domain::{DishType, DishTypeId, Label, LabelId};

/// PostgreSQL implementation of the catalog repository port.
#[derive(Clone)]
pub struct PostgresCatalogRepository {
    pool: PgPool,
}

impl PostgresCatalogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a label unless one with the same name exists.
    pub async fn ensure_label(&self, name: &str) -> AppResult<Label> {
        let row = sqlx::query_as::<_, CatalogRow>(
            r#"
            INSERT INTO labels (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to ensure label: {error}")))?;

        Label::new(LabelId::new(row.id), row.name)
    }

    /// Inserts a dish type unless one with the same name exists.
    pub async fn ensure_dish_type(&self, name: &str) -> AppResult<DishType> {
        let row = sqlx::query_as::<_, CatalogRow>(
            r#"
            INSERT INTO dish_types (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to ensure dish type: {error}")))?;

        DishType::new(DishTypeId::new(row.id), row.name)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CatalogRow {
    id: i64,
    name: String,
}

#[async_trait]
impl CatalogRepository for PostgresCatalogRepository {
    async fn list_labels(&self) -> AppResult<Vec<Label>> {
        let rows = sqlx::query_as::<_, CatalogRow>("SELECT id, name FROM labels ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list labels: {error}")))?;

        rows.into_iter()
            .map(|row| Label::new(LabelId::new(row.id), row.name))
            .collect()
    }

    async fn list_dish_types(&self) -> AppResult<Vec<DishType>> {
        let rows = sqlx::query_as::<_, CatalogRow>("SELECT id, name FROM dish_types ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list dish types: {error}")))?;

        rows.into_iter()
            .map(|row| DishType::new(DishTypeId::new(row.id), row.name))
            .collect()
    }

    async fn find_labels(&self, ids: &[LabelId]) -> AppResult<Vec<Label>> {
        let ids: Vec<i64> = ids.iter().map(LabelId::as_i64).collect();
        let rows = sqlx::query_as::<_, CatalogRow>(
            r#"
            SELECT id, name
            FROM labels
            WHERE id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find labels: {error}")))?;

        rows.into_iter()
            .map(|row| Label::new(LabelId::new(row.id), row.name))
            .collect()
    }

    async fn find_dish_types(&self, ids: &[DishTypeId]) -> AppResult<Vec<DishType>> {
        let ids: Vec<i64> = ids.iter().map(DishTypeId::as_i64).collect();
        let rows = sqlx::query_as::<_, CatalogRow>(
            r#"
            SELECT id, name
            FROM dish_types
            WHERE id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find dish types: {error}")))?;

        rows.into_iter()
            .map(|row| DishType::new(DishTypeId::new(row.id), row.name))
            .collect()
    }
}
