//! PostgreSQL-backed storage for finished games.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::warn;

use dishpicker_application::DecisionTreeRepository;
use dishpicker_core::{AppError, AppResult};
use dishpicker_domain::{Decision, DecisionChoice, DecisionTree, DishId, UserId};

/// PostgreSQL implementation of the decision tree repository port.
#[derive(Clone)]
pub struct PostgresDecisionTreeRepository {
    pool: PgPool,
}

impl PostgresDecisionTreeRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TreeRow {
    id: i64,
    user_id: i64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct DecisionRow {
    tree_id: i64,
    position: i32,
    option_one: i64,
    option_two: i64,
    decision: String,
}

impl DecisionRow {
    fn into_decision(self) -> AppResult<Decision> {
        let position = u32::try_from(self.position).map_err(|error| {
            AppError::Internal(format!("stored decision position is invalid: {error}"))
        })?;

        Decision::new(
            position,
            DishId::new(self.option_one),
            DishId::new(self.option_two),
            self.decision.parse::<DecisionChoice>()?,
        )
    }
}

#[async_trait]
impl DecisionTreeRepository for PostgresDecisionTreeRepository {
    async fn create(&self, owner_id: UserId, decisions: Vec<Decision>) -> AppResult<DecisionTree> {
        let size = i32::try_from(decisions.len())
            .map_err(|error| AppError::Validation(format!("too many decisions: {error}")))?;

        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start decision tree transaction: {error}"))
        })?;

        let tree = sqlx::query_as::<_, TreeRow>(
            r#"
            INSERT INTO decision_trees (user_id, size)
            VALUES ($1, $2)
            RETURNING id, user_id, created_at
            "#,
        )
        .bind(owner_id.as_i64())
        .bind(size)
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create decision tree: {error}")))?;

        let mut positions = Vec::with_capacity(decisions.len());
        let mut options_one = Vec::with_capacity(decisions.len());
        let mut options_two = Vec::with_capacity(decisions.len());
        let mut choices = Vec::with_capacity(decisions.len());
        for decision in &decisions {
            positions.push(i32::try_from(decision.position()).map_err(|error| {
                AppError::Validation(format!("decision position out of range: {error}"))
            })?);
            options_one.push(decision.option_one().as_i64());
            options_two.push(decision.option_two().as_i64());
            choices.push(decision.choice().as_str().to_owned());
        }

        sqlx::query(
            r#"
            INSERT INTO decisions (tree_id, position, option_one, option_two, decision)
            SELECT $1, position, option_one, option_two, decision
            FROM UNNEST($2::INTEGER[], $3::BIGINT[], $4::BIGINT[], $5::TEXT[])
                AS input(position, option_one, option_two, decision)
            "#,
        )
        .bind(tree.id)
        .bind(positions)
        .bind(options_one)
        .bind(options_two)
        .bind(choices)
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            if let sqlx::Error::Database(ref database_error) = error
                && database_error.code().as_deref() == Some("23503")
            {
                return AppError::NotFound("a decision references an unknown dish".to_owned());
            }

            AppError::Internal(format!("failed to store decisions: {error}"))
        })?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit decision tree transaction: {error}"))
        })?;

        DecisionTree::new(tree.id, UserId::new(tree.user_id), decisions, tree.created_at)
    }

    async fn list(&self) -> AppResult<Vec<DecisionTree>> {
        let trees = sqlx::query_as::<_, TreeRow>(
            r#"
            SELECT id, user_id, created_at
            FROM decision_trees
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list decision trees: {error}")))?;

        if trees.is_empty() {
            return Ok(Vec::new());
        }

        let tree_ids: Vec<i64> = trees.iter().map(|tree| tree.id).collect();
        let rows = sqlx::query_as::<_, DecisionRow>(
            r#"
            SELECT tree_id, position, option_one, option_two, decision
            FROM decisions
            WHERE tree_id = ANY($1)
            ORDER BY tree_id, position
            "#,
        )
        .bind(tree_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list decisions: {error}")))?;

        let mut decisions: HashMap<i64, Vec<Decision>> = HashMap::new();
        for row in rows {
            let tree_id = row.tree_id;
            decisions
                .entry(tree_id)
                .or_default()
                .push(row.into_decision()?);
        }

        let mut listed = Vec::with_capacity(trees.len());
        for tree in trees {
            match DecisionTree::new(
                tree.id,
                UserId::new(tree.user_id),
                decisions.remove(&tree.id).unwrap_or_default(),
                tree.created_at,
            ) {
                Ok(decision_tree) => listed.push(decision_tree),
                Err(error) => warn!(tree_id = tree.id, %error, "skipping inconsistent decision tree"),
            }
        }

        Ok(listed)
    }
}
