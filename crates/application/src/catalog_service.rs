use std::collections::BTreeSet;
use std::sync::Arc;

use dishpicker_core::{AppError, AppResult};
use dishpicker_domain::{DishType, DishTypeId, Label, LabelId};

use crate::dish_ports::CatalogRepository;

/// Application service for the fixed label and dish type catalog.
#[derive(Clone)]
pub struct CatalogService {
    repository: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    /// Creates a new catalog service.
    #[must_use]
    pub fn new(repository: Arc<dyn CatalogRepository>) -> Self {
        Self { repository }
    }

    /// Lists all labels.
    pub async fn list_labels(&self) -> AppResult<Vec<Label>> {
        self.repository.list_labels().await
    }

    /// Lists all dish types.
    pub async fn list_dish_types(&self) -> AppResult<Vec<DishType>> {
        self.repository.list_dish_types().await
    }

    /// Resolves label ids, failing with `NotFound` for the first unknown id.
    pub async fn resolve_labels(&self, ids: &[LabelId]) -> AppResult<Vec<LabelId>> {
        let requested: BTreeSet<LabelId> = ids.iter().copied().collect();
        if requested.is_empty() {
            return Ok(Vec::new());
        }

        let requested: Vec<LabelId> = requested.into_iter().collect();
        let found: BTreeSet<LabelId> = self
            .repository
            .find_labels(&requested)
            .await?
            .iter()
            .map(Label::id)
            .collect();

        if let Some(missing) = requested.iter().find(|id| !found.contains(id)) {
            return Err(AppError::NotFound(format!("label '{missing}' not found")));
        }

        Ok(requested)
    }

    /// Resolves dish type ids, failing with `NotFound` for the first unknown id.
    pub async fn resolve_dish_types(&self, ids: &[DishTypeId]) -> AppResult<Vec<DishTypeId>> {
        let requested: BTreeSet<DishTypeId> = ids.iter().copied().collect();
        if requested.is_empty() {
            return Ok(Vec::new());
        }

        let requested: Vec<DishTypeId> = requested.into_iter().collect();
        let found: BTreeSet<DishTypeId> = self
            .repository
            .find_dish_types(&requested)
            .await?
            .iter()
            .map(DishType::id)
            .collect();

        if let Some(missing) = requested.iter().find(|id| !found.contains(id)) {
            return Err(AppError::NotFound(format!(
                "dish type '{missing}' not found"
            )));
        }

        Ok(requested)
    }
}
