//! Quest repository.

use crate::error::AppError;
use crate::models::{touch, NewQuest, Quest, QuestPatch, QuestSearch};
use crate::service::CrudService;
use crate::sql::{self, Filter, Page, Sort, SqlValue, TableDef};
use sqlx::SqlitePool;

pub const QUESTS: TableDef = TableDef {
    name: "quests",
    columns: &[
        "id",
        "title",
        "description",
        "difficulty",
        "reward_gold",
        "reward_xp",
        "min_level",
        "start_date",
        "end_date",
        "is_active",
        "created_at",
        "updated_at",
    ],
    sortable: &[
        "id",
        "title",
        "difficulty",
        "reward_gold",
        "reward_xp",
        "min_level",
        "start_date",
        "end_date",
        "created_at",
    ],
};

fn columns(quest: &Quest) -> Vec<(&'static str, SqlValue)> {
    vec![
        ("title", quest.title.as_str().into()),
        ("description", quest.description.as_str().into()),
        ("difficulty", quest.difficulty.as_str().into()),
        ("reward_gold", quest.reward_gold.into()),
        ("reward_xp", quest.reward_xp.into()),
        ("min_level", quest.min_level.into()),
        ("start_date", quest.start_date.into()),
        ("end_date", quest.end_date.into()),
        ("is_active", quest.is_active.into()),
        ("updated_at", quest.updated_at.into()),
    ]
}

#[derive(Clone)]
pub struct QuestRepository {
    pool: SqlitePool,
}

impl QuestRepository {
    pub fn new(pool: SqlitePool) -> Self {
        QuestRepository { pool }
    }

    pub async fn find_all(
        &self,
        page: Page,
        sort_field: Option<&str>,
        sort_order: Option<&str>,
    ) -> Result<Vec<Quest>, AppError> {
        let sort = Sort::resolve(&QUESTS, sort_field, sort_order);
        let q = sql::select_page(&QUESTS, &[], sort, page);
        CrudService::fetch_all(&self.pool, &q).await
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        CrudService::scalar(&self.pool, &sql::count(&QUESTS, &[])).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Quest>, AppError> {
        CrudService::fetch_optional(&self.pool, &sql::select_by_id(&QUESTS, id)).await
    }

    pub async fn search(&self, criteria: &QuestSearch) -> Result<Vec<Quest>, AppError> {
        let mut filters = Vec::new();
        if let Some(title) = &criteria.title {
            filters.push(Filter::Contains("title", title.clone()));
        }
        if let Some(difficulty) = &criteria.difficulty {
            filters.push(Filter::Equals("difficulty", difficulty.as_str().into()));
        }
        if let Some(min) = criteria.min_reward {
            filters.push(Filter::AtLeast("reward_gold", min.into()));
        }
        if criteria.active_only {
            filters.push(Filter::IsTrue("is_active"));
        }
        let q = sql::select_page(&QUESTS, &filters, Sort::by_id(), criteria.page);
        CrudService::fetch_all(&self.pool, &q).await
    }

    pub async fn create(&self, new: &NewQuest) -> Result<Quest, AppError> {
        let now = crate::models::now();
        let q = sql::insert(
            &QUESTS,
            &[
                ("title", new.title.as_str().into()),
                ("description", new.description.as_str().into()),
                ("difficulty", new.difficulty.as_str().into()),
                ("reward_gold", new.reward_gold.into()),
                ("reward_xp", new.reward_xp.into()),
                ("min_level", new.min_level.into()),
                ("start_date", new.start_date.into()),
                ("end_date", new.end_date.into()),
                ("is_active", new.is_active.into()),
                ("created_at", now.into()),
                ("updated_at", now.into()),
            ],
        );
        let quest: Quest = CrudService::fetch_optional(&self.pool, &q)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))?;
        tracing::info!(quest_id = quest.id, title = %quest.title, "quest created");
        Ok(quest)
    }

    /// Merge `patch` onto the stored quest. The date rule is checked on the merged record.
    pub async fn update(&self, id: i64, patch: QuestPatch) -> Result<Option<Quest>, AppError> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let merged = patch.apply(&existing, touch(existing.updated_at));
        if let Some(violation) = merged.date_violation() {
            return Err(AppError::Validation(vec![violation]));
        }
        let q = sql::update(&QUESTS, id, &columns(&merged));
        CrudService::fetch_optional(&self.pool, &q).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let removed = CrudService::execute(&self.pool, &sql::delete(&QUESTS, id)).await?;
        Ok(removed > 0)
    }
}
