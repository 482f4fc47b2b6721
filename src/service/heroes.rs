//! Hero repository.

use crate::error::AppError;
use crate::models::{touch, Hero, HeroPatch, HeroSearch, NewHero};
use crate::service::CrudService;
use crate::sql::{self, Filter, Page, Sort, SqlValue, TableDef};
use sqlx::SqlitePool;

pub const HEROES: TableDef = TableDef {
    name: "heroes",
    columns: &[
        "id",
        "name",
        "class",
        "level",
        "health",
        "mana",
        "strength",
        "intelligence",
        "created_at",
        "updated_at",
    ],
    sortable: &[
        "id",
        "name",
        "class",
        "level",
        "health",
        "strength",
        "intelligence",
        "created_at",
    ],
};

fn columns(hero: &Hero) -> Vec<(&'static str, SqlValue)> {
    vec![
        ("name", hero.name.as_str().into()),
        ("class", hero.class.as_str().into()),
        ("level", hero.level.into()),
        ("health", hero.health.into()),
        ("mana", hero.mana.into()),
        ("strength", hero.strength.into()),
        ("intelligence", hero.intelligence.into()),
        ("updated_at", hero.updated_at.into()),
    ]
}

#[derive(Clone)]
pub struct HeroRepository {
    pool: SqlitePool,
}

impl HeroRepository {
    pub fn new(pool: SqlitePool) -> Self {
        HeroRepository { pool }
    }

    /// Page of heroes ordered by an allow-listed field (anything else sorts by id).
    pub async fn find_all(
        &self,
        page: Page,
        sort_field: Option<&str>,
        sort_order: Option<&str>,
    ) -> Result<Vec<Hero>, AppError> {
        let sort = Sort::resolve(&HEROES, sort_field, sort_order);
        let q = sql::select_page(&HEROES, &[], sort, page);
        CrudService::fetch_all(&self.pool, &q).await
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        CrudService::scalar(&self.pool, &sql::count(&HEROES, &[])).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Hero>, AppError> {
        CrudService::fetch_optional(&self.pool, &sql::select_by_id(&HEROES, id)).await
    }

    pub async fn search(&self, criteria: &HeroSearch) -> Result<Vec<Hero>, AppError> {
        let mut filters = Vec::new();
        if let Some(name) = &criteria.name {
            filters.push(Filter::Contains("name", name.clone()));
        }
        if let Some(class) = &criteria.class {
            filters.push(Filter::Equals("class", class.as_str().into()));
        }
        if let Some(min) = criteria.min_level {
            filters.push(Filter::AtLeast("level", min.into()));
        }
        if let Some(max) = criteria.max_level {
            filters.push(Filter::AtMost("level", max.into()));
        }
        let q = sql::select_page(&HEROES, &filters, Sort::by_id(), criteria.page);
        CrudService::fetch_all(&self.pool, &q).await
    }

    pub async fn create(&self, new: &NewHero) -> Result<Hero, AppError> {
        let now = crate::models::now();
        let q = sql::insert(
            &HEROES,
            &[
                ("name", new.name.as_str().into()),
                ("class", new.class.as_str().into()),
                ("level", new.level.into()),
                ("health", new.health.into()),
                ("mana", new.mana.into()),
                ("strength", new.strength.into()),
                ("intelligence", new.intelligence.into()),
                ("created_at", now.into()),
                ("updated_at", now.into()),
            ],
        );
        let hero: Hero = CrudService::fetch_optional(&self.pool, &q)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))?;
        tracing::info!(hero_id = hero.id, name = %hero.name, "hero created");
        Ok(hero)
    }

    /// Merge `patch` onto the stored hero. None when the id does not exist.
    pub async fn update(&self, id: i64, patch: HeroPatch) -> Result<Option<Hero>, AppError> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let merged = patch.apply(&existing, touch(existing.updated_at));
        let q = sql::update(&HEROES, id, &columns(&merged));
        CrudService::fetch_optional(&self.pool, &q).await
    }

    /// True iff a row existed and was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let removed = CrudService::execute(&self.pool, &sql::delete(&HEROES, id)).await?;
        Ok(removed > 0)
    }
}
