//! Item repository. Writes that change what a hero carries go through `InventoryService`.

use crate::error::AppError;
use crate::models::{touch, Item, ItemPatch, ItemSearch, NewItem};
use crate::service::CrudService;
use crate::sql::{self, Filter, Page, Sort, SqlValue, TableDef};
use sqlx::SqlitePool;

pub const ITEMS: TableDef = TableDef {
    name: "items",
    columns: &[
        "id",
        "name",
        "type",
        "damage",
        "weight",
        "rarity",
        "hero_id",
        "created_at",
        "updated_at",
    ],
    sortable: &["id", "name", "type", "damage", "weight", "rarity", "created_at"],
};

fn columns(item: &Item) -> Vec<(&'static str, SqlValue)> {
    vec![
        ("name", item.name.as_str().into()),
        ("type", item.item_type.as_str().into()),
        ("damage", item.damage.into()),
        ("weight", item.weight.into()),
        ("rarity", item.rarity.clone().into()),
        ("hero_id", item.hero_id.into()),
        ("updated_at", item.updated_at.into()),
    ]
}

#[derive(Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    pub async fn find_all(
        &self,
        page: Page,
        sort_field: Option<&str>,
        sort_order: Option<&str>,
    ) -> Result<Vec<Item>, AppError> {
        let sort = Sort::resolve(&ITEMS, sort_field, sort_order);
        let q = sql::select_page(&ITEMS, &[], sort, page);
        CrudService::fetch_all(&self.pool, &q).await
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        CrudService::scalar(&self.pool, &sql::count(&ITEMS, &[])).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Item>, AppError> {
        CrudService::fetch_optional(&self.pool, &sql::select_by_id(&ITEMS, id)).await
    }

    /// Items owned by a hero, in id order.
    pub async fn find_by_hero(&self, hero_id: i64) -> Result<Vec<Item>, AppError> {
        let q = sql::select_all(&ITEMS, &[Filter::Equals("hero_id", hero_id.into())]);
        CrudService::fetch_all(&self.pool, &q).await
    }

    /// Sum of weights a hero carries, optionally leaving one item out.
    pub async fn total_weight_for_hero(
        &self,
        hero_id: i64,
        excluding: Option<i64>,
    ) -> Result<i64, AppError> {
        let mut filters = vec![Filter::Equals("hero_id", hero_id.into())];
        if let Some(item_id) = excluding {
            filters.push(Filter::NotEquals("id", item_id.into()));
        }
        CrudService::scalar(&self.pool, &sql::sum(&ITEMS, "weight", &filters)).await
    }

    pub async fn search(&self, criteria: &ItemSearch) -> Result<Vec<Item>, AppError> {
        let mut filters = Vec::new();
        if let Some(item_type) = &criteria.item_type {
            filters.push(Filter::Contains("type", item_type.clone()));
        }
        let q = sql::select_page(&ITEMS, &filters, Sort::by_id(), criteria.page);
        CrudService::fetch_all(&self.pool, &q).await
    }

    pub async fn create(&self, new: &NewItem) -> Result<Item, AppError> {
        let now = crate::models::now();
        let q = sql::insert(
            &ITEMS,
            &[
                ("name", new.name.as_str().into()),
                ("type", new.item_type.as_str().into()),
                ("damage", new.damage.into()),
                ("weight", new.weight.into()),
                ("rarity", new.rarity.clone().into()),
                ("hero_id", new.hero_id.into()),
                ("created_at", now.into()),
                ("updated_at", now.into()),
            ],
        );
        let item: Item = CrudService::fetch_optional(&self.pool, &q)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))?;
        tracing::info!(item_id = item.id, hero_id = ?item.hero_id, "item created");
        Ok(item)
    }

    pub async fn update(&self, id: i64, patch: ItemPatch) -> Result<Option<Item>, AppError> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let merged = patch.apply(&existing, touch(existing.updated_at));
        let q = sql::update(&ITEMS, id, &columns(&merged));
        CrudService::fetch_optional(&self.pool, &q).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let removed = CrudService::execute(&self.pool, &sql::delete(&ITEMS, id)).await?;
        Ok(removed > 0)
    }
}
