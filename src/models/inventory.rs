//! Medical inventory model

use crate::query::SortKey;
use crate::store::{Persist, Record};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

/// A stocked inventory item (medication or supply)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MedicalInventory {
    pub inventory_id: Option<i64>,
    pub name: String,
    pub item_type: String,
    pub quantity: i32,
    pub unit: String,
    pub expiry_date: Option<NaiveDate>,
    pub cost: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InventorySort {
    #[default]
    Id,
    Name,
    Quantity,
    ExpiryDate,
}

impl SortKey for InventorySort {
    fn column(&self) -> &'static str {
        match self {
            InventorySort::Id => "inventory_id",
            InventorySort::Name => "name",
            InventorySort::Quantity => "quantity",
            InventorySort::ExpiryDate => "expiry_date",
        }
    }
}

impl Record for MedicalInventory {
    type Sort = InventorySort;

    fn table_name() -> &'static str {
        "medical_inventory"
    }

    fn id_column() -> &'static str {
        "inventory_id"
    }

    fn search_columns() -> &'static [&'static str] {
        &["name", "item_type", "unit"]
    }

    fn id(&self) -> Option<i64> {
        self.inventory_id
    }
}

#[async_trait]
impl Persist for MedicalInventory {
    async fn insert(&self, pool: &MySqlPool) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO medical_inventory (name, item_type, quantity, unit, expiry_date, cost) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&self.name)
        .bind(&self.item_type)
        .bind(self.quantity)
        .bind(&self.unit)
        .bind(self.expiry_date)
        .bind(self.cost)
        .execute(pool)
        .await?;
        Ok(result.last_insert_id() as i64)
    }

    async fn update(&self, pool: &MySqlPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE medical_inventory SET name = ?, item_type = ?, quantity = ?, unit = ?, \
             expiry_date = ?, cost = ? WHERE inventory_id = ?",
        )
        .bind(&self.name)
        .bind(&self.item_type)
        .bind(self.quantity)
        .bind(&self.unit)
        .bind(self.expiry_date)
        .bind(self.cost)
        .bind(self.inventory_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
