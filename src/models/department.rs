//! Department model

use crate::query::SortKey;
use crate::store::{Persist, Record};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

/// A hospital department
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Department {
    pub department_id: Option<i64>,
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DepartmentSort {
    #[default]
    Id,
    Name,
}

impl SortKey for DepartmentSort {
    fn column(&self) -> &'static str {
        match self {
            DepartmentSort::Id => "department_id",
            DepartmentSort::Name => "name",
        }
    }
}

impl Record for Department {
    type Sort = DepartmentSort;

    fn table_name() -> &'static str {
        "departments"
    }

    fn id_column() -> &'static str {
        "department_id"
    }

    fn search_columns() -> &'static [&'static str] {
        &["name", "phone"]
    }

    fn id(&self) -> Option<i64> {
        self.department_id
    }
}

#[async_trait]
impl Persist for Department {
    async fn insert(&self, pool: &MySqlPool) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO departments (name, phone) VALUES (?, ?)")
            .bind(&self.name)
            .bind(&self.phone)
            .execute(pool)
            .await?;
        Ok(result.last_insert_id() as i64)
    }

    async fn update(&self, pool: &MySqlPool) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE departments SET name = ?, phone = ? WHERE department_id = ?")
                .bind(&self.name)
                .bind(&self.phone)
                .bind(self.department_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
