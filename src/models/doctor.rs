//! Doctor model

use crate::query::SortKey;
use crate::store::{Persist, Record};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

/// A practicing doctor, optionally attached to a department
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Doctor {
    pub doctor_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub department_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DoctorSort {
    #[default]
    Id,
    FirstName,
    LastName,
    Email,
}

impl SortKey for DoctorSort {
    fn column(&self) -> &'static str {
        match self {
            DoctorSort::Id => "doctor_id",
            DoctorSort::FirstName => "first_name",
            DoctorSort::LastName => "last_name",
            DoctorSort::Email => "email",
        }
    }
}

impl Record for Doctor {
    type Sort = DoctorSort;

    fn table_name() -> &'static str {
        "doctors"
    }

    fn id_column() -> &'static str {
        "doctor_id"
    }

    fn search_columns() -> &'static [&'static str] {
        &["first_name", "last_name", "email", "phone"]
    }

    fn id(&self) -> Option<i64> {
        self.doctor_id
    }
}

#[async_trait]
impl Persist for Doctor {
    async fn insert(&self, pool: &MySqlPool) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO doctors (first_name, last_name, email, phone, department_id) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&self.first_name)
        .bind(&self.last_name)
        .bind(&self.email)
        .bind(&self.phone)
        .bind(self.department_id)
        .execute(pool)
        .await?;
        Ok(result.last_insert_id() as i64)
    }

    async fn update(&self, pool: &MySqlPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE doctors SET first_name = ?, last_name = ?, email = ?, phone = ?, \
             department_id = ? WHERE doctor_id = ?",
        )
        .bind(&self.first_name)
        .bind(&self.last_name)
        .bind(&self.email)
        .bind(&self.phone)
        .bind(self.department_id)
        .bind(self.doctor_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
