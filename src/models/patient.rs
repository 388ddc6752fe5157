//! Patient model

use crate::query::SortKey;
use crate::store::{Persist, Record};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

/// A registered patient.
///
/// `registered_at` is assigned by the database on insert and never written
/// by the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Patient {
    pub patient_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: String,
    pub registered_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PatientSort {
    #[default]
    Id,
    FirstName,
    LastName,
    RegisteredAt,
}

impl SortKey for PatientSort {
    fn column(&self) -> &'static str {
        match self {
            PatientSort::Id => "patient_id",
            PatientSort::FirstName => "first_name",
            PatientSort::LastName => "last_name",
            PatientSort::RegisteredAt => "registered_at",
        }
    }
}

impl Record for Patient {
    type Sort = PatientSort;

    fn table_name() -> &'static str {
        "patients"
    }

    fn id_column() -> &'static str {
        "patient_id"
    }

    fn search_columns() -> &'static [&'static str] {
        &["first_name", "last_name", "email", "phone"]
    }

    fn id(&self) -> Option<i64> {
        self.patient_id
    }
}

#[async_trait]
impl Persist for Patient {
    async fn insert(&self, pool: &MySqlPool) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO patients (first_name, last_name, email, phone, date_of_birth, address) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&self.first_name)
        .bind(&self.last_name)
        .bind(&self.email)
        .bind(&self.phone)
        .bind(self.date_of_birth)
        .bind(&self.address)
        .execute(pool)
        .await?;
        Ok(result.last_insert_id() as i64)
    }

    async fn update(&self, pool: &MySqlPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE patients SET first_name = ?, last_name = ?, email = ?, phone = ?, \
             date_of_birth = ?, address = ? WHERE patient_id = ?",
        )
        .bind(&self.first_name)
        .bind(&self.last_name)
        .bind(&self.email)
        .bind(&self.phone)
        .bind(self.date_of_birth)
        .bind(&self.address)
        .bind(self.patient_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
