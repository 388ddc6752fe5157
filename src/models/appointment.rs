//! Appointment model

use crate::query::SortKey;
use crate::store::{Persist, Record};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

/// A scheduled appointment between a patient and a doctor.
///
/// The `(patient_id, doctor_id, scheduled_at)` triple is unique, so the
/// same slot cannot be double-booked; the store reports that as a
/// constraint error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Appointment {
    pub appointment_id: Option<i64>,
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub scheduled_at: Option<NaiveDateTime>,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppointmentSort {
    #[default]
    Id,
    ScheduledAt,
}

impl SortKey for AppointmentSort {
    fn column(&self) -> &'static str {
        match self {
            AppointmentSort::Id => "appointment_id",
            AppointmentSort::ScheduledAt => "scheduled_at",
        }
    }
}

impl Record for Appointment {
    type Sort = AppointmentSort;

    fn table_name() -> &'static str {
        "appointments"
    }

    fn id_column() -> &'static str {
        "appointment_id"
    }

    fn search_columns() -> &'static [&'static str] {
        &["reason"]
    }

    fn id(&self) -> Option<i64> {
        self.appointment_id
    }
}

#[async_trait]
impl Persist for Appointment {
    async fn insert(&self, pool: &MySqlPool) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO appointments (patient_id, doctor_id, scheduled_at, reason) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(self.patient_id)
        .bind(self.doctor_id)
        .bind(self.scheduled_at)
        .bind(&self.reason)
        .execute(pool)
        .await?;
        Ok(result.last_insert_id() as i64)
    }

    async fn update(&self, pool: &MySqlPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE appointments SET patient_id = ?, doctor_id = ?, scheduled_at = ?, \
             reason = ? WHERE appointment_id = ?",
        )
        .bind(self.patient_id)
        .bind(self.doctor_id)
        .bind(self.scheduled_at)
        .bind(&self.reason)
        .bind(self.appointment_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
