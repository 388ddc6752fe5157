//! Patient feedback model

use crate::query::SortKey;
use crate::store::{Persist, Record};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

/// Feedback a patient left for a doctor.
///
/// `submitted_at` is assigned by the database on insert. The 1-5 rating
/// range is a UI convention and is not enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PatientFeedback {
    pub feedback_id: Option<i64>,
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub rating: i32,
    pub comments: String,
    pub submitted_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeedbackSort {
    #[default]
    Id,
    Rating,
    SubmittedAt,
}

impl SortKey for FeedbackSort {
    fn column(&self) -> &'static str {
        match self {
            FeedbackSort::Id => "feedback_id",
            FeedbackSort::Rating => "rating",
            FeedbackSort::SubmittedAt => "submitted_at",
        }
    }
}

impl Record for PatientFeedback {
    type Sort = FeedbackSort;

    fn table_name() -> &'static str {
        "patient_feedback"
    }

    fn id_column() -> &'static str {
        "feedback_id"
    }

    fn search_columns() -> &'static [&'static str] {
        &["comments"]
    }

    fn id(&self) -> Option<i64> {
        self.feedback_id
    }
}

#[async_trait]
impl Persist for PatientFeedback {
    async fn insert(&self, pool: &MySqlPool) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO patient_feedback (patient_id, doctor_id, rating, comments) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(self.patient_id)
        .bind(self.doctor_id)
        .bind(self.rating)
        .bind(&self.comments)
        .execute(pool)
        .await?;
        Ok(result.last_insert_id() as i64)
    }

    async fn update(&self, pool: &MySqlPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE patient_feedback SET patient_id = ?, doctor_id = ?, rating = ?, \
             comments = ? WHERE feedback_id = ?",
        )
        .bind(self.patient_id)
        .bind(self.doctor_id)
        .bind(self.rating)
        .bind(&self.comments)
        .bind(self.feedback_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
