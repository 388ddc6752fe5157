//! Prescription model and its line items

use crate::errors::{StoreError, classify};
use crate::query::SortKey;
use crate::store::{EntityStore, Persist, Record};
use crate::validate::{Validate, Validation};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlArguments;
use sqlx::{MySql, MySqlPool};

/// A prescription issued by a doctor to a patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Prescription {
    pub prescription_id: Option<i64>,
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub prescribed_on: Option<NaiveDate>,
    pub notes: String,
}

/// One prescribed inventory item and its dosage instructions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PrescriptionItem {
    pub item_id: Option<i64>,
    pub prescription_id: Option<i64>,
    pub inventory_id: Option<i64>,
    pub dosage: String,
    pub duration_days: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrescriptionSort {
    #[default]
    Id,
    PrescribedOn,
}

impl SortKey for PrescriptionSort {
    fn column(&self) -> &'static str {
        match self {
            PrescriptionSort::Id => "prescription_id",
            PrescriptionSort::PrescribedOn => "prescribed_on",
        }
    }
}

impl Record for Prescription {
    type Sort = PrescriptionSort;

    fn table_name() -> &'static str {
        "prescriptions"
    }

    fn id_column() -> &'static str {
        "prescription_id"
    }

    fn search_columns() -> &'static [&'static str] {
        &["notes"]
    }

    fn id(&self) -> Option<i64> {
        self.prescription_id
    }
}

impl Prescription {
    // Shared by the pool-level Persist impl and the transactional save
    fn insert_query(&self) -> sqlx::query::Query<'_, MySql, MySqlArguments> {
        sqlx::query(
            "INSERT INTO prescriptions (patient_id, doctor_id, prescribed_on, notes) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(self.patient_id)
        .bind(self.doctor_id)
        .bind(self.prescribed_on)
        .bind(&self.notes)
    }

    fn update_query(&self) -> sqlx::query::Query<'_, MySql, MySqlArguments> {
        sqlx::query(
            "UPDATE prescriptions SET patient_id = ?, doctor_id = ?, prescribed_on = ?, \
             notes = ? WHERE prescription_id = ?",
        )
        .bind(self.patient_id)
        .bind(self.doctor_id)
        .bind(self.prescribed_on)
        .bind(&self.notes)
        .bind(self.prescription_id)
    }
}

#[async_trait]
impl Persist for Prescription {
    async fn insert(&self, pool: &MySqlPool) -> Result<i64, sqlx::Error> {
        let result = self.insert_query().execute(pool).await?;
        Ok(result.last_insert_id() as i64)
    }

    async fn update(&self, pool: &MySqlPool) -> Result<u64, sqlx::Error> {
        let result = self.update_query().execute(pool).await?;
        Ok(result.rows_affected())
    }
}

impl PrescriptionItem {
    pub(crate) async fn insert_tx(
        &self,
        prescription_id: i64,
        tx: &mut sqlx::Transaction<'_, MySql>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO prescription_items (prescription_id, inventory_id, dosage, duration_days) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(prescription_id)
        .bind(self.inventory_id)
        .bind(&self.dosage)
        .bind(self.duration_days)
        .execute(tx.as_mut())
        .await?;
        Ok(())
    }
}

impl EntityStore<Prescription> {
    /// Save a prescription together with its items in one transaction.
    ///
    /// The prescription and every item are validated first, in order, so
    /// nothing touches the database when any of them is invalid. Existing
    /// items are replaced by the given set.
    pub async fn save_with_items(
        &self,
        prescription: &Prescription,
        items: &[PrescriptionItem],
    ) -> Result<i64, StoreError> {
        if let Validation::Invalid(message) = prescription.validate() {
            return Err(StoreError::Validation(message));
        }
        for item in items {
            if let Validation::Invalid(message) = item.validate() {
                return Err(StoreError::Validation(message));
            }
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| classify("prescriptions", e))?;

        let id = match prescription.prescription_id {
            None => {
                let result = prescription
                    .insert_query()
                    .execute(tx.as_mut())
                    .await
                    .map_err(|e| classify("prescriptions", e))?;
                result.last_insert_id() as i64
            }
            Some(id) => {
                let result = prescription
                    .update_query()
                    .execute(tx.as_mut())
                    .await
                    .map_err(|e| classify("prescriptions", e))?;
                if result.rows_affected() == 0 {
                    // Dropping the transaction rolls it back
                    return Err(StoreError::NotFound {
                        table: "prescriptions",
                        id,
                    });
                }
                id
            }
        };

        sqlx::query("DELETE FROM prescription_items WHERE prescription_id = ?")
            .bind(id)
            .execute(tx.as_mut())
            .await
            .map_err(|e| classify("prescription_items", e))?;

        for item in items {
            item.insert_tx(id, &mut tx)
                .await
                .map_err(|e| classify("prescription_items", e))?;
        }

        tx.commit().await.map_err(|e| classify("prescriptions", e))?;

        tracing::debug!("[SAVE] prescriptions: id {} with {} items", id, items.len());
        self.invalidate().await;
        Ok(id)
    }

    /// Items attached to a prescription, in insertion order
    pub async fn items(&self, prescription_id: i64) -> Result<Vec<PrescriptionItem>, StoreError> {
        sqlx::query_as::<_, PrescriptionItem>(
            "SELECT * FROM prescription_items WHERE prescription_id = ? ORDER BY item_id",
        )
        .bind(prescription_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| classify("prescription_items", e))
    }
}
