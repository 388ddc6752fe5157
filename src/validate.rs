//! Input validation
//!
//! This module provides the per-entity validation rules. Validators are
//! pure, run their rules in a fixed order, and stop at the first failure.

use crate::models::{
    Appointment, Department, Doctor, MedicalInventory, Patient, PatientFeedback, Prescription,
    PrescriptionItem,
};
use chrono::Local;

/// Outcome of validating a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Invalid(String),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }

    /// The failure message, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            Validation::Valid => None,
            Validation::Invalid(message) => Some(message),
        }
    }
}

/// Capability of checking a model before it is persisted
pub trait Validate {
    fn validate(&self) -> Validation;
}

fn invalid(message: &str) -> Validation {
    Validation::Invalid(message.to_string())
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Character count check, so multi-byte input is measured the way VARCHAR
/// columns measure it
fn too_long(value: &str, max: usize) -> bool {
    value.chars().count() > max
}

fn missing_ref(id: Option<i64>) -> bool {
    !matches!(id, Some(n) if n > 0)
}

impl Validate for Doctor {
    fn validate(&self) -> Validation {
        if is_blank(&self.first_name) {
            return invalid("First name is required");
        }
        if too_long(&self.first_name, 100) {
            return invalid("First name must not exceed 100 characters");
        }
        if is_blank(&self.last_name) {
            return invalid("Last name is required");
        }
        if too_long(&self.last_name, 100) {
            return invalid("Last name must not exceed 100 characters");
        }
        if is_blank(&self.email) {
            return invalid("Email is required");
        }
        if !self.email.contains('@') {
            return invalid("Email must be a valid address");
        }
        if is_blank(&self.phone) {
            return invalid("Phone is required");
        }
        if too_long(&self.phone, 20) {
            return invalid("Phone must not exceed 20 characters");
        }
        Validation::Valid
    }
}

impl Validate for Patient {
    fn validate(&self) -> Validation {
        if is_blank(&self.first_name) {
            return invalid("First name is required");
        }
        if too_long(&self.first_name, 100) {
            return invalid("First name must not exceed 100 characters");
        }
        if is_blank(&self.last_name) {
            return invalid("Last name is required");
        }
        if too_long(&self.last_name, 100) {
            return invalid("Last name must not exceed 100 characters");
        }
        if is_blank(&self.email) {
            return invalid("Email is required");
        }
        if !self.email.contains('@') {
            return invalid("Email must be a valid address");
        }
        if is_blank(&self.phone) {
            return invalid("Phone is required");
        }
        if too_long(&self.phone, 20) {
            return invalid("Phone must not exceed 20 characters");
        }
        let Some(date_of_birth) = self.date_of_birth else {
            return invalid("Date of birth is required");
        };
        if date_of_birth > Local::now().date_naive() {
            return invalid("Date of birth must not be in the future");
        }
        if too_long(&self.address, 255) {
            return invalid("Address must not exceed 255 characters");
        }
        Validation::Valid
    }
}

impl Validate for Department {
    fn validate(&self) -> Validation {
        if is_blank(&self.name) {
            return invalid("Department name is required");
        }
        if too_long(&self.name, 100) {
            return invalid("Department name must not exceed 100 characters");
        }
        if is_blank(&self.phone) {
            return invalid("Phone is required");
        }
        if too_long(&self.phone, 20) {
            return invalid("Phone must not exceed 20 characters");
        }
        Validation::Valid
    }
}

impl Validate for Appointment {
    fn validate(&self) -> Validation {
        if missing_ref(self.patient_id) {
            return invalid("A patient must be selected");
        }
        if missing_ref(self.doctor_id) {
            return invalid("A doctor must be selected");
        }
        let Some(scheduled_at) = self.scheduled_at else {
            return invalid("Appointment date and time are required");
        };
        // Same-day appointments are allowed; only earlier calendar dates
        // are rejected
        if scheduled_at.date() < Local::now().date_naive() {
            return invalid("Appointment date must not be in the past");
        }
        if is_blank(&self.reason) {
            return invalid("Reason is required");
        }
        if too_long(&self.reason, 255) {
            return invalid("Reason must not exceed 255 characters");
        }
        Validation::Valid
    }
}

impl Validate for Prescription {
    fn validate(&self) -> Validation {
        if missing_ref(self.patient_id) {
            return invalid("A patient must be selected");
        }
        if missing_ref(self.doctor_id) {
            return invalid("A doctor must be selected");
        }
        if self.prescribed_on.is_none() {
            return invalid("Prescription date is required");
        }
        Validation::Valid
    }
}

impl Validate for PrescriptionItem {
    fn validate(&self) -> Validation {
        if missing_ref(self.inventory_id) {
            return invalid("An inventory item must be selected");
        }
        if is_blank(&self.dosage) {
            return invalid("Dosage is required");
        }
        if self.duration_days <= 0 {
            return invalid("Duration must be at least one day");
        }
        Validation::Valid
    }
}

impl Validate for MedicalInventory {
    fn validate(&self) -> Validation {
        if is_blank(&self.name) {
            return invalid("Name is required");
        }
        if too_long(&self.name, 100) {
            return invalid("Name must not exceed 100 characters");
        }
        if is_blank(&self.item_type) {
            return invalid("Item type is required");
        }
        if self.quantity < 0 {
            return invalid("Quantity must not be negative");
        }
        if is_blank(&self.unit) {
            return invalid("Unit is required");
        }
        if self.expiry_date.is_none() {
            return invalid("Expiry date is required");
        }
        if self.cost < 0.0 {
            return invalid("Cost must not be negative");
        }
        Validation::Valid
    }
}

impl Validate for PatientFeedback {
    fn validate(&self) -> Validation {
        if missing_ref(self.patient_id) {
            return invalid("A patient must be selected");
        }
        if missing_ref(self.doctor_id) {
            return invalid("A doctor must be selected");
        }
        Validation::Valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local, NaiveDate};

    fn valid_doctor() -> Doctor {
        Doctor {
            doctor_id: None,
            first_name: "Sarah".to_string(),
            last_name: "Connor".to_string(),
            email: "sarah.connor@hospital.test".to_string(),
            phone: "555-0142".to_string(),
            department_id: Some(1),
        }
    }

    fn valid_patient() -> Patient {
        Patient {
            patient_id: None,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john.doe@example.test".to_string(),
            phone: "555-0199".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1985, 6, 15),
            address: "12 Main Street".to_string(),
            registered_at: None,
        }
    }

    fn valid_appointment() -> Appointment {
        Appointment {
            appointment_id: None,
            patient_id: Some(1),
            doctor_id: Some(2),
            scheduled_at: Some(
                Local::now().date_naive().and_hms_opt(9, 30, 0).unwrap(),
            ),
            reason: "Routine checkup".to_string(),
        }
    }

    fn valid_inventory() -> MedicalInventory {
        MedicalInventory {
            inventory_id: None,
            name: "Ibuprofen".to_string(),
            item_type: "Medication".to_string(),
            quantity: 120,
            unit: "tablet".to_string(),
            expiry_date: NaiveDate::from_ymd_opt(2030, 1, 1),
            cost: 0.12,
        }
    }

    // ========================================
    // Appointment Rule Order
    // ========================================

    #[test]
    fn appointment_reports_the_first_failing_rule() {
        // Both the patient reference and the reason are invalid; the
        // patient rule runs first
        let mut appointment = valid_appointment();
        appointment.patient_id = None;
        appointment.reason = String::new();

        assert_eq!(
            appointment.validate(),
            Validation::Invalid("A patient must be selected".to_string())
        );

        appointment.patient_id = Some(1);
        assert_eq!(
            appointment.validate(),
            Validation::Invalid("Reason is required".to_string())
        );
    }

    #[test]
    fn appointment_rejects_non_positive_references() {
        let mut appointment = valid_appointment();
        appointment.doctor_id = Some(0);
        assert_eq!(
            appointment.validate(),
            Validation::Invalid("A doctor must be selected".to_string())
        );
    }

    #[test]
    fn appointment_today_is_allowed() {
        let mut appointment = valid_appointment();
        appointment.scheduled_at = Some(
            Local::now().date_naive().and_hms_opt(0, 0, 0).unwrap(),
        );
        assert!(appointment.validate().is_valid());
    }

    #[test]
    fn appointment_yesterday_is_rejected() {
        let mut appointment = valid_appointment();
        let yesterday = Local::now().date_naive() - Duration::days(1);
        appointment.scheduled_at = Some(yesterday.and_hms_opt(9, 0, 0).unwrap());
        assert_eq!(
            appointment.validate(),
            Validation::Invalid("Appointment date must not be in the past".to_string())
        );
    }

    #[test]
    fn appointment_missing_date_is_rejected_before_reason() {
        let mut appointment = valid_appointment();
        appointment.scheduled_at = None;
        appointment.reason = String::new();
        assert_eq!(
            appointment.validate(),
            Validation::Invalid("Appointment date and time are required".to_string())
        );
    }

    #[test]
    fn reason_boundary_at_255_characters() {
        let mut appointment = valid_appointment();

        appointment.reason = "r".repeat(255);
        assert!(appointment.validate().is_valid());

        appointment.reason = "r".repeat(256);
        assert_eq!(
            appointment.validate(),
            Validation::Invalid("Reason must not exceed 255 characters".to_string())
        );
    }

    #[test]
    fn reason_length_counts_characters_not_bytes() {
        let mut appointment = valid_appointment();
        // 255 two-byte characters stay within a VARCHAR(255)
        appointment.reason = "é".repeat(255);
        assert!(appointment.validate().is_valid());
    }

    // ========================================
    // Doctor and Patient
    // ========================================

    #[test]
    fn valid_doctor_passes() {
        assert!(valid_doctor().validate().is_valid());
    }

    #[test]
    fn doctor_blank_first_name_is_rejected() {
        let mut doctor = valid_doctor();
        doctor.first_name = "   ".to_string();
        assert_eq!(
            doctor.validate(),
            Validation::Invalid("First name is required".to_string())
        );
    }

    #[test]
    fn doctor_email_must_contain_at_sign() {
        let mut doctor = valid_doctor();
        doctor.email = "not-an-address".to_string();
        assert_eq!(
            doctor.validate(),
            Validation::Invalid("Email must be a valid address".to_string())
        );
    }

    #[test]
    fn doctor_without_department_is_valid() {
        let mut doctor = valid_doctor();
        doctor.department_id = None;
        assert!(doctor.validate().is_valid());
    }

    #[test]
    fn patient_future_birth_date_is_rejected() {
        let mut patient = valid_patient();
        patient.date_of_birth = Some(Local::now().date_naive() + Duration::days(1));
        assert_eq!(
            patient.validate(),
            Validation::Invalid("Date of birth must not be in the future".to_string())
        );
    }

    #[test]
    fn patient_empty_address_is_allowed() {
        let mut patient = valid_patient();
        patient.address = String::new();
        assert!(patient.validate().is_valid());
    }

    // ========================================
    // Remaining Entities
    // ========================================

    #[test]
    fn department_requires_name_then_phone() {
        let department = Department {
            department_id: None,
            name: String::new(),
            phone: String::new(),
        };
        assert_eq!(
            department.validate(),
            Validation::Invalid("Department name is required".to_string())
        );
    }

    #[test]
    fn prescription_requires_a_date() {
        let prescription = Prescription {
            prescription_id: None,
            patient_id: Some(1),
            doctor_id: Some(1),
            prescribed_on: None,
            notes: String::new(),
        };
        assert_eq!(
            prescription.validate(),
            Validation::Invalid("Prescription date is required".to_string())
        );
    }

    #[test]
    fn prescription_item_duration_must_be_positive() {
        let item = PrescriptionItem {
            item_id: None,
            prescription_id: None,
            inventory_id: Some(3),
            dosage: "200mg twice daily".to_string(),
            duration_days: 0,
        };
        assert_eq!(
            item.validate(),
            Validation::Invalid("Duration must be at least one day".to_string())
        );
    }

    #[test]
    fn inventory_negative_quantity_is_rejected() {
        let mut inventory = valid_inventory();
        inventory.quantity = -1;
        assert_eq!(
            inventory.validate(),
            Validation::Invalid("Quantity must not be negative".to_string())
        );
    }

    #[test]
    fn inventory_zero_cost_is_allowed() {
        let mut inventory = valid_inventory();
        inventory.cost = 0.0;
        assert!(inventory.validate().is_valid());
    }

    #[test]
    fn feedback_rating_is_not_validated() {
        // Rating range is a UI convention, not a rule enforced here
        let feedback = PatientFeedback {
            feedback_id: None,
            patient_id: Some(1),
            doctor_id: Some(1),
            rating: 99,
            comments: String::new(),
            submitted_at: None,
        };
        assert!(feedback.validate().is_valid());
    }

    #[test]
    fn feedback_requires_both_references() {
        let feedback = PatientFeedback {
            feedback_id: None,
            patient_id: Some(-4),
            doctor_id: Some(1),
            rating: 4,
            comments: String::new(),
            submitted_at: None,
        };
        assert_eq!(
            feedback.validate(),
            Validation::Invalid("A patient must be selected".to_string())
        );
    }
}
