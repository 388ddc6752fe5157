//! Entity models
//!
//! One module per table. Each model carries its column metadata
//! ([`crate::store::Record`]), its write SQL ([`crate::store::Persist`]),
//! and its allow-listed sort columns.

mod appointment;
mod department;
mod doctor;
mod feedback;
mod inventory;
mod patient;
mod prescription;

pub use appointment::{Appointment, AppointmentSort};
pub use department::{Department, DepartmentSort};
pub use doctor::{Doctor, DoctorSort};
pub use feedback::{FeedbackSort, PatientFeedback};
pub use inventory::{InventorySort, MedicalInventory};
pub use patient::{Patient, PatientSort};
pub use prescription::{Prescription, PrescriptionItem, PrescriptionSort};
