pub mod enums;
pub mod patient;
pub mod record;

pub use enums::*;
pub use patient::{Condition, PatientProfile, Treatment};
pub use record::{ClinicalNote, Contact, LabReport, Medicine, Prescription, Record, Vaccination, Visit};
