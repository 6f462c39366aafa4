//! Scheduling configuration.
//!
//! Holds the specialty table and the defaults used to fill in a partial
//! input record. Built once per process and passed by reference into every
//! component; nothing in the crate keeps global state.

use crate::models::{Doctor, Patient, SpecialtyTable};

/// Immutable configuration shared by all scheduling components.
///
/// # Example
///
/// ```
/// use u_ward::config::SchedulingConfig;
///
/// let config = SchedulingConfig::default().with_default_urgency(7);
/// assert_eq!(config.default_urgency, 7);
/// assert_eq!(config.default_doctor(0).name, "Dr. 1");
/// ```
#[derive(Debug, Clone)]
pub struct SchedulingConfig {
    /// Specialty compatibility table.
    pub specialties: SpecialtyTable,
    /// Doctor count when the record omits `Doctors` (default: 3).
    pub default_doctors: usize,
    /// Patient count when the record omits `Patients` (default: 6).
    pub default_patients: usize,
    /// Bed count when the record omits `Beds` (default: 4).
    pub default_beds: usize,
    /// Specialty of synthesized doctors (default: "General").
    pub default_specialty: String,
    /// Disease of synthesized patients (default: "Fever").
    pub default_disease: String,
    /// Age of synthesized patients (default: 30).
    pub default_age: u32,
    /// Urgency for patients without one (default: 5).
    pub default_urgency: i32,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            specialties: SpecialtyTable::standard(),
            default_doctors: 3,
            default_patients: 6,
            default_beds: 4,
            default_specialty: "General".to_string(),
            default_disease: "Fever".to_string(),
            default_age: 30,
            default_urgency: 5,
        }
    }
}

impl SchedulingConfig {
    /// Replaces the specialty table.
    pub fn with_specialties(mut self, specialties: SpecialtyTable) -> Self {
        self.specialties = specialties;
        self
    }

    /// Sets the urgency for patients without one.
    pub fn with_default_urgency(mut self, urgency: i32) -> Self {
        self.default_urgency = urgency;
        self
    }

    /// Sets the specialty of synthesized doctors.
    pub fn with_default_specialty(mut self, specialty: impl Into<String>) -> Self {
        self.default_specialty = specialty.into();
        self
    }

    /// Sets the disease of synthesized patients.
    pub fn with_default_disease(mut self, disease: impl Into<String>) -> Self {
        self.default_disease = disease.into();
        self
    }

    /// Synthesized doctor for roster position `index`.
    pub fn default_doctor(&self, index: usize) -> Doctor {
        Doctor::placeholder(index, self.default_specialty.as_str())
    }

    /// Synthesized patient for position `index`.
    pub fn default_patient(&self, index: usize) -> Patient {
        Patient::placeholder(index, self.default_disease.as_str())
            .with_age(self.default_age)
            .with_urgency(self.default_urgency)
    }
}
