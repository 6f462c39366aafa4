//! Specialty compatibility table.
//!
//! Maps each medical specialty to the set of diseases it treats. The table
//! is ordered: when several specialties treat the same disease, the one
//! declared first is the referral target.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One row of the compatibility table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialtyEntry {
    /// Specialty label (e.g., "Cardiology").
    pub specialty: String,
    /// Disease labels this specialty treats.
    pub diseases: BTreeSet<String>,
}

/// Ordered specialty → diseases mapping.
///
/// Entry order is the referral priority used by
/// [`required_specialty`](Self::required_specialty).
///
/// # Example
///
/// ```
/// use u_ward::models::SpecialtyTable;
///
/// let table = SpecialtyTable::standard();
/// assert_eq!(table.required_specialty("Stroke"), Some("Cardiology"));
/// assert!(table.treats("Neurology", "Stroke"));
/// assert!(!table.is_known("Broken Toe"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecialtyTable {
    entries: Vec<SpecialtyEntry>,
}

impl SpecialtyTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in hospital table.
    pub fn standard() -> Self {
        Self::new()
            .with_specialty("Cardiology", ["Heart Attack", "Stroke", "Hypertension"])
            .with_specialty("Neurology", ["Stroke", "Migraine", "Epilepsy"])
            .with_specialty("Orthopedics", ["Fracture", "Broken Arm", "Arthritis"])
            .with_specialty("Pediatrics", ["Fever", "Infection", "Asthma"])
            .with_specialty("General", ["Fever", "Cold", "Infection", "Diabetes"])
            .with_specialty("Emergency", ["Heart Attack", "Stroke", "Fracture"])
    }

    /// Appends a specialty at the lowest referral priority.
    ///
    /// Re-declaring an existing specialty replaces its disease set and
    /// keeps its original priority slot.
    pub fn with_specialty<I, S>(mut self, specialty: impl Into<String>, diseases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let specialty = specialty.into();
        let diseases: BTreeSet<String> = diseases.into_iter().map(Into::into).collect();
        match self.entries.iter_mut().find(|e| e.specialty == specialty) {
            Some(entry) => entry.diseases = diseases,
            None => self.entries.push(SpecialtyEntry {
                specialty,
                diseases,
            }),
        }
        self
    }

    /// First specialty, in priority order, that treats `disease`.
    pub fn required_specialty(&self, disease: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.diseases.contains(disease))
            .map(|e| e.specialty.as_str())
    }

    /// Whether `specialty` is in the table and treats `disease`.
    pub fn treats(&self, specialty: &str, disease: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.specialty == specialty && e.diseases.contains(disease))
    }

    /// Whether any specialty treats `disease`.
    #[inline]
    pub fn is_known(&self, disease: &str) -> bool {
        self.required_specialty(disease).is_some()
    }

    /// Specialties in referral priority order.
    pub fn specialties(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.specialty.as_str())
    }

    /// Number of specialties.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no specialties.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
