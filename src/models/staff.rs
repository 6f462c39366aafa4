//! Doctor model.
//!
//! Doctors are the primary resource patients are assigned to. A doctor's
//! position in the roster is its identity: it keys the load counter and
//! doubles as seniority rank (index 0 = most senior).

use serde::{Deserialize, Serialize};

/// A doctor on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    /// Display name.
    pub name: String,
    /// Specialty label, matched against the specialty table.
    pub specialty: String,
}

impl Doctor {
    /// Creates a doctor.
    pub fn new(name: impl Into<String>, specialty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            specialty: specialty.into(),
        }
    }

    /// Synthesized roster entry for position `index` (0-based).
    ///
    /// Named `Dr. <index + 1>`.
    pub fn placeholder(index: usize, specialty: impl Into<String>) -> Self {
        Self::new(format!("Dr. {}", index + 1), specialty)
    }
}
