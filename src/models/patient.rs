//! Patient model.
//!
//! A patient carries a disease label (from the classifier or intake) and a
//! triage urgency on the 1..=10 scale. The fuzzy urgency rescales that
//! urgency linearly onto [0, 1].

use serde::{Deserialize, Serialize};

/// Lowest triage urgency.
pub const MIN_URGENCY: i32 = 1;
/// Highest triage urgency.
pub const MAX_URGENCY: i32 = 10;

/// A patient awaiting assignment.
///
/// Urgency outside 1..=10 is accepted as-is; the fuzzy score clamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    /// Display name.
    pub name: String,
    /// Disease label, matched against the specialty table.
    pub disease: String,
    /// Age in years.
    pub age: u32,
    /// Triage urgency (1 = least, 10 = most).
    pub urgency: i32,
}

impl Patient {
    /// Creates a patient with age 30 and urgency 5.
    pub fn new(name: impl Into<String>, disease: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            disease: disease.into(),
            age: 30,
            urgency: 5,
        }
    }

    /// Synthesized entry for position `index` (0-based), named `Patient <index + 1>`.
    pub fn placeholder(index: usize, disease: impl Into<String>) -> Self {
        Self::new(format!("Patient {}", index + 1), disease)
    }

    /// Sets the age.
    pub fn with_age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    /// Sets the triage urgency.
    pub fn with_urgency(mut self, urgency: i32) -> Self {
        self.urgency = urgency;
        self
    }

    /// Urgency rescaled to [0, 1].
    #[inline]
    pub fn fuzzy_urgency(&self) -> f64 {
        fuzzy_urgency(self.urgency)
    }
}

/// `clamp((urgency - 1) / 9, 0, 1)`.
#[inline]
pub fn fuzzy_urgency(urgency: i32) -> f64 {
    let span = f64::from(MAX_URGENCY - MIN_URGENCY);
    (f64::from(urgency - MIN_URGENCY) / span).clamp(0.0, 1.0)
}
