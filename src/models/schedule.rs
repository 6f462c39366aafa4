//! Schedule (solution) model.
//!
//! A schedule is one entry per patient in input order, each carrying the
//! assigned doctor (or none), a match label and a bed. The schedule also
//! owns the per-doctor load counters, which only ever grow.

use serde::{Serialize, Serializer};
use std::fmt;

use super::{Doctor, Patient};

/// Specialty match category of a schedule entry.
///
/// The greedy assigner emits `PerfectMatch`, `ReferralTo` and
/// `DiseaseNotInSystem`. The genetic optimizer emits `PerfectMatch`,
/// `Generalist`, `PartialOrNoMatch` and `Referral`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchLabel {
    /// Doctor's specialty treats the disease.
    PerfectMatch,
    /// Assigned to a "General" doctor whose specialty does not list the disease.
    Generalist,
    /// Assigned to a specialist who does not treat the disease.
    PartialOrNoMatch,
    /// No doctor on the roster treats the disease; refer to this specialty.
    ReferralTo(String),
    /// Left unassigned by the optimizer.
    Referral,
    /// No specialty in the table treats the disease.
    DiseaseNotInSystem,
}

impl MatchLabel {
    /// Whether this is one of the referral labels.
    pub fn is_referral(&self) -> bool {
        matches!(self, Self::ReferralTo(_) | Self::Referral)
    }

    /// Whether this label counts as "no match".
    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::PartialOrNoMatch | Self::DiseaseNotInSystem)
    }

    /// Quality weight used by the convergence series.
    ///
    /// 1.0 for a perfect match, 0.3 for a referral, 0.0 otherwise.
    pub fn match_quality(&self) -> f64 {
        match self {
            Self::PerfectMatch => 1.0,
            Self::ReferralTo(_) | Self::Referral => 0.3,
            _ => 0.0,
        }
    }
}

impl fmt::Display for MatchLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerfectMatch => f.write_str("Perfect Match"),
            Self::Generalist => f.write_str("Generalist"),
            Self::PartialOrNoMatch => f.write_str("Partial/No Match"),
            Self::ReferralTo(specialty) => write!(f, "Refer to {specialty}"),
            Self::Referral => f.write_str("Referral"),
            Self::DiseaseNotInSystem => f.write_str("Disease not in system"),
        }
    }
}

impl Serialize for MatchLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One patient's row in the schedule.
///
/// Indices are 0-based in memory and 1-based on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleEntry {
    /// Patient position in the request (0-based).
    #[serde(rename = "Patient", serialize_with = "one_based")]
    pub patient_index: usize,
    /// Patient display name.
    pub patient_name: String,
    /// Patient disease label.
    pub disease: String,
    /// Assigned doctor (0-based roster index), if any.
    #[serde(rename = "Doctor", serialize_with = "doctor_or_dash")]
    pub doctor_index: Option<usize>,
    /// Assigned doctor's name, or the reason there is none.
    pub doctor_name: String,
    /// Assigned doctor's specialty, or "N/A".
    pub specialty: String,
    /// Match category.
    #[serde(rename = "SpecialtyMatch")]
    pub label: MatchLabel,
    /// Triage urgency.
    pub urgency: i32,
    /// Fuzzy urgency in [0, 1].
    #[serde(serialize_with = "three_decimals")]
    pub fuzzy_score: f64,
    /// Bed (1-based).
    #[serde(rename = "Bed")]
    pub bed: usize,
}

impl ScheduleEntry {
    /// Entry for a patient assigned to `doctor`.
    pub fn assigned(
        patient_index: usize,
        patient: &Patient,
        doctor_index: usize,
        doctor: &Doctor,
        label: MatchLabel,
    ) -> Self {
        Self {
            patient_index,
            patient_name: patient.name.clone(),
            disease: patient.disease.clone(),
            doctor_index: Some(doctor_index),
            doctor_name: doctor.name.clone(),
            specialty: doctor.specialty.clone(),
            label,
            urgency: patient.urgency,
            fuzzy_score: patient.fuzzy_urgency(),
            bed: 1,
        }
    }

    /// Entry for a patient left without a doctor.
    pub fn unassigned(patient_index: usize, patient: &Patient, label: MatchLabel) -> Self {
        let doctor_name = match label {
            MatchLabel::DiseaseNotInSystem => "No specialist available",
            _ => "Referral needed",
        };
        Self {
            patient_index,
            patient_name: patient.name.clone(),
            disease: patient.disease.clone(),
            doctor_index: None,
            doctor_name: doctor_name.to_string(),
            specialty: "N/A".to_string(),
            label,
            urgency: patient.urgency,
            fuzzy_score: patient.fuzzy_urgency(),
            bed: 1,
        }
    }

    /// Whether a doctor was assigned.
    #[inline]
    pub fn has_doctor(&self) -> bool {
        self.doctor_index.is_some()
    }
}

/// A complete patient schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schedule {
    /// Entries in patient order.
    pub entries: Vec<ScheduleEntry>,
    /// Patients per doctor, indexed by roster position.
    pub doctor_loads: Vec<usize>,
}

impl Schedule {
    /// Creates an empty schedule for a roster of `doctor_count` doctors.
    pub fn new(doctor_count: usize) -> Self {
        Self {
            entries: Vec::new(),
            doctor_loads: vec![0; doctor_count],
        }
    }

    /// Appends an entry, incrementing the assigned doctor's load.
    ///
    /// A doctor index outside the roster grows the load vector.
    pub fn add_entry(&mut self, entry: ScheduleEntry) {
        if let Some(d) = entry.doctor_index {
            if d >= self.doctor_loads.len() {
                self.doctor_loads.resize(d + 1, 0);
            }
            self.doctor_loads[d] += 1;
        }
        self.entries.push(entry);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the schedule has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for a patient (0-based position).
    pub fn entry(&self, patient_index: usize) -> Option<&ScheduleEntry> {
        self.entries.get(patient_index)
    }

    /// Number of entries matching a predicate on the label.
    pub fn count_labels(&self, pred: impl Fn(&MatchLabel) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.label)).count()
    }

    /// Number of patients without a doctor.
    pub fn unassigned_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.has_doctor()).count()
    }

    /// Total assigned patients across all doctors.
    pub fn total_load(&self) -> usize {
        self.doctor_loads.iter().sum()
    }

    /// Patient positions assigned to a doctor.
    pub fn patients_of(&self, doctor_index: usize) -> Vec<usize> {
        self.entries
            .iter()
            .filter(|e| e.doctor_index == Some(doctor_index))
            .map(|e| e.patient_index)
            .collect()
    }
}

fn one_based<S: Serializer>(index: &usize, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(*index as u64 + 1)
}

fn doctor_or_dash<S: Serializer>(index: &Option<usize>, serializer: S) -> Result<S::Ok, S::Error> {
    match index {
        Some(d) => serializer.serialize_u64(*d as u64 + 1),
        None => serializer.serialize_str("-"),
    }
}

fn three_decimals<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 1000.0).round() / 1000.0)
}
