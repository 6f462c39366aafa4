//! Specialty-matched greedy assigner.
//!
//! # Algorithm
//!
//! For each patient, in intake order:
//! 1. If no specialty in the table treats the disease, label the patient
//!    `DiseaseNotInSystem` and move on.
//! 2. Score every doctor whose specialty treats the disease with
//!    [`heuristic_score`]; the strictly highest score wins, so ties go to
//!    the lowest roster index.
//! 3. A winner is assigned (`PerfectMatch`) and its load grows by one.
//! 4. Without a winner the patient is referred to the highest-priority
//!    specialty that treats the disease (`ReferralTo`).
//!
//! A doctor without a perfect specialty match is never assigned. Scores use
//! the exact fuzzy urgency, not the 3-decimal figure in the output.
//!
//! # Complexity
//! O(p · d) table lookups for p patients and d doctors.

use tracing::debug;

use crate::models::{Doctor, MatchLabel, Patient, Schedule, ScheduleEntry, SpecialtyTable};
use crate::scoring::heuristic_score;

/// Deterministic single-pass assigner.
///
/// # Example
///
/// ```
/// use u_ward::models::{Doctor, MatchLabel, Patient, SpecialtyTable};
/// use u_ward::scheduler::GreedyAssigner;
///
/// let table = SpecialtyTable::standard();
/// let doctors = vec![Doctor::new("Dr. 1", "Cardiology")];
/// let patients = vec![Patient::new("P1", "Heart Attack").with_urgency(9)];
///
/// let schedule = GreedyAssigner::new(&table).assign(&doctors, &patients);
/// assert_eq!(schedule.entries[0].doctor_index, Some(0));
/// assert_eq!(schedule.entries[0].label, MatchLabel::PerfectMatch);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GreedyAssigner<'a> {
    specialties: &'a SpecialtyTable,
}

impl<'a> GreedyAssigner<'a> {
    /// Creates an assigner over a specialty table.
    pub fn new(specialties: &'a SpecialtyTable) -> Self {
        Self { specialties }
    }

    /// Assigns every patient. Beds are left at their default.
    pub fn assign(&self, doctors: &[Doctor], patients: &[Patient]) -> Schedule {
        let mut schedule = Schedule::new(doctors.len());
        let avg_load = patients.len() as f64 / doctors.len().max(1) as f64;

        for (i, patient) in patients.iter().enumerate() {
            let Some(required) = self.specialties.required_specialty(&patient.disease) else {
                debug!(patient = i, disease = %patient.disease, "disease not in system");
                schedule.add_entry(ScheduleEntry::unassigned(
                    i,
                    patient,
                    MatchLabel::DiseaseNotInSystem,
                ));
                continue;
            };

            let fuzzy = patient.fuzzy_urgency();
            let mut best: Option<(usize, f64)> = None;
            for (d, doctor) in doctors.iter().enumerate() {
                if !self.specialties.treats(&doctor.specialty, &patient.disease) {
                    continue;
                }
                let score = heuristic_score(schedule.doctor_loads[d], avg_load, d, fuzzy);
                let better = match best {
                    None => true,
                    Some((_, top)) => score > top,
                };
                if better {
                    best = Some((d, score));
                }
            }

            let entry = match best {
                Some((d, _)) => {
                    ScheduleEntry::assigned(i, patient, d, &doctors[d], MatchLabel::PerfectMatch)
                }
                None => {
                    debug!(patient = i, specialty = required, "no matching doctor, referring");
                    ScheduleEntry::unassigned(
                        i,
                        patient,
                        MatchLabel::ReferralTo(required.to_string()),
                    )
                }
            };
            schedule.add_entry(entry);
        }

        schedule
    }
}
