//! Shared scoring model.
//!
//! Both assigners score doctor choices with the vocabulary defined here:
//!
//! - **Heuristic score**: ranks candidate doctors for a single patient in
//!   the greedy pass. Only doctors with a perfect specialty match are scored.
//! - **Population fitness**: scores a full assignment vector for the
//!   genetic optimizer. Higher is better.
//!
//! # Population fitness
//!
//! | Gene outcome | Contribution |
//! |--------------|--------------|
//! | Perfect match | +50 |
//! | "General" doctor, no perfect match | +5 |
//! | Other mismatch | −15 · urgency/10 |
//! | Unassigned, disease known to the table | −20 · urgency/10 |
//! | Unassigned, disease unknown | −5 |
//! | Any assigned doctor `d` | +max(0, 3 − d) · urgency/10 · 5 |
//!
//! After summing over patients, `2 · variance(doctor loads)` is subtracted.

use crate::models::{Doctor, Patient, SpecialtyTable};

/// Specialty label that earns the generalist credit.
pub const GENERAL_SPECIALTY: &str = "General";

const PERFECT_MATCH_BONUS: f64 = 40.0;
const LOAD_BALANCE_WEIGHT: f64 = 30.0;

const FIT_PERFECT: f64 = 50.0;
const FIT_GENERALIST: f64 = 5.0;
const FIT_MISMATCH: f64 = 15.0;
const FIT_AVOIDABLE_REFERRAL: f64 = 20.0;
const FIT_UNSUPPORTED: f64 = 5.0;
const FIT_SENIORITY: f64 = 5.0;
const FIT_SENIOR_RANKS: usize = 3;
const FIT_VARIANCE_WEIGHT: f64 = 2.0;

/// Urgency weight for a doctor's seniority rank (0 = most senior).
///
/// 30 for rank 0, 25 for rank 1, 20 for everyone else.
#[inline]
pub fn seniority_weight(rank: usize) -> f64 {
    match rank {
        0 => 30.0,
        1 => 25.0,
        _ => 20.0,
    }
}

/// Greedy score of one perfectly matching doctor for one patient.
///
/// `40 + 30 · max(0, 1 − load/avg_load) + seniority_weight(rank) · fuzzy`.
///
/// # Arguments
/// * `load` - Patients already assigned to the doctor.
/// * `avg_load` - Patients per doctor for the whole request.
/// * `rank` - Doctor's roster index.
/// * `fuzzy` - Patient's fuzzy urgency in [0, 1].
pub fn heuristic_score(load: usize, avg_load: f64, rank: usize, fuzzy: f64) -> f64 {
    let balance = if avg_load > 0.0 {
        (1.0 - load as f64 / avg_load).max(0.0)
    } else {
        0.0
    };
    PERFECT_MATCH_BONUS + LOAD_BALANCE_WEIGHT * balance + seniority_weight(rank) * fuzzy
}

/// Population variance of a load vector. Zero for an empty vector.
pub fn load_variance(loads: &[usize]) -> f64 {
    if loads.is_empty() {
        return 0.0;
    }
    let n = loads.len() as f64;
    let mean = loads.iter().sum::<usize>() as f64 / n;
    loads
        .iter()
        .map(|&l| {
            let diff = l as f64 - mean;
            diff * diff
        })
        .sum::<f64>()
        / n
}

/// Precomputed match facts for one request.
///
/// Built once per run and shared read-only between the assigners and
/// across parallel fitness evaluations.
#[derive(Debug, Clone)]
pub struct FitnessModel {
    /// `perfect[p][d]`: doctor `d` treats patient `p`'s disease.
    perfect: Vec<Vec<bool>>,
    /// Doctor has the generalist specialty.
    generalist: Vec<bool>,
    /// Patient's disease is treated by some specialty in the table.
    known: Vec<bool>,
    /// `urgency / 10` per patient.
    urgency_weight: Vec<f64>,
}

impl FitnessModel {
    /// Precomputes match facts for a roster and patient list.
    pub fn new(doctors: &[Doctor], patients: &[Patient], specialties: &SpecialtyTable) -> Self {
        let perfect = patients
            .iter()
            .map(|p| {
                doctors
                    .iter()
                    .map(|d| specialties.treats(&d.specialty, &p.disease))
                    .collect()
            })
            .collect();
        Self {
            perfect,
            generalist: doctors
                .iter()
                .map(|d| d.specialty == GENERAL_SPECIALTY)
                .collect(),
            known: patients
                .iter()
                .map(|p| specialties.is_known(&p.disease))
                .collect(),
            urgency_weight: patients
                .iter()
                .map(|p| f64::from(p.urgency) / 10.0)
                .collect(),
        }
    }

    /// Number of doctors.
    pub fn doctor_count(&self) -> usize {
        self.generalist.len()
    }

    /// Number of patients.
    pub fn patient_count(&self) -> usize {
        self.known.len()
    }

    /// Whether doctor `doctor` perfectly treats patient `patient`.
    #[inline]
    pub fn is_perfect(&self, patient: usize, doctor: usize) -> bool {
        self.perfect
            .get(patient)
            .and_then(|row| row.get(doctor))
            .copied()
            .unwrap_or(false)
    }

    /// Whether doctor `doctor` is a generalist.
    #[inline]
    pub fn is_generalist(&self, doctor: usize) -> bool {
        self.generalist.get(doctor).copied().unwrap_or(false)
    }

    /// Whether patient `patient`'s disease is treatable by some specialty.
    #[inline]
    pub fn is_known(&self, patient: usize) -> bool {
        self.known.get(patient).copied().unwrap_or(false)
    }

    /// Contribution of one gene, excluding the load-balance term.
    ///
    /// A doctor index outside the roster scores as unassigned.
    pub fn gene_score(&self, patient: usize, gene: Option<usize>) -> f64 {
        let w = self.urgency_weight.get(patient).copied().unwrap_or(0.0);
        match gene.filter(|&d| d < self.doctor_count()) {
            None if self.is_known(patient) => -FIT_AVOIDABLE_REFERRAL * w,
            None => -FIT_UNSUPPORTED,
            Some(d) => {
                let matched = if self.is_perfect(patient, d) {
                    FIT_PERFECT
                } else if self.is_generalist(d) {
                    FIT_GENERALIST
                } else {
                    -FIT_MISMATCH * w
                };
                let seniority = FIT_SENIOR_RANKS.saturating_sub(d) as f64 * w * FIT_SENIORITY;
                matched + seniority
            }
        }
    }

    /// Total fitness of an assignment vector (higher = better).
    pub fn fitness(&self, genes: &[Option<usize>]) -> f64 {
        let mut loads = vec![0usize; self.doctor_count()];
        let mut score = 0.0;
        for (patient, &gene) in genes.iter().enumerate() {
            if let Some(d) = gene.filter(|&d| d < loads.len()) {
                loads[d] += 1;
            }
            score += self.gene_score(patient, gene);
        }
        score - FIT_VARIANCE_WEIGHT * load_variance(&loads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> FitnessModel {
        let doctors = vec![
            Doctor::new("Dr. C", "Cardiology"),
            Doctor::new("Dr. G", "General"),
            Doctor::new("Dr. O", "Orthopedics"),
            Doctor::new("Dr. N", "Neurology"),
        ];
        let patients = vec![
            Patient::new("P1", "Heart Attack").with_urgency(10),
            Patient::new("P2", "Fever").with_urgency(5),
            Patient::new("P3", "Broken Toe").with_urgency(2),
        ];
        FitnessModel::new(&doctors, &patients, &SpecialtyTable::standard())
    }

    #[test]
    fn test_seniority_weight() {
        assert_eq!(seniority_weight(0), 30.0);
        assert_eq!(seniority_weight(1), 25.0);
        assert_eq!(seniority_weight(2), 20.0);
        assert_eq!(seniority_weight(17), 20.0);
    }

    #[test]
    fn test_heuristic_score() {
        // Empty doctor, most senior, max urgency: 40 + 30 + 30
        assert!((heuristic_score(0, 2.0, 0, 1.0) - 100.0).abs() < 1e-10);
        // Half loaded, rank 1, fuzzy 0.5: 40 + 15 + 12.5
        assert!((heuristic_score(1, 2.0, 1, 0.5) - 67.5).abs() < 1e-10);
        // Overloaded doctors lose the balance term entirely
        assert!((heuristic_score(5, 2.0, 3, 0.0) - 40.0).abs() < 1e-10);
    }

    #[test]
    fn test_load_variance() {
        assert_eq!(load_variance(&[]), 0.0);
        assert_eq!(load_variance(&[2, 2, 2]), 0.0);
        // mean 2, deviations 4 + 0 + 4 → 8/3
        assert!((load_variance(&[0, 2, 4]) - 8.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_gene_scores() {
        let m = model();
        // P1 → cardiologist (rank 0): 50 + 3·1.0·5
        assert!((m.gene_score(0, Some(0)) - 65.0).abs() < 1e-10);
        // P1 → generalist (rank 1): 5 + 2·1.0·5
        assert!((m.gene_score(0, Some(1)) - 15.0).abs() < 1e-10);
        // P1 → orthopedist (rank 2): −15 + 1·1.0·5
        assert!((m.gene_score(0, Some(2)) - -10.0).abs() < 1e-10);
        // P1 → neurologist (rank 3): −15, no seniority left
        assert!((m.gene_score(0, Some(3)) - -15.0).abs() < 1e-10);
        // P1 unassigned, treatable: −20·1.0
        assert!((m.gene_score(0, None) - -20.0).abs() < 1e-10);
        // P3 unassigned, unknown disease: −5
        assert!((m.gene_score(2, None) - -5.0).abs() < 1e-10);
        // Out-of-range doctor scores as unassigned
        assert!((m.gene_score(0, Some(99)) - -20.0).abs() < 1e-10);
    }

    #[test]
    fn test_fitness_includes_variance_penalty() {
        let m = model();
        let genes = [Some(0), Some(1), None];
        let base = m.gene_score(0, Some(0)) + m.gene_score(1, Some(1)) + m.gene_score(2, None);
        let penalty = 2.0 * load_variance(&[1, 1, 0, 0]);
        assert!((m.fitness(&genes) - (base - penalty)).abs() < 1e-10);
        assert!((penalty - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_fitness_no_doctors() {
        let patients = vec![Patient::new("P1", "Fever")];
        let m = FitnessModel::new(&[], &patients, &SpecialtyTable::standard());
        assert!((m.fitness(&[None]) - -10.0).abs() < 1e-10);
    }

    #[test]
    fn test_perfect_matrix() {
        let m = model();
        assert!(m.is_perfect(0, 0));
        assert!(!m.is_perfect(0, 1));
        assert!(m.is_perfect(1, 1));
        assert!(!m.is_perfect(2, 0));
        assert!(!m.is_known(2));
        assert!(m.is_generalist(1));
        assert!(!m.is_perfect(9, 9));
    }
}
