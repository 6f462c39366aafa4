//! Scheduling requests and input-record parsing.
//!
//! The input record is a JSON object with PascalCase keys. Every field is
//! optional: missing values take the [`SchedulingConfig`] defaults, and
//! malformed values are logged and defaulted. Only structural problems
//! (see [`crate::validation`]) are rejected.
//!
//! | Key | Default |
//! |-----|---------|
//! | `Doctors` | 3 |
//! | `Patients` | 6 |
//! | `Beds` | 4 |
//! | `Urgency` | 5 per patient |
//! | `DoctorDetails` | `Dr. <n>`, "General" |
//! | `PatientDetails` | `Patient <n>`, "Fever", 30 |
//! | `UseGA` | false |
//! | `GAPopulation` / `GAGenerations` / `GAMutation` / `GASeed` | 80 / 120 / 0.06 / none |

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::SchedulingConfig;
use crate::error::ScheduleError;
use crate::ga::GaConfig;
use crate::models::{Doctor, Patient};
use crate::validation::{lenient_bool, lenient_f64, lenient_i64, validate_record};

/// A fully resolved scheduling request.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    /// Doctor roster; index = seniority rank.
    pub doctors: Vec<Doctor>,
    /// Patients in intake order.
    pub patients: Vec<Patient>,
    /// Number of beds.
    pub beds: usize,
    /// GA settings when optimized scheduling is requested.
    pub optimizer: Option<GaConfig>,
}

impl ScheduleRequest {
    /// Creates a heuristic-only request with 4 beds.
    pub fn new(doctors: Vec<Doctor>, patients: Vec<Patient>) -> Self {
        Self {
            doctors,
            patients,
            beds: 4,
            optimizer: None,
        }
    }

    /// Sets the bed count.
    pub fn with_beds(mut self, beds: usize) -> Self {
        self.beds = beds;
        self
    }

    /// Requests optimized scheduling.
    pub fn with_optimizer(mut self, config: GaConfig) -> Self {
        self.optimizer = Some(config);
        self
    }

    /// Parses a JSON input record.
    pub fn from_json_str(input: &str, config: &SchedulingConfig) -> Result<Self, ScheduleError> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(&value, config)
    }

    /// Builds a request from a decoded input record.
    ///
    /// # Errors
    /// [`ScheduleError::StructuralInput`] when the record is not an object
    /// or declares a negative count.
    pub fn from_value(record: &Value, config: &SchedulingConfig) -> Result<Self, ScheduleError> {
        validate_record(record).map_err(ScheduleError::StructuralInput)?;
        let empty = Map::new();
        let fields = record.as_object().unwrap_or(&empty);

        let doctor_count = count_field(fields, "Doctors", config.default_doctors);
        let patient_count = count_field(fields, "Patients", config.default_patients);
        let beds = count_field(fields, "Beds", config.default_beds);

        let doctors = parse_doctors(fields.get("DoctorDetails"), doctor_count, config);
        let urgencies = parse_urgencies(fields.get("Urgency"), patient_count, config);
        let patients = parse_patients(fields.get("PatientDetails"), &urgencies, config);

        let use_ga = fields
            .get("UseGA")
            .map(|v| {
                lenient_bool(v).unwrap_or_else(|| {
                    warn!(value = %v, "malformed UseGA, defaulting to false");
                    false
                })
            })
            .unwrap_or(false);
        let optimizer = use_ga.then(|| parse_ga_config(fields));

        debug!(
            doctors = doctors.len(),
            patients = patients.len(),
            beds,
            use_ga,
            "parsed scheduling request"
        );

        Ok(Self {
            doctors,
            patients,
            beds,
            optimizer,
        })
    }
}

/// Non-negative count, defaulted when missing or malformed.
fn count_field(fields: &Map<String, Value>, key: &str, default: usize) -> usize {
    match fields.get(key) {
        None | Some(Value::Null) => default,
        Some(v) => match lenient_i64(v).map(usize::try_from) {
            Some(Ok(n)) => n,
            _ => {
                warn!(key, value = %v, default, "malformed count, using default");
                default
            }
        },
    }
}

fn parse_doctors(details: Option<&Value>, count: usize, config: &SchedulingConfig) -> Vec<Doctor> {
    let given = detail_objects(details, "DoctorDetails");
    if given.len() > count {
        debug!(given = given.len(), count, "ignoring extra doctor details");
    }
    (0..count)
        .map(|i| {
            let fallback = config.default_doctor(i);
            match given.get(i).copied().flatten() {
                Some(obj) => Doctor::new(
                    string_or(obj, "Name", fallback.name),
                    string_or(obj, "Specialty", fallback.specialty),
                ),
                None => fallback,
            }
        })
        .collect()
}

fn parse_patients(
    details: Option<&Value>,
    urgencies: &[i32],
    config: &SchedulingConfig,
) -> Vec<Patient> {
    let given = detail_objects(details, "PatientDetails");
    urgencies
        .iter()
        .enumerate()
        .map(|(i, &urgency)| {
            let fallback = config.default_patient(i);
            let patient = match given.get(i).copied().flatten() {
                Some(obj) => {
                    let age = obj
                        .get("Age")
                        .and_then(lenient_i64)
                        .and_then(|a| u32::try_from(a).ok())
                        .unwrap_or(fallback.age);
                    Patient::new(
                        string_or(obj, "Name", fallback.name),
                        string_or(obj, "Disease", fallback.disease),
                    )
                    .with_age(age)
                }
                None => fallback,
            };
            patient.with_urgency(urgency)
        })
        .collect()
}

/// Urgencies padded with the default or truncated to `count`.
fn parse_urgencies(value: Option<&Value>, count: usize, config: &SchedulingConfig) -> Vec<i32> {
    let given: &[Value] = match value {
        None | Some(Value::Null) => &[],
        Some(Value::Array(items)) => items,
        Some(other) => {
            warn!(value = %other, "Urgency is not a list, using defaults");
            &[]
        }
    };
    if !given.is_empty() && given.len() != count {
        warn!(given = given.len(), count, "Urgency length differs from patient count");
    }
    (0..count)
        .map(|i| match given.get(i) {
            None => config.default_urgency,
            Some(v) => lenient_i64(v)
                .and_then(|u| i32::try_from(u).ok())
                .unwrap_or_else(|| {
                    warn!(index = i, value = %v, "malformed urgency, using default");
                    config.default_urgency
                }),
        })
        .collect()
}

/// Detail entries as objects; non-object entries become `None`.
fn detail_objects<'a>(value: Option<&'a Value>, key: &str) -> Vec<Option<&'a Map<String, Value>>> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let obj = item.as_object();
                if obj.is_none() {
                    warn!(key, index = i, "detail entry is not an object, using defaults");
                }
                obj
            })
            .collect(),
        Some(_) => {
            warn!(key, "details are not a list, using defaults");
            Vec::new()
        }
    }
}

fn string_or(obj: &Map<String, Value>, key: &str, fallback: String) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => fallback,
    }
}

fn parse_ga_config(fields: &Map<String, Value>) -> GaConfig {
    let defaults = GaConfig::default();
    let population = count_field(fields, "GAPopulation", defaults.population_size);
    let generations = count_field(fields, "GAGenerations", defaults.max_generations);
    let mutation = match fields.get("GAMutation") {
        None | Some(Value::Null) => defaults.mutation_rate,
        Some(v) => lenient_f64(v).unwrap_or_else(|| {
            warn!(value = %v, "malformed GAMutation, using default");
            defaults.mutation_rate
        }),
    };

    let mut config = defaults
        .with_population_size(population)
        .with_max_generations(generations)
        .with_mutation_rate(mutation);
    match fields.get("GASeed") {
        None | Some(Value::Null) => {}
        Some(v) => match lenient_i64(v) {
            Some(seed) => config = config.with_seed(seed as u64),
            None => warn!(value = %v, "malformed GASeed, running unseeded"),
        },
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;
    use serde_json::json;

    fn parse(value: Value) -> ScheduleRequest {
        ScheduleRequest::from_value(&value, &SchedulingConfig::default()).unwrap()
    }

    #[test]
    fn test_empty_record_uses_defaults() {
        let req = parse(json!({}));
        assert_eq!(req.doctors.len(), 3);
        assert_eq!(req.patients.len(), 6);
        assert_eq!(req.beds, 4);
        assert!(req.optimizer.is_none());
        assert_eq!(req.doctors[2], Doctor::new("Dr. 3", "General"));
        assert_eq!(req.patients[5].name, "Patient 6");
        assert_eq!(req.patients[5].disease, "Fever");
        assert_eq!(req.patients[5].age, 30);
        assert!(req.patients.iter().all(|p| p.urgency == 5));
    }

    #[test]
    fn test_details_are_padded_and_truncated() {
        let req = parse(json!({
            "Doctors": 2,
            "Patients": 3,
            "DoctorDetails": [
                {"Name": "Dr. Who", "Specialty": "Cardiology"},
                {"Name": "Dr. X", "Specialty": "Neurology"},
                {"Name": "Dr. Extra", "Specialty": "General"}
            ],
            "PatientDetails": [
                {"Name": "Zoe", "Disease": "Stroke", "Age": 71}
            ],
            "Urgency": [9, 2, 4]
        }));
        assert_eq!(req.doctors.len(), 2);
        assert_eq!(req.doctors[1].specialty, "Neurology");
        assert_eq!(req.patients.len(), 3);
        assert_eq!(req.patients[0].name, "Zoe");
        assert_eq!(req.patients[0].age, 71);
        assert_eq!(req.patients[0].urgency, 9);
        assert_eq!(req.patients[1].name, "Patient 2");
        assert_eq!(req.patients[2].urgency, 4);
    }

    #[test]
    fn test_partial_detail_entries() {
        let req = parse(json!({
            "Doctors": 1,
            "Patients": 1,
            "DoctorDetails": [{"Name": "Dr. Solo"}],
            "PatientDetails": [{"Disease": "Cold"}]
        }));
        assert_eq!(req.doctors[0], Doctor::new("Dr. Solo", "General"));
        assert_eq!(req.patients[0].name, "Patient 1");
        assert_eq!(req.patients[0].disease, "Cold");
    }

    #[test]
    fn test_urgency_padding_and_malformed_values() {
        let req = parse(json!({"Patients": 4, "Urgency": [8, "x", "3"]}));
        let urgencies: Vec<i32> = req.patients.iter().map(|p| p.urgency).collect();
        assert_eq!(urgencies, vec![8, 5, 3, 5]);
    }

    #[test]
    fn test_lenient_counts() {
        let req = parse(json!({"Doctors": "2", "Patients": 1.0, "Beds": "lots"}));
        assert_eq!(req.doctors.len(), 2);
        assert_eq!(req.patients.len(), 1);
        assert_eq!(req.beds, 4);
    }

    #[test]
    fn test_ga_settings() {
        let req = parse(json!({
            "UseGA": true,
            "GAPopulation": 50,
            "GAGenerations": "30",
            "GAMutation": 0.1,
            "GASeed": 1234
        }));
        let ga = req.optimizer.expect("optimizer requested");
        assert_eq!(ga.population_size, 50);
        assert_eq!(ga.max_generations, 30);
        assert!((ga.mutation_rate - 0.1).abs() < 1e-12);
        assert_eq!(ga.seed, Some(1234));
    }

    #[test]
    fn test_ga_defaults() {
        let req = parse(json!({"UseGA": "true"}));
        let ga = req.optimizer.expect("optimizer requested");
        assert_eq!(ga.population_size, 80);
        assert_eq!(ga.max_generations, 120);
        assert_eq!(ga.seed, None);
    }

    #[test]
    fn test_negative_count_is_structural() {
        let err = ScheduleRequest::from_value(
            &json!({"Patients": -2}),
            &SchedulingConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ScheduleError::StructuralInput(ref errs) if errs.len() == 1));
    }

    #[test]
    fn test_oversized_count_is_structural() {
        let err = ScheduleRequest::from_value(
            &json!({"Doctors": 1, "Patients": 4e18}),
            &SchedulingConfig::default(),
        )
        .unwrap_err();
        match err {
            ScheduleError::StructuralInput(errs) => {
                assert_eq!(errs.len(), 1);
                assert_eq!(errs[0].kind, ValidationErrorKind::CountTooLarge);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_json_str() {
        let config = SchedulingConfig::default();
        let req =
            ScheduleRequest::from_json_str(r#"{"Doctors": 0, "Patients": 0}"#, &config).unwrap();
        assert!(req.doctors.is_empty());
        assert!(req.patients.is_empty());
        assert!(matches!(
            ScheduleRequest::from_json_str("{not json", &config),
            Err(ScheduleError::Json(_))
        ));
        assert!(matches!(
            ScheduleRequest::from_json_str("[]", &config),
            Err(ScheduleError::StructuralInput(_))
        ));
    }
}
