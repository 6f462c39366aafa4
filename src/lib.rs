//! Hospital ward scheduling: patients to doctors, with beds.
//!
//! Assigns each patient to a doctor whose specialty treats the patient's
//! disease, or records a referral when none is available. Two assigners
//! share one scoring model: a deterministic greedy pass and a genetic
//! optimizer with greedy fallback.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Doctor`, `Patient`, `SpecialtyTable`,
//!   `MatchLabel`, `ScheduleEntry`, `Schedule`
//! - **`config`**: Immutable defaults and specialty table
//! - **`request`**: Lenient parsing of JSON input records
//! - **`validation`**: Structural input checks
//! - **`scoring`**: Fuzzy urgency, heuristic score and GA fitness
//! - **`ga`**: Assignment chromosome, GA problem and runner
//! - **`scheduler`**: Greedy assigner, orchestrator, beds and metrics
//! - **`error`**: Error types
//!
//! # Example
//!
//! ```
//! use u_ward::config::SchedulingConfig;
//! use u_ward::request::ScheduleRequest;
//! use u_ward::scheduler::Scheduler;
//!
//! let config = SchedulingConfig::default();
//! let request = ScheduleRequest::from_json_str(
//!     r#"{"Doctors": 1, "Patients": 1,
//!         "DoctorDetails": [{"Specialty": "Cardiology"}],
//!         "PatientDetails": [{"Disease": "Heart Attack"}]}"#,
//!     &config,
//! )
//! .unwrap();
//!
//! let outcome = Scheduler::new(&config).run(&request);
//! assert_eq!(outcome.metrics.perfect_matches, 1);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Zadeh (1965), "Fuzzy sets"
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"

pub mod config;
pub mod error;
pub mod ga;
pub mod models;
pub mod request;
pub mod scheduler;
pub mod scoring;
pub mod validation;
