//! Hospital scheduling domain models.
//!
//! Provides the data types for a ward scheduling problem and its solution.
//!
//! # Domain Mappings
//!
//! | u-ward | Scheduling term |
//! |--------|-----------------|
//! | Patient | Task |
//! | Doctor | Resource (roster index = seniority rank) |
//! | SpecialtyTable | Resource eligibility |
//! | Schedule | Assignment plan |

mod patient;
mod schedule;
mod specialty;
mod staff;

pub use patient::{MAX_URGENCY, MIN_URGENCY, Patient, fuzzy_urgency};
pub use schedule::{MatchLabel, Schedule, ScheduleEntry};
pub use specialty::{SpecialtyEntry, SpecialtyTable};
pub use staff::Doctor;
